//! Remote catalog: search and stream resolution through yt-dlp.

pub mod models;
pub mod resolve;
pub mod search;

pub use models::SearchResult;
pub use resolve::is_remote;

use crate::error::Error;
use crate::storage::CacheHandle;

/// Playable form of `reference`. Local paths pass through untouched; remote
/// ones go through the stream cache, then yt-dlp.
pub async fn resolve_stream(cache: &CacheHandle, reference: &str) -> Result<String, Error> {
    if !is_remote(reference) {
        return Ok(reference.to_string());
    }
    if let Some(url) = cache.stream_url(reference).await {
        tracing::debug!(reference, "stream cache hit");
        return Ok(url);
    }
    let url = resolve::resolve_audio_url(reference)
        .await
        .map_err(|e| Error::resolution(reference, e))?;
    cache.store_stream_url(reference, &url).await;
    Ok(url)
}

pub async fn search(query: &str, limit: u32) -> Result<Vec<SearchResult>, Error> {
    search::search(query, limit).await.map_err(Error::network)
}
