//! Lyrics lookup and playback-position sync.
//!
//! - LRCLIB client ([`lrclib`])
//! - synced-line parser ([`parser`])
//! - active line and auto-scroll math for the lyrics pane

pub mod lrclib;
pub mod parser;

pub use lrclib::LrclibClient;
pub use parser::LyricLine;

use crate::error::Error;
use crate::storage::{CacheHandle, CachedLyrics};

pub const MSG_NO_ARTIST: &str = "Artist or title missing.";
pub const MSG_NOT_FOUND: &str = "No lyrics found.";
pub const MSG_EMPTY_RESPONSE: &str = "Lyrics not found in response.";
pub const MSG_FETCH_FAILED: &str = "No lyrics found or network error.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LyricsData {
    pub plain: String,
    pub synced: Vec<LyricLine>,
    pub has_synced: bool,
}

impl LyricsData {
    /// Explanatory text in place of lyrics.
    pub fn message(text: &str) -> Self {
        Self {
            plain: text.to_string(),
            synced: Vec::new(),
            has_synced: false,
        }
    }

    pub fn from_response(plain: Option<&str>, synced: Option<&str>) -> Self {
        let synced = synced.map(parser::parse_synced).unwrap_or_default();
        let plain = plain.map(str::trim).unwrap_or_default();
        if synced.is_empty() && plain.is_empty() {
            return Self::message(MSG_EMPTY_RESPONSE);
        }
        let plain = if plain.is_empty() {
            synced.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n")
        } else {
            plain.to_string()
        };
        Self {
            plain,
            has_synced: !synced.is_empty(),
            synced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey {
    pub artist: String,
    pub title: String,
}

/// Work out who to ask for: an explicit artist wins, then an
/// "Artist - Title" split on the first separator, then the player's metadata.
pub fn lookup_key(title: &str, explicit_artist: Option<&str>, metadata_artist: Option<&str>) -> Option<LookupKey> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let non_empty = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    if let Some(artist) = non_empty(explicit_artist) {
        return Some(LookupKey {
            artist,
            title: title.to_string(),
        });
    }
    if let Some((artist, rest)) = title.split_once(" - ") {
        let (artist, rest) = (artist.trim(), rest.trim());
        if !artist.is_empty() && !rest.is_empty() {
            return Some(LookupKey {
                artist: artist.to_string(),
                title: rest.to_string(),
            });
        }
    }
    non_empty(metadata_artist).map(|artist| LookupKey {
        artist,
        title: title.to_string(),
    })
}

/// One LRCLIB request (or a cache hit) for `key`.
///
/// Missing lyrics come back as a message, not an error; only transport
/// failures are errors.
pub async fn fetch(client: &LrclibClient, cache: Option<&CacheHandle>, key: &LookupKey) -> Result<LyricsData, Error> {
    if let Some(cache) = cache
        && let Some(hit) = cache.lyrics(&key.artist, &key.title).await
    {
        tracing::debug!(artist = %key.artist, title = %key.title, "lyrics cache hit");
        return Ok(LyricsData::from_response(hit.plain.as_deref(), hit.synced.as_deref()));
    }

    let response = client.get(&key.artist, &key.title).await.map_err(Error::network)?;
    let Some(response) = response else {
        tracing::info!(artist = %key.artist, title = %key.title, "no lyrics");
        return Ok(LyricsData::message(MSG_NOT_FOUND));
    };

    let data = LyricsData::from_response(response.plain_lyrics.as_deref(), response.synced_lyrics.as_deref());
    if let Some(cache) = cache
        && data.plain != MSG_EMPTY_RESPONSE
    {
        cache
            .store_lyrics(
                &key.artist,
                &key.title,
                CachedLyrics {
                    plain: response.plain_lyrics,
                    synced: response.synced_lyrics,
                },
            )
            .await;
    }
    Ok(data)
}

/// Index of the line being sung at `position` seconds.
///
/// Scans in stored order and stops at the first later timestamp, so it relies
/// on the lines being sorted (the parser guarantees it).
pub fn active_line_index(lyrics: &LyricsData, position: f64) -> Option<usize> {
    let mut active = None;
    for (i, line) in lyrics.synced.iter().enumerate() {
        if line.timestamp > position {
            break;
        }
        active = Some(i);
    }
    active
}

/// Scroll offset that puts `active` in the middle of a `viewport`-line pane.
pub fn auto_scroll_offset(active: usize, viewport: usize) -> usize {
    active.saturating_sub(viewport / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(ts: &[f64]) -> LyricsData {
        LyricsData {
            plain: String::new(),
            synced: ts
                .iter()
                .map(|&timestamp| LyricLine {
                    timestamp,
                    text: format!("{timestamp}"),
                })
                .collect(),
            has_synced: !ts.is_empty(),
        }
    }

    #[test]
    fn active_line_lookup() {
        let l = timed(&[0.0, 10.0, 20.0]);
        assert_eq!(active_line_index(&l, 15.0), Some(1));
        assert_eq!(active_line_index(&l, -1.0), None);
        assert_eq!(active_line_index(&l, 25.0), Some(2));
        assert_eq!(active_line_index(&l, 10.0), Some(1));
        assert_eq!(active_line_index(&timed(&[5.0]), 1.0), None);
        assert_eq!(active_line_index(&timed(&[]), 100.0), None);
    }

    #[test]
    fn auto_scroll_centers_and_floors_at_zero() {
        assert_eq!(auto_scroll_offset(2, 10), 0);
        assert_eq!(auto_scroll_offset(30, 10), 25);
        assert_eq!(auto_scroll_offset(5, 0), 5);
    }

    #[test]
    fn explicit_artist_wins() {
        let k = lookup_key("Daft Punk - One More Time", Some("Someone"), Some("Meta")).unwrap();
        assert_eq!(k.artist, "Someone");
        assert_eq!(k.title, "Daft Punk - One More Time");
    }

    #[test]
    fn splits_on_first_separator() {
        let k = lookup_key("Daft Punk - One More Time - Live", None, Some("Meta")).unwrap();
        assert_eq!(k.artist, "Daft Punk");
        assert_eq!(k.title, "One More Time - Live");
    }

    #[test]
    fn falls_back_to_metadata_then_gives_up() {
        let k = lookup_key("Intro", None, Some(" Meta ")).unwrap();
        assert_eq!(k.artist, "Meta");
        assert_eq!(lookup_key("Intro", None, None), None);
        assert_eq!(lookup_key("Intro", Some("  "), Some("")), None);
        assert_eq!(lookup_key("  ", Some("A"), None), None);
    }

    #[test]
    fn response_with_synced_section() {
        let d = LyricsData::from_response(Some("a\nb"), Some("[00:01.00] a\nbad\n[00:02.00] b"));
        assert!(d.has_synced);
        assert_eq!(d.synced.len(), 2);
        assert_eq!(d.plain, "a\nb");
    }

    #[test]
    fn response_without_anything_is_a_message() {
        let d = LyricsData::from_response(None, Some("not synced at all"));
        assert!(!d.has_synced);
        assert_eq!(d.plain, MSG_EMPTY_RESPONSE);

        let d = LyricsData::from_response(Some("   "), None);
        assert_eq!(d.plain, MSG_EMPTY_RESPONSE);
    }

    #[test]
    fn plain_only_response() {
        let d = LyricsData::from_response(Some("just words"), None);
        assert!(!d.has_synced);
        assert!(d.synced.is_empty());
        assert_eq!(d.plain, "just words");
    }
}
