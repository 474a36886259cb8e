//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format) lyrics.
//! API Documentation: https://lrclib.net/docs

use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

/// LRCLIB `/get` response. Only the lyric bodies matter here.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LrclibResponse {
    #[serde(rename = "plainLyrics", default)]
    pub plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics", default)]
    pub synced_lyrics: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    const USER_AGENT: &'static str = concat!("vibefi/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("build lrclib http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Exact lookup by artist and track. `Ok(None)` on 404.
    pub async fn get(&self, artist: &str, title: &str) -> anyhow::Result<Option<LrclibResponse>> {
        let url = self.get_url(artist, title);
        tracing::debug!(%url, "lrclib request");

        let response = self.client.get(&url).send().await.context("lrclib request")?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("LRCLIB API error: {status}");
        }
        let body: LrclibResponse = response.json().await.context("decode lrclib response")?;
        Ok(Some(body))
    }

    fn get_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/get?artist_name={}&track_name={}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_encoded_and_slash_trimmed() {
        let c = LrclibClient::new("https://lrclib.net/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            c.get_url("AC/DC", "T.N.T & more"),
            "https://lrclib.net/api/get?artist_name=AC%2FDC&track_name=T.N.T%20%26%20more"
        );
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let r: LrclibResponse = serde_json::from_str(r#"{"id": 1, "plainLyrics": "hi"}"#).unwrap();
        assert_eq!(r.plain_lyrics.as_deref(), Some("hi"));
        assert!(r.synced_lyrics.is_none());

        let r: LrclibResponse = serde_json::from_str(r#"{"syncedLyrics": null}"#).unwrap();
        assert!(r.synced_lyrics.is_none());
    }
}
