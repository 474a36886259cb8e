use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    /// Page URL; resolved to a stream only when played.
    pub reference: String,
    pub duration: String,
}

/// One `yt-dlp -j --flat-playlist` line. Flat entries carry few fields, and
/// which ones depends on the extractor.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FlatEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration_string: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}
