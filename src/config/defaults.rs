use super::{Config, LibraryConfig, LyricsConfig, PathsConfig, PlayerConfig, SearchConfig, UiConfig};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const VOLUME: u8 = 80;
pub const SEEK_SECONDS: u32 = 5;
pub const SEARCH_LIMIT: u32 = 10;
pub const LRCLIB_BASE_URL: &str = "https://lrclib.net/api";
pub const LYRICS_TIMEOUT_SECS: u64 = 10;
pub const TICK_MS: u64 = 100;
pub const STATUS_SECS: u64 = 3;

pub fn data_dir() -> PathBuf {
    ProjectDirs::from("dev", "vibefi", "vibefi")
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("vibefi"))
}

pub fn defaults() -> Config {
    Config {
        paths: PathsConfig::default(),
        library: LibraryConfig::default(),
        player: PlayerConfig::default(),
        search: SearchConfig::default(),
        lyrics: LyricsConfig::default(),
        ui: UiConfig::default(),
    }
}
