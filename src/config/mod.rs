use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub library: LibraryConfig,
    pub player: PlayerConfig,
    pub search: SearchConfig,
    pub lyrics: LyricsConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Playlists, caches and logs live here.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library browser root. Falls back to ~/Music, then ~.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// mpv audio device name (see `mpv --audio-device=help`)
    pub audio_device: Option<String>,
    /// Volume level (0-100)
    pub volume: u8,
    pub seek_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_ms: u64,
    /// How long status messages stay visible.
    pub status_secs: u64,
    /// Restored on startup, saved on quit.
    pub autoplay: bool,
}

impl Default for Config {
    fn default() -> Self {
        defaults::defaults()
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_device: None,
            volume: defaults::VOLUME,
            seek_seconds: defaults::SEEK_SECONDS,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: defaults::SEARCH_LIMIT,
        }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LRCLIB_BASE_URL.to_string(),
            timeout_secs: defaults::LYRICS_TIMEOUT_SECS,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: defaults::TICK_MS,
            status_secs: defaults::STATUS_SECS,
            autoplay: true,
        }
    }
}

impl Config {
    pub fn playlists_dir(&self) -> PathBuf {
        self.paths.data_dir.join("playlists")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.paths.data_dir.join("cache.sqlite3")
    }

    /// Absolute where the directory exists, so library paths handed to the
    /// player and to playlists do not depend on the working directory.
    pub fn library_root(&self) -> PathBuf {
        let root = match (&self.library.root, std::env::var_os("HOME").map(PathBuf::from)) {
            (Some(root), _) => root.clone(),
            (None, Some(home)) if home.join("Music").is_dir() => home.join("Music"),
            (None, Some(home)) => home,
            (None, None) => PathBuf::from("."),
        };
        root.canonicalize().unwrap_or(root)
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "vibefi", "vibefi").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Read the config, writing the defaults out first if there is none yet.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = defaults::defaults();
        write_config(&cfg, &path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str("[player]\nvolume = 40\n[ui]\nautoplay = false\n").unwrap();
        assert_eq!(cfg.player.volume, 40);
        assert_eq!(cfg.player.seek_seconds, defaults::SEEK_SECONDS);
        assert!(!cfg.ui.autoplay);
        assert_eq!(cfg.search.limit, defaults::SEARCH_LIMIT);
        assert_eq!(cfg.lyrics.base_url, defaults::LRCLIB_BASE_URL);
    }

    #[test]
    fn load_creates_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let first = load(Some(&path)).unwrap();
        assert!(path.exists());

        let mut changed = first.clone();
        changed.player.volume = 55;
        changed.library.root = Some(PathBuf::from("/srv/music"));
        save(&changed, Some(&path)).unwrap();

        let again = load(Some(&path)).unwrap();
        assert_eq!(again.player.volume, 55);
        assert_eq!(again.library_root(), PathBuf::from("/srv/music"));
    }

    #[test]
    fn derived_paths_hang_off_data_dir() {
        let mut cfg = Config::default();
        cfg.paths.data_dir = PathBuf::from("/tmp/vf");
        assert_eq!(cfg.playlists_dir(), PathBuf::from("/tmp/vf/playlists"));
        assert_eq!(cfg.cache_path(), PathBuf::from("/tmp/vf/cache.sqlite3"));
    }

    #[test]
    fn relative_library_root_is_made_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::default();
        cfg.library.root = Some(PathBuf::from("."));
        assert!(cfg.library_root().is_absolute());

        cfg.library.root = Some(dir.path().join("sub").join(".."));
        assert_eq!(cfg.library_root(), dir.path().canonicalize().unwrap());
    }
}
