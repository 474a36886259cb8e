use anyhow::Context;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// Resolved stream URLs expire upstream; keep them for an hour.
pub const STREAM_TTL_SECS: i64 = 3600;

/// Raw LRCLIB payload as cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedLyrics {
    pub plain: Option<String>,
    pub synced: Option<String>,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS stream_cache (
  reference TEXT PRIMARY KEY,
  url TEXT NOT NULL,
  expires_at INTEGER NOT NULL,
  updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS lyrics_cache (
  artist TEXT NOT NULL,
  title TEXT NOT NULL,
  plain TEXT,
  synced TEXT,
  fetched_at INTEGER NOT NULL,
  PRIMARY KEY (artist, title)
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    pub fn get_stream_url(&self, reference: &str, now_unix: i64) -> anyhow::Result<Option<String>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT url, expires_at FROM stream_cache WHERE reference=?1",
                params![reference],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .context("query stream cache")?;
        Ok(row.filter(|(_, exp)| *exp > now_unix).map(|(url, _)| url))
    }

    pub fn cache_stream_url(&self, reference: &str, url: &str, now_unix: i64) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO stream_cache(reference, url, expires_at, updated_at)
VALUES(?1, ?2, ?3, ?4)
ON CONFLICT(reference) DO UPDATE SET
  url=excluded.url,
  expires_at=excluded.expires_at,
  updated_at=excluded.updated_at
"#,
                params![reference, url, now_unix + STREAM_TTL_SECS, now_unix],
            )
            .context("cache stream url")?;
        Ok(())
    }

    /// Lookups are case-insensitive on both artist and title.
    pub fn get_lyrics(&self, artist: &str, title: &str) -> anyhow::Result<Option<CachedLyrics>> {
        self.conn
            .query_row(
                "SELECT plain, synced FROM lyrics_cache WHERE artist=?1 AND title=?2",
                params![artist.to_lowercase(), title.to_lowercase()],
                |row| {
                    Ok(CachedLyrics {
                        plain: row.get(0)?,
                        synced: row.get(1)?,
                    })
                },
            )
            .optional()
            .context("query lyrics cache")
    }

    pub fn cache_lyrics(
        &self,
        artist: &str,
        title: &str,
        lyrics: &CachedLyrics,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO lyrics_cache(artist, title, plain, synced, fetched_at)
VALUES(?1, ?2, ?3, ?4, ?5)
ON CONFLICT(artist, title) DO UPDATE SET
  plain=excluded.plain,
  synced=excluded.synced,
  fetched_at=excluded.fetched_at
"#,
                params![
                    artist.to_lowercase(),
                    title.to_lowercase(),
                    lyrics.plain,
                    lyrics.synced,
                    now_unix
                ],
            )
            .context("cache lyrics")?;
        Ok(())
    }
}

// rusqlite connections are not Send-friendly across awaits; background tasks
// open one per operation inside spawn_blocking.
#[derive(Debug, Clone)]
pub struct CacheHandle {
    path: PathBuf,
}

impl CacheHandle {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }

    pub async fn stream_url(&self, reference: &str) -> Option<String> {
        let this = self.clone();
        let reference = reference.to_string();
        let res = tokio::task::spawn_blocking(move || {
            this.open()?.get_stream_url(&reference, now_unix())
        })
        .await;
        match res {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                tracing::warn!(error = %format!("{e:#}"), "stream cache read failed");
                None
            }
            Err(_) => None,
        }
    }

    pub async fn store_stream_url(&self, reference: &str, url: &str) {
        let this = self.clone();
        let reference = reference.to_string();
        let url = url.to_string();
        let res = tokio::task::spawn_blocking(move || {
            this.open()?.cache_stream_url(&reference, &url, now_unix())
        })
        .await;
        if let Ok(Err(e)) = res {
            tracing::warn!(error = %format!("{e:#}"), "stream cache write failed");
        }
    }

    pub async fn lyrics(&self, artist: &str, title: &str) -> Option<CachedLyrics> {
        let this = self.clone();
        let (artist, title) = (artist.to_string(), title.to_string());
        match tokio::task::spawn_blocking(move || this.open()?.get_lyrics(&artist, &title)).await {
            Ok(Ok(hit)) => hit,
            Ok(Err(e)) => {
                tracing::warn!(error = %format!("{e:#}"), "lyrics cache read failed");
                None
            }
            Err(_) => None,
        }
    }

    pub async fn store_lyrics(&self, artist: &str, title: &str, lyrics: CachedLyrics) {
        let this = self.clone();
        let (artist, title) = (artist.to_string(), title.to_string());
        let res = tokio::task::spawn_blocking(move || {
            this.open()?.cache_lyrics(&artist, &title, &lyrics, now_unix())
        })
        .await;
        if let Ok(Err(e)) = res {
            tracing::warn!(error = %format!("{e:#}"), "lyrics cache write failed");
        }
    }
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_urls_expire() {
        let dir = tempfile::tempdir().unwrap();
        let s = Storage::open(&dir.path().join("c.sqlite3")).unwrap();
        s.cache_stream_url("https://y/1", "https://cdn/a", 1_000).unwrap();
        assert_eq!(
            s.get_stream_url("https://y/1", 1_000 + STREAM_TTL_SECS - 1).unwrap(),
            Some("https://cdn/a".into())
        );
        assert_eq!(s.get_stream_url("https://y/1", 1_000 + STREAM_TTL_SECS).unwrap(), None);
        assert_eq!(s.get_stream_url("https://y/2", 0).unwrap(), None);
    }

    #[test]
    fn lyrics_round_trip_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let s = Storage::open(&dir.path().join("c.sqlite3")).unwrap();
        let lyrics = CachedLyrics {
            plain: Some("la la".into()),
            synced: Some("[00:01.00] la la".into()),
        };
        s.cache_lyrics("Daft Punk", "One More Time", &lyrics, 0).unwrap();
        assert_eq!(s.get_lyrics("daft punk", "ONE MORE TIME").unwrap(), Some(lyrics));
        assert_eq!(s.get_lyrics("Daft Punk", "Other").unwrap(), None);
    }

    #[tokio::test]
    async fn handle_opens_per_operation() {
        let dir = tempfile::tempdir().unwrap();
        let h = CacheHandle::new(dir.path().join("sub").join("c.sqlite3"));
        assert_eq!(h.stream_url("r").await, None);
        h.store_stream_url("r", "u").await;
        assert_eq!(h.stream_url("r").await, Some("u".into()));
    }
}
