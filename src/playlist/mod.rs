//! File-backed playlists.
//!
//! One `<name>.jsonl` file per playlist under the store directory. Every
//! non-empty line is a JSON object `{"title", "reference", "duration"}`, so
//! titles may contain any character. Songs are identified by `reference`.
//!
//! The store is the only writer of these files and always reads a playlist in
//! full before mutating it. Rewrites go to a temp file first and are renamed
//! into place. Lines that fail to decode are not songs, but a rewrite carries
//! them over verbatim after the songs so nothing in the file is lost.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSong {
    pub title: String,
    pub reference: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub name: String,
    pub song_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid playlist name: {0:?}")]
    InvalidName(String),
    #[error("playlist not found: {0}")]
    NotFound(String),
    #[error("no song at position {index} (playlist has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("playlist io: {0}")]
    Io(#[from] std::io::Error),
    #[error("playlist encode: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct PlaylistStore {
    dir: PathBuf,
}

impl PlaylistStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create an empty playlist. `Ok(false)` if one with that name exists.
    pub fn create(&self, name: &str) -> Result<bool> {
        let path = self.path_of(name)?;
        if path.exists() {
            return Ok(false);
        }
        OpenOptions::new().write(true).create_new(true).open(&path)?;
        tracing::info!(playlist = name, "playlist created");
        Ok(true)
    }

    /// Remove a playlist. Missing playlists are ignored.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_of(name)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(playlist = name, "playlist deleted");
        }
        Ok(())
    }

    /// `Ok(false)` if `old` does not exist or `new` already does.
    pub fn rename(&self, old: &str, new: &str) -> Result<bool> {
        let from = self.path_of(old)?;
        let to = self.path_of(new)?;
        if !from.exists() || to.exists() {
            return Ok(false);
        }
        fs::rename(&from, &to)?;
        tracing::info!(from = old, to = new, "playlist renamed");
        Ok(true)
    }

    /// All playlists, sorted by name, with counts from a full read of each file.
    pub fn list_all(&self) -> Result<Vec<Playlist>> {
        let mut playlists = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Staged rewrites are dot-prefixed.
            if name.starts_with('.') {
                continue;
            }
            let song_count = read_songs(&path)?.len();
            playlists.push(Playlist {
                name: name.to_string(),
                song_count,
            });
        }
        playlists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(playlists)
    }

    pub fn songs_of(&self, name: &str) -> Result<Vec<PlaylistSong>> {
        let path = self.existing(name)?;
        read_songs(&path)
    }

    pub fn count(&self, name: &str) -> Result<usize> {
        Ok(self.songs_of(name)?.len())
    }

    /// Append a song. `Ok(false)` if its reference is already in the playlist.
    pub fn add(&self, name: &str, song: &PlaylistSong) -> Result<bool> {
        let path = self.existing(name)?;
        if read_songs(&path)?.iter().any(|s| s.reference == song.reference) {
            return Ok(false);
        }
        let mut line = serde_json::to_string(song)?;
        line.push('\n');
        let mut file = OpenOptions::new().append(true).open(&path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        tracing::debug!(playlist = name, reference = %song.reference, "song added");
        Ok(true)
    }

    /// Remove the song at `index`, rewriting the whole file.
    pub fn remove_at(&self, name: &str, index: usize) -> Result<PlaylistSong> {
        let path = self.existing(name)?;
        let mut file = read_file(&path)?;
        if index >= file.songs.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: file.songs.len(),
            });
        }
        let removed = file.songs.remove(index);
        let staged = self.stage(name, &file)?;
        fs::rename(&staged, &path)?;
        tracing::debug!(playlist = name, index, "song removed");
        Ok(removed)
    }

    /// Move a song between playlists. `Ok(false)` (nothing changed) if the
    /// destination already holds its reference.
    ///
    /// Both rewritten files are staged before either is renamed, destination
    /// first: a crash between the two renames leaves the song in both
    /// playlists rather than in neither.
    pub fn move_song(&self, src: &str, index: usize, dest: &str) -> Result<bool> {
        let src_path = self.existing(src)?;
        let dest_path = self.existing(dest)?;

        let mut src_file = read_file(&src_path)?;
        if index >= src_file.songs.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: src_file.songs.len(),
            });
        }
        let mut dest_file = read_file(&dest_path)?;
        if dest_file
            .songs
            .iter()
            .any(|s| s.reference == src_file.songs[index].reference)
        {
            return Ok(false);
        }

        let song = src_file.songs.remove(index);
        dest_file.songs.push(song);

        let staged_dest = self.stage(dest, &dest_file)?;
        let staged_src = match self.stage(src, &src_file) {
            Ok(p) => p,
            Err(e) => {
                let _ = fs::remove_file(&staged_dest);
                return Err(e);
            }
        };
        fs::rename(&staged_dest, &dest_path)?;
        fs::rename(&staged_src, &src_path)?;
        tracing::info!(from = src, to = dest, index, "song moved");
        Ok(true)
    }

    fn existing(&self, name: &str) -> Result<PathBuf> {
        let path = self.path_of(name)?;
        if !path.exists() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    fn path_of(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    fn stage(&self, name: &str, contents: &PlaylistFile) -> Result<PathBuf> {
        let tmp = self.dir.join(format!(".{name}.{EXTENSION}.tmp"));
        let mut out = String::new();
        for song in &contents.songs {
            out.push_str(&serde_json::to_string(song)?);
            out.push('\n');
        }
        if !contents.unreadable.is_empty() {
            tracing::warn!(
                playlist = name,
                kept = contents.unreadable.len(),
                "rewriting playlist with unreadable lines moved to the end"
            );
        }
        for line in &contents.unreadable {
            out.push_str(line);
            out.push('\n');
        }
        let mut file = fs::File::create(&tmp)?;
        file.write_all(out.as_bytes())?;
        file.sync_all()?;
        Ok(tmp)
    }
}

/// Playlist names map straight to file names.
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A playlist file split into decoded songs and the raw lines that failed.
struct PlaylistFile {
    songs: Vec<PlaylistSong>,
    unreadable: Vec<String>,
}

fn read_file(path: &Path) -> Result<PlaylistFile> {
    let raw = fs::read_to_string(path)?;
    let mut contents = PlaylistFile {
        songs: Vec::new(),
        unreadable: Vec::new(),
    };
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<PlaylistSong>(line) {
            Ok(song) => contents.songs.push(song),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable playlist line");
                contents.unreadable.push(line.to_string());
            }
        }
    }
    Ok(contents)
}

fn read_songs(path: &Path) -> Result<Vec<PlaylistSong>> {
    Ok(read_file(path)?.songs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, PlaylistStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PlaylistStore::open(dir.path().join("playlists")).unwrap();
        (dir, store)
    }

    fn song(title: &str, reference: &str) -> PlaylistSong {
        PlaylistSong {
            title: title.into(),
            reference: reference.into(),
            duration: "3:00".into(),
        }
    }

    #[test]
    fn road_trip_scenario() {
        let (_dir, store) = store();
        assert!(store.list_all().unwrap().is_empty());
        assert!(store.create("Road Trip").unwrap());
        assert!(!store.create("Road Trip").unwrap());

        let a = song("A", "u1");
        assert!(store.add("Road Trip", &a).unwrap());
        let songs = store.songs_of("Road Trip").unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "A");

        assert!(!store.add("Road Trip", &song("A again", "u1")).unwrap());
        store.remove_at("Road Trip", 0).unwrap();
        assert!(store.songs_of("Road Trip").unwrap().is_empty());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let (_dir, store) = store();
        store.create("p").unwrap();
        for (t, r) in [("a", "1"), ("b", "2"), ("c", "3")] {
            store.add("p", &song(t, r)).unwrap();
        }
        let removed = store.remove_at("p", 1).unwrap();
        assert_eq!(removed.title, "b");
        let titles: Vec<_> = store
            .songs_of("p")
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["a", "c"]);
    }

    #[test]
    fn remove_out_of_range_leaves_file_alone() {
        let (_dir, store) = store();
        store.create("p").unwrap();
        store.add("p", &song("a", "1")).unwrap();
        let err = store.remove_at("p", 5).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 5, len: 1 }));
        assert_eq!(store.count("p").unwrap(), 1);
    }

    #[test]
    fn duplicate_reference_is_rejected_even_with_new_title() {
        let (_dir, store) = store();
        store.create("p").unwrap();
        store.add("p", &song("first", "u")).unwrap();
        assert!(!store.add("p", &song("second", "u")).unwrap());
        assert_eq!(store.songs_of("p").unwrap(), vec![song("first", "u")]);
    }

    #[test]
    fn titles_with_pipes_and_quotes_survive() {
        let (_dir, store) = store();
        store.create("p").unwrap();
        let odd = song("Live | \"Encore\" | 2001", "https://x/watch?v=1");
        store.add("p", &odd).unwrap();
        assert_eq!(store.songs_of("p").unwrap(), vec![odd]);
    }

    #[test]
    fn move_song_success_and_rejection() {
        let (_dir, store) = store();
        store.create("src").unwrap();
        store.create("dest").unwrap();
        store.add("src", &song("a", "1")).unwrap();
        store.add("src", &song("b", "2")).unwrap();
        store.add("dest", &song("b elsewhere", "2")).unwrap();

        assert!(store.move_song("src", 0, "dest").unwrap());
        assert_eq!(store.songs_of("src").unwrap(), vec![song("b", "2")]);
        assert!(store.songs_of("dest").unwrap().contains(&song("a", "1")));

        // "2" already in dest: source untouched.
        assert!(!store.move_song("src", 0, "dest").unwrap());
        assert_eq!(store.songs_of("src").unwrap(), vec![song("b", "2")]);
        assert_eq!(store.count("dest").unwrap(), 2);
    }

    #[test]
    fn list_all_counts_and_sorts() {
        let (_dir, store) = store();
        store.create("zeta").unwrap();
        store.create("alpha").unwrap();
        store.add("zeta", &song("a", "1")).unwrap();
        store.add("zeta", &song("b", "2")).unwrap();
        fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(
            all,
            vec![
                Playlist { name: "alpha".into(), song_count: 0 },
                Playlist { name: "zeta".into(), song_count: 2 },
            ]
        );
    }

    #[test]
    fn rename_rules() {
        let (_dir, store) = store();
        store.create("a").unwrap();
        store.create("b").unwrap();
        assert!(!store.rename("missing", "c").unwrap());
        assert!(!store.rename("a", "b").unwrap());
        assert!(store.rename("a", "c").unwrap());
        let names: Vec<_> = store.list_all().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, store) = store();
        store.create("a").unwrap();
        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert!(matches!(store.songs_of("a"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn names_that_escape_the_directory_are_rejected() {
        let (_dir, store) = store();
        for bad in ["", "  ", "../x", "a/b", ".hidden", " padded"] {
            assert!(
                matches!(store.create(bad), Err(StoreError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let (_dir, store) = store();
        store.create("p").unwrap();
        store.add("p", &song("a", "1")).unwrap();
        let path = store.dir().join("p.jsonl");
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push_str("not json\n\n");
        fs::write(&path, raw).unwrap();
        assert_eq!(store.count("p").unwrap(), 1);
    }

    #[test]
    fn rewrites_keep_unreadable_lines() {
        let (_dir, store) = store();
        store.create("p").unwrap();
        store.create("q").unwrap();
        for (t, r) in [("a", "1"), ("b", "2"), ("c", "3")] {
            store.add("p", &song(t, r)).unwrap();
        }
        let path = store.dir().join("p.jsonl");
        let mut raw = fs::read_to_string(&path).unwrap();
        raw.push_str("{\"title\": \"half\"\n");
        fs::write(&path, raw).unwrap();

        store.remove_at("p", 0).unwrap();
        assert!(store.move_song("p", 0, "q").unwrap());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.lines().any(|l| l == "{\"title\": \"half\""));
        let titles: Vec<_> = store
            .songs_of("p")
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, ["c"]);
        assert_eq!(store.count("q").unwrap(), 1);
    }
}
