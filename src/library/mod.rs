//! Local library browsing: one directory at a time, audio files only.

use anyhow::Context;
use lofty::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "wav", "flac", "m4a", "ogg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryItem {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// `m:ss`, files only, when the container could be read.
    pub duration: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl LibraryItem {
    /// Tag title, else the file name without extension.
    pub fn display_title(&self) -> String {
        if let Some(t) = &self.title {
            return t.clone();
        }
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
            .to_string()
    }
}

/// List `dir`: sub-directories first, then audio files, each group sorted by
/// name (byte order, so case-sensitive).
pub fn list_directory(dir: &Path) -> anyhow::Result<Vec<LibraryItem>> {
    let entries = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            dirs.push(LibraryItem {
                name,
                path,
                is_dir: true,
                duration: None,
                title: None,
                artist: None,
            });
        } else if is_audio_file(&path) {
            files.push(read_file_item(name, path));
        }
    }

    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));
    dirs.extend(files);
    Ok(dirs)
}

/// Parent of `current`, unless `current` is already `root` (or outside it).
pub fn parent_within(root: &Path, current: &Path) -> Option<PathBuf> {
    if current == root || !current.starts_with(root) {
        return None;
    }
    current.parent().map(Path::to_path_buf)
}

pub fn format_duration(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn read_file_item(name: String, path: PathBuf) -> LibraryItem {
    let mut item = LibraryItem {
        name,
        path,
        is_dir: false,
        duration: None,
        title: None,
        artist: None,
    };

    match lofty::read_from_path(&item.path) {
        Ok(tagged) => {
            item.duration = Some(format_duration(tagged.properties().duration().as_secs()));
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                item.title = tag.title().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
                item.artist = tag.artist().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            }
        }
        Err(e) => tracing::debug!(path = %item.path.display(), error = %e, "no tags"),
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_first_then_files_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("beta")).unwrap();
        fs::create_dir(dir.path().join("Alpha")).unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("b.mp3"), b"").unwrap();
        fs::write(dir.path().join("B.FLAC"), b"").unwrap();
        fs::write(dir.path().join("a.ogg"), b"").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"").unwrap();

        let items = list_directory(dir.path()).unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "beta", "B.FLAC", "a.ogg", "b.mp3"]);
        assert!(items[0].is_dir && items[1].is_dir);
        assert!(items[2..].iter().all(|i| !i.is_dir));
    }

    #[test]
    fn unreadable_audio_still_listed_without_duration() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.wav"), b"not audio").unwrap();
        let items = list_directory(dir.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].duration, None);
        assert_eq!(items[0].display_title(), "broken");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_directory(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn parent_stops_at_root() {
        let root = Path::new("/music");
        assert_eq!(parent_within(root, root), None);
        assert_eq!(
            parent_within(root, Path::new("/music/jazz")),
            Some(PathBuf::from("/music"))
        );
        assert_eq!(parent_within(root, Path::new("/elsewhere")), None);
    }

    #[test]
    fn durations_are_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "60:00");
    }
}
