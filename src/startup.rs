//! Command-line inputs handed to the player before the UI starts.

use crate::player::{LoadMode, MpvHandle};
use crate::remote;
use crate::storage::CacheHandle;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupInput {
    Remote(String),
    Local(PathBuf),
    Missing(String),
}

pub fn classify(arg: &str) -> StartupInput {
    if remote::is_remote(arg) {
        return StartupInput::Remote(arg.to_string());
    }
    let path = Path::new(arg);
    if path.exists() {
        StartupInput::Local(path.to_path_buf())
    } else {
        StartupInput::Missing(arg.to_string())
    }
}

/// Title shown for a startup input before the player reports its own.
pub fn display_title(input: &StartupInput) -> String {
    match input {
        StartupInput::Local(p) => p
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string()),
        StartupInput::Remote(s) | StartupInput::Missing(s) => s.clone(),
    }
}

#[derive(Debug, Default)]
pub struct StartupReport {
    /// Titles the player accepted, in order.
    pub loaded: Vec<String>,
    pub warnings: Vec<String>,
}

/// The first usable input replaces the player's playlist, the rest are
/// appended.
pub async fn open_inputs(mpv: &MpvHandle, cache: &CacheHandle, args: &[String]) -> StartupReport {
    let mut report = StartupReport::default();
    let mut playable = Vec::new();

    for arg in args {
        let input = classify(arg);
        match &input {
            StartupInput::Remote(url) => match remote::resolve_stream(cache, url).await {
                Ok(stream) => playable.push((display_title(&input), stream)),
                Err(e) => {
                    tracing::warn!(input = %url, error = %e, "startup resolve failed");
                    report.warnings.push(format!("Failed: {url}"));
                }
            },
            StartupInput::Local(path) => playable.push((display_title(&input), path.display().to_string())),
            StartupInput::Missing(arg) => report.warnings.push(format!("Not Found: {arg}")),
        }
    }

    for (title, stream) in playable {
        let mode = if report.loaded.is_empty() {
            LoadMode::Replace
        } else {
            LoadMode::AppendPlay
        };
        match mpv.load(&stream, mode).await {
            Ok(()) => report.loaded.push(title),
            Err(e) => report.warnings.push(format!("Load Error: {e:#}")),
        }
    }

    if !report.loaded.is_empty()
        && let Err(e) = mpv.play().await
    {
        report.warnings.push(format!("Load Error: {e:#}"));
    }
    report
}
