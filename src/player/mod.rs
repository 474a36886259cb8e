pub mod mpv;

pub use mpv::{LoadMode, MpvHandle};

use crate::app::events::PlayerEvent;
use std::collections::HashMap;

/// Last known engine state, fed by observed-property events.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub position: f64,
    pub duration: f64,
    pub paused: bool,
    pub idle: bool,
    pub volume: u8,
    pub media_title: Option<String>,
    pub filename: Option<String>,
    metadata: HashMap<String, String>,
    /// A `loadfile` was sent and mpv has not yet reported the outcome.
    pub awaiting_load: bool,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            position: 0.0,
            duration: 0.0,
            paused: false,
            idle: true,
            volume: 100,
            media_title: None,
            filename: None,
            metadata: HashMap::new(),
            awaiting_load: false,
        }
    }
}

impl PlayerSnapshot {
    pub fn apply(&mut self, ev: &PlayerEvent) {
        match ev {
            PlayerEvent::Position(s) => self.position = s.max(0.0),
            PlayerEvent::Duration(s) => self.duration = s.max(0.0),
            PlayerEvent::Paused(p) => self.paused = *p,
            PlayerEvent::Idle(i) => self.idle = *i,
            PlayerEvent::Volume(v) => self.volume = *v,
            PlayerEvent::MediaTitle(t) => self.media_title = t.clone(),
            PlayerEvent::Filename(f) => self.filename = f.clone(),
            PlayerEvent::Metadata(m) => self.metadata = m.clone(),
            PlayerEvent::FileLoaded => {
                self.awaiting_load = false;
                self.idle = false;
            }
            PlayerEvent::LoadFailed(_) => self.awaiting_load = false,
            PlayerEvent::Error(_) => {}
        }
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// What mpv calls the current file: its media title, else the filename.
    pub fn display_title(&self) -> Option<&str> {
        self.media_title.as_deref().or(self.filename.as_deref())
    }

    pub fn is_playing(&self) -> bool {
        !self.idle && !self.paused
    }

    /// Idle with nothing about to start: safe for autoplay to act on.
    pub fn settled_idle(&self) -> bool {
        self.idle && !self.awaiting_load
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_zeroes() {
        let s = PlayerSnapshot::default();
        assert!(s.idle);
        assert!(!s.is_playing());
        assert_eq!(s.position, 0.0);
        assert_eq!(s.duration, 0.0);
    }

    #[test]
    fn awaiting_load_masks_idle() {
        let mut s = PlayerSnapshot {
            awaiting_load: true,
            ..Default::default()
        };
        assert!(!s.settled_idle());
        s.apply(&PlayerEvent::FileLoaded);
        assert!(!s.awaiting_load);
        s.apply(&PlayerEvent::Idle(true));
        assert!(s.settled_idle());
    }

    #[test]
    fn failed_load_releases_the_load_guard() {
        let mut s = PlayerSnapshot {
            awaiting_load: true,
            ..Default::default()
        };
        s.apply(&PlayerEvent::LoadFailed("unrecognized file format".into()));
        assert!(s.settled_idle());
    }

    #[test]
    fn rejected_command_keeps_the_load_guard() {
        let mut s = PlayerSnapshot {
            awaiting_load: true,
            ..Default::default()
        };
        s.apply(&PlayerEvent::Error("mpv: error running command".into()));
        assert!(s.awaiting_load);
        assert!(!s.settled_idle());
    }

    #[test]
    fn display_title_falls_back_to_filename() {
        let mut s = PlayerSnapshot::default();
        assert_eq!(s.display_title(), None);
        s.apply(&PlayerEvent::Filename(Some("watch?v=abc".into())));
        assert_eq!(s.display_title(), Some("watch?v=abc"));
        s.apply(&PlayerEvent::MediaTitle(Some("Song".into())));
        assert_eq!(s.display_title(), Some("Song"));
    }

    #[test]
    fn metadata_lookup_ignores_case() {
        let mut s = PlayerSnapshot::default();
        s.apply(&PlayerEvent::Metadata(HashMap::from([(
            "Artist".to_string(),
            "Nina Simone".to_string(),
        )])));
        assert_eq!(s.metadata("artist"), Some("Nina Simone"));
        assert_eq!(s.metadata("ALBUM"), None);
    }
}
