use super::actions::PlayRequest;
use crate::lyrics::LyricsData;
use crate::remote::SearchResult;
use std::collections::HashMap;

#[derive(Debug)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Network(NetworkEvent),
    Tick,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    /// Only wakes the loop so the next frame uses the new size.
    Resize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Position(f64),
    Duration(f64),
    Paused(bool),
    Idle(bool),
    Volume(u8),
    MediaTitle(Option<String>),
    Filename(Option<String>),
    Metadata(HashMap<String, String>),
    FileLoaded,
    /// The file being loaded could not be played.
    LoadFailed(String),
    /// A command was rejected; playback state is unaffected.
    Error(String),
}

#[derive(Debug)]
pub enum NetworkEvent {
    SearchResults {
        epoch: u64,
        query: String,
        results: Vec<SearchResult>,
    },
    SearchFailed {
        epoch: u64,
        error: String,
    },
    Resolved {
        request: PlayRequest,
        stream: String,
    },
    ResolveFailed {
        request: PlayRequest,
        error: String,
    },
    /// `title` is the lookup title the request was made for.
    LyricsLoaded {
        title: String,
        lyrics: Result<LyricsData, String>,
    },
}
