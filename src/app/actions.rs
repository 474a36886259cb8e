use crate::autoplay::{QueueEntry, QueueKind};
use crate::library::LibraryItem;
use crate::playlist::PlaylistSong;
use std::path::PathBuf;

/// What a key press means in the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,

    ListUp,
    ListDown,
    Activate,
    ParentDir,

    OpenLibrary,
    OpenSearch,
    OpenPlaylists,
    OpenLyrics,
    ShowQueue,
    NewSearch,

    /// Text entry: the search box or an open name prompt.
    InputChar(char),
    Backspace,

    AddSelectedToPlaylist,
    MoveSelectedSong,
    NewPlaylist,
    RenameSelectedPlaylist,
    DeleteSelected,

    RecenterLyrics,

    TogglePause,
    SeekForward,
    SeekBack,
    VolumeUp,
    VolumeDown,
    ToggleAutoplay,
    Replay,
}

/// Side effects requested by a state transition. The app executes them and
/// feeds the outcome back into the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ListDirectory(PathBuf),
    PlayLocal(LibraryItem),
    Search { query: String, epoch: u64 },
    Play(PlayRequest),
    LoadPlaylists,
    OpenPlaylist { name: String, select: usize },
    CreatePlaylist(String),
    RenamePlaylist { from: String, to: String },
    DeletePlaylist(String),
    RemoveSong { playlist: String, index: usize },
    AddSong { playlist: String, song: PlaylistSong },
    MoveSong { from: String, index: usize, to: String },
    TogglePause,
    Seek(f64),
    SetVolume(u8),
    Replay(String),
}

/// Resolve `entry` and start it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub entry: QueueEntry,
    pub index: usize,
    pub kind: QueueKind,
    pub origin: PlayOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayOrigin {
    /// Picked from a list. Dropped if the mode changed (`epoch`) or a newer
    /// pick superseded it (`seq`).
    User {
        epoch: u64,
        seq: u64,
        queue: Vec<QueueEntry>,
    },
    /// Issued by the autoplay engine under `token`.
    Autoplay { token: u64 },
}
