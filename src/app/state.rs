use super::actions::{Action, Effect, PlayOrigin, PlayRequest};
use crate::autoplay::{Autoplay, QueueEntry, QueueKind, Step};
use crate::library::{self, LibraryItem};
use crate::lyrics::{self, LyricsData};
use crate::player::PlayerSnapshot;
use crate::playlist::{Playlist, PlaylistSong};
use crate::remote::SearchResult;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const VOLUME_STEP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Intro,
    Playback,
    LibraryBrowser,
    SearchInput,
    SearchResults,
    PlaylistBrowser,
    PlaylistView,
    PlaylistSelectForAdd,
    LyricsView,
}

impl AppMode {
    pub fn title(self) -> &'static str {
        match self {
            AppMode::Intro => "Welcome",
            AppMode::Playback => "Now Playing",
            AppMode::LibraryBrowser => "Library",
            AppMode::SearchInput => "Search",
            AppMode::SearchResults => "Search Results",
            AppMode::PlaylistBrowser => "Playlists",
            AppMode::PlaylistView => "Playlist",
            AppMode::PlaylistSelectForAdd => "Add to Playlist",
            AppMode::LyricsView => "Lyrics",
        }
    }
}

/// The active screen plus whatever state only that screen needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Intro,
    Playback,
    LibraryBrowser,
    SearchInput,
    SearchResults,
    PlaylistBrowser { prompt: Option<Prompt> },
    PlaylistView { name: String },
    PlaylistSelectForAdd { pending: PendingSong, prompt: Option<Prompt> },
    LyricsView,
}

impl Mode {
    pub fn kind(&self) -> AppMode {
        match self {
            Mode::Intro => AppMode::Intro,
            Mode::Playback => AppMode::Playback,
            Mode::LibraryBrowser => AppMode::LibraryBrowser,
            Mode::SearchInput => AppMode::SearchInput,
            Mode::SearchResults => AppMode::SearchResults,
            Mode::PlaylistBrowser { .. } => AppMode::PlaylistBrowser,
            Mode::PlaylistView { .. } => AppMode::PlaylistView,
            Mode::PlaylistSelectForAdd { .. } => AppMode::PlaylistSelectForAdd,
            Mode::LyricsView => AppMode::LyricsView,
        }
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            Mode::PlaylistBrowser { prompt } | Mode::PlaylistSelectForAdd { prompt, .. } => prompt.as_ref(),
            _ => None,
        }
    }

    fn prompt_slot(&mut self) -> Option<&mut Option<Prompt>> {
        match self {
            Mode::PlaylistBrowser { prompt } | Mode::PlaylistSelectForAdd { prompt, .. } => Some(prompt),
            _ => None,
        }
    }
}

/// Inline playlist-name editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub purpose: PromptPurpose,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    Create,
    Rename { from: String },
}

impl Prompt {
    pub fn label(&self) -> String {
        match &self.purpose {
            PromptPurpose::Create => "New playlist name".to_string(),
            PromptPurpose::Rename { from } => format!("Rename '{from}' to"),
        }
    }
}

/// Song waiting for a destination playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSong {
    pub song: PlaylistSong,
    pub origin: AddOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOrigin {
    /// Copy of a search result at `index`.
    SearchResults { index: usize },
    /// Move out of `playlist` at `index`.
    Playlist { playlist: String, index: usize },
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            created_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

pub struct AppState {
    pub should_quit: bool,

    pub mode: Mode,
    pub selected: usize,
    pub scroll: usize,
    /// Rows available to the current list, updated by the renderer.
    pub list_height: usize,
    /// Bumped on every mode change; results tagged with an older epoch are dropped.
    pub epoch: u64,

    // Library
    pub library_root: PathBuf,
    pub library_path: PathBuf,
    pub library_items: Vec<LibraryItem>,

    // Search
    pub search_query: String,
    pub search_results: Vec<SearchResult>,
    pub searching: bool,

    // Playlists
    pub playlists: Vec<Playlist>,
    pub playlist_songs: Vec<PlaylistSong>,

    // Playback
    pub now_playing: Option<String>,
    pub playing_playlist: Option<String>,
    /// Playable form of the current track, for replay.
    pub last_loaded: Option<String>,
    /// Sequence number of the user pick being resolved.
    pub pending_load: Option<u64>,
    load_seq: u64,
    pub player: PlayerSnapshot,
    pub autoplay: Autoplay,
    pub seek_seconds: f64,

    // Lyrics
    pub lyrics: Option<LyricsData>,
    /// Title the shown (or awaited) lyrics belong to.
    pub lyrics_key: Option<String>,
    pub lyrics_loading: bool,
    pub lyrics_offset: usize,
    pub lyrics_auto_scroll: bool,
    pub lyrics_height: usize,

    pub toast: Option<Toast>,
    pub status_ttl: Duration,
}

impl AppState {
    pub fn new(library_root: PathBuf, autoplay: bool, seek_seconds: f64, status_ttl: Duration) -> Self {
        Self {
            should_quit: false,
            mode: Mode::Intro,
            selected: 0,
            scroll: 0,
            list_height: 0,
            epoch: 0,
            library_path: library_root.clone(),
            library_root,
            library_items: Vec::new(),
            search_query: String::new(),
            search_results: Vec::new(),
            searching: false,
            playlists: Vec::new(),
            playlist_songs: Vec::new(),
            now_playing: None,
            playing_playlist: None,
            last_loaded: None,
            pending_load: None,
            load_seq: 0,
            player: PlayerSnapshot::default(),
            autoplay: Autoplay::new(autoplay),
            seek_seconds,
            lyrics: None,
            lyrics_key: None,
            lyrics_loading: false,
            lyrics_offset: 0,
            lyrics_auto_scroll: true,
            lyrics_height: 0,
            toast: None,
            status_ttl,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.set_mode_seeded(mode, 0);
    }

    /// Enter `mode` with `selected` pre-set (clamped to the list).
    pub fn set_mode_seeded(&mut self, mode: Mode, selected: usize) {
        tracing::debug!(from = ?self.mode.kind(), to = ?mode.kind(), "mode change");
        self.mode = mode;
        self.epoch += 1;
        self.pending_load = None;
        self.searching = false;
        self.selected = 0;
        self.scroll = 0;
        if selected > 0 {
            self.selected = selected;
            self.clamp_selection();
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::info(message));
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "status error");
        self.toast = Some(Toast::error(message));
    }

    pub fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(self.status_ttl)) {
            self.toast = None;
        }
    }

    pub fn list_len(&self) -> usize {
        match self.mode.kind() {
            AppMode::LibraryBrowser => self.library_items.len(),
            AppMode::SearchResults => self.search_results.len(),
            AppMode::PlaylistBrowser | AppMode::PlaylistSelectForAdd => self.playlists.len(),
            AppMode::PlaylistView => self.playlist_songs.len(),
            _ => 0,
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.update_scroll();
    }

    fn select_next(&mut self) {
        let len = self.list_len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
        self.update_scroll();
    }

    pub fn clamp_selection(&mut self) {
        let len = self.list_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.update_scroll();
    }

    pub fn update_scroll(&mut self) {
        let visible = self.list_height;
        if visible == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
    }

    /// Pure transition function: mutate state for `action` and name the side
    /// effect, if any, for the app to run.
    pub fn reduce(&mut self, action: Action) -> Option<Effect> {
        if self.mode.prompt().is_some() {
            return self.on_prompt(action);
        }
        match self.mode.kind() {
            AppMode::Intro => self.on_intro(action),
            AppMode::Playback | AppMode::LyricsView => self.on_playback(action),
            AppMode::LibraryBrowser => self.on_library(action),
            AppMode::SearchInput => self.on_search_input(action),
            AppMode::SearchResults => self.on_search_results(action),
            AppMode::PlaylistBrowser => self.on_playlist_browser(action),
            AppMode::PlaylistView => self.on_playlist_view(action),
            AppMode::PlaylistSelectForAdd => self.on_select_for_add(action),
        }
    }

    fn common(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Back => {
                self.set_mode(Mode::Playback);
                None
            }
            Action::ListUp => {
                self.select_prev();
                None
            }
            Action::ListDown => {
                self.select_next();
                None
            }
            Action::OpenLibrary => {
                self.set_mode(Mode::LibraryBrowser);
                Some(Effect::ListDirectory(self.library_path.clone()))
            }
            Action::OpenSearch | Action::NewSearch => {
                self.search_query.clear();
                self.set_mode(Mode::SearchInput);
                None
            }
            Action::OpenPlaylists => {
                self.set_mode(Mode::PlaylistBrowser { prompt: None });
                Some(Effect::LoadPlaylists)
            }
            Action::OpenLyrics => {
                self.set_mode(Mode::LyricsView);
                None
            }
            Action::ShowQueue => self.show_queue(),
            Action::TogglePause => Some(Effect::TogglePause),
            Action::SeekForward => Some(Effect::Seek(self.seek_seconds)),
            Action::SeekBack => Some(Effect::Seek(-self.seek_seconds)),
            Action::VolumeUp => {
                self.player.volume = self.player.volume.saturating_add(VOLUME_STEP).min(100);
                Some(Effect::SetVolume(self.player.volume))
            }
            Action::VolumeDown => {
                self.player.volume = self.player.volume.min(100).saturating_sub(VOLUME_STEP);
                Some(Effect::SetVolume(self.player.volume))
            }
            Action::ToggleAutoplay => {
                let on = self.autoplay.toggle();
                self.notify(if on { "Autoplay: ON" } else { "Autoplay: OFF" });
                None
            }
            Action::Replay => match self.last_loaded.clone() {
                Some(reference) => {
                    self.notify("Replaying...");
                    Some(Effect::Replay(reference))
                }
                None => {
                    self.notify("Nothing to replay.");
                    None
                }
            },
            _ => None,
        }
    }

    fn on_intro(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Activate => self.common(Action::OpenLibrary),
            Action::Back => self.common(Action::Quit),
            other => self.common(other),
        }
    }

    fn on_playback(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Back if self.mode == Mode::Playback => self.common(Action::Quit),
            Action::ListUp => {
                self.lyrics_offset = self.lyrics_offset.saturating_sub(1);
                self.lyrics_auto_scroll = false;
                None
            }
            Action::ListDown => {
                self.lyrics_offset += 1;
                self.lyrics_auto_scroll = false;
                None
            }
            Action::RecenterLyrics => {
                self.lyrics_auto_scroll = true;
                self.sync_lyrics();
                None
            }
            other => self.common(other),
        }
    }

    fn on_library(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Activate => {
                let item = self.library_items.get(self.selected)?.clone();
                if item.is_dir {
                    Some(Effect::ListDirectory(item.path))
                } else {
                    Some(Effect::PlayLocal(item))
                }
            }
            Action::ParentDir => {
                library::parent_within(&self.library_root, &self.library_path).map(Effect::ListDirectory)
            }
            other => self.common(other),
        }
    }

    fn on_search_input(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::InputChar(c) => {
                if !c.is_control() {
                    self.search_query.push(c);
                }
                None
            }
            Action::Backspace => {
                self.search_query.pop();
                None
            }
            Action::Activate => {
                let query = self.search_query.trim().to_string();
                if query.is_empty() {
                    return None;
                }
                self.set_mode(Mode::SearchResults);
                self.search_results.clear();
                self.searching = true;
                self.notify("Searching...");
                Some(Effect::Search {
                    query,
                    epoch: self.epoch,
                })
            }
            Action::Back | Action::Quit => self.common(action),
            _ => None,
        }
    }

    fn on_search_results(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Activate => {
                self.search_results.get(self.selected)?;
                let queue = self
                    .search_results
                    .iter()
                    .map(|r| QueueEntry {
                        title: r.title.clone(),
                        reference: r.reference.clone(),
                    })
                    .collect();
                Some(self.request_play(queue, self.selected, QueueKind::SearchResults))
            }
            Action::AddSelectedToPlaylist => {
                let r = self.search_results.get(self.selected)?;
                let pending = PendingSong {
                    song: PlaylistSong {
                        title: r.title.clone(),
                        reference: r.reference.clone(),
                        duration: r.duration.clone(),
                    },
                    origin: AddOrigin::SearchResults { index: self.selected },
                };
                self.set_mode(Mode::PlaylistSelectForAdd { pending, prompt: None });
                Some(Effect::LoadPlaylists)
            }
            other => self.common(other),
        }
    }

    fn on_playlist_browser(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Activate => {
                let name = self.playlists.get(self.selected)?.name.clone();
                Some(Effect::OpenPlaylist { name, select: 0 })
            }
            Action::NewPlaylist => {
                self.open_prompt(PromptPurpose::Create);
                None
            }
            Action::RenameSelectedPlaylist => {
                let from = self.playlists.get(self.selected)?.name.clone();
                self.open_prompt(PromptPurpose::Rename { from });
                None
            }
            Action::DeleteSelected => {
                let name = self.playlists.get(self.selected)?.name.clone();
                Some(Effect::DeletePlaylist(name))
            }
            other => self.common(other),
        }
    }

    fn on_playlist_view(&mut self, action: Action) -> Option<Effect> {
        let Mode::PlaylistView { name } = &self.mode else {
            return None;
        };
        let name = name.clone();
        match action {
            Action::Activate => {
                self.playlist_songs.get(self.selected)?;
                let queue = self.playlist_songs.iter().map(entry_of).collect();
                Some(self.request_play(queue, self.selected, QueueKind::Playlist(name)))
            }
            Action::DeleteSelected => {
                self.playlist_songs.get(self.selected)?;
                Some(Effect::RemoveSong {
                    playlist: name,
                    index: self.selected,
                })
            }
            Action::MoveSelectedSong => {
                let song = self.playlist_songs.get(self.selected)?.clone();
                let pending = PendingSong {
                    song,
                    origin: AddOrigin::Playlist {
                        playlist: name,
                        index: self.selected,
                    },
                };
                self.set_mode(Mode::PlaylistSelectForAdd { pending, prompt: None });
                Some(Effect::LoadPlaylists)
            }
            Action::Back => {
                self.set_mode(Mode::PlaylistBrowser { prompt: None });
                Some(Effect::LoadPlaylists)
            }
            other => self.common(other),
        }
    }

    fn on_select_for_add(&mut self, action: Action) -> Option<Effect> {
        let Mode::PlaylistSelectForAdd { pending, .. } = &self.mode else {
            return None;
        };
        let pending = pending.clone();
        match action {
            Action::Activate => {
                let target = self.playlists.get(self.selected)?.name.clone();
                Some(match pending.origin {
                    AddOrigin::SearchResults { .. } => Effect::AddSong {
                        playlist: target,
                        song: pending.song,
                    },
                    AddOrigin::Playlist { playlist, index } => Effect::MoveSong {
                        from: playlist,
                        index,
                        to: target,
                    },
                })
            }
            Action::NewPlaylist => {
                self.open_prompt(PromptPurpose::Create);
                None
            }
            Action::Back => {
                self.leave_select_for_add();
                None
            }
            other => self.common(other),
        }
    }

    fn on_prompt(&mut self, action: Action) -> Option<Effect> {
        let slot = self.mode.prompt_slot()?;
        match action {
            Action::InputChar(c) => {
                if let Some(p) = slot.as_mut()
                    && !c.is_control()
                {
                    p.buffer.push(c);
                }
                None
            }
            Action::Backspace => {
                if let Some(p) = slot.as_mut() {
                    p.buffer.pop();
                }
                None
            }
            Action::Back => {
                *slot = None;
                None
            }
            Action::Activate => {
                let prompt = slot.take()?;
                let name = prompt.buffer.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                match prompt.purpose {
                    PromptPurpose::Create => Some(Effect::CreatePlaylist(name)),
                    PromptPurpose::Rename { from } if from == name => None,
                    PromptPurpose::Rename { from } => Some(Effect::RenamePlaylist { from, to: name }),
                }
            }
            Action::Quit => self.common(Action::Quit),
            _ => None,
        }
    }

    fn open_prompt(&mut self, purpose: PromptPurpose) {
        if let Some(slot) = self.mode.prompt_slot() {
            *slot = Some(Prompt {
                purpose,
                buffer: String::new(),
            });
        }
    }

    /// Back to wherever the pending song came from, on the same row.
    pub fn leave_select_for_add(&mut self) {
        let Mode::PlaylistSelectForAdd { pending, .. } = &self.mode else {
            return;
        };
        match pending.origin.clone() {
            AddOrigin::SearchResults { index } => self.set_mode_seeded(Mode::SearchResults, index),
            AddOrigin::Playlist { playlist, index } => {
                self.set_mode_seeded(Mode::PlaylistView { name: playlist }, index)
            }
        }
    }

    fn show_queue(&mut self) -> Option<Effect> {
        if let Some(name) = self.playing_playlist.clone() {
            let select = match self.autoplay.kind() {
                Some(QueueKind::Playlist(n)) if *n == name => self.autoplay.current_index().unwrap_or(0),
                _ => 0,
            };
            return Some(Effect::OpenPlaylist { name, select });
        }
        if !self.search_results.is_empty() {
            let select = match self.autoplay.kind() {
                Some(QueueKind::SearchResults) => self.autoplay.current_index().unwrap_or(0),
                _ => 0,
            };
            self.set_mode_seeded(Mode::SearchResults, select);
            return None;
        }
        self.notify("Not playing from a playlist.");
        None
    }

    fn request_play(&mut self, queue: Vec<QueueEntry>, index: usize, kind: QueueKind) -> Effect {
        self.load_seq += 1;
        self.pending_load = Some(self.load_seq);
        self.notify("Resolving...");
        Effect::Play(PlayRequest {
            entry: queue[index].clone(),
            index,
            kind,
            origin: PlayOrigin::User {
                epoch: self.epoch,
                seq: self.load_seq,
                queue,
            },
        })
    }

    /// One autoplay check; called from the tick only.
    pub fn tick_autoplay(&mut self) -> Option<Effect> {
        let idle = self.player.settled_idle() && self.pending_load.is_none();
        match self.autoplay.poll(idle)? {
            Step::Advance {
                token,
                index,
                kind,
                entry,
            } => Some(Effect::Play(PlayRequest {
                entry,
                index,
                kind,
                origin: PlayOrigin::Autoplay { token },
            })),
            Step::EndOfQueue(kind) => {
                self.notify(kind.end_message());
                None
            }
        }
    }

    /// Whether a finished resolve still matters.
    pub fn is_request_current(&self, request: &PlayRequest) -> bool {
        match &request.origin {
            PlayOrigin::User { epoch, seq, .. } => self.pending_load == Some(*seq) && self.epoch == *epoch,
            PlayOrigin::Autoplay { token } => self.autoplay.is_current(*token),
        }
    }

    /// The engine accepted `stream` for `request`.
    pub fn play_started(&mut self, request: PlayRequest, stream: String) {
        self.now_playing = Some(request.entry.title.clone());
        self.last_loaded = Some(stream);
        self.player.awaiting_load = true;
        match request.origin {
            PlayOrigin::User { queue, .. } => {
                self.playing_playlist = match &request.kind {
                    QueueKind::Playlist(name) => Some(name.clone()),
                    QueueKind::SearchResults => None,
                };
                self.autoplay.start(request.kind, request.index, queue);
                self.toast = None;
                self.set_mode(Mode::Playback);
            }
            PlayOrigin::Autoplay { token } => {
                self.autoplay.advanced(token, request.index);
                self.notify(format!("Autoplaying next: {}", request.entry.title));
            }
        }
    }

    pub fn play_failed(&mut self, request: &PlayRequest, error: &str) {
        match request.origin {
            PlayOrigin::User { .. } => {
                self.pending_load = None;
                self.notify_error(format!("Cannot play: {error}"));
            }
            PlayOrigin::Autoplay { token } => {
                self.autoplay.failed(token);
                self.notify_error(format!("Autoplay failed: {error}"));
            }
        }
    }

    pub fn local_started(&mut self, item: &LibraryItem) {
        self.now_playing = Some(item.display_title());
        self.last_loaded = Some(item.path.display().to_string());
        self.player.awaiting_load = true;
        self.playing_playlist = None;
        self.autoplay.clear();
        self.toast = None;
        self.set_mode(Mode::Playback);
    }

    /// Library listing for `path` arrived.
    pub fn show_directory(&mut self, path: PathBuf, items: Vec<LibraryItem>) {
        self.library_path = path;
        self.library_items = items;
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn apply_search_results(&mut self, epoch: u64, results: Vec<SearchResult>) -> bool {
        if epoch != self.epoch || self.mode != Mode::SearchResults {
            return false;
        }
        self.searching = false;
        self.search_results = results;
        self.selected = 0;
        self.scroll = 0;
        if self.search_results.is_empty() {
            self.notify("No results found.");
        } else {
            self.toast = None;
        }
        true
    }

    pub fn apply_search_failure(&mut self, epoch: u64, error: &str) -> bool {
        if epoch != self.epoch || self.mode != Mode::SearchResults {
            return false;
        }
        self.searching = false;
        self.notify_error(format!("Search failed: {error}"));
        true
    }

    pub fn show_playlists(&mut self, playlists: Vec<Playlist>) {
        self.playlists = playlists;
        self.clamp_selection();
    }

    /// Append a freshly created playlist to the listing and select it.
    pub fn playlist_created(&mut self, name: String) {
        self.playlists.push(Playlist { name, song_count: 0 });
        if matches!(self.mode.kind(), AppMode::PlaylistBrowser | AppMode::PlaylistSelectForAdd) {
            self.selected = self.playlists.len() - 1;
            self.update_scroll();
        }
        self.notify("Playlist created.");
    }

    pub fn playlist_deleted(&mut self, name: &str) {
        self.playlists.retain(|p| p.name != name);
        self.clamp_selection();
        if self.playing_playlist.as_deref() == Some(name) {
            self.playing_playlist = None;
        }
        if self.autoplay.kind() == Some(&QueueKind::Playlist(name.to_string())) {
            self.autoplay.clear();
        }
        self.notify("Playlist deleted.");
    }

    pub fn playlist_renamed(&mut self, from: &str, to: &str, playlists: Vec<Playlist>) {
        self.playlists = playlists;
        if let Some(i) = self.playlists.iter().position(|p| p.name == to) {
            self.selected = i;
        }
        self.clamp_selection();
        if self.playing_playlist.as_deref() == Some(from) {
            self.playing_playlist = Some(to.to_string());
        }
        self.autoplay.rename_playlist(from, to);
        self.notify("Playlist renamed.");
    }

    /// Enter the song list of `name`.
    pub fn show_playlist(&mut self, name: String, songs: Vec<PlaylistSong>, select: usize) {
        self.autoplay.sync_entries(&QueueKind::Playlist(name.clone()), songs.iter().map(entry_of).collect());
        self.playlist_songs = songs;
        self.set_mode_seeded(Mode::PlaylistView { name }, select);
    }

    /// Songs of `name` changed on disk; refresh the view if it is open.
    pub fn refresh_playlist(&mut self, name: &str, songs: Vec<PlaylistSong>) {
        self.autoplay.sync_entries(&QueueKind::Playlist(name.to_string()), songs.iter().map(entry_of).collect());
        if matches!(&self.mode, Mode::PlaylistView { name: open } if open == name) {
            self.playlist_songs = songs;
            self.clamp_selection();
        }
    }

    pub fn lyrics_requested(&mut self, title: &str) {
        self.lyrics = None;
        self.lyrics_key = Some(title.to_string());
        self.lyrics_loading = true;
        self.lyrics_offset = 0;
        self.lyrics_auto_scroll = true;
    }

    /// Drop lyrics for anything but the latest request.
    pub fn lyrics_ready(&mut self, title: &str, lyrics: LyricsData) -> bool {
        if self.lyrics_key.as_deref() != Some(title) {
            return false;
        }
        self.lyrics = Some(lyrics);
        self.lyrics_loading = false;
        self.sync_lyrics();
        true
    }

    pub fn active_lyric(&self) -> Option<usize> {
        let l = self.lyrics.as_ref().filter(|l| l.has_synced)?;
        lyrics::active_line_index(l, self.player.position)
    }

    /// Keep the active line centered while auto-scroll is on.
    pub fn sync_lyrics(&mut self) {
        if !self.lyrics_auto_scroll {
            return;
        }
        if let Some(active) = self.active_lyric() {
            self.lyrics_offset = lyrics::auto_scroll_offset(active, self.lyrics_height);
        }
    }
}

fn entry_of(song: &PlaylistSong) -> QueueEntry {
    QueueEntry {
        title: song.title.clone(),
        reference: song.reference.clone(),
    }
}
