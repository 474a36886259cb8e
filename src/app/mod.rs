pub mod actions;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::error::Error;
use crate::input;
use crate::library::{self, LibraryItem};
use crate::lyrics::{self, LrclibClient, LyricsData};
use crate::player::{LoadMode, MpvHandle};
use crate::playlist::{PlaylistStore, StoreError};
use crate::remote;
use crate::startup;
use crate::storage::CacheHandle;
use crate::tui::{self, TuiTerminal};
use actions::{Action, Effect, PlayRequest};
use anyhow::Context;
use events::{Event, NetworkEvent, PlayerEvent};
use state::{AppState, Mode};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct App {
    cfg: Config,
    config_path: PathBuf,
    state: AppState,
    store: PlaylistStore,
    lrclib: LrclibClient,
    cache: CacheHandle,
    mpv: MpvHandle,
    tx: mpsc::Sender<Event>,
    rx: Option<mpsc::Receiver<Event>>,
}

impl App {
    /// Everything that must work before the terminal is taken over. A player
    /// that cannot start is fatal.
    pub async fn start(cfg: Config, config_path: PathBuf) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel::<Event>(256);

        let store = PlaylistStore::open(cfg.playlists_dir()).context("open playlist store")?;
        let lrclib = LrclibClient::new(&cfg.lyrics.base_url, Duration::from_secs(cfg.lyrics.timeout_secs))?;
        let cache = CacheHandle::new(cfg.cache_path());

        let mpv_log = cfg.paths.data_dir.join("mpv.log");
        let mpv = MpvHandle::spawn(
            tx.clone(),
            cfg.player.audio_device.as_deref(),
            cfg.player.volume,
            Some(&mpv_log),
        )
        .await
        .context("start mpv")?;

        let mut state = AppState::new(
            cfg.library_root(),
            cfg.ui.autoplay,
            f64::from(cfg.player.seek_seconds),
            Duration::from_secs(cfg.ui.status_secs),
        );
        state.player.volume = cfg.player.volume.min(100);

        Ok(Self {
            cfg,
            config_path,
            state,
            store,
            lrclib,
            cache,
            mpv,
            tx,
            rx: Some(rx),
        })
    }

    /// Load command-line inputs. Anything that could not be used becomes a
    /// status message once the UI is up.
    pub async fn open_inputs(&mut self, inputs: &[String]) {
        if inputs.is_empty() {
            return;
        }
        let report = startup::open_inputs(&self.mpv, &self.cache, inputs).await;
        if let Some(first) = report.loaded.first().cloned() {
            self.state.now_playing = Some(first.clone());
            self.state.player.awaiting_load = true;
            self.state.set_mode(Mode::Playback);
            self.request_lyrics(&first, None);
        }
        if !report.warnings.is_empty() {
            self.state.notify_error(report.warnings.join("; "));
        }
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let mut rx = self.rx.take().context("app loop already ran")?;
        let tick = Duration::from_millis(self.cfg.ui.tick_ms.max(10));

        input::spawn_input_task(self.tx.clone(), tick);
        spawn_ticker(self.tx.clone(), tick);

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.dispatch(action).await;
                    }
                }
                Event::Player(pe) => self.handle_player(pe),
                Event::Network(ne) => self.handle_network(ne).await,
                Event::Tick => self.on_tick().await,
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state)?;
        }

        self.save_state_on_quit();
        Ok(())
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.player.volume = self.state.player.volume;
        self.cfg.ui.autoplay = self.state.autoplay.enabled();
        if let Err(e) = crate::config::save(&self.cfg, Some(&self.config_path)) {
            tracing::warn!(error = %format!("{e:#}"), "saving config failed");
        }
    }

    async fn dispatch(&mut self, action: Action) {
        if let Some(effect) = self.state.reduce(action) {
            self.run_effect(effect).await;
        }
    }

    async fn on_tick(&mut self) {
        self.state.expire_toast();
        self.state.sync_lyrics();
        if let Some(effect) = self.state.tick_autoplay() {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ListDirectory(path) => self.list_directory(path).await,
            Effect::PlayLocal(item) => self.play_local(item).await,
            Effect::Search { query, epoch } => self.spawn_search(query, epoch),
            Effect::Play(request) => self.spawn_resolve(request),
            Effect::LoadPlaylists => match self.store.list_all() {
                Ok(list) => self.state.show_playlists(list),
                Err(e) => self.report(e.into()),
            },
            Effect::OpenPlaylist { name, select } => match self.store.songs_of(&name) {
                Ok(songs) => self.state.show_playlist(name, songs, select),
                Err(e) => self.report(e.into()),
            },
            Effect::CreatePlaylist(name) => match self.store.create(&name) {
                Ok(true) => self.state.playlist_created(name),
                Ok(false) => self.state.notify("Playlist already exists."),
                Err(e) => self.report(e.into()),
            },
            Effect::RenamePlaylist { from, to } => self.rename_playlist(&from, &to),
            Effect::DeletePlaylist(name) => match self.store.delete(&name) {
                Ok(()) => self.state.playlist_deleted(&name),
                Err(e) => self.report(e.into()),
            },
            Effect::RemoveSong { playlist, index } => {
                let res = self
                    .store
                    .remove_at(&playlist, index)
                    .and_then(|_| self.store.songs_of(&playlist));
                match res {
                    Ok(songs) => {
                        self.state.refresh_playlist(&playlist, songs);
                        self.state.notify("Song removed.");
                    }
                    Err(e) => self.report(e.into()),
                }
            }
            Effect::AddSong { playlist, song } => match self.store.add(&playlist, &song) {
                Ok(true) => {
                    if let Ok(songs) = self.store.songs_of(&playlist) {
                        self.state.refresh_playlist(&playlist, songs);
                    }
                    self.state.leave_select_for_add();
                    self.state.notify(format!("Song added to {playlist}"));
                }
                Ok(false) => self.state.notify("Song already in playlist."),
                Err(e) => self.report(e.into()),
            },
            Effect::MoveSong { from, index, to } => self.move_song(&from, index, &to),
            Effect::TogglePause => {
                if let Err(e) = self.mpv.toggle_pause().await {
                    self.report(Error::engine(e));
                }
            }
            Effect::Seek(seconds) => {
                if let Err(e) = self.mpv.seek_relative(seconds).await {
                    self.report(Error::engine(e));
                }
            }
            Effect::SetVolume(volume) => {
                if let Err(e) = self.mpv.set_volume(volume).await {
                    self.report(Error::engine(e));
                }
            }
            Effect::Replay(stream) => {
                match self.replay(&stream).await {
                    Ok(()) => self.state.player.awaiting_load = true,
                    Err(e) => self.report(Error::engine(e)),
                }
            }
        }
    }

    fn report(&mut self, err: Error) {
        let err = match err {
            Error::Store(StoreError::InvalidName(name)) => Error::Input(format!("Invalid playlist name: {name:?}")),
            other => other,
        };
        self.state.notify_error(err.to_string());
    }

    async fn list_directory(&mut self, path: PathBuf) {
        let dir = path.clone();
        let res = tokio::task::spawn_blocking(move || library::list_directory(&dir)).await;
        match res {
            Ok(Ok(items)) => self.state.show_directory(path, items),
            Ok(Err(e)) => {
                if path == self.state.library_path {
                    self.state.library_items.clear();
                }
                self.state.notify_error(format!("{e:#}"));
            }
            Err(e) => self.state.notify_error(format!("library listing failed: {e}")),
        }
    }

    async fn play_local(&mut self, item: LibraryItem) {
        let title = item.display_title();
        let path = item.path.display().to_string();
        self.request_lyrics(&title, item.artist.clone());
        match self.start_stream(&path, &title).await {
            Ok(()) => self.state.local_started(&item),
            Err(e) => self.report(Error::engine(e)),
        }
    }

    /// Stop whatever plays and start `stream` under `title`.
    async fn start_stream(&self, stream: &str, title: &str) -> anyhow::Result<()> {
        self.mpv.stop().await?;
        self.mpv.load(stream, LoadMode::Replace).await?;
        self.mpv
            .set_property("force-media-title", serde_json::Value::from(title))
            .await?;
        self.mpv.play().await
    }

    async fn replay(&self, stream: &str) -> anyhow::Result<()> {
        self.mpv.load(stream, LoadMode::Replace).await?;
        self.mpv.play().await
    }

    fn rename_playlist(&mut self, from: &str, to: &str) {
        match self.store.rename(from, to) {
            Ok(true) => match self.store.list_all() {
                Ok(list) => self.state.playlist_renamed(from, to, list),
                Err(e) => self.report(e.into()),
            },
            Ok(false) => {
                if self.store.count(to).is_ok() {
                    self.state.notify("Playlist already exists.");
                } else {
                    self.report(StoreError::NotFound(from.to_string()).into());
                }
            }
            Err(e) => self.report(e.into()),
        }
    }

    fn move_song(&mut self, from: &str, index: usize, to: &str) {
        match self.store.move_song(from, index, to) {
            Ok(true) => {
                self.state.leave_select_for_add();
                for name in [from, to] {
                    match self.store.songs_of(name) {
                        Ok(songs) => self.state.refresh_playlist(name, songs),
                        Err(e) => tracing::warn!(playlist = name, error = %e, "reload after move failed"),
                    }
                }
                self.state.notify(format!("Song moved to {to}"));
            }
            Ok(false) => self.state.notify("Song already in playlist."),
            Err(e) => self.report(e.into()),
        }
    }

    fn spawn_search(&self, query: String, epoch: u64) {
        let tx = self.tx.clone();
        let limit = self.cfg.search.limit;
        tokio::spawn(async move {
            let ev = match remote::search(&query, limit).await {
                Ok(results) => NetworkEvent::SearchResults { epoch, query, results },
                Err(e) => NetworkEvent::SearchFailed {
                    epoch,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    fn spawn_resolve(&self, request: PlayRequest) {
        let tx = self.tx.clone();
        let cache = self.cache.clone();
        tokio::spawn(async move {
            let ev = match remote::resolve_stream(&cache, &request.entry.reference).await {
                Ok(stream) => NetworkEvent::Resolved { request, stream },
                Err(e) => NetworkEvent::ResolveFailed {
                    request,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(Event::Network(ev)).await;
        });
    }

    /// Ask for lyrics of `title`. Without any artist to go on the pane shows
    /// a message and nothing is fetched; the player's metadata may fill the
    /// gap later (see `handle_player`).
    fn request_lyrics(&mut self, title: &str, explicit_artist: Option<String>) {
        self.state.lyrics_requested(title);
        let Some(key) = lyrics::lookup_key(title, explicit_artist.as_deref(), None) else {
            self.state.lyrics_ready(title, LyricsData::message(lyrics::MSG_NO_ARTIST));
            return;
        };
        self.spawn_lyrics_fetch(title.to_string(), key);
    }

    fn spawn_lyrics_fetch(&self, title: String, key: lyrics::LookupKey) {
        let tx = self.tx.clone();
        let client = self.lrclib.clone();
        let cache = self.cache.clone();
        tokio::spawn(async move {
            let lyrics = lyrics::fetch(&client, Some(&cache), &key)
                .await
                .map_err(|e| e.to_string());
            let _ = tx
                .send(Event::Network(NetworkEvent::LyricsLoaded { title, lyrics }))
                .await;
        });
    }

    fn handle_player(&mut self, pe: PlayerEvent) {
        if let PlayerEvent::Error(msg) | PlayerEvent::LoadFailed(msg) = &pe {
            self.state.notify_error(msg.clone());
        }
        let metadata_changed = matches!(pe, PlayerEvent::Metadata(_));
        self.state.player.apply(&pe);
        if metadata_changed {
            self.retry_lyrics_with_metadata();
        }
    }

    fn retry_lyrics_with_metadata(&mut self) {
        let waiting_for_artist = self
            .state
            .lyrics
            .as_ref()
            .is_some_and(|l| !l.has_synced && l.plain == lyrics::MSG_NO_ARTIST);
        if !waiting_for_artist || self.state.lyrics_key != self.state.now_playing {
            return;
        }
        let Some(title) = self.state.lyrics_key.clone() else {
            return;
        };
        if let Some(key) = lyrics::lookup_key(&title, None, self.state.player.metadata("artist")) {
            tracing::debug!(artist = %key.artist, "lyrics artist from player metadata");
            self.state.lyrics_requested(&title);
            self.spawn_lyrics_fetch(title, key);
        }
    }

    async fn handle_network(&mut self, ne: NetworkEvent) {
        match ne {
            NetworkEvent::SearchResults { epoch, query, results } => {
                if !self.state.apply_search_results(epoch, results) {
                    tracing::debug!(%query, "dropping stale search results");
                }
            }
            NetworkEvent::SearchFailed { epoch, error } => {
                self.state.apply_search_failure(epoch, &error);
            }
            NetworkEvent::Resolved { request, stream } => {
                if !self.state.is_request_current(&request) {
                    tracing::debug!(reference = %request.entry.reference, "dropping stale resolve");
                    return;
                }
                let title = request.entry.title.clone();
                self.request_lyrics(&title, None);
                match self.start_stream(&stream, &title).await {
                    Ok(()) => {
                        tracing::info!(%title, "now playing");
                        self.state.play_started(request, stream);
                    }
                    Err(e) => self.state.play_failed(&request, &Error::engine(e).to_string()),
                }
            }
            NetworkEvent::ResolveFailed { request, error } => {
                if self.state.is_request_current(&request) {
                    self.state.play_failed(&request, &error);
                }
            }
            NetworkEvent::LyricsLoaded { title, lyrics } => match lyrics {
                Ok(data) => {
                    self.state.lyrics_ready(&title, data);
                }
                Err(e) => {
                    if self
                        .state
                        .lyrics_ready(&title, LyricsData::message(lyrics::MSG_FETCH_FAILED))
                    {
                        self.state.notify_error(e);
                    }
                }
            },
        }
    }
}

fn spawn_ticker(tx: mpsc::Sender<Event>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(Event::Tick).await.is_err() {
                break;
            }
        }
    });
}
