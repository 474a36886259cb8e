use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppMode, AppState};
use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Forward terminal input to the app loop. Polls with a bounded wait so the
/// task notices a closed channel.
pub fn spawn_input_task(tx: mpsc::Sender<Event>, poll: Duration) {
    tokio::task::spawn_blocking(move || {
        loop {
            if tx.is_closed() {
                break;
            }
            if !event::poll(poll).unwrap_or(false) {
                continue;
            }
            let ev = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                Ok(CtEvent::Mouse(m)) => InputEvent::Mouse(m),
                Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    continue;
                }
            };
            if tx.blocking_send(Event::Input(ev)).is_err() {
                break;
            }
        }
    });
}

pub fn map_input_to_action(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => None,
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::ListUp),
            MouseEventKind::ScrollDown => Some(Action::ListDown),
            _ => None,
        },
        InputEvent::Key(k) => map_key(state, k),
    }
}

fn map_key(state: &AppState, k: KeyEvent) -> Option<Action> {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    if state.mode.prompt().is_some() {
        return text_entry(k);
    }
    match state.mode.kind() {
        AppMode::Intro => intro(k),
        AppMode::Playback | AppMode::LyricsView => playback(k),
        AppMode::LibraryBrowser => library(k),
        AppMode::SearchInput => text_entry(k),
        AppMode::SearchResults => search_results(k),
        AppMode::PlaylistBrowser => playlist_browser(k),
        AppMode::PlaylistView => playlist_view(k),
        AppMode::PlaylistSelectForAdd => select_for_add(k),
    }
}

fn text_entry(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Enter => Some(Action::Activate),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::InputChar(c)),
        _ => None,
    }
}

fn list_nav(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Enter => Some(Action::Activate),
        KeyCode::Esc => Some(Action::Back),
        _ => None,
    }
}

fn intro(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Enter | KeyCode::Char('l') => Some(Action::OpenLibrary),
        KeyCode::Char('s') => Some(Action::OpenSearch),
        KeyCode::Char('p') => Some(Action::OpenPlaylists),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn playback(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Left => Some(Action::SeekBack),
        KeyCode::Right => Some(Action::SeekForward),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::VolumeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::VolumeDown),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Char('o') => Some(Action::ToggleAutoplay),
        KeyCode::Char('r') => Some(Action::Replay),
        KeyCode::Char('l') => Some(Action::OpenLibrary),
        KeyCode::Char('s') => Some(Action::OpenSearch),
        KeyCode::Char('p') => Some(Action::OpenPlaylists),
        KeyCode::Char('q') => Some(Action::ShowQueue),
        KeyCode::Char('y') => Some(Action::OpenLyrics),
        KeyCode::Char('c') => Some(Action::RecenterLyrics),
        _ => None,
    }
}

fn library(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => Some(Action::ParentDir),
        _ => list_nav(k),
    }
}

fn search_results(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::AddSelectedToPlaylist),
        KeyCode::Char('s') => Some(Action::NewSearch),
        _ => list_nav(k),
    }
}

fn playlist_browser(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::NewPlaylist),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::DeleteSelected),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::RenameSelectedPlaylist),
        _ => list_nav(k),
    }
}

fn playlist_view(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::DeleteSelected),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Action::MoveSelectedSong),
        _ => list_nav(k),
    }
}

fn select_for_add(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::NewPlaylist),
        _ => list_nav(k),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Mode;
    use std::path::PathBuf;

    fn state_in(mode: Mode) -> AppState {
        let mut s = AppState::new(PathBuf::from("/m"), true, 5.0, Duration::from_secs(3));
        s.set_mode(mode);
        s
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn map(s: &AppState, code: KeyCode) -> Option<Action> {
        map_input_to_action(s, key(code))
    }

    #[test]
    fn playback_keys() {
        let s = state_in(Mode::Playback);
        assert_eq!(map(&s, KeyCode::Esc), Some(Action::Back));
        assert_eq!(map(&s, KeyCode::Char(' ')), Some(Action::TogglePause));
        assert_eq!(map(&s, KeyCode::Right), Some(Action::SeekForward));
        assert_eq!(map(&s, KeyCode::Char('=')), Some(Action::VolumeUp));
        assert_eq!(map(&s, KeyCode::Char('_')), Some(Action::VolumeDown));
        assert_eq!(map(&s, KeyCode::Char('o')), Some(Action::ToggleAutoplay));
        assert_eq!(map(&s, KeyCode::Char('q')), Some(Action::ShowQueue));
        assert_eq!(map(&s, KeyCode::Up), Some(Action::ListUp));
    }

    #[test]
    fn intro_keys() {
        let s = state_in(Mode::Intro);
        assert_eq!(map(&s, KeyCode::Enter), Some(Action::OpenLibrary));
        assert_eq!(map(&s, KeyCode::Char('p')), Some(Action::OpenPlaylists));
        assert_eq!(map(&s, KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(map(&s, KeyCode::Char('x')), None);
    }

    #[test]
    fn search_input_takes_every_character() {
        let s = state_in(Mode::SearchInput);
        assert_eq!(map(&s, KeyCode::Char('q')), Some(Action::InputChar('q')));
        assert_eq!(map(&s, KeyCode::Char(' ')), Some(Action::InputChar(' ')));
        assert_eq!(map(&s, KeyCode::Backspace), Some(Action::Backspace));
        assert_eq!(map(&s, KeyCode::Enter), Some(Action::Activate));
    }

    #[test]
    fn list_mode_keys() {
        let s = state_in(Mode::SearchResults);
        assert_eq!(map(&s, KeyCode::Char('A')), Some(Action::AddSelectedToPlaylist));
        assert_eq!(map(&s, KeyCode::Char('j')), Some(Action::ListDown));

        let s = state_in(Mode::LibraryBrowser);
        assert_eq!(map(&s, KeyCode::Backspace), Some(Action::ParentDir));

        let s = state_in(Mode::PlaylistView { name: "p".into() });
        assert_eq!(map(&s, KeyCode::Char('m')), Some(Action::MoveSelectedSong));
        assert_eq!(map(&s, KeyCode::Char('D')), Some(Action::DeleteSelected));
    }

    #[test]
    fn open_prompt_captures_letters() {
        let mut s = state_in(Mode::PlaylistBrowser { prompt: None });
        assert_eq!(map(&s, KeyCode::Char('n')), Some(Action::NewPlaylist));
        s.reduce(Action::NewPlaylist);
        assert_eq!(map(&s, KeyCode::Char('d')), Some(Action::InputChar('d')));
        assert_eq!(map(&s, KeyCode::Esc), Some(Action::Back));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let s = state_in(Mode::SearchInput);
        let ev = InputEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_input_to_action(&s, ev), Some(Action::Quit));
    }

    #[test]
    fn resize_only_wakes_the_loop() {
        let s = state_in(Mode::Playback);
        assert_eq!(map_input_to_action(&s, InputEvent::Resize), None);
    }
}
