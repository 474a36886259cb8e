//! Screen layout:
//!
//! ┌ header: app name and mode ─────────────────────────┐
//! │ body (depends on mode)                              │
//! ├ player panel (hidden in Playback, which embeds it) ┤
//! │ status message                                      │
//! └ key hints ─────────────────────────────────────────┘

use crate::app::state::{AppMode, AppState, ToastKind};
use crate::tui::theme::get_theme;
use crate::tui::truncate_str;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{browser, help, lyrics, now_playing};

const PLAYER_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, state: &mut AppState) {
    let kind = state.mode.kind();
    let player_height = if kind == AppMode::Playback { 0 } else { PLAYER_HEIGHT };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(player_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, state, rows[0]);

    match kind {
        AppMode::Intro => help::render_intro(frame, rows[1]),
        AppMode::Playback => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(PLAYER_HEIGHT + 1), Constraint::Min(3)])
                .split(rows[1]);
            now_playing::render(frame, state, split[0], true);
            lyrics::render(frame, state, split[1]);
        }
        AppMode::LyricsView => lyrics::render(frame, state, rows[1]),
        AppMode::LibraryBrowser => browser::render_library(frame, state, rows[1]),
        AppMode::SearchInput => browser::render_search_input(frame, state, rows[1]),
        AppMode::SearchResults => browser::render_search_results(frame, state, rows[1]),
        AppMode::PlaylistBrowser | AppMode::PlaylistSelectForAdd => browser::render_playlists(frame, state, rows[1]),
        AppMode::PlaylistView => browser::render_playlist(frame, state, rows[1]),
    }

    if player_height > 0 {
        now_playing::render(frame, state, rows[2], false);
    }
    render_status(frame, state, rows[3]);
    help::render_footer(frame, state, rows[4]);
}

fn render_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let line = Line::from(vec![
        Span::styled(
            format!(" {} vibefi ", theme.icons.music),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(state.mode.kind().title(), theme.dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let Some(toast) = &state.toast else {
        return;
    };
    let (icon, color) = match toast.kind {
        ToastKind::Info => (theme.icons.info, theme.palette.fg_primary),
        ToastKind::Error => (theme.icons.error, theme.palette.error),
    };
    let width = area.width.saturating_sub(3) as usize;
    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(truncate_str(&toast.message, width), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
