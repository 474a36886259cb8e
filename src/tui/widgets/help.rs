//! Welcome screen and the per-mode key hint footer.

use crate::app::state::{AppMode, AppState};
use crate::tui::theme::{Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

pub fn key_hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
    if state.mode.prompt().is_some() {
        return &[("Enter", "confirm"), ("Esc", "cancel")];
    }
    match state.mode.kind() {
        AppMode::Intro => &[("Enter/l", "library"), ("s", "search"), ("p", "playlists"), ("q", "quit")],
        AppMode::Playback | AppMode::LyricsView => &[
            ("Space", "pause"),
            ("←/→", "seek"),
            ("+/-", "volume"),
            ("o", "autoplay"),
            ("r", "replay"),
            ("q", "queue"),
            ("y", "lyrics"),
            ("l/s/p", "browse"),
            ("Esc", "back"),
        ],
        AppMode::LibraryBrowser => &[("Enter", "open/play"), ("Backspace", "up"), ("Esc", "back")],
        AppMode::SearchInput => &[("Enter", "search"), ("Esc", "back")],
        AppMode::SearchResults => &[("Enter", "play"), ("a", "add to playlist"), ("s", "new search"), ("Esc", "back")],
        AppMode::PlaylistBrowser => &[("Enter", "open"), ("n", "new"), ("r", "rename"), ("d", "delete"), ("Esc", "back")],
        AppMode::PlaylistView => &[("Enter", "play"), ("m", "move"), ("d", "remove"), ("Esc", "back")],
        AppMode::PlaylistSelectForAdd => &[("Enter", "choose"), ("n", "new playlist"), ("Esc", "cancel")],
    }
}

pub fn render_footer(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let mut spans = Vec::new();
    for (i, (key, what)) in key_hints(state).iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.palette.accent)));
        spans.push(Span::styled(format!(" {what}"), theme.dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_intro(frame: &mut Frame, area: Rect) {
    let theme = get_theme();
    let block = theme.panel(format!("{} vibefi", theme.icons.music));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled("Terminal music player", theme.strong())),
        Line::from(Span::styled("local files, online search, playlists and lyrics", theme.dim())),
        Line::default(),
    ];
    lines.push(entry(&theme, "l", "Browse the music library"));
    lines.push(entry(&theme, "s", "Search online"));
    lines.push(entry(&theme, "p", "Playlists"));
    lines.push(entry(&theme, "q", "Quit"));

    let top = inner.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect::new(inner.x, inner.y + top, inner.width, inner.height - top);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        body,
    );
}

fn entry(theme: &Theme, key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>3}  "), Style::default().fg(theme.palette.accent)),
        Span::styled(format!("{what:<26}"), Style::default().fg(theme.palette.fg_primary)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Mode;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn prompt_hints_replace_mode_hints() {
        let mut s = AppState::new(PathBuf::from("/m"), true, 5.0, Duration::from_secs(3));
        s.set_mode(Mode::PlaylistBrowser { prompt: None });
        assert!(key_hints(&s).iter().any(|(k, _)| *k == "n"));
        s.reduce(crate::app::actions::Action::NewPlaylist);
        assert_eq!(key_hints(&s), &[("Enter", "confirm"), ("Esc", "cancel")]);
    }
}
