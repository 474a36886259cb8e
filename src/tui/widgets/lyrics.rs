//! Lyrics pane: synced lines follow playback, plain text scrolls by hand.

use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use crate::tui::truncate_str;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let mut title = format!("{} Lyrics", icons.lyrics);
    if let Some(key) = &state.lyrics_key {
        title = format!("{title}: {key}");
    }
    if !state.lyrics_auto_scroll {
        title.push_str(" (c to recenter)");
    }
    let block = theme.panel(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    state.lyrics_height = inner.height as usize;
    state.sync_lyrics();

    let message = if state.lyrics_loading {
        Some("Loading lyrics...")
    } else if state.lyrics.is_none() {
        Some("Nothing playing.")
    } else {
        None
    };
    if let Some(message) = message {
        let p = Paragraph::new(Line::from(Span::styled(message, theme.dim()))).alignment(Alignment::Center);
        frame.render_widget(p, inner);
        return;
    }

    let line_count = state.lyrics.as_ref().map_or(0, |l| {
        if l.has_synced {
            l.synced.len()
        } else {
            l.plain.lines().count()
        }
    });
    state.lyrics_offset = state.lyrics_offset.min(line_count.saturating_sub(1));

    let active = state.active_lyric();
    let offset = state.lyrics_offset;
    let Some(lyrics) = &state.lyrics else {
        return;
    };
    let texts: Vec<&str> = if lyrics.has_synced {
        lyrics.synced.iter().map(|l| l.text.as_str()).collect()
    } else {
        lyrics.plain.lines().collect()
    };

    let width = inner.width as usize;
    let lines: Vec<Line> = texts
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner.height as usize)
        .map(|(i, text)| {
            if Some(i) == active {
                Line::from(Span::styled(
                    truncate_str(text, width),
                    Style::default()
                        .fg(theme.palette.playing)
                        .add_modifier(Modifier::BOLD),
                ))
            } else if lyrics.has_synced {
                Line::from(Span::styled(truncate_str(text, width), theme.dim()))
            } else {
                Line::from(truncate_str(text, width))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
