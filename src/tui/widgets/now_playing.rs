//! Player panel: title, progress and transport state.

use crate::app::state::AppState;
use crate::library::format_duration;
use crate::tui::theme::{Icons, get_theme};
use crate::tui::truncate_str;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// `detailed` adds the artist and queue-source line; it needs one more row.
pub fn render(frame: &mut Frame, state: &AppState, area: Rect, detailed: bool) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = theme.panel(format!("{} Player", icons.music));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(1) as usize;
    let player = &state.player;
    let mut lines = Vec::with_capacity(5);

    let title = state
        .now_playing
        .as_deref()
        .or(player.display_title())
        .unwrap_or("Not playing");
    lines.push(Line::from(Span::styled(truncate_str(title, width), theme.strong())));

    if detailed {
        let mut parts = Vec::new();
        if let Some(artist) = player.metadata("artist") {
            parts.push(artist.to_string());
        }
        if let Some(name) = &state.playing_playlist {
            parts.push(format!("from playlist {name}"));
        }
        lines.push(Line::from(Span::styled(truncate_str(&parts.join("  ·  "), width), theme.dim())));
    }

    let ratio = if player.duration > 0.0 {
        (player.position / player.duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    lines.push(Line::from(Span::styled(
        progress_bar(inner.width as usize, ratio, icons),
        Style::default().fg(theme.palette.accent),
    )));

    let state_icon = if player.is_playing() || (player.awaiting_load && !player.paused) {
        icons.play
    } else if player.paused && state.now_playing.is_some() {
        icons.pause
    } else {
        icons.stop
    };
    let autoplay_style = if state.autoplay.enabled() {
        Style::default().fg(theme.palette.playing)
    } else {
        theme.dim().add_modifier(Modifier::CROSSED_OUT)
    };
    lines.push(Line::from(vec![
        Span::styled(state_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(
            format!("{} / {}", clock(player.position), clock(player.duration)),
            theme.dim(),
        ),
        Span::raw("   "),
        Span::styled(format!("{} {}%", icons.volume, player.volume), theme.dim()),
        Span::raw("   "),
        Span::styled(format!("{} autoplay", icons.autoplay), autoplay_style),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_duration(0);
    }
    format_duration(seconds.floor() as u64)
}

fn progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }
    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);
    let mut bar = String::with_capacity(width * 3);
    bar.push_str(&icons.progress_full.repeat(filled));
    bar.push_str(icons.progress_head);
    bar.push_str(&icons.progress_empty.repeat(empty));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_places_head_by_ratio() {
        let icons = Icons::PLAIN;
        assert_eq!(progress_bar(5, 0.0, &icons), "●────");
        assert_eq!(progress_bar(5, 1.0, &icons), "━━━━●");
        assert_eq!(progress_bar(5, 0.5, &icons), "━━●──");
        assert_eq!(progress_bar(2, 0.5, &icons), "");
    }

    #[test]
    fn clock_handles_unknown_duration() {
        assert_eq!(clock(f64::NAN), "0:00");
        assert_eq!(clock(-1.0), "0:00");
        assert_eq!(clock(125.9), "2:05");
    }
}
