//! List screens: library, search, playlists and their inline prompts.

use crate::app::state::{AppState, Mode, Prompt};
use crate::autoplay::QueueKind;
use crate::tui::theme::{Theme, get_theme};
use crate::tui::truncate_str;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

pub fn render_library(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let shown = state
        .library_path
        .strip_prefix(&state.library_root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(|rel| format!("{}/{}", root_name(state), rel.display()))
        .unwrap_or_else(|| root_name(state));
    let block = theme.panel(format!("{} {}", icons.folder, shown));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let rows: Vec<Line<'static>> = state
        .library_items
        .iter()
        .map(|item| {
            if item.is_dir {
                return Line::from(Span::styled(
                    truncate_str(&format!("{} {}/", icons.folder, item.name), width),
                    Style::default().fg(theme.palette.accent),
                ));
            }
            let mut label = format!("{} {}", icons.music, item.display_title());
            if let Some(artist) = &item.artist {
                label = format!("{label} - {artist}");
            }
            titled_row(&theme, &label, item.duration.as_deref().unwrap_or(""), width)
        })
        .collect();

    render_rows(frame, state, inner, rows, "No music here.");
}

fn root_name(state: &AppState) -> String {
    state
        .library_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| state.library_root.display().to_string())
}

pub fn render_search_input(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let block = theme.panel(format!("{} Search", theme.icons.search));
    let inner = block.inner(layout[0]);
    frame.render_widget(block, layout[0]);
    let line = Line::from(vec![
        Span::styled(state.search_query.clone(), theme.strong()),
        Span::styled("_", Style::default().fg(theme.palette.accent)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    let hint = Paragraph::new(Line::from(Span::styled("Type a song, artist or URL and press Enter.", theme.dim())));
    frame.render_widget(hint, layout[1]);
}

pub fn render_search_results(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let block = theme.panel(format!("{} Results for \"{}\"", theme.icons.search, state.search_query));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.searching {
        let p = Paragraph::new(Line::from(Span::styled("Searching...", theme.dim())));
        frame.render_widget(p, inner);
        return;
    }

    let width = inner.width as usize;
    let playing = playing_index(state, &QueueKind::SearchResults);
    let rows = state
        .search_results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let marker = if Some(i) == playing { theme.icons.play } else { " " };
            titled_row(&theme, &format!("{marker} {}", r.title), &r.duration, width)
        })
        .collect();

    render_rows(frame, state, inner, rows, "No results.");
}

pub fn render_playlists(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let title = match &state.mode {
        Mode::PlaylistSelectForAdd { pending, .. } => format!("Add \"{}\" to", pending.song.title),
        _ => format!("{} Playlists", theme.icons.playlist),
    };
    let block = theme.panel(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (list_area, prompt_area) = split_for_prompt(state.mode.prompt(), inner);
    if let (Some(prompt), Some(prompt_area)) = (state.mode.prompt(), prompt_area) {
        render_prompt(frame, &theme, prompt, prompt_area);
    }

    let width = list_area.width as usize;
    let rows = state
        .playlists
        .iter()
        .map(|p| {
            let count = match p.song_count {
                1 => "1 song".to_string(),
                n => format!("{n} songs"),
            };
            let mut label = format!("{} {}", theme.icons.playlist, p.name);
            if state.playing_playlist.as_deref() == Some(p.name.as_str()) {
                label = format!("{label} {}", theme.icons.play);
            }
            titled_row(&theme, &label, &count, width)
        })
        .collect();

    render_rows(frame, state, list_area, rows, "No playlists yet. Press n to create one.");
}

pub fn render_playlist(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let Mode::PlaylistView { name } = &state.mode else {
        return;
    };
    let name = name.clone();
    let block = theme.panel(format!("{} {} ({})", theme.icons.playlist, name, state.playlist_songs.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let playing = playing_index(state, &QueueKind::Playlist(name));
    let rows = state
        .playlist_songs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let marker = if Some(i) == playing { theme.icons.play } else { " " };
            titled_row(&theme, &format!("{marker} {}", s.title), &s.duration, width)
        })
        .collect();

    render_rows(frame, state, inner, rows, "This playlist is empty.");
}

/// Index autoplay considers current, when it is walking `kind`.
fn playing_index(state: &AppState, kind: &QueueKind) -> Option<usize> {
    if state.autoplay.kind() == Some(kind) {
        state.autoplay.current_index()
    } else {
        None
    }
}

fn split_for_prompt(prompt: Option<&Prompt>, area: Rect) -> (Rect, Option<Rect>) {
    if prompt.is_none() || area.height < 4 {
        return (area, None);
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);
    (layout[0], Some(layout[1]))
}

fn render_prompt(frame: &mut Frame, theme: &Theme, prompt: &Prompt, area: Rect) {
    let block = theme.panel(prompt.label());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let line = Line::from(vec![
        Span::styled(prompt.buffer.clone(), theme.strong()),
        Span::styled("_", Style::default().fg(theme.palette.accent)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

/// `label` on the left, `right` flush right, cut to `width`.
fn titled_row(theme: &Theme, label: &str, right: &str, width: usize) -> Line<'static> {
    let right_len = right.chars().count();
    let room = width.saturating_sub(right_len + 3);
    let label = truncate_str(label, room);
    let pad = width.saturating_sub(label.chars().count() + right_len + 2);
    Line::from(vec![
        Span::styled(label, Style::default().fg(theme.palette.fg_primary)),
        Span::raw(" ".repeat(pad)),
        Span::styled(right.to_string(), theme.dim()),
    ])
}

/// Draw the visible window of `rows` and record its height for scrolling.
fn render_rows(frame: &mut Frame, state: &mut AppState, area: Rect, rows: Vec<Line<'static>>, empty: &str) {
    let theme = get_theme();
    state.list_height = area.height as usize;
    state.update_scroll();

    if rows.is_empty() {
        frame.render_widget(Paragraph::new(Line::from(Span::styled(empty.to_string(), theme.dim()))), area);
        return;
    }

    let total = rows.len();
    let items: Vec<ListItem> = rows
        .into_iter()
        .skip(state.scroll)
        .take(area.height as usize)
        .map(ListItem::new)
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected.saturating_sub(state.scroll)));
    let list = List::new(items)
        .highlight_style(theme.highlight())
        .highlight_symbol(theme.icons.selected);
    frame.render_stateful_widget(list, area, &mut list_state);

    if total > area.height as usize {
        let pos = format!("{}/{}", state.selected + 1, total);
        let len = pos.len() as u16;
        let x = area.x + area.width.saturating_sub(len);
        if x > area.x {
            frame.render_widget(Paragraph::new(pos).style(theme.dim()), Rect::new(x, area.y, len, 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titled_row_keeps_right_column_visible() {
        let theme = get_theme();
        let line = titled_row(&theme, "A very long song title indeed", "3:45", 20);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("3:45"));
        assert!(text.chars().count() <= 20);
        assert!(text.contains("..."));
    }
}
