//! Colors and glyphs shared by every widget.

pub mod icons;
pub mod palette;

pub use icons::Icons;
pub use palette::Palette;

use ratatui::style::{Modifier, Style};
use ratatui::symbols::border;
use ratatui::widgets::{Block, Borders};

#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

impl Theme {
    pub fn border_set(&self) -> border::Set<'static> {
        border::ROUNDED
    }

    /// Bordered panel with a title in the accent color.
    pub fn panel(&self, title: impl Into<String>) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_set(self.border_set())
            .border_style(Style::default().fg(self.palette.border))
            .title(format!(" {} ", title.into()))
            .title_style(Style::default().fg(self.palette.accent))
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.palette.fg_secondary)
    }

    pub fn strong(&self) -> Style {
        Style::default()
            .fg(self.palette.fg_primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.palette.bg_primary)
            .bg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }
}

pub fn get_theme() -> Theme {
    Theme {
        palette: Palette::DUSK,
        icons: Icons::PLAIN,
    }
}
