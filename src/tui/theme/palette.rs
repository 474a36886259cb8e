use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color,
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub accent: Color,
    pub border: Color,
    pub playing: Color,
    pub error: Color,
}

impl Palette {
    /// Muted violet on near-black.
    pub const DUSK: Self = Self {
        bg_primary: Color::Rgb(16, 14, 24),
        fg_primary: Color::Rgb(232, 228, 240),
        fg_secondary: Color::Rgb(140, 134, 160),
        accent: Color::Rgb(186, 156, 255),
        border: Color::Rgb(72, 64, 96),
        playing: Color::Rgb(132, 220, 198),
        error: Color::Rgb(255, 121, 121),
    };
}
