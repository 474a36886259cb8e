/// Glyphs that render in any UTF-8 terminal font.
#[derive(Debug, Clone)]
pub struct Icons {
    pub play: &'static str,
    pub pause: &'static str,
    pub stop: &'static str,
    pub volume: &'static str,
    pub autoplay: &'static str,
    pub folder: &'static str,
    pub music: &'static str,
    pub playlist: &'static str,
    pub search: &'static str,
    pub lyrics: &'static str,
    pub info: &'static str,
    pub error: &'static str,
    pub selected: &'static str,
    pub progress_full: &'static str,
    pub progress_empty: &'static str,
    pub progress_head: &'static str,
}

impl Icons {
    pub const PLAIN: Self = Self {
        play: "▶",
        pause: "⏸",
        stop: "■",
        volume: "♪",
        autoplay: "↻",
        folder: "▸",
        music: "♫",
        playlist: "≡",
        search: "⌕",
        lyrics: "¶",
        info: "•",
        error: "✗",
        selected: "› ",
        progress_full: "━",
        progress_empty: "─",
        progress_head: "●",
    };
}
