pub mod browser;
pub mod help;
pub mod lyrics;
pub mod now_playing;
pub mod root;
