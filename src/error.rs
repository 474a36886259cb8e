//! Error kinds surfaced to the user as status messages.
//!
//! Module internals mostly work with `anyhow::Result`; anything that crosses
//! a handler boundary is folded into [`Error`] so the controller can word the
//! message by kind.

use crate::playlist::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The playback engine rejected a command.
    #[error("player: {0}")]
    Engine(String),

    /// A remote reference could not be turned into a playable stream.
    #[error("cannot resolve {reference}: {reason}")]
    Resolution { reference: String, reason: String },

    /// Search or lyrics request failed or timed out.
    #[error("network: {0}")]
    Network(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed user text.
    #[error("{0}")]
    Input(String),
}

impl Error {
    pub fn engine(e: anyhow::Error) -> Self {
        Self::Engine(format!("{e:#}"))
    }

    pub fn network(e: anyhow::Error) -> Self {
        Self::Network(format!("{e:#}"))
    }

    pub fn resolution(reference: &str, e: anyhow::Error) -> Self {
        Self::Resolution {
            reference: reference.to_string(),
            reason: format!("{e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_keep_their_message() {
        let e: Error = StoreError::NotFound("Road Trip".into()).into();
        assert_eq!(e.to_string(), "playlist not found: Road Trip");
    }

    #[test]
    fn resolution_error_names_the_reference() {
        let e = Error::resolution("https://x/y", anyhow::anyhow!("yt-dlp failed"));
        assert_eq!(e.to_string(), "cannot resolve https://x/y: yt-dlp failed");
    }
}
