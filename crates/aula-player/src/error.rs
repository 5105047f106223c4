#![forbid(unsafe_code)]

use aula_media::MediaError;
use thiserror::Error;

/// Controller command errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerError {
    /// The player is in the terminal error state; no further playback
    /// commands are accepted until a new source is bound.
    #[error("player is in the error state")]
    Faulted,

    /// The requested rate is not part of the fixed menu.
    #[error("unsupported playback rate: {rate}")]
    UnsupportedRate { rate: f32 },

    #[error(transparent)]
    Media(#[from] MediaError),
}
