#![forbid(unsafe_code)]

use aula_media::MediaError;

/// Canonical playback status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PlaybackStatus {
    /// Constructed, no source supplied yet.
    #[default]
    Idle,
    /// A source is bound and loading.
    Loading,
    /// Manifest parsed or metadata loaded; playback can start.
    Ready,
    Playing,
    Paused,
    /// Stalled waiting for data; commands are still accepted.
    Buffering,
    Ended,
    /// Terminal until the source changes or the user forces a reload.
    Error,
}

/// Classified fatal playback failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PlaybackFaultKind {
    Network,
    Decode,
    UnsupportedFormat,
    Aborted,
}

impl From<&MediaError> for PlaybackFaultKind {
    fn from(err: &MediaError) -> Self {
        match err {
            MediaError::Network(_) => Self::Network,
            MediaError::Decode(_) => Self::Decode,
            MediaError::Aborted(_) => Self::Aborted,
            MediaError::InvalidSource(_)
            | MediaError::UnsupportedFormat(_)
            | MediaError::AutoplayBlocked(_) => Self::UnsupportedFormat,
        }
    }
}

/// The fault that drove the state machine into [`PlaybackStatus::Error`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackFault {
    pub kind: PlaybackFaultKind,
    pub message: String,
}

/// The fixed playback-rate menu.
pub const RATES: [f32; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];
