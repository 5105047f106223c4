#![forbid(unsafe_code)]

use aula_events::SurfaceErrorCode;
use thiserror::Error;

/// Media delivery errors. A closed taxonomy: the fault-kind mapping in the
/// playback layer matches on it exhaustively.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid playback source: {0}")]
    InvalidSource(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("decode failure: {0}")]
    Decode(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("autoplay blocked: {0}")]
    AutoplayBlocked(String),

    #[error("aborted: {0}")]
    Aborted(String),
}

impl MediaError {
    /// Map an element-level error code to the media error taxonomy.
    #[must_use]
    pub fn from_surface_code(code: SurfaceErrorCode) -> Self {
        match code {
            SurfaceErrorCode::Aborted => Self::Aborted("media fetch aborted".to_owned()),
            SurfaceErrorCode::Network => {
                Self::Network("media surface reported a network failure".to_owned())
            }
            SurfaceErrorCode::Decode => {
                Self::Decode("media surface failed to decode the stream".to_owned())
            }
            SurfaceErrorCode::SrcNotSupported => {
                Self::UnsupportedFormat("media surface cannot play this source".to_owned())
            }
        }
    }
}

pub type MediaResult<T> = Result<T, MediaError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(SurfaceErrorCode::Aborted)]
    #[case(SurfaceErrorCode::Network)]
    #[case(SurfaceErrorCode::Decode)]
    #[case(SurfaceErrorCode::SrcNotSupported)]
    fn surface_code_maps_to_matching_variant(#[case] code: SurfaceErrorCode) {
        let err = MediaError::from_surface_code(code);
        let matches = matches!(
            (code, &err),
            (SurfaceErrorCode::Aborted, MediaError::Aborted(_))
                | (SurfaceErrorCode::Network, MediaError::Network(_))
                | (SurfaceErrorCode::Decode, MediaError::Decode(_))
                | (
                    SurfaceErrorCode::SrcNotSupported,
                    MediaError::UnsupportedFormat(_)
                )
        );
        assert!(matches, "{code:?} mapped to {err:?}");
    }
}
