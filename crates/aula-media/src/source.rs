#![forbid(unsafe_code)]

//! Playback source classification from URL analysis.

use url::Url;

use crate::error::MediaError;

/// Classified playback source.
///
/// Immutable per bind; a new value always triggers a full re-bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Segmented adaptive-bitrate stream (URL ending with `.m3u8`).
    Adaptive(Url),
    /// Single progressive file (MP4, WEBM, etc.), assigned to the surface
    /// directly.
    Progressive(Url),
}

impl SourceKind {
    /// Classify a playback source from a URL string.
    ///
    /// - URLs whose path ends with `.m3u8` -> adaptive manifest
    /// - All other URLs -> progressive file
    ///
    /// Pure function: no side effects, no I/O.
    pub fn classify(src: &str) -> Result<Self, MediaError> {
        let parsed = Url::parse(src.trim())
            .map_err(|e| MediaError::InvalidSource(format!("{src}: {e}")))?;

        if parsed.path().ends_with(".m3u8") {
            return Ok(Self::Adaptive(parsed));
        }
        Ok(Self::Progressive(parsed))
    }

    /// The underlying URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        match self {
            Self::Adaptive(url) | Self::Progressive(url) => url,
        }
    }
}
