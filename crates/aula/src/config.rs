#![forbid(unsafe_code)]

//! Configuration for [`Player`](crate::Player).

use std::time::Duration;

use aula_media::EngineOptions;
use aula_player::{FatalErrorCallback, CONTROLS_HIDE_DELAY, VOLUME_HIDE_DELAY};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Unified configuration for creating a [`Player`](crate::Player).
///
/// The source string is classified on bind, so an invalid or unsupported
/// source surfaces there, not here.
///
/// # Example
///
/// ```ignore
/// use aula::PlayerConfig;
///
/// let config = PlayerConfig::new("https://cdn.example.com/stream/master.m3u8")
///     .with_autoplay(false)
///     .with_touch_primary(true);
/// ```
pub struct PlayerConfig {
    /// Media source, URL string. Classified as adaptive or progressive on
    /// bind.
    pub src: String,
    /// Optional poster image shown before playback starts.
    pub poster: Option<Url>,
    /// Start playback automatically once the source is ready.
    ///
    /// Only honored after a prior user interaction; a host veto leaves the
    /// player ready.
    pub autoplay: bool,
    /// Touch-primary device: hover previews and keyboard shortcuts are
    /// disabled.
    pub touch_primary: bool,
    /// Cancellation token for graceful shutdown.
    pub cancel: Option<CancellationToken>,
    /// Adaptive engine configuration.
    pub engine: EngineOptions,
    /// Idle delay before the control bar hides during playback.
    pub controls_hide_delay: Duration,
    /// Delay before the volume slider hides after the pointer leaves.
    pub volume_hide_delay: Duration,
    /// Invoked at most once per source bind when playback fails fatally.
    pub on_error: Option<FatalErrorCallback>,
}

impl PlayerConfig {
    /// Create a new config for the given source.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            poster: None,
            autoplay: true,
            touch_primary: false,
            cancel: None,
            engine: EngineOptions::default(),
            controls_hide_delay: CONTROLS_HIDE_DELAY,
            volume_hide_delay: VOLUME_HIDE_DELAY,
            on_error: None,
        }
    }

    /// Set the poster image.
    #[must_use]
    pub fn with_poster(mut self, poster: Url) -> Self {
        self.poster = Some(poster);
        self
    }

    /// Enable or disable autoplay once the source is ready.
    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Mark the device as touch-primary.
    #[must_use]
    pub fn with_touch_primary(mut self, touch_primary: bool) -> Self {
        self.touch_primary = touch_primary;
        self
    }

    /// Set cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Set adaptive engine options.
    #[must_use]
    pub fn with_engine(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }

    /// Set the control-bar auto-hide delay.
    #[must_use]
    pub fn with_controls_hide_delay(mut self, delay: Duration) -> Self {
        self.controls_hide_delay = delay;
        self
    }

    /// Set the volume-slider auto-hide delay.
    #[must_use]
    pub fn with_volume_hide_delay(mut self, delay: Duration) -> Self {
        self.volume_hide_delay = delay;
        self
    }

    /// Set the fatal-error callback.
    #[must_use]
    pub fn with_on_error(mut self, on_error: FatalErrorCallback) -> Self {
        self.on_error = Some(on_error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PlayerConfig::new("https://example.com/clip.mp4");
        assert!(config.autoplay);
        assert!(!config.touch_primary);
        assert!(config.poster.is_none());
        assert_eq!(config.controls_hide_delay, CONTROLS_HIDE_DELAY);
        assert_eq!(config.volume_hide_delay, VOLUME_HIDE_DELAY);
    }

    #[test]
    fn config_builder_chains() {
        let config = PlayerConfig::new("https://example.com/stream/master.m3u8")
            .with_autoplay(false)
            .with_touch_primary(true)
            .with_controls_hide_delay(Duration::from_secs(5));
        assert!(!config.autoplay);
        assert!(config.touch_primary);
        assert_eq!(config.controls_hide_delay, Duration::from_secs(5));
    }
}
