#![forbid(unsafe_code)]

//! The media surface seam: the playback element the controller commands
//! and observes.

use aula_events::SurfaceEvent;
use tokio::sync::broadcast;
use url::Url;

use crate::error::MediaError;

/// A playback surface (the media-element analog).
///
/// Exclusively owned by one controller instance at a time; the controller
/// issues commands and reacts to [`SurfaceEvent`]s, it never polls decode
/// state synchronously. Implementations use interior mutability — all
/// methods take `&self`.
pub trait MediaSurface: Send + Sync + 'static {
    /// Assign a source URL directly (progressive or native-manifest path).
    fn set_source(&self, url: &Url);

    /// Detach the current source.
    fn clear_source(&self);

    /// Current playback position in seconds.
    fn position(&self) -> f64;

    /// Seek to an absolute position in seconds.
    fn seek(&self, seconds: f64);

    /// Total duration in seconds; NaN until metadata resolves.
    fn duration(&self) -> f64;

    /// End of the buffered range in seconds.
    fn buffered_end(&self) -> f64;

    /// Current volume in `0.0..=1.0`.
    fn volume(&self) -> f32;

    /// Set volume; implementations may assume the value is already clamped.
    fn set_volume(&self, volume: f32);

    /// Current playback rate.
    fn rate(&self) -> f32;

    /// Set playback rate.
    fn set_rate(&self, rate: f32);

    /// Request playback to start. Best-effort: the host may veto autoplay,
    /// surfaced as [`MediaError::AutoplayBlocked`].
    fn play(&self) -> Result<(), MediaError>;

    /// Request playback to pause.
    fn pause(&self);

    /// Whether the surface natively understands adaptive manifests.
    fn supports_native_hls(&self) -> bool;

    /// Subscribe to surface events.
    fn events(&self) -> broadcast::Receiver<SurfaceEvent>;
}
