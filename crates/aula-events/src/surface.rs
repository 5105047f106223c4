#![forbid(unsafe_code)]

/// Error codes reported by the media surface itself, independent of any
/// engine-level failure.
///
/// Mirrors the standard media-element error-code contract; the code set is
/// closed, so downstream matches stay exhaustive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceErrorCode {
    /// Fetch was aborted, typically because the source was swapped mid-load.
    Aborted,
    /// A network failure prevented the media from loading.
    Network,
    /// The container or codec could not be decoded.
    Decode,
    /// The surface cannot play this source at all.
    SrcNotSupported,
}

/// Events emitted by the media surface during playback.
///
/// All of these are asynchronous and non-blocking; the controller reacts to
/// them, it never polls the surface synchronously.
#[derive(Clone, Debug)]
pub enum SurfaceEvent {
    /// The surface started loading a new source.
    LoadStart,
    /// Metadata resolved; the duration is known from here on.
    MetadataLoaded { duration: f64 },
    /// Playback started (or resumed from a pause).
    Play,
    /// Playback paused.
    Pause,
    /// Playback stalled waiting for data.
    Waiting,
    /// Playback resumed after a stall.
    Playing,
    /// Clock tick: current position and the end of the buffered range.
    TimeUpdate { position: f64, buffered_end: f64 },
    /// Playback reached the end of the media.
    Ended,
    /// The surface reported an element-level error.
    Fault { code: SurfaceErrorCode },
}
