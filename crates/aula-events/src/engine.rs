#![forbid(unsafe_code)]

/// Events emitted by the adaptive-streaming engine while a manifest source
/// is bound.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// Manifest parsed; variants discovered and playback can begin.
    ManifestParsed { variant_count: usize },
    /// A single fragment fetch failed and the engine is retrying internally.
    ///
    /// Non-fatal: absorbed by the controller, never reaches the state machine.
    FragmentRetry { attempt: u32, message: String },
    /// Unrecoverable engine failure (manifest or segment pipeline broken).
    FatalError { message: String },
    /// The engine detached from the media surface.
    Detached,
}
