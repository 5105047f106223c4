#![forbid(unsafe_code)]

//! The adaptive-streaming engine seam and its configuration.

use std::sync::Arc;

use aula_events::EngineEvent;
use derivative::Derivative;
use derive_setters::Setters;
use tokio::sync::broadcast;
use url::Url;

use crate::surface::MediaSurface;

/// Configuration handed to the engine factory on every bind.
#[derive(Clone, Debug, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct EngineOptions {
    /// Decode/demux on a background worker. Default: `true`.
    #[derivative(Default(value = "true"))]
    pub worker_decode: bool,
    /// Seconds of already-played media the engine may retain behind the
    /// playhead. Default: 30.0.
    #[derivative(Default(value = "30.0"))]
    pub back_buffer_seconds: f64,
    /// Internal retry budget for a single fragment before the failure
    /// becomes fatal. Default: 3.
    #[derivative(Default(value = "3"))]
    pub max_fragment_retries: u32,
}

/// An external adaptive-streaming engine instance bound to one surface.
///
/// Lifecycle is owned by [`EngineBinding`](crate::EngineBinding): exactly
/// one live instance per bound adaptive source, destroyed before the next
/// is created.
pub trait AdaptiveEngine: Send + Sync {
    /// Attach the engine to a media surface.
    fn attach(&self, surface: Arc<dyn MediaSurface>);

    /// Load the manifest and start the segment pipeline.
    fn load(&self, manifest: &Url);

    /// Tear the engine down. Idempotent: a second call is a no-op.
    fn destroy(&self);

    /// Subscribe to engine events.
    fn events(&self) -> broadcast::Receiver<EngineEvent>;
}

/// Creates engine instances and reports runtime capability.
pub trait EngineFactory: Send + Sync {
    /// Whether the runtime supports the adaptive engine at all.
    fn is_supported(&self) -> bool;

    /// Construct a fresh engine instance with the given options.
    fn create(&self, options: &EngineOptions) -> Box<dyn AdaptiveEngine>;
}
