#![forbid(unsafe_code)]

use crate::{EngineEvent, SurfaceEvent};

/// Unified event for the full playback pipeline.
///
/// Hierarchical: each subsystem has its own variant with a sub-enum.
#[derive(Clone, Debug)]
pub enum Event {
    /// Media surface event.
    Surface(SurfaceEvent),
    /// Adaptive engine event.
    Engine(EngineEvent),
}

impl From<SurfaceEvent> for Event {
    fn from(e: SurfaceEvent) -> Self {
        Self::Surface(e)
    }
}

impl From<EngineEvent> for Event {
    fn from(e: EngineEvent) -> Self {
        Self::Engine(e)
    }
}
