#![forbid(unsafe_code)]

//! Unified events for the aula playback pipeline.
//!
//! Hierarchical model: each subsystem (media surface, adaptive engine) has
//! its own sub-enum, and [`Event`] unions them for facade-level observation.
//! [`EventBus`] is a clone-shared broadcast wrapper with a sync, lossy
//! `publish`.

mod bus;
mod engine;
mod event;
mod surface;

pub use bus::EventBus;
pub use engine::EngineEvent;
pub use event::Event;
pub use surface::{SurfaceErrorCode, SurfaceEvent};
