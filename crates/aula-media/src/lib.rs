#![forbid(unsafe_code)]

//! Media delivery layer: classify a playback source, bridge adaptive
//! manifest streams to a media surface through an external engine, and
//! assign progressive files directly.
//!
//! The two seams — [`MediaSurface`] and [`AdaptiveEngine`] — are traits so
//! the controller above this crate stays host-agnostic and testable.

mod binding;
mod engine;
mod error;
mod source;
mod surface;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use binding::{BindMode, EngineBinding};
pub use engine::{AdaptiveEngine, EngineFactory, EngineOptions};
pub use error::{MediaError, MediaResult};
pub use source::SourceKind;
pub use surface::MediaSurface;
