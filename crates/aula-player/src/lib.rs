#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc)]

//! Playback controller: the canonical player state derived from surface and
//! engine events, the command set behind the custom control surface, and
//! the interaction/visibility timers.

mod chrome;
mod control;
mod controller;
mod error;
mod events;
mod keyboard;
mod state;
mod types;
mod visibility;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{PlayerChrome, StyleGuard};
pub use control::{format_timestamp, seek_preview, RateMenu};
pub use controller::{FatalErrorCallback, PlayerController};
pub use error::PlayerError;
pub use events::PlayerEvent;
pub use keyboard::{shortcut_for_key, step_rate, Shortcut};
pub use state::{PlayerState, StateEvent};
pub use types::{PlaybackFault, PlaybackFaultKind, PlaybackStatus, RATES};
pub use visibility::{VisibilityController, CONTROLS_HIDE_DELAY, VOLUME_HIDE_DELAY};
