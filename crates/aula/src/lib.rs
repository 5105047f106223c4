#![forbid(unsafe_code)]

//! # Aula
//!
//! Facade crate assembling the adaptive media playback controller: source
//! classification, engine binding, the playback state machine, the control
//! surface, and the interaction timers.
//!
//! ## Quick start
//!
//! ```ignore
//! use aula::prelude::*;
//!
//! let config = PlayerConfig::new("https://cdn.example.com/stream/master.m3u8");
//! let player = Player::new(config, surface, factory, chrome).await?;
//!
//! player.toggle_play()?;
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod events {
    pub use aula_events::*;
}

pub mod media {
    pub use aula_media::*;
}

pub mod playback {
    pub use aula_player::*;
}

// ── Player ──────────────────────────────────────────────────────────────

mod config;
mod player;

pub use config::PlayerConfig;
pub use player::Player;

// ── Prelude ─────────────────────────────────────────────────────────────

pub mod prelude {
    pub use aula_events::{EngineEvent, Event, EventBus, SurfaceErrorCode, SurfaceEvent};
    pub use aula_media::{
        AdaptiveEngine, BindMode, EngineFactory, EngineOptions, MediaError, MediaSurface,
        SourceKind,
    };
    pub use aula_player::{
        PlaybackFault, PlaybackFaultKind, PlaybackStatus, PlayerChrome, PlayerError, PlayerEvent,
        PlayerState, RATES,
    };

    pub use crate::{Player, PlayerConfig};
}
