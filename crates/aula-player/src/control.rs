#![forbid(unsafe_code)]

//! Control-surface helpers: seek-bar preview math, the rate menu, and
//! timestamp formatting.

use crate::{controller::PlayerController, error::PlayerError};

/// Map a pointer position over the seek track to a media time for the
/// hover preview bubble.
///
/// Returns `None` on touch-primary devices (no hover), when the track has
/// no width, or while the duration is unknown.
#[must_use]
pub fn seek_preview(
    pointer_x: f64,
    track_width: f64,
    duration: f64,
    touch_primary: bool,
) -> Option<f64> {
    if touch_primary || track_width <= 0.0 || !duration.is_finite() {
        return None;
    }
    let fraction = (pointer_x / track_width).clamp(0.0, 1.0);
    Some(fraction * duration)
}

/// Format a position in seconds as `m:ss`, or `h:mm:ss` past the hour.
///
/// Non-finite input (duration not yet known) renders as `0:00`.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_owned();
    }
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Open/closed state of the playback-rate menu.
///
/// Selecting an entry closes the menu first, then applies the rate, so the
/// menu never stays open over a rejected rate.
#[derive(Debug, Default)]
pub struct RateMenu {
    open: bool,
}

impl RateMenu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the menu and apply the selected rate.
    pub fn select(
        &mut self,
        controller: &PlayerController,
        rate: f32,
    ) -> Result<(), PlayerError> {
        self.open = false;
        controller.set_rate(rate)
    }
}
