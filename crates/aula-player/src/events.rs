#![forbid(unsafe_code)]

use crate::types::PlaybackStatus;

/// Outward notifications from the controller and visibility timers.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum PlayerEvent {
    StatusChanged { status: PlaybackStatus },
    VolumeChanged { volume: f32 },
    MuteChanged { muted: bool },
    RateChanged { rate: f32 },
    FullscreenChanged { fullscreen: bool },
    ControlsVisibilityChanged { visible: bool },
    VolumeSliderVisibilityChanged { visible: bool },
}
