#![forbid(unsafe_code)]

//! The playback controller: owns the [`PlayerState`] record, validates the
//! control-surface command set, and folds surface/engine events through the
//! transition table.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use aula_events::{EngineEvent, SurfaceErrorCode, SurfaceEvent};
use aula_media::MediaSurface;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::{
    chrome::PlayerChrome,
    error::PlayerError,
    events::PlayerEvent,
    keyboard::{shortcut_for_key, step_rate, Shortcut},
    state::{next_status, PlayerState, StateEvent},
    types::{PlaybackFault, PlaybackFaultKind, PlaybackStatus, RATES},
};

/// Invoked at most once per bind generation when playback fails fatally.
pub type FatalErrorCallback = Arc<dyn Fn(String) + Send + Sync>;

const FRAME_STEP_SECONDS: f64 = 1.0 / 30.0;

/// Canonical playback controller.
///
/// Exactly one controller owns a surface at a time. Commands validate,
/// mutate the single state record, drive the surface, and publish
/// [`PlayerEvent`]s; event intake goes through the transition table in
/// [`crate::state`]. While `status == Error` every command is rejected.
pub struct PlayerController {
    surface: Arc<dyn MediaSurface>,
    chrome: Arc<dyn PlayerChrome>,
    state: Mutex<PlayerState>,
    events_tx: broadcast::Sender<PlayerEvent>,
    on_error: Option<FatalErrorCallback>,
    error_reported: AtomicBool,
    touch_primary: bool,
}

impl PlayerController {
    #[must_use]
    pub fn new(
        surface: Arc<dyn MediaSurface>,
        chrome: Arc<dyn PlayerChrome>,
        on_error: Option<FatalErrorCallback>,
        touch_primary: bool,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(64);
        Self {
            surface,
            chrome,
            state: Mutex::new(PlayerState::new()),
            events_tx,
            on_error,
            error_reported: AtomicBool::new(false),
            touch_primary,
        }
    }

    /// Snapshot of the current state record.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state.lock().clone()
    }

    /// Subscribe to player events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events_tx.subscribe()
    }

    /// Sender for components publishing on the controller's behalf
    /// (visibility timers).
    #[must_use]
    pub fn events_sender(&self) -> broadcast::Sender<PlayerEvent> {
        self.events_tx.clone()
    }

    // -- Commands -----------------------------------------------------------------

    /// Play when paused/ready/ended, pause when playing or buffering.
    ///
    /// Marks the first user interaction. A host veto of the play request is
    /// logged and left for the surface events to reconcile.
    pub fn toggle_play(&self) -> Result<(), PlayerError> {
        let status = {
            let mut state = self.state.lock();
            self.guard_not_faulted(&state)?;
            state.has_user_interacted = true;
            state.status
        };

        match status {
            PlaybackStatus::Playing | PlaybackStatus::Buffering => self.surface.pause(),
            _ => {
                if let Err(err) = self.surface.play() {
                    debug!(%err, "play request rejected by host");
                }
            }
        }
        Ok(())
    }

    /// Seek to an absolute position, clamped to `[0, duration]`.
    ///
    /// No-op while the duration is unknown. Marks the first user
    /// interaction.
    pub fn seek_to(&self, seconds: f64) -> Result<(), PlayerError> {
        let target = {
            let mut state = self.state.lock();
            self.guard_not_faulted(&state)?;
            if !state.duration.is_finite() {
                return Ok(());
            }
            state.has_user_interacted = true;
            let target = seconds.clamp(0.0, state.duration);
            state.position = target;
            target
        };

        self.surface.seek(target);
        trace!(target, "seek");
        Ok(())
    }

    /// Seek relative to the current position.
    pub fn skip(&self, delta_seconds: f64) -> Result<(), PlayerError> {
        let from = {
            let state = self.state.lock();
            self.guard_not_faulted(&state)?;
            state.position
        };
        self.seek_to(from + delta_seconds)
    }

    /// Set volume, clamped to `0.0..=1.0`.
    ///
    /// A non-zero value becomes the new restore point for unmute; zero
    /// leaves the restore point untouched.
    pub fn set_volume(&self, volume: f32) -> Result<(), PlayerError> {
        let clamped = {
            let mut state = self.state.lock();
            self.guard_not_faulted(&state)?;
            let clamped = volume.clamp(0.0, 1.0);
            state.volume = clamped;
            if clamped > 0.0 {
                state.previous_volume = clamped;
            }
            clamped
        };

        self.surface.set_volume(clamped);
        let _ = self.events_tx.send(PlayerEvent::VolumeChanged { volume: clamped });
        Ok(())
    }

    /// Mute when audible, otherwise restore the last non-zero volume
    /// (defaulting to full volume if it was never raised).
    pub fn toggle_mute(&self) -> Result<(), PlayerError> {
        let (target, muted) = {
            let mut state = self.state.lock();
            self.guard_not_faulted(&state)?;
            let (target, muted) = if state.volume > 0.0 {
                (0.0, true)
            } else if state.previous_volume > 0.0 {
                (state.previous_volume, false)
            } else {
                (1.0, false)
            };
            state.volume = target;
            if target > 0.0 {
                state.previous_volume = target;
            }
            (target, muted)
        };

        self.surface.set_volume(target);
        let _ = self.events_tx.send(PlayerEvent::MuteChanged { muted });
        let _ = self.events_tx.send(PlayerEvent::VolumeChanged { volume: target });
        Ok(())
    }

    /// Apply a playback rate from the fixed menu.
    pub fn set_rate(&self, rate: f32) -> Result<(), PlayerError> {
        if !RATES.iter().any(|entry| (entry - rate).abs() < f32::EPSILON) {
            return Err(PlayerError::UnsupportedRate { rate });
        }
        {
            let mut state = self.state.lock();
            self.guard_not_faulted(&state)?;
            state.rate = rate;
        }
        self.surface.set_rate(rate);
        let _ = self.events_tx.send(PlayerEvent::RateChanged { rate });
        Ok(())
    }

    /// Request the host to enter or leave fullscreen.
    ///
    /// The `fullscreen` flag itself is only mirrored from
    /// [`PlayerController::fullscreen_changed`], so an external exit (e.g.
    /// Escape) cannot drift from the player's view.
    pub fn toggle_fullscreen(&self) -> Result<(), PlayerError> {
        let fullscreen = {
            let state = self.state.lock();
            self.guard_not_faulted(&state)?;
            state.fullscreen
        };
        if fullscreen {
            self.chrome.exit_fullscreen();
        } else {
            self.chrome.request_fullscreen();
        }
        Ok(())
    }

    /// Host observation of the document fullscreen element.
    pub fn fullscreen_changed(&self, fullscreen: bool) {
        {
            let mut state = self.state.lock();
            if state.fullscreen == fullscreen {
                return;
            }
            state.fullscreen = fullscreen;
        }
        let _ = self
            .events_tx
            .send(PlayerEvent::FullscreenChanged { fullscreen });
    }

    // -- Keyboard -----------------------------------------------------------------

    /// Dispatch a keyboard shortcut.
    ///
    /// Suppressed entirely on touch-primary devices and until the first
    /// user interaction. Returns whether the key was consumed.
    pub fn handle_key(&self, key: &str) -> Result<bool, PlayerError> {
        if self.touch_primary {
            return Ok(false);
        }
        let (interacted, status, duration, volume, rate) = {
            let state = self.state.lock();
            (
                state.has_user_interacted,
                state.status,
                state.duration,
                state.volume,
                state.rate,
            )
        };
        if !interacted {
            return Ok(false);
        }
        let Some(shortcut) = shortcut_for_key(key) else {
            return Ok(false);
        };

        match shortcut {
            Shortcut::TogglePlay => self.toggle_play()?,
            Shortcut::Fullscreen => self.toggle_fullscreen()?,
            Shortcut::Mute => self.toggle_mute()?,
            Shortcut::SeekBy(delta) => self.skip(delta)?,
            Shortcut::VolumeBy(delta) => self.set_volume(volume + delta)?,
            Shortcut::FrameStep(frames) => {
                if status != PlaybackStatus::Paused {
                    return Ok(false);
                }
                self.skip(f64::from(frames) * FRAME_STEP_SECONDS)?;
            }
            Shortcut::RateStep(step) => {
                if let Some(next) = step_rate(rate, step) {
                    self.set_rate(next)?;
                }
            }
            Shortcut::SeekDecile(decile) => {
                if duration.is_finite() {
                    self.seek_to(duration * f64::from(decile) / 10.0)?;
                }
            }
        }
        Ok(true)
    }

    // -- Event intake -------------------------------------------------------------

    /// Fold a surface event into the state record.
    ///
    /// Returns the new status when the event caused a transition.
    pub fn handle_surface_event(&self, event: &SurfaceEvent) -> Option<PlaybackStatus> {
        match event {
            SurfaceEvent::LoadStart => self.apply(StateEvent::LoadStart),
            SurfaceEvent::MetadataLoaded { duration } => {
                {
                    let mut state = self.state.lock();
                    if state.status != PlaybackStatus::Error {
                        state.duration = *duration;
                    }
                }
                self.apply(StateEvent::SourceReady)
            }
            SurfaceEvent::Play => self.apply(StateEvent::Play),
            SurfaceEvent::Pause => self.apply(StateEvent::Pause),
            SurfaceEvent::Waiting => self.apply(StateEvent::Waiting),
            SurfaceEvent::Playing => self.apply(StateEvent::Resumed),
            SurfaceEvent::TimeUpdate {
                position,
                buffered_end,
            } => {
                self.update_clock(*position, *buffered_end);
                None
            }
            SurfaceEvent::Ended => self.apply(StateEvent::Ended),
            SurfaceEvent::Fault { code } => self.handle_surface_fault(*code),
        }
    }

    /// Fold an engine event into the state record.
    ///
    /// Fragment retries are absorbed here; only fatal errors reach the
    /// state machine.
    pub fn handle_engine_event(&self, event: &EngineEvent) -> Option<PlaybackStatus> {
        match event {
            EngineEvent::ManifestParsed { variant_count } => {
                debug!(variant_count, "manifest parsed");
                self.apply(StateEvent::SourceReady)
            }
            EngineEvent::FragmentRetry { attempt, message } => {
                trace!(attempt, %message, "fragment retry absorbed");
                None
            }
            EngineEvent::FatalError { message } => {
                self.fail(PlaybackFaultKind::Network, message.clone())
            }
            EngineEvent::Detached => None,
        }
    }

    /// Enter the terminal error state and report it once per generation.
    pub fn fail(
        &self,
        kind: PlaybackFaultKind,
        message: impl Into<String>,
    ) -> Option<PlaybackStatus> {
        let message = message.into();
        {
            let mut state = self.state.lock();
            if state.status == PlaybackStatus::Error {
                return None;
            }
            state.status = PlaybackStatus::Error;
            state.fault = Some(PlaybackFault {
                kind,
                message: message.clone(),
            });
        }
        warn!(?kind, %message, "playback failed");
        let _ = self.events_tx.send(PlayerEvent::StatusChanged {
            status: PlaybackStatus::Error,
        });
        if !self.error_reported.swap(true, Ordering::SeqCst) {
            if let Some(on_error) = &self.on_error {
                on_error(message);
            }
        }
        Some(PlaybackStatus::Error)
    }

    /// Reset for a new source bind: back to `Loading`, fault cleared, the
    /// error-reported latch re-armed. Volume, rate, fullscreen, and the
    /// interaction flag survive the rebind.
    pub fn reset_for_bind(&self) {
        {
            let mut state = self.state.lock();
            let carried = state.clone();
            *state = PlayerState {
                status: PlaybackStatus::Loading,
                volume: carried.volume,
                previous_volume: carried.previous_volume,
                rate: carried.rate,
                fullscreen: carried.fullscreen,
                has_user_interacted: carried.has_user_interacted,
                ..PlayerState::new()
            };
        }
        self.error_reported.store(false, Ordering::SeqCst);
        let _ = self.events_tx.send(PlayerEvent::StatusChanged {
            status: PlaybackStatus::Loading,
        });
        debug!("state reset for new bind");
    }

    /// Attempt autoplay after the source became ready.
    ///
    /// Best-effort and gated on a prior user interaction; a host veto
    /// leaves the state `Ready`.
    pub fn try_autoplay(&self) {
        let interacted = self.state.lock().has_user_interacted;
        if !interacted {
            return;
        }
        if let Err(err) = self.surface.play() {
            debug!(%err, "autoplay vetoed");
        }
    }

    // -- Internal -----------------------------------------------------------------

    fn apply(&self, event: StateEvent) -> Option<PlaybackStatus> {
        let next = {
            let mut state = self.state.lock();
            let next = next_status(state.status, event)?;
            if next == state.status {
                return None;
            }
            debug!(from = ?state.status, to = ?next, ?event, "status transition");
            state.status = next;
            next
        };
        let _ = self.events_tx.send(PlayerEvent::StatusChanged { status: next });
        Some(next)
    }

    /// Refresh position and buffered fraction; live in every state except
    /// `Error`, so the seek bar keeps moving even while buffering.
    fn update_clock(&self, position: f64, buffered_end: f64) {
        let mut state = self.state.lock();
        if state.status == PlaybackStatus::Error {
            return;
        }
        state.position = position;
        state.buffered = if state.duration.is_finite() && state.duration > 0.0 {
            (buffered_end / state.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn handle_surface_fault(&self, code: SurfaceErrorCode) -> Option<PlaybackStatus> {
        match code {
            // Element-level aborts come from a superseded bind; a rebind
            // follows immediately, so this never enters the error state.
            SurfaceErrorCode::Aborted => {
                debug!("transient abort ignored");
                None
            }
            SurfaceErrorCode::Network => self.fail(
                PlaybackFaultKind::Network,
                "media surface reported a network failure",
            ),
            SurfaceErrorCode::Decode => self.fail(
                PlaybackFaultKind::Decode,
                "media surface failed to decode the stream",
            ),
            SurfaceErrorCode::SrcNotSupported => self.fail(
                PlaybackFaultKind::UnsupportedFormat,
                "media surface cannot play this source",
            ),
        }
    }

    fn guard_not_faulted(&self, state: &PlayerState) -> Result<(), PlayerError> {
        if state.status == PlaybackStatus::Error {
            return Err(PlayerError::Faulted);
        }
        Ok(())
    }
}
