#![forbid(unsafe_code)]

//! The assembled player: binds sources, pumps surface and engine events
//! through the controller, and owns teardown.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use aula_events::{EngineEvent, Event, EventBus, SurfaceEvent};
use aula_media::{BindMode, EngineBinding, EngineFactory, MediaSurface, SourceKind};
use aula_player::{
    PlaybackStatus, PlayerChrome, PlayerController, PlayerError, PlayerEvent, PlayerState,
    StyleGuard, VisibilityController,
};
use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::config::PlayerConfig;

/// Cancels the event pump of one bind generation.
struct PumpHandle {
    token: CancellationToken,
}

/// A mounted player instance.
///
/// Created from a [`PlayerConfig`] plus the three host seams: the media
/// surface, the adaptive engine factory, and the chrome. Each bound source
/// gets its own event-pump generation; swapping the source cancels the old
/// pump before the old engine is destroyed, so stale events can never
/// touch the new state.
pub struct Player {
    surface: Arc<dyn MediaSurface>,
    controller: Arc<PlayerController>,
    visibility: Arc<VisibilityController>,
    binding: Arc<EngineBinding>,
    bus: EventBus,
    styles: StyleGuard,
    poster: Option<Url>,
    autoplay: bool,
    cancel: CancellationToken,
    pump: Mutex<Option<PumpHandle>>,
    shutdown_done: AtomicBool,
}

impl Player {
    /// Mount a player and bind the configured source.
    ///
    /// # Errors
    ///
    /// Returns an error when the source string is not a valid URL. An
    /// unsupported-but-valid source does not error here; it drives the
    /// player into its error state and fires `on_error` instead.
    pub async fn new(
        config: PlayerConfig,
        surface: Arc<dyn MediaSurface>,
        factory: Arc<dyn EngineFactory>,
        chrome: Arc<dyn PlayerChrome>,
    ) -> Result<Self, PlayerError> {
        let cancel = config
            .cancel
            .clone()
            .unwrap_or_default()
            .child_token();

        let controller = Arc::new(PlayerController::new(
            Arc::clone(&surface),
            Arc::clone(&chrome),
            config.on_error.clone(),
            config.touch_primary,
        ));
        let visibility = Arc::new(VisibilityController::with_delays(
            controller.events_sender(),
            config.touch_primary,
            config.controls_hide_delay,
            config.volume_hide_delay,
        ));
        let styles = StyleGuard::acquire(chrome);
        let binding = Arc::new(EngineBinding::new(factory, config.engine.clone()));

        let player = Self {
            surface,
            controller,
            visibility,
            binding,
            bus: EventBus::default(),
            styles,
            poster: config.poster.clone(),
            autoplay: config.autoplay,
            cancel,
            pump: Mutex::new(None),
            shutdown_done: AtomicBool::new(false),
        };
        player.rebind(&config.src)?;
        Ok(player)
    }

    // -- Source binding -----------------------------------------------------------

    /// Swap to a new source.
    ///
    /// Volume, rate, fullscreen, and the interaction flag carry over; the
    /// rest of the state resets to loading.
    ///
    /// # Errors
    ///
    /// Returns an error when the source string is not a valid URL; the
    /// current bind keeps playing untouched in that case.
    pub fn set_source(&self, src: &str) -> Result<(), PlayerError> {
        self.rebind(src)
    }

    fn rebind(&self, src: &str) -> Result<(), PlayerError> {
        // Validate before touching the live bind: a rejected source string
        // must leave current playback intact.
        let kind = SourceKind::classify(src)?;

        // Old generation first: no pump may observe the teardown below.
        self.stop_pump();
        self.binding.unbind(self.surface.as_ref());

        self.controller.reset_for_bind();
        self.visibility.playback_status_changed(
            PlaybackStatus::Loading,
            self.controller.state().has_user_interacted,
        );

        match self.binding.bind(&kind, &self.surface) {
            Ok(mode) => {
                debug!(?mode, "source bound");
                self.spawn_pump();
                Ok(())
            }
            Err(err) => {
                // Unplayable source: terminal state, reported via on_error.
                let kind = (&err).into();
                self.controller.fail(kind, err.to_string());
                Ok(())
            }
        }
    }

    /// Delivery mode of the current bind, if any.
    #[must_use]
    pub fn bind_mode(&self) -> Option<BindMode> {
        self.binding.mode()
    }

    // -- Event pump ---------------------------------------------------------------

    fn spawn_pump(&self) {
        let token = self.cancel.child_token();
        let mut surface_rx = self.surface.events();
        let mut engine_rx = self.binding.engine_events();

        let controller = Arc::clone(&self.controller);
        let visibility = Arc::clone(&self.visibility);
        let binding = Arc::clone(&self.binding);
        let surface = Arc::clone(&self.surface);
        let bus = self.bus.clone();
        let autoplay = self.autoplay;

        let pump_token = token.clone();
        tokio::spawn(async move {
            loop {
                // Biased so a cancelled generation never applies an event
                // that raced with its teardown.
                tokio::select! {
                    biased;
                    () = pump_token.cancelled() => break,
                    result = surface_rx.recv() => match result {
                        Ok(event) => {
                            bus.publish(event.clone());
                            Self::pump_surface_event(
                                &event, &controller, &visibility, &binding, &surface, autoplay,
                            );
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "surface event stream lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    event = recv_engine(&mut engine_rx) => match event {
                        Some(event) => {
                            bus.publish(event.clone());
                            Self::pump_engine_event(
                                &event, &controller, &visibility, &binding, &surface, autoplay,
                            );
                        }
                        None => engine_rx = None,
                    },
                }
            }
            debug!("event pump finished");
        });

        *self.pump.lock() = Some(PumpHandle { token });
    }

    fn pump_surface_event(
        event: &SurfaceEvent,
        controller: &PlayerController,
        visibility: &VisibilityController,
        binding: &EngineBinding,
        surface: &Arc<dyn MediaSurface>,
        autoplay: bool,
    ) {
        let Some(status) = controller.handle_surface_event(event) else {
            return;
        };
        Self::after_transition(status, controller, visibility, binding, surface, autoplay);
    }

    fn pump_engine_event(
        event: &EngineEvent,
        controller: &PlayerController,
        visibility: &VisibilityController,
        binding: &EngineBinding,
        surface: &Arc<dyn MediaSurface>,
        autoplay: bool,
    ) {
        let Some(status) = controller.handle_engine_event(event) else {
            return;
        };
        Self::after_transition(status, controller, visibility, binding, surface, autoplay);
    }

    fn after_transition(
        status: PlaybackStatus,
        controller: &PlayerController,
        visibility: &VisibilityController,
        binding: &EngineBinding,
        surface: &Arc<dyn MediaSurface>,
        autoplay: bool,
    ) {
        visibility.playback_status_changed(status, controller.state().has_user_interacted);
        match status {
            PlaybackStatus::Ready if autoplay => controller.try_autoplay(),
            // A fatal failure leaves no live engine behind.
            PlaybackStatus::Error => binding.unbind(surface.as_ref()),
            _ => {}
        }
    }

    fn stop_pump(&self) {
        if let Some(handle) = self.pump.lock().take() {
            handle.token.cancel();
        }
    }

    // -- Commands -----------------------------------------------------------------

    /// Play when paused, pause when playing.
    pub fn toggle_play(&self) -> Result<(), PlayerError> {
        self.controller.toggle_play()
    }

    /// Seek to an absolute position in seconds.
    pub fn seek_to(&self, seconds: f64) -> Result<(), PlayerError> {
        self.controller.seek_to(seconds)
    }

    /// Seek relative to the current position.
    pub fn skip(&self, delta_seconds: f64) -> Result<(), PlayerError> {
        self.controller.skip(delta_seconds)
    }

    /// Set volume in `0.0..=1.0`.
    pub fn set_volume(&self, volume: f32) -> Result<(), PlayerError> {
        self.controller.set_volume(volume)
    }

    /// Mute, or restore the previous volume.
    pub fn toggle_mute(&self) -> Result<(), PlayerError> {
        self.controller.toggle_mute()
    }

    /// Apply a playback rate from the fixed menu.
    pub fn set_rate(&self, rate: f32) -> Result<(), PlayerError> {
        self.controller.set_rate(rate)
    }

    /// Request the host to enter or leave fullscreen.
    pub fn toggle_fullscreen(&self) -> Result<(), PlayerError> {
        self.controller.toggle_fullscreen()
    }

    /// Host observation of the fullscreen element.
    pub fn fullscreen_changed(&self, fullscreen: bool) {
        self.controller.fullscreen_changed(fullscreen);
    }

    /// Dispatch a keyboard shortcut. Returns whether the key was consumed.
    pub fn handle_key(&self, key: &str) -> Result<bool, PlayerError> {
        self.controller.handle_key(key)
    }

    // -- Interaction --------------------------------------------------------------

    /// Pointer moved over the player.
    pub fn pointer_activity(&self) {
        let state = self.controller.state();
        self.visibility
            .pointer_activity(state.status, state.has_user_interacted);
    }

    /// Pointer entered the volume cluster.
    pub fn volume_pointer_enter(&self) {
        self.visibility.volume_pointer_enter();
    }

    /// Pointer left the volume cluster.
    pub fn volume_pointer_leave(&self) {
        self.visibility.volume_pointer_leave();
    }

    // -- Observation --------------------------------------------------------------

    /// Snapshot of the player state.
    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.controller.state()
    }

    /// Poster image shown while [`PlayerState::shows_center_play`] holds
    /// and no frame has rendered yet.
    #[must_use]
    pub fn poster(&self) -> Option<&Url> {
        self.poster.as_ref()
    }

    /// Subscribe to player events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.controller.subscribe()
    }

    /// Subscribe to the raw surface/engine event stream, as pumped by the
    /// live bind generation. Diagnostics-oriented; state observation goes
    /// through [`Player::subscribe`].
    #[must_use]
    pub fn pipeline_events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.visibility.controls_visible()
    }

    #[must_use]
    pub fn volume_slider_visible(&self) -> bool {
        self.visibility.volume_slider_visible()
    }

    // -- Teardown -----------------------------------------------------------------

    /// Unmount the player: cancel the pump, destroy the engine, clear the
    /// surface, stop all timers, and remove injected styles.
    ///
    /// Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        if self.shutdown_done.swap(true, Ordering::SeqCst) {
            return;
        }
        self.stop_pump();
        self.binding.unbind(self.surface.as_ref());
        self.visibility.shutdown();
        self.styles.release();
        self.cancel.cancel();
        debug!("player unmounted");
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Receive from an optional engine channel; pends forever when the bind
/// has no engine so the surface arm of the select keeps running.
async fn recv_engine(
    rx: &mut Option<broadcast::Receiver<EngineEvent>>,
) -> Option<EngineEvent> {
    match rx {
        Some(receiver) => loop {
            match receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "engine event stream lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        },
        None => std::future::pending().await,
    }
}
