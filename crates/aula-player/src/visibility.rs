#![forbid(unsafe_code)]

//! Auto-hide timers for the control bar and the volume slider.
//!
//! Two independent timer families: controls hide after a short idle while
//! playing, the volume slider hides shortly after the pointer leaves it.
//! Every schedule cancels the previous timer first, so a burst of pointer
//! activity nets exactly one pending hide.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{events::PlayerEvent, types::PlaybackStatus};

/// Default idle delay before the control bar hides during playback.
pub const CONTROLS_HIDE_DELAY: Duration = Duration::from_secs(3);

/// Default delay before the volume slider hides after the pointer leaves.
pub const VOLUME_HIDE_DELAY: Duration = Duration::from_millis(1500);

// -- HideTimer ----------------------------------------------------------------

/// A single cancellable delayed action.
///
/// At most one timer is pending at a time; scheduling replaces (and
/// cancels) any previous one.
struct HideTimer {
    current: Mutex<Option<CancellationToken>>,
}

impl HideTimer {
    fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Cancel the pending timer, if any, and start a new one.
    fn schedule<F>(&self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.current.lock().replace(token.clone()) {
            previous.cancel();
        }
        tokio::spawn(async move {
            // Biased so cancellation wins over an already-elapsed sleep.
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => on_fire(),
            }
        });
    }

    /// Cancel the pending timer, if any.
    fn cancel(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
    }
}

// -- VisibilityController -----------------------------------------------------

/// Drives the visibility of the control bar and the volume slider.
///
/// Publishes [`PlayerEvent::ControlsVisibilityChanged`] and
/// [`PlayerEvent::VolumeSliderVisibilityChanged`] on the shared player
/// event channel whenever a flag actually flips.
pub struct VisibilityController {
    events_tx: broadcast::Sender<PlayerEvent>,
    controls_visible: Arc<AtomicBool>,
    volume_visible: Arc<AtomicBool>,
    controls_timer: HideTimer,
    volume_timer: HideTimer,
    controls_delay: Duration,
    volume_delay: Duration,
    touch_primary: bool,
}

impl VisibilityController {
    #[must_use]
    pub fn new(events_tx: broadcast::Sender<PlayerEvent>, touch_primary: bool) -> Self {
        Self::with_delays(events_tx, touch_primary, CONTROLS_HIDE_DELAY, VOLUME_HIDE_DELAY)
    }

    #[must_use]
    pub fn with_delays(
        events_tx: broadcast::Sender<PlayerEvent>,
        touch_primary: bool,
        controls_delay: Duration,
        volume_delay: Duration,
    ) -> Self {
        Self {
            events_tx,
            controls_visible: Arc::new(AtomicBool::new(true)),
            volume_visible: Arc::new(AtomicBool::new(false)),
            controls_timer: HideTimer::new(),
            volume_timer: HideTimer::new(),
            controls_delay,
            volume_delay,
            touch_primary,
        }
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.controls_visible.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn volume_slider_visible(&self) -> bool {
        self.volume_visible.load(Ordering::SeqCst)
    }

    /// Pointer moved (or tapped, on touch devices) over the player.
    ///
    /// Shows the controls and, while playing after the first interaction,
    /// re-arms the hide timer.
    pub fn pointer_activity(&self, status: PlaybackStatus, interacted: bool) {
        self.set_controls_visible(true);
        if status == PlaybackStatus::Playing && interacted {
            self.arm_controls_timer();
        } else {
            self.controls_timer.cancel();
        }
    }

    /// Playback status changed.
    ///
    /// Entering playback arms the hide timer; leaving it pins the controls
    /// visible (paused, buffering, ended, and error states all keep the
    /// bar on screen). Auto-hide never runs before the first interaction.
    pub fn playback_status_changed(&self, status: PlaybackStatus, interacted: bool) {
        if status == PlaybackStatus::Playing && interacted {
            self.arm_controls_timer();
        } else {
            self.controls_timer.cancel();
            self.set_controls_visible(true);
        }
    }

    /// Pointer entered the volume cluster: show the slider, keep it shown.
    pub fn volume_pointer_enter(&self) {
        if self.touch_primary {
            return;
        }
        self.volume_timer.cancel();
        self.set_volume_visible(true);
    }

    /// Pointer left the volume cluster: hide the slider after a grace
    /// period, so a brief excursion does not collapse it.
    pub fn volume_pointer_leave(&self) {
        if self.touch_primary {
            return;
        }
        let visible = Arc::clone(&self.volume_visible);
        let events_tx = self.events_tx.clone();
        self.volume_timer.schedule(self.volume_delay, move || {
            if visible.swap(false, Ordering::SeqCst) {
                trace!("volume slider hidden");
                let _ = events_tx.send(PlayerEvent::VolumeSliderVisibilityChanged {
                    visible: false,
                });
            }
        });
    }

    /// Cancel all pending timers. No visibility flag changes after this.
    pub fn shutdown(&self) {
        self.controls_timer.cancel();
        self.volume_timer.cancel();
    }

    fn arm_controls_timer(&self) {
        // Touch devices toggle controls by tap; nothing auto-hides.
        if self.touch_primary {
            return;
        }
        let visible = Arc::clone(&self.controls_visible);
        let events_tx = self.events_tx.clone();
        self.controls_timer.schedule(self.controls_delay, move || {
            if visible.swap(false, Ordering::SeqCst) {
                trace!("controls hidden after idle");
                let _ = events_tx.send(PlayerEvent::ControlsVisibilityChanged { visible: false });
            }
        });
    }

    fn set_controls_visible(&self, value: bool) {
        if self.controls_visible.swap(value, Ordering::SeqCst) != value {
            let _ = self
                .events_tx
                .send(PlayerEvent::ControlsVisibilityChanged { visible: value });
        }
    }

    fn set_volume_visible(&self, value: bool) {
        if self.volume_visible.swap(value, Ordering::SeqCst) != value {
            let _ = self
                .events_tx
                .send(PlayerEvent::VolumeSliderVisibilityChanged { visible: value });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (VisibilityController, broadcast::Receiver<PlayerEvent>) {
        let (tx, rx) = broadcast::channel(64);
        (VisibilityController::new(tx, false), rx)
    }

    async fn settle() {
        // With start_paused, sleep auto-advances the mock clock past any
        // pending timer and yields to spawned tasks.
        tokio::time::sleep(CONTROLS_HIDE_DELAY + Duration::from_millis(100)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn controls_hide_after_idle_while_playing() {
        let (vis, _rx) = controller();
        assert!(vis.controls_visible());

        vis.playback_status_changed(PlaybackStatus::Playing, true);
        settle().await;
        assert!(!vis.controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn controls_never_hide_before_first_interaction() {
        let (vis, _rx) = controller();
        vis.playback_status_changed(PlaybackStatus::Playing, false);
        settle().await;
        assert!(vis.controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn controls_never_hide_on_touch_primary() {
        let (tx, _rx) = broadcast::channel(64);
        let vis = VisibilityController::new(tx, true);
        vis.playback_status_changed(PlaybackStatus::Playing, true);
        settle().await;
        assert!(vis.controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_pins_controls_visible() {
        let (vis, _rx) = controller();
        vis.playback_status_changed(PlaybackStatus::Playing, true);
        settle().await;
        assert!(!vis.controls_visible());

        vis.playback_status_changed(PlaybackStatus::Paused, true);
        settle().await;
        assert!(vis.controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_activity_reschedules_instead_of_stacking() {
        let (vis, _rx) = controller();
        vis.playback_status_changed(PlaybackStatus::Playing, true);

        // Keep the pointer moving just under the deadline.
        for _ in 0..3 {
            tokio::time::sleep(CONTROLS_HIDE_DELAY - Duration::from_millis(500)).await;
            vis.pointer_activity(PlaybackStatus::Playing, true);
            assert!(vis.controls_visible());
        }

        settle().await;
        assert!(!vis.controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_activity_while_paused_does_not_arm_a_timer() {
        let (vis, _rx) = controller();
        vis.pointer_activity(PlaybackStatus::Paused, true);
        settle().await;
        assert!(vis.controls_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn volume_slider_hides_after_pointer_leaves() {
        let (vis, _rx) = controller();
        vis.volume_pointer_enter();
        assert!(vis.volume_slider_visible());

        vis.volume_pointer_leave();
        assert!(vis.volume_slider_visible());
        settle().await;
        assert!(!vis.volume_slider_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn reentering_volume_cluster_cancels_the_hide() {
        let (vis, _rx) = controller();
        vis.volume_pointer_enter();
        vis.volume_pointer_leave();

        tokio::time::sleep(VOLUME_HIDE_DELAY / 2).await;
        vis.volume_pointer_enter();
        settle().await;
        assert!(vis.volume_slider_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn touch_devices_ignore_hover_on_volume() {
        let (tx, _rx) = broadcast::channel(64);
        let vis = VisibilityController::new(tx, true);
        vis.volume_pointer_enter();
        assert!(!vis.volume_slider_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_hides() {
        let (vis, _rx) = controller();
        vis.playback_status_changed(PlaybackStatus::Playing, true);
        vis.volume_pointer_enter();
        vis.volume_pointer_leave();

        vis.shutdown();
        settle().await;
        assert!(vis.controls_visible());
        assert!(vis.volume_slider_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn visibility_changes_are_published() {
        let (vis, mut rx) = controller();
        vis.playback_status_changed(PlaybackStatus::Playing, true);
        settle().await;

        assert!(matches!(
            rx.recv().await,
            Ok(PlayerEvent::ControlsVisibilityChanged { visible: false })
        ));
    }
}
