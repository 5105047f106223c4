#![forbid(unsafe_code)]

//! The canonical player state and its transition table.
//!
//! Both the media surface and the adaptive engine feed one table keyed by
//! `(current status, event)`. Illegal combinations are simply absent, so
//! they cannot produce a transition.

use crate::types::{PlaybackFault, PlaybackStatus};

/// State-machine triggers, normalized from surface and engine events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateEvent {
    /// The surface started loading a source.
    LoadStart,
    /// Manifest parsed (adaptive) or metadata loaded (progressive).
    SourceReady,
    Play,
    Pause,
    /// Stalled waiting for data.
    Waiting,
    /// Resumed after a stall.
    Resumed,
    Ended,
    /// Fatal failure from either event source.
    Fault,
}

/// The single mutable player record, owned exclusively by the controller
/// and exposed read-only as snapshots.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub status: PlaybackStatus,
    /// Current position in seconds.
    pub position: f64,
    /// Total duration in seconds; NaN until metadata resolves.
    pub duration: f64,
    /// Buffered fraction of the media, `0.0..=1.0`.
    pub buffered: f64,
    pub volume: f32,
    /// Last non-zero volume, restored on unmute.
    pub previous_volume: f32,
    pub rate: f32,
    /// Mirror of the host's fullscreen observation; never written by the
    /// fullscreen command itself.
    pub fullscreen: bool,
    pub fault: Option<PlaybackFault>,
    /// Set once on the first play/pause/seek command; gates keyboard
    /// shortcuts and autoplay-after-load.
    pub has_user_interacted: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            position: 0.0,
            duration: f64::NAN,
            buffered: 0.0,
            volume: 1.0,
            previous_volume: 1.0,
            rate: 1.0,
            fullscreen: false,
            fault: None,
            has_user_interacted: false,
        }
    }

    /// Whether the center play affordance is shown.
    ///
    /// Cleared when playback starts, re-shown once the media ends.
    #[must_use]
    pub fn shows_center_play(&self) -> bool {
        matches!(
            self.status,
            PlaybackStatus::Idle
                | PlaybackStatus::Ready
                | PlaybackStatus::Paused
                | PlaybackStatus::Ended
        )
    }

    /// Whether the player is effectively muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.volume <= 0.0
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// The transition table.
///
/// Returns the new status, or `None` when the event does not transition
/// out of `current`. [`PlaybackStatus::Error`] is terminal: nothing maps
/// out of it; recovery is an explicit state reset on re-bind.
#[must_use]
pub fn next_status(current: PlaybackStatus, event: StateEvent) -> Option<PlaybackStatus> {
    use PlaybackStatus as S;
    use StateEvent as E;

    match (current, event) {
        (S::Error, _) => None,
        (_, E::Fault) => Some(S::Error),
        (_, E::LoadStart) => Some(S::Loading),
        (S::Idle | S::Loading, E::SourceReady) => Some(S::Ready),
        (S::Ready | S::Paused | S::Buffering | S::Ended, E::Play) => Some(S::Playing),
        (S::Playing | S::Buffering, E::Pause) => Some(S::Paused),
        (S::Ready | S::Playing | S::Paused, E::Waiting) => Some(S::Buffering),
        (S::Buffering, E::Resumed) => Some(S::Playing),
        (S::Playing | S::Buffering, E::Ended) => Some(S::Ended),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use PlaybackStatus as S;
    use StateEvent as E;

    #[rstest]
    #[case(S::Idle, E::LoadStart, Some(S::Loading))]
    #[case(S::Loading, E::SourceReady, Some(S::Ready))]
    #[case(S::Ready, E::Play, Some(S::Playing))]
    #[case(S::Playing, E::Pause, Some(S::Paused))]
    #[case(S::Paused, E::Play, Some(S::Playing))]
    #[case(S::Playing, E::Waiting, Some(S::Buffering))]
    #[case(S::Buffering, E::Resumed, Some(S::Playing))]
    #[case(S::Buffering, E::Pause, Some(S::Paused))]
    #[case(S::Playing, E::Ended, Some(S::Ended))]
    #[case(S::Ended, E::Play, Some(S::Playing))]
    fn documented_transitions(
        #[case] current: S,
        #[case] event: E,
        #[case] expected: Option<S>,
    ) {
        assert_eq!(next_status(current, event), expected);
    }

    #[rstest]
    #[case(S::Idle)]
    #[case(S::Loading)]
    #[case(S::Ready)]
    #[case(S::Playing)]
    #[case(S::Paused)]
    #[case(S::Buffering)]
    #[case(S::Ended)]
    fn fault_is_reachable_from_any_non_terminal_state(#[case] current: S) {
        assert_eq!(next_status(current, E::Fault), Some(S::Error));
    }

    #[rstest]
    #[case(E::LoadStart)]
    #[case(E::SourceReady)]
    #[case(E::Play)]
    #[case(E::Pause)]
    #[case(E::Waiting)]
    #[case(E::Resumed)]
    #[case(E::Ended)]
    #[case(E::Fault)]
    fn error_state_is_terminal(#[case] event: E) {
        assert_eq!(next_status(S::Error, event), None);
    }

    #[test]
    fn source_swap_mid_playback_returns_to_loading() {
        assert_eq!(next_status(S::Playing, E::LoadStart), Some(S::Loading));
    }

    #[rstest]
    #[case(S::Idle, true)]
    #[case(S::Ready, true)]
    #[case(S::Paused, true)]
    #[case(S::Ended, true)]
    #[case(S::Playing, false)]
    #[case(S::Buffering, false)]
    #[case(S::Loading, false)]
    #[case(S::Error, false)]
    fn center_play_affordance(#[case] status: S, #[case] shown: bool) {
        let state = PlayerState {
            status,
            ..PlayerState::new()
        };
        assert_eq!(state.shows_center_play(), shown);
    }

    #[test]
    fn fresh_state_defaults() {
        let state = PlayerState::new();
        assert_eq!(state.status, S::Idle);
        assert!(state.duration.is_nan());
        assert!((state.volume - 1.0).abs() < f32::EPSILON);
        assert!(!state.has_user_interacted);
        assert!(state.fault.is_none());
    }
}
