#![forbid(unsafe_code)]

//! Keyboard shortcut map.
//!
//! Pure key-to-shortcut resolution; gating (first interaction, touch
//! devices, focus) lives in the controller.

use crate::types::RATES;

/// A resolved keyboard shortcut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shortcut {
    TogglePlay,
    Fullscreen,
    Mute,
    /// Relative seek in seconds.
    SeekBy(f64),
    /// Relative volume change.
    VolumeBy(f32),
    /// Frame-accurate nudge, only honored while paused.
    FrameStep(i32),
    /// Step through the rate menu.
    RateStep(i32),
    /// Jump to `n * 10%` of the duration.
    SeekDecile(u8),
}

/// Resolve a key (as reported by the host, `KeyboardEvent.key` style) to
/// its shortcut, if any.
#[must_use]
pub fn shortcut_for_key(key: &str) -> Option<Shortcut> {
    let shortcut = match key {
        " " | "k" => Shortcut::TogglePlay,
        "f" => Shortcut::Fullscreen,
        "m" => Shortcut::Mute,
        "ArrowLeft" => Shortcut::SeekBy(-5.0),
        "ArrowRight" => Shortcut::SeekBy(5.0),
        "j" => Shortcut::SeekBy(-10.0),
        "l" => Shortcut::SeekBy(10.0),
        "ArrowUp" => Shortcut::VolumeBy(0.05),
        "ArrowDown" => Shortcut::VolumeBy(-0.05),
        "," => Shortcut::FrameStep(-1),
        "." => Shortcut::FrameStep(1),
        "<" => Shortcut::RateStep(-1),
        ">" => Shortcut::RateStep(1),
        _ => {
            let digit = key.parse::<u8>().ok().filter(|n| *n <= 9)?;
            Shortcut::SeekDecile(digit)
        }
    };
    Some(shortcut)
}

/// Step through [`RATES`] relative to the current rate.
///
/// Returns `None` at either end of the menu, or when the current rate is
/// not a menu value (the menu is the only writer of the rate, so that
/// would mean external interference).
#[must_use]
pub fn step_rate(current: f32, step: i32) -> Option<f32> {
    let index = RATES
        .iter()
        .position(|rate| (rate - current).abs() < f32::EPSILON)?;
    let next = index.checked_add_signed(step as isize)?;
    RATES.get(next).copied()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(" ", Shortcut::TogglePlay)]
    #[case("k", Shortcut::TogglePlay)]
    #[case("f", Shortcut::Fullscreen)]
    #[case("m", Shortcut::Mute)]
    #[case("ArrowLeft", Shortcut::SeekBy(-5.0))]
    #[case("ArrowRight", Shortcut::SeekBy(5.0))]
    #[case("j", Shortcut::SeekBy(-10.0))]
    #[case("l", Shortcut::SeekBy(10.0))]
    #[case("ArrowUp", Shortcut::VolumeBy(0.05))]
    #[case("ArrowDown", Shortcut::VolumeBy(-0.05))]
    #[case(",", Shortcut::FrameStep(-1))]
    #[case(".", Shortcut::FrameStep(1))]
    #[case("<", Shortcut::RateStep(-1))]
    #[case(">", Shortcut::RateStep(1))]
    #[case("0", Shortcut::SeekDecile(0))]
    #[case("5", Shortcut::SeekDecile(5))]
    #[case("9", Shortcut::SeekDecile(9))]
    fn key_map(#[case] key: &str, #[case] expected: Shortcut) {
        assert_eq!(shortcut_for_key(key), Some(expected));
    }

    #[rstest]
    #[case("q")]
    #[case("Escape")]
    #[case("10")]
    #[case("")]
    fn unmapped_keys(#[case] key: &str) {
        assert_eq!(shortcut_for_key(key), None);
    }

    #[test]
    fn rate_steps_through_the_menu() {
        assert_eq!(step_rate(1.0, 1), Some(1.25));
        assert_eq!(step_rate(1.0, -1), Some(0.75));
        assert_eq!(step_rate(2.0, 1), None);
        assert_eq!(step_rate(0.25, -1), None);
    }

    #[test]
    fn rate_step_rejects_off_menu_rates() {
        assert_eq!(step_rate(1.1, 1), None);
    }
}
