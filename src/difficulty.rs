//! Difficulty levels and per-game tuning
//!
//! The host hands each minigame a difficulty in 1..=5, fixed for the length
//! of one attempt. Each game derives its concrete tunables from it exactly
//! once at construction instead of re-deriving them ad hoc inside the tick.

use serde::{Deserialize, Serialize};

/// Difficulty level, clamped to 1..=5. Immutable during one game attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(5);

    /// Build a difficulty, clamping out-of-range values into 1..=5.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 5))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Level as a scale factor (1.0 at minimum difficulty, 5.0 at maximum).
    pub fn factor(self) -> f32 {
        f32::from(self.0)
    }

    /// Normalized position in [0, 1] across the difficulty range.
    pub fn lerp01(self) -> f32 {
        f32::from(self.0 - 1) / 4.0
    }

    /// Next difficulty after a player win, capped at the maximum.
    ///
    /// Escalation only happens on a win that leads to "play again"; the host
    /// decides when to call this based on the `on_play_again` signal.
    pub fn escalated(self) -> Self {
        Self((self.0 + 1).min(5))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamping() {
        assert_eq!(Difficulty::new(0).level(), 1);
        assert_eq!(Difficulty::new(3).level(), 3);
        assert_eq!(Difficulty::new(99).level(), 5);
    }

    #[test]
    fn test_escalation_caps_at_max() {
        let mut d = Difficulty::new(4);
        d = d.escalated();
        assert_eq!(d, Difficulty::MAX);
        assert_eq!(d.escalated(), Difficulty::MAX);
    }

    #[test]
    fn test_lerp01_range() {
        assert_eq!(Difficulty::MIN.lerp01(), 0.0);
        assert_eq!(Difficulty::MAX.lerp01(), 1.0);
    }
}
