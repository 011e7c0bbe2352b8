//! Terminal outcomes and the common minigame surface
//!
//! Every minigame runs to exactly one terminal [`Outcome`]; the host layer
//! watches for it and fires the completion callbacks. Reaching an outcome is
//! a designed result, never an error.

use serde::{Deserialize, Serialize};

/// How one game attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Player reached the winning condition; the host should advance.
    Won,
    /// Player lost (collision, grid overflow, CPU reached the win score).
    Lost,
    /// Neither side can win (Tic-Tac-Toe full board).
    Draw,
    /// The round timer expired before the win threshold was met.
    Timeout,
}

impl Outcome {
    /// True only for the outcome that unlocks progression.
    pub fn player_won(self) -> bool {
        matches!(self, Outcome::Won)
    }
}

/// Uniform per-frame surface the host session drives.
///
/// Implementations keep their own pending-input buffers (filled by the
/// host's event handlers between frames) and their own fixed-step
/// accumulators; `advance` applies input, integrates physics/AI, resolves
/// collisions and evaluates the terminal condition, in that order.
pub trait Minigame {
    /// Advance the simulation by one frame of `dt` seconds.
    /// Must be a no-op once an outcome has been reached.
    fn advance(&mut self, dt: f32);

    /// Terminal outcome, once reached. `None` while the attempt is live.
    fn outcome(&self) -> Option<Outcome>;

    /// Serialize the renderable state for the JS view.
    fn snapshot(&self) -> serde_json::Value;
}
