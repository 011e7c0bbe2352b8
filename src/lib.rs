//! CLSFYD arcade core
//!
//! The real-time minigame subsystem of the CLSFYD browser puzzle game:
//! deterministic simulations for Pong, Tic-Tac-Toe, Space War, Tetris,
//! Snake, Morse keying and the duck gallery.
//!
//! Core modules:
//! - `geom`: shared collision/geometry primitives
//! - `clock`: frame timing and fixed-step accumulation
//! - `difficulty`: the 1..=5 difficulty scale and escalation rule
//! - `outcome`: terminal outcomes and the `Minigame` trait
//! - `games`: one module per minigame (pure `tick` + `*Game` wrapper)
//! - `host`: wasm-bindgen sessions the browser shell mounts
//!
//! Every simulation is pure and seeded: no platform calls inside a tick,
//! stable results for a given seed and input sequence. The host layer owns
//! the browser.

pub mod clock;
pub mod difficulty;
pub mod games;
pub mod geom;
pub mod outcome;

#[cfg(target_arch = "wasm32")]
pub mod host;

pub use difficulty::Difficulty;
pub use outcome::{Minigame, Outcome};
