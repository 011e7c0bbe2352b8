//! The minigames
//!
//! Each game follows the same shape: a serializable state struct, a pure
//! step/tick function over it, a config derived from difficulty once per
//! attempt, and a `*Game` wrapper implementing [`crate::outcome::Minigame`]
//! that owns the RNG and frame accumulation.

pub mod ducks;
pub mod morse;
pub mod oxo;
pub mod pong;
pub mod snake;
pub mod spacewar;
pub mod tetris;
