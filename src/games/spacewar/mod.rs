//! Space War: gravity-well dogfight against a CPU pilot
//!
//! Continuous physics on a toroidal field with a sun at the center pulling
//! everything inward. Split like the other continuous sims:
//! - `state`: entities, pools, tuning
//! - `tick`: per-frame integration and collision resolution
//! - `ai`: the CPU pilot (sun avoidance pre-empting pursuit)

pub mod ai;
pub mod state;
pub mod tick;

pub use ai::cpu_command;
pub use state::{
    Bullet, Ship, ShipCommand, Side, SpaceWarConfig, SpaceWarState, FIELD_H, FIELD_W, MAX_BULLETS,
    SHIP_RADIUS, SUN_POS, SUN_RADIUS, WIN_SCORE,
};
pub use tick::{tick, SpaceWarGame};
