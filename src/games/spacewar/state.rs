//! Space War entities and tuning

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::geom::heading_vec;
use crate::outcome::Outcome;

pub const FIELD_W: f32 = 800.0;
pub const FIELD_H: f32 = 600.0;
pub const SUN_POS: Vec2 = Vec2::new(FIELD_W / 2.0, FIELD_H / 2.0);
pub const SUN_RADIUS: f32 = 28.0;
/// Gravity strength constant; acceleration is `K / distance` toward the sun
/// (inverse-distance, deliberately softer than inverse-square).
pub const GRAVITY_K: f32 = 9000.0;
/// Distance floor for the gravity falloff so the pull stays finite near the core.
pub const GRAVITY_MIN_DIST: f32 = 40.0;

pub const SHIP_RADIUS: f32 = 13.0;
pub const SHIP_THRUST: f32 = 190.0;
/// Velocity retained each tick (drag)
pub const SHIP_DRAG: f32 = 0.99;

pub const BULLET_RADIUS: f32 = 3.0;
pub const BULLET_SPEED: f32 = 340.0;
/// Fraction of the firing ship's velocity a bullet inherits
pub const BULLET_INHERIT: f32 = 0.5;
pub const BULLET_LIFETIME: f32 = 1.8;
/// Bullets feel a weakened pull from the sun
pub const BULLET_GRAVITY_SCALE: f32 = 0.3;
/// At most this many live bullets per side (fixed pool, inactive slots reused)
pub const MAX_BULLETS: usize = 4;
pub const FIRE_COOLDOWN: f32 = 0.35;

pub const WIN_SCORE: u32 = 5;

/// Which combatant owns an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Cpu,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (also the thrust direction)
    pub heading: f32,
    pub side: Side,
}

impl Ship {
    /// Spawn position for a side: opposite corners, nose toward the field.
    pub fn spawn(side: Side) -> Self {
        match side {
            Side::Player => Self {
                pos: Vec2::new(FIELD_W * 0.15, FIELD_H * 0.8),
                vel: Vec2::ZERO,
                heading: -std::f32::consts::FRAC_PI_2,
                side,
            },
            Side::Cpu => Self {
                pos: Vec2::new(FIELD_W * 0.85, FIELD_H * 0.2),
                vel: Vec2::ZERO,
                heading: std::f32::consts::FRAC_PI_2,
                side,
            },
        }
    }

    /// Muzzle position, one ship radius ahead of the nose.
    pub fn nose(&self) -> Vec2 {
        self.pos + heading_vec(self.heading) * (SHIP_RADIUS + BULLET_RADIUS + 1.0)
    }
}

/// Pooled projectile slot. Inactive slots are reused rather than reallocated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub ttl: f32,
    pub active: bool,
}

/// One side's steering for a tick, from keyboard or the CPU pilot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShipCommand {
    /// -1 counter-clockwise .. +1 clockwise
    pub turn: f32,
    pub thrust: bool,
    pub fire: bool,
}

/// Tuning derived once per attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpaceWarConfig {
    pub turn_rate: f32,
    /// Chance per tick that an aligned CPU fires; rises with difficulty.
    pub fire_probability: f32,
    /// Angular tolerance for the CPU to consider itself aligned (radians)
    pub fire_tolerance: f32,
    /// Rotation deadband to stop heading jitter (radians)
    pub deadband: f32,
    /// Distance the CPU tries to fight at
    pub combat_distance: f32,
    /// Seconds of player velocity the CPU leads its aim by
    pub lead_time: f32,
    /// CPU keeps at least this distance from the sun center
    pub sun_safety_radius: f32,
    pub win_score: u32,
}

impl SpaceWarConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let t = difficulty.lerp01();
        Self {
            turn_rate: 3.2 + 1.2 * t,
            fire_probability: 0.01 + 0.05 * t,
            fire_tolerance: 0.35 - 0.15 * t,
            deadband: 0.08,
            combat_distance: 220.0,
            lead_time: 0.3 * t,
            sun_safety_radius: SUN_RADIUS * 3.0,
            win_score: WIN_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceWarState {
    pub player: Ship,
    pub cpu: Ship,
    pub player_bullets: [Bullet; MAX_BULLETS],
    pub cpu_bullets: [Bullet; MAX_BULLETS],
    pub player_cooldown: f32,
    pub cpu_cooldown: f32,
    pub player_score: u32,
    pub cpu_score: u32,
    pub outcome: Option<Outcome>,
}

impl SpaceWarState {
    pub fn new() -> Self {
        Self {
            player: Ship::spawn(Side::Player),
            cpu: Ship::spawn(Side::Cpu),
            player_bullets: [Bullet::default(); MAX_BULLETS],
            cpu_bullets: [Bullet::default(); MAX_BULLETS],
            player_cooldown: 0.0,
            cpu_cooldown: 0.0,
            player_score: 0,
            cpu_score: 0,
            outcome: None,
        }
    }

    /// Reset ships and bullets after a point; scores persist.
    pub fn respawn(&mut self) {
        self.player = Ship::spawn(Side::Player);
        self.cpu = Ship::spawn(Side::Cpu);
        self.player_bullets = [Bullet::default(); MAX_BULLETS];
        self.cpu_bullets = [Bullet::default(); MAX_BULLETS];
        self.player_cooldown = 0.0;
        self.cpu_cooldown = 0.0;
    }

    pub fn live_bullets(&self, side: Side) -> usize {
        let pool = match side {
            Side::Player => &self.player_bullets,
            Side::Cpu => &self.cpu_bullets,
        };
        pool.iter().filter(|b| b.active).count()
    }
}

impl Default for SpaceWarState {
    fn default() -> Self {
        Self::new()
    }
}
