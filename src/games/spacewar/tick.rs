//! Space War per-frame integration and collision resolution
//!
//! Tick order is fixed: commands (input/AI) → ship integration → bullet
//! integration → collision resolution → scoring/terminal check. Both ships
//! move before any hit test so nothing is tested against a pre-move
//! position.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clock::SIM_DT;
use crate::difficulty::Difficulty;
use crate::geom::{circles_overlap, heading_vec, wrap_position};
use crate::outcome::{Minigame, Outcome};

use super::ai::cpu_command;
use super::state::*;

/// Acceleration toward the sun at `pos`, inverse-distance falloff.
fn gravity_at(pos: Vec2) -> Vec2 {
    let to_sun = SUN_POS - pos;
    let dist = to_sun.length().max(GRAVITY_MIN_DIST);
    to_sun / dist * (GRAVITY_K / dist)
}

fn integrate_ship(ship: &mut Ship, cmd: &ShipCommand, turn_rate: f32, dt: f32) {
    ship.heading += cmd.turn.clamp(-1.0, 1.0) * turn_rate * dt;
    if cmd.thrust {
        ship.vel += heading_vec(ship.heading) * SHIP_THRUST * dt;
    }
    ship.vel += gravity_at(ship.pos) * dt;
    ship.vel *= SHIP_DRAG;
    ship.pos = wrap_position(ship.pos + ship.vel * dt, FIELD_W, FIELD_H);
}

/// Spawn a bullet from an inactive pool slot; respects the per-side cap and
/// cooldown by construction (no free slot, no shot).
fn try_fire(ship: &Ship, pool: &mut [Bullet; MAX_BULLETS], cooldown: &mut f32) {
    if *cooldown > 0.0 {
        return;
    }
    if let Some(slot) = pool.iter_mut().find(|b| !b.active) {
        *slot = Bullet {
            pos: ship.nose(),
            vel: heading_vec(ship.heading) * BULLET_SPEED + ship.vel * BULLET_INHERIT,
            ttl: BULLET_LIFETIME,
            active: true,
        };
        *cooldown = FIRE_COOLDOWN;
    }
}

fn integrate_bullets(pool: &mut [Bullet; MAX_BULLETS], dt: f32) {
    for bullet in pool.iter_mut().filter(|b| b.active) {
        bullet.vel += gravity_at(bullet.pos) * BULLET_GRAVITY_SCALE * dt;
        bullet.pos = wrap_position(bullet.pos + bullet.vel * dt, FIELD_W, FIELD_H);
        bullet.ttl -= dt;
        if bullet.ttl <= 0.0 {
            bullet.active = false;
        }
    }
}

/// Deactivate any bullet overlapping `ship`; returns the number of hits.
fn resolve_hits(pool: &mut [Bullet; MAX_BULLETS], ship: &Ship) -> u32 {
    let mut hits = 0;
    for bullet in pool.iter_mut().filter(|b| b.active) {
        if circles_overlap(bullet.pos, BULLET_RADIUS, ship.pos, SHIP_RADIUS) {
            bullet.active = false;
            hits += 1;
        }
    }
    hits
}

/// Advance the battle by one timestep.
pub fn tick(
    state: &mut SpaceWarState,
    player_cmd: &ShipCommand,
    dt: f32,
    config: &SpaceWarConfig,
    rng: &mut Pcg32,
) {
    if state.outcome.is_some() {
        return;
    }

    // Commands: player input, then the CPU pilot reading pre-move state
    let cpu_cmd = cpu_command(state, config, rng);

    state.player_cooldown = (state.player_cooldown - dt).max(0.0);
    state.cpu_cooldown = (state.cpu_cooldown - dt).max(0.0);

    // Integration
    integrate_ship(&mut state.player, player_cmd, config.turn_rate, dt);
    integrate_ship(&mut state.cpu, &cpu_cmd, config.turn_rate, dt);

    if player_cmd.fire {
        let (player, pool, cooldown) = (
            state.player,
            &mut state.player_bullets,
            &mut state.player_cooldown,
        );
        try_fire(&player, pool, cooldown);
    }
    if cpu_cmd.fire {
        let (cpu, pool, cooldown) = (state.cpu, &mut state.cpu_bullets, &mut state.cpu_cooldown);
        try_fire(&cpu, pool, cooldown);
    }

    integrate_bullets(&mut state.player_bullets, dt);
    integrate_bullets(&mut state.cpu_bullets, dt);

    // Collision resolution: bullets against the opposing ship, then the sun.
    // Flying into the sun is scored like being shot.
    let mut player_points = resolve_hits(&mut state.player_bullets, &state.cpu);
    let mut cpu_points = resolve_hits(&mut state.cpu_bullets, &state.player);

    if circles_overlap(state.player.pos, SHIP_RADIUS, SUN_POS, SUN_RADIUS) {
        cpu_points += 1;
    }
    if circles_overlap(state.cpu.pos, SHIP_RADIUS, SUN_POS, SUN_RADIUS) {
        player_points += 1;
    }

    // Scoring and terminal check
    if player_points > 0 || cpu_points > 0 {
        state.player_score += player_points;
        state.cpu_score += cpu_points;
        state.respawn();
    }

    if state.player_score >= config.win_score {
        state.outcome = Some(Outcome::Won);
    } else if state.cpu_score >= config.win_score {
        state.outcome = Some(Outcome::Lost);
    }
}

/// One Space War attempt.
#[derive(Debug)]
pub struct SpaceWarGame {
    pub state: SpaceWarState,
    pub config: SpaceWarConfig,
    pub input: ShipCommand,
    rng: Pcg32,
    accumulator: f32,
}

impl SpaceWarGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            state: SpaceWarState::new(),
            config: SpaceWarConfig::for_difficulty(difficulty),
            input: ShipCommand::default(),
            rng: Pcg32::seed_from_u64(seed),
            accumulator: 0.0,
        }
    }
}

impl Minigame for SpaceWarGame {
    fn advance(&mut self, dt: f32) {
        self.accumulator += dt;
        while self.accumulator >= SIM_DT {
            tick(
                &mut self.state,
                &self.input,
                SIM_DT,
                &self.config,
                &mut self.rng,
            );
            self.accumulator -= SIM_DT;
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(&self.state).unwrap_or(serde_json::Value::Null)
    }
}
