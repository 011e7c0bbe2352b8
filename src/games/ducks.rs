//! Duck-shoot gallery
//!
//! Ducks cross the field at seeded-random heights and speeds; the player
//! shoots by clicking. Hits are proximity tests against the shot point. The
//! round is won at the score threshold and times out when the round clock
//! runs down first.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::geom::circles_overlap;
use crate::outcome::{Minigame, Outcome};

pub const FIELD_W: f32 = 800.0;
pub const FIELD_H: f32 = 600.0;
pub const DUCK_RADIUS: f32 = 22.0;
/// Effective radius of a shot (generous hitbox for pointer aim)
pub const SHOT_RADIUS: f32 = 10.0;
pub const WIN_SCORE: u32 = 5;
pub const ROUND_TIME: f32 = 30.0;

/// Tuning derived once per attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DucksConfig {
    pub duck_speed: f32,
    /// Mean seconds between spawns
    pub spawn_interval: f32,
    /// Uniform jitter applied around the mean spawn interval
    pub spawn_jitter: f32,
    pub win_score: u32,
    pub round_time: f32,
}

impl DucksConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let t = difficulty.lerp01();
        Self {
            duck_speed: 140.0 + 160.0 * t,
            spawn_interval: 1.4 - 0.5 * t,
            spawn_jitter: 0.5,
            win_score: WIN_SCORE,
            round_time: ROUND_TIME,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Duck {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DucksState {
    pub ducks: Vec<Duck>,
    pub score: u32,
    pub shots_fired: u32,
    pub time_left: f32,
    /// Countdown to the next spawn
    pub spawn_timer: f32,
    pub outcome: Option<Outcome>,
}

impl DucksState {
    fn new(config: &DucksConfig) -> Self {
        Self {
            ducks: Vec::new(),
            score: 0,
            shots_fired: 0,
            time_left: config.round_time,
            spawn_timer: 0.5,
            outcome: None,
        }
    }
}

fn spawn_duck(state: &mut DucksState, config: &DucksConfig, rng: &mut Pcg32) {
    // Alternate sides at random, random altitude in the upper two thirds
    let from_left = rng.random::<bool>();
    let y = rng.random_range(FIELD_H * 0.1..FIELD_H * 0.66);
    let speed = config.duck_speed * rng.random_range(0.8..1.2);
    state.ducks.push(if from_left {
        Duck {
            pos: Vec2::new(-DUCK_RADIUS, y),
            vel: Vec2::new(speed, 0.0),
        }
    } else {
        Duck {
            pos: Vec2::new(FIELD_W + DUCK_RADIUS, y),
            vel: Vec2::new(-speed, 0.0),
        }
    });
}

/// Advance the gallery by one timestep.
pub fn tick(state: &mut DucksState, dt: f32, config: &DucksConfig, rng: &mut Pcg32) {
    if state.outcome.is_some() {
        return;
    }

    state.time_left -= dt;

    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        spawn_duck(state, config, rng);
        let jitter = rng.random_range(-config.spawn_jitter..config.spawn_jitter);
        state.spawn_timer = (config.spawn_interval + jitter).max(0.2);
    }

    for duck in &mut state.ducks {
        duck.pos += duck.vel * dt;
    }
    state
        .ducks
        .retain(|d| d.pos.x > -DUCK_RADIUS * 2.0 && d.pos.x < FIELD_W + DUCK_RADIUS * 2.0);

    if state.score >= config.win_score {
        state.outcome = Some(Outcome::Won);
    } else if state.time_left <= 0.0 {
        state.outcome = Some(Outcome::Timeout);
    }
}

/// Fire at a point. The nearest overlapping duck is removed; a miss changes
/// nothing but the shot counter.
pub fn shoot(state: &mut DucksState, aim: Vec2) {
    if state.outcome.is_some() {
        return;
    }
    state.shots_fired += 1;
    let hit = state
        .ducks
        .iter()
        .enumerate()
        .filter(|(_, d)| circles_overlap(d.pos, DUCK_RADIUS, aim, SHOT_RADIUS))
        .min_by(|(_, a), (_, b)| {
            a.pos
                .distance_squared(aim)
                .partial_cmp(&b.pos.distance_squared(aim))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i);
    if let Some(i) = hit {
        state.ducks.swap_remove(i);
        state.score += 1;
    }
}

/// One gallery attempt.
#[derive(Debug)]
pub struct DucksGame {
    pub state: DucksState,
    pub config: DucksConfig,
    rng: Pcg32,
}

impl DucksGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let config = DucksConfig::for_difficulty(difficulty);
        Self {
            state: DucksState::new(&config),
            config,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn shoot(&mut self, x: f32, y: f32) {
        shoot(&mut self.state, Vec2::new(x, y));
    }
}

impl Minigame for DucksGame {
    fn advance(&mut self, dt: f32) {
        tick(&mut self.state, dt, &self.config, &mut self.rng);
    }

    fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(&self.state).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (DucksState, DucksConfig, Pcg32) {
        let config = DucksConfig::for_difficulty(Difficulty::new(2));
        (DucksState::new(&config), config, Pcg32::seed_from_u64(5))
    }

    #[test]
    fn test_spawns_with_seeded_variance() {
        let (mut a, config, mut rng_a) = fixture();
        let (mut b, _, mut rng_b) = fixture();
        for _ in 0..300 {
            tick(&mut a, 1.0 / 60.0, &config, &mut rng_a);
            tick(&mut b, 1.0 / 60.0, &config, &mut rng_b);
        }
        assert!(!a.ducks.is_empty());
        // Same seed, same gallery
        assert_eq!(a.ducks.len(), b.ducks.len());
        for (da, db) in a.ducks.iter().zip(&b.ducks) {
            assert_eq!(da.pos, db.pos);
        }
    }

    #[test]
    fn test_shot_hits_overlapping_duck() {
        let (mut state, _config, _rng) = fixture();
        state.ducks.push(Duck {
            pos: Vec2::new(300.0, 200.0),
            vel: Vec2::new(100.0, 0.0),
        });
        shoot(&mut state, Vec2::new(310.0, 205.0));
        assert_eq!(state.score, 1);
        assert!(state.ducks.is_empty());
    }

    #[test]
    fn test_shot_miss_changes_nothing_but_counter() {
        let (mut state, _config, _rng) = fixture();
        state.ducks.push(Duck {
            pos: Vec2::new(300.0, 200.0),
            vel: Vec2::new(100.0, 0.0),
        });
        shoot(&mut state, Vec2::new(600.0, 500.0));
        assert_eq!(state.score, 0);
        assert_eq!(state.shots_fired, 1);
        assert_eq!(state.ducks.len(), 1);
    }

    #[test]
    fn test_round_times_out() {
        let (mut state, config, mut rng) = fixture();
        state.time_left = 0.05;
        tick(&mut state, 0.1, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Timeout));
    }

    #[test]
    fn test_win_at_threshold_beats_timeout() {
        let (mut state, config, mut rng) = fixture();
        state.score = config.win_score;
        state.time_left = 0.01;
        tick(&mut state, 0.1, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Won));
    }

    #[test]
    fn test_offscreen_ducks_culled() {
        let (mut state, config, mut rng) = fixture();
        state.ducks.push(Duck {
            pos: Vec2::new(FIELD_W + DUCK_RADIUS * 3.0, 100.0),
            vel: Vec2::new(10.0, 0.0),
        });
        tick(&mut state, 1.0 / 60.0, &config, &mut rng);
        assert!(state.ducks.is_empty());
    }
}
