//! Pong: two paddles, one ball, proportional-tracking CPU
//!
//! The CPU has no foresight; each tick it moves its paddle toward the ball's
//! current y at a speed scaled by difficulty. Higher difficulty means faster
//! tracking, never prediction.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clock::SIM_DT;
use crate::difficulty::Difficulty;
use crate::outcome::{Minigame, Outcome};

pub const FIELD_W: f32 = 800.0;
pub const FIELD_H: f32 = 600.0;
pub const PADDLE_W: f32 = 14.0;
pub const PADDLE_H: f32 = 90.0;
/// Paddle face inset from the field edge
pub const PADDLE_MARGIN: f32 = 30.0;
pub const BALL_RADIUS: f32 = 9.0;
pub const BALL_SERVE_SPEED: f32 = 320.0;
/// Speed gain per paddle return (multiplicative)
pub const RALLY_BOOST: f32 = 1.04;
pub const BALL_MAX_SPEED: f32 = 700.0;
pub const PLAYER_PADDLE_SPEED: f32 = 420.0;
/// Base CPU tracking speed; multiplied by the difficulty level.
pub const CPU_PADDLE_SPEED: f32 = 95.0;
pub const WIN_SCORE: u32 = 5;

/// Tuning derived once per attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PongConfig {
    /// CPU paddle tracking speed (px/s): `CPU_PADDLE_SPEED * difficulty`.
    pub cpu_speed: f32,
    pub win_score: u32,
}

impl PongConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            cpu_speed: CPU_PADDLE_SPEED * difficulty.factor(),
            win_score: WIN_SCORE,
        }
    }
}

/// Input held for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PongInput {
    /// -1 up, 0 idle, +1 down (keyboard).
    pub move_dir: f32,
    /// Pointer-follow target for the paddle center, overrides `move_dir`.
    pub target_y: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongState {
    /// Paddle centers; player on the left, CPU on the right.
    pub player_y: f32,
    pub cpu_y: f32,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub player_score: u32,
    pub cpu_score: u32,
    pub outcome: Option<Outcome>,
}

impl PongState {
    fn new(rng: &mut Pcg32) -> Self {
        let mut state = Self {
            player_y: FIELD_H / 2.0,
            cpu_y: FIELD_H / 2.0,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            player_score: 0,
            cpu_score: 0,
            outcome: None,
        };
        serve(&mut state, rng, 1.0);
        state
    }
}

/// Reset the ball to center, heading toward `dir_x` with a random slant.
fn serve(state: &mut PongState, rng: &mut Pcg32, dir_x: f32) {
    state.ball_pos = Vec2::new(FIELD_W / 2.0, FIELD_H / 2.0);
    let slant: f32 = rng.random_range(-0.5..0.5);
    state.ball_vel = Vec2::new(dir_x, slant).normalize() * BALL_SERVE_SPEED;
}

fn clamp_paddle(y: f32) -> f32 {
    y.clamp(PADDLE_H / 2.0, FIELD_H - PADDLE_H / 2.0)
}

/// Reflect the ball off a paddle face, steering by where it struck the
/// paddle (center hit goes straight, edge hits angle away).
fn paddle_bounce(state: &mut PongState, paddle_y: f32, dir_x: f32) {
    let offset = ((state.ball_pos.y - paddle_y) / (PADDLE_H / 2.0)).clamp(-1.0, 1.0);
    let speed = (state.ball_vel.length() * RALLY_BOOST).min(BALL_MAX_SPEED);
    state.ball_vel = Vec2::new(dir_x, offset * 0.9).normalize() * speed;
}

/// Advance the rally by one timestep.
pub fn tick(state: &mut PongState, input: &PongInput, dt: f32, config: &PongConfig, rng: &mut Pcg32) {
    if state.outcome.is_some() {
        return;
    }

    // Input: player paddle
    if let Some(target) = input.target_y {
        let delta = (target - state.player_y).clamp(
            -PLAYER_PADDLE_SPEED * dt,
            PLAYER_PADDLE_SPEED * dt,
        );
        state.player_y = clamp_paddle(state.player_y + delta);
    } else if input.move_dir != 0.0 {
        state.player_y = clamp_paddle(state.player_y + input.move_dir * PLAYER_PADDLE_SPEED * dt);
    }

    // AI: proportional tracking toward the ball's current y, no lookahead
    let chase = (state.ball_pos.y - state.cpu_y).clamp(-config.cpu_speed * dt, config.cpu_speed * dt);
    state.cpu_y = clamp_paddle(state.cpu_y + chase);

    // Physics
    state.ball_pos += state.ball_vel * dt;

    // Top/bottom walls
    if state.ball_pos.y - BALL_RADIUS < 0.0 {
        state.ball_pos.y = BALL_RADIUS;
        state.ball_vel.y = state.ball_vel.y.abs();
    } else if state.ball_pos.y + BALL_RADIUS > FIELD_H {
        state.ball_pos.y = FIELD_H - BALL_RADIUS;
        state.ball_vel.y = -state.ball_vel.y.abs();
    }

    // Collision: paddle faces
    let player_face = PADDLE_MARGIN + PADDLE_W;
    let cpu_face = FIELD_W - PADDLE_MARGIN - PADDLE_W;
    if state.ball_vel.x < 0.0
        && state.ball_pos.x - BALL_RADIUS <= player_face
        && state.ball_pos.x > PADDLE_MARGIN
        && (state.ball_pos.y - state.player_y).abs() <= PADDLE_H / 2.0 + BALL_RADIUS
    {
        state.ball_pos.x = player_face + BALL_RADIUS;
        paddle_bounce(state, state.player_y, 1.0);
    } else if state.ball_vel.x > 0.0
        && state.ball_pos.x + BALL_RADIUS >= cpu_face
        && state.ball_pos.x < FIELD_W - PADDLE_MARGIN
        && (state.ball_pos.y - state.cpu_y).abs() <= PADDLE_H / 2.0 + BALL_RADIUS
    {
        state.ball_pos.x = cpu_face - BALL_RADIUS;
        paddle_bounce(state, state.cpu_y, -1.0);
    }

    // Scoring, then terminal check
    if state.ball_pos.x < -BALL_RADIUS {
        state.cpu_score += 1;
        serve(state, rng, -1.0);
    } else if state.ball_pos.x > FIELD_W + BALL_RADIUS {
        state.player_score += 1;
        serve(state, rng, 1.0);
    }

    if state.player_score >= config.win_score {
        state.outcome = Some(Outcome::Won);
    } else if state.cpu_score >= config.win_score {
        state.outcome = Some(Outcome::Lost);
    }
}

/// One Pong attempt: state plus the frame accumulator and input buffer.
#[derive(Debug)]
pub struct PongGame {
    pub state: PongState,
    pub config: PongConfig,
    pub input: PongInput,
    rng: Pcg32,
    accumulator: f32,
}

impl PongGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self {
            state: PongState::new(&mut rng),
            config: PongConfig::for_difficulty(difficulty),
            input: PongInput::default(),
            rng,
            accumulator: 0.0,
        }
    }
}

impl Minigame for PongGame {
    fn advance(&mut self, dt: f32) {
        self.accumulator += dt;
        while self.accumulator >= SIM_DT {
            tick(&mut self.state, &self.input, SIM_DT, &self.config, &mut self.rng);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (PongState, PongConfig, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(42);
        (
            PongState::new(&mut rng),
            PongConfig::for_difficulty(Difficulty::new(3)),
            rng,
        )
    }

    #[test]
    fn test_cpu_tracks_ball() {
        let (mut state, config, mut rng) = fixture();
        state.ball_pos = Vec2::new(400.0, 500.0);
        state.ball_vel = Vec2::ZERO;
        state.cpu_y = 100.0;
        let before = state.cpu_y;
        tick(&mut state, &PongInput::default(), SIM_DT, &config, &mut rng);
        assert!(state.cpu_y > before);
        assert!((state.cpu_y - before - config.cpu_speed * SIM_DT).abs() < 0.001);
    }

    #[test]
    fn test_higher_difficulty_tracks_faster() {
        let slow = PongConfig::for_difficulty(Difficulty::new(1));
        let fast = PongConfig::for_difficulty(Difficulty::new(5));
        assert!(fast.cpu_speed > slow.cpu_speed);
    }

    #[test]
    fn test_wall_bounce() {
        let (mut state, config, mut rng) = fixture();
        state.ball_pos = Vec2::new(400.0, BALL_RADIUS + 1.0);
        state.ball_vel = Vec2::new(0.0, -300.0);
        tick(&mut state, &PongInput::default(), SIM_DT, &config, &mut rng);
        assert!(state.ball_vel.y > 0.0);
        assert!(state.ball_pos.y >= BALL_RADIUS);
    }

    #[test]
    fn test_cpu_concedes_point() {
        let (mut state, config, mut rng) = fixture();
        state.ball_pos = Vec2::new(FIELD_W - 2.0, 550.0);
        state.ball_vel = Vec2::new(600.0, 0.0);
        state.cpu_y = 50.0; // Nowhere near the ball
        let before = state.player_score;
        for _ in 0..10 {
            tick(&mut state, &PongInput::default(), SIM_DT, &config, &mut rng);
        }
        assert_eq!(state.player_score, before + 1);
        // Serve reset the ball to center
        assert!((state.ball_pos.x - FIELD_W / 2.0).abs() < 50.0);
    }

    #[test]
    fn test_paddle_clamped_to_field() {
        let (mut state, config, mut rng) = fixture();
        state.ball_vel = Vec2::ZERO;
        let input = PongInput {
            move_dir: -1.0,
            target_y: None,
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT, &config, &mut rng);
        }
        assert!((state.player_y - PADDLE_H / 2.0).abs() < 0.001);
    }

    #[test]
    fn test_win_at_threshold() {
        let (mut state, config, mut rng) = fixture();
        state.player_score = config.win_score - 1;
        state.ball_pos = Vec2::new(FIELD_W + BALL_RADIUS + 1.0, 300.0);
        state.ball_vel = Vec2::new(100.0, 0.0);
        tick(&mut state, &PongInput::default(), SIM_DT, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Won));
        // Terminal state is frozen
        let frozen = state.clone();
        tick(&mut state, &PongInput::default(), SIM_DT, &config, &mut rng);
        assert_eq!(state.player_score, frozen.player_score);
        assert_eq!(state.ball_pos, frozen.ball_pos);
    }
}
