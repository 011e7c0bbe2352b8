//! Snake grid simulation
//!
//! Discrete movement on a fixed logical grid, one cell per step. Direction
//! changes queue for the following step and an exact 180° reversal is
//! rejected, so the snake can never fold onto its own neck.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::clock::FixedStep;
use crate::difficulty::Difficulty;
use crate::outcome::{Minigame, Outcome};

pub const GRID_W: i32 = 20;
pub const GRID_H: i32 = 20;
pub const WIN_SCORE: u32 = 3;

pub type Cell = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn vector(self) -> Cell {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Tuning derived once per attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnakeConfig {
    /// Seconds between movement steps; slower on touch-input hosts.
    pub step_interval: f32,
    pub win_score: u32,
}

impl SnakeConfig {
    pub fn for_difficulty(difficulty: Difficulty, mobile: bool) -> Self {
        let base = 0.18 - 0.08 * difficulty.lerp01();
        Self {
            step_interval: if mobile { base * 1.5 } else { base },
            win_score: WIN_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeState {
    /// Body cells, head first.
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    /// Queued direction, applied at the start of the next step.
    pub next_direction: Option<Direction>,
    pub food: Cell,
    pub score: u32,
    pub outcome: Option<Outcome>,
}

impl SnakeState {
    fn new(rng: &mut Pcg32) -> Self {
        let mut state = Self {
            body: VecDeque::from([(GRID_W / 2, GRID_H / 2)]),
            direction: Direction::Right,
            next_direction: None,
            food: (0, 0),
            score: 0,
            outcome: None,
        };
        state.food = random_empty_cell(&state, rng).unwrap_or((0, 0));
        state
    }
}

fn random_empty_cell(state: &SnakeState, rng: &mut Pcg32) -> Option<Cell> {
    let empty: Vec<Cell> = (0..GRID_W)
        .flat_map(|x| (0..GRID_H).map(move |y| (x, y)))
        .filter(|cell| !state.body.contains(cell))
        .collect();
    if empty.is_empty() {
        None
    } else {
        Some(empty[rng.random_range(0..empty.len())])
    }
}

/// Queue a direction change for the next step. Reversing straight back onto
/// the neck is rejected; the queued direction is simply not taken.
pub fn queue_direction(state: &mut SnakeState, dir: Direction) {
    if dir != state.direction.opposite() {
        state.next_direction = Some(dir);
    }
}

/// One movement step. On loss the board freezes at the pre-collision state.
pub fn step(state: &mut SnakeState, config: &SnakeConfig, rng: &mut Pcg32) {
    if state.outcome.is_some() {
        return;
    }

    if let Some(dir) = state.next_direction.take() {
        if dir != state.direction.opposite() {
            state.direction = dir;
        }
    }

    let head = state.body[0];
    let (dx, dy) = state.direction.vector();
    let new_head = (head.0 + dx, head.1 + dy);

    if new_head.0 < 0 || new_head.0 >= GRID_W || new_head.1 < 0 || new_head.1 >= GRID_H {
        state.outcome = Some(Outcome::Lost);
        return;
    }

    let grows = new_head == state.food;
    // The tail cell vacates this step unless the snake grows, so stepping
    // onto it is legal in the non-growing case.
    let blocked = state
        .body
        .iter()
        .take(if grows {
            state.body.len()
        } else {
            state.body.len().saturating_sub(1)
        })
        .any(|&cell| cell == new_head);
    if blocked {
        state.outcome = Some(Outcome::Lost);
        return;
    }

    state.body.push_front(new_head);
    if grows {
        state.score += 1;
        if state.score >= config.win_score {
            state.outcome = Some(Outcome::Won);
            return;
        }
        if let Some(cell) = random_empty_cell(state, rng) {
            state.food = cell;
        }
    } else {
        state.body.pop_back();
    }
}

/// One Snake attempt.
#[derive(Debug)]
pub struct SnakeGame {
    pub state: SnakeState,
    pub config: SnakeConfig,
    rng: Pcg32,
    stepper: FixedStep,
}

impl SnakeGame {
    pub fn new(difficulty: Difficulty, mobile: bool, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = SnakeConfig::for_difficulty(difficulty, mobile);
        Self {
            state: SnakeState::new(&mut rng),
            config,
            rng,
            stepper: FixedStep::new(config.step_interval),
        }
    }

    pub fn queue_direction(&mut self, dir: Direction) {
        queue_direction(&mut self.state, dir);
    }
}

impl Minigame for SnakeGame {
    fn advance(&mut self, dt: f32) {
        if self.state.outcome.is_some() {
            return;
        }
        for _ in 0..self.stepper.advance(dt) {
            step(&mut self.state, &self.config, &mut self.rng);
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

    fn fixture() -> (SnakeState, SnakeConfig, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(11);
        (
            SnakeState::new(&mut rng),
            SnakeConfig::for_difficulty(Difficulty::new(1), false),
            rng,
        )
    }

    #[test]
    fn test_moves_one_cell_per_step() {
        let (mut state, config, mut rng) = fixture();
        state.food = (0, 0); // Out of the way
        let head = state.body[0];
        step(&mut state, &config, &mut rng);
        assert_eq!(state.body[0], (head.0 + 1, head.1));
        assert_eq!(state.body.len(), 1);
    }

    #[test]
    fn test_growth_on_food() {
        let (mut state, config, mut rng) = fixture();
        let head = state.body[0];
        state.food = (head.0 + 1, head.1);
        let len = state.body.len();
        step(&mut state, &config, &mut rng);
        assert_eq!(state.body.len(), len + 1);
        assert_eq!(state.score, 1);
        // Food relocated off the snake
        assert!(!state.body.contains(&state.food));
    }

    #[test]
    fn test_length_constant_without_food() {
        let (mut state, config, mut rng) = fixture();
        state.food = (0, 0);
        for _ in 0..5 {
            let len = state.body.len();
            let score = state.score;
            step(&mut state, &config, &mut rng);
            if state.outcome.is_some() {
                break;
            }
            assert_eq!(state.body.len(), len);
            assert_eq!(state.score, score);
        }
    }

    #[test]
    fn test_wall_collision_loses_frozen() {
        let (mut state, config, mut rng) = fixture();
        state.body = VecDeque::from([(GRID_W - 1, 5)]);
        state.direction = Direction::Right;
        state.food = (0, 0);
        let body_before = state.body.clone();
        step(&mut state, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Lost));
        assert_eq!(state.body, body_before);
    }

    #[test]
    fn test_self_collision_loses() {
        let (mut state, config, mut rng) = fixture();
        // A hook: head at (5,5) turning up into its own body
        state.body = VecDeque::from([(5, 5), (4, 5), (4, 4), (5, 4), (6, 4)]);
        state.direction = Direction::Up;
        state.food = (0, 0);
        step(&mut state, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn test_stepping_onto_vacating_tail_is_legal() {
        let (mut state, config, mut rng) = fixture();
        // 2x2 loop: head steps onto the tail cell being vacated
        state.body = VecDeque::from([(5, 5), (4, 5), (4, 4), (5, 4)]);
        state.direction = Direction::Up;
        state.food = (0, 0);
        step(&mut state, &config, &mut rng);
        assert_eq!(state.outcome, None);
        assert_eq!(state.body[0], (5, 4));
    }

    #[test]
    fn test_reversal_rejected() {
        let (mut state, _config, _rng) = fixture();
        state.direction = Direction::Right;
        queue_direction(&mut state, Direction::Left);
        assert_eq!(state.next_direction, None);
        queue_direction(&mut state, Direction::Up);
        assert_eq!(state.next_direction, Some(Direction::Up));
    }

    #[test]
    fn test_queued_direction_applies_next_step() {
        let (mut state, config, mut rng) = fixture();
        state.food = (0, 0);
        let head = state.body[0];
        queue_direction(&mut state, Direction::Down);
        step(&mut state, &config, &mut rng);
        assert_eq!(state.body[0], (head.0, head.1 + 1));
    }

    #[test]
    fn test_win_scenario_three_food() {
        // Start length 1, eat 3 times in a 20x20 grid: win with length 4
        let (mut state, config, mut rng) = fixture();
        assert_eq!(config.win_score, 3);
        for i in 0..3 {
            let head = state.body[0];
            state.food = (head.0 + 1, head.1);
            step(&mut state, &config, &mut rng);
            if i < 2 {
                assert_eq!(state.outcome, None);
            }
        }
        assert_eq!(state.outcome, Some(Outcome::Won));
        assert_eq!(state.body.len(), 4);
        assert_eq!(state.score, 3);
    }
}
