//! Tetris grid simulation
//!
//! Fixed 10x20 grid of color cells, 7 tetromino shapes, gravity on a fixed
//! interval. Rotation is transpose-then-reverse-rows, rejected outright if
//! the rotated placement collides (no wall kicks). Line clears rescan the
//! same row index after each shift so stacked full rows clear in one pass.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clock::FixedStep;
use crate::difficulty::Difficulty;
use crate::outcome::{Minigame, Outcome};

pub const GRID_W: usize = 10;
pub const GRID_H: usize = 20;

/// Row-major grid, row 0 at the top. `None` is empty, `Some(c)` a color index.
pub type Grid = [[Option<u8>; GRID_W]; GRID_H];

/// Score for clearing 1..=4 rows at once, at difficulty 1. Non-linear on
/// purpose: four simultaneous lines pay far more than four singles.
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

pub const WIN_SCORE: u32 = 200;

/// The 7 tetromino shapes as boolean matrices, with their color indices.
const TETROMINOES: [(&[&[bool]], u8); 7] = [
    (&[&[true, true, true, true]], 1),                          // I
    (&[&[true, true], &[true, true]], 2),                       // O
    (&[&[true, true, true], &[false, true, false]], 3),         // T
    (&[&[false, true, true], &[true, true, false]], 4),         // S
    (&[&[true, true, false], &[false, true, true]], 5),         // Z
    (&[&[true, false, false], &[true, true, true]], 6),         // J
    (&[&[false, false, true], &[true, true, true]], 7),         // L
];

/// The active falling piece: shape matrix plus top-left anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub cells: Vec<Vec<bool>>,
    pub x: i32,
    pub y: i32,
    pub color: u8,
}

impl Piece {
    pub fn from_kind(kind: usize) -> Self {
        let (shape, color) = TETROMINOES[kind % 7];
        let cells: Vec<Vec<bool>> = shape.iter().map(|row| row.to_vec()).collect();
        let width = cells[0].len() as i32;
        Self {
            cells,
            x: (GRID_W as i32 - width) / 2,
            y: 0,
            color,
        }
    }

    /// 90° clockwise rotation: transpose, then reverse each row.
    pub fn rotated(&self) -> Self {
        let rows = self.cells.len();
        let cols = self.cells[0].len();
        let mut cells = vec![vec![false; rows]; cols];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &filled) in row.iter().enumerate() {
                cells[c][rows - 1 - r] = filled;
            }
        }
        Self {
            cells,
            ..self.clone()
        }
    }

    /// Absolute grid coordinates of the piece's occupied cells.
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(c, _)| (self.x + c as i32, self.y + r as i32))
        })
    }
}

/// True if every occupied cell of `piece` lands inside the grid on an empty
/// cell. Placements that fail are rejected, never clamped.
pub fn fits(grid: &Grid, piece: &Piece) -> bool {
    piece.occupied().all(|(x, y)| {
        (0..GRID_W as i32).contains(&x)
            && (0..GRID_H as i32).contains(&y)
            && grid[y as usize][x as usize].is_none()
    })
}

/// Copy the piece's occupied cells into the grid.
fn lock(grid: &mut Grid, piece: &Piece) {
    for (x, y) in piece.occupied() {
        if (0..GRID_W as i32).contains(&x) && (0..GRID_H as i32).contains(&y) {
            grid[y as usize][x as usize] = Some(piece.color);
        }
    }
}

/// Clear full rows bottom-to-top, shifting rows above down and inserting an
/// empty row at the top for each. Returns the number of rows cleared.
pub fn clear_lines(grid: &mut Grid) -> u32 {
    let mut cleared = 0;
    let mut row = GRID_H;
    while row > 0 {
        let r = row - 1;
        if grid[r].iter().all(|c| c.is_some()) {
            for shift in (1..=r).rev() {
                grid[shift] = grid[shift - 1];
            }
            grid[0] = [None; GRID_W];
            cleared += 1;
            // Re-scan the same index: the row above has moved into it
        } else {
            row -= 1;
        }
    }
    cleared
}

/// Tuning derived once per attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TetrisConfig {
    /// Gravity interval in seconds; shorter at higher difficulty, longer on
    /// touch-input hosts.
    pub fall_interval: f32,
    /// Cleared-line scores are multiplied by the difficulty level.
    pub score_multiplier: u32,
    pub win_score: u32,
}

impl TetrisConfig {
    pub fn for_difficulty(difficulty: Difficulty, mobile: bool) -> Self {
        let base = 0.8 - 0.52 * difficulty.lerp01(); // 0.8s at level 1 down to 0.28s at 5
        Self {
            fall_interval: if mobile { base * 1.4 } else { base },
            score_multiplier: u32::from(difficulty.level()),
            win_score: WIN_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetrisState {
    pub grid: Grid,
    pub active: Piece,
    pub next_kind: usize,
    pub score: u32,
    pub lines_cleared: u32,
    pub outcome: Option<Outcome>,
}

impl TetrisState {
    fn new(rng: &mut Pcg32) -> Self {
        Self {
            grid: [[None; GRID_W]; GRID_H],
            active: Piece::from_kind(rng.random_range(0..7)),
            next_kind: rng.random_range(0..7),
            score: 0,
            lines_cleared: 0,
            outcome: None,
        }
    }
}

/// Try to shift the active piece horizontally; collisions reject the move.
pub fn shift(state: &mut TetrisState, dx: i32) {
    if state.outcome.is_some() {
        return;
    }
    let mut moved = state.active.clone();
    moved.x += dx;
    if fits(&state.grid, &moved) {
        state.active = moved;
    }
}

/// Try to rotate the active piece; a colliding rotation is rejected.
pub fn rotate(state: &mut TetrisState) {
    if state.outcome.is_some() {
        return;
    }
    let rotated = state.active.rotated();
    if fits(&state.grid, &rotated) {
        state.active = rotated;
    }
}

/// One gravity step: move the piece down, or lock it and spawn the next.
/// Returns true if the piece locked.
pub fn step_down(state: &mut TetrisState, config: &TetrisConfig, rng: &mut Pcg32) -> bool {
    if state.outcome.is_some() {
        return false;
    }

    let mut moved = state.active.clone();
    moved.y += 1;
    if fits(&state.grid, &moved) {
        state.active = moved;
        return false;
    }

    // Blocked: lock, clear, score, spawn the pre-generated next piece
    let topped_out = state.active.occupied().any(|(_, y)| y <= 0);
    lock(&mut state.grid, &state.active);

    let cleared = clear_lines(&mut state.grid);
    if cleared > 0 {
        state.lines_cleared += cleared;
        state.score += LINE_SCORES[(cleared as usize - 1).min(3)] * config.score_multiplier;
    }

    if state.score >= config.win_score {
        state.outcome = Some(Outcome::Won);
        return true;
    }
    if topped_out {
        state.outcome = Some(Outcome::Lost);
        return true;
    }

    let spawned = Piece::from_kind(state.next_kind);
    state.next_kind = rng.random_range(0..7);
    if !fits(&state.grid, &spawned) {
        // No room to enter the field
        lock(&mut state.grid, &spawned);
        state.outcome = Some(Outcome::Lost);
    }
    state.active = spawned;
    true
}

/// Hard drop: repeat the down-or-lock step until the piece locks.
pub fn hard_drop(state: &mut TetrisState, config: &TetrisConfig, rng: &mut Pcg32) {
    while state.outcome.is_none() && !step_down(state, config, rng) {}
}

/// One Tetris attempt.
#[derive(Debug)]
pub struct TetrisGame {
    pub state: TetrisState,
    pub config: TetrisConfig,
    rng: Pcg32,
    gravity: FixedStep,
}

impl TetrisGame {
    pub fn new(difficulty: Difficulty, mobile: bool, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = TetrisConfig::for_difficulty(difficulty, mobile);
        Self {
            state: TetrisState::new(&mut rng),
            config,
            rng,
            gravity: FixedStep::new(config.fall_interval),
        }
    }

    pub fn move_left(&mut self) {
        shift(&mut self.state, -1);
    }

    pub fn move_right(&mut self) {
        shift(&mut self.state, 1);
    }

    pub fn rotate(&mut self) {
        rotate(&mut self.state);
    }

    /// Soft drop: one immediate gravity step.
    pub fn soft_drop(&mut self) {
        step_down(&mut self.state, &self.config, &mut self.rng);
        self.gravity.reset();
    }

    pub fn hard_drop(&mut self) {
        hard_drop(&mut self.state, &self.config, &mut self.rng);
        self.gravity.reset();
    }
}

impl Minigame for TetrisGame {
    fn advance(&mut self, dt: f32) {
        if self.state.outcome.is_some() {
            return;
        }
        for _ in 0..self.gravity.advance(dt) {
            step_down(&mut self.state, &self.config, &mut self.rng);
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
    use proptest::prelude::*;

    fn empty_grid() -> Grid {
        [[None; GRID_W]; GRID_H]
    }

    fn occupied_count(grid: &Grid) -> usize {
        grid.iter().flatten().filter(|c| c.is_some()).count()
    }

    fn fill_row(grid: &mut Grid, row: usize) {
        for cell in grid[row].iter_mut() {
            *cell = Some(1);
        }
    }

    #[test]
    fn test_rotation_is_transpose_reverse() {
        // T piece: [[1,1,1],[0,1,0]] rotated clockwise -> [[0,1],[1,1],[0,1]]
        let piece = Piece::from_kind(2);
        let rotated = piece.rotated();
        assert_eq!(
            rotated.cells,
            vec![
                vec![false, true],
                vec![true, true],
                vec![false, true],
            ]
        );
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in 0..7 {
            let piece = Piece::from_kind(kind);
            let back = piece.rotated().rotated().rotated().rotated();
            assert_eq!(back.cells, piece.cells);
        }
    }

    #[test]
    fn test_fits_rejects_out_of_bounds() {
        let grid = empty_grid();
        let mut piece = Piece::from_kind(0); // I piece, 4 wide
        piece.x = GRID_W as i32 - 2;
        assert!(!fits(&grid, &piece));
        piece.x = -1;
        assert!(!fits(&grid, &piece));
        piece.x = 3;
        piece.y = GRID_H as i32; // Below the floor
        assert!(!fits(&grid, &piece));
    }

    #[test]
    fn test_fits_rejects_occupied_cells() {
        let mut grid = empty_grid();
        grid[5][4] = Some(3);
        let mut piece = Piece::from_kind(1); // O piece at (4,5)
        piece.x = 4;
        piece.y = 5;
        assert!(!fits(&grid, &piece));
        piece.x = 6;
        assert!(fits(&grid, &piece));
    }

    #[test]
    fn test_rejected_rotation_leaves_state_unchanged() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = TetrisState::new(&mut rng);
        state.active = Piece::from_kind(0); // I piece horizontal
        state.active.x = 0;
        state.active.y = 5;
        // Wall of blocks directly under and around: rotation would collide
        for row in 3..9 {
            for col in 0..GRID_W {
                if state.active.occupied().all(|(px, py)| (px, py) != (col as i32, row as i32)) {
                    state.grid[row][col] = Some(2);
                }
            }
        }
        let before = state.active.clone();
        let grid_before = state.grid;
        rotate(&mut state);
        assert_eq!(state.active, before);
        assert_eq!(state.grid, grid_before);
    }

    #[test]
    fn test_clear_single_line() {
        let mut grid = empty_grid();
        fill_row(&mut grid, GRID_H - 1);
        grid[GRID_H - 2][3] = Some(5);
        assert_eq!(clear_lines(&mut grid), 1);
        // The lone block above shifted down into the bottom row
        assert_eq!(grid[GRID_H - 1][3], Some(5));
        assert_eq!(occupied_count(&grid), 1);
    }

    #[test]
    fn test_clear_stacked_rows_rescans_index() {
        let mut grid = empty_grid();
        fill_row(&mut grid, GRID_H - 1);
        fill_row(&mut grid, GRID_H - 2);
        fill_row(&mut grid, GRID_H - 4); // Gap at GRID_H - 3
        grid[GRID_H - 3][0] = Some(9);
        assert_eq!(clear_lines(&mut grid), 3);
        assert_eq!(occupied_count(&grid), 1);
        assert_eq!(grid[GRID_H - 1][0], Some(9));
    }

    #[test]
    fn test_single_line_scores_fixed_bonus() {
        let mut rng = Pcg32::seed_from_u64(2);
        let config = TetrisConfig::for_difficulty(Difficulty::new(1), false);
        let mut state = TetrisState::new(&mut rng);
        // Bottom row full except one cell; drop an I piece rotated vertical
        // into the gap column
        fill_row(&mut state.grid, GRID_H - 1);
        state.grid[GRID_H - 1][0] = None;
        state.active = Piece::from_kind(0).rotated(); // Vertical I, 1 wide
        state.active.x = 0;
        state.active.y = 10;

        hard_drop(&mut state, &config, &mut rng);
        assert_eq!(state.score, LINE_SCORES[0]);
        assert_eq!(state.lines_cleared, 1);
    }

    #[test]
    fn test_tetris_bonus_is_nonlinear() {
        assert!(LINE_SCORES[3] > 4 * LINE_SCORES[0]);
    }

    #[test]
    fn test_lock_at_top_row_is_game_over() {
        let mut rng = Pcg32::seed_from_u64(3);
        let config = TetrisConfig::for_difficulty(Difficulty::new(1), false);
        let mut state = TetrisState::new(&mut rng);
        // Stack reaching row 1: the fresh piece at y=0 locks immediately
        for row in 1..GRID_H {
            fill_row(&mut state.grid, row);
            state.grid[row][0] = None; // Keep a hole so nothing clears
        }
        state.active = Piece::from_kind(1); // O piece at top
        state.active.x = 4;
        state.active.y = 0;
        step_down(&mut state, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn test_win_at_score_threshold() {
        let mut rng = Pcg32::seed_from_u64(4);
        let config = TetrisConfig::for_difficulty(Difficulty::new(1), false);
        let mut state = TetrisState::new(&mut rng);
        state.score = config.win_score - LINE_SCORES[0];
        fill_row(&mut state.grid, GRID_H - 1);
        state.grid[GRID_H - 1][0] = None;
        state.active = Piece::from_kind(0).rotated();
        state.active.x = 0;
        state.active.y = 10;
        hard_drop(&mut state, &config, &mut rng);
        assert_eq!(state.outcome, Some(Outcome::Won));
    }

    #[test]
    fn test_gravity_interval_scales() {
        let easy = TetrisConfig::for_difficulty(Difficulty::new(1), false);
        let hard = TetrisConfig::for_difficulty(Difficulty::new(5), false);
        let mobile = TetrisConfig::for_difficulty(Difficulty::new(1), true);
        assert!(hard.fall_interval < easy.fall_interval);
        assert!(mobile.fall_interval > easy.fall_interval);
    }

    proptest! {
        /// A clear pass removes exactly `k * GRID_W` cells for `k` full rows.
        #[test]
        fn prop_clear_conserves_cells(rows in proptest::collection::btree_set(0usize..GRID_H, 0..4),
                                      extra in proptest::collection::vec((0usize..GRID_H, 0usize..GRID_W), 0..20)) {
            let mut grid = [[None; GRID_W]; GRID_H];
            for &(r, c) in &extra {
                grid[r][c] = Some(1);
            }
            for &r in &rows {
                for c in 0..GRID_W {
                    grid[r][c] = Some(2);
                }
            }
            // Count rows that are actually full (extra cells cannot unfill,
            // but rows not in the set may happen to be full only via `rows`)
            let full_before = (0..GRID_H)
                .filter(|&r| grid[r].iter().all(|c| c.is_some()))
                .count();
            let before = grid.iter().flatten().filter(|c| c.is_some()).count();
            let cleared = clear_lines(&mut grid);
            let after = grid.iter().flatten().filter(|c| c.is_some()).count();
            prop_assert_eq!(cleared as usize, full_before);
            prop_assert_eq!(after, before - full_before * GRID_W);
        }
    }
}
