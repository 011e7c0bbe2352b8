//! CLSFYD arcade entry point
//!
//! The browser build is a library mounted by the puzzle-game shell (see
//! `host`). The native binary runs headless self-play demos against the
//! simulations, which is how the AI and physics get exercised without a
//! display.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clsfyd_arcade::Difficulty;
    use clsfyd_arcade::games::oxo::{self, Mark};
    use clsfyd_arcade::games::spacewar::{ShipCommand, SpaceWarConfig, SpaceWarState, tick};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    env_logger::init();
    log::info!("CLSFYD arcade (native) - headless self-play demos");

    // Oxo: optimal vs optimal must be a draw
    let mut board = [None; 9];
    let mut to_move = Mark::Cross;
    while let Some(cell) = oxo::best_move(&board, to_move) {
        board[cell] = Some(to_move);
        to_move = to_move.other();
    }
    match oxo::winner(&board) {
        None => log::info!("oxo self-play: draw (as expected)"),
        Some(mark) => log::warn!("oxo self-play: unexpected winner {:?}", mark),
    }

    // Oxo against a naive first-empty-cell opponent: CPU must not lose
    let mut board = [None; 9];
    let mut to_move = Mark::Cross;
    while oxo::winner(&board).is_none() && !oxo::is_full(&board) {
        let cell = match to_move {
            Mark::Cross => oxo::best_move(&board, Mark::Cross).unwrap(),
            Mark::Nought => (0..9).find(|&c| board[c].is_none()).unwrap(),
        };
        board[cell] = Some(to_move);
        to_move = to_move.other();
    }
    match oxo::winner(&board) {
        Some(Mark::Nought) => log::warn!("oxo vs naive: CPU lost, search is broken"),
        result => log::info!("oxo vs naive: {:?}", result),
    }

    // Space War: idle player vs CPU pilot until a terminal state
    let mut state = SpaceWarState::new();
    let config = SpaceWarConfig::for_difficulty(Difficulty::new(3));
    let mut rng = Pcg32::seed_from_u64(2024);
    let idle = ShipCommand::default();
    let dt = 1.0 / 60.0;
    let mut ticks = 0u32;
    while state.outcome.is_none() && ticks < 60 * 120 {
        tick(&mut state, &idle, dt, &config, &mut rng);
        ticks += 1;
    }
    log::info!(
        "space war self-play: {:?} after {} ticks ({} - {})",
        state.outcome,
        ticks,
        state.player_score,
        state.cpu_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `host::init`; this is just to satisfy the compiler
}
