//! Per-instance session plumbing shared by every minigame handle
//!
//! A session owns one game attempt: the frame clock, the running flag the
//! animation-frame chain checks, and the JS callbacks. Callbacks fire at
//! most once per terminal state.

use js_sys::Function;
use wasm_bindgen::JsValue;

use crate::clock::FrameClock;
use crate::outcome::{Minigame, Outcome};

pub struct Session<G: Minigame> {
    pub game: G,
    clock: FrameClock,
    running: bool,
    /// Secret-phrase override: first frame short-circuits to a win.
    force_win: bool,
    outcome: Option<Outcome>,
    complete_fired: bool,
    on_game_complete: Option<Function>,
    on_play_again: Option<Function>,
}

impl<G: Minigame> Session<G> {
    pub fn new(game: G, force_win: bool) -> Self {
        Self {
            game,
            clock: FrameClock::new(),
            running: false,
            force_win,
            outcome: None,
            complete_fired: false,
            on_game_complete: None,
            on_play_again: None,
        }
    }

    pub fn set_on_game_complete(&mut self, callback: Function) {
        self.on_game_complete = Some(callback);
    }

    pub fn set_on_play_again(&mut self, callback: Function) {
        self.on_play_again = Some(callback);
    }

    /// Arm the loop. Terminal sessions stay halted; the clock forgets the
    /// idle gap so it is not billed as play time.
    pub fn resume(&mut self) {
        if self.outcome.is_none() {
            self.running = true;
            self.clock.reset();
        }
    }

    pub fn halt(&mut self) {
        self.running = false;
    }

    /// One animation-frame callback. Returns false when the chain must end
    /// (halted or terminal), which deregisters the loop.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        if self.force_win {
            self.finish(Outcome::Won);
            return false;
        }

        let dt = self.clock.tick(now_ms);
        self.game.advance(dt);

        if let Some(outcome) = self.game.outcome() {
            self.finish(outcome);
            return false;
        }
        true
    }

    fn finish(&mut self, outcome: Outcome) {
        self.running = false;
        self.outcome = Some(outcome);
        log::info!("game over: {:?}", outcome);
        if outcome.player_won() && !self.complete_fired {
            self.complete_fired = true;
            if let Some(callback) = &self.on_game_complete {
                if let Err(err) = callback.call0(&JsValue::NULL) {
                    log::warn!("on_game_complete callback failed: {:?}", err);
                }
            }
        }
    }

    /// Player asked for a rematch. Halts this attempt and reports whether it
    /// ended in a win, so the shell can escalate difficulty.
    pub fn request_play_again(&mut self) {
        self.running = false;
        let player_won = self
            .outcome
            .or_else(|| self.game.outcome())
            .is_some_and(Outcome::player_won);
        if let Some(callback) = &self.on_play_again {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_bool(player_won)) {
                log::warn!("on_play_again callback failed: {:?}", err);
            }
        }
    }

    pub fn snapshot_json(&self) -> String {
        self.game.snapshot().to_string()
    }

    pub fn outcome_str(&self) -> String {
        match self.outcome.or_else(|| self.game.outcome()) {
            Some(Outcome::Won) => "won".to_string(),
            Some(Outcome::Lost) => "lost".to_string(),
            Some(Outcome::Draw) => "draw".to_string(),
            Some(Outcome::Timeout) => "timeout".to_string(),
            None => String::new(),
        }
    }
}
