//! Browser host boundary
//!
//! One `#[wasm_bindgen]` session type per minigame. The puzzle-game shell
//! (trivia UI, level gating) constructs a session with a difficulty, wires
//! the completion callbacks, forwards input events, and renders from the
//! JSON snapshot each frame. The animation-frame loop is registered per
//! session and deregistered on terminal state or `stop()`, so a dismounted
//! game never keeps ticking.

mod session;

pub use session::Session;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::difficulty::Difficulty;
use crate::games::ducks::DucksGame;
use crate::games::morse::MorseGame;
use crate::games::oxo::OxoGame;
use crate::games::pong::{PongGame, FIELD_H as PONG_FIELD_H};
use crate::games::snake::{Direction, SnakeGame};
use crate::games::spacewar::SpaceWarGame;
use crate::games::tetris::TetrisGame;
use crate::outcome::Minigame;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Difficulty for the next attempt: escalate after a player win, hold
/// otherwise. Exposed so the shell does not duplicate the capping rule.
#[wasm_bindgen]
pub fn next_difficulty(current: u8, player_won: bool) -> u8 {
    let d = Difficulty::new(current);
    if player_won { d.escalated() } else { d }.level()
}

fn seed_from_clock() -> u64 {
    js_sys::Date::now() as u64
}

fn difficulty_from(raw: Option<u8>) -> Difficulty {
    Difficulty::new(raw.unwrap_or(1))
}

/// Drive a session with the browser's animation-frame scheduler. Each frame
/// re-registers only while the session reports itself running; when it goes
/// terminal (or `stop()` flips the flag) the chain simply ends.
fn spawn_frame_loop<G: Minigame + 'static>(session: Rc<RefCell<Session<G>>>) -> Result<(), JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    schedule_frame(session);
    Ok(())
}

fn schedule_frame<G: Minigame + 'static>(session: Rc<RefCell<Session<G>>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        let keep_running = session.borrow_mut().frame(time);
        if keep_running {
            schedule_frame(session);
        }
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

macro_rules! session_common {
    ($handle:ident) => {
        #[wasm_bindgen]
        impl $handle {
            /// Register the animation-frame loop. Fails only when no window
            /// is available, which aborts this instance without starting it.
            pub fn start(&self) -> Result<(), JsValue> {
                self.inner.borrow_mut().resume();
                spawn_frame_loop(self.inner.clone())
            }

            /// Deregister the loop (host unmount or explicit restart).
            pub fn stop(&self) {
                self.inner.borrow_mut().halt();
            }

            pub fn set_on_game_complete(&self, callback: Function) {
                self.inner.borrow_mut().set_on_game_complete(callback);
            }

            pub fn set_on_play_again(&self, callback: Function) {
                self.inner.borrow_mut().set_on_play_again(callback);
            }

            /// Player asked for a rematch: halts the loop and tells the
            /// shell whether the finished attempt was a win.
            pub fn request_play_again(&self) {
                self.inner.borrow_mut().request_play_again();
            }

            /// Renderable state as JSON for the shell's view layer.
            pub fn snapshot(&self) -> String {
                self.inner.borrow().snapshot_json()
            }

            /// Terminal outcome as a string (`won`/`lost`/`draw`/`timeout`),
            /// empty while the attempt is live.
            pub fn outcome(&self) -> String {
                self.inner.borrow().outcome_str()
            }
        }
    };
}

/// Pong against the tracking CPU paddle.
#[wasm_bindgen]
pub struct PongSession {
    inner: Rc<RefCell<Session<PongGame>>>,
}

#[wasm_bindgen]
impl PongSession {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<u8>, force_win: Option<bool>) -> PongSession {
        let game = PongGame::new(difficulty_from(difficulty), seed_from_clock());
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    pub fn key_down(&self, key: &str) {
        let mut session = self.inner.borrow_mut();
        match key {
            "ArrowUp" | "w" | "W" => session.game.input.move_dir = -1.0,
            "ArrowDown" | "s" | "S" => session.game.input.move_dir = 1.0,
            _ => {}
        }
    }

    pub fn key_up(&self, key: &str) {
        let mut session = self.inner.borrow_mut();
        match key {
            "ArrowUp" | "ArrowDown" | "w" | "W" | "s" | "S" => {
                session.game.input.move_dir = 0.0;
            }
            _ => {}
        }
    }

    /// Pointer-follow: y in canvas coordinates, scaled by the caller to the
    /// field height.
    pub fn pointer(&self, y: f32) {
        self.inner.borrow_mut().game.input.target_y = Some(y.clamp(0.0, PONG_FIELD_H));
    }
}

session_common!(PongSession);

/// Tic-Tac-Toe against the perfect-play CPU.
#[wasm_bindgen]
pub struct OxoSession {
    inner: Rc<RefCell<Session<OxoGame>>>,
}

#[wasm_bindgen]
impl OxoSession {
    /// `cpu_win_streak` is the shell-tracked run of CPU wins deciding who
    /// opens this attempt.
    #[wasm_bindgen(constructor)]
    pub fn new(
        difficulty: Option<u8>,
        cpu_win_streak: Option<u32>,
        force_win: Option<bool>,
    ) -> OxoSession {
        let game = OxoGame::new(
            difficulty_from(difficulty),
            cpu_win_streak.unwrap_or(0),
            seed_from_clock(),
        );
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    /// Player claims a board cell (0..9, row-major).
    pub fn play_cell(&self, cell: usize) {
        self.inner.borrow_mut().game.play(cell);
    }
}

session_common!(OxoSession);

/// Space War against the CPU pilot.
#[wasm_bindgen]
pub struct SpaceWarSession {
    inner: Rc<RefCell<Session<SpaceWarGame>>>,
}

#[wasm_bindgen]
impl SpaceWarSession {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<u8>, force_win: Option<bool>) -> SpaceWarSession {
        let game = SpaceWarGame::new(difficulty_from(difficulty), seed_from_clock());
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    pub fn key_down(&self, key: &str) {
        let mut session = self.inner.borrow_mut();
        match key {
            "ArrowLeft" | "a" | "A" => session.game.input.turn = -1.0,
            "ArrowRight" | "d" | "D" => session.game.input.turn = 1.0,
            "ArrowUp" | "w" | "W" => session.game.input.thrust = true,
            " " => session.game.input.fire = true,
            _ => {}
        }
    }

    pub fn key_up(&self, key: &str) {
        let mut session = self.inner.borrow_mut();
        match key {
            "ArrowLeft" | "ArrowRight" | "a" | "A" | "d" | "D" => {
                session.game.input.turn = 0.0;
            }
            "ArrowUp" | "w" | "W" => session.game.input.thrust = false,
            " " => session.game.input.fire = false,
            _ => {}
        }
    }
}

session_common!(SpaceWarSession);

/// Tetris.
#[wasm_bindgen]
pub struct TetrisSession {
    inner: Rc<RefCell<Session<TetrisGame>>>,
}

#[wasm_bindgen]
impl TetrisSession {
    #[wasm_bindgen(constructor)]
    pub fn new(
        difficulty: Option<u8>,
        mobile: Option<bool>,
        force_win: Option<bool>,
    ) -> TetrisSession {
        let game = TetrisGame::new(
            difficulty_from(difficulty),
            mobile.unwrap_or(false),
            seed_from_clock(),
        );
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    pub fn key_down(&self, key: &str) {
        let mut session = self.inner.borrow_mut();
        match key {
            "ArrowLeft" | "a" | "A" => session.game.move_left(),
            "ArrowRight" | "d" | "D" => session.game.move_right(),
            "ArrowUp" | "w" | "W" => session.game.rotate(),
            "ArrowDown" | "s" | "S" => session.game.soft_drop(),
            " " => session.game.hard_drop(),
            _ => {}
        }
    }
}

session_common!(TetrisSession);

/// Snake.
#[wasm_bindgen]
pub struct SnakeSession {
    inner: Rc<RefCell<Session<SnakeGame>>>,
}

#[wasm_bindgen]
impl SnakeSession {
    #[wasm_bindgen(constructor)]
    pub fn new(
        difficulty: Option<u8>,
        mobile: Option<bool>,
        force_win: Option<bool>,
    ) -> SnakeSession {
        let game = SnakeGame::new(
            difficulty_from(difficulty),
            mobile.unwrap_or(false),
            seed_from_clock(),
        );
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    pub fn key_down(&self, key: &str) {
        let dir = match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = dir {
            self.inner.borrow_mut().game.queue_direction(dir);
        }
    }
}

session_common!(SnakeSession);

/// Morse key-timing.
#[wasm_bindgen]
pub struct MorseSession {
    inner: Rc<RefCell<Session<MorseGame>>>,
}

#[wasm_bindgen]
impl MorseSession {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<u8>, phrase: &str, force_win: Option<bool>) -> MorseSession {
        let game = MorseGame::new(difficulty_from(difficulty), phrase);
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    pub fn key_down(&self, key: &str) {
        if key == " " {
            self.inner.borrow_mut().game.key_down();
        }
    }

    pub fn key_up(&self, key: &str) {
        if key == " " {
            self.inner.borrow_mut().game.key_up();
        }
    }
}

session_common!(MorseSession);

/// Duck-shoot gallery.
#[wasm_bindgen]
pub struct DucksSession {
    inner: Rc<RefCell<Session<DucksGame>>>,
}

#[wasm_bindgen]
impl DucksSession {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<u8>, force_win: Option<bool>) -> DucksSession {
        let game = DucksGame::new(difficulty_from(difficulty), seed_from_clock());
        Self {
            inner: Rc::new(RefCell::new(Session::new(
                game,
                force_win.unwrap_or(false),
            ))),
        }
    }

    /// Fire at field coordinates (scaled by the caller from the canvas).
    pub fn click(&self, x: f32, y: f32) {
        self.inner.borrow_mut().game.shoot(x, y);
    }
}

session_common!(DucksSession);
