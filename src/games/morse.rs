//! Morse key-timing game
//!
//! The player taps out a target phrase on the spacebar. Hold duration
//! classifies each press as a dot or a dash; a press that breaks the current
//! letter's code is silently dropped and the letter restarts. The attempt is
//! won when the whole phrase has been keyed.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::outcome::{Minigame, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// International Morse for letters and digits.
pub fn code_for(ch: char) -> Option<&'static str> {
    Some(match ch.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        _ => return None,
    })
}

/// Tuning derived once per attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorseConfig {
    /// Presses held at least this long are dashes; tighter at higher
    /// difficulty.
    pub dash_threshold: f32,
    pub phrase: String,
}

impl MorseConfig {
    pub fn for_difficulty(difficulty: Difficulty, phrase: &str) -> Self {
        Self {
            dash_threshold: 0.3 - 0.12 * difficulty.lerp01(),
            // Letters without a code (spaces, punctuation) are skipped
            phrase: phrase
                .chars()
                .filter(|&c| code_for(c).is_some())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorseState {
    /// Index of the letter currently being keyed.
    pub letter_index: usize,
    /// Symbols keyed so far for the current letter, as `.`/`-` text.
    pub buffer: String,
    pub outcome: Option<Outcome>,
}

/// One Morse attempt.
#[derive(Debug)]
pub struct MorseGame {
    pub state: MorseState,
    pub config: MorseConfig,
    holding: bool,
    hold_time: f32,
}

impl MorseGame {
    pub fn new(difficulty: Difficulty, phrase: &str) -> Self {
        let config = MorseConfig::for_difficulty(difficulty, phrase);
        let outcome = if config.phrase.is_empty() {
            // Nothing to key
            Some(Outcome::Won)
        } else {
            None
        };
        Self {
            state: MorseState {
                letter_index: 0,
                buffer: String::new(),
                outcome,
            },
            config,
            holding: false,
            hold_time: 0.0,
        }
    }

    /// Code for the letter currently being keyed.
    fn target_code(&self) -> Option<&'static str> {
        self.config
            .phrase
            .chars()
            .nth(self.state.letter_index)
            .and_then(code_for)
    }

    pub fn key_down(&mut self) {
        if self.state.outcome.is_some() || self.holding {
            return;
        }
        self.holding = true;
        self.hold_time = 0.0;
    }

    pub fn key_up(&mut self) {
        if !self.holding {
            return;
        }
        self.holding = false;
        let symbol = if self.hold_time >= self.config.dash_threshold {
            Symbol::Dash
        } else {
            Symbol::Dot
        };
        self.accept(symbol);
    }

    /// Feed one classified symbol into the current letter.
    pub fn accept(&mut self, symbol: Symbol) {
        if self.state.outcome.is_some() {
            return;
        }
        let Some(code) = self.target_code() else {
            return;
        };

        self.state.buffer.push(symbol.as_char());
        if !code.starts_with(&self.state.buffer) {
            // Wrong symbol: restart this letter
            self.state.buffer.clear();
            return;
        }
        if self.state.buffer == code {
            self.state.buffer.clear();
            self.state.letter_index += 1;
            if self.state.letter_index >= self.config.phrase.chars().count() {
                self.state.outcome = Some(Outcome::Won);
            }
        }
    }
}

impl Minigame for MorseGame {
    fn advance(&mut self, dt: f32) {
        if self.holding {
            self.hold_time += dt;
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(&self.state).unwrap_or(serde_json::Value::Null)
    }
}
