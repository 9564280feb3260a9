//! Input handling for the runner.
//!
//! Two layers: [`KeyTracker`] turns crossterm key events into "is this key
//! held" answers, and [`InputController`] turns per-tick snapshots into trex
//! commands by comparing them with the previous tick.

use crate::entities::{Trex, TrexState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::collections::HashMap;

/// A key counts as held if its last press/repeat arrived within this many
/// frames. Terminals without release events rely on OS key repeat to keep
/// it fresh.
pub const HOLD_WINDOW: u64 = 8;

/// What the player is pressing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub jump: bool,
    pub duck: bool,
}

/// Commands that went through this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputOutcome {
    pub jumped: bool,
}

/// Translates key state edges into trex commands.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    previous: InputSnapshot,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous snapshot, e.g. after a replay.
    pub fn reset(&mut self) {
        self.previous = InputSnapshot::default();
    }

    pub fn process(&mut self, trex: &mut Trex, input: InputSnapshot) -> InputOutcome {
        let mut outcome = InputOutcome::default();

        if input.jump && !self.previous.jump {
            outcome.jumped = trex.begin_jump();
        } else if !input.jump && trex.state() == TrexState::Jumping {
            // short taps give short hops; no-op until the minimum height
            trex.cancel_jump();
        }

        if input.duck {
            if trex.is_airborne() {
                if !self.previous.duck {
                    trex.drop();
                }
            } else {
                trex.duck();
            }
        } else if trex.state() == TrexState::Ducking {
            trex.get_up();
        }

        self.previous = input;
        outcome
    }
}

/// Which actions a key maps to.
pub fn is_jump_key(code: &KeyCode) -> bool {
    matches!(code, KeyCode::Up | KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W'))
}

pub fn is_duck_key(code: &KeyCode) -> bool {
    matches!(code, KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S'))
}

/// Remembers the frame each key was last seen on.
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next frame. Call once per tick before feeding events.
    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    pub fn handle_event(&mut self, key: &KeyEvent) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(key.code, self.frame);
            }
            // keyboard-enhancement terminals report releases
            KeyEventKind::Release => {
                self.key_frame.remove(&key.code);
            }
        }
    }

    pub fn is_held(&self, code: &KeyCode) -> bool {
        self.key_frame
            .get(code)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        for code in self.key_frame.keys().filter(|code| self.is_held(code)) {
            snapshot.jump |= is_jump_key(code);
            snapshot.duck |= is_duck_key(code);
        }
        snapshot
    }

    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}
