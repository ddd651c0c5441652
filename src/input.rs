//! Keyboard state tracking.
//!
//! Terminals report key presses, not key state.  We keep the frame number of
//! the last press/repeat event for every key; a key counts as "held" while
//! that event is no older than `HOLD_WINDOW` frames.
//!
//! Works on two classes of terminal:
//! * **Keyboard-enhancement capable** (kitty protocol): proper `Press` /
//!   `Repeat` / `Release` events, so keys are dropped on release.
//! * **Classic terminals**: only `Press` events (OS key-repeat shows as
//!   repeated `Press`).  Keys expire after `HOLD_WINDOW` frames of silence.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::entities::{PressedKeys, TickInput};

/// At 50 ticks/s, 6 frames ≈ 120 ms, which is shorter than a typical
/// OS key-repeat delay but longer than the repeat interval.
pub const HOLD_WINDOW: u64 = 6;

#[derive(Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<KeyCode, u64>,
    fire_presses: usize,
    close_requested: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one terminal event observed during `frame`.
    pub fn handle_event(&mut self, event: &Event, frame: u64) {
        if let Event::Key(key) = event {
            self.handle_key(key, frame);
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, frame: u64) {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press => {
                self.last_seen.insert(code, frame);
                match code {
                    KeyCode::Esc | KeyCode::Char('q') => self.close_requested = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.close_requested = true;
                    }
                    KeyCode::Char(' ') => self.fire_presses += 1,
                    _ => {}
                }
            }
            // Refresh the timestamp only; holding Space must not auto-fire.
            KeyEventKind::Repeat => {
                self.last_seen.insert(code, frame);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&code);
            }
        }
    }

    /// The input source went away; treat it like closing the window.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn pressed_keys(&self, frame: u64) -> PressedKeys {
        PressedKeys {
            up: self.is_held(KeyCode::Up, frame) || self.is_held(KeyCode::Char('w'), frame),
            down: self.is_held(KeyCode::Down, frame) || self.is_held(KeyCode::Char('s'), frame),
            left: self.is_held(KeyCode::Left, frame) || self.is_held(KeyCode::Char('a'), frame),
            right: self.is_held(KeyCode::Right, frame) || self.is_held(KeyCode::Char('d'), frame),
        }
    }

    /// Collect this frame's input and reset the one-shot counters.
    pub fn take_input(&mut self, frame: u64) -> TickInput {
        let input = TickInput {
            close_requested: self.close_requested,
            fire_presses: self.fire_presses,
            keys: self.pressed_keys(frame),
        };
        self.fire_presses = 0;
        self.close_requested = false;
        input
    }
}

/// Fold upper-case letters onto lower-case so Caps Lock doesn't matter.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
