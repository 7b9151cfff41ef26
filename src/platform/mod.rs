//! Platform input layer
//!
//! Tracks which physical keys are held and folds them into the logical
//! [`InputSnapshot`] the simulation reads once per frame.

use crate::sim::tick::InputSnapshot;

/// Physical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    A,
    Right,
    D,
    Up,
    W,
    Down,
    S,
    Space,
    Escape,
}

impl Key {
    /// Map a key name as reported by a windowing layer
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "ArrowLeft" => Key::Left,
            "a" | "A" => Key::A,
            "ArrowRight" => Key::Right,
            "d" | "D" => Key::D,
            "ArrowUp" => Key::Up,
            "w" | "W" => Key::W,
            "ArrowDown" => Key::Down,
            "s" | "S" => Key::S,
            " " | "Space" => Key::Space,
            "Escape" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Held-key set with edge detection for fire and pause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keyboard {
    held: u16,
    /// Held set at the previous snapshot
    previous: u16,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held |= key.bit();
    }

    pub fn release(&mut self, key: Key) {
        self.held &= !key.bit();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held & key.bit() != 0
    }

    fn any(&self, a: Key, b: Key) -> bool {
        self.is_held(a) || self.is_held(b)
    }

    fn pressed_since_last(&self, key: Key) -> bool {
        self.is_held(key) && self.previous & key.bit() == 0
    }

    /// Input for this frame
    ///
    /// Directions are level-triggered. Fire and pause fire once per press.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let input = InputSnapshot {
            left: self.any(Key::Left, Key::A),
            right: self.any(Key::Right, Key::D),
            up: self.any(Key::Up, Key::W),
            down: self.any(Key::Down, Key::S),
            fire: self.pressed_since_last(Key::Space),
            pause: self.pressed_since_last(Key::Escape),
        };
        self.previous = self.held;
        input
    }
}
