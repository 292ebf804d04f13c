use std::collections::HashMap;

use super::types::{InputEvent, Key};

/// Input collected between two frames.
///
/// Presses are counted rather than flagged, so a key tapped twice before
/// the next redraw is seen twice.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    key_presses: HashMap<Key, u32>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.key_presses.clear();
    }

    pub(super) fn record(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    pub(super) fn count_press(&mut self, key: Key) {
        *self.key_presses.entry(key).or_default() += 1;
    }

    /// Fresh presses of `key` since the last frame.
    pub fn presses(&self, key: Key) -> u32 {
        self.key_presses.get(&key).copied().unwrap_or(0)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.presses(key) > 0
    }
}
