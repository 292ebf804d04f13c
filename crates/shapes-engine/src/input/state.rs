use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// What is held down right now, and where the pointer is.
///
/// Fresh presses are counted into an [`InputFrame`].
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.count_press(*key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y }) => {
                self.pointer_pos = Some((*x, *y));
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }
        }

        frame.record(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, repeat: false }
    }

    #[test]
    fn key_press_is_recorded_once_while_held() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        assert!(state.key_down(Key::Space));
        assert!(!frame.key_pressed(Key::Space));
    }

    #[test]
    fn taps_within_one_frame_are_counted() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        for _ in 0..3 {
            state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
            state.apply_event(&mut frame, key(Key::Space, KeyState::Released));
        }
        assert_eq!(frame.presses(Key::Space), 3);
        assert_eq!(frame.presses(Key::Escape), 0);

        frame.clear();
        assert_eq!(frame.presses(Key::Space), 0);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let (mut state, mut frame) = (InputState::default(), InputFrame::default());
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 1.0,
                y: 2.0,
            }),
        );
        assert!(state.button_down(MouseButton::Left));
        assert_eq!(state.pointer_pos, Some((1.0, 2.0)));

        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(!state.button_down(MouseButton::Left));
        assert_eq!(frame.events.len(), 2);
    }
}
