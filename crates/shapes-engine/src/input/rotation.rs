use std::sync::atomic::{AtomicU32, Ordering};

use super::types::{InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

/// Rotation in degrees collected between two frames.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RotationDelta {
    /// About the vertical axis, from horizontal motion.
    pub yaw: f32,
    /// About the horizontal axis, from vertical motion.
    pub pitch: f32,
}

impl RotationDelta {
    pub fn is_zero(&self) -> bool {
        self.yaw == 0.0 && self.pitch == 0.0
    }
}

/// Pending rotation shared between input producers and the render thread.
///
/// Each axis is an `f32` stored as raw bits. Producers add into it and the
/// render thread swaps it back to zero, so deltas arriving between two
/// frames are summed rather than queued.
#[derive(Debug, Default)]
pub struct RotationInput {
    yaw: AtomicU32,
    pitch: AtomicU32,
}

impl RotationInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, delta: RotationDelta) {
        add_f32(&self.yaw, delta.yaw);
        add_f32(&self.pitch, delta.pitch);
    }

    /// Returns the pending rotation and resets it to zero.
    pub fn take(&self) -> RotationDelta {
        RotationDelta {
            yaw: f32::from_bits(self.yaw.swap(0, Ordering::AcqRel)),
            pitch: f32::from_bits(self.pitch.swap(0, Ordering::AcqRel)),
        }
    }

    /// Returns the pending rotation without consuming it.
    pub fn peek(&self) -> RotationDelta {
        RotationDelta {
            yaw: f32::from_bits(self.yaw.load(Ordering::Acquire)),
            pitch: f32::from_bits(self.pitch.load(Ordering::Acquire)),
        }
    }
}

fn add_f32(cell: &AtomicU32, value: f32) {
    if value == 0.0 || !value.is_finite() {
        return;
    }
    // The closure never returns `None`, so the update cannot fail.
    let _ = cell.fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
        Some((f32::from_bits(bits) + value).to_bits())
    });
}

/// Converts pointer drags into rotation deltas.
///
/// Positions are logical pixels. While the primary button is held, each move
/// yields `(current - previous) / density / 2` degrees per axis. The previous
/// position is updated on every move, dragging or not.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    density: f32,
    previous: Option<(f32, f32)>,
    dragging: bool,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PointerTracker {
    pub fn new(density: f32) -> Self {
        Self {
            density: if density > 0.0 { density } else { 1.0 },
            previous: None,
            dragging: false,
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feeds one input event; returns the rotation it produced, if any.
    pub fn handle(&mut self, event: &InputEvent) -> Option<RotationDelta> {
        match event {
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => self.moved(*x, *y),
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
            }) => {
                self.dragging = *state == MouseButtonState::Pressed;
                self.previous = Some((*x, *y));
                None
            }
            InputEvent::PointerLeft => {
                self.previous = None;
                None
            }
            InputEvent::Focused(false) => {
                self.dragging = false;
                None
            }
            _ => None,
        }
    }

    pub fn moved(&mut self, x: f32, y: f32) -> Option<RotationDelta> {
        let (px, py) = self.previous.replace((x, y))?;
        if !self.dragging {
            return None;
        }
        let delta = RotationDelta {
            yaw: (x - px) / self.density / 2.0,
            pitch: (y - py) / self.density / 2.0,
        };
        (!delta.is_zero()).then_some(delta)
    }
}
