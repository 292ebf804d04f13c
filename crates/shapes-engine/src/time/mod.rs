//! Frame timing.
//!
//! One [`FrameClock`] per window, ticked once per presented frame, and a
//! [`FrameRate`] meter that reports the average rate at a fixed interval.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameRate, FrameTime};
