//! Shapes engine crate.
//!
//! Procedural shape geometry, the per-frame transform pipeline, the GPU
//! layer that uploads and draws one shape, and the window runtime that
//! drives it all.

pub mod catalog;
pub mod geometry;
pub mod scheduler;
pub mod transform;

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
pub mod session;
