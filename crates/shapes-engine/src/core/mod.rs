//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the viewer session, and the per-frame context handed to it.

mod app;
mod ctx;

pub use app::{AppControl, SurfaceHost};
pub use ctx::{FrameCtx, WindowCtx};
