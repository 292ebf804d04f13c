//! Per-frame camera and model transforms.
//!
//! The pipeline keeps GL conventions (right-handed eye space, depth in
//! `[-1, 1]`); [`FrameTransforms::clip_mvp`] converts for wgpu at upload.

mod pipeline;

pub use pipeline::{
    frustum, rotation, FrameTransforms, TransformPipeline, DEPTH_REMAP, EYE, FAR, LIGHT_OFFSET,
    LOOK_AT, MODEL_OFFSET, NEAR, UP,
};
