//! GPU rendering subsystem.
//!
//! Shapes own their buffers and pipeline state and record one render pass
//! each into the frame's encoder. Geometry arrives as [`MeshData`] built off
//! the render thread; everything here runs on the render thread.
//!
//! Convention:
//! - Matrices use GL conventions up to [`FrameTransforms::clip_mvp`].
//! - Every program reads the frame uniform at group 0 and, when textured,
//!   a texture/sampler pair at group 1.
//!
//! [`MeshData`]: crate::geometry::MeshData
//! [`FrameTransforms::clip_mvp`]: crate::transform::FrameTransforms::clip_mvp

mod ctx;
pub mod mesh;
pub mod shader;
pub mod shapes;
pub mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{GpuMesh, UploadError};
pub use shader::{check_program, Program, ProgramSource, ShaderError, VertexAttribute};
pub use shapes::{ProgramKind, Shape};
pub use texture::{Texture, TextureError};
