//! Procedural geometry builders.
//!
//! Every builder is a pure function from parameters to a [`MeshData`]:
//! flat, parallel attribute arrays plus an optional u16 index array.
//! Nothing here touches the GPU, so builders run on the generation worker.

mod boxes;
mod error;
mod grid;
mod height_grid;
mod mesh;
mod primitives;
mod search;
mod spheres;

pub use boxes::{build_boxes, BoxSetParams, BoxVertexCount, BOX_STRIDE, VERTICES_PER_BOX};
pub use error::GeometryError;
pub use grid::{
    build_quad, strip_index_count, strip_indices, QuadOrientation, QuadParams, QUAD_COLOR,
    QUAD_UV_CYCLE,
};
pub use height_grid::{HeightGrid, HeightGridParams, HeightSample, AMPLITUDE};
pub use mesh::{
    MeshData, Topology, COLOR_STRIDE, NORMAL_STRIDE, POSITION_STRIDE, STRIP_RESTART, UV_STRIDE,
};
pub use primitives::{build_lines, build_points, build_triangles, VertexArrays};
pub use search::nearest_index;
pub use spheres::{build_spheres, SphereSetParams};
