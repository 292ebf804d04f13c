use super::error::GeometryError;

/// Floats per position (xyz).
pub const POSITION_STRIDE: usize = 3;
/// Floats per color (rgba).
pub const COLOR_STRIDE: usize = 4;
/// Floats per normal (xyz).
pub const NORMAL_STRIDE: usize = 3;
/// Floats per texture coordinate (uv).
pub const UV_STRIDE: usize = 2;

/// Index value reserved as the triangle-strip restart marker.
pub const STRIP_RESTART: u16 = u16::MAX;

/// Primitive assembly mode for a mesh.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
    TriangleStrip,
}

impl Topology {
    pub fn name(self) -> &'static str {
        match self {
            Topology::Points => "points",
            Topology::Lines => "lines",
            Topology::Triangles => "triangles",
            Topology::TriangleStrip => "triangle strip",
        }
    }
}

/// CPU output of every geometry builder.
///
/// Attribute arrays are flat and parallel: vertex `i` owns
/// `positions[3i..3i+3]`, `colors[4i..4i+4]` and, when present,
/// `normals[3i..3i+3]` and `uvs[2i..2i+2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub topology: Topology,
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
    pub indices: Option<Vec<u16>>,
    /// Element count handed to the draw call (vertices, or indices when indexed).
    pub draw_count: u32,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / POSITION_STRIDE
    }

    /// Number of elements the GPU can actually draw from the uploaded arrays.
    pub fn drawable_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertex_count(),
        }
    }

    /// Total size of all attribute and index arrays in bytes.
    pub fn byte_size(&self) -> usize {
        let floats = self.positions.len()
            + self.colors.len()
            + self.normals.as_ref().map_or(0, Vec::len)
            + self.uvs.as_ref().map_or(0, Vec::len);
        floats * std::mem::size_of::<f32>()
            + self.indices.as_ref().map_or(0, Vec::len) * std::mem::size_of::<u16>()
    }

    /// Checks the parallel-array and index invariants.
    pub fn validate(&self) -> Result<(), GeometryError> {
        const SHAPE: &str = "mesh";

        if self.positions.len() % POSITION_STRIDE != 0 {
            return Err(GeometryError::malformed(
                SHAPE,
                format!("{} position floats is not a multiple of 3", self.positions.len()),
            ));
        }
        let vertices = self.vertex_count();

        if self.colors.len() != vertices * COLOR_STRIDE {
            return Err(GeometryError::malformed(
                SHAPE,
                format!("{} color floats for {vertices} vertices", self.colors.len()),
            ));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != vertices * NORMAL_STRIDE {
                return Err(GeometryError::malformed(
                    SHAPE,
                    format!("{} normal floats for {vertices} vertices", normals.len()),
                ));
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertices * UV_STRIDE {
                return Err(GeometryError::malformed(
                    SHAPE,
                    format!("{} uv floats for {vertices} vertices", uvs.len()),
                ));
            }
        }
        if let Some(indices) = &self.indices {
            if vertices >= STRIP_RESTART as usize {
                return Err(GeometryError::IndexOverflow { vertices });
            }
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GeometryError::malformed(
                    SHAPE,
                    format!("index {bad} out of range for {vertices} vertices"),
                ));
            }
        }
        Ok(())
    }
}

/// Checks that a flat array holds whole tuples and returns the tuple count.
pub(crate) fn tuple_count(
    shape: &'static str,
    what: &str,
    data: &[f32],
    stride: usize,
) -> Result<usize, GeometryError> {
    if data.len() % stride != 0 {
        return Err(GeometryError::malformed(
            shape,
            format!("{what} has {} floats, expected a multiple of {stride}", data.len()),
        ));
    }
    Ok(data.len() / stride)
}
