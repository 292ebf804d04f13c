//! Planar grids drawn as one continuous triangle strip.

use super::error::{checked_len, try_vec, GeometryError};
use super::mesh::{MeshData, Topology, STRIP_RESTART};

/// Number of strip indices for a `columns × rows` grid.
///
/// Each adjacent row pair contributes `2 × columns` indices; consecutive
/// pairs are joined by two degenerate indices.
pub fn strip_index_count(columns: usize, rows: usize) -> usize {
    if rows < 2 {
        return 0;
    }
    2 * columns * (rows - 1) + 2 * (rows - 2)
}

/// Builds the triangle-strip index sequence over a row-major grid.
pub fn strip_indices(
    shape: &'static str,
    columns: usize,
    rows: usize,
) -> Result<Vec<u16>, GeometryError> {
    check_dimensions(shape, columns, rows)?;
    let vertices = checked_len(shape, &[columns, rows])?;
    if vertices >= STRIP_RESTART as usize {
        return Err(GeometryError::IndexOverflow { vertices });
    }

    let mut indices = try_vec(shape, strip_index_count(columns, rows))?;
    for row in 0..rows - 1 {
        let top = row * columns;
        let bottom = top + columns;

        if row > 0 {
            indices.push(top as u16);
        }
        for c in 0..columns {
            indices.push((top + c) as u16);
            indices.push((bottom + c) as u16);
        }
        if row < rows - 2 {
            indices.push((bottom + columns - 1) as u16);
        }
    }
    Ok(indices)
}

pub(crate) fn check_dimensions(
    shape: &'static str,
    columns: usize,
    rows: usize,
) -> Result<(), GeometryError> {
    if columns < 2 || rows < 2 {
        return Err(GeometryError::malformed(
            shape,
            format!("grid must be at least 2x2, got {columns}x{rows}"),
        ));
    }
    Ok(())
}

// ── Quad ──────────────────────────────────────────────────────────────────

const QUAD: &str = "quad";

/// Vertex color of every quad vertex.
pub const QUAD_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

/// Per-vertex texture coordinates, cycling with the vertex index.
pub const QUAD_UV_CYCLE: [[f32; 2]; 4] = [[1.0, 1.0], [0.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Plane a quad lies in, chosen by its zero extent.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum QuadOrientation {
    /// Zero depth.
    Xy,
    /// Zero height.
    Xz,
    /// Zero width.
    Yz,
}

impl QuadOrientation {
    /// Selects the plane from `(width, height, depth)`.
    ///
    /// Exactly one extent must be zero.
    pub fn from_extents(extents: [f32; 3]) -> Result<Self, GeometryError> {
        let zero = extents.map(|e| e == 0.0);
        match zero {
            [true, false, false] => Ok(Self::Yz),
            [false, true, false] => Ok(Self::Xz),
            [false, false, true] => Ok(Self::Xy),
            _ => Err(GeometryError::malformed(
                QUAD,
                format!("exactly one extent must be zero, got {extents:?}"),
            )),
        }
    }
}

/// A flat textured rectangle subdivided into `columns × rows` vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadParams {
    pub origin: [f32; 3],
    /// `(width, height, depth)`.
    pub extents: [f32; 3],
    pub columns: u16,
    pub rows: u16,
}

impl QuadParams {
    pub fn new(origin: [f32; 3], extents: [f32; 3]) -> Self {
        Self { origin, extents, columns: 2, rows: 2 }
    }
}

pub fn build_quad(params: &QuadParams) -> Result<MeshData, GeometryError> {
    let orientation = QuadOrientation::from_extents(params.extents)?;
    let (columns, rows) = (params.columns as usize, params.rows as usize);
    let indices = strip_indices(QUAD, columns, rows)?;

    let vertices = columns * rows;
    let mut positions = try_vec(QUAD, vertices * 3)?;
    let mut colors = try_vec(QUAD, vertices * 4)?;
    let mut uvs = try_vec(QUAD, vertices * 2)?;

    let [ox, oy, oz] = params.origin;
    let [w, h, d] = params.extents;

    for y in 0..rows {
        let yr = y as f32 / (rows - 1) as f32;
        for x in (1..=columns).rev() {
            let xr = (x - 1) as f32 / (columns - 1) as f32;
            let p = match orientation {
                QuadOrientation::Xy => [ox + xr * w, oy + yr * h, oz],
                QuadOrientation::Yz => [ox, oy + xr * h, oz + yr * d],
                QuadOrientation::Xz => [ox + xr * w, oy, oz + yr * d],
            };
            let vertex = positions.len() / 3;
            positions.extend_from_slice(&p);
            colors.extend_from_slice(&QUAD_COLOR);
            uvs.extend_from_slice(&QUAD_UV_CYCLE[vertex % QUAD_UV_CYCLE.len()]);
        }
    }

    let draw_count = indices.len() as u32;
    Ok(MeshData {
        topology: Topology::TriangleStrip,
        positions,
        colors,
        normals: None,
        uvs: Some(uvs),
        indices: Some(indices),
        draw_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── strip ─────────────────────────────────────────────────────────────

    #[test]
    fn strip_for_three_by_three_grid() {
        let indices = strip_indices("grid", 3, 3).unwrap();
        assert_eq!(indices, vec![0, 3, 1, 4, 2, 5, 5, 3, 3, 6, 4, 7, 5, 8]);
        assert_eq!(indices.len(), strip_index_count(3, 3));
    }

    #[test]
    fn strip_count_matches_formula() {
        for (cols, rows) in [(2, 2), (4, 2), (2, 5), (7, 9), (32, 32)] {
            let indices = strip_indices("grid", cols, rows).unwrap();
            assert_eq!(indices.len(), 2 * cols * (rows - 1) + 2 * (rows - 2));
        }
    }

    #[test]
    fn strip_indices_stay_in_range() {
        let indices = strip_indices("grid", 5, 4).unwrap();
        assert!(indices.iter().all(|&i| (i as usize) < 20));
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        assert!(strip_indices("grid", 1, 4).is_err());
        assert!(strip_indices("grid", 4, 1).is_err());
        assert!(matches!(
            strip_indices("grid", 300, 300),
            Err(GeometryError::IndexOverflow { vertices: 90_000 })
        ));
    }

    // ── quad ──────────────────────────────────────────────────────────────

    #[test]
    fn zero_depth_selects_xy() {
        let params = QuadParams::new([-1.0, -1.0, 1.0], [2.0, 2.0, 0.0]);
        let mesh = build_quad(&params).unwrap();
        assert_eq!(QuadOrientation::from_extents(params.extents).unwrap(), QuadOrientation::Xy);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.topology, Topology::TriangleStrip);
        assert!(mesh.positions.chunks_exact(3).all(|p| p[2] == 1.0));
        assert_eq!(&mesh.positions[..6], &[1.0, -1.0, 1.0, -1.0, -1.0, 1.0]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn uv_pattern_repeats_every_four_vertices() {
        let mut params = QuadParams::new([0.0, 0.0, 0.0], [4.0, 4.0, 0.0]);
        params.columns = 5;
        params.rows = 3;
        let mesh = build_quad(&params).unwrap();
        assert_eq!(mesh.vertex_count(), 15);
        for (i, uv) in mesh.uvs.as_ref().unwrap().chunks_exact(2).enumerate() {
            assert_eq!(uv, QUAD_UV_CYCLE[i % 4]);
        }
        assert!(mesh.colors.chunks_exact(4).all(|c| c == QUAD_COLOR));
    }

    #[test]
    fn other_planes_follow_their_zero_extent() {
        let yz = build_quad(&QuadParams::new([0.5, 0.0, 0.0], [0.0, 2.0, 3.0])).unwrap();
        assert!(yz.positions.chunks_exact(3).all(|p| p[0] == 0.5));
        assert_eq!(&yz.positions[9..12], &[0.5, 0.0, 3.0]);

        let xz = build_quad(&QuadParams::new([0.0, -2.0, 0.0], [1.0, 0.0, 1.0])).unwrap();
        assert!(xz.positions.chunks_exact(3).all(|p| p[1] == -2.0));
    }

    #[test]
    fn extents_must_have_exactly_one_zero() {
        for extents in [[1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]] {
            let err = build_quad(&QuadParams::new([0.0; 3], extents)).unwrap_err();
            assert!(matches!(err, GeometryError::Malformed { shape: "quad", .. }));
        }
    }
}
