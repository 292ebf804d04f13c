//! Axis-aligned boxes, 36 vertices each.

use super::error::{checked_len, try_vec, GeometryError};
use super::mesh::{tuple_count, MeshData, Topology, COLOR_STRIDE};

const SHAPE: &str = "boxes";

/// Scalars per box: `x1, x2, y1, y2, z1, z2`.
pub const BOX_STRIDE: usize = 6;
/// Two triangles on each of six faces.
pub const VERTICES_PER_BOX: usize = 36;

/// How the draw count of a box set is derived.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum BoxVertexCount {
    /// `boxes × 36`, the number of emitted vertices.
    #[default]
    PerBox,
    /// `bounds scalars × 36`, six times the emitted vertex count.
    ///
    /// The renderer clamps this to the uploaded vertex count.
    RawScalarCount,
}

/// One bounds sextuple and one RGBA per box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSetParams {
    pub bounds: Vec<f32>,
    pub colors: Vec<f32>,
    pub count_rule: BoxVertexCount,
}

// Corner indices into the 8-corner table, two triangles per face.
const FACES: [[usize; 6]; 6] = [
    [0, 2, 1, 2, 3, 1], // front  (+z)
    [1, 3, 5, 3, 7, 5], // right  (+x)
    [5, 7, 4, 7, 6, 4], // back   (-z)
    [4, 6, 0, 6, 2, 0], // left   (-x)
    [4, 0, 5, 0, 1, 5], // top    (+y)
    [7, 3, 6, 3, 2, 6], // bottom (-y)
];

const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

const FACE_UVS: [[f32; 2]; 6] = [
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [1.0, 0.0],
];

pub fn build_boxes(params: &BoxSetParams) -> Result<MeshData, GeometryError> {
    let boxes = tuple_count(SHAPE, "bounds", &params.bounds, BOX_STRIDE)?;
    let colors = tuple_count(SHAPE, "colors", &params.colors, COLOR_STRIDE)?;
    if colors != boxes {
        return Err(GeometryError::malformed(
            SHAPE,
            format!("{colors} colors for {boxes} boxes"),
        ));
    }

    let vertices = checked_len(SHAPE, &[boxes, VERTICES_PER_BOX])?;
    let mut positions = try_vec(SHAPE, checked_len(SHAPE, &[vertices, 3])?)?;
    let mut out_colors = try_vec(SHAPE, checked_len(SHAPE, &[vertices, 4])?)?;
    let mut normals = try_vec(SHAPE, checked_len(SHAPE, &[vertices, 3])?)?;
    let mut uvs = try_vec(SHAPE, checked_len(SHAPE, &[vertices, 2])?)?;

    for (bounds, color) in params
        .bounds
        .chunks_exact(BOX_STRIDE)
        .zip(params.colors.chunks_exact(COLOR_STRIDE))
    {
        let corners = box_corners(bounds);
        for (face, normal) in FACES.iter().zip(FACE_NORMALS.iter()) {
            for (&corner, uv) in face.iter().zip(FACE_UVS.iter()) {
                positions.extend_from_slice(&corners[corner]);
                out_colors.extend_from_slice(color);
                normals.extend_from_slice(normal);
                uvs.extend_from_slice(uv);
            }
        }
    }

    let draw_count = match params.count_rule {
        BoxVertexCount::PerBox => vertices,
        BoxVertexCount::RawScalarCount => params.bounds.len().saturating_mul(VERTICES_PER_BOX),
    };

    Ok(MeshData {
        topology: Topology::Triangles,
        positions,
        colors: out_colors,
        normals: Some(normals),
        uvs: Some(uvs),
        indices: None,
        draw_count: u32::try_from(draw_count).unwrap_or(u32::MAX),
    })
}

/// Eight corners of one box, front face (`z2`) first.
fn box_corners(b: &[f32]) -> [[f32; 3]; 8] {
    let (x1, x2, y1, y2, z1, z2) = (b[0], b[1], b[2], b[3], b[4], b[5]);
    [
        [x1, y2, z2],
        [x2, y2, z2],
        [x1, y1, z2],
        [x2, y1, z2],
        [x1, y2, z1],
        [x2, y2, z1],
        [x1, y1, z1],
        [x2, y1, z1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(rule: BoxVertexCount) -> BoxSetParams {
        BoxSetParams {
            bounds: vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0],
            colors: vec![1.0, 0.0, 0.0, 1.0],
            count_rule: rule,
        }
    }

    fn vertex(mesh: &MeshData, i: usize) -> [f32; 3] {
        [mesh.positions[i * 3], mesh.positions[i * 3 + 1], mesh.positions[i * 3 + 2]]
    }

    // ── sizes ─────────────────────────────────────────────────────────────

    #[test]
    fn array_lengths_scale_with_box_count() {
        for n in [1usize, 2, 5] {
            let params = BoxSetParams {
                bounds: [0.0, 1.0, 0.0, 1.0, 0.0, 1.0].repeat(n),
                colors: [0.2, 0.4, 0.6, 1.0].repeat(n),
                count_rule: BoxVertexCount::PerBox,
            };
            let mesh = build_boxes(&params).unwrap();
            assert_eq!(mesh.positions.len(), n * 36 * 3);
            assert_eq!(mesh.colors.len(), n * 36 * 4);
            assert_eq!(mesh.draw_count as usize, n * 36);
            assert!(mesh.validate().is_ok());
        }
    }

    #[test]
    fn raw_scalar_rule_reports_six_times_the_vertices() {
        let mesh = build_boxes(&cube(BoxVertexCount::RawScalarCount)).unwrap();
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.draw_count, 216);
    }

    #[test]
    fn mismatched_colors_are_malformed() {
        let mut params = cube(BoxVertexCount::PerBox);
        params.colors.extend_from_slice(&[0.0, 0.0, 0.0, 1.0]);
        assert!(matches!(build_boxes(&params), Err(GeometryError::Malformed { .. })));
    }

    // ── faces ─────────────────────────────────────────────────────────────

    #[test]
    fn front_face_uses_far_z_corners_in_order() {
        let mesh = build_boxes(&cube(BoxVertexCount::PerBox)).unwrap();
        assert_eq!(vertex(&mesh, 0), [-1.0, 1.0, 1.0]);
        assert_eq!(vertex(&mesh, 1), [-1.0, -1.0, 1.0]);
        assert_eq!(vertex(&mesh, 2), [1.0, 1.0, 1.0]);
        assert_eq!(vertex(&mesh, 4), [1.0, -1.0, 1.0]);
    }

    #[test]
    fn normals_are_constant_per_face_and_point_outward() {
        let mesh = build_boxes(&cube(BoxVertexCount::PerBox)).unwrap();
        let normals = mesh.normals.as_ref().unwrap();
        for face in 0..6 {
            let expected = FACE_NORMALS[face];
            for v in 0..6 {
                let i = (face * 6 + v) * 3;
                assert_eq!(&normals[i..i + 3], &expected);
                // Every vertex of the face lies on the side the normal points to.
                let p = vertex(&mesh, face * 6 + v);
                let dot: f32 = p.iter().zip(expected.iter()).map(|(a, b)| a * b).sum();
                assert_eq!(dot, 1.0);
            }
        }
    }

    #[test]
    fn color_and_uvs_repeat_for_every_face() {
        let mesh = build_boxes(&cube(BoxVertexCount::PerBox)).unwrap();
        assert!(mesh.colors.chunks_exact(4).all(|c| c == [1.0, 0.0, 0.0, 1.0]));

        let uvs = mesh.uvs.as_ref().unwrap();
        for face in uvs.chunks_exact(12) {
            assert_eq!(face, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
        }
    }
}
