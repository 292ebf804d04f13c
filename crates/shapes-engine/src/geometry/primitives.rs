//! Pass-through builders: caller-supplied points, segments and triangles.

use super::error::GeometryError;
use super::mesh::{tuple_count, MeshData, Topology, COLOR_STRIDE, POSITION_STRIDE};

/// Flat position/color arrays shared by the pass-through builders.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexArrays {
    /// xyz triples.
    pub positions: Vec<f32>,
    /// rgba quadruples, one per vertex.
    pub colors: Vec<f32>,
}

impl VertexArrays {
    pub fn new(positions: Vec<f32>, colors: Vec<f32>) -> Self {
        Self { positions, colors }
    }
}

pub fn build_points(arrays: &VertexArrays) -> Result<MeshData, GeometryError> {
    pass_through("points", arrays, Topology::Points, 1)
}

pub fn build_lines(arrays: &VertexArrays) -> Result<MeshData, GeometryError> {
    pass_through("lines", arrays, Topology::Lines, 2)
}

pub fn build_triangles(arrays: &VertexArrays) -> Result<MeshData, GeometryError> {
    pass_through("triangles", arrays, Topology::Triangles, 3)
}

fn pass_through(
    shape: &'static str,
    arrays: &VertexArrays,
    topology: Topology,
    per_primitive: usize,
) -> Result<MeshData, GeometryError> {
    let vertices = tuple_count(shape, "positions", &arrays.positions, POSITION_STRIDE)?;
    let colors = tuple_count(shape, "colors", &arrays.colors, COLOR_STRIDE)?;

    if colors != vertices {
        return Err(GeometryError::malformed(
            shape,
            format!("{colors} colors for {vertices} vertices"),
        ));
    }
    if vertices % per_primitive != 0 {
        return Err(GeometryError::malformed(
            shape,
            format!("{vertices} vertices do not form whole {}", topology.name()),
        ));
    }

    let draw_count = u32::try_from(vertices)
        .map_err(|_| GeometryError::malformed(shape, "too many vertices for one draw"))?;

    Ok(MeshData {
        topology,
        positions: arrays.positions.clone(),
        colors: arrays.colors.clone(),
        normals: None,
        uvs: None,
        indices: None,
        draw_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_pair_draws_two_vertices() {
        let arrays = VertexArrays::new(
            vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
            vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
        );
        let mesh = build_lines(&arrays).unwrap();
        assert_eq!(mesh.topology, Topology::Lines);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.draw_count, 2);
        assert_eq!(mesh.positions, arrays.positions);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn points_keep_input_order() {
        let arrays = VertexArrays::new(
            vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0],
        );
        let mesh = build_points(&arrays).unwrap();
        assert_eq!(mesh.topology, Topology::Points);
        assert_eq!(mesh.colors, arrays.colors);
        assert_eq!(mesh.draw_count, 2);
    }

    #[test]
    fn triangles_need_whole_primitives() {
        let arrays = VertexArrays::new(vec![0.0; 6], vec![1.0; 8]);
        assert!(matches!(
            build_triangles(&arrays),
            Err(GeometryError::Malformed { shape: "triangles", .. })
        ));

        let arrays = VertexArrays::new(vec![0.0; 9], vec![1.0; 12]);
        assert_eq!(build_triangles(&arrays).unwrap().draw_count, 3);
    }

    #[test]
    fn color_count_must_match_vertices() {
        let arrays = VertexArrays::new(vec![0.0; 6], vec![1.0; 4]);
        assert!(build_points(&arrays).is_err());
    }

    #[test]
    fn empty_arrays_build_an_empty_mesh() {
        let mesh = build_points(&VertexArrays::new(Vec::new(), Vec::new())).unwrap();
        assert_eq!(mesh.draw_count, 0);
    }
}
