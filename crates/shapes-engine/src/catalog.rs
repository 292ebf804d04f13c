//! Shape catalog: which shape a session shows and with what parameters.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use thiserror::Error;

use crate::geometry::{
    build_boxes, build_lines, build_points, build_quad, build_spheres, build_triangles,
    BoxSetParams, BoxVertexCount, GeometryError, HeightGrid, HeightGridParams, MeshData,
    QuadParams, SphereSetParams, VertexArrays,
};

/// The seven shape families.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Points,
    Lines,
    Triangles,
    Quad,
    HeightGrid,
    Boxes,
    Spheres,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Points,
        ShapeKind::Lines,
        ShapeKind::Triangles,
        ShapeKind::Quad,
        ShapeKind::HeightGrid,
        ShapeKind::Boxes,
        ShapeKind::Spheres,
    ];

    /// Identifier used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Points => "points",
            ShapeKind::Lines => "lines",
            ShapeKind::Triangles => "triangles",
            ShapeKind::Quad => "quad",
            ShapeKind::HeightGrid => "height-grid",
            ShapeKind::Boxes => "boxes",
            ShapeKind::Spheres => "spheres",
        }
    }

    /// Human-readable title, used for the window.
    pub fn title(self) -> &'static str {
        match self {
            ShapeKind::Points => "Points",
            ShapeKind::Lines => "Lines",
            ShapeKind::Triangles => "Triangles",
            ShapeKind::Quad => "Quad",
            ShapeKind::HeightGrid => "Height Grid",
            ShapeKind::Boxes => "Cubes",
            ShapeKind::Spheres => "Spheres",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown shape `{0}`")]
pub struct UnknownShape(pub String);

impl FromStr for ShapeKind {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| UnknownShape(s.to_string()))
    }
}

/// Construction parameters, one variant per shape family.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeSpec {
    Points(VertexArrays),
    Lines(VertexArrays),
    Triangles(VertexArrays),
    Quad(QuadParams),
    HeightGrid(HeightGridParams),
    Boxes(BoxSetParams),
    Spheres(SphereSetParams),
}

impl ShapeSpec {
    /// Demo parameters for each shape family.
    pub fn demo(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Points => ShapeSpec::Points(VertexArrays::new(
                vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
                vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0],
            )),
            ShapeKind::Lines => ShapeSpec::Lines(VertexArrays::new(
                vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
                vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            )),
            ShapeKind::Triangles => ShapeSpec::Triangles(VertexArrays::new(
                vec![-1.0, -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
                vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
            )),
            ShapeKind::Quad => {
                ShapeSpec::Quad(QuadParams::new([-1.0, -1.0, 1.0], [2.0, 2.0, 0.0]))
            }
            ShapeKind::HeightGrid => ShapeSpec::HeightGrid(HeightGridParams::default()),
            ShapeKind::Boxes => ShapeSpec::Boxes(BoxSetParams {
                bounds: vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0],
                colors: vec![1.0, 0.0, 0.0, 1.0],
                count_rule: BoxVertexCount::PerBox,
            }),
            ShapeKind::Spheres => ShapeSpec::Spheres(SphereSetParams {
                centers: vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0],
                colors: vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0],
                radii: vec![0.5, 0.5],
                steps: 50,
                blending: false,
            }),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeSpec::Points(_) => ShapeKind::Points,
            ShapeSpec::Lines(_) => ShapeKind::Lines,
            ShapeSpec::Triangles(_) => ShapeKind::Triangles,
            ShapeSpec::Quad(_) => ShapeKind::Quad,
            ShapeSpec::HeightGrid(_) => ShapeKind::HeightGrid,
            ShapeSpec::Boxes(_) => ShapeKind::Boxes,
            ShapeSpec::Spheres(_) => ShapeKind::Spheres,
        }
    }

    /// Runs the builder for this shape. Pure CPU work.
    pub fn build(&self) -> Result<GeneratedShape, GeometryError> {
        let started = Instant::now();
        let shape = match self {
            ShapeSpec::Points(a) => GeneratedShape::Points(build_points(a)?),
            ShapeSpec::Lines(a) => GeneratedShape::Lines(build_lines(a)?),
            ShapeSpec::Triangles(a) => GeneratedShape::Triangles(build_triangles(a)?),
            ShapeSpec::Quad(p) => GeneratedShape::Quad(build_quad(p)?),
            ShapeSpec::HeightGrid(p) => GeneratedShape::HeightGrid(HeightGrid::new(p)?),
            ShapeSpec::Boxes(p) => GeneratedShape::Boxes(build_boxes(p)?),
            ShapeSpec::Spheres(p) => GeneratedShape::Spheres {
                mesh: build_spheres(p)?,
                blending: p.blending,
            },
        };
        log::debug!(
            "built {} in {:.2?}: {} vertices, {} bytes",
            self.kind(),
            started.elapsed(),
            shape.mesh().vertex_count(),
            shape.mesh().byte_size(),
        );
        Ok(shape)
    }
}

/// Builder output, one variant per shape family.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedShape {
    Points(MeshData),
    Lines(MeshData),
    Triangles(MeshData),
    Quad(MeshData),
    HeightGrid(HeightGrid),
    Boxes(MeshData),
    Spheres { mesh: MeshData, blending: bool },
}

impl GeneratedShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            GeneratedShape::Points(_) => ShapeKind::Points,
            GeneratedShape::Lines(_) => ShapeKind::Lines,
            GeneratedShape::Triangles(_) => ShapeKind::Triangles,
            GeneratedShape::Quad(_) => ShapeKind::Quad,
            GeneratedShape::HeightGrid(_) => ShapeKind::HeightGrid,
            GeneratedShape::Boxes(_) => ShapeKind::Boxes,
            GeneratedShape::Spheres { .. } => ShapeKind::Spheres,
        }
    }

    pub fn mesh(&self) -> &MeshData {
        match self {
            GeneratedShape::Points(m)
            | GeneratedShape::Lines(m)
            | GeneratedShape::Triangles(m)
            | GeneratedShape::Quad(m)
            | GeneratedShape::Boxes(m)
            | GeneratedShape::Spheres { mesh: m, .. } => m,
            GeneratedShape::HeightGrid(grid) => grid.mesh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Topology;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.name().parse::<ShapeKind>().unwrap(), kind);
        }
        assert_eq!(" Spheres ".parse::<ShapeKind>().unwrap(), ShapeKind::Spheres);
        assert!("torus".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn every_demo_builds_a_valid_mesh() {
        for kind in ShapeKind::ALL {
            let spec = ShapeSpec::demo(kind);
            assert_eq!(spec.kind(), kind);
            let shape = spec.build().unwrap();
            assert_eq!(shape.kind(), kind);
            assert!(shape.mesh().validate().is_ok(), "{kind} mesh invalid");
        }
    }

    #[test]
    fn demo_topologies() {
        let topo = |k| ShapeSpec::demo(k).build().unwrap().mesh().topology;
        assert_eq!(topo(ShapeKind::Points), Topology::Points);
        assert_eq!(topo(ShapeKind::Lines), Topology::Lines);
        assert_eq!(topo(ShapeKind::Quad), Topology::TriangleStrip);
        assert_eq!(topo(ShapeKind::HeightGrid), Topology::TriangleStrip);
        assert_eq!(topo(ShapeKind::Spheres), Topology::Triangles);
    }

    #[test]
    fn malformed_spec_surfaces_geometry_error() {
        let spec = ShapeSpec::Quad(QuadParams::new([0.0; 3], [1.0, 1.0, 1.0]));
        assert!(matches!(spec.build(), Err(GeometryError::Malformed { .. })));
    }
}
