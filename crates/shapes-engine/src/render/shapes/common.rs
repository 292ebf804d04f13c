//! Shared GPU types and utilities used by the shape renderer.

use bytemuck::{Pod, Zeroable};

use crate::geometry::Topology;
use crate::render::shader::{ProgramSource, VertexAttribute};
use crate::transform::FrameTransforms;

// ── programs ──────────────────────────────────────────────────────────────

/// The four programs the catalog draws with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramKind {
    /// Position + color. Points, lines, triangles, spheres.
    Color,
    /// Position + color + UV, textured.
    Quad,
    /// Position + color + normal + UV, textured and lit.
    Cube,
    /// Position + color + normal, lit.
    HeightMap,
}

const COLOR_ATTRS: &[VertexAttribute] = &[VertexAttribute::Position, VertexAttribute::Color];
const QUAD_ATTRS: &[VertexAttribute] = &[
    VertexAttribute::Position,
    VertexAttribute::Color,
    VertexAttribute::TexCoord,
];
const CUBE_ATTRS: &[VertexAttribute] = &[
    VertexAttribute::Position,
    VertexAttribute::Color,
    VertexAttribute::Normal,
    VertexAttribute::TexCoord,
];
const HEIGHT_MAP_ATTRS: &[VertexAttribute] = &[
    VertexAttribute::Position,
    VertexAttribute::Color,
    VertexAttribute::Normal,
];

impl ProgramKind {
    pub const ALL: [ProgramKind; 4] = [
        ProgramKind::Color,
        ProgramKind::Quad,
        ProgramKind::Cube,
        ProgramKind::HeightMap,
    ];

    pub fn source(self) -> ProgramSource<'static> {
        match self {
            ProgramKind::Color => ProgramSource {
                label: "color",
                vertex: include_str!("shaders/color.vert.wgsl"),
                fragment: include_str!("shaders/color.frag.wgsl"),
                attributes: COLOR_ATTRS,
            },
            ProgramKind::Quad => ProgramSource {
                label: "quad",
                vertex: include_str!("shaders/quad.vert.wgsl"),
                fragment: include_str!("shaders/quad.frag.wgsl"),
                attributes: QUAD_ATTRS,
            },
            ProgramKind::Cube => ProgramSource {
                label: "cube",
                vertex: include_str!("shaders/cube.vert.wgsl"),
                fragment: include_str!("shaders/cube.frag.wgsl"),
                attributes: CUBE_ATTRS,
            },
            ProgramKind::HeightMap => ProgramSource {
                label: "height map",
                vertex: include_str!("shaders/height_map.vert.wgsl"),
                fragment: include_str!("shaders/height_map.frag.wgsl"),
                attributes: HEIGHT_MAP_ATTRS,
            },
        }
    }

    pub fn attributes(self) -> &'static [VertexAttribute] {
        self.source().attributes
    }

    /// Whether the program samples a texture at group 1.
    pub fn is_textured(self) -> bool {
        matches!(self, ProgramKind::Quad | ProgramKind::Cube)
    }
}

// ── frame uniform ─────────────────────────────────────────────────────────

/// Group 0, binding 0 of every program. Matrices are column-major.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct FrameUniform {
    pub mvp: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub light_eye: [f32; 4],
}

impl FrameUniform {
    pub(super) fn new(t: &FrameTransforms) -> Self {
        Self {
            mvp: t.clip_mvp().to_cols_array_2d(),
            model_view: t.model_view.to_cols_array_2d(),
            light_eye: t.light_eye.to_array(),
        }
    }

    pub(super) const SIZE: u64 = std::mem::size_of::<FrameUniform>() as u64;
}

// ── pipeline state ────────────────────────────────────────────────────────

/// Fixed-function state that differs between shape families.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct RasterStyle {
    pub topology: Topology,
    pub cull: Option<wgpu::Face>,
    pub blend: Option<wgpu::BlendState>,
}

impl RasterStyle {
    pub(super) fn primitive_state(&self) -> wgpu::PrimitiveState {
        let (topology, strip_index_format) = match self.topology {
            Topology::Points => (wgpu::PrimitiveTopology::PointList, None),
            Topology::Lines => (wgpu::PrimitiveTopology::LineList, None),
            Topology::Triangles => (wgpu::PrimitiveTopology::TriangleList, None),
            Topology::TriangleStrip => (
                wgpu::PrimitiveTopology::TriangleStrip,
                Some(wgpu::IndexFormat::Uint16),
            ),
        };
        wgpu::PrimitiveState {
            topology,
            strip_index_format,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: self.cull,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }
}

/// `src × (1 − src.a) + dst × (1 − dst.a)`, the sphere set's see-through mode.
pub(super) fn inverse_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusDstAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: component, alpha: component }
}

/// One `wgpu::VertexAttribute` per stream; attribute `i` reads `@location(i)`.
pub(super) fn vertex_attributes(attrs: &[VertexAttribute]) -> Vec<[wgpu::VertexAttribute; 1]> {
    attrs
        .iter()
        .enumerate()
        .map(|(i, a)| {
            [wgpu::VertexAttribute {
                format: a.format(),
                offset: 0,
                shader_location: i as u32,
            }]
        })
        .collect()
}
