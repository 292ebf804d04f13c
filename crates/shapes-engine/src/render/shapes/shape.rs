use crate::catalog::{GeneratedShape, ShapeKind};
use crate::geometry::{HeightSample, MeshData};
use crate::render::mesh::{GpuMesh, UploadError};
use crate::render::shader::Program;
use crate::render::texture::Texture;
use crate::render::{RenderCtx, RenderTarget};
use crate::transform::FrameTransforms;

use super::common::{inverse_alpha_blend, vertex_attributes, FrameUniform, ProgramKind, RasterStyle};

/// One drawable shape: its generated geometry plus the GPU state to draw it.
///
/// Buffers are created on the render thread with [`create_buffers`] and
/// freed with [`release`] or on drop. The program and pipeline are built on
/// the first render and kept for the rest of the session.
///
/// [`create_buffers`]: Shape::create_buffers
/// [`release`]: Shape::release
pub struct Shape {
    geometry: GeneratedShape,
    program_kind: ProgramKind,
    style: RasterStyle,
    mesh: GpuMesh,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    program: Option<Program>,

    frame_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,
    frame_bind_group: Option<wgpu::BindGroup>,
    frame_ubo: Option<wgpu::Buffer>,
    texture_bind_group: Option<(u64, wgpu::BindGroup)>,

    warned_no_buffers: bool,
    warned_no_texture: bool,
    warned_clamped: bool,
    program_failed: bool,
}

impl Shape {
    pub fn new(geometry: GeneratedShape) -> Self {
        let (program_kind, style) = draw_setup(&geometry);
        let label = geometry.kind().name();
        Self {
            geometry,
            program_kind,
            style,
            mesh: GpuMesh::new(label),
            pipeline_format: None,
            pipeline: None,
            program: None,
            frame_layout: None,
            texture_layout: None,
            frame_bind_group: None,
            frame_ubo: None,
            texture_bind_group: None,
            warned_no_buffers: false,
            warned_no_texture: false,
            warned_clamped: false,
            program_failed: false,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn program_kind(&self) -> ProgramKind {
        self.program_kind
    }

    pub fn geometry(&self) -> &GeneratedShape {
        &self.geometry
    }

    pub fn mesh_data(&self) -> &MeshData {
        self.geometry.mesh()
    }

    /// Whether GPU buffers currently hold this shape's geometry.
    pub fn is_ready(&self) -> bool {
        self.mesh.is_ready()
    }

    /// Uploads (or re-uploads) the current geometry.
    ///
    /// On failure the buffers from the previous successful upload, if any,
    /// stay in place.
    pub fn create_buffers(&mut self, ctx: &RenderCtx<'_>) -> Result<(), UploadError> {
        self.mesh
            .create_buffers(ctx, self.geometry.mesh(), self.program_kind.attributes())?;
        self.warned_clamped = false;
        Ok(())
    }

    /// Frees the GPU buffers. The pipeline stays cached.
    pub fn release(&mut self) {
        self.mesh.release();
    }

    /// Moves height-grid vertices to the given samples; returns how many
    /// vertices changed. Other shapes ignore samples.
    ///
    /// Call [`create_buffers`](Self::create_buffers) afterwards to upload.
    pub fn inject_heights(&mut self, samples: &[HeightSample]) -> usize {
        match &mut self.geometry {
            GeneratedShape::HeightGrid(grid) => grid.inject(samples),
            _ => {
                log::debug!("{}: ignoring {} height samples", self.kind(), samples.len());
                0
            }
        }
    }

    /// Draws the shape with one draw call.
    ///
    /// Color and depth are loaded, not cleared. Missing buffers, a missing
    /// texture for a textured program or a broken program skip the draw and
    /// warn once.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        transforms: &FrameTransforms,
        texture: Option<&Texture>,
    ) {
        if !self.mesh.is_ready() {
            if !self.warned_no_buffers {
                log::warn!("{}: render called without buffers; skipping", self.kind());
                self.warned_no_buffers = true;
            }
            return;
        }

        let texture = if self.program_kind.is_textured() {
            let Some(texture) = texture else {
                if !self.warned_no_texture {
                    log::warn!("{}: textured program but no texture bound; skipping", self.kind());
                    self.warned_no_texture = true;
                }
                return;
            };
            Some(texture)
        } else {
            None
        };

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        if let Some(texture) = texture {
            self.ensure_texture_binding(ctx, texture);
        }

        let count = self.mesh.draw_count();
        if count < self.mesh.requested_count() && !self.warned_clamped {
            log::warn!(
                "{}: draw count {} exceeds uploaded {}; clamping",
                self.kind(),
                self.mesh.requested_count(),
                count
            );
            self.warned_clamped = true;
        }
        if count == 0 {
            return;
        }

        let Some(frame_ubo) = self.frame_ubo.as_ref() else { return };
        ctx.queue
            .write_buffer(frame_ubo, 0, bytemuck::bytes_of(&FrameUniform::new(transforms)));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(frame_bind_group) = self.frame_bind_group.as_ref() else { return };
        let texture_bind_group = match (texture, &self.texture_bind_group) {
            (Some(_), Some((_, group))) => Some(group),
            (Some(_), None) => return,
            (None, _) => None,
        };

        let mut slices = Vec::with_capacity(self.program_kind.attributes().len());
        for &attr in self.program_kind.attributes() {
            let Some(slice) = self.mesh.vertex_buffer(attr) else { return };
            slices.push(slice);
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame_bind_group, &[]);
        if let Some(group) = texture_bind_group {
            rpass.set_bind_group(1, group, &[]);
        }
        for (slot, slice) in slices.into_iter().enumerate() {
            rpass.set_vertex_buffer(slot as u32, slice);
        }

        match self.mesh.index_buffer() {
            Some(indices) => {
                rpass.set_index_buffer(indices, wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..count, 0, 0..1);
            }
            None => rpass.draw(0..count, 0..1),
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        if self.program_failed {
            return;
        }

        if self.program.is_none() {
            match Program::compile(ctx.device, &self.program_kind.source()) {
                Ok(program) => self.program = Some(program),
                Err(e) => {
                    log::error!("{}: {e}", self.kind());
                    self.program_failed = true;
                    return;
                }
            }
        }
        let Some(program) = self.program.as_ref() else { return };

        let frame_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("shape frame bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(FrameUniform::SIZE),
                    },
                    count: None,
                }],
            });

        let texture_layout = self.program_kind.is_textured().then(|| {
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("shape texture bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Texture {
                                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                                view_dimension: wgpu::TextureViewDimension::D2,
                                multisampled: false,
                            },
                            count: None,
                        },
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                })
        });

        let mut layouts = vec![&frame_layout];
        if let Some(t) = texture_layout.as_ref() {
            layouts.push(t);
        }
        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shape pipeline layout"),
                bind_group_layouts: &layouts,
                immediate_size: 0,
            });

        let attributes = vertex_attributes(program.attributes());
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = program
            .attributes()
            .iter()
            .zip(&attributes)
            .map(|(attr, layout)| wgpu::VertexBufferLayout {
                array_stride: attr.format().size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: layout,
            })
            .collect();

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: program.vertex(),
                entry_point: Some(crate::render::shader::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: program.fragment(),
                entry_point: Some(crate::render::shader::FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: self.style.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: self.style.primitive_state(),

            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "{}: pipeline built for {:?} ({})",
            self.kind(),
            ctx.surface_format,
            self.style.topology.name()
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.frame_layout = Some(frame_layout);
        self.texture_layout = texture_layout;

        self.frame_bind_group = None;
        self.frame_ubo = None;
        self.texture_bind_group = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame_bind_group.is_some() && self.frame_ubo.is_some() {
            return;
        }
        let Some(layout) = self.frame_layout.as_ref() else { return };

        let frame_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("shape frame ubo"),
            size: FrameUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shape frame bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        self.frame_ubo = Some(frame_ubo);
        self.frame_bind_group = Some(bind_group);
    }

    fn ensure_texture_binding(&mut self, ctx: &RenderCtx<'_>, texture: &Texture) {
        if matches!(&self.texture_bind_group, Some((id, _)) if *id == texture.id()) {
            return;
        }
        let Some(layout) = self.texture_layout.as_ref() else { return };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shape texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });
        log::debug!("{}: bound texture `{}`", self.kind(), texture.label());
        self.texture_bind_group = Some((texture.id(), bind_group));
    }
}

/// Program and fixed-function state for each shape family.
///
/// Boxes are the only closed, consistently wound surface and get back-face
/// culling. Quad and height grid are double sided. Sphere bands wind
/// clockwise seen from outside, so they are drawn unculled as well.
fn draw_setup(geometry: &GeneratedShape) -> (ProgramKind, RasterStyle) {
    let topology = geometry.mesh().topology;
    let unculled = |kind| (kind, RasterStyle { topology, cull: None, blend: None });
    match geometry {
        GeneratedShape::Points(_) | GeneratedShape::Lines(_) | GeneratedShape::Triangles(_) => {
            unculled(ProgramKind::Color)
        }
        GeneratedShape::Quad(_) => unculled(ProgramKind::Quad),
        GeneratedShape::HeightGrid(_) => unculled(ProgramKind::HeightMap),
        GeneratedShape::Boxes(_) => (
            ProgramKind::Cube,
            RasterStyle { topology, cull: Some(wgpu::Face::Back), blend: None },
        ),
        GeneratedShape::Spheres { blending, .. } => (
            ProgramKind::Color,
            RasterStyle {
                topology,
                cull: None,
                blend: blending.then(inverse_alpha_blend),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ShapeSpec;
    use crate::geometry::Topology;

    fn demo(kind: ShapeKind) -> GeneratedShape {
        ShapeSpec::demo(kind).build().unwrap()
    }

    #[test]
    fn programs_match_the_geometry_they_draw() {
        for kind in ShapeKind::ALL {
            let geometry = demo(kind);
            let (program, _) = draw_setup(&geometry);
            let mesh = geometry.mesh();
            for attr in program.attributes() {
                let present = match attr {
                    crate::render::VertexAttribute::Normal => mesh.normals.is_some(),
                    crate::render::VertexAttribute::TexCoord => mesh.uvs.is_some(),
                    _ => true,
                };
                assert!(present, "{kind}: {program:?} needs {}", attr.name());
            }
        }
    }

    #[test]
    fn only_boxes_are_culled() {
        for kind in ShapeKind::ALL {
            let (_, style) = draw_setup(&demo(kind));
            assert_eq!(style.cull.is_some(), kind == ShapeKind::Boxes, "{kind}");
        }
    }

    #[test]
    fn sphere_blending_follows_the_flag() {
        let mesh = demo(ShapeKind::Spheres).mesh().clone();
        let (_, opaque) = draw_setup(&GeneratedShape::Spheres { mesh: mesh.clone(), blending: false });
        let (_, blended) = draw_setup(&GeneratedShape::Spheres { mesh, blending: true });
        assert_eq!(opaque.blend, None);
        assert_eq!(blended.blend, Some(inverse_alpha_blend()));
    }

    #[test]
    fn grid_shapes_draw_as_strips() {
        assert_eq!(draw_setup(&demo(ShapeKind::Quad)).1.topology, Topology::TriangleStrip);
        assert_eq!(draw_setup(&demo(ShapeKind::HeightGrid)).1.topology, Topology::TriangleStrip);
        assert_eq!(draw_setup(&demo(ShapeKind::Points)).1.topology, Topology::Points);
    }

    #[test]
    fn injection_only_touches_height_grids() {
        let mut grid = Shape::new(demo(ShapeKind::HeightGrid));
        let mut quad = Shape::new(demo(ShapeKind::Quad));
        let samples = [HeightSample::new(0.0, 0.1, 0.0)];
        assert_eq!(grid.inject_heights(&samples), 1);
        assert_eq!(quad.inject_heights(&samples), 0);
        assert!(!grid.is_ready());
    }
}
