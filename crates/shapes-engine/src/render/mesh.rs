//! GPU buffer set of one shape: one vertex buffer per attribute stream plus
//! an optional u16 index buffer.

use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::geometry::{GeometryError, MeshData, Topology};

use super::shader::VertexAttribute;
use super::RenderCtx;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UploadError {
    /// A buffer would exceed what the device can allocate.
    #[error("{label}: {bytes} bytes exceeds the device buffer limit of {limit}")]
    Allocation { label: String, bytes: u64, limit: u64 },

    /// The program needs a stream the mesh does not carry.
    #[error("{label}: mesh has no `{attribute}` data")]
    MissingAttribute { label: String, attribute: &'static str },

    #[error(transparent)]
    Invalid(#[from] GeometryError),
}

impl UploadError {
    pub fn is_allocation(&self) -> bool {
        matches!(self, UploadError::Allocation { .. })
    }
}

struct GpuBuffer {
    buffer: wgpu::Buffer,
    /// Bytes of live data at the start of `buffer`.
    len: u64,
}

/// Vertex/index buffers for one mesh, rebuilt in place on re-upload.
pub struct GpuMesh {
    label: String,
    vertex_buffers: Vec<(VertexAttribute, GpuBuffer)>,
    index_buffer: Option<GpuBuffer>,
    topology: Topology,
    vertex_count: u32,
    index_count: u32,
    draw_count: u32,
}

impl GpuMesh {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vertex_buffers: Vec::new(),
            index_buffer: None,
            topology: Topology::Triangles,
            vertex_count: 0,
            index_count: 0,
            draw_count: 0,
        }
    }

    /// Uploads `mesh` for the given attribute streams.
    ///
    /// Existing buffers are rewritten when the new contents fit and
    /// reallocated otherwise. All checks run before the first upload, so a
    /// failure leaves the previous buffers untouched.
    pub fn create_buffers(
        &mut self,
        ctx: &RenderCtx<'_>,
        mesh: &MeshData,
        attributes: &[VertexAttribute],
    ) -> Result<(), UploadError> {
        mesh.validate()?;

        let limit = ctx.max_buffer_size();
        let mut streams = Vec::with_capacity(attributes.len());
        for &attr in attributes {
            let data = attribute_data(mesh, attr).ok_or_else(|| UploadError::MissingAttribute {
                label: self.label.clone(),
                attribute: attr.name(),
            })?;
            self.check_size(std::mem::size_of_val(data) as u64, limit)?;
            streams.push((attr, data));
        }
        let indices = mesh.indices.as_deref().map(padded_indices);
        if let Some(indices) = &indices {
            self.check_size(std::mem::size_of_val(indices.as_slice()) as u64, limit)?;
        }

        let mut previous: Vec<(VertexAttribute, GpuBuffer)> = std::mem::take(&mut self.vertex_buffers);
        for (attr, data) in streams {
            let reuse = previous
                .iter()
                .position(|(a, _)| *a == attr)
                .map(|i| previous.swap_remove(i).1);
            let label = format!("{} {}", self.label, attr.name());
            let buffer = upload(
                ctx,
                reuse,
                &label,
                bytemuck::cast_slice(data),
                wgpu::BufferUsages::VERTEX,
            );
            self.vertex_buffers.push((attr, buffer));
        }
        for (_, stale) in previous {
            stale.buffer.destroy();
        }

        self.index_buffer = match indices {
            Some(indices) => Some(upload(
                ctx,
                self.index_buffer.take(),
                &format!("{} indices", self.label),
                bytemuck::cast_slice(&indices),
                wgpu::BufferUsages::INDEX,
            )),
            None => {
                if let Some(stale) = self.index_buffer.take() {
                    stale.buffer.destroy();
                }
                None
            }
        };

        self.topology = mesh.topology;
        self.vertex_count = mesh.vertex_count() as u32;
        self.index_count = mesh.indices.as_ref().map_or(0, |i| i.len() as u32);
        self.draw_count = mesh.draw_count;

        log::debug!(
            "{}: uploaded {} vertices, {} indices ({} bytes)",
            self.label,
            self.vertex_count,
            self.index_count,
            mesh.byte_size(),
        );
        Ok(())
    }

    /// Frees all GPU buffers. Calling it again is a no-op.
    pub fn release(&mut self) {
        if !self.is_ready() {
            return;
        }
        for (_, b) in self.vertex_buffers.drain(..) {
            b.buffer.destroy();
        }
        if let Some(b) = self.index_buffer.take() {
            b.buffer.destroy();
        }
        self.vertex_count = 0;
        self.index_count = 0;
        self.draw_count = 0;
        log::debug!("{}: released buffers", self.label);
    }

    pub fn is_ready(&self) -> bool {
        !self.vertex_buffers.is_empty()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_buffer(&self, attr: VertexAttribute) -> Option<wgpu::BufferSlice<'_>> {
        self.vertex_buffers
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, b)| b.buffer.slice(..b.len))
    }

    /// Index buffer slice limited to the real (unpadded) index count.
    pub fn index_buffer(&self) -> Option<wgpu::BufferSlice<'_>> {
        let b = self.index_buffer.as_ref()?;
        Some(b.buffer.slice(..self.index_count as u64 * std::mem::size_of::<u16>() as u64))
    }

    /// Count requested by the builder.
    pub fn requested_count(&self) -> u32 {
        self.draw_count
    }

    /// Elements that can actually be drawn from the uploaded buffers.
    pub fn drawable_count(&self) -> u32 {
        if self.index_buffer.is_some() { self.index_count } else { self.vertex_count }
    }

    /// Requested count clamped to what was uploaded.
    pub fn draw_count(&self) -> u32 {
        self.draw_count.min(self.drawable_count())
    }

    fn check_size(&self, bytes: u64, limit: u64) -> Result<(), UploadError> {
        if bytes > limit {
            return Err(UploadError::Allocation { label: self.label.clone(), bytes, limit });
        }
        Ok(())
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        self.release();
    }
}

// ── private helpers ───────────────────────────────────────────────────────

fn attribute_data(mesh: &MeshData, attr: VertexAttribute) -> Option<&[f32]> {
    match attr {
        VertexAttribute::Position => Some(&mesh.positions),
        VertexAttribute::Color => Some(&mesh.colors),
        VertexAttribute::Normal => mesh.normals.as_deref(),
        VertexAttribute::TexCoord => mesh.uvs.as_deref(),
    }
}

/// Pads to an even length so the byte size is a multiple of 4.
fn padded_indices(indices: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(indices.len() + 1);
    out.extend_from_slice(indices);
    if out.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn upload(
    ctx: &RenderCtx<'_>,
    existing: Option<GpuBuffer>,
    label: &str,
    bytes: &[u8],
    usage: wgpu::BufferUsages,
) -> GpuBuffer {
    let len = bytes.len() as u64;
    match existing {
        Some(b) if b.buffer.size() >= len && len > 0 => {
            ctx.queue.write_buffer(&b.buffer, 0, bytes);
            GpuBuffer { buffer: b.buffer, len }
        }
        stale => {
            if let Some(b) = stale {
                b.buffer.destroy();
            }
            let buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            });
            GpuBuffer { buffer, len }
        }
    }
}
