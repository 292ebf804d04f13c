/// An acquired swapchain image plus the encoder that records into it.
///
/// Submit it before acquiring the next one; the surface hands out one
/// image at a time.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
