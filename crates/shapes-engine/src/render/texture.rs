//! Texture provider: decodes images with the `image` crate and uploads them
//! as sampled RGBA textures.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{Rgba, RgbaImage};
use thiserror::Error;

use super::RenderCtx;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image is empty")]
    Empty,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A sampled 2D texture with its view and sampler.
pub struct Texture {
    id: u64,
    label: String,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    pub fn from_path(ctx: &RenderCtx<'_>, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(ctx, &bytes, &path.display().to_string())
    }

    /// Decodes an encoded image (PNG) and uploads it.
    pub fn from_bytes(ctx: &RenderCtx<'_>, bytes: &[u8], label: &str) -> Result<Self, TextureError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_image(ctx, &image, label)
    }

    pub fn from_image(ctx: &RenderCtx<'_>, image: &RgbaImage, label: &str) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::debug!("uploaded texture `{label}` {width}x{height}");
        Ok(Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            label: label.to_string(),
            texture,
            view,
            sampler,
        })
    }

    /// Procedural fallback used when no image is supplied or decoding fails.
    pub fn checkerboard(ctx: &RenderCtx<'_>) -> Result<Self, TextureError> {
        Self::from_image(ctx, &checkerboard_image(256, 8), "checkerboard")
    }

    /// Process-unique id, used to tell when a cached bind group is stale.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> (u32, u32) {
        let size = self.texture.size();
        (size.width, size.height)
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

const LIGHT: Rgba<u8> = Rgba([235, 235, 235, 255]);
const DARK: Rgba<u8> = Rgba([60, 60, 70, 255]);

/// Square two-tone checkerboard with `cells` squares per side.
pub fn checkerboard_image(size: u32, cells: u32) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { LIGHT } else { DARK }
    })
}
