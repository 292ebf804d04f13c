use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;
    if prefer_srgb {
        if let Some(srgb) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(srgb);
        }
    }
    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn map_surface_error(err: &wgpu::SurfaceError, size: PhysicalSize<u32>) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                SurfaceErrorAction::Reconfigured
            } else {
                SurfaceErrorAction::SkipFrame
            }
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_surface_reconfigures_only_with_area() {
        let err = wgpu::SurfaceError::Lost;
        assert_eq!(map_surface_error(&err, PhysicalSize::new(800, 600)), SurfaceErrorAction::Reconfigured);
        assert_eq!(map_surface_error(&err, PhysicalSize::new(0, 600)), SurfaceErrorAction::SkipFrame);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        let action = map_surface_error(&wgpu::SurfaceError::OutOfMemory, PhysicalSize::new(1, 1));
        assert!(action.is_fatal());
        assert!(!map_surface_error(&wgpu::SurfaceError::Timeout, PhysicalSize::new(1, 1)).is_fatal());
    }
}
