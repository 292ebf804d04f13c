use crate::input::InputEvent;
use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by host callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Render-loop contract driven by the runtime.
///
/// All callbacks run on the render thread, the only thread that touches the GPU.
pub trait SurfaceHost {
    /// Called once after the GPU and surface exist.
    fn on_surface_created(&mut self, ctx: &RenderCtx<'_>);

    /// Called after creation and on every drawable size change, in physical pixels.
    fn on_surface_changed(&mut self, width: u32, height: u32);

    /// Called for every translated input event, before the next frame.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_draw_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
