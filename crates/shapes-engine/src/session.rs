//! The viewer session: one shape, one camera, one window.
//!
//! The session asks the scheduler for its shape when the surface appears,
//! uploads it on the render thread once it arrives, and draws it every
//! frame with the transforms of that frame. Until then (or after a failure)
//! frames are presented with only the clear color.

use std::f32::consts::TAU;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{ShapeKind, ShapeSpec};
use crate::core::{AppControl, FrameCtx, SurfaceHost};
use crate::geometry::HeightSample;
use crate::input::{InputEvent, Key, PointerTracker, RotationDelta, RotationInput};
use crate::render::{RenderCtx, Shape, Texture};
use crate::scheduler::{Notice, NoticeSender, Scheduler, SchedulerError};
use crate::time::FrameRate;
use crate::transform::TransformPipeline;

/// Degrees added per arrow key press.
pub const ARROW_STEP: f32 = 5.0;
/// Samples injected per Space press on a height grid.
pub const SAMPLES_PER_BATCH: usize = 16;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub spec: ShapeSpec,
    /// Image for textured shapes; a checkerboard is used when absent or unreadable.
    pub texture_path: Option<PathBuf>,
    /// Divisor applied to pointer deltas in logical pixels.
    pub density: f32,
    pub clear_color: wgpu::Color,
    pub notices: NoticeSender,
}

impl SessionConfig {
    pub fn new(spec: ShapeSpec) -> Self {
        Self {
            spec,
            texture_path: None,
            density: 1.0,
            clear_color: wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 },
            notices: NoticeSender::disabled(),
        }
    }
}

pub struct ShapeSession {
    pending: Option<ShapeSpec>,
    texture_path: Option<PathBuf>,
    clear_color: wgpu::Color,
    notices: NoticeSender,

    scheduler: Scheduler,
    transforms: TransformPipeline,
    rotation: Arc<RotationInput>,
    pointer: PointerTracker,

    shape: Option<Shape>,
    texture: Option<Texture>,
    title_shown: bool,

    queued_batches: u32,
    injected_batches: u32,
    frame_rate: FrameRate,
}

impl ShapeSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            pending: Some(config.spec),
            texture_path: config.texture_path,
            clear_color: config.clear_color,
            scheduler: Scheduler::new(config.notices.clone()),
            notices: config.notices,
            transforms: TransformPipeline::new(),
            rotation: Arc::new(RotationInput::new()),
            pointer: PointerTracker::new(config.density),
            shape: None,
            texture: None,
            title_shown: false,
            queued_batches: 0,
            injected_batches: 0,
            frame_rate: FrameRate::default(),
        }
    }

    /// Shared rotation accumulator; any thread may add to it.
    pub fn rotation_input(&self) -> Arc<RotationInput> {
        Arc::clone(&self.rotation)
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    pub fn transforms(&self) -> &TransformPipeline {
        &self.transforms
    }

    fn submit_pending(&mut self) {
        let Some(spec) = self.pending.take() else { return };
        let kind = spec.kind();
        match self.scheduler.submit(spec.clone()) {
            Ok(_) => log::info!("generating {kind}"),
            Err(SchedulerError::Busy) => self.pending = Some(spec),
            Err(e @ SchedulerError::WorkerUnavailable(_)) => {
                log::error!("cannot generate {kind}: {e}");
                self.notices.post(Notice::GenerationFailed {
                    what: kind.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    fn load_texture(&mut self, ctx: &RenderCtx<'_>) {
        if let Some(path) = &self.texture_path {
            match Texture::from_path(ctx, path) {
                Ok(t) => {
                    self.texture = Some(t);
                    return;
                }
                Err(e) => log::warn!("{e}; using checkerboard"),
            }
        }
        match Texture::checkerboard(ctx) {
            Ok(t) => self.texture = Some(t),
            Err(e) => log::error!("checkerboard texture: {e}"),
        }
    }

    /// Uploads a freshly generated shape; on failure the session stays empty.
    fn accept(&mut self, ctx: &RenderCtx<'_>, mut shape: Shape) {
        let kind = shape.kind();
        match shape.create_buffers(ctx) {
            Ok(()) => {
                log::info!("showing {kind} ({} vertices)", shape.mesh_data().vertex_count());
                self.shape = Some(shape);
            }
            Err(e) if e.is_allocation() => {
                log::error!("{kind}: {e}");
                self.scheduler.relieve_memory_pressure();
                self.notices.post(Notice::OutOfMemory { what: kind.name().to_string() });
            }
            Err(e) => {
                log::error!("{kind}: {e}");
                self.notices.post(Notice::GenerationFailed {
                    what: kind.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Queues height injection batches; ignored unless a height grid is shown.
    fn queue_batches(&mut self, batches: u32) {
        if batches == 0 {
            return;
        }
        match self.shape.as_ref().map(Shape::kind) {
            Some(ShapeKind::HeightGrid) => self.queued_batches += batches,
            _ => log::debug!("no height grid to inject into"),
        }
    }

    fn inject_queued(&mut self, ctx: &RenderCtx<'_>) {
        let Some(shape) = self.shape.as_mut() else { return };
        while self.injected_batches < self.queued_batches {
            let samples = height_samples(self.injected_batches, SAMPLES_PER_BATCH);
            self.injected_batches += 1;
            if shape.inject_heights(&samples) == 0 {
                continue;
            }
            if let Err(e) = shape.create_buffers(ctx) {
                log::error!("re-upload after injection failed: {e}");
            }
        }
    }
}

impl SurfaceHost for ShapeSession {
    fn on_surface_created(&mut self, ctx: &RenderCtx<'_>) {
        self.transforms.surface_created();
        self.load_texture(ctx);
        self.submit_pending();
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.transforms.surface_resized(width, height);
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        if let Some(delta) = self.pointer.handle(event) {
            self.rotation.add(delta);
        }

        if event.is_key_press(Key::Escape) {
            return AppControl::Exit;
        } else if event.is_key_press(Key::ArrowLeft) {
            self.rotation.add(RotationDelta { yaw: -ARROW_STEP, pitch: 0.0 });
        } else if event.is_key_press(Key::ArrowRight) {
            self.rotation.add(RotationDelta { yaw: ARROW_STEP, pitch: 0.0 });
        } else if event.is_key_press(Key::ArrowUp) {
            self.rotation.add(RotationDelta { yaw: 0.0, pitch: -ARROW_STEP });
        } else if event.is_key_press(Key::ArrowDown) {
            self.rotation.add(RotationDelta { yaw: 0.0, pitch: ARROW_STEP });
        }
        AppControl::Continue
    }

    fn on_draw_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.submit_pending();
        self.queue_batches(ctx.input_frame.presses(Key::Space));

        {
            let rctx = ctx.render_ctx();
            if let Some(done) = self.scheduler.poll() {
                if let Ok(geometry) = done.result {
                    self.accept(&rctx, Shape::new(geometry));
                }
            }
            self.inject_queued(&rctx);
        }

        if !self.title_shown {
            if let Some(shape) = &self.shape {
                ctx.window.set_title(shape.kind().title());
                self.title_shown = true;
            }
        }

        let transforms = self.transforms.frame(self.rotation.take());
        if let Some(fps) = self.frame_rate.record(&ctx.time) {
            log::debug!("{fps:.1} fps (frame {})", ctx.time.frame_index);
        }

        let (shape, texture) = (&mut self.shape, &self.texture);
        ctx.render(self.clear_color, |rctx, target| {
            if let Some(shape) = shape.as_mut() {
                shape.render(rctx, target, &transforms, texture.as_ref());
            }
        })
    }
}

/// Deterministic batch of samples on a circle inside the unit square.
///
/// Successive batches rotate the circle so repeated presses raise
/// different vertices.
pub fn height_samples(batch: u32, count: usize) -> Vec<HeightSample> {
    let phase = batch as f32 * 0.7;
    (0..count)
        .map(|i| {
            let t = phase + i as f32 * TAU / count.max(1) as f32;
            HeightSample::new(
                0.5 + 0.4 * t.cos(),
                0.2 + 0.1 * (3.0 * t).sin(),
                0.5 + 0.4 * t.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent};

    fn session() -> ShapeSession {
        ShapeSession::new(SessionConfig::new(ShapeSpec::demo(ShapeKind::Points)))
    }

    fn key(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed, repeat: false }
    }

    #[test]
    fn escape_exits() {
        let mut s = session();
        assert_eq!(s.on_input(&key(Key::Enter)), AppControl::Continue);
        assert_eq!(s.on_input(&key(Key::Escape)), AppControl::Exit);
    }

    #[test]
    fn drags_and_arrows_feed_the_rotation_input() {
        let mut s = session();
        let rotation = s.rotation_input();

        s.on_input(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 0.0,
            y: 0.0,
        }));
        s.on_input(&InputEvent::PointerMoved(PointerMoveEvent { x: 10.0, y: -4.0 }));
        s.on_input(&key(Key::ArrowRight));

        assert_eq!(rotation.take(), RotationDelta { yaw: 5.0 + ARROW_STEP, pitch: -2.0 });
    }

    #[test]
    fn batches_need_a_height_grid() {
        let mut s = session();
        s.queue_batches(2);
        assert_eq!(s.queued_batches, 0);
        assert_eq!(s.injected_batches, 0);
    }

    #[test]
    fn resize_reaches_the_transform_pipeline() {
        let mut s = session();
        let before = s.transforms().projection();
        s.on_surface_changed(800, 400);
        assert_ne!(s.transforms().projection(), before);
    }

    #[test]
    fn sample_batches_are_deterministic_and_in_range() {
        let a = height_samples(3, SAMPLES_PER_BATCH);
        assert_eq!(a, height_samples(3, SAMPLES_PER_BATCH));
        assert_ne!(a, height_samples(4, SAMPLES_PER_BATCH));
        assert_eq!(a.len(), SAMPLES_PER_BATCH);
        for s in &a {
            assert!((0.0..=1.0).contains(&s.x) && (0.0..=1.0).contains(&s.z));
        }
    }
}
