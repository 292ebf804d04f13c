use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{AppControl, FrameCtx, SurfaceHost, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::render::RenderCtx;
use crate::time::{FrameClock, FrameTime};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "shapes".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `host` until it exits or the window closes.
    ///
    /// Callback order: `on_surface_created` and `on_surface_changed` once the
    /// GPU is ready, `on_surface_changed` on every resize, `on_input` per
    /// event and `on_draw_frame` per redraw. Redraws are continuous.
    pub fn run<H>(config: RuntimeConfig, gpu_init: GpuInit, host: H) -> Result<()>
    where
        H: SurfaceHost + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState { config, gpu_init, host, entry: None, failure: None };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<H: SurfaceHost> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    host: H,
    entry: Option<WindowEntry>,
    failure: Option<anyhow::Error>,
}

impl<H: SurfaceHost> RuntimeState<H> {
    fn create_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn surface_changed(&mut self, size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else { return };
        entry.with_gpu_mut(|gpu| gpu.resize(size));
        if size.width > 0 && size.height > 0 {
            self.host.on_surface_changed(size.width, size.height);
        }
        entry.with_window(|w| w.request_redraw());
    }

    fn draw_frame(&mut self) -> AppControl {
        let (host, entry) = (&mut self.host, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return AppControl::Continue };

        let mut control = AppControl::Continue;
        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();
            {
                let mut ctx = FrameCtx {
                    window: WindowCtx { id: fields.window.id(), window: fields.window },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time: ft,
                };
                control = host.on_draw_frame(&mut ctx);
            }
            fields.input_frame.clear();
        });
        control
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl<H: SurfaceHost> ApplicationHandler for RuntimeState<H> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let entry = match self.create_entry(event_loop) {
            Ok(e) => e,
            Err(e) => return self.fail(event_loop, e),
        };

        let size = entry.with_gpu(|gpu| {
            let ctx = RenderCtx::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                gpu.depth_format(),
            );
            self.host.on_surface_created(&ctx);
            gpu.size()
        });
        self.entry = Some(entry);
        self.surface_changed(size);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (host, entry) = (&mut self.host, &mut self.entry);
        let Some(entry) = entry.as_mut() else { return };

        let mut control = AppControl::Continue;
        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.window, fields.input_state, &event) {
                control = host.on_input(&ev);
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });
        if control == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => self.surface_changed(*size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.surface_changed(size);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.draw_frame() == AppControl::Exit {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
