use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window and GPU settings for [`Runtime::run`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "shortgpu".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.initial_size = LogicalSize::new(width, height);
        self
    }

    pub fn with_gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }
}

/// Drives one window and its surface, redrawing continuously.
pub struct Runtime;

impl Runtime {
    /// Opens the window, hands its GPU to [`App::on_gpu_ready`] and renders
    /// until the window closes or the app returns [`AppControl::Exit`].
    pub fn run<A: App + 'static>(config: RuntimeConfig, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = Session {
            config,
            app,
            surface: None,
        };
        event_loop
            .run_app(&mut state)
            .context("event loop terminated with error")?;
        Ok(())
    }
}

/// The window together with the GPU context that borrows it.
#[self_referencing]
struct Surface {
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Surface {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = config.gpu.clone();
        SurfaceTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |window| {
                pollster::block_on(Gpu::new(window, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    fn resize_to_window(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        self.with_mut(|fields| {
            fields.gpu.resize(size);
            // Keep the resize stall out of the next frame's dt.
            fields.clock.reset();
        });
        self.request_redraw();
    }
}

struct Session<A: App> {
    config: RuntimeConfig,
    app: A,
    surface: Option<Surface>,
}

impl<A: App> Session<A> {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let surface = Surface::open(event_loop, &self.config)?;
        surface
            .with_gpu(|gpu| self.app.on_gpu_ready(gpu))
            .context("application setup failed")?;

        log::debug!("window {:?} ready", surface.id());
        surface.request_redraw();
        self.surface = Some(surface);
        Ok(())
    }

    fn redraw(&mut self) -> AppControl {
        let Some(surface) = self.surface.as_mut() else {
            return AppControl::Continue;
        };
        let app = &mut self.app;
        surface.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time: fields.clock.tick(),
            };
            app.on_frame(&mut ctx)
        })
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(surface) = self.surface.take() {
            log::debug!("window {:?} closed", surface.id());
        }
        event_loop.exit();
    }
}

impl<A: App> ApplicationHandler for Session<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            log::error!("failed to open window: {e:#}");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(surface) = &self.surface {
            surface.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.surface.as_ref().map(Surface::id) != Some(window_id) {
            return;
        }
        if self.app.on_window_event(&event) == AppControl::Exit {
            self.close(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize_to_window();
                }
            }
            WindowEvent::RedrawRequested => {
                if self.redraw() == AppControl::Exit {
                    self.close(event_loop);
                }
            }
            _ => {}
        }
    }
}
