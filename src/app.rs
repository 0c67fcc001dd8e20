use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{AUTO_ADVANCE_ON_START, GRAVITY, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::controls::Controller;
use crate::gpu::{GpuContext, SurfaceBuffers, SurfaceRenderer};
use crate::simulation::{Droplet, PondGrid, WaveParams};
use crate::ui::{self, Overlay};
use crate::viewer::Viewer;

/// GPU-side state, created once the window exists
struct Graphics {
    gpu: GpuContext,
    buffers: SurfaceBuffers,
    renderer: SurfaceRenderer,
    bind_group: wgpu::BindGroup,
    overlay: Overlay,
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    controller: Controller,
    viewer: Viewer,
    impact_energy: f64,
    /// When egui asked to be run again (smooth scrolling, tooltips)
    repaint_at: Option<Instant>,
    startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new() -> Self {
        log::info!("Generating pond grid...");
        let grid = PondGrid::new_default();
        log::info!("Grid: {}x{} samples over ±{} m", grid.x.len(), grid.y.len(), grid.radius);

        let params = WaveParams::default();
        log::info!(
            "Wave: amplitude {} m, wavelength {} m, period {:.1} s",
            params.amplitude,
            params.wave_length,
            params.period()
        );

        Self {
            window: None,
            graphics: None,
            controller: Controller::default(),
            viewer: Viewer::new(grid, params),
            impact_energy: Droplet::default().impact_energy(GRAVITY),
            repaint_at: None,
            startup_error: None,
        }
    }

    /// Surface any error that stopped initialization
    pub fn finish(self) -> Result<()> {
        match self.startup_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        log::info!("Initializing pond ripple viewer...");

        let window_attrs = Window::default_attributes()
            .with_title("Pond Ripple")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| anyhow!("Failed to create window: {e}"))?,
        );

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        log::info!("Creating surface buffers...");
        let buffers = SurfaceBuffers::new(&gpu.device, self.viewer.grid());

        log::info!("Creating render pipelines...");
        let renderer = SurfaceRenderer::new(&gpu.device, gpu.format());
        let bind_group = renderer.create_bind_group(&gpu.device, &buffers);

        let overlay = Overlay::new(event_loop, &window, &gpu);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Time slider: scrub through 0-{:.0} s", self.controller.max_time());
        log::info!("  RESET / STEP - / STEP +: control panel");
        log::info!("  Left drag: rotate, scroll: zoom");
        log::info!("  Escape: Quit");

        self.graphics = Some(Graphics {
            gpu,
            buffers,
            renderer,
            bind_group,
            overlay,
        });
        window.request_redraw();
        self.window = Some(window);

        // Show the first frame through the same path as any other time change
        self.controller.reset(&mut self.viewer);
        if AUTO_ADVANCE_ON_START {
            self.controller
                .start_auto_advance(Instant::now(), &mut self.viewer);
        }
        Ok(())
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(graphics)) = (self.window.as_ref(), self.graphics.as_mut()) else {
            return;
        };

        self.viewer.camera.aspect = graphics.gpu.aspect();

        let controller = &self.controller;
        let viewer = &mut self.viewer;
        let impact_energy = self.impact_energy;
        let mut actions = Vec::new();
        let output = graphics.overlay.run(window, |ctx| {
            actions = ui::build(ctx, controller, viewer, impact_energy);
        });
        self.repaint_at =
            ui::repaint_delay(&output).and_then(|delay| repaint_deadline(Instant::now(), delay));

        for action in &actions {
            self.controller.apply(*action, &mut self.viewer);
        }
        if !actions.is_empty() {
            // The panels were built with the previous time value
            window.request_redraw();
        }

        let gpu = &graphics.gpu;
        if self.viewer.take_dirty() {
            graphics.buffers.upload_samples(&gpu.queue, self.viewer.samples());
            window.set_title(&format!("Pond Ripple - t = {:.2} s", self.viewer.time()));
        }
        graphics.buffers.update_globals(
            &gpu.queue,
            self.viewer.camera.view_proj(),
            self.viewer.camera.light_dir(),
        );

        let frame = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure surface
                gpu.surface.configure(&gpu.device, &gpu.config);
                window.request_redraw();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting...");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // 1. Pond surface and axis frame
        graphics.renderer.draw(
            &mut encoder,
            &view,
            &gpu.depth_view,
            &graphics.bind_group,
            &graphics.buffers,
        );

        // 2. Panels on top
        let callbacks = graphics
            .overlay
            .paint(gpu, window, &mut encoder, &view, output);

        gpu.queue
            .submit(callbacks.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {e:#}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let repaint = match (self.window.as_ref(), self.graphics.as_mut()) {
            (Some(window), Some(graphics)) => graphics.overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed()
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    log::info!("Escape pressed, exiting...");
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(graphics) = &mut self.graphics {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    graphics.gpu.resize(new_size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.render(event_loop);
            }
            _ => {}
        }

        if repaint {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let mut redraw = self.controller.tick(now, &mut self.viewer);
        if self.repaint_at.is_some_and(|at| at <= now) {
            self.repaint_at = None;
            redraw = true;
        }
        if redraw {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        match earliest(self.controller.next_deadline(), self.repaint_at) {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

/// Absolute time of an egui repaint request; None if it is too far out to matter
fn repaint_deadline(now: Instant, delay: Duration) -> Option<Instant> {
    now.checked_add(delay)
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
