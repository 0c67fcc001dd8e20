use std::time::Duration;

use egui::{Align2, Color32, FontId};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::config::{TICK_SPACING_MM, Z_LIMIT_MM};
use crate::controls::{ControlAction, Controller, PlayState};
use crate::gpu::{tick_positions, to_world, GpuContext, OrbitCamera};
use crate::viewer::Viewer;

/// egui context, winit glue and wgpu renderer for the control widgets
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(event_loop: &ActiveEventLoop, window: &Window, gpu: &GpuContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);
        Self { ctx, state, renderer }
    }

    /// Forward a window event; returns true when egui wants a repaint
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).repaint
    }

    /// Run one egui frame
    pub fn run(&mut self, window: &Window, build: impl FnMut(&egui::Context)) -> egui::FullOutput {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.run(raw_input, build)
    }

    /// Record the egui pass on top of the 3D scene.
    ///
    /// Returns command buffers that must be submitted before `encoder`.
    pub fn paint(
        &mut self,
        gpu: &GpuContext,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        output: egui::FullOutput,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }

        let paint_jobs = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: output.pixels_per_point,
        };
        let callbacks =
            self.renderer
                .update_buffers(&gpu.device, &gpu.queue, encoder, &paint_jobs, &screen);

        {
            let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut pass.forget_lifetime(), &paint_jobs, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        self.state
            .handle_platform_output(window, output.platform_output);

        callbacks
    }
}

/// How long egui wants to wait before running again; None when it is idle
pub fn repaint_delay(output: &egui::FullOutput) -> Option<Duration> {
    output
        .viewport_output
        .get(&egui::ViewportId::ROOT)
        .map(|viewport| viewport.repaint_delay)
        .filter(|delay| *delay != Duration::MAX)
}

/// Build the panels for this frame and collect what the user clicked.
///
/// Also feeds pointer input to the camera when no widget has it.
pub fn build(
    ctx: &egui::Context,
    controller: &Controller,
    viewer: &mut Viewer,
    impact_energy: f64,
) -> Vec<ControlAction> {
    let mut actions = Vec::new();
    let playing = controller.is_playing();

    egui::TopBottomPanel::top("title").show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(viewer.title());
        });
    });

    egui::TopBottomPanel::bottom("time-slider").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().slider_width = (ui.available_width() - 140.0).max(100.0);
            let mut t = controller.time();
            let slider = egui::Slider::new(&mut t, 0.0..=controller.max_time())
                .text("Time (s)")
                .fixed_decimals(2);
            if ui.add(slider).changed() {
                actions.push(ControlAction::Scrub(t));
            }
        });
    });

    egui::Window::new("Control Panel")
        .anchor(Align2::RIGHT_TOP, [-10.0, 48.0])
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                // Flips the play-state flag and nothing else
                if ui
                    .button("NO OP")
                    .on_hover_text("Toggle the play-state flag")
                    .clicked()
                {
                    actions.push(ControlAction::Toggle);
                }
                if ui.button("RESET").clicked() {
                    actions.push(ControlAction::Reset);
                }
                if ui.add_enabled(!playing, egui::Button::new("STEP -")).clicked() {
                    actions.push(ControlAction::StepBack);
                }
                if ui.add_enabled(!playing, egui::Button::new("STEP +")).clicked() {
                    actions.push(ControlAction::StepForward);
                }
            });
            ui.separator();
            let state = match (controller.play_state(), controller.is_auto_advancing()) {
                (PlayState::Playing, true) => "Playing (auto-advance)",
                (PlayState::Playing, false) => "Playing",
                (PlayState::Idle, _) => "Idle",
            };
            ui.label(format!("Play-state: {}", state));
            let stats = viewer.stats_mm();
            ui.label(format!("Height range: {:.2} .. {:.2} mm", stats.min, stats.max));
            ui.label(format!("Impact energy: {:.4} J", impact_energy));
        });

    let ui_hijacked = ctx.is_pointer_over_area() || ctx.is_using_pointer();
    viewer.camera.update_from_input(ctx, ui_hijacked);

    paint_axes(ctx, &viewer.camera, viewer.grid().radius);

    actions
}

/// Axis titles and tick values, projected onto the background layer
fn paint_axes(ctx: &egui::Context, camera: &OrbitCamera, radius: f64) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    let screen = ctx.screen_rect();
    let size = glam::Vec2::new(screen.width(), screen.height());
    let tick_color = Color32::from_gray(170);
    let title_color = Color32::from_gray(220);

    let label = |world: [f32; 3], text: String, color: Color32, font: FontId| {
        if let Some(p) = camera.project(world, size) {
            painter.text(
                egui::pos2(screen.min.x + p.x, screen.min.y + p.y),
                Align2::CENTER_CENTER,
                text,
                font,
                color,
            );
        }
    };

    let floor = -Z_LIMIT_MM;
    for t in tick_positions(radius) {
        let meters = format!("{:.0}", t as f64 * radius);
        label(to_world(t, -1.12, floor), meters.clone(), tick_color, FontId::proportional(11.0));
        label(to_world(1.12, t, floor), meters, tick_color, FontId::proportional(11.0));
    }

    let mut z = -Z_LIMIT_MM;
    while z <= Z_LIMIT_MM {
        label(
            to_world(-1.08, -1.08, z),
            format!("{:.0}", z),
            tick_color,
            FontId::proportional(11.0),
        );
        z += TICK_SPACING_MM;
    }

    label(to_world(0.0, -1.35, floor), "X (meters)".to_owned(), title_color, FontId::proportional(13.0));
    label(to_world(1.35, 0.0, floor), "Y (meters)".to_owned(), title_color, FontId::proportional(13.0));
    label(to_world(-1.25, -1.25, 0.0), "Wave Height (mm)".to_owned(), title_color, FontId::proportional(13.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{PondGrid, WaveParams};
    use egui::epaint::Shape;
    use egui::{Event, Modifiers, PointerButton, Pos2};

    struct Panels {
        ctx: egui::Context,
        controller: Controller,
        viewer: Viewer,
        last: Option<egui::FullOutput>,
    }

    impl Panels {
        fn new() -> Self {
            let mut panels = Self {
                ctx: egui::Context::default(),
                controller: Controller::default(),
                viewer: Viewer::new(PondGrid::new(500.0, 21), WaveParams::default()),
                last: None,
            };
            // Windows size themselves over the first frames
            for _ in 0..3 {
                panels.frame(Vec::new());
            }
            panels
        }

        fn frame(&mut self, events: Vec<Event>) -> Vec<ControlAction> {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(Pos2::ZERO, egui::vec2(1000.0, 700.0))),
                events,
                ..Default::default()
            };
            let (controller, viewer) = (&self.controller, &mut self.viewer);
            let mut actions = Vec::new();
            // A discarded pass is rerun, so only the last one counts
            let output = self.ctx.run(input, |ctx| {
                actions = build(ctx, controller, viewer, 0.0098);
            });
            self.last = Some(output);
            actions
        }

        /// Centre of the first text shape reading `label`
        fn locate(&self, label: &str) -> Pos2 {
            let output = self.last.as_ref().unwrap();
            output
                .shapes
                .iter()
                .find_map(|clipped| find_text(&clipped.shape, label))
                .unwrap_or_else(|| panic!("no text {label:?} on screen"))
        }

        fn click_at(&mut self, pos: Pos2) -> Vec<ControlAction> {
            let button = |pressed| Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Modifiers::NONE,
            };
            let mut actions = self.frame(vec![Event::PointerMoved(pos), button(true)]);
            actions.extend(self.frame(vec![button(false)]));
            actions.extend(self.frame(Vec::new()));
            actions
        }

        fn click(&mut self, label: &str) -> Vec<ControlAction> {
            let pos = self.locate(label);
            self.click_at(pos)
        }
    }

    fn find_text(shape: &Shape, label: &str) -> Option<Pos2> {
        match shape {
            Shape::Text(text) if text.galley.text() == label => {
                Some(text.galley.rect.translate(text.pos.to_vec2()).center())
            }
            Shape::Vec(shapes) => shapes.iter().find_map(|s| find_text(s, label)),
            _ => None,
        }
    }

    #[test]
    fn test_buttons_map_to_actions() {
        let mut panels = Panels::new();
        assert_eq!(panels.click("NO OP"), vec![ControlAction::Toggle]);
        assert_eq!(panels.click("RESET"), vec![ControlAction::Reset]);
        assert_eq!(panels.click("STEP +"), vec![ControlAction::StepForward]);
        assert_eq!(panels.click("STEP -"), vec![ControlAction::StepBack]);
    }

    #[test]
    fn test_step_buttons_disabled_while_playing() {
        let mut panels = Panels::new();
        panels.controller.toggle();
        panels.frame(Vec::new());

        assert!(panels.click("STEP +").is_empty());
        assert!(panels.click("STEP -").is_empty());
        // The toggle and reset stay live
        assert_eq!(panels.click("RESET"), vec![ControlAction::Reset]);
        assert_eq!(panels.click("NO OP"), vec![ControlAction::Toggle]);
    }

    #[test]
    fn test_slider_click_scrubs() {
        let mut panels = Panels::new();
        let label = panels.locate("Time (s)");
        let actions = panels.click_at(egui::pos2(200.0, label.y));
        assert!(!actions.is_empty());
        for action in actions {
            match action {
                ControlAction::Scrub(t) => assert!(t > 0.0 && t < 200.0, "t = {t}"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_idle_panels_do_not_repaint() {
        let mut panels = Panels::new();
        // Let window fade-in animations finish
        for _ in 0..120 {
            panels.frame(Vec::new());
        }
        assert_eq!(repaint_delay(panels.last.as_ref().unwrap()), None);
    }
}
