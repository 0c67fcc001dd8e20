use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::{
    CAMERA_AZIMUTH_DEG, CAMERA_DISTANCE, CAMERA_DRAG_SPEED, CAMERA_ELEVATION_DEG, CAMERA_FOV_DEG,
    CAMERA_ZOOM_SPEED,
};

/// Orbit camera looking at the centre of the plot box
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Plot y runs along world -z, so a plot azimuth of -60 deg is a yaw of +60 deg
        Self {
            yaw: -CAMERA_AZIMUTH_DEG.to_radians(),
            pitch: CAMERA_ELEVATION_DEG.to_radians(),
            distance: CAMERA_DISTANCE,
            fov_y: CAMERA_FOV_DEG.to_radians(),
            aspect: 1.6,
            z_near: 0.05,
            z_far: 50.0,
        }
    }
}

impl OrbitCamera {
    /// Left-drag rotates, scroll zooms; ignored while egui owns the pointer
    pub fn update_from_input(&mut self, ctx: &egui::Context, ui_hijacked: bool) {
        if ui_hijacked {
            return;
        }
        ctx.input(|i| {
            if i.pointer.button_down(egui::PointerButton::Primary) {
                let d = i.pointer.delta();
                self.rotate(d.x, d.y);
            }
            let scroll = i.smooth_scroll_delta.y;
            if scroll.abs() > 0.0 {
                self.zoom(scroll);
            }
        });
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * CAMERA_DRAG_SPEED;
        self.pitch += dy * CAMERA_DRAG_SPEED;
        let lim = core::f32::consts::FRAC_PI_2 - 0.017;
        self.pitch = self.pitch.clamp(-lim, lim);
    }

    pub fn zoom(&mut self, scroll: f32) {
        let factor = (-scroll * CAMERA_ZOOM_SPEED).exp();
        self.distance = (self.distance * factor).clamp(1.5, 10.0);
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.yaw.cos() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.sin() * self.pitch.cos(),
        )
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-3), self.z_near, self.z_far);
        proj * view
    }

    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        self.view_proj_matrix().to_cols_array_2d()
    }

    /// Light comes from over the camera's shoulder
    pub fn light_dir(&self) -> [f32; 3] {
        (self.eye().normalize() + Vec3::Y).normalize().to_array()
    }

    /// Project a world point to screen coordinates (origin top-left).
    ///
    /// Returns None for points behind the camera.
    pub fn project(&self, world: [f32; 3], screen_size: Vec2) -> Option<Vec2> {
        let clip = self.view_proj_matrix() * Vec4::new(world[0], world[1], world[2], 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * screen_size.x,
            (1.0 - ndc.y) * 0.5 * screen_size.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn wheel(delta: f32) -> egui::RawInput {
        egui::RawInput {
            events: vec![egui::Event::MouseWheel {
                unit: egui::MouseWheelUnit::Point,
                delta: egui::vec2(0.0, delta),
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_view_angle() {
        let cam = OrbitCamera::default();
        let eye = cam.eye();
        // Looking down from above, from plot +x / -y
        assert!(eye.y > 0.0);
        assert!(eye.x > 0.0);
        assert!(eye.z > 0.0);
        assert!((eye.length() - cam.distance).abs() < 1e-5);
    }

    #[test]
    fn test_origin_projects_to_centre() {
        let cam = OrbitCamera::default();
        let size = Vec2::new(800.0, 500.0);
        let p = cam.project([0.0, 0.0, 0.0], size).unwrap();
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let cam = OrbitCamera::default();
        let size = Vec2::new(800.0, 500.0);
        let low = cam.project([0.0, -0.5, 0.0], size).unwrap();
        let high = cam.project([0.0, 0.5, 0.0], size).unwrap();
        assert!(high.y < low.y);
    }

    #[test]
    fn test_behind_camera_is_hidden() {
        let cam = OrbitCamera::default();
        let behind = (cam.eye() * 2.0).to_array();
        assert!(cam.project(behind, Vec2::new(800.0, 500.0)).is_none());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 10_000.0);
        assert!(cam.pitch < core::f32::consts::FRAC_PI_2);
        cam.rotate(0.0, -20_000.0);
        assert!(cam.pitch > -core::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1e6);
        assert_eq!(cam.distance, 1.5);
        cam.zoom(-1e6);
        assert_eq!(cam.distance, 10.0);
    }

    #[test]
    fn test_scroll_zoom_spans_frames() {
        let ctx = egui::Context::default();
        let mut cam = OrbitCamera::default();
        let start = cam.distance;

        let output = ctx.run(wheel(200.0), |ctx| cam.update_from_input(ctx, false));
        let after_one = cam.distance;
        assert!(after_one < start);
        // The rest of the wheel arrives on later frames, which egui asks for
        assert_eq!(crate::ui::repaint_delay(&output), Some(Duration::ZERO));

        for _ in 0..120 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| cam.update_from_input(ctx, false));
        }
        let settled = start * (-200.0 * CAMERA_ZOOM_SPEED).exp();
        assert!(cam.distance < after_one - 0.1);
        assert!((cam.distance - settled).abs() < 0.01, "distance {}", cam.distance);
    }

    #[test]
    fn test_scroll_ignored_over_widgets() {
        let ctx = egui::Context::default();
        let mut cam = OrbitCamera::default();
        for _ in 0..30 {
            let _ = ctx.run(wheel(200.0), |ctx| cam.update_from_input(ctx, true));
        }
        assert_eq!(cam.distance, CAMERA_DISTANCE);
    }
}
