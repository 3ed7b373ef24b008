use glam::{Mat4, Vec3, Vec4};

/// Arc-ball camera orbiting the model origin
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 100.0,
            target: Vec3::ZERO,
            fov: 50.0_f32.to_radians(),
        }
    }
}

impl ArcBallCamera {
    /// Reset orientation and back off far enough to see a sphere of `radius`
    pub fn frame(&mut self, radius: f32) {
        *self = Self::default();
        let radius = radius.max(1e-3);
        self.distance = radius / (self.fov * 0.5).sin() * 1.1;
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).max(1e-3);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip); clip planes scale with distance
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.distance * 0.01, self.distance * 10.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to screen coords plus clip depth
    pub fn project(&self, vp: &Mat4, point: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
        let p = *vp * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some((egui::pos2(screen_x, screen_y), ndc.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_fits_radius() {
        let mut cam = ArcBallCamera::default();
        cam.rotate(40.0, 10.0);
        cam.frame(10.0);
        assert_eq!(cam.yaw, ArcBallCamera::default().yaw);
        assert!(cam.distance > 10.0);
        assert!((cam.eye_position().length() - cam.distance).abs() < 1e-3);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let cam = ArcBallCamera::default();
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
        let vp = cam.view_projection(rect.width() / rect.height());
        let (pos, depth) = cam.project(&vp, Vec3::ZERO, rect).unwrap();
        assert!((pos.x - 400.0).abs() < 1e-2);
        assert!((pos.y - 300.0).abs() < 1e-2);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = ArcBallCamera::default();
        cam.rotate(0.0, 10_000.0);
        assert!(cam.pitch <= 1.5);
    }
}
