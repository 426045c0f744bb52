use glam::{Mat4, Vec3};

/// Perspective camera.
///
/// `near` and `far` feed both the projection and the shield's depth
/// linearization, so they must come from the same instance each frame.
/// `near >= far` is not rejected; depth linearization is undefined then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection with wgpu's `[0, 1]` clip depth.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Rotates the eye around `target` about the world Y axis.
    pub fn orbit_y(&mut self, angle_radians: f32) {
        let offset = self.eye - self.target;
        let rotated = glam::Quat::from_rotation_y(angle_radians) * offset;
        self.eye = self.target + rotated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let cam = Camera::default();
        let p = cam.view_proj(16.0 / 9.0).project_point3(cam.target);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z > 0.0 && p.z < 1.0);
    }

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let cam = Camera {
            near: 1.0,
            far: 10.0,
            ..Default::default()
        };
        let proj = cam.projection(1.0);
        assert!(proj.project_point3(Vec3::new(0.0, 0.0, -1.0)).z.abs() < 1e-6);
        assert!((proj.project_point3(Vec3::new(0.0, 0.0, -10.0)).z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut cam = Camera::default();
        let before = cam.eye.distance(cam.target);
        cam.orbit_y(1.3);
        assert!((cam.eye.distance(cam.target) - before).abs() < 1e-5);
        assert!((cam.eye.y - 5.0).abs() < 1e-5);
    }
}
