use glam::{Mat4, Quat, Vec3};

/// World transform of a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Model matrix (local -> world).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Transpose of the inverse model matrix, for transforming normals under
    /// non-uniform scale.
    pub fn normal_matrix(&self) -> Mat4 {
        self.matrix().inverse().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0)
            .with_rotation(Quat::from_rotation_y(FRAC_PI_2))
            .with_scale(Vec3::splat(2.0));
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn quarter_turn_about_x_lays_plane_flat() {
        let t = Transform::default().with_rotation(Quat::from_rotation_x(-FRAC_PI_2));
        let n = t.normal_matrix().transform_vector3(Vec3::Z);
        assert!((n - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let t = Transform::default().with_scale(Vec3::new(4.0, 1.0, 1.0));
        let n = t.normal_matrix().transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        // A 45 degree normal on the unscaled surface leans towards +Y once x is stretched.
        assert!((n.x - 0.25).abs() < 1e-6);
        assert!((n.y - 1.0).abs() < 1e-6);
    }
}
