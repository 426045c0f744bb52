use std::f32::consts::TAU;

use glam::Vec3;

use super::MeshData;

impl MeshData {
    /// Capped cylinder (or frustum) along Y, centered at the origin.
    ///
    /// A radius of zero collapses that end to a point and omits its cap.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let segments = radial_segments.max(3);
        let half = height * 0.5;
        let slope = (radius_bottom - radius_top) / height;
        let mut mesh = MeshData::default();

        let row = segments + 1;
        for iy in 0..=1u32 {
            let v = iy as f32;
            let radius = v * (radius_bottom - radius_top) + radius_top;
            for ix in 0..=segments {
                let u = ix as f32 / segments as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                mesh.push_vertex(
                    Vec3::new(radius * sin, half - v * height, radius * cos),
                    Vec3::new(sin, slope, cos).normalize(),
                    [u, 1.0 - v],
                );
            }
        }
        for ix in 0..segments {
            let a = ix;
            let b = row + ix;
            let c = row + ix + 1;
            let d = ix + 1;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }

        if radius_top > 0.0 {
            mesh.push_cap(radius_top, half, segments, true);
        }
        if radius_bottom > 0.0 {
            mesh.push_cap(radius_bottom, -half, segments, false);
        }

        mesh
    }

    /// Cone along Y with its apex at `+height / 2`.
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::cylinder(0.0, radius, height, radial_segments)
    }

    fn push_cap(&mut self, radius: f32, y: f32, segments: u32, top: bool) {
        let sign = if top { 1.0 } else { -1.0 };
        let normal = Vec3::new(0.0, sign, 0.0);

        let center = self.push_vertex(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
        let ring = self.vertices.len() as u32;
        for ix in 0..=segments {
            let (sin, cos) = (ix as f32 / segments as f32 * TAU).sin_cos();
            self.push_vertex(
                Vec3::new(radius * sin, y, radius * cos),
                normal,
                [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
            );
        }

        for ix in 0..segments {
            let i = ring + ix;
            if top {
                self.push_triangle(i, i + 1, center);
            } else {
                self.push_triangle(i + 1, i, center);
            }
        }
    }
}
