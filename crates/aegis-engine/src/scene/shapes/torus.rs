use std::f32::consts::TAU;

use glam::Vec3;

use super::MeshData;

impl MeshData {
    /// Torus in the XY plane around the Z axis.
    ///
    /// `radius` is the distance from the center to the middle of the tube.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let rs = radial_segments.max(3);
        let ts = tubular_segments.max(3);
        let mut mesh = MeshData::default();

        for j in 0..=rs {
            let v = j as f32 / rs as f32 * TAU;
            for i in 0..=ts {
                let u = i as f32 / ts as f32 * TAU;
                let ring = radius + tube * v.cos();
                let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                mesh.push_vertex(
                    position,
                    (position - center).normalize_or(Vec3::Z),
                    [i as f32 / ts as f32, j as f32 / rs as f32],
                );
            }
        }

        let row = ts + 1;
        for j in 1..=rs {
            for i in 1..=ts {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                mesh.push_triangle(a, b, d);
                mesh.push_triangle(b, c, d);
            }
        }

        mesh
    }
}
