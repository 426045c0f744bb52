use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::MeshData;

impl MeshData {
    /// UV sphere centered at the origin.
    ///
    /// Segment counts are clamped to at least 3 around and 2 from pole to pole.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut mesh = MeshData::default();
        let row = ws + 1;

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let dir = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                mesh.push_vertex(dir * radius, dir.normalize_or(Vec3::Y), [u, 1.0 - v]);
            }
        }

        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // Pole rows collapse to a point; skip their degenerate half.
                if iy != 0 {
                    mesh.push_triangle(a, b, d);
                }
                if iy != hs - 1 {
                    mesh.push_triangle(b, c, d);
                }
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_lie_on_radius() {
        let m = MeshData::sphere(3.0, 24, 12);
        for v in &m.vertices {
            let r = Vec3::from_array(v.position).length();
            assert!((r - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn triangle_count_skips_pole_degenerates() {
        let m = MeshData::sphere(1.0, 8, 4);
        // 2 triangles per cell, minus one per cell on each pole row.
        assert_eq!(m.triangle_count(), 8 * 4 * 2 - 8 * 2);
    }
}
