use glam::Vec3;

use super::MeshData;

impl MeshData {
    /// Axis-aligned box centered at the origin with hard per-face normals.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let mut mesh = MeshData::default();

        // (face center, u half-extent, v half-extent); u x v points outward.
        let faces = [
            (Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, 0.0, -h.z), Vec3::new(0.0, h.y, 0.0)),
            (Vec3::new(-h.x, 0.0, 0.0), Vec3::new(0.0, 0.0, h.z), Vec3::new(0.0, h.y, 0.0)),
            (Vec3::new(0.0, h.y, 0.0), Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, 0.0, -h.z)),
            (Vec3::new(0.0, -h.y, 0.0), Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, 0.0, h.z)),
            (Vec3::new(0.0, 0.0, h.z), Vec3::new(h.x, 0.0, 0.0), Vec3::new(0.0, h.y, 0.0)),
            (Vec3::new(0.0, 0.0, -h.z), Vec3::new(-h.x, 0.0, 0.0), Vec3::new(0.0, h.y, 0.0)),
        ];

        for (center, u, v) in faces {
            mesh.push_quad(center, u, v);
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_has_six_quads_within_bounds() {
        let m = MeshData::cuboid(Vec3::ONE);
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(m.triangle_count(), 12);
        for v in &m.vertices {
            assert!(v.position.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        }
    }
}
