use glam::Vec3;

use super::MeshData;

impl MeshData {
    /// Single quad in the XY plane facing +Z.
    ///
    /// Rotate by -90 degrees about X to use it as a ground facing +Y.
    pub fn plane(width: f32, height: f32) -> Self {
        let mut mesh = MeshData::default();
        mesh.push_quad(
            Vec3::ZERO,
            Vec3::new(width * 0.5, 0.0, 0.0),
            Vec3::new(0.0, height * 0.5, 0.0),
        );
        mesh
    }
}
