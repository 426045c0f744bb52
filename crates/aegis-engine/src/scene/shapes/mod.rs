//! Procedural meshes.
//!
//! Every generator emits counter-clockwise front faces seen from outside,
//! per-vertex normals, and `[0, 1]` uvs.

mod cuboid;
mod cylinder;
mod plane;
mod sphere;
mod torus;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex layout shared by every mesh renderer:
///
///  offset  0  position [f32; 3]  loc 0
///  offset 12  normal   [f32; 3]  loc 1
///  offset 24  uv       [f32; 2]  loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    #[inline]
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Indexed triangle list on the CPU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex::new(position, normal, uv));
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Pushes a quad spanned by `u` and `v` around `center`, facing `u x v`.
    fn push_quad(&mut self, center: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize();
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        let base = self.vertices.len() as u32;
        for (su, sv) in corners {
            self.push_vertex(
                center + u * su + v * sv,
                normal,
                [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
            );
        }
        self.push_triangle(base, base + 1, base + 2);
        self.push_triangle(base, base + 2, base + 3);
    }
}
