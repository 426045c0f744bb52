use glam::{Mat4, Vec3};

use crate::coords::Viewport;
use crate::scene::{Camera, Transform};

use super::depth::TargetKey;

/// Everything the shield shader reads besides the depth texture itself.
///
/// A plain value: rebuilt whole whenever an input changes, never patched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShieldUniforms {
    /// Generation of the depth texture these values were built against.
    pub depth_generation: u64,
    /// Physical pixel size of the color target.
    pub resolution: [f32; 2],
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub view_proj: Mat4,
    pub model: Mat4,
    pub normal_matrix: Mat4,
}

impl ShieldUniforms {
    pub fn new(camera: &Camera, viewport: Viewport, depth: TargetKey, transform: &Transform) -> Self {
        let (w, h) = viewport.physical_size();
        Self {
            depth_generation: depth.generation,
            resolution: [w.max(1) as f32, h.max(1) as f32],
            near: camera.near,
            far: camera.far,
            camera_position: camera.eye,
            view_proj: camera.view_proj(viewport.aspect()),
            model: transform.matrix(),
            normal_matrix: transform.normal_matrix(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Inputs {
    camera: Camera,
    viewport: Viewport,
    depth: TargetKey,
    transform: Transform,
}

/// Holds the last `ShieldUniforms` and rebuilds it only when an input moved.
#[derive(Debug, Default)]
pub struct UniformCache {
    inputs: Option<Inputs>,
    current: Option<ShieldUniforms>,
    rebuilds: u64,
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the uniforms were rebuilt and need uploading.
    pub fn update(
        &mut self,
        camera: &Camera,
        viewport: Viewport,
        depth: TargetKey,
        transform: &Transform,
    ) -> bool {
        let inputs = Inputs {
            camera: *camera,
            viewport,
            depth,
            transform: *transform,
        };
        if self.inputs == Some(inputs) && self.current.is_some() {
            return false;
        }
        self.current = Some(ShieldUniforms::new(camera, viewport, depth, transform));
        self.inputs = Some(inputs);
        self.rebuilds += 1;
        true
    }

    #[inline]
    pub fn uniforms(&self) -> Option<&ShieldUniforms> {
        self.current.as_ref()
    }

    /// Number of times `update` produced a new value.
    #[inline]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Forces the next `update` to rebuild.
    pub fn invalidate(&mut self) {
        self.inputs = None;
    }
}
