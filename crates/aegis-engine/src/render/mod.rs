//! GPU rendering subsystem.
//!
//! Per frame, in one command encoder:
//! 1. `ShadowMap` re-renders caster depth from the light, only when stale
//! 2. `DepthCapture` renders prop depth into a sampleable texture
//! 3. `PropsRenderer` draws the lit, shadowed props into the color + scene
//!    depth targets
//! 4. `ShieldRenderer` draws the translucent shield, reading the captured depth
//!
//! `SceneRenderer` wires them together. Each renderer owns its own GPU
//! resources (pipelines, buffers) and creates them lazily on first use.

mod common;
mod ctx;
mod depth;
mod depth_capture;
mod prop_meshes;
mod props;
mod scene_renderer;
mod shadow;
mod shield;
mod uniforms;

#[cfg(test)]
mod shader_tests;

pub use common::{GpuMesh, DEPTH_FORMAT};
pub use ctx::{RenderCtx, RenderTarget};
pub use depth::{DepthTarget, TargetKey};
pub use depth_capture::{CaptureResolution, DepthCapture, DepthCaptureConfig};
pub use prop_meshes::PropMeshes;
pub use props::{Lighting, PropsRenderer};
pub use scene_renderer::SceneRenderer;
pub use shadow::{shadow_coords, ShadowCamera, ShadowMap, SHADOW_MAP_SIZE};
pub use shield::ShieldRenderer;
pub use uniforms::{ShieldUniforms, UniformCache};
