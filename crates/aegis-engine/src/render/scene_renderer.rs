use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Camera, PropList, Shield};

use super::depth::{ensure_depth_target, DepthTarget};
use super::{DepthCapture, DepthCaptureConfig, PropMeshes, PropsRenderer, ShadowMap, ShieldRenderer};

/// Runs the full frame: shadow bake (when stale), depth capture, lit props,
/// then the shield.
#[derive(Default)]
pub struct SceneRenderer {
    meshes: PropMeshes,
    shadow: ShadowMap,
    capture: DepthCapture,
    props: PropsRenderer,
    shield: ShieldRenderer,

    /// Depth attachment shared by the props and shield passes.
    scene_depth: Option<DepthTarget>,
}

impl SceneRenderer {
    pub fn new(config: DepthCaptureConfig) -> Self {
        Self {
            capture: DepthCapture::new(config),
            ..Default::default()
        }
    }

    /// Records every pass into `target.encoder`.
    ///
    /// The color target is expected to be cleared already.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &Camera,
        props: &PropList,
        shield: &Shield,
    ) {
        if !ctx.viewport.is_valid() {
            return;
        }

        self.meshes.sync(ctx, props);

        let (w, h) = ctx.viewport.physical_size();
        if ensure_depth_target(
            &mut self.scene_depth,
            ctx.device,
            (w.max(1), h.max(1)),
            wgpu::TextureUsages::empty(),
            "aegis scene depth",
        ) {
            log::debug!("SceneRenderer: scene depth resized to {w}x{h}");
        }

        self.shadow
            .bake(ctx, target, &self.meshes, &self.props.lighting);

        let view_proj = camera.view_proj(ctx.viewport.aspect());

        let Some(captured) = self.capture.capture(ctx, target, &self.meshes, view_proj) else {
            return;
        };
        let Some(scene_depth) = self.scene_depth.as_ref() else { return };

        self.props
            .render(ctx, target, &self.meshes, &self.shadow, scene_depth.view(), view_proj);
        self.shield
            .render(ctx, target, shield, camera, captured, scene_depth.view());
    }
}
