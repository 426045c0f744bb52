use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{create_ubo, mat4_cols};
use super::depth::{
    begin_depth_pass, camera_layout, depth_only_pipeline, CameraUniform, DepthTarget, TargetKey,
};
use super::PropMeshes;

/// Size policy of the captured depth texture.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CaptureResolution {
    /// Physical surface size. One depth texel per shield fragment.
    #[default]
    MatchViewport,
    /// Square `n x n` texture regardless of the surface size.
    Fixed(u32),
}

impl CaptureResolution {
    /// Texture size for `viewport`; never smaller than 1 x 1.
    pub fn texture_size(self, viewport: Viewport) -> (u32, u32) {
        match self {
            CaptureResolution::MatchViewport => {
                let (w, h) = viewport.physical_size();
                (w.max(1), h.max(1))
            }
            CaptureResolution::Fixed(n) => (n.max(1), n.max(1)),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DepthCaptureConfig {
    pub resolution: CaptureResolution,
}

/// Renders prop depth into a texture the shield shader can read.
///
/// The shield itself is never drawn here.
#[derive(Default)]
pub struct DepthCapture {
    config: DepthCaptureConfig,

    /// Allocation the next `prepare` must produce.
    reserved: Option<TargetKey>,
    target: Option<DepthTarget>,

    pipeline: Option<wgpu::RenderPipeline>,
    camera_bgl: Option<wgpu::BindGroupLayout>,
    camera_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,
}

impl DepthCapture {
    pub fn new(config: DepthCaptureConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Records the texture size `viewport` requires and returns the key the
    /// texture will carry. A size change bumps the generation.
    ///
    /// Touches no GPU state.
    pub fn reserve(&mut self, viewport: Viewport) -> TargetKey {
        let size = self.config.resolution.texture_size(viewport);
        let key = match TargetKey::next(self.reserved, size) {
            Some(next) => next,
            None => match self.reserved {
                Some(current) => current,
                None => TargetKey { size, generation: 0 },
            },
        };
        self.reserved = Some(key);
        key
    }

    /// Ensures the depth texture exists at the size the current viewport
    /// requires. Returns its key.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) -> TargetKey {
        let key = self.reserve(ctx.viewport);
        if self.target.as_ref().map(DepthTarget::key) != Some(key) {
            log::debug!(
                "DepthCapture: allocating {}x{} depth texture (generation {})",
                key.size.0,
                key.size.1,
                key.generation
            );
            self.target = Some(DepthTarget::new(
                ctx.device,
                key,
                wgpu::TextureUsages::TEXTURE_BINDING,
                "aegis captured depth",
            ));
        }
        key
    }

    /// Records the depth-only pass over every prop.
    ///
    /// Call after `PropMeshes::sync` for this frame. Returns the captured
    /// texture, valid until the next `prepare`.
    pub fn capture(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        meshes: &PropMeshes,
        view_proj: glam::Mat4,
    ) -> Option<&DepthTarget> {
        self.prepare(ctx);
        self.ensure_pipeline(ctx, meshes);
        self.ensure_bindings(ctx);

        if let Some(ubo) = self.camera_ubo.as_ref() {
            let u = CameraUniform {
                view_proj: mat4_cols(view_proj),
            };
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let depth = self.target.as_ref()?;
        let pipeline = self.pipeline.as_ref()?;
        let bind_group = self.camera_bind_group.as_ref()?;

        let mut rpass = begin_depth_pass(target.encoder, depth.view(), "aegis depth capture pass");

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        meshes.draw_all(&mut rpass);
        drop(rpass);

        Some(depth)
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, meshes: &PropMeshes) {
        if self.pipeline.is_some() {
            return;
        }
        let Some(object_bgl) = meshes.object_layout() else { return };

        let camera_bgl = camera_layout(ctx.device, "aegis depth capture camera bgl");
        let pipeline = depth_only_pipeline(
            ctx.device,
            "aegis depth capture pipeline",
            &camera_bgl,
            object_bgl,
            wgpu::DepthBiasState::default(),
        );

        self.pipeline = Some(pipeline);
        self.camera_bgl = Some(camera_bgl);
        self.camera_bind_group = None;
        self.camera_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bind_group.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.camera_bgl.as_ref() else { return };

        let ubo = create_ubo::<CameraUniform>(ctx.device, "aegis depth capture camera ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("aegis depth capture bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.camera_ubo = Some(ubo);
        self.camera_bind_group = Some(bind_group);
    }
}

impl std::fmt::Debug for DepthCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepthCapture")
            .field("config", &self.config)
            .field("reserved", &self.reserved)
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_viewport_uses_physical_size() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        assert_eq!(CaptureResolution::MatchViewport.texture_size(vp), (1600, 1200));
    }

    #[test]
    fn fixed_resolution_ignores_viewport() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        assert_eq!(CaptureResolution::Fixed(1024).texture_size(vp), (1024, 1024));
    }

    #[test]
    fn zero_sizes_clamp_to_one_texel() {
        assert_eq!(
            CaptureResolution::MatchViewport.texture_size(Viewport::default()),
            (1, 1)
        );
        assert_eq!(
            CaptureResolution::Fixed(0).texture_size(Viewport::default()),
            (1, 1)
        );
    }

    #[test]
    fn reserve_is_stable_until_size_changes() {
        let mut capture = DepthCapture::new(DepthCaptureConfig::default());
        let vp = Viewport::new(800.0, 600.0, 1.0);

        let first = capture.reserve(vp);
        assert_eq!(first, TargetKey { size: (800, 600), generation: 0 });
        assert_eq!(capture.reserve(vp), first);

        let resized = capture.reserve(Viewport::new(1024.0, 768.0, 2.0));
        assert_eq!(resized.size, (2048, 1536));
        assert_eq!(resized.generation, 1);
    }

    #[test]
    fn dpr_change_alone_reallocates() {
        let mut capture = DepthCapture::default();
        let a = capture.reserve(Viewport::new(800.0, 600.0, 1.0));
        let b = capture.reserve(Viewport::new(800.0, 600.0, 2.0));
        assert_ne!(a.generation, b.generation);
        assert_eq!(b.size, (1600, 1200));
    }

    #[test]
    fn fixed_resolution_survives_window_resize() {
        let mut capture = DepthCapture::new(DepthCaptureConfig {
            resolution: CaptureResolution::Fixed(1024),
        });
        let a = capture.reserve(Viewport::new(800.0, 600.0, 1.0));
        let b = capture.reserve(Viewport::new(1920.0, 1080.0, 1.0));
        assert_eq!(a, b);
    }
}
