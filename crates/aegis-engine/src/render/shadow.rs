//! Directional light shadow map.
//!
//! One fixed-size depth texture rendered from the light with an orthographic
//! camera. The map is baked: it is redrawn only when the props or the light
//! change, not every frame.

use glam::{Mat4, Vec3};

use crate::render::{RenderCtx, RenderTarget};

use super::common::{create_ubo, mat4_cols};
use super::depth::{
    begin_depth_pass, camera_layout, depth_only_pipeline, CameraUniform, DepthTarget, TargetKey,
};
use super::{Lighting, PropMeshes};

/// Edge length of the square shadow map, in texels.
pub const SHADOW_MAP_SIZE: u32 = 2048;

/// Hardware depth bias applied while rendering casters.
const CASTER_BIAS: wgpu::DepthBiasState = wgpu::DepthBiasState {
    constant: 2,
    slope_scale: 2.0,
    clamp: 0.0,
};

/// Orthographic volume the light renders, centered on the light's target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShadowCamera {
    /// Half width and half height of the volume.
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            half_extent: 5.0,
            near: 0.5,
            far: 500.0,
        }
    }
}

impl ShadowCamera {
    /// World -> light clip space, looking from the light towards the origin.
    pub fn view_proj(&self, lighting: &Lighting) -> Mat4 {
        // A light at the origin has no direction; treat it as overhead.
        let eye = if lighting.light_position.length_squared() > 0.0 {
            lighting.light_position
        } else {
            Vec3::Y
        };
        let up = if eye.normalize().cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, up);
        let h = self.half_extent;
        let proj = Mat4::orthographic_rh(-h, h, -h, h, self.near, self.far);
        proj * view
    }
}

/// Position of `world` in shadow map space: `xy` texture coordinates, `z`
/// depth. `None` outside the light volume, where surfaces count as lit.
///
/// Mirrors `shadow_factor` in `shaders/props.wgsl`.
pub fn shadow_coords(light_view_proj: Mat4, world: Vec3) -> Option<Vec3> {
    let ndc = light_view_proj.project_point3(world);
    let uv = glam::Vec2::new(ndc.x * 0.5 + 0.5, 0.5 - ndc.y * 0.5);
    let inside = (0.0..=1.0).contains(&uv.x)
        && (0.0..=1.0).contains(&uv.y)
        && (0.0..=1.0).contains(&ndc.z);
    inside.then(|| uv.extend(ndc.z))
}

/// What the current map contents were rendered from.
#[derive(Debug, Copy, Clone, PartialEq)]
struct BakeKey {
    props_revision: u64,
    light_position: Vec3,
    camera: ShadowCamera,
}

/// Owns the shadow map texture, its comparison sampler and the caster pass.
#[derive(Default)]
pub struct ShadowMap {
    pub camera: ShadowCamera,

    target: Option<DepthTarget>,
    sampler: Option<wgpu::Sampler>,

    pipeline: Option<wgpu::RenderPipeline>,
    camera_bgl: Option<wgpu::BindGroupLayout>,
    camera_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,

    baked: Option<BakeKey>,
    bakes: u64,
}

impl ShadowMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the map must be redrawn for these inputs.
    pub fn needs_bake(&self, props_revision: u64, lighting: &Lighting) -> bool {
        self.baked != Some(self.bake_key(props_revision, lighting))
    }

    /// Light clip transform the map was (or will be) rendered with.
    pub fn light_view_proj(&self, lighting: &Lighting) -> Mat4 {
        self.camera.view_proj(lighting)
    }

    /// Depth view for sampling. `None` until the first `bake`.
    #[inline]
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.target.as_ref().map(DepthTarget::view)
    }

    #[inline]
    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.sampler.as_ref()
    }

    /// Generation of the texture behind `view`.
    #[inline]
    pub fn generation(&self) -> Option<u64> {
        self.target.as_ref().map(DepthTarget::generation)
    }

    /// Renders the shadow casters from the light when the props or the light
    /// changed since the last bake. Call after `PropMeshes::sync`.
    ///
    /// Returns `true` when a pass was recorded.
    pub fn bake(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        meshes: &PropMeshes,
        lighting: &Lighting,
    ) -> bool {
        self.ensure_target(ctx);
        self.ensure_pipeline(ctx, meshes);
        self.ensure_bindings(ctx);

        let Some(revision) = meshes.synced_revision() else { return false };
        if !self.needs_bake(revision, lighting) {
            return false;
        }

        let Some(depth) = self.target.as_ref() else { return false };
        let Some(pipeline) = self.pipeline.as_ref() else { return false };
        let Some(bind_group) = self.camera_bind_group.as_ref() else { return false };
        let Some(ubo) = self.camera_ubo.as_ref() else { return false };

        let u = CameraUniform {
            view_proj: mat4_cols(self.camera.view_proj(lighting)),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));

        let mut rpass = begin_depth_pass(target.encoder, depth.view(), "aegis shadow pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        meshes.draw_shadow_casters(&mut rpass);
        drop(rpass);

        self.baked = Some(self.bake_key(revision, lighting));
        self.bakes += 1;
        log::debug!(
            "ShadowMap: bake #{} (props revision {revision}, light at {:?})",
            self.bakes,
            lighting.light_position
        );
        true
    }

    fn bake_key(&self, props_revision: u64, lighting: &Lighting) -> BakeKey {
        BakeKey {
            props_revision,
            light_position: lighting.light_position,
            camera: self.camera,
        }
    }

    fn ensure_target(&mut self, ctx: &RenderCtx<'_>) {
        if self.target.is_some() && self.sampler.is_some() {
            return;
        }
        let key = TargetKey {
            size: (SHADOW_MAP_SIZE, SHADOW_MAP_SIZE),
            generation: 0,
        };
        self.target = Some(DepthTarget::new(
            ctx.device,
            key,
            wgpu::TextureUsages::TEXTURE_BINDING,
            "aegis shadow map",
        ));
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("aegis shadow sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        }));
        self.baked = None;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, meshes: &PropMeshes) {
        if self.pipeline.is_some() {
            return;
        }
        let Some(object_bgl) = meshes.object_layout() else { return };

        let camera_bgl = camera_layout(ctx.device, "aegis shadow camera bgl");
        let pipeline = depth_only_pipeline(
            ctx.device,
            "aegis shadow pipeline",
            &camera_bgl,
            object_bgl,
            CASTER_BIAS,
        );

        self.pipeline = Some(pipeline);
        self.camera_bgl = Some(camera_bgl);
        self.camera_bind_group = None;
        self.camera_ubo = None;
        self.baked = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bind_group.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.camera_bgl.as_ref() else { return };

        let ubo = create_ubo::<CameraUniform>(ctx.device, "aegis shadow camera ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("aegis shadow camera bind group"),
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

impl std::fmt::Debug for ShadowMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowMap")
            .field("camera", &self.camera)
            .field("target", &self.target)
            .field("baked", &self.baked)
            .field("bakes", &self.bakes)
            .finish()
    }
}
