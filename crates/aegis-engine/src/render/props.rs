use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::render::{RenderCtx, RenderTarget};

use super::common::{create_ubo, mat4_cols, uniform_layout_entry, DEPTH_FORMAT};
use super::{PropMeshes, ShadowMap};

/// Ambient term plus one directional light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    /// Light position; the light shines from here towards the origin.
    pub light_position: Vec3,
    pub light_intensity: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            light_position: Vec3::new(2.0, 2.0, 2.0),
            light_intensity: 1.0,
        }
    }
}

impl Lighting {
    /// Unit vector from a surface towards the light. Zero for a light at the origin.
    pub fn direction_to_light(&self) -> Vec3 {
        self.light_position.normalize_or_zero()
    }
}

/// Lambert-shaded opaque props.
///
/// Draws into the frame's color target (loaded) and the scene depth buffer
/// (cleared), which the shield pass then depth-tests against. Receivers
/// lose the diffuse term where the baked shadow map blocks the light.
#[derive(Default)]
pub struct PropsRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    frame_bgl: Option<wgpu::BindGroupLayout>,
    frame_bind_group: Option<wgpu::BindGroup>,
    /// Shadow map generation `frame_bind_group` references.
    frame_shadow_generation: Option<u64>,
    frame_ubo: Option<wgpu::Buffer>,

    pub lighting: Lighting,
}

impl PropsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        meshes: &PropMeshes,
        shadow: &ShadowMap,
        scene_depth: &wgpu::TextureView,
        view_proj: Mat4,
    ) {
        self.ensure_pipeline(ctx, meshes);
        self.ensure_bindings(ctx, shadow);

        if let Some(ubo) = self.frame_ubo.as_ref() {
            let light_view_proj = shadow.light_view_proj(&self.lighting);
            let u = FrameUniform::new(view_proj, light_view_proj, &self.lighting);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.frame_bind_group.as_ref() else { return };

        // Even with no props the pass runs so the scene depth is cleared.
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("aegis props pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: scene_depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        meshes.draw_all(&mut rpass);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, meshes: &PropMeshes) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(object_bgl) = meshes.object_layout() else { return };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("aegis props shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/props.wgsl").into()),
        });

        let frame_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("aegis props frame bgl"),
                entries: &[
                    uniform_layout_entry::<FrameUniform>(
                        0,
                        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("aegis props pipeline layout"),
                bind_group_layouts: &[&frame_bgl, object_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("aegis props pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[crate::scene::MeshVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The ground plane is single-sided and viewed from above only.
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.frame_bgl = Some(frame_bgl);

        self.frame_bind_group = None;
        self.frame_shadow_generation = None;
        self.frame_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, shadow: &ShadowMap) {
        if self.frame_bind_group.is_some()
            && self.frame_ubo.is_some()
            && self.frame_shadow_generation == shadow.generation()
        {
            return;
        }
        let Some(bgl) = self.frame_bgl.as_ref() else { return };
        let Some(shadow_view) = shadow.view() else { return };
        let Some(shadow_sampler) = shadow.sampler() else { return };

        if self.frame_ubo.is_none() {
            self.frame_ubo = Some(create_ubo::<FrameUniform>(ctx.device, "aegis props frame ubo"));
        }
        let Some(ubo) = self.frame_ubo.as_ref() else { return };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("aegis props frame bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(shadow_sampler),
                },
            ],
        });

        self.frame_bind_group = Some(bind_group);
        self.frame_shadow_generation = shadow.generation();
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    /// World -> shadow map clip space.
    light_view_proj: [[f32; 4]; 4],
    /// xyz: direction to the light, w: intensity.
    light: [f32; 4],
    /// x: ambient intensity.
    ambient: [f32; 4],
}

impl FrameUniform {
    fn new(view_proj: Mat4, light_view_proj: Mat4, lighting: &Lighting) -> Self {
        let dir = lighting.direction_to_light();
        Self {
            view_proj: mat4_cols(view_proj),
            light_view_proj: mat4_cols(light_view_proj),
            light: [dir.x, dir.y, dir.z, lighting.light_intensity],
            ambient: [lighting.ambient, 0.0, 0.0, 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ShadowCamera;

    #[test]
    fn frame_uniform_matches_wgsl_layout() {
        // 2 x mat4x4 + 2 x vec4
        assert_eq!(std::mem::size_of::<FrameUniform>(), 160);
    }

    #[test]
    fn default_light_points_down_the_diagonal() {
        let d = Lighting::default().direction_to_light();
        let k = 1.0 / 3f32.sqrt();
        assert!((d - Vec3::splat(k)).length() < 1e-6);
    }

    #[test]
    fn frame_uniform_packs_lighting() {
        let shadow = ShadowMap::new();
        let lighting = Lighting::default();
        let u = FrameUniform::new(Mat4::IDENTITY, shadow.light_view_proj(&lighting), &lighting);
        assert_eq!(u.light[3], 1.0);
        assert_eq!(u.ambient[0], 0.5);
        assert_eq!(u.view_proj, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(
            u.light_view_proj,
            ShadowCamera::default().view_proj(&lighting).to_cols_array_2d()
        );
    }
}
