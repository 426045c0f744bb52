use bytemuck::{Pod, Zeroable};

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Camera, Shield};

use super::common::{alpha_blend, create_ubo, mat4_cols, ubo_min_binding_size, GpuMesh, DEPTH_FORMAT};
use super::depth::DepthTarget;
use super::uniforms::{ShieldUniforms, UniformCache};

/// Translucent shield renderer.
///
/// Reads the captured prop depth and brightens the surface where it nearly
/// touches other geometry. Must run after `DepthCapture::capture` in the
/// same encoder.
///
/// Draws into `RenderTarget::display_view`: the tint is a display value and
/// is blended over the stored pixels without sRGB encoding.
#[derive(Default)]
pub struct ShieldRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    /// Depth texture generation `bind_group` references.
    bind_group_generation: Option<u64>,
    ubo: Option<wgpu::Buffer>,

    mesh: Option<GpuMesh>,
    mesh_radius: Option<f32>,

    uniforms: UniformCache,
}

impl ShieldRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `shield` over the color target.
    ///
    /// `captured` is this frame's prop depth; `scene_depth` is the depth
    /// buffer the props pass wrote, used for the (read-only) depth test.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        shield: &Shield,
        camera: &Camera,
        captured: &DepthTarget,
        scene_depth: &wgpu::TextureView,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_mesh(ctx, shield);
        self.ensure_bindings(ctx, captured);

        if self
            .uniforms
            .update(camera, ctx.viewport, captured.key(), &shield.transform)
        {
            self.write_uniforms(ctx);
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(mesh) = self.mesh.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("aegis shield pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.display_view,
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
                    load: wgpu::LoadOp::Load,
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
        mesh.draw(&mut rpass);
    }

    fn write_uniforms(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.ubo.as_ref() else { return };
        let Some(u) = self.uniforms.uniforms() else { return };
        ctx.queue
            .write_buffer(ubo, 0, bytemuck::bytes_of(&ShieldUniformBlock::from(u)));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.display_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("aegis shield shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/shield.wgsl").into()),
        });

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("aegis shield bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: ubo_min_binding_size::<ShieldUniformBlock>(),
                        },
                        count: None,
                    },
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
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("aegis shield pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("aegis shield pipeline"),
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
                    format: ctx.display_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Both faces: the inside of the sphere shows where it cuts the ground.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.display_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);

        self.bind_group = None;
        self.bind_group_generation = None;
        self.ubo = None;
        self.uniforms.invalidate();
    }

    fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, shield: &Shield) {
        let radius = shield.params.radius();
        if self.mesh.is_some() && self.mesh_radius == Some(radius) {
            return;
        }
        self.mesh = Some(GpuMesh::upload(ctx.device, "aegis shield", &shield.mesh()));
        self.mesh_radius = Some(radius);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, captured: &DepthTarget) {
        if self.bind_group.is_some()
            && self.ubo.is_some()
            && self.bind_group_generation == Some(captured.generation())
        {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        if self.ubo.is_none() {
            self.ubo = Some(create_ubo::<ShieldUniformBlock>(ctx.device, "aegis shield ubo"));
            self.uniforms.invalidate();
        }
        let Some(ubo) = self.ubo.as_ref() else { return };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("aegis shield bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(captured.view()),
                },
            ],
        });

        self.bind_group = Some(bind_group);
        self.bind_group_generation = Some(captured.generation());
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ShieldUniformBlock {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    camera_position: [f32; 4],
    resolution: [f32; 2],
    near: f32,
    far: f32,
}

impl From<&ShieldUniforms> for ShieldUniformBlock {
    fn from(u: &ShieldUniforms) -> Self {
        let p = u.camera_position;
        Self {
            view_proj: mat4_cols(u.view_proj),
            model: mat4_cols(u.model),
            normal_matrix: mat4_cols(u.normal_matrix),
            camera_position: [p.x, p.y, p.z, 1.0],
            resolution: u.resolution,
            near: u.near,
            far: u.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::render::TargetKey;
    use crate::scene::Transform;

    #[test]
    fn uniform_block_matches_wgsl_layout() {
        // 3 x mat4x4 + vec4 + vec2 + f32 + f32
        assert_eq!(std::mem::size_of::<ShieldUniformBlock>(), 224);
    }

    #[test]
    fn uniform_block_copies_values() {
        let u = ShieldUniforms::new(
            &Camera::default(),
            Viewport::new(640.0, 480.0, 1.5),
            TargetKey { size: (960, 720), generation: 2 },
            &Transform::from_xyz(0.0, 1.0, 0.0),
        );
        let b = ShieldUniformBlock::from(&u);
        assert_eq!(b.resolution, [960.0, 720.0]);
        assert_eq!(b.near, 0.1);
        assert_eq!(b.far, 1000.0);
        assert_eq!(b.camera_position, [0.0, 5.0, 5.0, 1.0]);
        assert_eq!(b.model[3], [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn uniform_block_uses_transform_normal_matrix() {
        let t = Transform::from_xyz(0.0, 1.0, 0.0).with_scale(glam::Vec3::new(3.0, 1.0, 2.0));
        let u = ShieldUniforms::new(
            &Camera::default(),
            Viewport::new(640.0, 480.0, 1.0),
            TargetKey { size: (640, 480), generation: 0 },
            &t,
        );
        let b = ShieldUniformBlock::from(&u);
        assert_eq!(b.normal_matrix, mat4_cols(t.normal_matrix()));
        assert_ne!(b.normal_matrix, b.model);
    }
}
