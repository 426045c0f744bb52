//! Depth textures that get reallocated, never resized in place, and the
//! depth-only pipeline that fills them.

use bytemuck::{Pod, Zeroable};

use super::common::{uniform_layout_entry, DEPTH_FORMAT};

/// Identity of one depth texture allocation.
///
/// `generation` increases by one on every reallocation, so anything bound to
/// an older texture (bind groups, cached uniforms) can tell it is stale.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TargetKey {
    pub size: (u32, u32),
    pub generation: u64,
}

impl TargetKey {
    /// Returns the key a reallocation at `size` would get, or `None` when the
    /// current allocation already has that size.
    pub fn next(current: Option<TargetKey>, size: (u32, u32)) -> Option<TargetKey> {
        match current {
            Some(key) if key.size == size => None,
            Some(key) => Some(TargetKey {
                size,
                generation: key.generation + 1,
            }),
            None => Some(TargetKey {
                size,
                generation: 0,
            }),
        }
    }
}

/// A `Depth32Float` texture plus its default view.
pub struct DepthTarget {
    // Kept alive for `view`.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    key: TargetKey,
}

impl DepthTarget {
    /// Allocates a depth texture for `key`.
    ///
    /// A zero dimension is clamped to 1; wgpu rejects empty textures.
    pub fn new(
        device: &wgpu::Device,
        key: TargetKey,
        usage: wgpu::TextureUsages,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: key.size.0.max(1),
                height: key.size.1.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: usage | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
            key,
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn key(&self) -> TargetKey {
        self.key
    }

    /// Size in texels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.key.size
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.key.generation
    }
}

impl std::fmt::Debug for DepthTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepthTarget").field("key", &self.key).finish()
    }
}

/// Keeps `slot` allocated at `size`, replacing it when the size changes.
///
/// Returns `true` when a new texture was allocated.
pub(super) fn ensure_depth_target(
    slot: &mut Option<DepthTarget>,
    device: &wgpu::Device,
    size: (u32, u32),
    usage: wgpu::TextureUsages,
    label: &str,
) -> bool {
    let Some(key) = TargetKey::next(slot.as_ref().map(DepthTarget::key), size) else {
        return false;
    };
    *slot = Some(DepthTarget::new(device, key, usage, label));
    true
}

/// Group-0 uniform of the depth-only shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

pub(super) fn camera_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[uniform_layout_entry::<CameraUniform>(
            0,
            wgpu::ShaderStages::VERTEX,
        )],
    })
}

/// Pipeline that writes prop depth and nothing else.
///
/// Group 0 is a [`CameraUniform`], group 1 the prop object uniform. Both
/// faces are drawn so single-sided props still occlude.
pub(super) fn depth_only_pipeline(
    device: &wgpu::Device,
    label: &str,
    camera_bgl: &wgpu::BindGroupLayout,
    object_bgl: &wgpu::BindGroupLayout,
    bias: wgpu::DepthBiasState,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/depth_only.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[camera_bgl, object_bgl],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[crate::scene::MeshVertex::layout()],
        },
        // Depth only.
        fragment: None,
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias,
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Clears `view` to the far plane and opens a pass that writes only depth.
pub(super) fn begin_depth_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    label: &str,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_allocation_starts_at_generation_zero() {
        let key = TargetKey::next(None, (640, 480)).unwrap();
        assert_eq!(key, TargetKey { size: (640, 480), generation: 0 });
    }

    #[test]
    fn same_size_keeps_allocation() {
        let key = TargetKey { size: (640, 480), generation: 3 };
        assert_eq!(TargetKey::next(Some(key), (640, 480)), None);
    }

    #[test]
    fn new_size_bumps_generation() {
        let key = TargetKey { size: (640, 480), generation: 3 };
        let next = TargetKey::next(Some(key), (1280, 960)).unwrap();
        assert_eq!(next.size, (1280, 960));
        assert_eq!(next.generation, 4);
    }

    #[test]
    fn camera_uniform_is_one_mat4() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
    }
}
