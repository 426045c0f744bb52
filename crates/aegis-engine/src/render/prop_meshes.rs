use bytemuck::{Pod, Zeroable};

use crate::render::RenderCtx;
use crate::scene::{Prop, PropList};

use super::common::{create_ubo, mat4_cols, uniform_layout_entry, GpuMesh};

/// GPU copies of every prop: mesh buffers plus a per-object uniform.
///
/// Shared by the shadow map, the depth capture and the lit color pass so each
/// prop is uploaded once. All three pipelines bind the object uniform at
/// group 1.
#[derive(Default)]
pub struct PropMeshes {
    object_bgl: Option<wgpu::BindGroupLayout>,
    entries: Vec<PropGpu>,
    synced_revision: Option<u64>,
}

struct PropGpu {
    mesh: GpuMesh,
    casts_shadow: bool,
    // Bound through `bind_group`.
    _ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PropMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings GPU state in line with `props`.
    ///
    /// Cheap when `props.revision()` has not changed since the last call.
    pub fn sync(&mut self, ctx: &RenderCtx<'_>, props: &PropList) {
        self.ensure_layout(ctx);
        if self.synced_revision == Some(props.revision()) {
            return;
        }
        let Some(bgl) = self.object_bgl.as_ref() else { return };

        // Meshes are small and edits rare; rebuild everything on change.
        self.entries = props
            .iter()
            .map(|prop| Self::upload(ctx, bgl, prop))
            .collect();
        self.synced_revision = Some(props.revision());

        log::debug!(
            "PropMeshes: uploaded {} props (revision {})",
            self.entries.len(),
            props.revision()
        );
    }

    /// Layout of the group-1 object uniform. `None` until the first `sync`.
    #[inline]
    pub fn object_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.object_bgl.as_ref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Revision of the `PropList` the GPU copies were built from.
    #[inline]
    pub fn synced_revision(&self) -> Option<u64> {
        self.synced_revision
    }

    /// Draws every prop. The caller has set the pipeline and group 0.
    pub fn draw_all(&self, rpass: &mut wgpu::RenderPass<'_>) {
        for entry in &self.entries {
            Self::draw_entry(rpass, entry);
        }
    }

    /// Draws the props flagged to cast shadows.
    pub fn draw_shadow_casters(&self, rpass: &mut wgpu::RenderPass<'_>) {
        for entry in self.entries.iter().filter(|e| e.casts_shadow) {
            Self::draw_entry(rpass, entry);
        }
    }

    fn draw_entry(rpass: &mut wgpu::RenderPass<'_>, entry: &PropGpu) {
        rpass.set_bind_group(1, &entry.bind_group, &[]);
        entry.mesh.draw(rpass);
    }

    fn ensure_layout(&mut self, ctx: &RenderCtx<'_>) {
        if self.object_bgl.is_some() {
            return;
        }
        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("aegis object bgl"),
                entries: &[uniform_layout_entry::<ObjectUniform>(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        self.object_bgl = Some(bgl);
        self.entries.clear();
        self.synced_revision = None;
    }

    fn upload(ctx: &RenderCtx<'_>, bgl: &wgpu::BindGroupLayout, prop: &Prop) -> PropGpu {
        let label = format!("aegis prop {}", prop.name);
        let mesh = GpuMesh::upload(ctx.device, &label, &prop.mesh);

        let ubo = create_ubo::<ObjectUniform>(ctx.device, &format!("{label} ubo"));
        ctx.queue
            .write_buffer(&ubo, 0, bytemuck::bytes_of(&ObjectUniform::from_prop(prop)));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} bind group")),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        PropGpu {
            mesh,
            casts_shadow: prop.shadows.cast,
            _ubo: ubo,
            bind_group,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    /// x: 1 when the prop receives shadows.
    params: [f32; 4],
}

impl ObjectUniform {
    fn from_prop(prop: &Prop) -> Self {
        let receive = if prop.shadows.receive { 1.0 } else { 0.0 };
        Self {
            model: mat4_cols(prop.transform.matrix()),
            normal_matrix: mat4_cols(prop.transform.normal_matrix()),
            color: prop.color.to_array(),
            params: [receive, 0.0, 0.0, 0.0],
        }
    }
}

impl std::fmt::Debug for PropMeshes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropMeshes")
            .field("len", &self.entries.len())
            .field("synced_revision", &self.synced_revision)
            .finish()
    }
}
