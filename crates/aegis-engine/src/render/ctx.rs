use crate::coords::Viewport;

/// Renderer-facing context (device/queue + surface format + viewport).
///
/// This is intentionally small and stable.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Format of `RenderTarget::display_view`; equals `surface_format` unless
    /// the surface is sRGB.
    pub display_format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        display_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            display_format,
            viewport,
        }
    }
}

/// Target for drawing (encoder + two views of the frame image).
///
/// The image is already cleared for the frame; depth targets are owned by
/// the renderers that need them. `color_view` encodes linear shader output
/// to sRGB on store, `display_view` stores and blends values as written.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub display_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(
        encoder: &'a mut wgpu::CommandEncoder,
        color_view: &'a wgpu::TextureView,
        display_view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            encoder,
            color_view,
            display_view,
        }
    }
}
