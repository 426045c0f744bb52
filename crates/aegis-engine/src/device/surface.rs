//! Surface capability selection.

const SRGB_PREFERENCE: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
];

/// Picks the swapchain format. `None` when the surface reports no formats.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(f) = SRGB_PREFERENCE.iter().find(|f| formats.contains(f)) {
            return Some(*f);
        }
    }
    formats.first().copied()
}

/// Format of the surface view that stores shader output without encoding.
///
/// For an sRGB swapchain this is its linear twin (`Bgra8UnormSrgb` ->
/// `Bgra8Unorm`); other formats are returned as is.
pub(crate) fn display_format(format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    format.remove_srgb_suffix()
}

/// Extra view formats the surface must be configured with so
/// [`display_format`] views can be created.
pub(crate) fn extra_view_formats(format: wgpu::TextureFormat) -> Vec<wgpu::TextureFormat> {
    let display = display_format(format);
    if display == format { vec![] } else { vec![display] }
}

/// `requested` if supported, else the first supported mode, else `Auto`.
pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn srgb_is_preferred_when_available() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn first_format_without_srgb_preference() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn srgb_surface_gets_unencoded_display_view() {
        assert_eq!(display_format(TextureFormat::Bgra8UnormSrgb), TextureFormat::Bgra8Unorm);
        assert_eq!(
            extra_view_formats(TextureFormat::Rgba8UnormSrgb),
            vec![TextureFormat::Rgba8Unorm]
        );
    }

    #[test]
    fn linear_surface_needs_no_extra_view() {
        assert_eq!(display_format(TextureFormat::Bgra8Unorm), TextureFormat::Bgra8Unorm);
        assert!(extra_view_formats(TextureFormat::Bgra8Unorm).is_empty());
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let supported = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }
}
