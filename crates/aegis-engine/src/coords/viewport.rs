/// Viewport size in logical pixels plus the device pixel ratio.
///
/// GPU targets are always sized in physical pixels; use [`Viewport::physical_size`]
/// rather than rounding the logical size yourself.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scale_factor: 1.0,
        }
    }
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Builds a viewport from a physical size, as reported by the surface.
    #[inline]
    pub fn from_physical(width: u32, height: u32, scale_factor: f32) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(width as f32 / scale, height as f32 / scale, scale)
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.scale_factor > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Size in physical pixels (`logical x scale_factor`), rounded to the nearest texel.
    #[inline]
    pub fn physical_size(self) -> (u32, u32) {
        let w = (self.width * self.scale_factor).round().max(0.0) as u32;
        let h = (self.height * self.scale_factor).round().max(0.0) as u32;
        (w, h)
    }

    /// Width / height of the physical target. Returns 1.0 for a degenerate viewport.
    #[inline]
    pub fn aspect(self) -> f32 {
        let (w, h) = self.physical_size();
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_applies_scale_factor() {
        let vp = Viewport::new(800.0, 600.0, 2.0);
        assert_eq!(vp.physical_size(), (1600, 1200));
    }

    #[test]
    fn physical_size_rounds_fractional_ratio() {
        let vp = Viewport::new(801.0, 601.0, 1.5);
        assert_eq!(vp.physical_size(), (1202, 902));
    }

    #[test]
    fn from_physical_round_trips_through_physical_size() {
        let vp = Viewport::from_physical(2560, 1440, 2.0);
        assert_eq!(vp.width, 1280.0);
        assert_eq!(vp.physical_size(), (2560, 1440));
    }

    #[test]
    fn zero_size_is_invalid_and_has_unit_aspect() {
        let vp = Viewport::new(0.0, 600.0, 1.0);
        assert!(!vp.is_valid());
        assert_eq!(vp.aspect(), 1.0);
    }
}
