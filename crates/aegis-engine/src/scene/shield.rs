use crate::coords::ColorRgba;

use super::{MeshData, Transform};

/// Tunable shield parameters, as surfaced to a control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldParams {
    radius: f32,
    /// Exposed for tuning; the shading does not read it yet.
    pub color: ColorRgba,
}

impl ShieldParams {
    pub const MIN_RADIUS: f32 = 1.0;
    pub const MAX_RADIUS: f32 = 5.0;
    pub const DEFAULT_RADIUS: f32 = 3.0;

    pub fn new(radius: f32) -> Self {
        let mut p = Self::default();
        p.set_radius(radius);
        p
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Sets the radius, clamped to `[MIN_RADIUS, MAX_RADIUS]`. NaN falls back to the default.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = if radius.is_nan() {
            Self::DEFAULT_RADIUS
        } else {
            radius.clamp(Self::MIN_RADIUS, Self::MAX_RADIUS)
        };
    }
}

impl Default for ShieldParams {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            color: ColorRgba::white(),
        }
    }
}

/// The translucent sphere. Its transform is owned by whoever moves it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shield {
    pub params: ShieldParams,
    pub transform: Transform,
}

impl Shield {
    pub const WIDTH_SEGMENTS: u32 = 64;
    pub const HEIGHT_SEGMENTS: u32 = 64;

    pub fn new(params: ShieldParams) -> Self {
        Self {
            params,
            transform: Transform::default(),
        }
    }

    /// Tessellated sphere for the current radius.
    pub fn mesh(&self) -> MeshData {
        MeshData::sphere(self.params.radius(), Self::WIDTH_SEGMENTS, Self::HEIGHT_SEGMENTS)
    }
}

impl Default for Shield {
    fn default() -> Self {
        Self::new(ShieldParams::default())
    }
}
