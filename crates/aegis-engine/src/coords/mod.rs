//! Coordinate and color types shared across the renderers.
//!
//! Canonical screen space:
//! - Logical pixels (DPI-aware) for window-facing sizes
//! - Physical pixels (logical x scale factor) for every GPU target
//!
//! World-space math uses `glam` directly.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
