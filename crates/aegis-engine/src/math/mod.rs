//! CPU-side math shared with the WGSL shaders.
//!
//! Everything here is pure and GPU-free so the shading response can be tested
//! and debugged without a device.

pub mod shading;

pub use shading::{
    ClipDepth, FragmentInput, BASE_TINT, FRESNEL_EXPONENT, INTERSECTION_THRESHOLD,
};
