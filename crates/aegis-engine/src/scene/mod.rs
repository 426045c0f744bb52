//! Scene description types.
//!
//! Responsibilities:
//! - camera and world transforms
//! - CPU mesh generation (one file per primitive under `scene::shapes`)
//! - the prop list that feeds both the depth capture and the lit pass
//! - shield parameters
//!
//! Nothing here touches the GPU.

mod camera;
mod list;
mod shield;
mod transform;

pub mod shapes;

pub use camera::Camera;
pub use list::{reference_props, Prop, PropId, PropList, ShadowFlags, GROUND_Y};
pub use shapes::{MeshData, MeshVertex};
pub use shield::{Shield, ShieldParams};
pub use transform::Transform;
