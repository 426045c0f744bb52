use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use crate::coords::ColorRgba;

use super::{MeshData, Transform};

/// Stable handle to a prop inside a [`PropList`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PropId(pub u32);

/// How a prop takes part in the directional light's shadow map.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ShadowFlags {
    /// Drawn into the shadow map.
    pub cast: bool,
    /// Darkened where the shadow map says the light is blocked.
    pub receive: bool,
}

impl ShadowFlags {
    pub const NONE: Self = Self { cast: false, receive: false };
    pub const CAST: Self = Self { cast: true, receive: false };
    pub const RECEIVE: Self = Self { cast: false, receive: true };
}

/// A static, opaque scene object.
///
/// Props are what the shield is compared against: they are drawn into the
/// depth capture and into the lit color pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub id: PropId,
    pub name: String,
    pub mesh: MeshData,
    pub transform: Transform,
    pub color: ColorRgba,
    pub shadows: ShadowFlags,
}

/// Ordered collection of props.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `revision()` changes on every structural or transform edit, so GPU
///   uploads can be skipped while it stays the same
#[derive(Debug, Default)]
pub struct PropList {
    items: Vec<Prop>,
    next_id: u32,
    revision: u64,
}

impl PropList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prop and returns its id.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        mesh: MeshData,
        transform: Transform,
        color: ColorRgba,
    ) -> PropId {
        let id = PropId(self.next_id);
        self.next_id += 1;
        self.items.push(Prop {
            id,
            name: name.into(),
            mesh,
            transform,
            color,
            shadows: ShadowFlags::NONE,
        });
        self.revision += 1;
        id
    }

    /// Removes every prop. Ids are not reused.
    pub fn clear(&mut self) {
        self.items.clear();
        self.revision += 1;
    }

    #[inline]
    pub fn get(&self, id: PropId) -> Option<&Prop> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Replaces a prop's transform. Returns `false` for an unknown id.
    pub fn set_transform(&mut self, id: PropId, transform: Transform) -> bool {
        let Some(prop) = self.items.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        prop.transform = transform;
        self.revision += 1;
        true
    }

    /// Replaces a prop's shadow participation. Returns `false` for an unknown id.
    pub fn set_shadows(&mut self, id: PropId, shadows: ShadowFlags) -> bool {
        let Some(prop) = self.items.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        prop.shadows = shadows;
        self.revision += 1;
        true
    }

    /// Returns props in insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Prop> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Monotonic edit counter.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Distance of the four upright props from the origin.
const PROP_RING: f32 = 3.0;

/// Height of the ground plane.
pub const GROUND_Y: f32 = -0.5;

/// The demo layout: four primitives around the origin on a 10 x 10 ground.
///
/// The primitives cast shadows and the ground receives them.
pub fn reference_props() -> PropList {
    let mut props = PropList::new();
    let flat = Quat::from_rotation_x(-FRAC_PI_2);

    let box_id = props.push(
        "box",
        MeshData::cuboid(Vec3::ONE),
        Transform::from_xyz(0.0, 0.0, -PROP_RING),
        ColorRgba::from_srgb_u8(255, 105, 180),
    );
    let cone = props.push(
        "cone",
        MeshData::cone(1.0, 1.0, 32),
        Transform::from_xyz(PROP_RING, 0.0, 0.0),
        ColorRgba::from_srgb_u8(255, 99, 71),
    );
    let torus = props.push(
        "torus",
        MeshData::torus(1.0, 0.4, 12, 48),
        Transform::from_xyz(0.0, 0.0, PROP_RING).with_rotation(flat),
        ColorRgba::from_srgb_u8(154, 205, 50),
    );
    let cylinder = props.push(
        "cylinder",
        MeshData::cylinder(1.0, 1.0, 1.0, 32),
        Transform::from_xyz(-PROP_RING, 0.0, 0.0),
        ColorRgba::from_srgb_u8(173, 216, 230),
    );
    let ground = props.push(
        "ground",
        MeshData::plane(10.0, 10.0),
        Transform::from_xyz(0.0, GROUND_Y, 0.0).with_rotation(flat),
        ColorRgba::white(),
    );

    for id in [box_id, cone, torus, cylinder] {
        props.set_shadows(id, ShadowFlags::CAST);
    }
    props.set_shadows(ground, ShadowFlags::RECEIVE);

    props
}
