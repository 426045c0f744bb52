//! Front-end checks for the WGSL sources: every shader parses and validates,
//! and constants duplicated on the CPU side agree with the shader copies.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Expression, Literal, Module};

use crate::math::shading::{BASE_TINT, FRESNEL_EXPONENT, INTERSECTION_THRESHOLD};

use super::SHADOW_MAP_SIZE;

const SHIELD: &str = include_str!("shaders/shield.wgsl");
const PROPS: &str = include_str!("shaders/props.wgsl");
const DEPTH_ONLY: &str = include_str!("shaders/depth_only.wgsl");

fn parse_and_validate(name: &str, source: &str) -> Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(m) => m,
        Err(e) => panic!("{name}: {}", e.emit_to_string(source)),
    };
    if let Err(e) = Validator::new(ValidationFlags::all(), Capabilities::default()).validate(&module) {
        panic!("{name}: {e:?}");
    }
    module
}

/// Flattens a constant-expression initializer into its float components.
fn floats(module: &Module, expr: naga::Handle<Expression>) -> Vec<f32> {
    match &module.global_expressions[expr] {
        Expression::Literal(Literal::F32(v)) => vec![*v],
        Expression::Literal(Literal::AbstractFloat(v)) => vec![*v as f32],
        Expression::Compose { components, .. } => components
            .iter()
            .flat_map(|c| floats(module, *c))
            .collect(),
        Expression::Splat { size, value } => {
            let v = floats(module, *value);
            std::iter::repeat_n(v[0], *size as usize).collect()
        }
        other => panic!("unsupported constant initializer {other:?}"),
    }
}

fn constant(module: &Module, name: &str) -> Vec<f32> {
    let (_, c) = module
        .constants
        .iter()
        .find(|(_, c)| c.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("constant {name} not declared"));
    floats(module, c.init)
}

#[test]
fn all_shaders_validate() {
    parse_and_validate("shield.wgsl", SHIELD);
    parse_and_validate("props.wgsl", PROPS);
    parse_and_validate("depth_only.wgsl", DEPTH_ONLY);
}

#[test]
fn shield_constants_match_cpu_shading() {
    let module = parse_and_validate("shield.wgsl", SHIELD);
    assert_eq!(constant(&module, "INTERSECTION_THRESHOLD"), vec![INTERSECTION_THRESHOLD]);
    assert_eq!(constant(&module, "FRESNEL_EXPONENT"), vec![FRESNEL_EXPONENT as f32]);
    assert_eq!(constant(&module, "BASE_TINT"), BASE_TINT.to_array().to_vec());
}

#[test]
fn shield_linearizes_like_cpu_shading() {
    // Same per-plane denominator as `math::shading::eye_depth` for [0, 1] depth.
    assert!(SHIELD.contains("let eye = f * n / (f * (1.0 - depth) + n * depth);"));
    assert!(SHIELD.contains("return (eye - n) / (f - n);"));
}

#[test]
fn props_shadow_map_size_matches_texture() {
    let module = parse_and_validate("props.wgsl", PROPS);
    assert_eq!(constant(&module, "SHADOW_MAP_SIZE"), vec![SHADOW_MAP_SIZE as f32]);
}
