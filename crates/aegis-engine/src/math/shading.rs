//! Shield surface shading, mirrored from `render/shaders/shield.wgsl`.
//!
//! The response is the sum of three independent cues:
//! - a fixed translucent tint
//! - a proximity highlight that is opaque white where the shield touches
//!   captured scene depth and vanishes past [`INTERSECTION_THRESHOLD`]
//! - a fresnel rim term
//!
//! The sum is a display value: the shader writes it through a non-sRGB view
//! of the surface, so [`stored_color`] is what lands in the target before
//! blending. Keep the constants and formulas in lockstep with the shader.

use glam::{Vec3, Vec4};

/// Linear-depth separation at which the proximity highlight reaches zero.
pub const INTERSECTION_THRESHOLD: f32 = 0.0001;

/// Power applied to the rim term.
pub const FRESNEL_EXPONENT: i32 = 4;

/// Translucent base color added under both highlights.
pub const BASE_TINT: Vec4 = Vec4::new(1.0, 0.4, 0.2, 0.3);

/// Clip-space depth convention of the projection that wrote a depth value.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ClipDepth {
    /// NDC z in `[0, 1]` (wgpu / Vulkan / D3D, `glam::Mat4::perspective_rh`).
    #[default]
    ZeroToOne,
    /// NDC z in `[-1, 1]` (OpenGL / WebGL, `glam::Mat4::perspective_rh_gl`).
    NegOneToOne,
}

/// Converts a raw depth-buffer value in `[0, 1]` to eye-space distance.
///
/// The denominators are the usual `f - d(f - n)` and `(f + n) - ndc(f - n)`
/// regrouped per plane so both endpoints come out exact in `f32`.
///
/// `near >= far` is not checked; the result is then meaningless (NaN or inf).
#[inline]
pub fn eye_depth(depth: f32, near: f32, far: f32, clip: ClipDepth) -> f32 {
    match clip {
        ClipDepth::ZeroToOne => (far * near) / (far * (1.0 - depth) + near * depth),
        ClipDepth::NegOneToOne => {
            let ndc = 2.0 * depth - 1.0;
            (2.0 * far * near) / (far * (1.0 - ndc) + near * (1.0 + ndc))
        }
    }
}

/// Maps a raw depth value onto `[0, 1]` proportional to eye distance
/// between the near and far planes.
///
/// `0 -> 0`, `1 -> 1`, monotonically non-decreasing for `0 < near < far`.
#[inline]
pub fn linearize_depth(depth: f32, near: f32, far: f32, clip: ClipDepth) -> f32 {
    (eye_depth(depth, near, far, clip) - near) / (far - near)
}

/// Orients a surface normal away from the viewer.
///
/// The shield is drawn double-sided, so both its near and far walls are
/// visible. Front-facing fragments get their normal flipped and back-facing
/// ones keep it, which leaves `dot(normal, view_dir)` in `[-1, 0]` for both.
#[inline]
pub fn orient_normal(normal: Vec3, front_facing: bool) -> Vec3 {
    let n = normal.normalize();
    if front_facing { -n } else { n }
}

/// Rim term `(1 + dot(normal, view_dir))^4`.
///
/// With an oriented normal: 0 head-on (`dot = -1`), 1 at grazing (`dot = 0`).
#[inline]
pub fn fresnel(normal: Vec3, view_dir: Vec3) -> f32 {
    (1.0 + normal.dot(view_dir)).max(0.0).powi(FRESNEL_EXPONENT)
}

/// `clamp(difference / threshold, 0, 1)`.
#[inline]
pub fn normalized_distance(difference: f32) -> f32 {
    (difference / INTERSECTION_THRESHOLD).clamp(0.0, 1.0)
}

/// Proximity highlight: opaque white at 0, transparent black at 1.
#[inline]
pub fn intersection(normalized: f32) -> Vec4 {
    Vec4::ONE.lerp(Vec4::ZERO, normalized)
}

/// Inputs of one shield fragment.
#[derive(Debug, Copy, Clone)]
pub struct FragmentInput {
    pub world_position: Vec3,
    pub world_normal: Vec3,
    pub front_facing: bool,
    pub camera_position: Vec3,
    /// Raw captured scene depth at this pixel.
    pub scene_depth: f32,
    /// Raw depth of the shield fragment itself.
    pub fragment_depth: f32,
}

/// Full fragment response: `BASE_TINT + intersection + vec4(fresnel)`.
///
/// The sum is intentionally unclamped; the color target saturates it.
pub fn shade(input: &FragmentInput, near: f32, far: f32, clip: ClipDepth) -> Vec4 {
    let normal = orient_normal(input.world_normal, input.front_facing);
    let view_dir = (input.camera_position - input.world_position).normalize();
    let rim = fresnel(normal, view_dir);

    let scene = linearize_depth(input.scene_depth, near, far, clip);
    let shield = linearize_depth(input.fragment_depth, near, far, clip);
    let highlight = intersection(normalized_distance((scene - shield).abs()));

    BASE_TINT + highlight + Vec4::splat(rim)
}

/// Source color the blender sees for a `shade` result: saturated to the
/// unorm range, no transfer function applied.
pub fn stored_color(shaded: Vec4) -> Vec4 {
    shaded.clamp(Vec4::ZERO, Vec4::ONE)
}

/// Straight alpha blend of `src` over `dst`, computed in the stored
/// (display) encoding. Returns the resulting rgb.
pub fn blend_over(src: Vec4, dst: Vec3) -> Vec3 {
    src.truncate() * src.w + dst * (1.0 - src.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    const CLIPS: [ClipDepth; 2] = [ClipDepth::ZeroToOne, ClipDepth::NegOneToOne];
    const FRUSTA: [(f32, f32); 4] = [(0.1, 1000.0), (0.1, 100.0), (1.0, 2.0), (0.5, 50.0)];

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    // ── linearization ─────────────────────────────────────────────────────

    #[test]
    fn linearize_preserves_endpoints() {
        for clip in CLIPS {
            for (near, far) in FRUSTA {
                assert!(approx(linearize_depth(0.0, near, far, clip), 0.0, 1e-5));
                assert!(approx(linearize_depth(1.0, near, far, clip), 1.0, 1e-4));
            }
        }
    }

    #[test]
    fn linearize_is_monotonic() {
        for clip in CLIPS {
            for (near, far) in FRUSTA {
                let mut prev = linearize_depth(0.0, near, far, clip);
                for i in 1..=1000 {
                    let d = i as f32 / 1000.0;
                    let lin = linearize_depth(d, near, far, clip);
                    assert!(lin >= prev, "{clip:?} near={near} far={far} d={d}");
                    prev = lin;
                }
            }
        }
    }

    #[test]
    fn gl_formula_matches_reference_expression() {
        let (near, far) = (0.1, 1000.0);
        let depth = 0.97;
        let ndc = 2.0 * depth - 1.0;
        let eye = (2.0 * far * near) / ((far + near) - ndc * (far - near));
        let expected = (eye - near) / (far - near);
        let lin = linearize_depth(depth, near, far, ClipDepth::NegOneToOne);
        assert!(approx(lin, expected, expected * 1e-4));
    }

    #[test]
    fn eye_depth_inverts_perspective_projection() {
        let (near, far) = (0.1, 100.0);
        let proj = Mat4::perspective_rh(1.0, 1.5, near, far);
        let proj_gl = Mat4::perspective_rh_gl(1.0, 1.5, near, far);

        for dist in [0.2_f32, 1.0, 5.0, 42.0, 99.0] {
            let p = proj.project_point3(Vec3::new(0.0, 0.0, -dist));
            assert!(approx(eye_depth(p.z, near, far, ClipDepth::ZeroToOne), dist, dist * 1e-3));

            let p = proj_gl.project_point3(Vec3::new(0.0, 0.0, -dist));
            let depth = p.z * 0.5 + 0.5;
            assert!(approx(eye_depth(depth, near, far, ClipDepth::NegOneToOne), dist, dist * 1e-3));
        }
    }

    #[test]
    fn degenerate_frustum_is_not_finite() {
        let lin = linearize_depth(0.5, 1.0, 1.0, ClipDepth::ZeroToOne);
        assert!(!lin.is_finite());
    }

    // ── proximity highlight ───────────────────────────────────────────────

    #[test]
    fn touching_surfaces_give_opaque_white() {
        assert_eq!(normalized_distance(0.0), 0.0);
        assert_eq!(intersection(normalized_distance(0.0)), Vec4::ONE);
    }

    #[test]
    fn separation_at_or_past_threshold_gives_transparent_black() {
        for diff in [INTERSECTION_THRESHOLD, INTERSECTION_THRESHOLD * 2.0, 1.0] {
            assert_eq!(normalized_distance(diff), 1.0);
            assert_eq!(intersection(normalized_distance(diff)), Vec4::ZERO);
        }
    }

    #[test]
    fn normalized_distance_stays_in_unit_range() {
        for diff in [-1.0, -INTERSECTION_THRESHOLD, 1e9, f32::MAX] {
            let n = normalized_distance(diff);
            assert!((0.0..=1.0).contains(&n), "diff={diff} -> {n}");
        }
        assert!(approx(normalized_distance(INTERSECTION_THRESHOLD * 0.25), 0.25, 1e-5));
    }

    #[test]
    fn intersection_fades_linearly() {
        let half = intersection(0.5);
        assert_eq!(half, Vec4::splat(0.5));
    }

    // ── fresnel ───────────────────────────────────────────────────────────

    #[test]
    fn fresnel_is_zero_head_on_and_one_at_grazing() {
        let view = Vec3::Z;
        assert_eq!(fresnel(-Vec3::Z, view), 0.0);
        assert_eq!(fresnel(Vec3::X, view), 1.0);
    }

    #[test]
    fn fresnel_stays_in_unit_range_over_oriented_domain() {
        for i in 0..=100 {
            let d = -(i as f32) / 100.0;
            let normal = Vec3::new((1.0 - d * d).max(0.0).sqrt(), 0.0, d);
            let f = fresnel(normal, Vec3::Z);
            assert!((0.0..=1.0 + 1e-6).contains(&f), "dot={d} -> {f}");
        }
    }

    #[test]
    fn oriented_normals_face_away_from_viewer() {
        let camera = Vec3::new(0.0, 0.0, 10.0);
        // Near wall of a unit sphere: outward normal faces the camera.
        let near_wall = Vec3::new(0.0, 0.0, 1.0);
        let n = orient_normal(near_wall, true);
        assert!(n.dot((camera - near_wall).normalize()) <= 0.0);

        // Far wall: outward normal already faces away.
        let far_wall = Vec3::new(0.0, 0.0, -1.0);
        let n = orient_normal(far_wall, false);
        assert!(n.dot((camera - far_wall).normalize()) <= 0.0);
    }

    // ── full response ─────────────────────────────────────────────────────

    #[test]
    fn head_on_separated_fragment_is_just_the_tint() {
        let input = FragmentInput {
            world_position: Vec3::new(0.0, 0.0, 1.0),
            world_normal: Vec3::Z,
            front_facing: true,
            camera_position: Vec3::new(0.0, 0.0, 10.0),
            scene_depth: 1.0,
            fragment_depth: 0.5,
        };
        let c = shade(&input, 0.1, 100.0, ClipDepth::ZeroToOne);
        assert!((c - BASE_TINT).abs().max_element() < 1e-6);
    }

    #[test]
    fn untouched_tint_is_stored_unencoded() {
        let stored = stored_color(BASE_TINT);
        assert_eq!(stored, BASE_TINT);

        // Over the black clear the pixel reads back as 0.3 x tint, the
        // calibrated orange, not a gamma-lifted variant of it.
        let px = blend_over(stored, Vec3::ZERO);
        assert!((px - Vec3::new(0.3, 0.12, 0.06)).abs().max_element() < 1e-6);
    }

    #[test]
    fn overbright_response_saturates() {
        let stored = stored_color(BASE_TINT + Vec4::ONE + Vec4::splat(0.5));
        assert_eq!(stored, Vec4::ONE);
        assert_eq!(blend_over(stored, Vec3::new(0.2, 0.5, 0.7)), Vec3::ONE);
    }

    #[test]
    fn touching_fragment_adds_white_highlight() {
        let input = FragmentInput {
            world_position: Vec3::new(0.0, 0.0, 1.0),
            world_normal: Vec3::Z,
            front_facing: true,
            camera_position: Vec3::new(0.0, 0.0, 10.0),
            scene_depth: 0.9,
            fragment_depth: 0.9,
        };
        let c = shade(&input, 0.1, 100.0, ClipDepth::ZeroToOne);
        assert!((c - (BASE_TINT + Vec4::ONE)).abs().max_element() < 1e-6);
    }

    /// Shield of radius 3 at the origin, ground plane at y = -0.5, camera at
    /// (0, 5, 5). Fragments where the sphere meets the plane must come out
    /// clearly brighter and more opaque than fragments on the sphere's crown.
    #[test]
    fn shield_brightens_where_it_meets_the_ground() {
        let (near, far) = (0.1, 1000.0);
        let camera = Vec3::new(0.0, 5.0, 5.0);
        let view = Mat4::look_at_rh(camera, Vec3::ZERO, Vec3::Y);
        let view_proj = Mat4::perspective_rh(75f32.to_radians(), 16.0 / 9.0, near, far) * view;
        let radius = 3.0;
        let ground_y = -0.5;
        let ground_half = 5.0;

        let depth_of = |p: Vec3| view_proj.project_point3(p).z;
        let ground_depth_along = |p: Vec3| {
            let dir = (p - camera).normalize();
            let t = (ground_y - camera.y) / dir.y;
            let hit = camera + dir * t;
            if t > 0.0 && hit.x.abs() <= ground_half && hit.z.abs() <= ground_half {
                depth_of(hit)
            } else {
                1.0
            }
        };
        let fragment_at = |p: Vec3| FragmentInput {
            world_position: p,
            world_normal: p / radius,
            front_facing: (p / radius).dot(camera - p) > 0.0,
            camera_position: camera,
            scene_depth: ground_depth_along(p),
            fragment_depth: depth_of(p),
        };

        let contact_z = (radius * radius - ground_y * ground_y).sqrt();
        let contact = fragment_at(Vec3::new(0.0, ground_y, contact_z));
        let crown = fragment_at(Vec3::new(0.0, radius, 0.0));
        assert!(contact.front_facing && crown.front_facing);

        let lit = shade(&contact, near, far, ClipDepth::ZeroToOne);
        let dim = shade(&crown, near, far, ClipDepth::ZeroToOne);

        assert!(lit.w > dim.w + 0.5, "contact alpha {} vs crown alpha {}", lit.w, dim.w);
        assert!(lit.y > dim.y + 0.5);
    }
}
