use glam::Vec3;

use aegis_engine::coords::ColorRgba;
use aegis_engine::core::{App, AppControl, FrameCtx};
use aegis_engine::render::{DepthCaptureConfig, SceneRenderer};
use aegis_engine::scene::{reference_props, Camera, PropList, Shield, ShieldParams, GROUND_Y};

/// Height the bob oscillates around, relative to the ground.
const BOB_CENTER: f32 = 1.0;
const BOB_AMPLITUDE: f32 = 3.0;
/// Radians per second.
const BOB_SPEED: f32 = 0.6;
/// Camera turn rate around the scene, radians per second.
const ORBIT_SPEED: f32 = 0.15;

/// Shield center height at `elapsed` seconds.
///
/// Sweeps the default-radius shield from fully above the ground to cutting
/// deep through it, so the contact band is always moving.
pub fn bob_height(elapsed: f32) -> f32 {
    GROUND_Y + BOB_CENTER + BOB_AMPLITUDE * (elapsed * BOB_SPEED).sin()
}

/// The reference scene: four props on a ground plane, a bobbing shield and a
/// camera slowly circling both.
pub struct ShieldDemo {
    camera: Camera,
    props: PropList,
    shield: Shield,
    renderer: SceneRenderer,
    clear: ColorRgba,
}

impl ShieldDemo {
    pub fn new() -> Self {
        Self {
            camera: Camera::default(),
            props: reference_props(),
            shield: Shield::new(ShieldParams::default()),
            renderer: SceneRenderer::new(DepthCaptureConfig::default()),
            clear: ColorRgba::black(),
        }
    }

    fn animate(&mut self, elapsed: f32, dt: f32) {
        self.shield.transform.translation = Vec3::new(0.0, bob_height(elapsed), 0.0);
        self.camera.orbit_y(dt * ORBIT_SPEED);
    }
}

impl App for ShieldDemo {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.animate(ctx.time.elapsed, ctx.time.dt);

        if ctx.time.frame_index == 0 {
            log::info!(
                "scene: {} props, shield radius {}",
                self.props.len(),
                self.shield.params.radius()
            );
        }

        let Self {
            camera,
            props,
            shield,
            renderer,
            clear,
        } = self;

        ctx.render(*clear, |rctx, target| {
            renderer.render(rctx, target, camera, props, shield);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bottom(center_y: f32) -> f32 {
        center_y - ShieldParams::DEFAULT_RADIUS
    }

    fn top(center_y: f32) -> f32 {
        center_y + ShieldParams::DEFAULT_RADIUS
    }

    #[test]
    fn bob_starts_at_center_height() {
        assert!((bob_height(0.0) - (GROUND_Y + BOB_CENTER)).abs() < 1e-6);
    }

    #[test]
    fn bob_crosses_the_ground() {
        let peak = GROUND_Y + BOB_CENTER + BOB_AMPLITUDE;
        let trough = GROUND_Y + BOB_CENTER - BOB_AMPLITUDE;
        // Clear of the ground at the peak, cutting through it at the trough.
        assert!(bottom(peak) > GROUND_Y);
        assert!(bottom(trough) < GROUND_Y && top(trough) > GROUND_Y);
    }

    #[test]
    fn demo_starts_with_reference_scene() {
        let demo = ShieldDemo::new();
        assert_eq!(demo.props.len(), 5);
        assert_eq!(demo.shield.params.radius(), 3.0);
        assert_eq!(demo.clear, ColorRgba::black());
    }

    #[test]
    fn camera_circles_at_constant_height_and_distance() {
        let mut demo = ShieldDemo::new();
        let start = demo.camera.eye;
        for _ in 0..60 {
            demo.animate(1.0, 1.0 / 60.0);
        }
        let eye = demo.camera.eye;
        assert!((eye.y - start.y).abs() < 1e-4);
        assert!((eye.distance(demo.camera.target) - start.distance(demo.camera.target)).abs() < 1e-4);
        // One second of orbit.
        let turned = Vec3::new(start.x, 0.0, start.z).angle_between(Vec3::new(eye.x, 0.0, eye.z));
        assert!((turned - ORBIT_SPEED).abs() < 1e-3);
    }

    #[test]
    fn animate_moves_shield_to_bob_height() {
        let mut demo = ShieldDemo::new();
        demo.animate(2.0, 0.0);
        assert_eq!(demo.shield.transform.translation, Vec3::new(0.0, bob_height(2.0), 0.0));
    }
}
