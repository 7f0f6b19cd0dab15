//! Frame-driven scene state, independent of the GPU
//!
//! Owns the toggle, both fields and the camera. The wasm facade forwards to
//! this and then hands the results to the render pipeline.

use crate::animation::{TransitionController, TransitionState};
use crate::config::SceneConfig;
use crate::interaction::OrbitCamera;
use crate::particles::{OrnamentField, ParticleField};

pub struct Scene {
    config: SceneConfig,
    controller: TransitionController,
    particles: ParticleField,
    ornaments: OrnamentField,
    camera: OrbitCamera,
    time: f32,
}

impl Scene {
    /// Generate both fields from an already validated config
    pub fn new(config: SceneConfig) -> Self {
        let mut rng = config.rng();
        let particles = ParticleField::new(&config, &mut rng);
        let ornaments = OrnamentField::new(&config, &mut rng);

        log::info!(
            "scene generated: {} needles, {} ornaments, seed {:?}",
            particles.len(),
            ornaments.len(),
            config.seed
        );

        Self {
            config,
            controller: TransitionController::new(),
            particles,
            ornaments,
            camera: OrbitCamera::new(),
            time: 0.0,
        }
    }

    /// Advance one animation frame of `dt` seconds.
    ///
    /// Smoothing is per call, so both fields move exactly one step regardless of `dt`.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;
        self.camera.update(dt);

        let state = self.controller.state();
        self.particles.update(state, self.time);
        self.ornaments.update(state, self.time);
    }

    pub fn toggle(&mut self) -> TransitionState {
        let state = self.controller.toggle();
        log::debug!(
            "toggled to {:?} (needles {:.3}, ornaments {:.3})",
            state,
            self.particles.progress(),
            self.ornaments.progress()
        );
        state
    }

    pub fn state(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn button_label(&self) -> &'static str {
        self.controller.button_label()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn ornaments(&self) -> &OrnamentField {
        &self.ornaments
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(SceneConfig {
            particle_count: 200,
            ornament_count: 20,
            seed: Some(11),
            ..SceneConfig::default()
        })
    }

    #[test]
    fn test_starts_scattered() {
        let scene = scene();
        assert_eq!(scene.state(), TransitionState::Scattered);
        assert_eq!(scene.button_label(), "ASSEMBLE TREE");
        assert_eq!(scene.particles().progress(), 0.0);
        assert_eq!(scene.ornaments().progress(), 0.0);
    }

    #[test]
    fn test_tick_accumulates_time() {
        let mut scene = scene();
        for _ in 0..10 {
            scene.tick(0.016);
        }
        assert!((scene.time() - 0.16).abs() < 0.0001);
        assert!((scene.particles().time() - scene.time()).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bad_dt_does_not_rewind() {
        let mut scene = scene();
        scene.tick(1.0);
        scene.tick(-5.0);
        scene.tick(f32::NAN);
        assert_eq!(scene.time(), 1.0);
    }

    #[test]
    fn test_needles_lead_ornaments() {
        let mut scene = scene();
        scene.toggle();
        for _ in 0..30 {
            scene.tick(0.016);
        }
        let needles = scene.particles().progress();
        let ornaments = scene.ornaments().progress();
        assert!(needles > ornaments);
        assert!(ornaments > 0.0);
    }

    #[test]
    fn test_full_cycle_settles() {
        let mut scene = scene();
        scene.toggle();
        for _ in 0..2000 {
            scene.tick(0.016);
        }
        assert_eq!(scene.particles().progress(), 1.0);
        assert_eq!(scene.ornaments().progress(), 1.0);
        assert_eq!(scene.button_label(), "RELEASE FORM");

        scene.toggle();
        for _ in 0..10_000 {
            scene.tick(0.016);
        }
        assert_eq!(scene.particles().progress(), 0.0);
        assert_eq!(scene.ornaments().progress(), 0.0);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let a = scene();
        let b = scene();
        assert_eq!(a.particles().attribute_data(), b.particles().attribute_data());
        assert_eq!(a.ornaments().instance_matrices(), b.ornaments().instance_matrices());
    }
}
