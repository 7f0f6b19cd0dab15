use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::{Mat4, Vec3};

const MIN_DISTANCE: f32 = 8.0;
const MAX_DISTANCE: f32 = 35.0;
const MIN_POLAR: f32 = FRAC_PI_4;
const MAX_POLAR: f32 = PI / 1.8;

/// Radians per pixel of drag
const ORBIT_SPEED: f32 = 0.01;
/// Distance per wheel unit
const ZOOM_SPEED: f32 = 0.5;
/// One full turn per 60 seconds at speed 1
const AUTO_ROTATE_SPEED: f32 = 0.5;

const FOV_Y: f32 = 45.0 * PI / 180.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Orbit camera around a fixed target, with no panning.
///
/// Angles are spherical: `polar` from +Y, `azimuth` around Y starting at +Z.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    azimuth: f32,
    polar: f32,
    pub auto_rotate: bool,
}

impl Default for OrbitCamera {
    /// Looking at the origin from (0, 0, 25)
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 25.0,
            azimuth: 0.0,
            polar: FRAC_PI_2,
            auto_rotate: true,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    /// Rotate by a pointer drag in pixels
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth = (self.azimuth - delta_x * ORBIT_SPEED).rem_euclid(TAU);
        self.polar = (self.polar - delta_y * ORBIT_SPEED).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * ZOOM_SPEED).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance auto-rotation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            let step = TAU / 60.0 * AUTO_ROTATE_SPEED * dt;
            self.azimuth = (self.azimuth + step).rem_euclid(TAU);
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(FOV_Y, aspect.max(f32::EPSILON), NEAR, FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye() {
        let camera = OrbitCamera::new();
        let eye = camera.eye();
        assert!((eye - Vec3::new(0.0, 0.0, 25.0)).length() < 0.0001);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = OrbitCamera::new();
        camera.zoom(-1000.0);
        assert_eq!(camera.distance(), MIN_DISTANCE);
        camera.zoom(1000.0);
        assert_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_polar_clamped() {
        let mut camera = OrbitCamera::new();
        camera.orbit(0.0, 10_000.0);
        assert_eq!(camera.polar(), MIN_POLAR);
        camera.orbit(0.0, -10_000.0);
        assert_eq!(camera.polar(), MAX_POLAR);
    }

    #[test]
    fn test_auto_rotate_rate() {
        let mut camera = OrbitCamera::new();
        camera.update(60.0);
        // Half a turn per minute at speed 0.5
        assert!((camera.azimuth() - PI).abs() < 0.001);

        camera.auto_rotate = false;
        camera.update(10.0);
        assert!((camera.azimuth() - PI).abs() < 0.001);
    }

    #[test]
    fn test_eye_keeps_distance() {
        let mut camera = OrbitCamera::new();
        camera.orbit(123.0, -40.0);
        camera.zoom(-6.0);
        assert!((camera.eye().length() - camera.distance()).abs() < 0.001);
    }

    #[test]
    fn test_view_puts_target_ahead() {
        let camera = OrbitCamera::new();
        let view_space = camera.view_matrix().transform_point3(camera.target);
        assert!((view_space.z + 25.0).abs() < 0.001);
    }
}
