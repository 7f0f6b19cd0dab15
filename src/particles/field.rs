//! Morphing needle particles
//!
//! Thousands of glowing points that drift in a scattered cloud and gather
//! into the tree volume. Only one scalar changes per frame on the CPU; the
//! actual interpolation runs in the particle vertex shader. The functions
//! [`morph_vertex`] and [`glow_fragment`] express the same per-point
//! formulas on the CPU side.

use glam::{Vec2, Vec3, Vec4};
use rand::Rng;

use crate::animation::{ease_in_out_cubic, lerp, SmoothedProgress, TransitionState};
use crate::config::SceneConfig;
use crate::geometry::{scatter_position, tree_position};

/// Fraction of the remaining distance covered per frame
pub const PARTICLE_SMOOTHING: f32 = 0.04;

/// Floats per sample in [`ParticleField::attribute_data`]:
/// scatter(3) + tree(3) + random(1) + size(1)
pub const PARTICLE_STRIDE: usize = 8;

const FLOAT_SPEED_SCATTERED: f32 = 0.5;
const FLOAT_SPEED_TREE: f32 = 1.5;
const FLOAT_AMP_SCATTERED: f32 = 0.5;
const FLOAT_AMP_TREE: f32 = 0.1;

/// Twinkle stays inside [TWINKLE_BASE - TWINKLE_DEPTH, TWINKLE_BASE + TWINKLE_DEPTH]
const TWINKLE_BASE: f32 = 0.6;
const TWINKLE_DEPTH: f32 = 0.4;

/// Point size numerator for perspective attenuation
const SIZE_ATTENUATION: f32 = 20.0;

/// Nearest view depth used for attenuation, same clamp as the vertex shader
const MIN_VIEW_DEPTH: f32 = 0.0001;

/// One particle, fixed for the whole session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub scatter_position: Vec3,
    pub tree_position: Vec3,
    /// Phase seed in [0, 1)
    pub random: f32,
    /// Size factor in [0.5, 1.0)
    pub size: f32,
}

impl Sample {
    fn generate<R: Rng + ?Sized>(rng: &mut R, config: &SceneConfig) -> Self {
        let height_ratio: f32 = rng.gen();
        let tree_position = tree_position(rng, height_ratio, config.tree_radius, config.tree_height);
        let scatter_position = scatter_position(rng, config.scatter_radius);

        Self {
            scatter_position,
            tree_position,
            random: rng.gen(),
            size: rng.gen::<f32>() * 0.5 + 0.5,
        }
    }

    /// Position before the floating perturbation is added
    pub fn mixed_position(&self, eased: f32) -> Vec3 {
        self.scatter_position.lerp(self.tree_position, eased)
    }
}

/// Output of the per-vertex stage for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleVertex {
    pub position: Vec3,
    pub alpha: f32,
}

/// Amplitude of the floating motion: large while scattered, a gentle sway on the tree.
pub fn float_amplitude(eased: f32) -> f32 {
    lerp(FLOAT_AMP_SCATTERED, FLOAT_AMP_TREE, eased)
}

fn float_speed(eased: f32) -> f32 {
    lerp(FLOAT_SPEED_SCATTERED, FLOAT_SPEED_TREE, eased)
}

/// Floating offset for a sample at the given time and eased factor
pub fn float_offset(random: f32, time: f32, eased: f32) -> Vec3 {
    let amp = float_amplitude(eased);
    Vec3::new(
        (time * 0.3 + random * 5.0).cos() * amp * 0.5,
        (time * float_speed(eased) + random * 10.0).sin() * amp,
        0.0,
    )
}

/// Per-sample opacity flicker, never fully transparent
pub fn twinkle_alpha(random: f32, time: f32) -> f32 {
    TWINKLE_BASE + TWINKLE_DEPTH * (time * 3.0 + random * 20.0).sin()
}

/// Screen-space point size for a sample at `view_depth` units in front of the camera
pub fn point_size(size: f32, pixel_ratio: f32, view_depth: f32) -> f32 {
    size * pixel_ratio * (SIZE_ATTENUATION / view_depth.max(MIN_VIEW_DEPTH))
}

/// The particle vertex shader, evaluated on the CPU.
///
/// `progress` is the raw smoothed value; the ease is applied here exactly as
/// the shader does.
pub fn morph_vertex(sample: &Sample, time: f32, progress: f32) -> ParticleVertex {
    let t = ease_in_out_cubic(progress);
    ParticleVertex {
        position: sample.mixed_position(t) + float_offset(sample.random, time, t),
        alpha: twinkle_alpha(sample.random, time),
    }
}

/// The particle fragment shader, evaluated on the CPU.
///
/// `point_coord` is in [0, 1]² across the point sprite. Returns `None` where
/// the fragment is discarded (outside the circular footprint), otherwise the
/// RGBA colour blending `base` towards `tip` with a soft radial glow.
pub fn glow_fragment(point_coord: Vec2, base: Vec3, tip: Vec3, alpha: f32) -> Option<Vec4> {
    let dist = (point_coord - Vec2::splat(0.5)).length();
    if dist > 0.5 {
        return None;
    }

    let glow = (1.0 - dist * 2.0).powf(1.5);
    let color = base.lerp(tip, glow);
    Some(color.extend(alpha * glow))
}

/// The fixed set of needle particles and their shared progress
pub struct ParticleField {
    samples: Vec<Sample>,
    progress: SmoothedProgress,
    time: f32,
}

impl ParticleField {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let samples = (0..config.particle_count)
            .map(|_| Sample::generate(rng, config))
            .collect::<Vec<_>>();

        log::debug!("generated {} particle samples", samples.len());

        Self {
            samples,
            progress: SmoothedProgress::new(PARTICLE_SMOOTHING),
            time: 0.0,
        }
    }

    /// Advance one frame and return the progress uniform for the shader
    pub fn update(&mut self, state: TransitionState, time: f32) -> f32 {
        self.time = time;
        self.progress.update(state)
    }

    /// Raw smoothed progress (what the shader receives as `u_progress`)
    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn eased_progress(&self) -> f32 {
        self.progress.eased()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Static attribute data for a one-time GPU upload
    /// Format: scatter(3) + tree(3) + random(1) + size(1) = 8 floats per sample
    pub fn attribute_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.samples.len() * PARTICLE_STRIDE);

        for s in &self.samples {
            data.extend_from_slice(&s.scatter_position.to_array());
            data.extend_from_slice(&s.tree_position.to_array());
            data.push(s.random);
            data.push(s.size);
        }

        data
    }

    /// Evaluate every sample for the current frame into `out`, reusing its allocation
    pub fn evaluate_into(&self, out: &mut Vec<ParticleVertex>) {
        let progress = self.progress.value();
        out.clear();
        out.extend(
            self.samples
                .iter()
                .map(|s| morph_vertex(s, self.time, progress)),
        );
    }
}
