//! Gold ornaments
//!
//! A small set of heavier objects that morph with the particles but lag
//! behind them. Each needs a full rigid transform (position, tumbling
//! rotation, pulsing scale), so transforms are computed here every frame and
//! written into an instance buffer instead of being left to the shader.

use std::ops::Range;

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

use crate::animation::{SmoothedProgress, TransitionState};
use crate::config::{Rgb, SceneConfig};
use crate::geometry::{scatter_position, tree_shell_position};

/// Ornaments are heavier, so they settle at half the particle rate
pub const ORNAMENT_SMOOTHING: f32 = 0.02;

/// Floats per ornament in the instance matrix buffer (column-major 4x4)
pub const INSTANCE_STRIDE: usize = 16;

/// Floats per ornament in the colour buffer
pub const COLOR_STRIDE: usize = 3;

const SPIN_RATE_X: f32 = 0.2;
const SPIN_RATE_Y: f32 = 0.3;

/// Mesh used to draw an ornament
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrnamentShape {
    Sphere,
    Box,
}

/// One ornament, fixed for the whole session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentItem {
    pub scatter_position: Vec3,
    pub tree_position: Vec3,
    /// Base Euler angles (XYZ order)
    pub rotation: Vec3,
    pub scale: f32,
    pub shape: OrnamentShape,
    pub color: Rgb,
    pub float_speed: f32,
    /// Phase offset for float and pulse, the generation index
    pub phase: f32,
}

impl OrnamentItem {
    fn generate<R: Rng + ?Sized>(rng: &mut R, index: usize, config: &SceneConfig) -> Self {
        let height_ratio: f32 = rng.gen();
        let tree_position =
            tree_shell_position(rng, height_ratio, config.tree_radius, config.tree_height);
        let scatter_position = scatter_position(rng, config.scatter_radius);

        let rotation = Vec3::new(
            rng.gen::<f32>() * std::f32::consts::PI,
            rng.gen::<f32>() * std::f32::consts::PI,
            0.0,
        );
        let scale = rng.gen::<f32>() * 0.4 + 0.2;
        let shape = if rng.gen::<f32>() > 0.3 {
            OrnamentShape::Sphere
        } else {
            OrnamentShape::Box
        };
        let color = if rng.gen::<f32>() > 0.5 {
            config.palette.gold
        } else {
            config.palette.gold_light
        };

        Self {
            scatter_position,
            tree_position,
            rotation,
            scale,
            shape,
            color,
            float_speed: rng.gen::<f32>() * 0.5 + 0.2,
            phase: index as f32,
        }
    }

    /// Position before the floating perturbation is added
    pub fn mixed_position(&self, eased: f32) -> Vec3 {
        self.scatter_position.lerp(self.tree_position, eased)
    }

    /// World position with floating: strong while scattered, residual on the tree
    pub fn position(&self, time: f32, eased: f32) -> Vec3 {
        let intensity = (1.0 - eased) * 2.0 + eased * 0.1;
        let mut pos = self.mixed_position(eased);
        pos.y += (time * self.float_speed + self.phase).sin() * intensity * 0.1;
        pos.x += (time * self.float_speed * 0.5 + self.phase).cos() * intensity * 0.05;
        pos
    }

    /// Euler angles at `time`: X tumbles only while scattered, Y always spins, Z is fixed
    pub fn rotation_at(&self, time: f32, eased: f32) -> Vec3 {
        Vec3::new(
            self.rotation.x + time * SPIN_RATE_X * (1.0 - eased),
            self.rotation.y + time * SPIN_RATE_Y,
            self.rotation.z,
        )
    }

    /// Breathing scale, independent of the transition
    pub fn scale_at(&self, time: f32) -> f32 {
        self.scale * (0.8 + 0.2 * (time * 2.0 + self.phase).sin())
    }

    /// Full model matrix (translate * rotate * scale)
    pub fn transform(&self, time: f32, eased: f32) -> Mat4 {
        let r = self.rotation_at(time, eased);
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale_at(time)),
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            self.position(time, eased),
        )
    }
}

/// The fixed set of ornaments plus their per-instance GPU buffers.
///
/// Items are grouped by shape (spheres first) so each shape occupies a
/// contiguous range of the instance buffers. The matrix buffer is allocated
/// once and rewritten in place every frame; it has a single writer, the
/// `update` call.
pub struct OrnamentField {
    items: Vec<OrnamentItem>,
    progress: SmoothedProgress,
    instance_matrices: Vec<f32>,
    instance_colors: Vec<f32>,
    sphere_count: usize,
}

impl OrnamentField {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let mut items = (0..config.ornament_count)
            .map(|i| OrnamentItem::generate(rng, i, config))
            .collect::<Vec<_>>();
        items.sort_by_key(|item| item.shape);

        let sphere_count = items
            .iter()
            .take_while(|item| item.shape == OrnamentShape::Sphere)
            .count();

        let instance_colors: Vec<f32> = items.iter().flat_map(|item| item.color.0).collect();

        log::debug!(
            "generated {} ornaments ({} spheres, {} boxes)",
            items.len(),
            sphere_count,
            items.len() - sphere_count
        );

        let mut field = Self {
            instance_matrices: vec![0.0; items.len() * INSTANCE_STRIDE],
            items,
            progress: SmoothedProgress::new(ORNAMENT_SMOOTHING),
            instance_colors,
            sphere_count,
        };
        field.write_transforms(0.0);
        field
    }

    /// Advance one frame, recompute every transform and return the raw progress
    pub fn update(&mut self, state: TransitionState, time: f32) -> f32 {
        let progress = self.progress.update(state);
        self.write_transforms(time);
        progress
    }

    fn write_transforms(&mut self, time: f32) {
        let eased = self.progress.eased();
        for (item, slot) in self
            .items
            .iter()
            .zip(self.instance_matrices.chunks_exact_mut(INSTANCE_STRIDE))
        {
            item.transform(time, eased).write_cols_to_slice(slot);
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn eased_progress(&self) -> f32 {
        self.progress.eased()
    }

    pub fn items(&self) -> &[OrnamentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Column-major matrices, 16 floats per ornament
    pub fn instance_matrices(&self) -> &[f32] {
        &self.instance_matrices
    }

    /// RGB colours, 3 floats per ornament, fixed at creation
    pub fn instance_colors(&self) -> &[f32] {
        &self.instance_colors
    }

    /// Instance index range occupied by ornaments of `shape`
    pub fn shape_range(&self, shape: OrnamentShape) -> Range<usize> {
        match shape {
            OrnamentShape::Sphere => 0..self.sphere_count,
            OrnamentShape::Box => self.sphere_count..self.items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn field() -> OrnamentField {
        OrnamentField::new(&SceneConfig::default(), &mut StdRng::seed_from_u64(12345))
    }

    fn test_item() -> OrnamentItem {
        OrnamentItem {
            scatter_position: Vec3::new(0.0, 10.0, 0.0),
            tree_position: Vec3::new(2.0, -3.0, 1.0),
            rotation: Vec3::new(0.5, 1.0, 0.0),
            scale: 0.4,
            shape: OrnamentShape::Sphere,
            color: Rgb::from_u32(0xD4AF37),
            float_speed: 0.5,
            phase: 3.0,
        }
    }

    #[test]
    fn test_field_creation() {
        let field = field();
        assert_eq!(field.len(), 150);
        assert_eq!(field.instance_matrices().len(), 150 * INSTANCE_STRIDE);
        assert_eq!(field.instance_colors().len(), 150 * COLOR_STRIDE);
        assert_eq!(field.progress(), 0.0);
    }

    #[test]
    fn test_items_grouped_by_shape() {
        let field = field();
        let spheres = field.shape_range(OrnamentShape::Sphere);
        let boxes = field.shape_range(OrnamentShape::Box);

        assert_eq!(spheres.start, 0);
        assert_eq!(spheres.end, boxes.start);
        assert_eq!(boxes.end, field.len());
        assert!(field.items()[spheres]
            .iter()
            .all(|i| i.shape == OrnamentShape::Sphere));
        assert!(field.items()[boxes]
            .iter()
            .all(|i| i.shape == OrnamentShape::Box));
    }

    #[test]
    fn test_item_ranges() {
        let field = field();
        let palette = SceneConfig::default().palette;
        for item in field.items() {
            assert!(item.scale >= 0.2 && item.scale <= 0.6);
            assert!(item.float_speed >= 0.2 && item.float_speed <= 0.7);
            assert_eq!(item.rotation.z, 0.0);
            assert!(item.color == palette.gold || item.color == palette.gold_light);
        }
    }

    #[test]
    fn test_colors_fixed_across_updates() {
        let mut field = field();
        let before = field.instance_colors().to_vec();
        for frame in 0..60 {
            field.update(TransitionState::TreeShape, frame as f32 / 60.0);
        }
        assert_eq!(field.instance_colors(), &before[..]);
        assert_eq!(&before[0..3], &field.items()[0].color.0[..]);
    }

    #[test]
    fn test_slower_than_particles() {
        let mut field = field();
        let progress = field.update(TransitionState::TreeShape, 0.0);
        assert!((progress - ORNAMENT_SMOOTHING).abs() < 0.00001);
        assert!(ORNAMENT_SMOOTHING < crate::particles::PARTICLE_SMOOTHING);
    }

    #[test]
    fn test_transform_decomposes() {
        let item = test_item();
        let (time, eased) = (1.7, 0.4);
        let m = item.transform(time, eased);
        let (scale, rotation, translation) = m.to_scale_rotation_translation();

        assert!((translation - item.position(time, eased)).length() < 0.0001);
        assert!((scale - Vec3::splat(item.scale_at(time))).length() < 0.0001);

        let r = item.rotation_at(time, eased);
        let expected = Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
        assert!(rotation.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn test_x_spin_freezes_on_tree() {
        let item = test_item();
        for time in [0.0, 5.0, 50.0] {
            let r = item.rotation_at(time, 1.0);
            assert!((r.x - item.rotation.x).abs() < 0.0001);
            assert!((r.y - (item.rotation.y + time * 0.3)).abs() < 0.0001);
            assert_eq!(r.z, item.rotation.z);
        }

        let tumbling = item.rotation_at(10.0, 0.0);
        assert!((tumbling.x - (item.rotation.x + 2.0)).abs() < 0.0001);
    }

    #[test]
    fn test_scale_pulses_within_bounds() {
        let item = test_item();
        for i in 0..200 {
            let s = item.scale_at(i as f32 * 0.05);
            assert!(s >= item.scale * 0.6 - 0.0001);
            assert!(s <= item.scale * 1.0 + 0.0001);
        }
    }

    #[test]
    fn test_float_settles_on_tree() {
        let item = test_item();
        for i in 0..100 {
            let time = i as f32 * 0.21;
            let assembled = item.position(time, 1.0) - item.tree_position;
            assert!(assembled.y.abs() <= 0.01 + 0.0001);
            assert!(assembled.x.abs() <= 0.005 + 0.0001);

            let scattered = item.position(time, 0.0) - item.scatter_position;
            assert!(scattered.y.abs() <= 0.2 + 0.0001);
        }
    }

    #[test]
    fn test_instance_buffer_matches_items() {
        let mut field = field();
        for frame in 0..10 {
            field.update(TransitionState::TreeShape, frame as f32 * 0.1);
        }
        let time = 9 as f32 * 0.1;
        let eased = field.eased_progress();

        let i = field.len() / 2;
        let slot = &field.instance_matrices()[i * INSTANCE_STRIDE..(i + 1) * INSTANCE_STRIDE];
        let expected = field.items()[i].transform(time, eased).to_cols_array();
        for (a, b) in slot.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 0.0001);
        }
    }

    #[test]
    fn test_assembled_ornaments_on_tree() {
        let mut field = field();
        for frame in 0..1500 {
            field.update(TransitionState::TreeShape, frame as f32 / 60.0);
        }
        assert_eq!(field.progress(), 1.0);

        for item in field.items() {
            let p = item.mixed_position(field.eased_progress());
            assert!((p - item.tree_position).length() < 0.001);
        }
    }
}
