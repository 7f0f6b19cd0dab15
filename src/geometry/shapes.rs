use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Ornaments sit slightly inside the needles
const SHELL_INSET: f32 = 0.9;

/// Vertical coordinate and cone radius for a height ratio (0 = base, 1 = apex)
fn cone_slice(height_ratio: f32, max_radius: f32, height: f32) -> (f32, f32) {
    let y = (height_ratio - 0.5) * height;
    let radius_at_y = (1.0 - height_ratio) * max_radius;
    (y, radius_at_y)
}

/// Sample a point inside the tree cone at the given height ratio.
///
/// The cone is centred vertically on the origin, widest at the bottom and
/// closing to a point at the top. The radial distance uses `sqrt(u)` so that
/// points are uniform over the disc cross-section instead of clustering at
/// the trunk.
pub fn tree_position<R: Rng + ?Sized>(
    rng: &mut R,
    height_ratio: f32,
    max_radius: f32,
    height: f32,
) -> Vec3 {
    let (y, radius_at_y) = cone_slice(height_ratio, max_radius, height);
    let angle = rng.gen::<f32>() * TAU;
    let r = radius_at_y * rng.gen::<f32>().sqrt();

    Vec3::new(r * angle.cos(), y, r * angle.sin())
}

/// Sample a point on the outer shell of the tree cone, used for ornaments.
pub fn tree_shell_position<R: Rng + ?Sized>(
    rng: &mut R,
    height_ratio: f32,
    max_radius: f32,
    height: f32,
) -> Vec3 {
    let (y, radius_at_y) = cone_slice(height_ratio, max_radius, height);
    let r = radius_at_y * SHELL_INSET;
    let angle = rng.gen::<f32>() * TAU;

    Vec3::new(r * angle.cos(), y, r * angle.sin())
}

/// Random unit vector from a uniform sample of the centred unit cube.
/// Directions towards the cube corners are slightly favoured.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = rng.gen::<Vec3>() - Vec3::splat(0.5);
        if let Some(dir) = v.try_normalize() {
            return dir;
        }
    }
}

/// Sample a point in the spherical shell between `0.5 * radius` and `radius`.
pub fn scatter_position<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let magnitude = radius * (0.5 + rng.gen::<f32>() * 0.5);
    random_direction(rng) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    #[test]
    fn test_tree_position_height_is_exact() {
        let mut rng = rng();
        for i in 0..100 {
            let ratio = i as f32 / 100.0;
            let p = tree_position(&mut rng, ratio, 4.5, 12.0);
            assert_eq!(p.y, (ratio - 0.5) * 12.0);
        }
    }

    #[test]
    fn test_tree_position_within_cone() {
        let mut rng = rng();
        for _ in 0..2000 {
            let ratio: f32 = rng.gen();
            let p = tree_position(&mut rng, ratio, 4.5, 12.0);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radial <= (1.0 - ratio) * 4.5 + 0.0001);
        }
    }

    #[test]
    fn test_tree_position_apex() {
        let mut rng = rng();
        for _ in 0..50 {
            let p = tree_position(&mut rng, 1.0, 4.5, 12.0);
            assert!(p.x.abs() < 1e-6);
            assert!(p.z.abs() < 1e-6);
            assert!((p.y - 6.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tree_position_fills_disc() {
        // sqrt compensation: about a quarter of the samples fall inside half the radius
        let mut rng = rng();
        let n = 4000;
        let inner = (0..n)
            .map(|_| tree_position(&mut rng, 0.0, 1.0, 1.0))
            .filter(|p| (p.x * p.x + p.z * p.z).sqrt() < 0.5)
            .count();
        let fraction = inner as f32 / n as f32;
        assert!((fraction - 0.25).abs() < 0.05, "inner fraction {}", fraction);
    }

    #[test]
    fn test_tree_shell_position_on_shell() {
        let mut rng = rng();
        for _ in 0..200 {
            let ratio: f32 = rng.gen();
            let p = tree_shell_position(&mut rng, ratio, 4.5, 12.0);
            let radial = (p.x * p.x + p.z * p.z).sqrt();
            assert!((radial - (1.0 - ratio) * 4.5 * 0.9).abs() < 0.001);
            assert_eq!(p.y, (ratio - 0.5) * 12.0);
        }
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = rng();
        for _ in 0..500 {
            let d = random_direction(&mut rng);
            assert!((d.length() - 1.0).abs() < 0.0001);
        }
    }

    #[test]
    fn test_scatter_position_in_shell() {
        let mut rng = rng();
        for radius in [0.1, 1.0, 25.0, 300.0] {
            for _ in 0..500 {
                let len = scatter_position(&mut rng, radius).length();
                assert!(len >= 0.5 * radius * 0.9999, "{} too short for {}", len, radius);
                assert!(len <= radius * 1.0001, "{} too long for {}", len, radius);
            }
        }
    }
}
