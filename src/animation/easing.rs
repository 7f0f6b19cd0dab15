//! Easing helpers for the morph factor

/// Cubic ease-in-out on t in [0, 1]; the input is clamped first.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear interpolation from `a` to `b`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn test_ease_monotonic() {
        let mut prev = 0.0;
        for i in 0..=1000 {
            let t = i as f32 / 1000.0;
            let v = ease_in_out_cubic(t);
            assert!(v >= prev, "ease should be monotonic at t={}", t);
            prev = v;
        }
    }

    #[test]
    fn test_ease_symmetric() {
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let sum = ease_in_out_cubic(t) + ease_in_out_cubic(1.0 - t);
            assert!((sum - 1.0).abs() < 0.0001, "asymmetric at t={}", t);
        }
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease_in_out_cubic(-0.5), 0.0);
        assert_eq!(ease_in_out_cubic(1.5), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
        assert_eq!(lerp(0.5, 0.1, 0.0), 0.5);
        assert!((lerp(0.5, 0.1, 1.0) - 0.1).abs() < 0.0001);
    }
}
