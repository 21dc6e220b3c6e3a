//! Easing helpers for fade and glitter animation

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smoothstep ease-in-out over `t` in [0, 1]. Clamps outside the interval.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A single eased pulse: rises from 0 to 1 at `t = 0.5`, falls back to 0.
/// Used for glitter perturbations that ease in and back out.
pub fn pulse(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    (std::f32::consts::PI * t).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert!((lerp(0.0, 10.0, 0.0) - 0.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 1.0) - 10.0).abs() < 1e-6);
        assert!((lerp(0.0, 10.0, 0.5) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn ease_in_out_endpoints_and_midpoint() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        // Clamped outside [0, 1]
        assert!(ease_in_out(-2.0).abs() < 1e-6);
        assert!((ease_in_out(3.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ease_in_out_is_monotonic() {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_in_out(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn pulse_rises_and_falls() {
        assert!(pulse(0.0).abs() < 1e-6);
        assert!((pulse(0.5) - 1.0).abs() < 1e-6);
        assert!(pulse(1.0).abs() < 1e-5);
    }
}
