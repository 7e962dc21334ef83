use std::f64::consts::{PI, SQRT_2};

use crate::math::Dual2;

use super::ParamSurface;

/// Boy's surface, an immersion of the real projective plane.
///
/// With `U = (u - 0.5)π`, `V = vπ` and
/// `d = 1.2 (3 - (3/√2) sin 3U sin 2V)`:
///
/// ```text
/// X = (cos²V cos 2U / √2 + cos U sin 2V) / d
/// Y = (cos²V sin 2U / √2 - sin U sin 2V) / d
/// Z = 3 cos²V / d
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Boy;

impl ParamSurface for Boy {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = (u - 0.5) * PI;
        let v = v * PI;
        let denom = ((u * 3.0).sin() * (v * 2.0).sin() * (-3.0 / SQRT_2) + 3.0) * 1.2;
        let cos_v2 = v.cos() * v.cos();
        let x = (cos_v2 * (u * 2.0).cos() / SQRT_2 + u.cos() * (v * 2.0).sin()) / denom;
        let y = (cos_v2 * (u * 2.0).sin() / SQRT_2 - u.sin() * (v * 2.0).sin()) / denom;
        let z = cos_v2 * 3.0 / denom;
        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn height_is_non_negative_and_bounded() {
        for i in 0..=10 {
            for j in 0..=10 {
                let p = Boy.position(f64::from(i) / 10.0, f64::from(j) / 10.0);
                assert!(p.z >= 0.0);
                assert!(p.z <= 3.0 / (1.2 * (3.0 - 3.0 / SQRT_2)) + 1e-9);
            }
        }
    }

    #[test]
    fn top_point_for_v_zero() {
        // cos V = 1, sin 2V = 0: denominator is 3.6 for every u.
        let p = Boy.position(0.5, 0.0);
        assert_abs_diff_eq!(p.z, 3.0 / 3.6, epsilon = 1e-12);
        assert_abs_diff_eq!(p.x, 1.0 / SQRT_2 / 3.6, epsilon = 1e-12);
    }
}
