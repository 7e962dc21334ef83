use std::f64::consts::{PI, TAU};

use crate::math::Dual2;

use super::ParamSurface;

/// The unit sphere centered at the origin.
///
/// `P(u, v) = (cos(U) sin(V), sin(U) sin(V), cos(V))` with `U = 2πu`, `V = πv`.
/// `v = 0` and `v = 1` are the poles `(0, 0, 1)` and `(0, 0, -1)`, where the
/// tangent `dP/du` vanishes and the normal degenerates to zero.
///
/// With this parametrization `dP/du x dP/dv` points towards the center.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl ParamSurface for Sphere {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * TAU;
        let v = v * PI;
        [u.cos() * v.sin(), u.sin() * v.sin(), v.cos()]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::{Point3, Vector3};

    fn grid() -> impl Iterator<Item = (f64, f64)> {
        (0..=10).flat_map(|i| (0..=10).map(move |j| (f64::from(i) / 10.0, f64::from(j) / 10.0)))
    }

    #[test]
    fn every_sample_lies_on_the_unit_sphere() {
        for (u, v) in grid() {
            let p = Sphere.position(u, v);
            assert_abs_diff_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn poles() {
        assert_abs_diff_eq!(Sphere.position(0.3, 0.0), Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(Sphere.position(0.3, 1.0), Point3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn normal_degenerates_at_poles() {
        assert_abs_diff_eq!(Sphere.normal(0.6, 0.0), Vector3::zeros(), epsilon = 1e-12);
        assert_abs_diff_eq!(Sphere.normal(0.6, 1.0), Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn normal_is_radial_away_from_poles() {
        for (u, v) in grid().filter(|&(_, v)| v > 0.0 && v < 1.0) {
            let p = Sphere.position(u, v).coords;
            let n = Sphere.normal(u, v).normalize();
            assert_abs_diff_eq!(n.dot(&p), -1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn equator_tangents() {
        let (du, dv) = Sphere.tangents(0.0, 0.5);
        assert_abs_diff_eq!(du, Vector3::new(0.0, TAU, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(dv, Vector3::new(0.0, 0.0, -PI), epsilon = 1e-12);
    }
}
