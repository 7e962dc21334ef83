use std::f64::consts::TAU;

use crate::math::Dual2;

use super::ParamSurface;

/// A paraboloid of revolution `y = x² + z²` over the unit disc.
///
/// Polar parameters: angle `s = 2πu`, radius `r = v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paraboloid;

impl ParamSurface for Paraboloid {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let s = u * TAU;
        let r = v;
        let x = s.cos() * r;
        let z = s.sin() * r;
        let y = x * x + z * z;
        [x, y, z]
    }
}
