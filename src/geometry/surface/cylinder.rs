use std::f64::consts::TAU;

use crate::math::Dual2;

use super::ParamSurface;

/// An open unit-radius cylinder around the Y axis, from `y = 0` to `y = 1`.
///
/// `P(u, v) = (cos(U), v, sin(U))` with `U = 2πu`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cylinder;

impl ParamSurface for Cylinder {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * TAU;
        [u.cos(), v, u.sin()]
    }
}
