use std::f64::consts::TAU;

use crate::math::Dual2;

use super::ParamSurface;

/// The unit disc in the XZ plane, used to close the top of a [`Cylinder`](super::Cylinder).
///
/// Polar parameters: angle `s = 2πu`, radius `r = v`. The center `v = 0` is
/// a singular point with a zero normal.
#[derive(Debug, Clone, Copy, Default)]
pub struct CylinderCap;

impl ParamSurface for CylinderCap {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let s = u * TAU;
        let r = v;
        [s.cos() * r, Dual2::constant(0.0), s.sin() * r]
    }
}
