use crate::math::Dual2;

use super::ParamSurface;

/// The square `[-1, 1] x [-1, 1]` in the XZ plane.
///
/// `P(u, v) = (2u - 1, 0, 2v - 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plane;

impl ParamSurface for Plane {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        [u * 2.0 - 1.0, Dual2::constant(0.0), v * 2.0 - 1.0]
    }
}
