use std::f64::consts::TAU;

use crate::math::Dual2;

use super::ParamSurface;

/// The tractricoid (pseudosphere), a surface of constant negative curvature.
///
/// `U = height * u`, `V = 2πv`:
/// `P(u, v) = (cos V / cosh U, sin V / cosh U, U - tanh U)`.
#[derive(Debug, Clone, Copy)]
pub struct Tractricoid {
    /// Extent of the `U` parameter along the axis.
    pub height: f64,
}

impl Default for Tractricoid {
    fn default() -> Self {
        Self { height: 3.0 }
    }
}

impl ParamSurface for Tractricoid {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * self.height;
        let v = v * TAU;
        [v.cos() / u.cosh(), v.sin() / u.cosh(), u - u.tanh()]
    }
}
