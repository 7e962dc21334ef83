use std::f64::consts::PI;

use crate::math::Dual2;

use super::ParamSurface;

/// A Möbius strip around the Z axis.
///
/// `u` runs once around the strip (`U = πu`, with the band turning by `2U`),
/// `v` across it (`W = (v - 0.5) * width`):
/// `P(u, v) = ((R + W cos U) cos 2U, (R + W cos U) sin 2U, W sin U)`.
///
/// The strip is one-sided: the normal at `u = 1` is the reverse of the
/// normal at the matching point `u = 0`.
#[derive(Debug, Clone, Copy)]
pub struct Mobius {
    /// Radius of the center line.
    pub radius: f64,
    /// Width of the band.
    pub width: f64,
}

impl Default for Mobius {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width: 0.5,
        }
    }
}

impl ParamSurface for Mobius {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * PI;
        let w = (v - 0.5) * self.width;
        let d = w * u.cos() + self.radius;
        let turn = u * 2.0;
        [d * turn.cos(), d * turn.sin(), w * u.sin()]
    }
}
