use std::f64::consts::TAU;

use crate::math::Dual2;

use super::ParamSurface;

/// A torus around the Z axis.
///
/// `u` runs around the tube, `v` around the axis:
/// `P(u, v) = ((R + r cos U) cos V, (R + r cos U) sin V, r sin U)`
/// with `U = 2πu`, `V = 2πv`.
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    /// Distance from the axis to the tube center.
    pub major_radius: f64,
    /// Tube radius.
    pub minor_radius: f64,
}

impl Torus {
    /// Creates a torus with the given radii.
    #[must_use]
    pub fn new(major_radius: f64, minor_radius: f64) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }
}

impl Default for Torus {
    fn default() -> Self {
        Self::new(1.0, 0.5)
    }
}

impl ParamSurface for Torus {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * TAU;
        let v = v * TAU;
        let d = u.cos() * self.minor_radius + self.major_radius;
        [d * v.cos(), d * v.sin(), u.sin() * self.minor_radius]
    }
}
