use std::f64::consts::PI;

use crate::math::Dual2;

use super::ParamSurface;

/// Dini's surface: a twisted pseudosphere.
///
/// `U = 4πu` (two turns) and `V = 0.1 + 0.9v` keep away from the
/// singular rim at `V = 0`, where `ln(tan(V / 2))` diverges.
#[derive(Debug, Clone, Copy)]
pub struct Dini {
    /// Radius of the generating tractrix.
    pub a: f64,
    /// Pitch of the twist per radian of `U`.
    pub b: f64,
}

impl Default for Dini {
    fn default() -> Self {
        Self { a: 1.0, b: 0.15 }
    }
}

impl ParamSurface for Dini {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * (4.0 * PI);
        let v = v * 0.9 + 0.1;
        let x = u.cos() * v.sin() * self.a;
        let y = u.sin() * v.sin() * self.a;
        let z = (v.cos() + (v / 2.0).tan().ln()) * self.a + u * self.b + 3.0;
        [x, y, z]
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn one_turn_rises_by_the_pitch() {
        let d = Dini::default();
        let start = d.position(0.0, 0.4);
        let turn = d.position(0.5, 0.4);
        assert_abs_diff_eq!(turn.z - start.z, 0.15 * 2.0 * PI, epsilon = 1e-9);
        assert_abs_diff_eq!(turn.x, start.x, epsilon = 1e-9);
    }

    #[test]
    fn radius_is_sine_of_v() {
        let p = Dini::default().position(0.3, 1.0);
        assert_abs_diff_eq!(p.x.hypot(p.y), 1.0f64.sin(), epsilon = 1e-12);
    }
}
