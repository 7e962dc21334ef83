use std::f64::consts::{PI, TAU};

use crate::math::Dual2;

use super::ParamSurface;

/// An immersion of the Klein bottle.
///
/// `u` runs along the bottle and `v` around its cross-section. The first half
/// (`U <= π`) is the bulb, the second half the neck that passes back through
/// the wall; the two branches meet continuously at `U = π`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Klein;

impl ParamSurface for Klein {
    fn eval(&self, u: Dual2, v: Dual2) -> [Dual2; 3] {
        let u = u * TAU;
        let v = v * TAU;
        let a = u.cos() * (u.sin() + 1.0) * 0.3;
        let b = u.sin() * 0.8;
        let c = u.cos() * -0.1 + 0.2;
        let (x, y) = if u.f > PI {
            (a + c * (v + PI).cos(), b)
        } else {
            (a + c * u.cos() * v.cos(), b + c * u.sin() * v.cos())
        };
        [x, y, c * v.sin()]
    }
}
