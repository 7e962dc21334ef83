//! Dual numbers over two parameters for forward-mode differentiation.
//!
//! A [`Dual2`] carries a scalar value `f` together with its gradient `d`
//! with respect to the surface parameters `(u, v)`. Every operator and
//! elementary function applies the chain rule, so any expression composed
//! from them yields the exact partial derivatives of the expression.
//!
//! Degenerate inputs are not trapped: division by zero or the logarithm of
//! a non-positive value yields IEEE infinities or NaN, which propagate.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::Vector2;

/// A scalar function of `(u, v)` evaluated at one point, with its gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual2 {
    /// Function value.
    pub f: f64,
    /// Partial derivatives `(df/du, df/dv)`.
    pub d: Vector2,
}

impl Dual2 {
    /// Creates a dual number from a value and gradient.
    #[must_use]
    pub fn new(f: f64, d: Vector2) -> Self {
        Self { f, d }
    }

    /// Creates a constant (zero gradient).
    #[must_use]
    pub fn constant(f: f64) -> Self {
        Self::new(f, Vector2::zeros())
    }

    /// Seeds the first surface parameter: gradient `(1, 0)`.
    #[must_use]
    pub fn u(value: f64) -> Self {
        Self::new(value, Vector2::new(1.0, 0.0))
    }

    /// Seeds the second surface parameter: gradient `(0, 1)`.
    #[must_use]
    pub fn v(value: f64) -> Self {
        Self::new(value, Vector2::new(0.0, 1.0))
    }

    /// Applies a scalar function with known derivative `df` at the value.
    fn chain(self, f: f64, df: f64) -> Self {
        Self::new(f, self.d * df)
    }

    #[must_use]
    pub fn exp(self) -> Self {
        let e = self.f.exp();
        self.chain(e, e)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        self.chain(self.f.sin(), self.f.cos())
    }

    #[must_use]
    pub fn cos(self) -> Self {
        self.chain(self.f.cos(), -self.f.sin())
    }

    /// Tangent, evaluated as `sin / cos` through the quotient rule.
    #[must_use]
    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    #[must_use]
    pub fn sinh(self) -> Self {
        self.chain(self.f.sinh(), self.f.cosh())
    }

    #[must_use]
    pub fn cosh(self) -> Self {
        self.chain(self.f.cosh(), self.f.sinh())
    }

    /// Hyperbolic tangent, evaluated as `sinh / cosh`.
    #[must_use]
    pub fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }

    /// Natural logarithm. Non-positive values give NaN or `-inf`.
    #[must_use]
    pub fn ln(self) -> Self {
        Self::new(self.f.ln(), self.d / self.f)
    }

    /// Raises to a constant exponent.
    #[must_use]
    pub fn pow(self, n: f64) -> Self {
        self.chain(self.f.powf(n), n * self.f.powf(n - 1.0))
    }

    #[must_use]
    pub fn sqrt(self) -> Self {
        self.pow(0.5)
    }
}

impl From<f64> for Dual2 {
    fn from(f: f64) -> Self {
        Self::constant(f)
    }
}

impl Add for Dual2 {
    type Output = Self;

    fn add(self, r: Self) -> Self {
        Self::new(self.f + r.f, self.d + r.d)
    }
}

impl Sub for Dual2 {
    type Output = Self;

    fn sub(self, r: Self) -> Self {
        Self::new(self.f - r.f, self.d - r.d)
    }
}

impl Mul for Dual2 {
    type Output = Self;

    fn mul(self, r: Self) -> Self {
        Self::new(self.f * r.f, r.d * self.f + self.d * r.f)
    }
}

impl Div for Dual2 {
    type Output = Self;

    fn div(self, r: Self) -> Self {
        Self::new(self.f / r.f, (self.d * r.f - r.d * self.f) / (r.f * r.f))
    }
}

impl Neg for Dual2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.f, -self.d)
    }
}

impl Add<f64> for Dual2 {
    type Output = Self;

    fn add(self, r: f64) -> Self {
        Self::new(self.f + r, self.d)
    }
}

impl Sub<f64> for Dual2 {
    type Output = Self;

    fn sub(self, r: f64) -> Self {
        Self::new(self.f - r, self.d)
    }
}

impl Mul<f64> for Dual2 {
    type Output = Self;

    fn mul(self, r: f64) -> Self {
        Self::new(self.f * r, self.d * r)
    }
}

impl Div<f64> for Dual2 {
    type Output = Self;

    fn div(self, r: f64) -> Self {
        Self::new(self.f / r, self.d / r)
    }
}

impl Add<Dual2> for f64 {
    type Output = Dual2;

    fn add(self, r: Dual2) -> Dual2 {
        r + self
    }
}

impl Sub<Dual2> for f64 {
    type Output = Dual2;

    fn sub(self, r: Dual2) -> Dual2 {
        Dual2::new(self - r.f, -r.d)
    }
}

impl Mul<Dual2> for f64 {
    type Output = Dual2;

    fn mul(self, r: Dual2) -> Dual2 {
        r * self
    }
}

impl Div<Dual2> for f64 {
    type Output = Dual2;

    fn div(self, r: Dual2) -> Dual2 {
        Dual2::constant(self) / r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const H: f64 = 1e-5;
    const FD_TOLERANCE: f64 = 1e-3;

    /// Compares the dual gradient of `f` against central finite differences.
    fn check_gradient(f: impl Fn(Dual2, Dual2) -> Dual2, u: f64, v: f64) {
        let at = |u: f64, v: f64| f(Dual2::constant(u), Dual2::constant(v)).f;
        let dual = f(Dual2::u(u), Dual2::v(v));
        let du = (at(u + H, v) - at(u - H, v)) / (2.0 * H);
        let dv = (at(u, v + H) - at(u, v - H)) / (2.0 * H);
        assert_abs_diff_eq!(dual.f, at(u, v), epsilon = 1e-12);
        assert_abs_diff_eq!(dual.d.x, du, epsilon = FD_TOLERANCE);
        assert_abs_diff_eq!(dual.d.y, dv, epsilon = FD_TOLERANCE);
    }

    const SAMPLES: [(f64, f64); 4] = [(0.3, 0.7), (0.9, 0.2), (0.55, 0.55), (0.1, 0.95)];

    #[test]
    fn seeds_are_unit_basis() {
        assert_eq!(Dual2::u(0.4).d, Vector2::new(1.0, 0.0));
        assert_eq!(Dual2::v(0.4).d, Vector2::new(0.0, 1.0));
        assert_eq!(Dual2::constant(2.0).d, Vector2::zeros());
    }

    #[test]
    fn arithmetic_matches_finite_differences() {
        for (u, v) in SAMPLES {
            check_gradient(|u, v| u + v * v, u, v);
            check_gradient(|u, v| u - v * 3.0, u, v);
            check_gradient(|u, v| u * v * u, u, v);
            check_gradient(|u, v| (u + 1.0) / (v + 0.5), u, v);
            check_gradient(|u, v| 2.0 / (u * v + 1.0) - v, u, v);
            check_gradient(|u, v| -(u * v) + 1.0 - u, u, v);
        }
    }

    #[test]
    fn product_and_quotient_rules() {
        let a = Dual2::new(2.0, Vector2::new(1.0, 3.0));
        let b = Dual2::new(4.0, Vector2::new(-1.0, 0.5));
        let p = a * b;
        assert_abs_diff_eq!(p.f, 8.0);
        assert_abs_diff_eq!(p.d.x, 2.0 * -1.0 + 1.0 * 4.0);
        assert_abs_diff_eq!(p.d.y, 2.0 * 0.5 + 3.0 * 4.0);

        let q = a / b;
        assert_abs_diff_eq!(q.f, 0.5);
        assert_abs_diff_eq!(q.d.x, (4.0 * 1.0 - -1.0 * 2.0) / 16.0);
        assert_abs_diff_eq!(q.d.y, (4.0 * 3.0 - 0.5 * 2.0) / 16.0);
    }

    #[test]
    fn elementary_functions_match_finite_differences() {
        for (u, v) in SAMPLES {
            check_gradient(|u, v| (u * v).exp(), u, v);
            check_gradient(|u, v| (u * 2.0 + v).sin(), u, v);
            check_gradient(|u, v| (u - v).cos() * v, u, v);
            check_gradient(|u, v| (u * 0.5 + v * 0.3).tan(), u, v);
            check_gradient(|u, v| (u * v).sinh(), u, v);
            check_gradient(|u, v| (u + v).cosh(), u, v);
            check_gradient(|u, v| (u - v * 2.0).tanh(), u, v);
            check_gradient(|u, v| (u + v * v + 0.1).ln(), u, v);
            check_gradient(|u, v| (u + v + 0.2).pow(2.5), u, v);
            check_gradient(|u, v| (u * u + v).sqrt(), u, v);
        }
    }

    #[test]
    fn nested_composition_matches_finite_differences() {
        for (u, v) in SAMPLES {
            check_gradient(
                |u, v| ((u * 6.0).sin() * (v * 3.0).cos()).exp() / (v.cosh() + u * u),
                u,
                v,
            );
        }
    }

    #[test]
    fn division_by_zero_propagates_non_finite() {
        let q = Dual2::u(1.0) / Dual2::constant(0.0);
        assert!(q.f.is_infinite());
        assert!(!q.d.x.is_finite());
    }

    #[test]
    fn log_of_non_positive_propagates_non_finite() {
        assert!(Dual2::u(0.0).ln().f.is_infinite());
        assert!(Dual2::u(-1.0).ln().f.is_nan());
    }
}
