use std::{
    f64::consts::FRAC_PI_2,
    fmt::Display,
    hash::{Hash, Hasher},
    ops,
};

use ordered_float::OrderedFloat;

use crate::{
    error::EvalError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::format_complex,
};

/// `0` as a complex number.
pub const ZERO: ComplexNumber = ComplexNumber::new(0.0, 0.0);
/// `1` as a complex number.
pub const ONE: ComplexNumber = ComplexNumber::new(1.0, 0.0);
/// The imaginary unit `i`.
pub const I: ComplexNumber = ComplexNumber::new(0.0, 1.0);

/// Represents a complex number with real and imaginary parts.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    /// The real part of the number.
    pub real:      f64,
    /// The imaginary part of the number.
    pub imaginary: f64,
}

impl Display for ComplexNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_complex(self.real, self.imaginary))
    }
}

impl ComplexNumber {
    /// Constructs a new complex number from real and imaginary components.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(5.0, -1.0);
    /// assert_eq!(c.real, 5.0);
    /// assert_eq!(c.imaginary, -1.0);
    /// ```
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Converts to a `Value::Real` if the imaginary part is exactly zero,
    /// otherwise returns `Value::Complex`.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::{complex::ComplexNumber, core::Value};
    /// let real = ComplexNumber::new(3.0, 0.0);
    /// assert_eq!(real.checked_as_real(), Value::Real(3.0));
    ///
    /// let complex = ComplexNumber::new(2.0, 1.0);
    /// assert!(matches!(complex.checked_as_real(), Value::Complex(_)));
    /// ```
    #[must_use]
    pub const fn checked_as_real(&self) -> Value {
        if self.imaginary == 0.0 {
            Value::Real(self.real)
        } else {
            Value::Complex(*self)
        }
    }

    /// Returns `true` if both parts are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.real == 0.0 && self.imaginary == 0.0
    }

    /// Returns `true` if both parts are finite.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }

    /// Returns the absolute value (magnitude) of the complex number.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(3.0, 4.0);
    /// assert_eq!(c.abs(), 5.0);
    /// ```
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// Returns the complex conjugate of the number.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(1.0, 5.0);
    /// assert_eq!(c.conj(), ComplexNumber::new(1.0, -5.0));
    /// ```
    #[must_use]
    pub const fn conj(&self) -> Self {
        Self { real:      self.real,
               imaginary: -self.imaginary, }
    }

    /// Returns the reciprocal `1/z`.
    #[must_use]
    pub const fn recip(&self) -> Self {
        let norm_squared = self.real * self.real + self.imaginary * self.imaginary;

        Self { real:      self.real / norm_squared,
               imaginary: -(self.imaginary / norm_squared), }
    }

    /// Returns the argument (phase angle) in radians, in `(-pi, pi]`.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(0.0, 1.0);
    /// assert!((c.arg() - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn arg(self) -> f64 {
        self.imaginary.atan2(self.real)
    }

    /// Builds a complex number from its modulus and argument.
    #[must_use]
    pub fn from_polar(modulus: f64, argument: f64) -> Self {
        Self { real:      modulus * argument.cos(),
               imaginary: modulus * argument.sin(), }
    }

    /// Raises the complex number to an integer power by repeated squaring.
    ///
    /// # Errors
    /// - `DomainError` when zero is raised to a negative power.
    /// - `DomainError` when an intermediate result overflows.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::{ComplexNumber, ONE};
    /// let c = ComplexNumber::new(2.0, 3.0);
    /// assert_eq!(c.checked_powi(0, 0).unwrap(), ONE);
    /// assert_eq!(c.checked_powi(2, 0).unwrap(), ComplexNumber::new(-5.0, 12.0));
    /// ```
    pub fn checked_powi(self, exp: i64, offset: usize) -> EvalResult<Self> {
        if exp == 0 {
            return Ok(ONE);
        }

        if self.is_zero() && exp < 0 {
            return Err(EvalError::division_by_zero(offset));
        }

        let overflow = || EvalError::domain("Complex power overflows", offset);

        let mut base = self;
        let mut result = ONE;
        let mut n = exp.unsigned_abs();

        while n > 0 {
            if n % 2 == 1 {
                result *= base;
                if !result.is_finite() {
                    return Err(overflow());
                }
            }
            n /= 2;
            if n > 0 {
                base = base * base;
                if !base.is_finite() {
                    return Err(overflow());
                }
            }
        }

        if exp < 0 {
            result = result.recip();
        }

        Ok(result)
    }

    /// Raises the complex number to a real power using the polar form.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(-4.0, 0.0);
    /// let res = c.powf(0.5);
    /// assert!(res.real.abs() < 1e-10);
    /// assert!((res.imaginary - 2.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn powf(self, exp: f64) -> Self {
        Self::from_polar(self.abs().powf(exp), self.arg() * exp)
    }

    /// Raises the complex number to a complex power, `exp(w ln z)`.
    ///
    /// `0^w` is zero for any `w` with a positive real part.
    #[must_use]
    pub fn powc(self, exp: Self) -> Self {
        if self.is_zero() {
            return ZERO;
        }
        (exp * self.ln()).exp()
    }

    /// Returns the principal square root of the complex number.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(-9.0, 0.0);
    /// let s = c.sqrt();
    /// assert!(s.real.abs() < 1e-10);
    /// assert!((s.imaginary - 3.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        let a = self.real;
        let b = self.imaginary;
        let r = a.hypot(b);

        let real = f64::midpoint(r, a).sqrt();
        let imaginary = ((r - a) / 2.0).sqrt().copysign(b);

        Self { real, imaginary }
    }

    /// Returns the sine of the complex number.
    #[must_use]
    pub fn sin(self) -> Self {
        Self { real:      self.real.sin() * self.imaginary.cosh(),
               imaginary: self.real.cos() * self.imaginary.sinh(), }
    }

    /// Returns the cosine of the complex number.
    #[must_use]
    pub fn cos(self) -> Self {
        Self { real:      self.real.cos() * self.imaginary.cosh(),
               imaginary: -self.real.sin() * self.imaginary.sinh(), }
    }

    /// Returns the tangent of the complex number.
    #[must_use]
    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    /// Returns the hyperbolic sine of the complex number.
    #[must_use]
    pub fn sinh(self) -> Self {
        Self { real:      self.real.sinh() * self.imaginary.cos(),
               imaginary: self.real.cosh() * self.imaginary.sin(), }
    }

    /// Returns the hyperbolic cosine of the complex number.
    #[must_use]
    pub fn cosh(self) -> Self {
        Self { real:      self.real.cosh() * self.imaginary.cos(),
               imaginary: self.real.sinh() * self.imaginary.sin(), }
    }

    /// Returns the hyperbolic tangent of the complex number.
    #[must_use]
    pub fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }

    /// Returns the exponential of the complex number.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let z = ComplexNumber::new(0.0, std::f64::consts::PI);
    /// assert!((z.exp().real + 1.0).abs() < 1e-10);
    /// assert!(z.exp().imaginary.abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn exp(self) -> Self {
        Self::from_polar(self.real.exp(), self.imaginary)
    }

    /// Returns the principal natural logarithm of the complex number.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::complex::ComplexNumber;
    /// let z = ComplexNumber::new(-1.0, 0.0);
    /// let ln = z.ln();
    /// assert!(ln.real.abs() < 1e-10);
    /// assert!((ln.imaginary - std::f64::consts::PI).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn ln(self) -> Self {
        Self { real:      self.abs().ln(),
               imaginary: self.arg(), }
    }

    /// Principal inverse sine, `-i ln(iz + sqrt(1 - z^2))`.
    #[must_use]
    pub fn asin(self) -> Self {
        let root = (ONE - self * self).sqrt();
        -(I * (I * self + root).ln())
    }

    /// Principal inverse cosine, `pi/2 - asin(z)`.
    #[must_use]
    pub fn acos(self) -> Self {
        Self::new(FRAC_PI_2, 0.0) - self.asin()
    }

    /// Principal inverse tangent, `i/2 (ln(1 - iz) - ln(1 + iz))`.
    #[must_use]
    pub fn atan(self) -> Self {
        let iz = I * self;
        Self::new(0.0, 0.5) * ((ONE - iz).ln() - (ONE + iz).ln())
    }

    /// Principal inverse hyperbolic sine, `ln(z + sqrt(z^2 + 1))`.
    #[must_use]
    pub fn asinh(self) -> Self {
        (self + (self * self + ONE).sqrt()).ln()
    }

    /// Principal inverse hyperbolic cosine, `ln(z + sqrt(z + 1) sqrt(z - 1))`.
    #[must_use]
    pub fn acosh(self) -> Self {
        (self + (self + ONE).sqrt() * (self - ONE).sqrt()).ln()
    }

    /// Principal inverse hyperbolic tangent, `(ln(1 + z) - ln(1 - z)) / 2`.
    #[must_use]
    pub fn atanh(self) -> Self {
        Self::new(0.5, 0.0) * ((ONE + self).ln() - (ONE - self).ln())
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { real:      -self.real,
               imaginary: -self.imaginary, }
    }
}

impl ops::Add for ComplexNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self { real:      self.real + rhs.real,
               imaginary: self.imaginary + rhs.imaginary, }
    }
}

impl ops::AddAssign for ComplexNumber {
    fn add_assign(&mut self, rhs: Self) {
        self.real += rhs.real;
        self.imaginary += rhs.imaginary;
    }
}

impl ops::Sub for ComplexNumber {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self { real:      self.real - rhs.real,
               imaginary: self.imaginary - rhs.imaginary, }
    }
}

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self { real:      self.real
                              .mul_add(rhs.real, -(self.imaginary * rhs.imaginary)),
               imaginary: self.real.mul_add(rhs.imaginary, self.imaginary * rhs.real), }
    }
}

impl ops::MulAssign for ComplexNumber {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl ops::Mul<f64> for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self { real:      self.real * rhs,
               imaginary: self.imaginary * rhs, }
    }
}

impl ops::Div for ComplexNumber {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        let denom = rhs.real.mul_add(rhs.real, rhs.imaginary * rhs.imaginary);
        Self { real:      self.real.mul_add(rhs.real, self.imaginary * rhs.imaginary) / denom,
               imaginary: self.imaginary
                              .mul_add(rhs.real, -(self.real * rhs.imaginary))
                          / denom, }
    }
}

impl<T> From<T> for ComplexNumber where T: Into<f64>
{
    fn from(value: T) -> Self {
        Self { real:      value.into(),
               imaginary: 0.0, }
    }
}

impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.real) == OrderedFloat(other.real)
        && OrderedFloat(self.imaginary) == OrderedFloat(other.imaginary)
    }
}

impl Eq for ComplexNumber {}

impl Hash for ComplexNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.real).hash(state);
        OrderedFloat(self.imaginary).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: ComplexNumber, b: ComplexNumber) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn squares_by_repeated_multiplication() {
        let z = ComplexNumber::new(2.0, 3.0);
        assert_eq!(z.checked_powi(2, 0).unwrap(), ComplexNumber::new(-5.0, 12.0));
        assert!(close(z.checked_powi(-1, 0).unwrap(), z.recip()));
    }

    #[test]
    fn zero_to_negative_power_is_an_error() {
        assert!(ZERO.checked_powi(-2, 7).is_err());
    }

    #[test]
    fn inverse_functions_undo_forward_functions() {
        let z = ComplexNumber::new(0.3, -0.7);
        assert!(close(z.sin().asin(), z));
        assert!(close(z.cos().acos(), z));
        assert!(close(z.tan().atan(), z));
        assert!(close(z.sinh().asinh(), z));
        assert!(close(z.tanh().atanh(), z));
    }

    #[test]
    fn complex_power_matches_integer_power() {
        let z = ComplexNumber::new(1.5, 0.5);
        let expected = z.checked_powi(3, 0).unwrap();
        assert!((z.powc(ComplexNumber::new(3.0, 0.0)) - expected).abs() < 1e-9);
    }

    #[test]
    fn displays_in_canonical_form() {
        assert_eq!(ComplexNumber::new(-7.0, 22.0).to_string(), "-7 + 22i");
        assert_eq!(ComplexNumber::new(5.0, -4.0).to_string(), "5 - 4i");
        assert_eq!(ComplexNumber::new(0.0, 6.0).to_string(), "6i");
    }
}
