use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

/// Magnitude from which reals are written in exponent form.
pub const EXPONENT_FORM_ABOVE: f64 = 1e16;
/// Magnitude below which non-zero reals are written in exponent form.
pub const EXPONENT_FORM_BELOW: f64 = 1e-4;

/// Converts an arbitrary precision integer to `f64`.
///
/// Integers whose magnitude exceeds the `f64` range yield `None` instead of an
/// infinity.
///
/// # Example
/// ```
/// use mathly::util::num::bigint_to_f64;
/// use num_bigint::BigInt;
///
/// assert_eq!(bigint_to_f64(&BigInt::from(42)), Some(42.0));
/// assert_eq!(bigint_to_f64(&BigInt::from(10).pow(400)), None);
/// ```
#[must_use]
pub fn bigint_to_f64(value: &BigInt) -> Option<f64> {
    value.to_f64().filter(|x| x.is_finite())
}

/// Converts an `f64` to an arbitrary precision integer.
///
/// Returns `None` for non-finite or fractional values.
///
/// # Example
/// ```
/// use mathly::util::num::f64_to_bigint;
/// use num_bigint::BigInt;
///
/// assert_eq!(f64_to_bigint(4.0), Some(BigInt::from(4)));
/// assert_eq!(f64_to_bigint(4.5), None);
/// assert_eq!(f64_to_bigint(f64::NAN), None);
/// ```
#[must_use]
pub fn f64_to_bigint(value: f64) -> Option<BigInt> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    BigInt::from_f64(value)
}

/// Converts an integer to `usize` when it is non-negative and fits.
///
/// # Example
/// ```
/// use mathly::util::num::bigint_to_usize;
/// use num_bigint::BigInt;
///
/// assert_eq!(bigint_to_usize(&BigInt::from(7)), Some(7));
/// assert_eq!(bigint_to_usize(&BigInt::from(-1)), None);
/// ```
#[must_use]
pub fn bigint_to_usize(value: &BigInt) -> Option<usize> {
    value.to_usize()
}

/// Converts an integer to `i64` when it fits.
#[must_use]
pub fn bigint_to_i64(value: &BigInt) -> Option<i64> {
    value.to_i64()
}

/// Converts a length or count to `f64`.
///
/// Counts handled by the interpreter are far below `2^53`, so this is exact in
/// practice.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Writes a real number in canonical form.
///
/// - Integral values drop the fractional part: `3.0` is `3`.
/// - Magnitudes of at least `1e16` or below `1e-4` use exponent form without a
///   `+` sign or leading zeros: `5e99`, `1e-5`.
/// - Negative zero is written as `0`.
///
/// # Example
/// ```
/// use mathly::util::num::format_real;
///
/// assert_eq!(format_real(3.0), "3");
/// assert_eq!(format_real(2.5), "2.5");
/// assert_eq!(format_real(5e99), "5e99");
/// assert_eq!(format_real(1e-5), "1e-5");
/// assert_eq!(format_real(-0.0), "0");
/// ```
#[must_use]
pub fn format_real(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let magnitude = value.abs();
    if !(EXPONENT_FORM_BELOW..EXPONENT_FORM_ABOVE).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

/// Writes a complex number as `a + bi`, `a - bi`, `bi` or `a`.
///
/// # Example
/// ```
/// use mathly::util::num::format_complex;
///
/// assert_eq!(format_complex(2.0, 3.0), "2 + 3i");
/// assert_eq!(format_complex(8.0, -9.0), "8 - 9i");
/// assert_eq!(format_complex(0.0, 6.0), "6i");
/// assert_eq!(format_complex(5.0, 0.0), "5");
/// ```
#[must_use]
pub fn format_complex(real: f64, imaginary: f64) -> String {
    match (real == 0.0, imaginary == 0.0) {
        (_, true) => format_real(real),
        (true, false) => format!("{}i", format_real(imaginary)),
        (false, false) if imaginary.is_sign_negative() => {
            format!("{} - {}i", format_real(real), format_real(-imaginary))
        },
        (false, false) => format!("{} + {}i", format_real(real), format_real(imaginary)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_reals() {
        assert_eq!(format_real(19.0), "19");
        assert_eq!(format_real(-12.0), "-12");
        assert_eq!(format_real(0.015), "0.015");
        assert_eq!(format_real(1e15), "1000000000000000");
    }

    #[test]
    fn formats_extreme_reals_in_exponent_form() {
        assert_eq!(format_real(2.5e54), "2.5e54");
        assert_eq!(format_real(5e-99), "5e-99");
        assert_eq!(format_real(-2e-45), "-2e-45");
        assert_eq!(format_real(1e16), "1e16");
    }

    #[test]
    fn converts_between_bigint_and_f64() {
        assert_eq!(f64_to_bigint(-3.0), Some(BigInt::from(-3)));
        assert_eq!(f64_to_bigint(f64::INFINITY), None);
        assert_eq!(bigint_to_i64(&BigInt::from(-9)), Some(-9));
    }
}
