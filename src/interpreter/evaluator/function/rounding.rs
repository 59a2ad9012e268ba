use num_traits::{Signed, ToPrimitive};

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{complex_arg, integer_arg, real_arg},
        },
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::f64_to_bigint,
};

/// Largest number of decimal digits `round` accepts.
const MAX_ROUND_DIGITS: i64 = 300;

/// Generates a builtin that rounds a real to an integer.
///
/// Integers are returned unchanged, reals are rounded with `$real_fn` and
/// converted to an exact integer, and complex numbers are rounded part by
/// part.
macro_rules! rounding_builtin {
    ($fname:ident, $real_fn:ident, $doc:literal) => {
        #[doc = $doc]
        ///
        /// # Errors
        /// `DomainError` for infinite or NaN input.
        pub fn $fname(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
            match &args[0] {
                Value::Integer(n) => Ok(Value::Integer(n.clone())),
                Value::Complex(z) => {
                    Ok(Value::Complex(ComplexNumber::new(z.real.$real_fn(),
                                                         z.imaginary.$real_fn())))
                },
                _ => to_integer(real_arg(args, 0, offset)?.$real_fn(), offset),
            }
        }
    };
}

rounding_builtin!(ceil, ceil, "Rounds towards positive infinity.");
rounding_builtin!(floor, floor, "Rounds towards negative infinity.");
rounding_builtin!(trunc, trunc, "Rounds towards zero, dropping the fractional part.");

/// Rounds to the nearest integer, or to `digits` decimal places.
///
/// Ties go to the even neighbour. Without `digits` a real becomes an exact
/// integer; with `digits` the result keeps its kind. Complex numbers round
/// both parts. Negative `digits` round to tens, hundreds and so on.
///
/// # Errors
/// - `TypeMismatch` when `digits` is not an integer.
/// - `DomainError` for non-finite input or an absurd number of digits.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::rounding::round},
///     value::core::Value,
/// };
///
/// let mut context = Context::new();
///
/// assert_eq!(round(&mut context, &[Value::Real(2.5)], 0).unwrap(), Value::from(2));
/// assert_eq!(round(&mut context, &[Value::Real(36.146_783), Value::from(4)], 0).unwrap(),
///            Value::Real(36.1468));
/// assert_eq!(round(&mut context, &[Value::from(1234), Value::from(-2)], 0).unwrap(),
///            Value::from(1200));
/// ```
pub fn round(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let digits = match args.get(1) {
        Some(_) => {
            let digits = integer_arg(args, 1, offset)?;
            Some(digits.to_i64()
                       .filter(|d| d.abs() <= MAX_ROUND_DIGITS)
                       .ok_or_else(|| {
                           EvalError::domain(format!("Cannot round to {digits} digits"), offset)
                       })?)
        },
        None => None,
    };

    match (&args[0], digits) {
        (Value::Integer(n), None) => Ok(Value::Integer(n.clone())),
        (Value::Integer(n), Some(d)) if d >= 0 => Ok(Value::Integer(n.clone())),
        (Value::Integer(_), Some(d)) => to_integer(round_to(real_arg(args, 0, offset)?, d), offset),
        (Value::Complex(z), d) => {
            let d = d.unwrap_or(0);
            Ok(Value::Complex(ComplexNumber::new(round_to(z.real, d), round_to(z.imaginary, d))))
        },
        (_, None) => to_integer(real_arg(args, 0, offset)?.round_ties_even(), offset),
        (_, Some(d)) => Ok(Value::Real(round_to(real_arg(args, 0, offset)?, d))),
    }
}

/// Rounds `x` to `digits` decimal places, ties to even.
fn round_to(x: f64, digits: i64) -> f64 {
    let Ok(exponent) = i32::try_from(digits) else {
        return x;
    };
    if exponent < 0 {
        let scale = 10f64.powi(-exponent);
        return (x / scale).round_ties_even() * scale;
    }

    let scale = 10f64.powi(exponent);
    let scaled = x * scale;
    if !scaled.is_finite() {
        return x;
    }
    scaled.round_ties_even() / scale
}

/// Converts an integral `f64` to an exact integer value.
fn to_integer(x: f64, offset: usize) -> EvalResult<Value> {
    f64_to_bigint(x).map(Value::Integer)
                    .ok_or_else(|| EvalError::domain(format!("Cannot round {x}"), offset))
}

/// Returns the sign of a number.
///
/// Integers return `-1`, `0` or `1` and reals `-1.0`, `0.0` or `1.0`.
/// A complex number `z` returns `z / |z|`, or zero.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::rounding::sign},
///     value::core::Value,
/// };
///
/// let s = sign(&mut Context::new(), &[Value::from(-42)], 0).unwrap();
/// assert_eq!(s, Value::from(-1));
/// ```
pub fn sign(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.signum())),
        Value::Complex(z) => {
            if z.is_zero() {
                return Ok(Value::Complex(*z));
            }
            let modulus = z.abs();
            Ok(Value::Complex(ComplexNumber::new(z.real / modulus, z.imaginary / modulus)))
        },
        _ => {
            let x = real_arg(args, 0, offset)?;
            Ok(Value::Real(if x == 0.0 { 0.0 } else { x.signum() }))
        },
    }
}

/// Absolute value; the modulus for complex numbers.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::rounding::abs},
///     value::{complex::ComplexNumber, core::Value},
/// };
///
/// let z = Value::from(ComplexNumber::new(3.0, -4.0));
/// assert_eq!(abs(&mut Context::new(), &[z], 0).unwrap(), Value::Real(5.0));
/// ```
pub fn abs(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.abs())),
        Value::Real(x) => Ok(Value::Real(x.abs())),
        _ => Ok(Value::Real(complex_arg(args, 0, offset)?.abs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    fn call(f: fn(&mut Context, &[Value], usize) -> EvalResult<Value>, args: &[Value]) -> Value {
        f(&mut Context::new(), args, 0).unwrap()
    }

    #[test]
    fn reals_round_to_exact_integers() {
        assert_eq!(call(ceil, &[Value::Real(1.2)]), Value::from(2));
        assert_eq!(call(floor, &[Value::Real(-1.2)]), Value::from(-2));
        assert_eq!(call(trunc, &[Value::Real(-1.8)]), Value::from(-1));
        assert_eq!(call(round, &[Value::Real(3.5)]), Value::from(4));
    }

    #[test]
    fn complex_rounds_both_parts() {
        let z = Value::from(ComplexNumber::new(1.26, -3.74));
        assert_eq!(call(round, &[z, Value::from(1)]),
                   Value::from(ComplexNumber::new(1.3, -3.7)));
    }

    #[test]
    fn infinite_values_cannot_be_rounded() {
        let err = floor(&mut Context::new(), &[Value::Real(f64::INFINITY)], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn sign_and_abs_keep_the_kind() {
        assert_eq!(call(sign, &[Value::Real(-0.3)]), Value::Real(-1.0));
        assert_eq!(call(abs, &[Value::from(-7)]), Value::from(7));
    }

    #[test]
    fn digits_must_be_an_integer() {
        let err = round(&mut Context::new(), &[Value::Real(1.5), Value::Real(1.0)], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
    }
}
