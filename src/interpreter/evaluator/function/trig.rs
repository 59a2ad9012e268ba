use std::f64::consts::FRAC_PI_2;

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::real_arg,
        },
        value::{
            complex::{ComplexNumber, ONE},
            core::Value,
        },
    },
};

/// Applies a unary builtin function to a numeric value.
///
/// The generated functions accept exactly one argument.
/// - Integers and reals use the real function and produce a real.
/// - Complex values use the complex variant and stay complex.
///
/// Non-numeric arguments produce a `TypeMismatch` error.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::trig::sin},
///     value::core::Value,
/// };
///
/// let x = Value::Real(std::f64::consts::PI / 2.0);
/// let r = sin(&mut Context::new(), &[x], 0).unwrap();
///
/// assert_eq!(r, Value::Real(1.0));
/// ```
macro_rules! real_complex_builtin {
    ($fname:ident, $real_fn:ident, $complex_fn:ident) => {
        #[doc = concat!("The `", stringify!($fname), "` builtin.")]
        pub fn $fname(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
            match &args[0] {
                Value::Complex(z) => Ok(Value::Complex(z.$complex_fn())),
                _ => Ok(Value::Real(real_arg(args, 0, offset)?.$real_fn())),
            }
        }
    };
}

/// Like `real_complex_builtin!`, but real arguments for which `$in_domain`
/// is false are handed to `$outside` and give a complex result.
macro_rules! restricted_builtin {
    ($fname:ident, $real_fn:ident, $complex_fn:ident, $in_domain:expr, $outside:expr) => {
        #[doc = concat!("The `", stringify!($fname), "` builtin.")]
        ///
        /// Real arguments outside the real domain yield a complex result.
        pub fn $fname(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
            if let Value::Complex(z) = &args[0] {
                return Ok(Value::Complex(z.$complex_fn()));
            }

            let x = real_arg(args, 0, offset)?;
            let in_domain: fn(f64) -> bool = $in_domain;
            if in_domain(x) {
                return Ok(Value::Real(x.$real_fn()));
            }

            let outside: fn(f64) -> ComplexNumber = $outside;
            Ok(Value::Complex(outside(x)))
        }
    };
}

real_complex_builtin!(sin, sin, sin);
real_complex_builtin!(cos, cos, cos);
real_complex_builtin!(tan, tan, tan);
real_complex_builtin!(atan, atan, atan);
real_complex_builtin!(sinh, sinh, sinh);
real_complex_builtin!(cosh, cosh, cosh);
real_complex_builtin!(tanh, tanh, tanh);
real_complex_builtin!(asinh, asinh, asinh);

restricted_builtin!(asin, asin, asin, |x| (-1.0..=1.0).contains(&x), real_asin_outside);
restricted_builtin!(acos, acos, acos, |x| (-1.0..=1.0).contains(&x), |x| {
    ComplexNumber::new(FRAC_PI_2, 0.0) - real_asin_outside(x)
});
restricted_builtin!(acosh, acosh, acosh, |x| x >= 1.0, |x| ComplexNumber::from(x).acosh());
restricted_builtin!(atanh, atanh, atanh, |x| (-1.0..=1.0).contains(&x), |x| {
    ComplexNumber::new(0.5 * ((1.0 + x) / (1.0 - x)).abs().ln(), FRAC_PI_2)
});

/// `asin(x)` for real `|x| > 1`, on the branch continuous from the upper half
/// plane: `sign(x) pi/2 + i ln(|x| + sqrt(x^2 - 1))`.
fn real_asin_outside(x: f64) -> ComplexNumber {
    let magnitude = x.abs();
    ComplexNumber::new(FRAC_PI_2.copysign(x),
                       (magnitude + magnitude.mul_add(magnitude, -1.0).sqrt()).ln())
}

/// `1 / f(x)` where `f` is cosine or sine.
fn reciprocal_of(args: &[Value],
                 offset: usize,
                 real: fn(f64) -> f64,
                 complex: fn(ComplexNumber) -> ComplexNumber)
                 -> EvalResult<Value> {
    if let Value::Complex(z) = &args[0] {
        let denominator = complex(*z);
        if denominator.is_zero() {
            return Err(EvalError::division_by_zero(offset));
        }
        return Ok(Value::Complex(ONE / denominator));
    }

    let denominator = real(real_arg(args, 0, offset)?);
    if denominator == 0.0 {
        return Err(EvalError::division_by_zero(offset));
    }
    Ok(Value::Real(denominator.recip()))
}

/// Secant, `1 / cos(x)`.
///
/// # Errors
/// `DomainError` where the cosine is exactly zero.
pub fn sec(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    reciprocal_of(args, offset, f64::cos, ComplexNumber::cos)
}

/// Cosecant, `1 / sin(x)`.
///
/// # Errors
/// `DomainError` at multiples of pi where the sine is exactly zero, such as 0.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::trig::csc},
///     value::core::Value,
/// };
///
/// assert!(csc(&mut Context::new(), &[Value::from(0)], 0).is_err());
/// ```
pub fn csc(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    reciprocal_of(args, offset, f64::sin, ComplexNumber::sin)
}

/// Cotangent, `1 / tan(x)`.
pub fn cot(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    reciprocal_of(args, offset, f64::tan, ComplexNumber::tan)
}

/// Angle of the point `(x, y)`, called as `atan2(y, x)`.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::trig::atan2},
///     value::core::Value,
/// };
///
/// let angle = atan2(&mut Context::new(), &[Value::from(1), Value::from(-1)], 0).unwrap();
/// assert_eq!(angle, Value::Real(3.0 * std::f64::consts::FRAC_PI_4));
/// ```
pub fn atan2(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let y = real_arg(args, 0, offset)?;
    let x = real_arg(args, 1, offset)?;
    Ok(Value::Real(y.atan2(x)))
}

/// `sqrt(x^2 + y^2)`.
pub fn hypot(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let x = real_arg(args, 0, offset)?;
    let y = real_arg(args, 1, offset)?;
    Ok(Value::Real(x.hypot(y)))
}

/// Unnormalized sinc, `sin(x) / x` with `sinc(0) = 1`.
pub fn sinc(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    if let Value::Complex(z) = &args[0] {
        if z.is_zero() {
            return Ok(Value::Complex(ONE));
        }
        return Ok(Value::Complex(z.sin() / *z));
    }

    let x = real_arg(args, 0, offset)?;
    Ok(Value::Real(if x == 0.0 { 1.0 } else { x.sin() / x }))
}

/// Converts an angle from radians to degrees.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::trig::deg},
///     value::core::Value,
/// };
///
/// let d = deg(&mut Context::new(), &[Value::Real(std::f64::consts::PI)], 0).unwrap();
/// assert_eq!(d, Value::Real(180.0));
/// ```
pub fn deg(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(real_arg(args, 0, offset)?.to_degrees()))
}

/// Converts an angle from degrees to radians.
pub fn rad(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(real_arg(args, 0, offset)?.to_radians()))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::error::EvalErrorKind;

    fn call(f: fn(&mut Context, &[Value], usize) -> EvalResult<Value>, x: Value) -> Value {
        f(&mut Context::new(), &[x], 0).unwrap()
    }

    fn complex(value: &Value) -> ComplexNumber {
        match value {
            Value::Complex(z) => *z,
            other => panic!("expected a complex result, got {other}"),
        }
    }

    #[test]
    fn asin_outside_unit_interval_is_complex() {
        let z = complex(&call(asin, Value::from(2)));
        assert!((z.real - FRAC_PI_2).abs() < 1e-12);
        assert!((z.imaginary - (2.0 + 3f64.sqrt()).ln()).abs() < 1e-12);

        let z = complex(&call(asin, Value::from(-2)));
        assert!((z.real + FRAC_PI_2).abs() < 1e-12);
        assert!(z.imaginary > 0.0);
    }

    #[test]
    fn acos_outside_unit_interval_is_complex() {
        let z = complex(&call(acos, Value::from(2)));
        assert!(z.real.abs() < 1e-12);
        assert!((z.imaginary + (2.0 + 3f64.sqrt()).ln()).abs() < 1e-12);
    }

    #[test]
    fn atanh_and_acosh_promote_outside_their_domain() {
        let z = complex(&call(atanh, Value::from(2)));
        assert!((z.real - 3f64.ln() / 2.0).abs() < 1e-12);
        assert!((z.imaginary - FRAC_PI_2).abs() < 1e-12);

        let z = complex(&call(acosh, Value::from(0)));
        assert!(z.real.abs() < 1e-12);
        assert!((z.imaginary - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn real_arguments_stay_real() {
        assert_eq!(call(asin, Value::from(1)), Value::Real(FRAC_PI_2));
        assert_eq!(call(sinc, Value::from(0)), Value::Real(1.0));
        assert_eq!(call(rad, Value::from(180)), Value::Real(PI));
    }

    #[test]
    fn text_argument_is_a_type_mismatch() {
        let err = sin(&mut Context::new(), &[Value::from("x")], 3).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert!(err.detail.contains("argument #1"));
    }
}
