use num_bigint::BigInt;
use num_traits::Zero;

use crate::interpreter::{
    evaluator::{
        core::{Context, EvalResult},
        utils::{complex_arg, real_arg},
    },
    value::{complex::ComplexNumber, core::Value},
};

/// Real part. Integers and reals are returned unchanged.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::complex_parts::re},
///     value::{complex::ComplexNumber, core::Value},
/// };
///
/// let z = Value::from(ComplexNumber::new(2.0, 3.0));
/// assert_eq!(re(&mut Context::new(), &[z], 0).unwrap(), Value::Real(2.0));
/// ```
pub fn re(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Complex(z) => Ok(Value::Real(z.real)),
        real => {
            real_arg(args, 0, offset)?;
            Ok(real.clone())
        },
    }
}

/// Imaginary part; zero of the same kind for integers and reals.
pub fn im(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Complex(z) => Ok(Value::Real(z.imaginary)),
        Value::Integer(_) => Ok(Value::Integer(BigInt::zero())),
        _ => {
            real_arg(args, 0, offset)?;
            Ok(Value::Real(0.0))
        },
    }
}

/// Complex conjugate. Integers and reals are their own conjugate.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::complex_parts::conj},
///     value::{complex::ComplexNumber, core::Value},
/// };
///
/// let z = Value::from(ComplexNumber::new(1.0, 5.0));
/// assert_eq!(conj(&mut Context::new(), &[z], 0).unwrap(),
///            Value::from(ComplexNumber::new(1.0, -5.0)));
/// ```
pub fn conj(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Complex(z) => Ok(Value::Complex(z.conj())),
        real => {
            real_arg(args, 0, offset)?;
            Ok(real.clone())
        },
    }
}

/// Phase angle in `(-pi, pi]`; `pi` for negative reals.
pub fn arg(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(complex_arg(args, 0, offset)?.arg()))
}

/// The polar form `[|z|, arg z]`.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::complex_parts::polar},
///     value::core::Value,
/// };
///
/// let result = polar(&mut Context::new(), &[Value::from(-2)], 0).unwrap();
/// assert_eq!(result.to_string(), format!("[2, {}]", std::f64::consts::PI));
/// ```
pub fn polar(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let z = complex_arg(args, 0, offset)?;
    Ok(Value::from(vec![Value::Real(z.abs()), Value::Real(z.arg())]))
}

/// The complex number with modulus `r` and argument `theta`.
pub fn rect(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let modulus = real_arg(args, 0, offset)?;
    let argument = real_arg(args, 1, offset)?;
    Ok(Value::Complex(ComplexNumber::from_polar(modulus, argument)))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn parts_of_real_numbers() {
        let mut context = Context::new();
        assert_eq!(re(&mut context, &[Value::from(4)], 0).unwrap(), Value::from(4));
        assert_eq!(im(&mut context, &[Value::from(4)], 0).unwrap(), Value::from(0));
        assert_eq!(im(&mut context, &[Value::Real(4.5)], 0).unwrap(), Value::Real(0.0));
    }

    #[test]
    fn rect_inverts_polar() {
        let mut context = Context::new();
        let Value::Complex(z) = rect(&mut context, &[Value::from(2), Value::Real(FRAC_PI_2)], 0)
                                    .unwrap()
        else {
            panic!("rect must produce a complex number");
        };
        assert!(z.real.abs() < 1e-12);
        assert!((z.imaginary - 2.0).abs() < 1e-12);
    }

    #[test]
    fn text_has_no_real_part() {
        assert!(re(&mut Context::new(), &[Value::from("z")], 0).is_err());
    }
}
