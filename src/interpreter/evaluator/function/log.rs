use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::real_arg,
        },
        value::{complex::ComplexNumber, core::Value},
    },
};

/// `e` raised to the argument.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::log::exp},
///     value::core::Value,
/// };
///
/// assert_eq!(exp(&mut Context::new(), &[Value::from(0)], 0).unwrap(), Value::Real(1.0));
/// ```
pub fn exp(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Complex(z) => Ok(Value::Complex(z.exp())),
        _ => Ok(Value::Real(real_arg(args, 0, offset)?.exp())),
    }
}

/// Natural logarithm.
///
/// Positive reals give a real, negative reals and complex numbers give the
/// principal complex logarithm.
///
/// # Errors
/// `DomainError` for zero.
pub fn ln(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    natural_log(args, 0, offset)
}

/// Computes the logarithm of a value with respect to a given base.
///
/// Accepts one or two arguments: `value` and `base`, which defaults to 10.
/// `log_base(value) = ln(value) / ln(base)`.
///
/// # Errors
/// - `DomainError` when `value` or `base` is zero.
/// - `DomainError` for base 1, whose logarithm is zero.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::log::log},
///     value::core::Value,
/// };
///
/// let mut context = Context::new();
///
/// let result = log(&mut context, &[Value::from(8), Value::from(2)], 0).unwrap();
/// assert!(matches!(result, Value::Real(x) if (x - 3.0).abs() < 1e-12));
///
/// let result = log(&mut context, &[Value::from(1000)], 0).unwrap();
/// assert!(matches!(result, Value::Real(x) if (x - 3.0).abs() < 1e-12));
/// ```
pub fn log(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let value = natural_log(args, 0, offset)?;
    let base = if args.len() > 1 {
        natural_log(args, 1, offset)?
    } else {
        Value::Real(10f64.ln())
    };

    match (value, base) {
        (Value::Real(a), Value::Real(b)) => {
            if b == 0.0 {
                return Err(EvalError::division_by_zero(offset));
            }
            Ok(Value::Real(a / b))
        },
        (a, b) => {
            let a = a.as_complex(offset)?;
            let b = b.as_complex(offset)?;
            if b.is_zero() {
                return Err(EvalError::division_by_zero(offset));
            }
            Ok(Value::Complex(a / b))
        },
    }
}

/// Base 10 logarithm.
pub fn log10(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    log(context, &args[..1], offset)
}

/// `ln` of argument `index`, real when possible.
fn natural_log(args: &[Value], index: usize, offset: usize) -> EvalResult<Value> {
    let undefined = || EvalError::domain("Logarithm of zero is undefined", offset);

    match &args[index] {
        Value::Complex(z) => {
            if z.is_zero() {
                return Err(undefined());
            }
            Ok(Value::Complex(z.ln()))
        },
        _ => {
            let x = real_arg(args, index, offset)?;
            if x == 0.0 {
                return Err(undefined());
            }
            if x < 0.0 {
                return Ok(Value::Complex(ComplexNumber::from(x).ln()));
            }
            Ok(Value::Real(x.ln()))
        },
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::error::EvalErrorKind;

    #[test]
    fn ln_of_negative_is_complex() {
        let result = ln(&mut Context::new(), &[Value::from(-1)], 0).unwrap();
        let Value::Complex(z) = result else {
            panic!("expected complex, got {result}");
        };
        assert!(z.real.abs() < 1e-12);
        assert!((z.imaginary - PI).abs() < 1e-12);
    }

    #[test]
    fn ln_of_zero_is_a_domain_error() {
        let err = ln(&mut Context::new(), &[Value::Real(0.0)], 4).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn log_base_one_is_rejected() {
        let err = log(&mut Context::new(), &[Value::from(5), Value::from(1)], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn log10_defaults_to_base_ten() {
        let result = log10(&mut Context::new(), &[Value::Real(0.01)], 0).unwrap();
        assert!(matches!(result, Value::Real(x) if (x + 2.0).abs() < 1e-12));
    }
}
