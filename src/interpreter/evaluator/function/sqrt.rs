use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{complex_arg, real_arg},
        },
        value::{complex::ComplexNumber, core::Value},
    },
};

/// Computes the principal square root.
///
/// - Nonnegative integers and reals return a real square root.
/// - Negative integers and reals return a purely imaginary complex result.
/// - Complex values use their complex square root.
///
/// Non-numeric inputs produce a `TypeMismatch` error.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::sqrt::sqrt},
///     value::{complex::ComplexNumber, core::Value},
/// };
///
/// let mut context = Context::new();
///
/// assert_eq!(sqrt(&mut context, &[Value::from(9)], 0).unwrap(), Value::Real(3.0));
/// assert_eq!(sqrt(&mut context, &[Value::from(-4)], 0).unwrap(),
///            Value::Complex(ComplexNumber::new(0.0, 2.0)));
/// ```
pub fn sqrt(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Complex(z) => Ok(Value::Complex(z.sqrt())),
        _ => {
            let x = real_arg(args, 0, offset)?;
            if x < 0.0 {
                Ok(Value::Complex(ComplexNumber::new(0.0, (-x).sqrt())))
            } else {
                Ok(Value::Real(x.sqrt()))
            }
        },
    }
}

/// Computes the principal n-th root, `x ^ (1 / n)`.
///
/// A negative real `x` yields the principal complex root, so `root(-8, 3)` is
/// `1 + 1.732...i` rather than `-2`.
///
/// # Errors
/// - `DomainError` when `n` is zero.
/// - `TypeMismatch` when `n` is not real.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::sqrt::root},
///     value::core::Value,
/// };
///
/// let result = root(&mut Context::new(), &[Value::from(16), Value::from(4)], 0).unwrap();
/// assert_eq!(result, Value::Real(2.0));
/// ```
pub fn root(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let n = real_arg(args, 1, offset)?;
    if n == 0.0 {
        return Err(EvalError::domain("The zeroth root is undefined", offset));
    }

    match &args[0] {
        Value::Complex(_) => Ok(Value::Complex(complex_arg(args, 0, offset)?.powf(n.recip()))),
        _ => {
            let x = real_arg(args, 0, offset)?;
            if x < 0.0 {
                return Ok(Value::Complex(ComplexNumber::from(x).powf(n.recip())));
            }
            if x == 0.0 && n < 0.0 {
                return Err(EvalError::division_by_zero(offset));
            }
            Ok(Value::Real(x.powf(n.recip())))
        },
    }
}

/// `pow(x, p)`, the same as `x ^ p`.
pub fn pow(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    complex_arg(args, 0, offset)?;
    complex_arg(args, 1, offset)?;
    Context::eval_pow(&args[0], &args[1], offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    #[test]
    fn root_of_negative_is_principal() {
        let result = root(&mut Context::new(), &[Value::from(-8), Value::from(3)], 0).unwrap();
        let Value::Complex(z) = result else {
            panic!("expected complex, got {result}");
        };
        assert!((z.real - 1.0).abs() < 1e-12);
        assert!((z.imaginary - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zeroth_root_is_rejected() {
        let err = root(&mut Context::new(), &[Value::from(8), Value::from(0)], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn pow_keeps_integers_exact() {
        let result = pow(&mut Context::new(), &[Value::from(2), Value::from(64)], 0).unwrap();
        assert_eq!(result.to_string(), "18446744073709551616");
    }

    #[test]
    fn pow_rejects_text_with_argument_position() {
        let err = pow(&mut Context::new(), &[Value::from(2), Value::from("x")], 0).unwrap_err();
        assert!(err.detail.contains("argument #2"));
    }
}
