use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::{
            binary::core::operand_mismatch,
            core::{Context, EvalResult},
        },
        value::{
            complex::{ComplexNumber, ZERO},
            core::Value,
        },
    },
    util::num::bigint_to_i64,
};

/// Largest exact integer power, measured in bits of the result.
pub const MAX_INTEGER_POWER_BITS: u64 = 1 << 22;

impl Context {
    /// Evaluates an exponentiation operation.
    ///
    /// - Integer to a non-negative integer power is exact; results wider than
    ///   [`MAX_INTEGER_POWER_BITS`] are a domain error.
    /// - Integer to a negative integer power is computed as a real.
    /// - A negative real base with a fractional exponent yields a complex
    ///   result.
    /// - Complex bases with integer exponents use repeated squaring, other
    ///   complex powers use `exp(w ln z)`.
    ///
    /// Zero to a negative power is a division by zero.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let result = Context::eval_pow(&Value::from(2), &Value::from(10), 0).unwrap();
    /// assert_eq!(result, Value::from(1024));
    ///
    /// let result = Context::eval_pow(&Value::from(2), &Value::from(-1), 0).unwrap();
    /// assert_eq!(result, Value::Real(0.5));
    ///
    /// assert!(matches!(Context::eval_pow(&Value::from(-8), &Value::Real(0.5), 0),
    ///                  Ok(Value::Complex(_))));
    /// ```
    pub fn eval_pow(base: &Value, exponent: &Value, offset: usize) -> EvalResult<Value> {
        use Value::{Complex, Integer, Real};

        match (base, exponent) {
            (Integer(b), Integer(e)) => integer_pow(b, e, offset),
            (Complex(_), _) | (_, Complex(_)) => {
                let b = base.as_complex(offset)?;
                match exponent {
                    Integer(e) => match bigint_to_i64(e) {
                        Some(e) => Ok(Complex(b.checked_powi(e, offset)?)),
                        None => Err(EvalError::domain("Exponent is too large", offset)),
                    },
                    Real(e) => complex_pow(b, ComplexNumber::from(*e), offset),
                    Complex(e) => complex_pow(b, *e, offset),
                    other => Err(operand_mismatch(BinaryOperator::Pow, base, other, offset)),
                }
            },
            (Integer(_) | Real(_), Integer(_) | Real(_)) => {
                let b = base.as_real(offset)?;
                let e = exponent.as_real(offset)?;

                if b == 0.0 && e < 0.0 {
                    return Err(EvalError::division_by_zero(offset));
                }
                if b < 0.0 && e.fract() != 0.0 {
                    return Ok(Complex(ComplexNumber::from(b).powf(e)));
                }
                Ok(Real(b.powf(e)))
            },
            _ => Err(operand_mismatch(BinaryOperator::Pow, base, exponent, offset)),
        }
    }
}

/// `b ^ e` for two integers.
fn integer_pow(b: &BigInt, e: &BigInt, offset: usize) -> EvalResult<Value> {
    if e.is_negative() {
        if b.is_zero() {
            return Err(EvalError::division_by_zero(offset));
        }
        let base = Value::Integer(b.clone()).as_real(offset)?;
        let exponent = Value::Integer(e.clone()).as_real(offset)?;
        return Ok(Value::Real(base.powf(exponent)));
    }

    if b.is_zero() {
        return Ok(Value::Integer(if e.is_zero() { BigInt::one() } else { BigInt::zero() }));
    }
    if b.is_one() {
        return Ok(Value::Integer(BigInt::one()));
    }
    if *b == -BigInt::one() {
        let odd = (e % 2u32).is_one();
        return Ok(Value::Integer(if odd { -BigInt::one() } else { BigInt::one() }));
    }

    let too_large = || EvalError::domain(format!("Result of {b} ^ {e} is too large"), offset);
    let exponent = e.to_u32().ok_or_else(too_large)?;
    if b.bits().saturating_mul(u64::from(exponent)) > MAX_INTEGER_POWER_BITS {
        return Err(too_large());
    }

    Ok(Value::Integer(b.pow(exponent)))
}

/// `b ^ e` through logarithms, with `0 ^ e` handled separately.
fn complex_pow(b: ComplexNumber, e: ComplexNumber, offset: usize) -> EvalResult<Value> {
    if b.is_zero() {
        if e.real > 0.0 {
            return Ok(Value::Complex(ZERO));
        }
        return Err(EvalError::division_by_zero(offset));
    }
    Ok(Value::Complex(b.powc(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    #[test]
    fn integer_powers_are_exact() {
        let result = Context::eval_pow(&Value::from(3), &Value::from(40), 0).unwrap();
        assert_eq!(result, Value::Integer(BigInt::from(3).pow(40)));
        assert_eq!(Context::eval_pow(&Value::from(-1), &Value::from(7), 0).unwrap(),
                   Value::from(-1));
    }

    #[test]
    fn enormous_integer_powers_are_rejected() {
        let err = Context::eval_pow(&Value::from(10), &Value::from(100_000_000), 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn zero_to_negative_power_divides_by_zero() {
        assert!(Context::eval_pow(&Value::from(0), &Value::from(-1), 0).is_err());
        assert!(Context::eval_pow(&Value::Real(0.0), &Value::Real(-0.5), 0).is_err());
    }

    #[test]
    fn complex_base_uses_repeated_squaring() {
        let base = Value::from(ComplexNumber::new(2.0, 3.0));
        assert_eq!(Context::eval_pow(&base, &Value::from(2), 0).unwrap(),
                   Value::from(ComplexNumber::new(-5.0, 12.0)));
    }
}
