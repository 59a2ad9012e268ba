use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::{
            binary::core::operand_mismatch,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
};

/// Widest operand, in bits, converted to a real for an inexact quotient.
const QUOTIENT_BITS: u64 = 1000;

impl Context {
    /// Evaluates a scalar arithmetic operation.
    ///
    /// The function handles integer, real and complex operands. Mixed types are
    /// promoted as needed. Division by zero is checked explicitly for all
    /// numeric categories. The operator must be one of `Add`, `Sub`, `Mul` or
    /// `Div`.
    ///
    /// Integer division stays exact when the divisor divides the dividend and
    /// produces a real otherwise.
    ///
    /// # Example
    /// ```
    /// use mathly::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_scalar_op(BinaryOperator::Div,
    ///                                      &Value::from(6),
    ///                                      &Value::from(3),
    ///                                      0).unwrap();
    /// assert_eq!(result, Value::from(2));
    ///
    /// let result = Context::eval_scalar_op(BinaryOperator::Mul,
    ///                                      &Value::Real(1.5),
    ///                                      &Value::Real(2.0),
    ///                                      0).unwrap();
    /// assert_eq!(result, Value::Real(3.0));
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          offset: usize)
                          -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mul, Sub};
        use Value::{Complex, Integer, Real};

        match (left, right) {
            (Complex(_), _) | (_, Complex(_)) => {
                let left = left.as_complex(offset)?;
                let right = right.as_complex(offset)?;

                Ok(Complex(match op {
                               Add => left + right,
                               Sub => left - right,
                               Mul => left * right,
                               Div => {
                                   if right.is_zero() {
                                       return Err(EvalError::division_by_zero(offset));
                                   }
                                   left / right
                               },
                               _ => {
                                   return Err(operand_mismatch(op,
                                                               &Complex(left),
                                                               &Complex(right),
                                                               offset));
                               },
                           }))
            },
            (Integer(a), Integer(b)) => integer_op(op, a, b, offset),
            (Integer(_) | Real(_), Integer(_) | Real(_)) => {
                let left = left.as_real(offset)?;
                let right = right.as_real(offset)?;

                Ok(Real(match op {
                            Add => left + right,
                            Sub => left - right,
                            Mul => left * right,
                            Div => {
                                if right == 0.0 {
                                    return Err(EvalError::division_by_zero(offset));
                                }
                                left / right
                            },
                            _ => {
                                return Err(operand_mismatch(op,
                                                            &Real(left),
                                                            &Real(right),
                                                            offset));
                            },
                        }))
            },
            _ => Err(operand_mismatch(op, left, right, offset)),
        }
    }
}

/// Exact integer arithmetic.
fn integer_op(op: BinaryOperator, a: &BigInt, b: &BigInt, offset: usize) -> EvalResult<Value> {
    use BinaryOperator::{Add, Div, Mul, Sub};

    match op {
        Add => Ok(Value::Integer(a + b)),
        Sub => Ok(Value::Integer(a - b)),
        Mul => Ok(Value::Integer(a * b)),
        Div => {
            if b.is_zero() {
                return Err(EvalError::division_by_zero(offset));
            }
            if (a % b).is_zero() {
                return Ok(Value::Integer(a / b));
            }
            real_quotient(a, b).map(Value::Real).ok_or_else(|| {
                EvalError::domain("Quotient of integers is too large for a real number", offset)
            })
        },
        _ => Err(operand_mismatch(op,
                                  &Value::Integer(a.clone()),
                                  &Value::Integer(b.clone()),
                                  offset)),
    }
}

/// `a / b` as a real, or `None` when it does not fit one.
///
/// Both magnitudes are shifted right by the same amount until the wider one
/// has at most [`QUOTIENT_BITS`] bits, so operands beyond the range of `f64`
/// still divide as long as their quotient does not.
fn real_quotient(a: &BigInt, b: &BigInt) -> Option<f64> {
    let shift = a.bits().max(b.bits()).saturating_sub(QUOTIENT_BITS);
    let x = (a.magnitude() >> shift).to_f64()?;
    let y = (b.magnitude() >> shift).to_f64()?;

    let quotient = x / y;
    if y == 0.0 || !quotient.is_finite() {
        return None;
    }
    Some(if a.is_negative() == b.is_negative() { quotient } else { -quotient })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::EvalErrorKind, interpreter::value::complex::ComplexNumber};

    #[test]
    fn integer_division_is_exact_when_possible() {
        let div = |a: i64, b: i64| {
            Context::eval_scalar_op(BinaryOperator::Div, &Value::from(a), &Value::from(b), 0)
        };
        assert_eq!(div(312, 6).unwrap(), Value::from(52));
        assert_eq!(div(10, 4).unwrap(), Value::Real(2.5));
        assert_eq!(div(1, 0).unwrap_err().kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn huge_integers_divide_into_reals() {
        let ten = BigInt::from(10);
        let big: BigInt = ten.pow(400) + 1;
        let small = ten.pow(399);

        let quotient = Context::eval_scalar_op(BinaryOperator::Div,
                                               &Value::Integer(big.clone()),
                                               &Value::Integer(small.clone()),
                                               0).unwrap();
        let Value::Real(q) = quotient else { panic!("expected a real, got {quotient}") };
        assert!((q - 10.0).abs() < 1e-12);

        let quotient = Context::eval_scalar_op(BinaryOperator::Div,
                                               &Value::Integer(-big.clone()),
                                               &Value::Integer(small * 3),
                                               0).unwrap();
        let Value::Real(q) = quotient else { panic!("expected a real, got {quotient}") };
        assert!((q + 10.0 / 3.0).abs() < 1e-12);

        let err = Context::eval_scalar_op(BinaryOperator::Div,
                                          &Value::Integer(big),
                                          &Value::from(-3),
                                          0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn complex_operands_promote_the_other_side() {
        let product = Context::eval_scalar_op(BinaryOperator::Mul,
                                              &Value::from(3),
                                              &Value::from(ComplexNumber::new(0.0, 2.0)),
                                              0).unwrap();
        assert_eq!(product, Value::from(ComplexNumber::new(0.0, 6.0)));
    }

    #[test]
    fn division_by_complex_zero_is_rejected() {
        let err = Context::eval_scalar_op(BinaryOperator::Div,
                                          &Value::from(ComplexNumber::new(1.0, 1.0)),
                                          &Value::from(0.0),
                                          2).unwrap_err();
        assert_eq!(err.offset, 2);
    }
}
