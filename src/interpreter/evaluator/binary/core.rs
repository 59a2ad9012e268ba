use num_traits::ToPrimitive;

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Longest text `Integer * Text` may build.
const MAX_REPEATED_TEXT: usize = 1 << 24;

impl Context {
    /// Evaluates a binary operation between two values.
    ///
    /// This function routes the operation to specialized handlers depending on
    /// the operator and operand types. Arithmetic operators choose between
    /// list, text or scalar evaluation. Power calls `eval_pow`.
    /// Equality uses the configured tolerance, ordering calls
    /// `eval_ordering`. Boolean operators call `eval_logic`, which also
    /// implements the set-like list operators.
    ///
    /// # Example
    /// ```
    /// use mathly::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new();
    ///
    /// let result = context.eval_binary(BinaryOperator::Add, &Value::from(3), &Value::from(4), 0);
    /// assert_eq!(result.unwrap(), Value::from(7));
    ///
    /// let result = context.eval_binary(BinaryOperator::Div, &Value::from(10), &Value::from(4), 0);
    /// assert_eq!(result.unwrap(), Value::Real(2.5));
    /// ```
    pub fn eval_binary(&self,
                       op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       offset: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Pow,
            Sub, Xor,
        };
        use Value::{Integer, List, Text};

        match op {
            Add | Sub | Mul | Div => match (left, right) {
                (List(a), List(b)) if matches!(op, Add | Sub) => Ok(self.eval_list_list(op, a, b)),
                (List(items), count) | (count, List(items)) if op == Mul => {
                    Self::repeat_list(items, count, offset)
                },
                (Text(a), Text(b)) if op == Add => Ok(Text(format!("{a}{b}"))),
                (Integer(n), Text(s)) | (Text(s), Integer(n)) if op == Mul => {
                    repeat_text(s, n, offset)
                },
                _ if left.is_numeric() && right.is_numeric() => {
                    Self::eval_scalar_op(op, left, right, offset)
                },
                _ => Err(operand_mismatch(op, left, right, offset)),
            },

            Pow => Self::eval_pow(left, right, offset),

            Equal => Ok(Value::Bool(self.values_equal(left, right))),
            NotEqual => Ok(Value::Bool(!self.values_equal(left, right))),

            Less | Greater | LessEqual | GreaterEqual => {
                Self::eval_ordering(op, left, right, offset)
            },

            And | Or | Xor => self.eval_logic(op, left, right, offset),
        }
    }
}

/// Builds the `TypeMismatch` for an operator applied to unsupported kinds.
pub(in crate::interpreter::evaluator) fn operand_mismatch(op: BinaryOperator,
                                                         left: &Value,
                                                         right: &Value,
                                                         offset: usize)
                                                         -> EvalError {
    EvalError::type_mismatch(format!("Cannot apply '{op}' to {} and {}",
                                     left.type_name(),
                                     right.type_name()),
                             offset)
}

/// Repeats `text` `count` times.
fn repeat_text(text: &str, count: &num_bigint::BigInt, offset: usize) -> EvalResult<Value> {
    let count = count.to_usize().ok_or_else(|| {
                                    EvalError::domain(format!("Cannot repeat text {count} \
                                                               times"),
                                                      offset)
                                })?;

    if text.len().saturating_mul(count) > MAX_REPEATED_TEXT {
        return Err(EvalError::domain("Repeated text would be too long", offset));
    }

    Ok(Value::Text(text.repeat(count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    #[test]
    fn concatenates_and_repeats_text() {
        let context = Context::new();
        let joined = context.eval_binary(BinaryOperator::Add,
                                         &Value::from("abc"),
                                         &Value::from("def"),
                                         0)
                            .unwrap();
        assert_eq!(joined, Value::from("abcdef"));

        let repeated = context.eval_binary(BinaryOperator::Mul,
                                           &Value::from(3),
                                           &Value::from("ab"),
                                           0)
                              .unwrap();
        assert_eq!(repeated, Value::from("ababab"));
    }

    #[test]
    fn mixing_text_and_numbers_is_a_type_mismatch() {
        let err = Context::new().eval_binary(BinaryOperator::Add,
                                             &Value::from("a"),
                                             &Value::from(1),
                                             5)
                                .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn negative_text_repetition_is_rejected() {
        let err = Context::new().eval_binary(BinaryOperator::Mul,
                                             &Value::from(-2),
                                             &Value::from("ab"),
                                             0)
                                .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }
}
