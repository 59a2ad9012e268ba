use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::is_close,
        },
        value::core::Value,
    },
};

impl Context {
    /// Language-level equality used by `==`, `!=` and the list operators.
    ///
    /// - Two integers compare exactly.
    /// - Other numeric pairs are promoted to complex and compared with
    ///   [`is_close`] using the configured epsilon.
    /// - Lists compare element-wise; text and booleans exactly; functions as
    ///   described on [`crate::interpreter::value::function::Function`].
    /// - Values of different kinds are simply unequal.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let context = Context::new();
    ///
    /// assert!(context.values_equal(&Value::from(2), &Value::Real(2.000_000_000_000_1)));
    /// assert!(!context.values_equal(&Value::from(2), &Value::from("2")));
    /// ```
    #[must_use]
    pub fn values_equal(&self, left: &Value, right: &Value) -> bool {
        use Value::{Bool, Function, Integer, List, Text};

        match (left, right) {
            (Integer(a), Integer(b)) => a == b,
            (a, b) if a.is_numeric() && b.is_numeric() => {
                match (a.as_complex(0), b.as_complex(0)) {
                    (Ok(a), Ok(b)) => is_close(a, b, self.config.epsilon),
                    _ => false,
                }
            },
            (Bool(a), Bool(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (List(a), List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| self.values_equal(x, y))
            },
            (Function(a), Function(b)) => a == b,
            _ => false,
        }
    }

    /// Evaluates `<`, `>`, `<=` or `>=`.
    ///
    /// Integers and reals are ordered numerically, two integers exactly.
    /// Text is ordered lexicographically.
    ///
    /// # Errors
    /// `TypeMismatch` for complex numbers and every other kind.
    ///
    /// # Example
    /// ```
    /// use mathly::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_ordering(BinaryOperator::LessEqual,
    ///                                     &Value::from(6),
    ///                                     &Value::Real(6.0),
    ///                                     0);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_ordering(op: BinaryOperator,
                         left: &Value,
                         right: &Value,
                         offset: usize)
                         -> EvalResult<Value> {
        use Value::{Integer, Real, Text};

        let ordering = match (left, right) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Integer(_) | Real(_), Integer(_) | Real(_)) => {
                left.as_real(offset)?.partial_cmp(&right.as_real(offset)?)
            },
            (Text(a), Text(b)) => Some(a.cmp(b)),
            _ => {
                return Err(EvalError::type_mismatch(format!("Cannot order {} and {}",
                                                            left.type_name(),
                                                            right.type_name()),
                                                    offset));
            },
        };

        Ok(Value::Bool(ordering.is_some_and(|ordering| match op {
                                                BinaryOperator::Less => ordering == Ordering::Less,
                                                BinaryOperator::Greater => {
                                                    ordering == Ordering::Greater
                                                },
                                                BinaryOperator::LessEqual => {
                                                    ordering != Ordering::Greater
                                                },
                                                BinaryOperator::GreaterEqual => {
                                                    ordering != Ordering::Less
                                                },
                                                _ => false,
                                            })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::EvalErrorKind, interpreter::value::complex::ComplexNumber};

    #[test]
    fn equality_tolerates_rounding_noise() {
        let context = Context::new();
        let third = Value::Real(1.0 / 3.0);
        let sum = Value::Real(1.0 / 3.0 + 1e-13);
        assert!(context.values_equal(&third, &sum));
        assert!(!context.values_equal(&Value::Real(0.1), &Value::Real(0.1001)));
    }

    #[test]
    fn lists_compare_elementwise() {
        let context = Context::new();
        let a = Value::from(vec![Value::from(1), Value::Real(2.0)]);
        let b = Value::from(vec![Value::Real(1.0), Value::from(2)]);
        let c = Value::from(vec![Value::from(1)]);
        assert!(context.values_equal(&a, &b));
        assert!(!context.values_equal(&a, &c));
    }

    #[test]
    fn complex_values_cannot_be_ordered() {
        let z = Value::from(ComplexNumber::new(1.0, 1.0));
        let err = Context::eval_ordering(BinaryOperator::Less, &z, &Value::from(2), 4)
                          .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
    }

    #[test]
    fn text_is_ordered_lexicographically() {
        let result = Context::eval_ordering(BinaryOperator::Greater,
                                            &Value::from("pear"),
                                            &Value::from("apple"),
                                            0).unwrap();
        assert_eq!(result, Value::Bool(true));
    }
}
