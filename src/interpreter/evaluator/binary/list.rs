use std::rc::Rc;

use num_traits::{Signed, ToPrimitive};

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Longest list `Integer * List` may build.
const MAX_REPEATED_LIST: usize = 1 << 24;

impl Context {
    /// Evaluates `+` or `-` between two lists.
    ///
    /// `+` concatenates. `-` is a multiset difference: every element of the
    /// right list removes the first equal element still left on the left.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use mathly::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Rc::new(vec![Value::from(1), Value::from(2), Value::from(2), Value::from(3)]);
    /// let b = Rc::new(vec![Value::from(2), Value::from(4)]);
    ///
    /// let result = Context::new().eval_list_list(BinaryOperator::Sub, &a, &b);
    /// assert_eq!(result, Value::from(vec![Value::from(1), Value::from(2), Value::from(3)]));
    /// ```
    #[must_use]
    pub fn eval_list_list(&self,
                          op: BinaryOperator,
                          left: &Rc<Vec<Value>>,
                          right: &Rc<Vec<Value>>)
                          -> Value {
        match op {
            BinaryOperator::Sub => {
                let mut remaining = left.as_ref().clone();
                for item in right.iter() {
                    if let Some(pos) = remaining.iter().position(|x| self.values_equal(x, item)) {
                        remaining.remove(pos);
                    }
                }
                Value::from(remaining)
            },
            _ => Value::from(left.iter().chain(right.iter()).cloned().collect::<Vec<_>>()),
        }
    }

    /// Evaluates `AND`, `OR` or `XOR` between two lists.
    ///
    /// The results never hold two equal elements and keep the order of first
    /// appearance:
    /// - `AND` keeps the left elements that also occur on the right.
    /// - `OR` is the left list followed by the right one.
    /// - `XOR` is the left elements missing on the right, then the right
    ///   elements missing on the left.
    #[must_use]
    pub fn eval_list_set_op(&self,
                            op: BinaryOperator,
                            left: &Rc<Vec<Value>>,
                            right: &Rc<Vec<Value>>)
                            -> Value {
        let contains = |list: &[Value], item: &Value| list.iter().any(|x| self.values_equal(x, item));

        let candidates: Vec<&Value> = match op {
            BinaryOperator::And => left.iter().filter(|x| contains(right, x)).collect(),
            BinaryOperator::Xor => {
                left.iter()
                    .filter(|x| !contains(right, x))
                    .chain(right.iter().filter(|x| !contains(left, x)))
                    .collect()
            },
            _ => left.iter().chain(right.iter()).collect(),
        };

        let mut result = Vec::with_capacity(candidates.len());
        for item in candidates {
            if !contains(&result, item) {
                result.push(item.clone());
            }
        }
        Value::from(result)
    }

    /// Repeats `items` `count` times for `n * list` and `list * n`.
    ///
    /// # Errors
    /// `TypeMismatch` when `count` is not a non-negative integer and a
    /// `DomainError` when the result would be unreasonably long.
    pub fn repeat_list(items: &Rc<Vec<Value>>, count: &Value, offset: usize) -> EvalResult<Value> {
        let count = match count {
            Value::Integer(n) if !n.is_negative() => n,
            other => {
                return Err(EvalError::type_mismatch(format!("Trying to multiply List by \
                                                             non-integer ({other})"),
                                                    offset));
            },
        };

        let times = count.to_usize()
                         .filter(|n| items.len().saturating_mul(*n) <= MAX_REPEATED_LIST)
                         .ok_or_else(|| EvalError::domain("Repeated list would be too long", offset))?;

        let mut result = Vec::with_capacity(items.len() * times);
        for _ in 0..times {
            result.extend(items.iter().cloned());
        }
        Ok(Value::from(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    fn list(items: &[i64]) -> Rc<Vec<Value>> {
        Rc::new(items.iter().copied().map(Value::from).collect())
    }

    fn values(items: &[i64]) -> Value {
        Value::from(items.iter().copied().map(Value::from).collect::<Vec<_>>())
    }

    #[test]
    fn difference_removes_one_match_per_element() {
        let context = Context::new();
        let result = context.eval_list_list(BinaryOperator::Sub, &list(&[1, 2, 3]), &list(&[3, 4, 5]));
        assert_eq!(result, values(&[1, 2]));
    }

    #[test]
    fn set_operators_deduplicate() {
        let context = Context::new();
        let a = list(&[1, 2, 2, 3]);
        let b = list(&[2, 3, 4, 4]);
        assert_eq!(context.eval_list_set_op(BinaryOperator::And, &a, &b), values(&[2, 3]));
        assert_eq!(context.eval_list_set_op(BinaryOperator::Or, &a, &b), values(&[1, 2, 3, 4]));
        assert_eq!(context.eval_list_set_op(BinaryOperator::Xor, &a, &b), values(&[1, 4]));
    }

    #[test]
    fn repetition_requires_a_non_negative_integer() {
        let items = list(&[1, 2]);
        assert_eq!(Context::repeat_list(&items, &Value::from(2), 0).unwrap(),
                   values(&[1, 2, 1, 2]));

        let err = Context::repeat_list(&items, &Value::Real(1.5), 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert!(err.detail.contains("Trying to multiply List by non-integer"));

        let err = Context::repeat_list(&items, &Value::from(-1), 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
    }
}
