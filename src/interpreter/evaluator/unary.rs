use crate::{
    ast::UnaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation for integers, reals and complex numbers;
    ///   reverses lists.
    /// - `Not`: boolean negation.
    ///
    /// Any other combination is a `TypeMismatch`.
    ///
    /// # Example
    /// ```
    /// use mathly::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, Value::from(5), 0).unwrap();
    /// assert_eq!(v, Value::from(-5));
    ///
    /// let list = Value::from(vec![Value::from(1), Value::from(2)]);
    /// let v = Context::eval_unary(UnaryOperator::Negate, list, 0).unwrap();
    /// assert_eq!(v, Value::from(vec![Value::from(2), Value::from(1)]));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, Value::from(false), 0).unwrap();
    /// assert_eq!(v, Value::from(true));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: Value, offset: usize) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOperator::Negate, Value::Integer(n)) => Ok(Value::Integer(-n)),
            (UnaryOperator::Negate, Value::Real(r)) => Ok(Value::Real(-r)),
            (UnaryOperator::Negate, Value::Complex(c)) => Ok(Value::Complex(-c)),
            (UnaryOperator::Negate, Value::List(list)) => {
                Ok(list.iter().rev().cloned().collect::<Vec<_>>().into())
            },
            (UnaryOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (op, value) => {
                Err(EvalError::type_mismatch(format!("Cannot apply '{op}' to a value of type {}",
                                                     value.type_name()),
                                             offset))
            },
        }
    }
}
