use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{
            binary::core::operand_mismatch,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `AND`, `OR` or `XOR`.
    ///
    /// On two booleans these are the logical operators. On two lists they are
    /// intersection, union and symmetric difference, see
    /// [`Context::eval_list_set_op`]. Mixed kinds are a `TypeMismatch`.
    ///
    /// # Example
    /// ```
    /// use mathly::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new();
    /// let a = Value::Bool(true);
    /// let b = Value::Bool(true);
    ///
    /// let result = context.eval_logic(BinaryOperator::Xor, &a, &b, 0);
    /// assert_eq!(result.unwrap(), Value::Bool(false));
    /// ```
    pub fn eval_logic(&self,
                      op: BinaryOperator,
                      left: &Value,
                      right: &Value,
                      offset: usize)
                      -> EvalResult<Value> {
        use BinaryOperator::{And, Or, Xor};

        match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => match op {
                And => Ok(Value::Bool(*a && *b)),
                Or => Ok(Value::Bool(*a || *b)),
                Xor => Ok(Value::Bool(a ^ b)),
                _ => Err(operand_mismatch(op, left, right, offset)),
            },
            (Value::List(a), Value::List(b)) => Ok(self.eval_list_set_op(op, a, b)),
            _ => Err(operand_mismatch(op, left, right, offset)),
        }
    }
}
