use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::interpreter::{
    evaluator::{
        core::{Context, EvalResult},
        utils::{function_arg, integer_arg, list_arg},
    },
    value::core::Value,
};

/// `slice(list, start, [end])`.
///
/// `end` is exclusive and defaults to the length. Negative positions count
/// from the end, and positions outside the list are clamped, so slicing never
/// fails on a valid list. Text is sliced by characters.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::sequence::slice},
///     value::core::Value,
/// };
///
/// let list = Value::from(vec![Value::from(1), Value::from(2), Value::from(3), Value::from(4)]);
/// let mut context = Context::new();
///
/// let result = slice(&mut context, &[list.clone(), Value::from(1), Value::from(-1)], 0).unwrap();
/// assert_eq!(result.to_string(), "[2, 3]");
///
/// let result = slice(&mut context, &[list, Value::from(-10)], 0).unwrap();
/// assert_eq!(result.to_string(), "[1, 2, 3, 4]");
/// ```
pub fn slice(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let len = match &args[0] {
        Value::Text(text) => text.chars().count(),
        _ => list_arg(args, 0, offset)?.len(),
    };

    let start = clamp_position(integer_arg(args, 1, offset)?, len);
    let end = match args.get(2) {
        Some(_) => clamp_position(integer_arg(args, 2, offset)?, len),
        None => len,
    };
    let end = end.max(start);

    match &args[0] {
        Value::Text(text) => Ok(Value::Text(text.chars().skip(start).take(end - start).collect())),
        _ => Ok(Value::from(list_arg(args, 0, offset)?[start..end].to_vec())),
    }
}

/// Maps a Python-style position onto `0..=len`.
fn clamp_position(position: &BigInt, len: usize) -> usize {
    let position = if position.is_negative() {
        position + BigInt::from(len)
    } else {
        position.clone()
    };

    if position.is_negative() {
        return 0;
    }
    position.to_usize().map_or(len, |p| p.min(len))
}

/// Applies a function to every element of a list.
///
/// # Errors
/// Whatever the function raises, for the first element that fails.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::{core::lookup_builtin, sequence::map}},
///     value::{core::Value, function::Function},
/// };
///
/// let fact = Value::from(Function::Builtin(lookup_builtin("fact").unwrap()));
/// let list = Value::from(vec![Value::from(3), Value::from(4)]);
///
/// let result = map(&mut Context::new(), &[fact, list], 0).unwrap();
/// assert_eq!(result.to_string(), "[6, 24]");
/// ```
pub fn map(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let function = function_arg(args, 0, offset)?;
    let items = list_arg(args, 1, offset)?;

    let mapped = items.iter()
                      .map(|item| context.call_function(function, std::slice::from_ref(item), offset))
                      .collect::<EvalResult<Vec<_>>>()?;

    Ok(Value::from(mapped))
}

/// Keeps the elements for which a predicate returns a truthy value.
///
/// `TRUE`, non-zero numbers and non-empty lists or text are truthy.
pub fn filter(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let predicate = function_arg(args, 0, offset)?;
    let items = list_arg(args, 1, offset)?;

    let mut kept = Vec::new();
    for item in items {
        if context.call_function(predicate, std::slice::from_ref(item), offset)?
                  .is_truthy()
        {
            kept.push(item.clone());
        }
    }

    Ok(Value::from(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::EvalErrorKind,
        interpreter::{
            evaluator::function::core::lookup_builtin,
            value::function::Function,
        },
    };

    fn numbers(items: &[i64]) -> Value {
        Value::from(items.iter().copied().map(Value::from).collect::<Vec<_>>())
    }

    #[test]
    fn slice_clamps_out_of_range_positions() {
        let mut context = Context::new();
        let list = numbers(&[1, 2, 3]);
        let result = slice(&mut context, &[list.clone(), Value::from(5)], 0).unwrap();
        assert_eq!(result, numbers(&[]));
        let result = slice(&mut context, &[list, Value::from(2), Value::from(1)], 0).unwrap();
        assert_eq!(result, numbers(&[]));
    }

    #[test]
    fn slice_of_text_counts_characters() {
        let result = slice(&mut Context::new(), &[Value::from("mañana"), Value::from(2), Value::from(4)], 0)
                     .unwrap();
        assert_eq!(result, Value::from("ña"));
    }

    #[test]
    fn filter_uses_truthiness() {
        let sign = Value::from(Function::Builtin(lookup_builtin("sign").unwrap()));
        let result = filter(&mut Context::new(), &[sign, numbers(&[-1, 0, 2])], 0).unwrap();
        assert_eq!(result, numbers(&[-1, 2]));
    }

    #[test]
    fn map_needs_a_function_first() {
        let err = map(&mut Context::new(), &[numbers(&[1]), numbers(&[1])], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::TypeMismatch);
        assert!(err.detail.contains("argument #1"));
    }
}
