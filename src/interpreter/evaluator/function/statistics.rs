use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::list_arg,
        },
        value::core::Value,
    },
    util::num::usize_to_f64,
};

/// The elements of a non-empty list of numbers.
fn numbers(args: &[Value], offset: usize) -> EvalResult<&[Value]> {
    let items = list_arg(args, 0, offset)?;
    if items.iter().any(|item| !item.is_numeric()) {
        return Err(EvalError::argument_mismatch(0, &args[0], "a list of numbers", offset));
    }
    if items.is_empty() {
        return Err(EvalError::domain("Statistics of an empty list are undefined", offset));
    }
    Ok(items)
}

/// The elements of a non-empty list of real numbers, as `f64`.
fn reals(args: &[Value], offset: usize) -> EvalResult<Vec<f64>> {
    let items = list_arg(args, 0, offset)?;
    if items.is_empty() {
        return Err(EvalError::domain("Statistics of an empty list are undefined", offset));
    }
    items.iter()
         .map(|item| match item {
             Value::Integer(_) | Value::Real(_) => item.as_real(offset),
             _ => Err(EvalError::argument_mismatch(0, &args[0], "a list of real numbers", offset)),
         })
         .collect()
}

/// Sum of a list of numbers; `0` for the empty list.
///
/// Integers stay exact.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::statistics::sum},
///     value::core::Value,
/// };
///
/// let list = Value::from(vec![Value::from(1), Value::from(2), Value::Real(0.5)]);
/// assert_eq!(sum(&mut Context::new(), &[list], 0).unwrap(), Value::Real(3.5));
/// ```
pub fn sum(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    if list_arg(args, 0, offset)?.is_empty() {
        return Ok(Value::from(0));
    }
    total(context, numbers(args, offset)?, offset)
}

fn total(context: &Context, items: &[Value], offset: usize) -> EvalResult<Value> {
    items.iter().try_fold(Value::from(0), |acc, item| {
                    context.eval_binary(BinaryOperator::Add, &acc, item, offset)
                })
}

/// Arithmetic mean; exact when the sum of integers divides evenly.
///
/// # Errors
/// `DomainError` for an empty list.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::statistics::average},
///     value::core::Value,
/// };
///
/// let list = Value::from(vec![Value::from(1), Value::from(2), Value::from(6)]);
/// assert_eq!(average(&mut Context::new(), &[list], 0).unwrap(), Value::from(3));
/// ```
pub fn average(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let items = numbers(args, offset)?;
    let sum = total(context, items, offset)?;
    let count = Value::from(i64::try_from(items.len()).unwrap_or(i64::MAX));
    context.eval_binary(BinaryOperator::Div, &sum, &count, offset)
}

/// Sum of squared deviations from the mean, and the number of values.
fn squared_deviations(args: &[Value], offset: usize) -> EvalResult<(f64, usize)> {
    let xs = reals(args, offset)?;
    let n = usize_to_f64(xs.len());
    let mean = xs.iter().sum::<f64>() / n;
    Ok((xs.iter().map(|x| (x - mean).powi(2)).sum(), xs.len()))
}

fn sample_size(count: usize, offset: usize) -> EvalResult<f64> {
    if count < 2 {
        return Err(EvalError::domain("Sample statistics need at least two values", offset));
    }
    Ok(usize_to_f64(count - 1))
}

/// Population variance.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::statistics::variance},
///     value::core::Value,
/// };
///
/// let list = Value::from(vec![Value::from(2), Value::from(4), Value::from(4), Value::from(4),
///                             Value::from(5), Value::from(5), Value::from(7), Value::from(9)]);
/// assert_eq!(variance(&mut Context::new(), &[list], 0).unwrap(), Value::Real(4.0));
/// ```
pub fn variance(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let (squares, count) = squared_deviations(args, offset)?;
    Ok(Value::Real(squares / usize_to_f64(count)))
}

/// Sample variance, dividing by `n - 1`.
///
/// # Errors
/// `DomainError` for fewer than two values.
pub fn variance_sample(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let (squares, count) = squared_deviations(args, offset)?;
    Ok(Value::Real(squares / sample_size(count, offset)?))
}

/// Population standard deviation.
pub fn stdev(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let (squares, count) = squared_deviations(args, offset)?;
    Ok(Value::Real((squares / usize_to_f64(count)).sqrt()))
}

/// Sample standard deviation.
pub fn stdev_sample(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let (squares, count) = squared_deviations(args, offset)?;
    Ok(Value::Real((squares / sample_size(count, offset)?).sqrt()))
}

/// Harmonic mean, `n / sum(1 / x)`.
///
/// # Errors
/// `DomainError` when an element is zero.
pub fn harmonic_mean(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let xs = reals(args, offset)?;
    if xs.contains(&0.0) {
        return Err(EvalError::division_by_zero(offset));
    }
    let reciprocals: f64 = xs.iter().map(|x| x.recip()).sum();
    if reciprocals == 0.0 {
        return Err(EvalError::division_by_zero(offset));
    }
    Ok(Value::Real(usize_to_f64(xs.len()) / reciprocals))
}

/// The middle value; for an even count the mean of the two middle values.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::statistics::median},
///     value::core::Value,
/// };
///
/// let list = Value::from(vec![Value::from(7), Value::from(1), Value::from(4), Value::from(2)]);
/// assert_eq!(median(&mut Context::new(), &[list], 0).unwrap(), Value::from(3));
/// ```
pub fn median(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    reals(args, offset)?;
    let mut items = list_arg(args, 0, offset)?.to_vec();
    let mut failure = None;
    items.sort_by(|a, b| {
             ordering(a, b, offset).unwrap_or_else(|e| {
                                       failure.get_or_insert(e);
                                       Ordering::Equal
                                   })
         });
    if let Some(e) = failure {
        return Err(e);
    }

    let middle = items.len() / 2;
    if items.len() % 2 == 1 {
        return Ok(items[middle].clone());
    }

    let sum = context.eval_binary(BinaryOperator::Add, &items[middle - 1], &items[middle], offset)?;
    context.eval_binary(BinaryOperator::Div, &sum, &Value::from(2), offset)
}

/// The most frequent element; the first one to appear wins ties.
///
/// Elements are compared with the language's equality, so `1` and `1.0`
/// count as the same value.
pub fn mode(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let items = list_arg(args, 0, offset)?;
    let mut counts: Vec<(&Value, usize)> = Vec::new();

    for item in items {
        match counts.iter_mut().find(|(seen, _)| context.values_equal(seen, item)) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }

    let mut best: Option<(&Value, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.clone())
        .ok_or_else(|| EvalError::domain("The mode of an empty list is undefined", offset))
}

/// Smallest of the arguments, or of the elements of a single list argument.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::statistics::min},
///     value::core::Value,
/// };
///
/// let mut context = Context::new();
///
/// let r = min(&mut context, &[Value::from(3), Value::Real(2.5)], 0).unwrap();
/// assert_eq!(r, Value::Real(2.5));
///
/// let list = Value::from(vec![Value::from(8), Value::from(-1)]);
/// assert_eq!(min(&mut context, &[list], 0).unwrap(), Value::from(-1));
/// ```
pub fn min(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    extreme(args, Ordering::Less, offset)
}

/// Largest of the arguments, or of the elements of a single list argument.
pub fn max(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    extreme(args, Ordering::Greater, offset)
}

/// Picks the value that compares as `wanted` against all others; the first
/// one wins ties.
fn extreme(args: &[Value], wanted: Ordering, offset: usize) -> EvalResult<Value> {
    let candidates = match args {
        [Value::List(items)] => items.as_slice(),
        _ => args,
    };

    let (first, rest) = candidates.split_first()
                                  .ok_or_else(|| {
                                      EvalError::domain("Cannot take the extreme of an empty \
                                                         list",
                                                        offset)
                                  })?;

    let mut best = first;
    for candidate in rest {
        if ordering(candidate, best, offset)? == wanted {
            best = candidate;
        }
    }
    Ok(best.clone())
}

/// Orders two values with the same rules as `<`.
fn ordering(a: &Value, b: &Value, offset: usize) -> EvalResult<Ordering> {
    if Context::eval_ordering(BinaryOperator::Less, a, b, offset)? == Value::Bool(true) {
        return Ok(Ordering::Less);
    }
    if Context::eval_ordering(BinaryOperator::Greater, a, b, offset)? == Value::Bool(true) {
        return Ok(Ordering::Greater);
    }
    Ok(Ordering::Equal)
}

/// Number of elements of a list or characters of a text.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::statistics::len},
///     value::core::Value,
/// };
///
/// assert_eq!(len(&mut Context::new(), &[Value::from("héllo")], 0).unwrap(), Value::from(5));
/// ```
pub fn len(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let count = match &args[0] {
        Value::Text(text) => text.chars().count(),
        _ => list_arg(args, 0, offset)?.len(),
    };
    Ok(Value::from(i64::try_from(count).unwrap_or(i64::MAX)))
}
