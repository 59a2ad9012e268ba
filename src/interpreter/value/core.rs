use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::{
    ast::LiteralValue,
    error::EvalError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{complex::ComplexNumber, function::Function},
    },
    util::num::{bigint_to_f64, format_real},
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible results of evaluating an expression:
/// numbers of every kind, booleans, text, lists and first-class functions.
/// Numbers are promoted on demand from `Integer` to `Real` to `Complex`.
///
/// The derived `PartialEq` is structural; language-level equality with a
/// tolerance lives in the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer of arbitrary size.
    Integer(BigInt),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// A complex number (with real and imaginary parts).
    Complex(ComplexNumber),
    /// A boolean value, printed as `TRUE` or `FALSE`.
    /// Produced by comparison operators and logical operations.
    Bool(bool),
    /// A piece of text.
    Text(String),
    /// An ordered list of values. Lists are immutable and shared.
    List(Rc<Vec<Self>>),
    /// A closure, builtin or derivative.
    Function(Function),
}

impl From<ComplexNumber> for Value {
    fn from(c: ComplexNumber) -> Self {
        Self::Complex(c)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Self::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(v))
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Integer(n) => n.clone().into(),
            LiteralValue::Real(r) => (*r).into(),
            LiteralValue::Complex(c) => (*c).into(),
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Text(s) => s.as_str().into(),
        }
    }
}

impl Value {
    /// The name of the value's kind, used in error messages.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::from(3).type_name(), "Integer");
    /// assert_eq!(Value::from(vec![]).type_name(), "List");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::Real(_) => "Real",
            Self::Complex(_) => "Complex",
            Self::Bool(_) => "Bool",
            Self::Text(_) => "Text",
            Self::List(_) => "List",
            Self::Function(_) => "Function",
        }
    }

    /// Returns `true` for integers, reals and complex numbers.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_) | Self::Complex(_))
    }

    /// Converts the value to an `f64`, or returns an error if not real.
    ///
    /// Accepts `Value::Real` and `Value::Integer`. Integers beyond the `f64`
    /// range are a domain error.
    ///
    /// # Parameters
    /// - `offset`: Source offset for error reporting.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::core::Value;
    ///
    /// let x = Value::from(10);
    /// assert_eq!(x.as_real(0).unwrap(), 10.0);
    /// assert!(Value::from("ten").as_real(0).is_err());
    /// ```
    pub fn as_real(&self, offset: usize) -> EvalResult<f64> {
        match self {
            Self::Real(r) => Ok(*r),
            Self::Integer(n) => integer_to_f64(n, offset),
            other => Err(EvalError::type_mismatch(format!("Expected a real number, found {}",
                                                          other.type_name()),
                                                  offset)),
        }
    }

    /// Converts the value to `ComplexNumber`, or returns an error if not
    /// numeric.
    ///
    /// Accepts `Value::Complex`, `Value::Real`, and `Value::Integer`.
    pub fn as_complex(&self, offset: usize) -> EvalResult<ComplexNumber> {
        match self {
            Self::Complex(c) => Ok(*c),
            Self::Real(r) => Ok(ComplexNumber::from(*r)),
            Self::Integer(n) => Ok(ComplexNumber::from(integer_to_f64(n, offset)?)),
            other => Err(EvalError::type_mismatch(format!("Expected a number, found {}",
                                                          other.type_name()),
                                                  offset)),
        }
    }

    /// Truthiness used by `filter`.
    ///
    /// `TRUE`, non-zero numbers and non-empty lists or text are truthy.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::value::core::Value;
    ///
    /// assert!(Value::from(-1).is_truthy());
    /// assert!(!Value::from(0.0).is_truthy());
    /// assert!(!Value::from("").is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Integer(n) => !n.is_zero(),
            Self::Real(r) => *r != 0.0,
            Self::Complex(c) => !c.is_zero(),
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Function(_) => true,
        }
    }
}

fn integer_to_f64(n: &BigInt, offset: usize) -> EvalResult<f64> {
    bigint_to_f64(n).ok_or_else(|| {
                        EvalError::domain(format!("Integer {n} is too large for a real number"),
                                          offset)
                    })
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", format_real(*r)),
            Self::Complex(c) => write!(f, "{c}"),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::List(list) => {
                write!(f, "[")?;

                for (index, value) in list.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "]")
            },
            Self::Function(func) => write!(f, "{func}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn displays_nested_lists() {
        let value = Value::from(vec![Value::from(1),
                                     Value::from(vec![Value::from(2.5), Value::from(true)]),
                                     Value::from("a")]);
        assert_eq!(value.to_string(), r#"[1, [2.5, TRUE], "a"]"#);
    }

    #[test]
    fn huge_integers_do_not_silently_become_infinite() {
        let huge = Value::from(BigInt::from(10).pow(400));
        assert!(huge.as_real(3).is_err());
    }
}
