use std::fmt::Display;

use thiserror::Error;

/// The category of an evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    /// An identifier is neither bound, a constant nor a builtin.
    UndefinedName,
    /// A function received the wrong number of arguments.
    WrongArity,
    /// A value had an unexpected or incompatible type.
    TypeMismatch,
    /// An operation is undefined for its input, such as division by zero or an
    /// index out of range.
    DomainError,
    /// A value that is not a function was called.
    NotCallable,
    /// Evaluation nested deeper than the configured limit.
    RecursionLimitExceeded,
}

impl Display for EvalErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::UndefinedName => "Undefined name",
            Self::WrongArity => "Wrong arity",
            Self::TypeMismatch => "Type mismatch",
            Self::DomainError => "Domain error",
            Self::NotCallable => "Not callable",
            Self::RecursionLimitExceeded => "Recursion limit exceeded",
        };
        write!(f, "{text}")
    }
}

/// Represents an error raised while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error at offset {offset}: {kind}: {detail}.")]
pub struct EvalError {
    /// The category of the failure.
    pub kind:   EvalErrorKind,
    /// Human readable description of the failure.
    pub detail: String,
    /// Byte offset of the expression that failed.
    pub offset: usize,
}

impl EvalError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: EvalErrorKind, detail: impl Into<String>, offset: usize) -> Self {
        Self { kind,
               detail: detail.into(),
               offset }
    }

    /// An identifier that resolves to nothing.
    ///
    /// # Example
    /// ```
    /// use mathly::error::{EvalError, EvalErrorKind};
    ///
    /// let e = EvalError::undefined_name("foo", 3);
    /// assert_eq!(e.kind, EvalErrorKind::UndefinedName);
    /// assert_eq!(e.to_string(),
    ///            "Error at offset 3: Undefined name: Cannot find variable or function foo.");
    /// ```
    #[must_use]
    pub fn undefined_name(name: &str, offset: usize) -> Self {
        Self::new(EvalErrorKind::UndefinedName,
                  format!("Cannot find variable or function {name}"),
                  offset)
    }

    /// A call with the wrong number of arguments.
    #[must_use]
    pub fn wrong_arity(expected: impl Display, found: usize, offset: usize) -> Self {
        Self::new(EvalErrorKind::WrongArity,
                  format!("Argument count mismatch (expected {expected}, got {found})"),
                  offset)
    }

    /// A value of the wrong kind.
    #[must_use]
    pub fn type_mismatch(detail: impl Into<String>, offset: usize) -> Self {
        Self::new(EvalErrorKind::TypeMismatch, detail, offset)
    }

    /// A builtin argument of the wrong kind.
    ///
    /// `index` is zero based; the message counts from one.
    #[must_use]
    pub fn argument_mismatch(index: usize,
                             argument: impl Display,
                             expected: &str,
                             offset: usize)
                             -> Self {
        Self::type_mismatch(format!("Type mismatch for argument #{} '{argument}' (expected \
                                     {expected})",
                                    index + 1),
                            offset)
    }

    /// An operation outside its mathematical domain.
    #[must_use]
    pub fn domain(detail: impl Into<String>, offset: usize) -> Self {
        Self::new(EvalErrorKind::DomainError, detail, offset)
    }

    /// Division by an exact or floating-point zero.
    #[must_use]
    pub fn division_by_zero(offset: usize) -> Self {
        Self::domain("Trying to divide by zero", offset)
    }

    /// A call whose callee is not a function.
    #[must_use]
    pub fn not_callable(kind: &str, offset: usize) -> Self {
        Self::new(EvalErrorKind::NotCallable,
                  format!("A value of type {kind} cannot be called"),
                  offset)
    }

    /// Evaluation exceeded the configured nesting depth.
    #[must_use]
    pub fn recursion_limit(limit: usize, offset: usize) -> Self {
        Self::new(EvalErrorKind::RecursionLimitExceeded,
                  format!("Evaluation nested deeper than {limit} levels"),
                  offset)
    }
}
