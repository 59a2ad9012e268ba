use thiserror::Error;

/// Lexing errors.
///
/// Raised while turning raw text into tokens: unrecognized characters,
/// unterminated text literals and malformed numbers.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// a token stream: unexpected tokens, unbalanced brackets, missing operands and
/// trailing input.
pub mod parse_error;
/// Evaluation errors.
///
/// Contains the error raised while computing the value of a well-formed
/// expression: undefined names, arity and type mismatches, domain violations,
/// calls of non-functions and runaway recursion.
pub mod eval_error;

pub use eval_error::{EvalError, EvalErrorKind};
pub use lex_error::LexError;
pub use parse_error::ParseError;

/// Any failure of [`crate::evaluate`] and friends.
///
/// The three phases never overlap: a lexing failure stops before parsing and a
/// parsing failure stops before evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source contains a malformed token.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a valid expression.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The expression is well-formed but cannot be evaluated.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    /// Byte offset in the source that the error refers to.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Lex(e) => e.offset(),
            Self::Parse(e) => e.offset(),
            Self::Eval(e) => e.offset,
        }
    }
}
