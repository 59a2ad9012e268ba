//! # mathly
//!
//! mathly is a small mathematical expression language written in Rust.
//! It parses and evaluates single expressions over arbitrary-precision
//! integers, reals, complex numbers, booleans, text, lists and anonymous
//! functions, and renders every parsed expression back into a canonical
//! notation.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

pub use crate::{
    error::Error,
    interpreter::{evaluator::core::EvalConfig, value::core::Value},
};
use crate::interpreter::{
    beautifier::beautify,
    evaluator::{core::Context, env::Env},
    lexer::tokenize,
    parser::core::parse,
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the parser
/// and traversed by the evaluator and the beautifier.
///
/// # Responsibilities
/// - Defines expression types for all language constructs.
/// - Attaches source offsets to AST nodes for error reporting.
/// - Defines operator precedence shared by the parser and the beautifier.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while turning source text
/// into a value. It standardizes error reporting and carries detailed
/// information about failures, including error kinds, descriptions, and source
/// offsets for user feedback.
///
/// # Responsibilities
/// - Defines error types for all failure modes (lexer, parser, evaluator).
/// - Attaches byte offsets and detailed messages for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of expression evaluation.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and the beautifier.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, value types
///   and beautifier.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are used
/// throughout the interpreter, parser, and evaluator.
///
/// # Responsibilities
/// - Safely convert between `BigInt`, `i64`, `usize`, and `f64` without silent
///   data loss.
/// - Format reals canonically.
/// - Grow the native stack for deep recursion.
pub mod util;

/// The outcome of a successful [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The computed value.
    pub value:      Value,
    /// The canonical text of the parsed source.
    pub beautified: String,
}

/// Parses the source into an expression tree.
///
/// # Errors
/// Returns [`Error::Lex`] or [`Error::Parse`].
///
/// # Example
/// ```
/// use mathly::{ast::Expr, parse_source};
///
/// assert!(matches!(parse_source("2 + 2").unwrap(), Expr::BinaryOp { .. }));
/// assert!(parse_source("(2 + 2").is_err());
/// ```
pub fn parse_source(source: &str) -> Result<ast::Expr, Error> {
    let tokens = tokenize(source)?;
    let expr = parse(&tokens)?;
    Ok(expr)
}

/// Returns the canonical text of the source without evaluating it.
///
/// # Errors
/// Returns an error if lexing or parsing fails.
///
/// # Example
/// ```
/// use mathly::beautify_source;
///
/// assert_eq!(beautify_source("0--5").unwrap(), "0 - -5");
/// assert_eq!(beautify_source("deg(2pi)").unwrap(), "deg(2 * pi)");
/// ```
pub fn beautify_source(source: &str) -> Result<String, Error> {
    parse_source(source).map(|expr| beautify(&expr))
}

/// Evaluates the source with the default configuration.
///
/// # Errors
/// Returns the first lexing, parsing or evaluation error.
///
/// # Example
/// ```
/// use mathly::{Value, evaluate};
///
/// let result = evaluate("{n}({m}({n}(m*n))(n))(3)(4)").unwrap();
/// assert_eq!(result.value, Value::from(12));
/// assert_eq!(result.beautified, "{n}({m}({n}(m * n))(n))(3)(4)");
///
/// // 'x' is not defined
/// assert!(evaluate("x + 1").is_err());
/// ```
pub fn evaluate(source: &str) -> Result<Evaluation, Error> {
    let mut evaluator = Evaluator::new();
    let value = evaluator.evaluate(source)?;
    let beautified = evaluator.beautified.unwrap_or_default();
    Ok(Evaluation { value, beautified })
}

/// Evaluates expressions one after another under a fixed configuration.
///
/// Expressions do not share bindings; the evaluator only keeps the
/// configuration and the canonical text of the last parsed source.
///
/// # Example
/// ```
/// use mathly::{EvalConfig, Evaluator, Value};
///
/// let mut evaluator = Evaluator::with_config(EvalConfig { epsilon: 0.01,
///                                                         ..EvalConfig::default() });
///
/// assert_eq!(evaluator.evaluate("1 == 1.001").unwrap(), Value::from(true));
/// assert_eq!(evaluator.beautified(), Some("1 == 1.001"));
///
/// assert!(evaluator.evaluate("1 +").is_err());
/// assert_eq!(evaluator.beautified(), None);
/// ```
#[derive(Debug, Default)]
pub struct Evaluator {
    context:    Context,
    beautified: Option<String>,
}

impl Evaluator {
    /// Creates an evaluator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator with the given configuration.
    #[must_use]
    pub const fn with_config(config: EvalConfig) -> Self {
        Self { context:    Context::with_config(config),
               beautified: None, }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EvalConfig {
        &self.context.config
    }

    /// Parses and evaluates one expression.
    ///
    /// The canonical text is recorded as soon as parsing succeeds, so it is
    /// available even when evaluation fails.
    ///
    /// # Errors
    /// Returns the first lexing, parsing or evaluation error.
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn evaluate(&mut self, source: &str) -> Result<Value, Error> {
        self.beautified = None;

        let expr = parse_source(source)?;
        let beautified = beautify(&expr);
        debug!(%beautified, "parsed");
        self.beautified = Some(beautified);

        let value = self.context.eval(&expr, &Env::new())?;
        debug!(%value, "evaluated");
        Ok(value)
    }

    /// The canonical text of the last successfully parsed source.
    #[must_use]
    pub fn beautified(&self) -> Option<&str> {
        self.beautified.as_deref()
    }
}
