/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST depth-first and left to right, promotes
/// numbers between integer, real and complex on demand, applies closures and
/// builtins, and produces a single value. It is the core execution engine of
/// the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Resolves names through scopes, constants and the builtin library.
/// - Reports runtime errors such as division by zero or invalid operations.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// identifiers, operators, delimiters, and keywords. This is the first stage of
/// interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with their byte offset.
/// - Handles numeric, imaginary and text literals, identifiers, and operators.
/// - Maps keyword aliases such as `vrai` or `et` onto their canonical token.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of a single expression.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Inserts implicit multiplication and folds signed and complex literals.
/// - Validates correct grammar and syntax, reporting errors with location info.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares all the value types produced by evaluation: integers
/// of arbitrary size, reals, complex numbers, booleans, text, lists and
/// functions. It also provides methods for type conversion and promotion.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Provides safe promotion between numeric types (e.g., integer to real).
/// - Renders values for display.
pub mod value;
/// The beautifier renders a parsed expression back into canonical text.
///
/// Canonical text spaces every binary operator, writes keywords in upper case,
/// spells implicit multiplication as `*` and keeps only the parentheses that
/// precedence requires. It is a pure function of the AST.
pub mod beautifier;
