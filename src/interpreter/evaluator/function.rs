/// The builtin registry and function calls.
///
/// Declares every builtin with its arity contract and dispatches calls to
/// closures, builtins and numeric derivatives.
pub mod core;

/// Trigonometric and hyperbolic functions and their inverses.
///
/// Real arguments outside the real domain of an inverse function promote to
/// complex results.
pub mod trig;

/// Exponentials and logarithms.
///
/// Supports the natural logarithm, arbitrary bases and base 10.
pub mod log;

/// Square roots, n-th roots and powers.
///
/// Computes principal roots for real, integer, or complex values.
pub mod sqrt;

/// Rounding, sign and absolute value.
pub mod rounding;

/// Accessors for the parts of a complex number.
///
/// Real and imaginary part, conjugate, argument and the polar form.
pub mod complex_parts;

/// Factorials, gamma, binomials and number theory.
///
/// Integer results are exact; `fib` and `binomial` handle arbitrarily large
/// arguments.
pub mod combinatorics;

/// Descriptive statistics over lists.
pub mod statistics;

/// `slice`, `map` and `filter`.
pub mod sequence;

/// Numeric differentiation and integration.
pub mod calculus;
