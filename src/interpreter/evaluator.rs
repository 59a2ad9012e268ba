/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions, including
/// arithmetic, comparisons, logical operators, and list algebra.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements the prefix operators: arithmetic negation (list reversal on
/// lists) and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context, the
/// configuration, name resolution and the recursion guard.
pub mod core;

/// Variable scopes.
///
/// Immutable, reference-counted frames chained from the innermost scope
/// outwards; closures keep the chain they were created in.
pub mod env;

/// Utility functions for evaluation.
///
/// Provides argument evaluation with spreads, indexing, typed argument
/// accessors for builtins, tolerant comparison and the gamma function.
pub mod utils;

/// Function evaluation.
///
/// Handles closure, builtin and derivative calls, argument checking, and the
/// builtin library itself.
pub mod function;
