/// Parser entry points and shared result type.
///
/// Contains the top-level `parse` function, the nesting pre-check and the
/// lowest precedence rule that every other rule descends from.
pub mod core;

/// Binary operator parsing.
///
/// Implements the precedence levels for boolean, comparison, additive,
/// multiplicative (including implicit juxtaposition) and power operators.
pub mod binary;

/// Prefix, primary and postfix parsing.
///
/// Handles negation, `NOT`, literals, identifiers, groups, list and lambda
/// literals, and the chained call and index postfixes.
pub mod unary;

/// Parsing helpers.
///
/// Comma-separated lists, identifiers, argument spreads and token
/// expectations shared by the other parsing modules.
pub mod utils;
