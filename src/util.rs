/// Numeric conversion and formatting helpers.
///
/// This module provides safe functions for converting between arbitrary
/// precision integers and floating-point values without silent data loss, and
/// the canonical textual form of real numbers shared by the beautifier and
/// value display.
pub mod num;
/// Stack safety for deeply nested expressions.
///
/// Parsing and evaluation are recursive; wrapping the recursive entry points
/// with [`stack::ensure_sufficient_stack`] grows the native stack on demand.
pub mod stack;
