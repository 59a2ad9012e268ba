/// Operator dispatch.
///
/// Routes each binary operator to the handler for its operand kinds.
pub mod core;

/// Integer, real and complex arithmetic for `+ - * /`.
pub mod scalar;

/// Exponentiation across the numeric tower.
pub mod power;

/// List algebra: concatenation, difference, repetition and the set-like
/// `AND`, `OR`, `XOR`.
pub mod list;

/// Equality with tolerance and ordering.
pub mod comparison;

/// Boolean `AND`, `OR`, `XOR`.
pub mod logic;
