/// Complex number support.
///
/// Defines the `ComplexNumber` type used for arithmetic with real and imaginary
/// parts, including the elementary and inverse functions the builtin library
/// needs when real input leaves the real domain.
pub mod complex;
/// Function values.
///
/// Defines `Function`, the callable value kind: closures that capture their
/// environment, builtin registry entries, and numeric derivatives.
pub mod function;

/// The `Value` enum.
///
/// Holds the value kinds themselves, conversions from Rust types, numeric
/// promotion and display.
pub mod core;
