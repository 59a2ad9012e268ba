use std::{collections::HashMap, fmt};

use tracing::trace;

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{
                calculus, combinatorics, complex_parts, log, rounding, sequence, sqrt, statistics,
                trig,
            },
        },
        value::{core::Value, function::Function},
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the evaluation context, a slice of evaluated argument
/// values and the source offset of the call. Higher-order builtins use the
/// context to call back into the evaluator.
pub type BuiltinFn = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `Range(min, max)` allows optional trailing arguments.
/// - `AtLeast(n)` is used by variadic builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
    /// At least this many arguments.
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::evaluator::function::core::Arity;
    ///
    /// assert!(Arity::Range(1, 2).check(2));
    /// assert!(!Arity::Exact(1).check(2));
    /// assert!(Arity::AtLeast(1).check(12));
    /// ```
    #[must_use]
    pub const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::Range(min, max) => min <= n && n <= max,
            Self::AtLeast(min) => n >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min} to {max}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin,
/// - a one-line description.
///
/// The macro produces:
/// - `BuiltinDef` (registry metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr,
                doc: $doc:literal $(,)?
            }
        ),* $(,)?
    ) => {
        /// One entry of the builtin registry.
        pub struct BuiltinDef {
            /// The name the builtin is called by.
            pub name:  &'static str,
            /// Accepted argument counts.
            pub arity: Arity,
            /// The implementation.
            pub func:  BuiltinFn,
            /// One-line description shown by `mathly --builtins`.
            pub doc:   &'static str,
        }

        /// Every builtin, in the order they are listed by `mathly --builtins`.
        pub static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func, doc: $doc },
            )*
        ];

        /// Names of all builtins.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "sin"      => { arity: Arity::Exact(1), func: trig::sin, doc: "Sine" },
    "cos"      => { arity: Arity::Exact(1), func: trig::cos, doc: "Cosine" },
    "tan"      => { arity: Arity::Exact(1), func: trig::tan, doc: "Tangent" },
    "sec"      => { arity: Arity::Exact(1), func: trig::sec, doc: "Secant, 1 / cos(x)" },
    "csc"      => { arity: Arity::Exact(1), func: trig::csc, doc: "Cosecant, 1 / sin(x)" },
    "cot"      => { arity: Arity::Exact(1), func: trig::cot, doc: "Cotangent, cos(x) / sin(x)" },
    "asin"     => { arity: Arity::Exact(1), func: trig::asin, doc: "Inverse sine" },
    "acos"     => { arity: Arity::Exact(1), func: trig::acos, doc: "Inverse cosine" },
    "atan"     => { arity: Arity::Exact(1), func: trig::atan, doc: "Inverse tangent" },
    "atan2"    => { arity: Arity::Exact(2), func: trig::atan2, doc: "Angle of the point (x, y), called as atan2(y, x)" },
    "sinh"     => { arity: Arity::Exact(1), func: trig::sinh, doc: "Hyperbolic sine" },
    "cosh"     => { arity: Arity::Exact(1), func: trig::cosh, doc: "Hyperbolic cosine" },
    "tanh"     => { arity: Arity::Exact(1), func: trig::tanh, doc: "Hyperbolic tangent" },
    "asinh"    => { arity: Arity::Exact(1), func: trig::asinh, doc: "Inverse hyperbolic sine" },
    "acosh"    => { arity: Arity::Exact(1), func: trig::acosh, doc: "Inverse hyperbolic cosine" },
    "atanh"    => { arity: Arity::Exact(1), func: trig::atanh, doc: "Inverse hyperbolic tangent" },
    "hypot"    => { arity: Arity::Exact(2), func: trig::hypot, doc: "sqrt(x^2 + y^2) without overflow" },
    "sinc"     => { arity: Arity::Exact(1), func: trig::sinc, doc: "sin(x) / x, 1 at 0" },
    "deg"      => { arity: Arity::Exact(1), func: trig::deg, doc: "Radians to degrees" },
    "rad"      => { arity: Arity::Exact(1), func: trig::rad, doc: "Degrees to radians" },

    "exp"      => { arity: Arity::Exact(1), func: log::exp, doc: "e raised to x" },
    "ln"       => { arity: Arity::Exact(1), func: log::ln, doc: "Natural logarithm" },
    "log"      => { arity: Arity::Range(1, 2), func: log::log, doc: "Logarithm, base 10 unless given" },
    "log10"    => { arity: Arity::Exact(1), func: log::log10, doc: "Base 10 logarithm" },
    "sqrt"     => { arity: Arity::Exact(1), func: sqrt::sqrt, doc: "Principal square root" },
    "root"     => { arity: Arity::Exact(2), func: sqrt::root, doc: "Principal n-th root, root(x, n)" },
    "pow"      => { arity: Arity::Exact(2), func: sqrt::pow, doc: "pow(x, p) is x ^ p" },

    "ceil"     => { arity: Arity::Exact(1), func: rounding::ceil, doc: "Round towards +infinity" },
    "floor"    => { arity: Arity::Exact(1), func: rounding::floor, doc: "Round towards -infinity" },
    "round"    => { arity: Arity::Range(1, 2), func: rounding::round, doc: "Round to the nearest, optionally to a number of digits" },
    "trunc"    => { arity: Arity::Exact(1), func: rounding::trunc, doc: "Round towards zero" },
    "sign"     => { arity: Arity::Exact(1), func: rounding::sign, doc: "-1, 0 or 1" },
    "abs"      => { arity: Arity::Exact(1), func: rounding::abs, doc: "Absolute value or complex modulus" },

    "re"       => { arity: Arity::Exact(1), func: complex_parts::re, doc: "Real part" },
    "im"       => { arity: Arity::Exact(1), func: complex_parts::im, doc: "Imaginary part" },
    "conj"     => { arity: Arity::Exact(1), func: complex_parts::conj, doc: "Complex conjugate" },
    "arg"      => { arity: Arity::Exact(1), func: complex_parts::arg, doc: "Phase angle in (-pi, pi]" },
    "polar"    => { arity: Arity::Exact(1), func: complex_parts::polar, doc: "[modulus, argument] of a number" },
    "rect"     => { arity: Arity::Exact(2), func: complex_parts::rect, doc: "Number with modulus r and argument theta" },

    "fact"     => { arity: Arity::Exact(1), func: combinatorics::fact, doc: "Factorial, gamma(x + 1) for non-integers" },
    "gamma"    => { arity: Arity::Exact(1), func: combinatorics::gamma, doc: "Gamma function" },
    "lgamma"   => { arity: Arity::Exact(1), func: combinatorics::lgamma, doc: "Natural logarithm of |gamma(x)|" },
    "beta"     => { arity: Arity::Exact(2), func: combinatorics::beta, doc: "Beta function" },
    "binomial" => { arity: Arity::Exact(2), func: combinatorics::binomial, doc: "Binomial coefficient n choose k" },
    "choose"   => { arity: Arity::Exact(2), func: combinatorics::binomial, doc: "Alias of binomial" },
    "gcd"      => { arity: Arity::AtLeast(1), func: combinatorics::gcd, doc: "Greatest common divisor" },
    "lcm"      => { arity: Arity::AtLeast(1), func: combinatorics::lcm, doc: "Least common multiple" },
    "euler"    => { arity: Arity::Exact(1), func: combinatorics::euler, doc: "Absolute Euler (secant) number" },
    "fib"      => { arity: Arity::Exact(1), func: combinatorics::fib, doc: "Fibonacci number" },
    "erf"      => { arity: Arity::Exact(1), func: combinatorics::erf, doc: "Error function" },
    "erfc"     => { arity: Arity::Exact(1), func: combinatorics::erfc, doc: "Complementary error function" },

    "sum"      => { arity: Arity::Exact(1), func: statistics::sum, doc: "Sum of a list" },
    "average"  => { arity: Arity::Exact(1), func: statistics::average, doc: "Arithmetic mean of a list" },
    "mean"     => { arity: Arity::Exact(1), func: statistics::average, doc: "Alias of average" },
    "variance" => { arity: Arity::Exact(1), func: statistics::variance, doc: "Population variance" },
    "variance_sample" => { arity: Arity::Exact(1), func: statistics::variance_sample, doc: "Sample variance" },
    "stdev"    => { arity: Arity::Exact(1), func: statistics::stdev, doc: "Population standard deviation" },
    "stdev_sample" => { arity: Arity::Exact(1), func: statistics::stdev_sample, doc: "Sample standard deviation" },
    "harmonic_mean" => { arity: Arity::Exact(1), func: statistics::harmonic_mean, doc: "Harmonic mean of a list" },
    "median"   => { arity: Arity::Exact(1), func: statistics::median, doc: "Median of a list" },
    "mode"     => { arity: Arity::Exact(1), func: statistics::mode, doc: "Most frequent element, first on ties" },
    "min"      => { arity: Arity::AtLeast(1), func: statistics::min, doc: "Smallest argument or list element" },
    "max"      => { arity: Arity::AtLeast(1), func: statistics::max, doc: "Largest argument or list element" },
    "len"      => { arity: Arity::Exact(1), func: statistics::len, doc: "Length of a list or text" },

    "slice"    => { arity: Arity::Range(2, 3), func: sequence::slice, doc: "slice(list, start, [end]), end exclusive" },
    "map"      => { arity: Arity::Exact(2), func: sequence::map, doc: "Apply a function to every element" },
    "filter"   => { arity: Arity::Exact(2), func: sequence::filter, doc: "Keep the elements a predicate accepts" },

    "gradient" => { arity: Arity::Range(2, 3), func: calculus::gradient, doc: "Central difference of f at x" },
    "deriv"    => { arity: Arity::Range(1, 2), func: calculus::deriv, doc: "Numeric derivative of a function" },
    "derivative" => { arity: Arity::Range(1, 2), func: calculus::derivative, doc: "Closed-form derivative when known, else deriv" },
    "integ"    => { arity: Arity::Range(3, 4), func: calculus::integ, doc: "Definite integral by Simpson's rule" },
}

/// Finds a builtin by name.
///
/// # Example
/// ```
/// use mathly::interpreter::evaluator::function::core::{Arity, lookup_builtin};
///
/// assert_eq!(lookup_builtin("log").map(|def| def.arity), Some(Arity::Range(1, 2)));
/// assert!(lookup_builtin("logarithm").is_none());
/// ```
#[must_use]
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|def| def.name == name)
}

impl Context {
    /// Calls a value with already evaluated arguments.
    ///
    /// # Errors
    /// `NotCallable` if `callee` is not a function, plus anything the call
    /// itself raises.
    pub fn call_value(&mut self, callee: &Value, args: &[Value], offset: usize) -> EvalResult<Value> {
        match callee {
            Value::Function(function) => self.call_function(function, args, offset),
            other => Err(EvalError::not_callable(other.type_name(), offset)),
        }
    }

    /// Calls a function.
    ///
    /// - A closure binds its parameters in a new frame chained to the
    ///   environment it captured and evaluates its body there.
    /// - A builtin checks its arity contract and runs its implementation.
    /// - A derivative computes the central difference of its target.
    ///
    /// # Errors
    /// `WrongArity` on an argument count mismatch, plus anything the body
    /// or builtin raises.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::{
    ///     evaluator::{core::Context, function::core::lookup_builtin},
    ///     value::{core::Value, function::Function},
    /// };
    ///
    /// let mut context = Context::new();
    /// let max = Function::Builtin(lookup_builtin("max").unwrap());
    ///
    /// let result = context.call_function(&max, &[Value::from(3), Value::from(8)], 0);
    /// assert_eq!(result.unwrap(), Value::from(8));
    /// ```
    pub fn call_function(&mut self,
                         function: &Function,
                         args: &[Value],
                         offset: usize)
                         -> EvalResult<Value> {
        match function {
            Function::Closure(closure) => {
                if args.len() != closure.params.len() {
                    return Err(EvalError::wrong_arity(closure.params.len(), args.len(), offset));
                }

                trace!(params = ?closure.params, "calling closure");

                let bindings = closure.params
                                      .iter()
                                      .cloned()
                                      .zip(args.iter().cloned())
                                      .collect::<HashMap<_, _>>();
                let env = closure.env.extend(bindings);

                self.eval(&closure.body, &env)
            },
            Function::Builtin(def) => {
                if !def.arity.check(args.len()) {
                    return Err(EvalError::wrong_arity(def.arity, args.len(), offset));
                }

                trace!(name = def.name, arguments = args.len(), "calling builtin");

                (def.func)(self, args, offset)
            },
            Function::Derivative { target, step } => {
                if args.len() != 1 {
                    return Err(EvalError::wrong_arity(1, args.len(), offset));
                }

                calculus::central_difference(self, target, &args[0], *step, offset)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::error::EvalErrorKind;

    #[test]
    fn builtin_names_are_unique() {
        let names: HashSet<_> = BUILTIN_FUNCTIONS.iter().collect();
        assert_eq!(names.len(), BUILTIN_FUNCTIONS.len());
    }

    #[test]
    fn every_builtin_is_documented() {
        assert!(BUILTIN_TABLE.iter().all(|def| !def.doc.is_empty()));
    }

    #[test]
    fn arity_is_checked_before_dispatch() {
        let sin = Function::Builtin(lookup_builtin("sin").unwrap());
        let err = Context::new().call_function(&sin, &[Value::from(1), Value::from(2)], 7)
                                .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::WrongArity);
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn calling_a_number_is_not_callable() {
        let err = Context::new().call_value(&Value::from(2), &[], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::NotCallable);
    }

    #[test]
    fn arity_display() {
        assert_eq!(Arity::Exact(2).to_string(), "2");
        assert_eq!(Arity::Range(3, 4).to_string(), "3 to 4");
        assert_eq!(Arity::AtLeast(1).to_string(), "at least 1");
    }
}
