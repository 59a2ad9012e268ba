use std::f64::consts::{PI, TAU};

use num_bigint::BigInt;
use num_traits::Signed;

use crate::{
    ast::Expr,
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            env::Env,
        },
        value::{complex::ComplexNumber, core::Value, function::Function},
    },
    util::num::{bigint_to_usize, usize_to_f64},
};

/// Largest integer for which `gamma` multiplies out the factorial exactly
/// instead of using the Lanczos approximation; `gamma(172)` overflows `f64`.
const EXACT_GAMMA_LIMIT: f64 = 171.0;

impl Context {
    /// Evaluates the elements of a list literal or an argument list.
    ///
    /// Elements are evaluated left to right. A spread element `*expr` must
    /// evaluate to a list, whose items are inserted in place.
    ///
    /// # Errors
    /// `TypeMismatch` when a spread operand is not a list, and any error
    /// raised by the elements themselves.
    pub fn eval_arguments(&mut self, elements: &[Expr], env: &Env) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(elements.len());

        for element in elements {
            if let Expr::Spread { expr, offset } = element {
                match self.eval(expr, env)? {
                    Value::List(items) => values.extend(items.iter().cloned()),
                    other => {
                        return Err(EvalError::type_mismatch(format!("Cannot spread a value of \
                                                                     type {}",
                                                                    other.type_name()),
                                                            *offset));
                    },
                }
            } else {
                values.push(self.eval(element, env)?);
            }
        }

        Ok(values)
    }

    /// Indexes a list or a piece of text.
    ///
    /// A negative index `k` counts from the end and becomes `len + k`.
    ///
    /// # Errors
    /// - `TypeMismatch` if the target is not a list or text, or the index is
    ///   not an integer.
    /// - `DomainError` if the index is out of range.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let list = Value::from(vec![Value::from(8), Value::from(5), Value::from(42)]);
    ///
    /// assert_eq!(Context::index_value(&list, &Value::from(-1), 0).unwrap(), Value::from(42));
    /// assert!(Context::index_value(&list, &Value::from(3), 0).is_err());
    /// ```
    pub fn index_value(target: &Value, index: &Value, offset: usize) -> EvalResult<Value> {
        let Value::Integer(k) = index else {
            return Err(EvalError::type_mismatch(format!("Index must be an Integer, found {}",
                                                        index.type_name()),
                                                offset));
        };

        match target {
            Value::List(items) => {
                let position = resolve_index(k, items.len(), target, offset)?;
                Ok(items[position].clone())
            },
            Value::Text(text) => {
                let chars: Vec<char> = text.chars().collect();
                let position = resolve_index(k, chars.len(), target, offset)?;
                Ok(Value::Text(chars[position].to_string()))
            },
            other => Err(EvalError::type_mismatch(format!("Cannot index a value of type {}",
                                                          other.type_name()),
                                                  offset)),
        }
    }
}

/// Maps a possibly negative index onto `0..len`.
fn resolve_index(k: &BigInt, len: usize, target: &Value, offset: usize) -> EvalResult<usize> {
    let adjusted = if k.is_negative() { k + BigInt::from(len) } else { k.clone() };

    bigint_to_usize(&adjusted).filter(|position| *position < len)
                              .ok_or_else(|| {
                                  EvalError::domain(format!("Index {k} is out of range for a {} \
                                                             of length {len}",
                                                            target.type_name()),
                                                    offset)
                              })
}

/// Reads argument `index` as a real number.
///
/// # Errors
/// `TypeMismatch` naming the argument if it is not an integer or real.
pub fn real_arg(args: &[Value], index: usize, offset: usize) -> EvalResult<f64> {
    match &args[index] {
        value @ (Value::Integer(_) | Value::Real(_)) => value.as_real(offset),
        other => Err(EvalError::argument_mismatch(index, other, "a real number", offset)),
    }
}

/// Reads argument `index` as a complex number, promoting reals.
///
/// # Errors
/// `TypeMismatch` naming the argument if it is not numeric.
pub fn complex_arg(args: &[Value], index: usize, offset: usize) -> EvalResult<ComplexNumber> {
    match &args[index] {
        value if value.is_numeric() => value.as_complex(offset),
        other => Err(EvalError::argument_mismatch(index, other, "a number", offset)),
    }
}

/// Reads argument `index` as an integer.
///
/// # Errors
/// `TypeMismatch` naming the argument if it is not an integer.
pub fn integer_arg(args: &[Value], index: usize, offset: usize) -> EvalResult<&BigInt> {
    match &args[index] {
        Value::Integer(n) => Ok(n),
        other => Err(EvalError::argument_mismatch(index, other, "an integer", offset)),
    }
}

/// Reads argument `index` as a list.
///
/// # Errors
/// `TypeMismatch` naming the argument if it is not a list.
pub fn list_arg(args: &[Value], index: usize, offset: usize) -> EvalResult<&[Value]> {
    match &args[index] {
        Value::List(items) => Ok(items.as_slice()),
        other => Err(EvalError::argument_mismatch(index, other, "a list", offset)),
    }
}

/// Reads argument `index` as a function.
///
/// # Errors
/// `TypeMismatch` naming the argument if it is not callable.
pub fn function_arg(args: &[Value], index: usize, offset: usize) -> EvalResult<&Function> {
    match &args[index] {
        Value::Function(f) => Ok(f),
        other => Err(EvalError::argument_mismatch(index, other, "a function", offset)),
    }
}

/// Compares two complex numbers with a relative tolerance.
///
/// The numbers are considered equal when
///
/// `|a − b| ≤ epsilon * max(1, |a|, |b|)`
///
/// so values near zero are compared absolutely and large values relatively.
///
/// # Example
/// ```
/// use mathly::interpreter::{evaluator::utils::is_close, value::complex::ComplexNumber};
///
/// let a = ComplexNumber::new(1.000_000_000_1, 0.0);
/// let b = ComplexNumber::new(1.0, 0.0);
///
/// assert!(is_close(a, b, 1e-9));
/// assert!(!is_close(a, b, 1e-12));
/// ```
#[must_use]
pub fn is_close(a: ComplexNumber, b: ComplexNumber, epsilon: f64) -> bool {
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= epsilon * scale
}

/// Lanczos coefficients, g = 7, n = 9.
const LANCZOS: [f64; 9] = [0.999_999_999_999_809_9,
                           676.520_368_121_885_1,
                           -1_259.139_216_722_402_8,
                           771.323_428_777_653_1,
                           -176.615_029_162_140_6,
                           12.507_343_278_686_905,
                           -0.138_571_095_265_720_12,
                           9.984_369_578_019_572e-6,
                           1.505_632_735_149_311_6e-7];
const LANCZOS_G: f64 = 7.0;

/// Evaluates the Lanczos series and returns `(t, series)` for `z ≥ 0.5`.
fn lanczos_terms(z: f64) -> (f64, f64) {
    let z_minus_1 = z - 1.0;
    let mut x = LANCZOS[0];

    for (i, &c) in LANCZOS.iter().enumerate().skip(1) {
        x += c / (z_minus_1 + usize_to_f64(i));
    }

    (z_minus_1 + LANCZOS_G + 0.5, x)
}

/// Returns `true` when `z` is zero or a negative integer.
fn is_gamma_pole(z: f64) -> bool {
    z <= 0.0 && z.fract() == 0.0
}

/// Computes the gamma function Γ(z).
///
/// Positive integers up to 171 multiply out `(z - 1)!` exactly. Other inputs
/// use the 9-term Lanczos approximation (`g = 7`); for `z < 0.5` the
/// reflection formula is applied:
///
/// `Γ(z) = π / (sin(πz) * Γ(1 − z))`
///
/// # Errors
/// `DomainError` at the poles `0, -1, -2, ...` and for non-finite input.
///
/// # Example
/// ```
/// use mathly::interpreter::evaluator::utils::euler_gamma;
///
/// // Γ(5) = 4! = 24
/// assert_eq!(euler_gamma(5.0, 0).unwrap(), 24.0);
/// assert!((euler_gamma(0.5, 0).unwrap() - std::f64::consts::PI.sqrt()).abs() < 1e-12);
/// assert!(euler_gamma(-2.0, 0).is_err());
/// ```
pub fn euler_gamma(z: f64, offset: usize) -> EvalResult<f64> {
    if !z.is_finite() || is_gamma_pole(z) {
        return Err(EvalError::domain(format!("Gamma function is undefined at {z}"), offset));
    }

    if z.fract() == 0.0 && z <= EXACT_GAMMA_LIMIT {
        let mut product = 1.0;
        let mut k = 2.0;
        while k < z {
            product *= k;
            k += 1.0;
        }
        return Ok(product);
    }

    if z < 0.5 {
        return Ok(PI / ((PI * z).sin() * euler_gamma(1.0 - z, offset)?));
    }

    let (t, series) = lanczos_terms(z);
    Ok(TAU.sqrt() * t.powf(z - 0.5) * (-t).exp() * series)
}

/// Computes `ln |Γ(z)|`.
///
/// Unlike [`euler_gamma`] this stays finite for large arguments.
///
/// # Errors
/// `DomainError` at the poles of Γ and for non-finite input.
///
/// # Example
/// ```
/// use mathly::interpreter::evaluator::utils::ln_gamma;
///
/// assert!((ln_gamma(5.0, 0).unwrap() - 24f64.ln()).abs() < 1e-12);
/// assert!(ln_gamma(500.0, 0).unwrap().is_finite());
/// ```
pub fn ln_gamma(z: f64, offset: usize) -> EvalResult<f64> {
    if !z.is_finite() || is_gamma_pole(z) {
        return Err(EvalError::domain(format!("Gamma function is undefined at {z}"), offset));
    }

    if z < 0.5 {
        return Ok((PI / (PI * z).sin().abs()).ln() - ln_gamma(1.0 - z, offset)?);
    }

    let (t, series) = lanczos_terms(z);
    Ok(0.5f64.mul_add(TAU.ln(), (z - 0.5) * t.ln()) - t + series.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_matches_factorials() {
        assert_eq!(euler_gamma(6.0, 0).unwrap(), 120.0);
        assert_eq!(euler_gamma(1.0, 0).unwrap(), 1.0);
        assert!((euler_gamma(5.5, 0).unwrap() - 52.342_777_784_553_52).abs() < 1e-9);
    }

    #[test]
    fn gamma_reflects_negative_arguments() {
        let expected = -2.0 * PI.sqrt();
        assert!((euler_gamma(-0.5, 0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn ln_gamma_agrees_with_gamma() {
        for z in [0.3, 1.7, 4.2, 10.0] {
            let direct = euler_gamma(z, 0).unwrap().abs().ln();
            assert!((ln_gamma(z, 0).unwrap() - direct).abs() < 1e-10, "z = {z}");
        }
    }

    #[test]
    fn closeness_is_relative_for_large_values() {
        let a = ComplexNumber::new(2.5e54, 0.0);
        let b = ComplexNumber::new(2.5e54 * (1.0 + 1e-12), 0.0);
        assert!(is_close(a, b, 1e-9));
        assert!(!is_close(ComplexNumber::new(1e-5, 0.0), ComplexNumber::new(2e-5, 0.0), 1e-9));
    }
}
