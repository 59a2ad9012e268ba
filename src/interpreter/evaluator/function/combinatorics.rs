use std::f64::consts::PI;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{euler_gamma, integer_arg, ln_gamma, real_arg},
        },
        value::core::Value,
    },
    util::num::usize_to_f64,
};

/// Largest `n` for which `fact(n)` is computed exactly.
const MAX_FACTORIAL: u64 = 20_000;
/// Largest index accepted by `fib`.
const MAX_FIBONACCI: u64 = 1_000_000;
/// Largest index accepted by `euler`.
const MAX_EULER: usize = 2_000;
/// Largest `min(k, n - k)` accepted by `binomial`.
const MAX_BINOMIAL_TERMS: u64 = 1_000_000;
/// Below this magnitude `erf` uses its Taylor series, above it the continued
/// fraction of `erfc`.
const ERF_SERIES_LIMIT: f64 = 2.5;

/// Factorial.
///
/// Non-negative integers give the exact factorial; other reals give
/// `gamma(x + 1)`.
///
/// # Errors
/// - `DomainError` for negative integers and integers above the supported
///   size.
/// - `TypeMismatch` for non-real arguments.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::fact},
///     value::core::Value,
/// };
///
/// let result = fact(&mut Context::new(), &[Value::from(25)], 0).unwrap();
/// assert_eq!(result.to_string(), "15511210043330985984000000");
/// ```
pub fn fact(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    if let Value::Integer(n) = &args[0] {
        if n.is_negative() {
            return Err(EvalError::domain(format!("Factorial of negative integer {n}"), offset));
        }
        let n = n.to_u64()
                 .filter(|n| *n <= MAX_FACTORIAL)
                 .ok_or_else(|| EvalError::domain(format!("Factorial of {n} is too large"), offset))?;

        return Ok(Value::Integer((2..=n).fold(BigInt::one(), |acc, k| acc * k)));
    }

    let x = real_arg(args, 0, offset)?;
    Ok(Value::Real(euler_gamma(x + 1.0, offset)?))
}

/// The gamma function.
///
/// # Errors
/// `DomainError` at zero and the negative integers.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::gamma},
///     value::core::Value,
/// };
///
/// let result = gamma(&mut Context::new(), &[Value::from(5)], 0).unwrap();
/// assert_eq!(result, Value::Real(24.0));
/// ```
pub fn gamma(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(euler_gamma(real_arg(args, 0, offset)?, offset)?))
}

/// `ln |gamma(x)|`, finite far beyond the range of `gamma`.
pub fn lgamma(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(ln_gamma(real_arg(args, 0, offset)?, offset)?))
}

/// The beta function `gamma(a) gamma(b) / gamma(a + b)`.
///
/// Positive arguments go through `lgamma` so that large ones do not
/// overflow.
///
/// # Errors
/// `DomainError` when `a`, `b` or `a + b` is a pole of gamma.
pub fn beta(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let a = real_arg(args, 0, offset)?;
    let b = real_arg(args, 1, offset)?;

    if a > 0.0 && b > 0.0 {
        let ln_beta = ln_gamma(a, offset)? + ln_gamma(b, offset)? - ln_gamma(a + b, offset)?;
        return Ok(Value::Real(ln_beta.exp()));
    }

    let denominator = euler_gamma(a + b, offset)?;
    Ok(Value::Real(euler_gamma(a, offset)? * euler_gamma(b, offset)? / denominator))
}

/// Calculates the binomial coefficient of two integers, *n* and *k*.
///
/// The result is exact. It is zero when `k < 0` or `k > n`.
///
/// # Errors
/// - `TypeMismatch` for non-integer arguments.
/// - `DomainError` for negative `n`, or when `min(k, n - k)` is enormous.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::binomial},
///     value::core::Value,
/// };
///
/// let mut context = Context::new();
///
/// let result = binomial(&mut context, &[Value::from(5), Value::from(2)], 0).unwrap();
/// assert_eq!(result, Value::from(10));
///
/// let result = binomial(&mut context, &[Value::from(2), Value::from(5)], 0).unwrap();
/// assert_eq!(result, Value::from(0));
/// ```
pub fn binomial(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let n = integer_arg(args, 0, offset)?;
    let k = integer_arg(args, 1, offset)?;

    if n.is_negative() {
        return Err(EvalError::domain(format!("binomial({n}, {k}) needs a non-negative n"),
                                     offset));
    }
    if k.is_negative() || k > n {
        return Ok(Value::Integer(BigInt::zero()));
    }

    let k = std::cmp::min(k.clone(), n - k);
    let terms = k.to_u64()
                 .filter(|k| *k <= MAX_BINOMIAL_TERMS)
                 .ok_or_else(|| EvalError::domain("Binomial coefficient is too large", offset))?;

    let start = n - &k;
    let mut result = BigInt::one();
    for i in 1..=terms {
        result = result * (&start + i) / i;
    }

    Ok(Value::Integer(result))
}

/// Greatest common divisor of one or more integers.
///
/// The result is never negative; `gcd(0, 0)` is `0`.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::gcd},
///     value::core::Value,
/// };
///
/// let result = gcd(&mut Context::new(), &[Value::from(4584), Value::from(248)], 0).unwrap();
/// assert_eq!(result, Value::from(8));
/// ```
pub fn gcd(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let mut result = BigInt::zero();
    for index in 0..args.len() {
        result = gcd_of(&result, integer_arg(args, index, offset)?);
    }
    Ok(Value::Integer(result))
}

/// Least common multiple of one or more integers.
///
/// The result is never negative and is zero as soon as one argument is.
pub fn lcm(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let mut result = BigInt::one();
    for index in 0..args.len() {
        let n = integer_arg(args, index, offset)?;
        if n.is_zero() || result.is_zero() {
            result = BigInt::zero();
            continue;
        }
        result = (&result * n).abs() / gcd_of(&result, n);
    }
    Ok(Value::Integer(result))
}

/// Euclid's algorithm.
fn gcd_of(a: &BigInt, b: &BigInt) -> BigInt {
    let mut a = a.abs();
    let mut b = b.abs();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// The absolute Euler (secant) number of index `n`.
///
/// Odd indices give zero. The value is computed exactly with the
/// Seidel boustrophedon triangle.
///
/// # Errors
/// `DomainError` for negative or unreasonably large `n`.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::euler},
///     value::core::Value,
/// };
///
/// let result = euler(&mut Context::new(), &[Value::from(10)], 0).unwrap();
/// assert_eq!(result, Value::from(50521));
/// ```
pub fn euler(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let n = integer_arg(args, 0, offset)?;
    let n = n.to_usize()
             .filter(|n| *n <= MAX_EULER)
             .ok_or_else(|| EvalError::domain(format!("euler({n}) is out of range"), offset))?;

    if n % 2 == 1 {
        return Ok(Value::Integer(BigInt::zero()));
    }

    let mut row = vec![BigInt::one()];
    for i in 1..=n {
        let mut next = Vec::with_capacity(i + 1);
        next.push(BigInt::zero());
        for j in 0..i {
            let value = &next[j] + &row[i - 1 - j];
            next.push(value);
        }
        row = next;
    }

    Ok(Value::Integer(row.swap_remove(n)))
}

/// The Fibonacci number of index `n`, exact.
///
/// Negative indices follow `F(-n) = (-1)^(n + 1) F(n)`.
///
/// # Errors
/// `DomainError` when `|n|` exceeds the supported size.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::fib},
///     value::core::Value,
/// };
///
/// let mut context = Context::new();
///
/// assert_eq!(fib(&mut context, &[Value::from(10)], 0).unwrap(), Value::from(55));
/// assert_eq!(fib(&mut context, &[Value::from(-4)], 0).unwrap(), Value::from(-3));
/// ```
pub fn fib(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let n = integer_arg(args, 0, offset)?;
    let index = n.abs()
                 .to_u64()
                 .filter(|n| *n <= MAX_FIBONACCI)
                 .ok_or_else(|| EvalError::domain(format!("fib({n}) is out of range"), offset))?;

    let (value, _) = fib_pair(index);
    if n.is_negative() && index % 2 == 0 {
        return Ok(Value::Integer(-value));
    }
    Ok(Value::Integer(value))
}

/// `(F(n), F(n + 1))` by fast doubling.
fn fib_pair(n: u64) -> (BigInt, BigInt) {
    let mut a = BigInt::zero();
    let mut b = BigInt::one();

    for bit in (0..u64::BITS - n.leading_zeros()).rev() {
        let c = &a * (&b * 2u32 - &a);
        let d = &a * &a + &b * &b;

        if (n >> bit) & 1 == 1 {
            b = &c + &d;
            a = d;
        } else {
            a = c;
            b = d;
        }
    }

    (a, b)
}

/// The error function.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::combinatorics::erf},
///     value::core::Value,
/// };
///
/// let Value::Real(x) = erf(&mut Context::new(), &[Value::from(1)], 0).unwrap() else {
///     panic!("erf returns a real");
/// };
/// assert!((x - 0.842_700_792_949_714_9).abs() < 1e-14);
/// ```
pub fn erf(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(erf_real(real_arg(args, 0, offset)?)))
}

/// The complementary error function `1 - erf(x)`, accurate for large `x`.
pub fn erfc(_: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    Ok(Value::Real(erfc_real(real_arg(args, 0, offset)?)))
}

fn erf_real(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    if x.abs() <= ERF_SERIES_LIMIT {
        return erf_series(x);
    }
    (1.0 - erfc_fraction(x.abs())).copysign(x)
}

fn erfc_real(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    if x > ERF_SERIES_LIMIT {
        return erfc_fraction(x);
    }
    if x < -ERF_SERIES_LIMIT {
        return 2.0 - erfc_fraction(-x);
    }
    1.0 - erf_series(x)
}

/// `2/sqrt(pi) * sum (-1)^n x^(2n+1) / (n! (2n+1))`.
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;

    for n in 1..200 {
        let n = usize_to_f64(n);
        term *= -x2 / n;
        let contribution = term / 2.0f64.mul_add(n, 1.0);
        sum += contribution;
        if contribution.abs() < sum.abs() * f64::EPSILON {
            break;
        }
    }

    sum * 2.0 / PI.sqrt()
}

/// Continued fraction of `erfc(x)` for `x > 0`:
/// `exp(-x^2)/sqrt(pi) / (x + (1/2)/(x + 1/(x + (3/2)/(x + ...))))`.
fn erfc_fraction(x: f64) -> f64 {
    let mut t = x;
    for k in (1..=80).rev() {
        t = x + usize_to_f64(k) / 2.0 / t;
    }
    (-x * x).exp() / PI.sqrt() / t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorKind;

    fn call(f: fn(&mut Context, &[Value], usize) -> EvalResult<Value>, args: &[Value]) -> Value {
        f(&mut Context::new(), args, 0).unwrap()
    }

    #[test]
    fn fib_400_is_exact() {
        assert_eq!(call(fib, &[Value::from(400)]).to_string(),
                   "176023680645013966468226945392411250770384383304492191886725992896575345044216019675");
    }

    #[test]
    fn fib_small_indices() {
        let values: Vec<String> = (0..10).map(|n| call(fib, &[Value::from(n)]).to_string())
                                         .collect();
        assert_eq!(values, ["0", "1", "1", "2", "3", "5", "8", "13", "21", "34"]);
    }

    #[test]
    fn euler_numbers() {
        assert_eq!(call(euler, &[Value::from(0)]), Value::from(1));
        assert_eq!(call(euler, &[Value::from(4)]), Value::from(5));
        assert_eq!(call(euler, &[Value::from(7)]), Value::from(0));
        assert_eq!(call(euler, &[Value::from(20)]).to_string(), "370371188237525");
    }

    #[test]
    fn fact_of_real_uses_gamma() {
        let Value::Real(x) = call(fact, &[Value::Real(0.5)]) else {
            panic!("fact(0.5) must be real");
        };
        assert!((x - PI.sqrt() / 2.0).abs() < 1e-12);

        let err = fact(&mut Context::new(), &[Value::from(-3)], 0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn binomial_is_exact_for_large_arguments() {
        assert_eq!(call(binomial, &[Value::from(100), Value::from(50)]).to_string(),
                   "100891344545564193334812497256");
        assert_eq!(call(binomial, &[Value::from(7), Value::from(-1)]), Value::from(0));
    }

    #[test]
    fn gcd_and_lcm_are_variadic() {
        assert_eq!(call(gcd, &[Value::from(12), Value::from(-18), Value::from(30)]),
                   Value::from(6));
        assert_eq!(call(lcm, &[Value::from(4), Value::from(6), Value::from(10)]),
                   Value::from(60));
        assert_eq!(call(lcm, &[Value::from(4), Value::from(0)]), Value::from(0));
    }

    #[test]
    fn gcd_rejects_reals() {
        let err = gcd(&mut Context::new(), &[Value::from(4), Value::Real(2.0)], 0).unwrap_err();
        assert!(err.detail.contains("argument #2"));
    }

    #[test]
    fn erf_and_erfc_are_complementary() {
        for x in [-3.0, -1.0, 0.0, 0.3, 2.0, 2.6, 4.0] {
            assert!((erf_real(x) + erfc_real(x) - 1.0).abs() < 1e-13, "x = {x}");
        }
        assert!((erfc_real(3.0) - 2.209_049_699_858_544e-5).abs() < 1e-18);
    }

    #[test]
    fn beta_matches_gamma_ratio() {
        let Value::Real(x) = call(beta, &[Value::from(2), Value::from(3)]) else {
            panic!("beta must be real");
        };
        assert!((x - 1.0 / 12.0).abs() < 1e-14);
    }
}
