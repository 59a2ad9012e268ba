use std::rc::Rc;

use num_traits::ToPrimitive;
use tracing::debug;

use crate::{
    ast::BinaryOperator,
    error::EvalError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            env::Env,
            utils::{complex_arg, function_arg, integer_arg, real_arg},
        },
        lexer::tokenize,
        parser::core::parse,
        value::{complex::ZERO, core::Value, function::Function},
    },
    util::num::usize_to_f64,
};

/// Most Simpson intervals `integ` accepts.
const MAX_INTEGRATION_STEPS: usize = 1_000_000;

/// Closed-form derivatives of builtins, written in the language itself.
const DERIVATIVES: &[(&str, &str)] = &[("ln", "{x}(1 / x)"),
                                       ("log10", "{x}(1 / (x * ln(10)))"),
                                       ("exp", "exp"),
                                       ("sqrt", "{x}(1 / (2 * sqrt(x)))"),
                                       ("sin", "cos"),
                                       ("cos", "{x}(-sin(x))"),
                                       ("tan", "{x}(1 / cos(x) ^ 2)"),
                                       ("sec", "{x}(sec(x) * tan(x))"),
                                       ("csc", "{x}(-(csc(x) * cot(x)))"),
                                       ("cot", "{x}(-(csc(x) ^ 2))"),
                                       ("asin", "{x}(1 / sqrt(1 - x ^ 2))"),
                                       ("acos", "{x}(-1 / sqrt(1 - x ^ 2))"),
                                       ("atan", "{x}(1 / (1 + x ^ 2))"),
                                       ("sinh", "cosh"),
                                       ("cosh", "sinh"),
                                       ("tanh", "{x}(1 / cosh(x) ^ 2)"),
                                       ("asinh", "{x}(1 / sqrt(x ^ 2 + 1))"),
                                       ("acosh", "{x}(1 / sqrt(x ^ 2 - 1))"),
                                       ("atanh", "{x}(1 / (1 - x ^ 2))"),
                                       ("erf", "{x}(2 / sqrt(pi) * exp(-(x ^ 2)))"),
                                       ("erfc", "{x}(-2 / sqrt(pi) * exp(-(x ^ 2)))")];

/// `(f(x + h) - f(x - h)) / (2h)`.
///
/// # Errors
/// `DomainError` for a zero or non-finite step, and anything `f` raises.
pub fn central_difference(context: &mut Context,
                          target: &Function,
                          x: &Value,
                          step: f64,
                          offset: usize)
                          -> EvalResult<Value> {
    if step == 0.0 || !step.is_finite() {
        return Err(EvalError::domain(format!("Invalid differentiation step {step}"), offset));
    }

    let h = Value::Real(step);
    let ahead = context.eval_binary(BinaryOperator::Add, x, &h, offset)?;
    let behind = context.eval_binary(BinaryOperator::Sub, x, &h, offset)?;

    let ahead = context.call_function(target, &[ahead], offset)?;
    let behind = context.call_function(target, &[behind], offset)?;

    let difference = context.eval_binary(BinaryOperator::Sub, &ahead, &behind, offset)?;
    context.eval_binary(BinaryOperator::Div, &difference, &Value::Real(2.0 * step), offset)
}

/// The differentiation step: argument `index` if present, else the configured
/// default.
fn step_arg(context: &Context, args: &[Value], index: usize, offset: usize) -> EvalResult<f64> {
    match args.get(index) {
        Some(_) => real_arg(args, index, offset),
        None => Ok(context.config.derivative_step),
    }
}

/// `gradient(f, x, [h])`, the central difference of `f` at `x`.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::{calculus::gradient, core::lookup_builtin}},
///     value::{core::Value, function::Function},
/// };
///
/// let sin = Value::from(Function::Builtin(lookup_builtin("sin").unwrap()));
/// let Value::Real(slope) = gradient(&mut Context::new(), &[sin, Value::from(0)], 0).unwrap()
/// else {
///     panic!("the slope of sin at 0 is real");
/// };
/// assert!((slope - 1.0).abs() < 1e-9);
/// ```
pub fn gradient(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let function = function_arg(args, 0, offset)?;
    complex_arg(args, 1, offset)?;
    let step = step_arg(context, args, 2, offset)?;

    central_difference(context, function, &args[1], step, offset)
}

/// `deriv(f, [h])`, a function computing `gradient(f, x, h)`.
pub fn deriv(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let function = function_arg(args, 0, offset)?;
    let step = step_arg(context, args, 1, offset)?;

    Ok(Value::from(Function::Derivative { target: Rc::new(function.clone()),
                                          step }))
}

/// `derivative(f, [h])`.
///
/// Builtins with a known derivative give its closed form, as a builtin or a
/// lambda; every other function falls back to [`deriv`].
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::{calculus::derivative, core::lookup_builtin}},
///     value::{core::Value, function::Function},
/// };
///
/// let ln = Value::from(Function::Builtin(lookup_builtin("ln").unwrap()));
/// let result = derivative(&mut Context::new(), &[ln], 0).unwrap();
/// assert_eq!(result.to_string(), "{x}(1 / x)");
/// ```
pub fn derivative(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    if let Value::Function(Function::Builtin(def)) = &args[0]
       && let Some(value) = closed_form(context, def.name, offset)
    {
        debug!(name = def.name, "using closed-form derivative");
        return value;
    }

    deriv(context, args, offset)
}

/// Evaluates the closed-form derivative of the builtin `name`, if one is
/// known. Errors raised while building it are returned, not skipped.
fn closed_form(context: &mut Context, name: &str, offset: usize) -> Option<EvalResult<Value>> {
    let (_, source) = DERIVATIVES.iter().find(|(builtin, _)| *builtin == name)?;

    let table_error = |e: &dyn std::fmt::Display| {
        EvalError::domain(format!("no derivative of {name}: {e}"), offset)
    };
    let expr = tokenize(source).map_err(|e| table_error(&e))
                               .and_then(|tokens| parse(&tokens).map_err(|e| table_error(&e)));
    Some(expr.and_then(|expr| context.eval(&expr, &Env::new())))
}

/// `integ(f, a, b, [steps])`, the composite Simpson rule over `[a, b]`.
///
/// The number of intervals defaults to the configured value and is rounded
/// up to an even count. The integrand may be complex; a result whose
/// imaginary part is exactly zero is returned as a real.
///
/// # Errors
/// - `DomainError` for fewer than one or more than a million steps.
/// - `TypeMismatch` when `f` does not return numbers.
///
/// # Example
/// ```
/// use mathly::interpreter::{
///     evaluator::{core::Context, function::{calculus::integ, core::lookup_builtin}},
///     value::{core::Value, function::Function},
/// };
///
/// let sin = Value::from(Function::Builtin(lookup_builtin("sin").unwrap()));
/// let pi = Value::Real(std::f64::consts::PI);
///
/// let Value::Real(area) = integ(&mut Context::new(), &[sin, Value::from(0), pi], 0).unwrap()
/// else {
///     panic!("the integral of sin is real");
/// };
/// assert!((area - 2.0).abs() < 1e-12);
/// ```
pub fn integ(context: &mut Context, args: &[Value], offset: usize) -> EvalResult<Value> {
    let function = function_arg(args, 0, offset)?;
    let a = real_arg(args, 1, offset)?;
    let b = real_arg(args, 2, offset)?;

    let steps = match args.get(3) {
        Some(_) => integer_arg(args, 3, offset)?.to_usize().unwrap_or(0),
        None => context.config.integration_steps,
    };
    if steps == 0 || steps > MAX_INTEGRATION_STEPS {
        return Err(EvalError::domain(format!("integ needs between 1 and \
                                              {MAX_INTEGRATION_STEPS} steps"),
                                     offset));
    }
    let steps = steps + steps % 2;

    let h = (b - a) / usize_to_f64(steps);
    let mut total = ZERO;

    for k in 0..=steps {
        let x = Value::Real(usize_to_f64(k).mul_add(h, a));
        let y = context.call_function(function, &[x], offset)?.as_complex(offset)?;

        let weight = if k == 0 || k == steps {
            1.0
        } else if k % 2 == 1 {
            4.0
        } else {
            2.0
        };
        total += y * weight;
    }

    Ok((total * (h / 3.0)).checked_as_real())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::EvalErrorKind,
        interpreter::evaluator::function::core::lookup_builtin,
    };

    fn builtin(name: &str) -> Value {
        Value::from(Function::Builtin(lookup_builtin(name).unwrap()))
    }

    #[test]
    fn every_closed_form_parses_and_evaluates() {
        let mut context = Context::new();
        for (name, _) in DERIVATIVES {
            assert!(lookup_builtin(name).is_some(), "{name} is not a builtin");
            assert!(matches!(closed_form(&mut context, name, 0), Some(Ok(_))), "{name}");
        }
    }

    #[test]
    fn closed_forms_agree_with_numeric_derivatives() {
        let mut context = Context::new();
        for (name, _) in DERIVATIVES {
            let exact = derivative(&mut context, &[builtin(name)], 0).unwrap();
            let numeric = deriv(&mut context, &[builtin(name)], 0).unwrap();

            let Value::Function(exact) = exact else { panic!("{name}") };
            let Value::Function(numeric) = numeric else { panic!("{name}") };

            let x = [Value::Real(0.3)];
            let a = context.call_function(&exact, &x, 0).unwrap().as_complex(0).unwrap();
            let b = context.call_function(&numeric, &x, 0).unwrap().as_complex(0).unwrap();
            assert!((a - b).abs() < 1e-6, "{name}: {a} vs {b}");
        }
    }

    #[test]
    fn closed_form_errors_are_not_replaced_by_numeric() {
        use crate::interpreter::evaluator::core::EvalConfig;

        let mut context = Context::with_config(EvalConfig { max_depth: 0,
                                                            ..EvalConfig::default() });
        let err = derivative(&mut context, &[builtin("ln")], 7).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::RecursionLimitExceeded);

        let result = derivative(&mut context, &[builtin("gamma")], 7).unwrap();
        assert!(matches!(result, Value::Function(Function::Derivative { .. })));
    }

    #[test]
    fn unknown_builtins_fall_back_to_numeric() {
        let result = derivative(&mut Context::new(), &[builtin("gamma")], 0).unwrap();
        assert!(matches!(result, Value::Function(Function::Derivative { .. })));
    }

    #[test]
    fn integ_of_complex_integrand_stays_complex() {
        let mut context = Context::new();
        let expr = parse(&tokenize("{x}(exp(i * x))").unwrap()).unwrap();
        let integrand = context.eval(&expr, &Env::new()).unwrap();
        let pi = Value::Real(std::f64::consts::PI);

        let result = integ(&mut context, &[integrand, Value::from(0), pi], 0).unwrap();
        let Value::Complex(z) = result else {
            panic!("expected a complex integral, got {result}");
        };
        assert!(z.real.abs() < 1e-12);
        assert!((z.imaginary - 2.0).abs() < 1e-12);
    }

    #[test]
    fn integ_of_real_integrand_is_real() {
        let result = integ(&mut Context::new(),
                           &[builtin("exp"), Value::from(0), Value::from(1)],
                           0).unwrap();
        let Value::Real(area) = result else {
            panic!("expected a real integral, got {result}");
        };
        assert!((area - (std::f64::consts::E - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn zero_steps_are_rejected() {
        let err = integ(&mut Context::new(),
                        &[builtin("sin"), Value::from(0), Value::from(1), Value::from(0)],
                        0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }

    #[test]
    fn zero_step_is_a_domain_error() {
        let err = gradient(&mut Context::new(),
                           &[builtin("sin"), Value::from(0), Value::Real(0.0)],
                           0).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DomainError);
    }
}
