use std::{
    f64::consts::{E, PI, TAU},
    rc::Rc,
};

use tracing::warn;

use crate::{
    ast::Expr,
    error::EvalError,
    interpreter::{
        evaluator::{env::Env, function::core::lookup_builtin},
        value::{
            complex::I,
            core::Value,
            function::{Closure, Function},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an
/// `EvalError` describing the failure.
pub type EvalResult<T> = Result<T, EvalError>;

/// Default relative tolerance used by `==` and `!=`.
pub const DEFAULT_EPSILON: f64 = 1e-9;
/// Default bound on nested evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 1000;
/// Default step of numeric differentiation.
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-5;
/// Default number of Simpson intervals used by `integ`.
pub const DEFAULT_INTEGRATION_STEPS: usize = 10_000;

/// Names that resolve to constants when no binding shadows them.
pub const CONSTANTS: &[&str] = &["pi", "e", "i", "tau"];

/// Tunable evaluation parameters.
///
/// # Example
/// ```
/// use mathly::EvalConfig;
///
/// let config = EvalConfig { max_depth: 64,
///                           ..EvalConfig::default() };
/// assert_eq!(config.epsilon, 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalConfig {
    /// Relative tolerance of numeric equality:
    /// `|a - b| <= epsilon * max(1, |a|, |b|)`.
    pub epsilon:           f64,
    /// Deepest nesting of evaluation before `RecursionLimitExceeded`.
    pub max_depth:         usize,
    /// Step used by `gradient`, `deriv` and `derivative` when none is given.
    pub derivative_step:   f64,
    /// Simpson intervals used by `integ` when none is given.
    pub integration_steps: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self { epsilon:           DEFAULT_EPSILON,
               max_depth:         DEFAULT_MAX_DEPTH,
               derivative_step:   DEFAULT_DERIVATIVE_STEP,
               integration_steps: DEFAULT_INTEGRATION_STEPS, }
    }
}

/// Stores the runtime evaluation context.
///
/// The context holds the configuration and the current evaluation depth.
/// Variables live in [`Env`] chains passed alongside, so a single `Context`
/// can evaluate any number of independent expressions.
///
/// ## Usage
///
/// `Context` is created once per evaluation session. Builtins receive it as
/// `&mut Context` so that higher-order functions such as `map` can call back
/// into the evaluator.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// The active configuration.
    pub config: EvalConfig,
    depth:      usize,
}

impl Context {
    /// Creates a context with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given configuration.
    #[must_use]
    pub const fn with_config(config: EvalConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Evaluates an expression in an environment.
    ///
    /// This is the main entry point for expression evaluation. Every call
    /// counts towards [`EvalConfig::max_depth`]; the native stack is grown on
    /// demand so that the configured depth is reachable.
    ///
    /// # Errors
    /// Any [`EvalError`] raised while evaluating `expr` or its children.
    ///
    /// # Example
    /// ```
    /// use mathly::interpreter::{
    ///     evaluator::{core::Context, env::Env},
    ///     lexer::tokenize,
    ///     parser::core::parse,
    ///     value::core::Value,
    /// };
    ///
    /// let expr = parse(&tokenize("6 / 3").unwrap()).unwrap();
    /// let value = Context::new().eval(&expr, &Env::new()).unwrap();
    /// assert_eq!(value, Value::from(2));
    /// ```
    pub fn eval(&mut self, expr: &Expr, env: &Env) -> EvalResult<Value> {
        if self.depth >= self.config.max_depth {
            warn!(limit = self.config.max_depth, "evaluation depth limit reached");
            return Err(EvalError::recursion_limit(self.config.max_depth, expr.offset()));
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_node(expr, env));
        self.depth -= 1;

        result
    }

    /// Dispatches on the expression variant.
    fn eval_node(&mut self, expr: &Expr, env: &Env) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.into()),
            Expr::Identifier { name, offset } => Self::lookup(name, *offset, env),
            Expr::UnaryOp { op, expr, offset } => {
                let operand = self.eval(expr, env)?;
                Self::eval_unary(*op, operand, *offset)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             offset, } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                self.eval_binary(*op, &left, &right, *offset)
            },
            Expr::List { elements, .. } => Ok(self.eval_arguments(elements, env)?.into()),
            Expr::Index { target,
                          index,
                          offset, } => {
                let target = self.eval(target, env)?;
                let index = self.eval(index, env)?;
                Self::index_value(&target, &index, *offset)
            },
            Expr::Call { callee,
                         arguments,
                         offset, } => {
                let callee = self.eval(callee, env)?;
                let arguments = self.eval_arguments(arguments, env)?;
                self.call_value(&callee, &arguments, *offset)
            },
            Expr::Lambda { params, body, .. } => {
                let closure = Closure { params: Rc::clone(params),
                                        body:   Rc::clone(body),
                                        env:    env.clone(), };
                Ok(Function::Closure(Rc::new(closure)).into())
            },
            Expr::Spread { offset, .. } => {
                Err(EvalError::type_mismatch("A spread '*' is only allowed in argument lists \
                                              and list literals",
                                             *offset))
            },
        }
    }

    /// Resolves a name: local bindings first, then constants, then builtins.
    ///
    /// # Errors
    /// `UndefinedName` when nothing matches.
    pub fn lookup(name: &str, offset: usize, env: &Env) -> EvalResult<Value> {
        if let Some(value) = env.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = constant(name) {
            return Ok(value);
        }
        if let Some(def) = lookup_builtin(name) {
            return Ok(Function::Builtin(def).into());
        }
        Err(EvalError::undefined_name(name, offset))
    }

    /// Current nesting depth of [`Self::eval`].
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }
}

/// The value of a named constant, if `name` is one.
///
/// # Example
/// ```
/// use mathly::interpreter::{evaluator::core::constant, value::core::Value};
///
/// assert_eq!(constant("pi"), Some(Value::Real(std::f64::consts::PI)));
/// assert_eq!(constant("phi"), None);
/// ```
#[must_use]
pub fn constant(name: &str) -> Option<Value> {
    match name {
        "pi" => Some(PI.into()),
        "e" => Some(E.into()),
        "tau" => Some(TAU.into()),
        "i" => Some(I.into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::EvalErrorKind,
        interpreter::{lexer::tokenize, parser::core::parse},
    };

    fn eval_with(config: EvalConfig, source: &str) -> EvalResult<Value> {
        let expr = parse(&tokenize(source).unwrap()).unwrap();
        Context::with_config(config).eval(&expr, &Env::new())
    }

    #[test]
    fn depth_returns_to_zero_after_evaluation() {
        let expr = parse(&tokenize("[1, [2, [3]]]").unwrap()).unwrap();
        let mut context = Context::new();
        context.eval(&expr, &Env::new()).unwrap();
        assert_eq!(context.depth(), 0);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let config = EvalConfig { max_depth: 4,
                                  ..EvalConfig::default() };
        let err = eval_with(config, "((((((1 + 1) + 1) + 1) + 1) + 1) + 1)").unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::RecursionLimitExceeded);
    }

    #[test]
    fn runaway_self_application_hits_the_limit() {
        let err = eval_with(EvalConfig::default(), "{f}(f(f))({f}(f(f)))").unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::RecursionLimitExceeded);
    }

    #[test]
    fn bindings_shadow_constants_and_builtins() {
        assert_eq!(eval_with(EvalConfig::default(), "{pi, sin}(pi + sin)(1, 2)").unwrap(),
                   Value::from(3));
    }
}
