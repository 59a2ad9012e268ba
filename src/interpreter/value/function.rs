use std::{fmt, rc::Rc};

use crate::{
    ast::Expr,
    interpreter::{
        beautifier::beautify_lambda, evaluator::env::Env,
        evaluator::function::core::BuiltinDef,
    },
};

/// A callable value.
///
/// Functions are first class: they can be stored in lists, passed to
/// `map`, returned from lambdas and called through any expression.
#[derive(Clone)]
pub enum Function {
    /// A lambda together with the environment it was created in.
    Closure(Rc<Closure>),
    /// An entry of the builtin registry.
    Builtin(&'static BuiltinDef),
    /// The numeric derivative of another function, produced by `deriv`.
    ///
    /// Calling it with `x` computes the central difference
    /// `(f(x + step) - f(x - step)) / (2 * step)`.
    Derivative {
        /// The function being differentiated.
        target: Rc<Self>,
        /// The differentiation step.
        step:   f64,
    },
}

/// A lambda captured at evaluation time.
pub struct Closure {
    /// Parameter names, bound positionally on each call.
    pub params: Rc<[String]>,
    /// The lambda body, shared with the AST.
    pub body:   Rc<Expr>,
    /// The environment the lambda was evaluated in.
    pub env:    Env,
}

impl PartialEq for Function {
    /// Builtins are equal by name, closures by identity and derivatives when
    /// they differentiate the same function with the same step.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            (Self::Closure(a), Self::Closure(b)) => Rc::ptr_eq(a, b),
            (Self::Derivative { target: t1,
                                step: s1, },
             Self::Derivative { target: t2,
                                step: s2, }) => s1 == s2 && t1 == t2,
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closure(closure) => {
                write!(f, "{}", beautify_lambda(&closure.params, &closure.body))
            },
            Self::Builtin(def) => write!(f, "<builtin {}>", def.name),
            Self::Derivative { target, .. } => write!(f, "deriv({target})"),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closure(closure) => {
                f.debug_struct("Closure")
                 .field("params", &closure.params)
                 .field("body", &beautify_lambda(&closure.params, &closure.body))
                 .finish_non_exhaustive()
            },
            Self::Builtin(def) => f.debug_tuple("Builtin").field(&def.name).finish(),
            Self::Derivative { target, step } => {
                f.debug_struct("Derivative")
                 .field("target", target)
                 .field("step", step)
                 .finish()
            },
        }
    }
}
