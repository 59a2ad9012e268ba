use std::rc::Rc;

use num_bigint::BigInt;

use crate::interpreter::{beautifier::beautify, value::complex::ComplexNumber};

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code: numbers of every kind, booleans and text.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// An integer literal of arbitrary size.
    Integer(BigInt),
    /// A 64-bit floating-point literal.
    Real(f64),
    /// A complex literal, written `3i` or folded from `2 + 3i`.
    Complex(ComplexNumber),
    /// A boolean literal value: `TRUE` or `FALSE`.
    Bool(bool),
    /// A text literal such as `"abc"`.
    Text(String),
}

impl From<BigInt> for LiteralValue {
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ComplexNumber> for LiteralValue {
    fn from(value: ComplexNumber) -> Self {
        Self::Complex(value)
    }
}

impl From<(f64, f64)> for LiteralValue {
    fn from(value: (f64, f64)) -> Self {
        Self::Complex(ComplexNumber::new(value.0, value.1))
    }
}

impl LiteralValue {
    /// Returns the literal negated, if it is numeric.
    #[must_use]
    pub fn negated(&self) -> Option<Self> {
        match self {
            Self::Integer(n) => Some(Self::Integer(-n)),
            Self::Real(r) => Some(Self::Real(-r)),
            Self::Complex(c) => Some(Self::Complex(-*c)),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Every node records the byte offset of the token that introduced it.
/// The tree is immutable once built; lambda bodies are reference counted so
/// that closures created during evaluation can share them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric, boolean or text constant.
    Literal {
        /// The constant.
        value:  LiteralValue,
        /// Byte offset in the source.
        offset: usize,
    },
    /// A name, resolved at evaluation time.
    Identifier {
        /// The name as written.
        name:   String,
        /// Byte offset in the source.
        offset: usize,
    },
    /// A prefix operator applied to one operand.
    UnaryOp {
        /// The operator.
        op:     UnaryOperator,
        /// The operand.
        expr:   Box<Self>,
        /// Byte offset in the source.
        offset: usize,
    },
    /// An infix operator applied to two operands.
    BinaryOp {
        /// The left operand.
        left:   Box<Self>,
        /// The operator.
        op:     BinaryOperator,
        /// The right operand.
        right:  Box<Self>,
        /// Byte offset of the operator.
        offset: usize,
    },
    /// A list literal `[a, b, ...]`.
    List {
        /// The element expressions; may contain [`Expr::Spread`].
        elements: Vec<Self>,
        /// Byte offset in the source.
        offset:   usize,
    },
    /// Indexing `target[index]`.
    Index {
        /// The list or text being indexed.
        target: Box<Self>,
        /// The index expression.
        index:  Box<Self>,
        /// Byte offset of the `[`.
        offset: usize,
    },
    /// A call `callee(arguments...)`. The callee may be any expression.
    Call {
        /// The expression producing the function.
        callee:    Box<Self>,
        /// The argument expressions; may contain [`Expr::Spread`].
        arguments: Vec<Self>,
        /// Byte offset of the `(`.
        offset:    usize,
    },
    /// An anonymous function `{x, y}(body)`.
    Lambda {
        /// The parameter names.
        params: Rc<[String]>,
        /// The body, shared with every closure created from this node.
        body:   Rc<Self>,
        /// Byte offset of the `{`.
        offset: usize,
    },
    /// `*list` inside an argument list or list literal.
    Spread {
        /// The expression that must evaluate to a list.
        expr:   Box<Self>,
        /// Byte offset of the `*`.
        offset: usize,
    },
}

impl Expr {
    /// Returns the source offset associated with this expression.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Literal { offset, .. }
            | Self::Identifier { offset, .. }
            | Self::UnaryOp { offset, .. }
            | Self::BinaryOp { offset, .. }
            | Self::List { offset, .. }
            | Self::Index { offset, .. }
            | Self::Call { offset, .. }
            | Self::Lambda { offset, .. }
            | Self::Spread { offset, .. } => *offset,
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", beautify(self))
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `-x`: numeric negation, list reversal.
    Negate,
    /// `NOT x`: boolean negation.
    Not,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`, also written as juxtaposition.
    Mul,
    /// `/`
    Div,
    /// `^`
    Pow,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `AND`, `&`
    And,
    /// `OR`, `|`
    Or,
    /// `XOR`
    Xor,
}

/// Binding strength of an operator level; higher binds tighter.
pub type Precedence = u8;

/// Boolean operators.
pub const PREC_BOOLEAN: Precedence = 1;
/// Comparisons.
pub const PREC_COMPARISON: Precedence = 2;
/// Addition and subtraction.
pub const PREC_ADDITIVE: Precedence = 3;
/// Multiplication and division.
pub const PREC_MULTIPLICATIVE: Precedence = 4;
/// Exponentiation.
pub const PREC_POWER: Precedence = 5;
/// Prefix operators.
pub const PREC_UNARY: Precedence = 6;
/// Calls, indexing and atoms.
pub const PREC_POSTFIX: Precedence = 7;

impl BinaryOperator {
    /// Returns the precedence level of the operator.
    ///
    /// # Example
    /// ```
    /// use mathly::ast::BinaryOperator;
    ///
    /// assert!(BinaryOperator::Mul.precedence() > BinaryOperator::Add.precedence());
    /// assert!(BinaryOperator::Pow.precedence() > BinaryOperator::Div.precedence());
    /// ```
    #[must_use]
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::And | Self::Or | Self::Xor => PREC_BOOLEAN,
            Self::Equal
            | Self::NotEqual
            | Self::Greater
            | Self::GreaterEqual
            | Self::Less
            | Self::LessEqual => PREC_COMPARISON,
            Self::Add | Self::Sub => PREC_ADDITIVE,
            Self::Mul | Self::Div => PREC_MULTIPLICATIVE,
            Self::Pow => PREC_POWER,
        }
    }

    /// Only `^` groups to the right.
    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }

    /// The canonical spelling used by the beautifier.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "NOT"),
        }
    }
}
