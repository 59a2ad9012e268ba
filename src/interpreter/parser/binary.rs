use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, LiteralValue},
    interpreter::{
        lexer::Token,
        parser::{core::ParseResult, unary::parse_unary},
        value::complex::ComplexNumber,
    },
};

/// Parses the boolean operators `AND`, `OR` and `XOR`.
///
/// All three share the lowest precedence level and associate to the left.
///
/// The rule is: `boolean := relational (("AND" | "OR" | "XOR") relational)*`
pub fn parse_boolean<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_relational(tokens)?;
    while let Some((token, offset)) = tokens.peek() {
        let Some(op) = token_to_binary_operator(token).filter(|op| {
                                                           matches!(op,
                                                                    BinaryOperator::And
                                                                    | BinaryOperator::Or
                                                                    | BinaryOperator::Xor)
                                                       })
        else {
            break;
        };
        let offset = *offset;
        tokens.next();
        let right = parse_relational(tokens)?;
        left = binary(left, op, right, offset);
    }
    Ok(left)
}

/// Parses relational and equality operators.
///
/// This parser handles all comparison operators:
/// `<`, `>`, `<=`, `>=`, `==`, `!=`.
///
/// The rule is: `relational := additive (comparison additive)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_additive(tokens)?;

    while let Some((token, offset)) = tokens.peek() {
        let op = match token_to_binary_operator(token) {
            Some(op) if is_relational_op(op) => op,
            _ => break,
        };

        let offset = *offset;
        tokens.next();

        let right = parse_additive(tokens)?;
        left = binary(left, op, right, offset);
    }

    Ok(left)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
/// A real literal followed by `+` or `-` and an imaginary literal folds into
/// one complex literal, so `2+3i` is a single constant.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_multiplicative(tokens)?;
    loop {
        if let Some((token, offset)) = tokens.peek()
           && let Some(op) = token_to_binary_operator(token)
           && matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
        {
            let offset = *offset;
            tokens.next();
            let right = parse_multiplicative(tokens)?;
            left = fold_complex_literal(left, op, right, offset);
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses multiplication-level expressions.
///
/// Handles the left-associative operators `*` and `/`, and implicit
/// multiplication: when the next token can start a primary expression, a
/// synthetic `*` is inserted (`2pi`, `3sqrt(2)`, `2x^2`).
///
/// The rule is: `multiplicative := exponent (("*" | "/")? exponent)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut left = parse_exponent(tokens)?;
    while let Some((token, offset)) = tokens.peek() {
        let offset = *offset;
        let op = match token {
            Token::Star => BinaryOperator::Mul,
            Token::Slash => BinaryOperator::Div,
            token if starts_primary(token) => {
                let right = parse_exponent(tokens)?;
                tracing::trace!(offset, "implicit multiplication");
                left = binary(left, BinaryOperator::Mul, right, offset);
                continue;
            },
            _ => break,
        };
        tokens.next();
        let right = parse_exponent(tokens)?;
        left = binary(left, op, right, offset);
    }
    Ok(left)
}

/// Parses exponentiation expressions.
///
/// Handles repeated exponentiation with right-associativity:
/// `a ^ b ^ c` parses as `a ^ (b ^ c)`. Both operands are unary expressions,
/// so `2^-1` and `-x^2` (meaning `(-x)^2`) are accepted.
///
/// The rule is: `exponent := unary ("^" exponent)?`
pub fn parse_exponent<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let base = parse_unary(tokens)?;
    if let Some((Token::Caret, offset)) = tokens.peek() {
        tokens.next();
        let exponent = parse_exponent(tokens)?;
        return Ok(binary(base, BinaryOperator::Pow, exponent, *offset));
    }
    Ok(base)
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `Some(BinaryOperator)` when the token represents a binary operator
/// and `None` for all other tokens. Juxtaposition has no token and is handled
/// by [`parse_multiplicative`].
///
/// # Example
/// ```
/// use mathly::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Caret), Some(BinaryOperator::Pow));
/// assert_eq!(token_to_binary_operator(&Token::Xor), Some(BinaryOperator::Xor));
/// assert_eq!(token_to_binary_operator(&Token::Comma), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Caret => Some(BinaryOperator::Pow),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::Less => Some(BinaryOperator::Less),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        Token::Xor => Some(BinaryOperator::Xor),
        _ => None,
    }
}

/// Returns `true` for the comparison operators.
const fn is_relational_op(op: BinaryOperator) -> bool {
    matches!(op,
             BinaryOperator::Equal
             | BinaryOperator::NotEqual
             | BinaryOperator::Greater
             | BinaryOperator::GreaterEqual
             | BinaryOperator::Less
             | BinaryOperator::LessEqual)
}

/// Returns `true` if the token can begin a primary expression, which makes
/// juxtaposition an implicit multiplication.
const fn starts_primary(token: &Token) -> bool {
    matches!(token,
             Token::Integer(_)
             | Token::Real(_)
             | Token::Imaginary(_)
             | Token::Text(_)
             | Token::Bool(_)
             | Token::Ident(_)
             | Token::LParen
             | Token::LBracket
             | Token::LBrace)
}

fn binary(left: Expr, op: BinaryOperator, right: Expr, offset: usize) -> Expr {
    Expr::BinaryOp { left: Box::new(left),
                     op,
                     right: Box::new(right),
                     offset }
}

/// Combines `a + bi` or `a - bi` into a single complex literal.
///
/// Only a real literal on the left and a purely imaginary literal on the
/// right are folded; everything else stays a binary operation.
fn fold_complex_literal(left: Expr, op: BinaryOperator, right: Expr, offset: usize) -> Expr {
    use crate::util::num::bigint_to_f64;

    if let Expr::Literal { value: left_value,
                           offset: left_offset, } = &left
       && let Expr::Literal { value: LiteralValue::Complex(imaginary),
                              .. } = &right
       && imaginary.real == 0.0
    {
        let real = match left_value {
            LiteralValue::Integer(n) => bigint_to_f64(n),
            LiteralValue::Real(r) => Some(*r),
            _ => None,
        };
        if let Some(real) = real {
            let imaginary = match op {
                BinaryOperator::Sub => -imaginary.imaginary,
                _ => imaginary.imaginary,
            };
            return Expr::Literal { value:  ComplexNumber::new(real, imaginary).into(),
                                   offset: *left_offset, };
        }
    }
    binary(left, op, right, offset)
}
