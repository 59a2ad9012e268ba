use std::{collections::HashSet, iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect_token, parse_argument, parse_comma_separated, parse_identifier,
                    unexpected},
        },
        value::complex::ComplexNumber,
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`   (negation; reverses lists)
/// - `NOT` (logical not)
///
/// Unary operators are right-associative, so `NOT -x` parses as
/// `NOT (-x)`. A `-` placed directly before a number token is folded into a
/// negative literal: `-42` is the constant `-42`, while `--5` is the negation
/// of the constant `-5`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "NOT") unary
///            | primary postfix*
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`], a folded literal, or a primary expression possibly
/// followed by postfixes.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    ensure_sufficient_stack(|| {
        let op = match tokens.peek() {
            Some((Token::Minus, offset)) => (UnaryOperator::Negate, *offset),
            Some((Token::Not, offset)) => (UnaryOperator::Not, *offset),
            _ => {
                return parse_primary(tokens);
            },
        };
        let (op, offset) = op;
        tokens.next();

        if op == UnaryOperator::Negate
           && matches!(tokens.peek(),
                       Some((Token::Integer(_) | Token::Real(_) | Token::Imaginary(_), _)))
        {
            let literal = parse_number(tokens)?;
            if let Expr::Literal { value, .. } = &literal
               && let Some(negated) = value.negated()
            {
                return Ok(Expr::Literal { value: negated,
                                          offset });
            }
            return Ok(Expr::UnaryOp { op,
                                      expr: Box::new(literal),
                                      offset });
        }

        let expr = parse_unary(tokens)?;
        Ok(Expr::UnaryOp { op,
                           expr: Box::new(expr),
                           offset })
    })
}

/// Parses a primary (atomic) expression together with its postfixes.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric, boolean and text literals
/// - identifiers
/// - parenthesized expressions
/// - list literals (`[ ... ]`)
/// - lambdas (`{x, y}(body)`)
///
/// Everything except a number literal may be followed by calls and indexing,
/// see [`parse_postfix`]. A number is never called: `2(3)` is a product, which
/// the multiplicative rule builds by juxtaposition.
///
/// Grammar (simplified):
/// ```text
///     primary := NUMBER
///              | (TEXT | BOOL | IDENT | "(" expression ")" | list | lambda) postfix*
/// ```
/// # Errors
/// Returns a `ParseError` if no primary expression starts at the current
/// token.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let node = match tokens.peek() {
        Some((Token::Integer(_) | Token::Real(_) | Token::Imaginary(_), _)) => {
            return parse_number(tokens);
        },
        Some((Token::Text(text), offset)) => {
            tokens.next();
            Expr::Literal { value:  LiteralValue::Text(text.clone()),
                            offset: *offset, }
        },
        Some((Token::Bool(b), offset)) => {
            tokens.next();
            Expr::Literal { value:  (*b).into(),
                            offset: *offset, }
        },
        Some((Token::Ident(_), _)) => {
            let (name, offset) = parse_identifier(tokens)?;
            Expr::Identifier { name, offset }
        },
        Some((Token::LParen, _)) => parse_grouping(tokens)?,
        Some((Token::LBracket, _)) => parse_list_literal(tokens)?,
        Some((Token::LBrace, _)) => parse_lambda(tokens)?,
        Some((tok, offset)) => return Err(unexpected(tok, *offset, "expression")),
        None => {
            return Err(ParseError::UnexpectedEndOfInput { expected: "expression".to_string(),
                                                          offset:   0, });
        },
    };
    parse_postfix(tokens, node)
}

/// Parses postfix operators applied to an expression.
///
/// Two kinds of postfix constructs are handled, in any order and repeated
/// until neither follows:
///
/// 1. **Calls** `expr(arg, ...)`, where any argument may be a spread `*list`.
/// 2. **Indexing** `expr[index]`.
///
/// ```text
///        [f, g][1](4, 3)[0]
/// ```
/// Grammar:
/// ```text
///     postfix := "(" arguments? ")"
///              | "[" expression "]"
/// ```
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    loop {
        match tokens.peek() {
            Some((Token::LParen, offset)) => {
                let offset = *offset;
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_argument, &Token::RParen)?;
                node = Expr::Call { callee: Box::new(node),
                                    arguments,
                                    offset };
            },
            Some((Token::LBracket, offset)) => {
                let offset = *offset;
                tokens.next();
                let index = parse_expression(tokens)?;
                expect_token(tokens, &Token::RBracket)?;
                node = Expr::Index { target: Box::new(node),
                                     index: Box::new(index),
                                     offset };
            },
            _ => break,
        }
    }
    Ok(node)
}

/// Parses an integer, real or imaginary literal.
///
/// Imaginary literals such as `3i` become complex constants with a zero real
/// part.
fn parse_number<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Integer(n), offset)) => Ok(Expr::Literal { value:  n.clone().into(),
                                                                offset: *offset, }),
        Some((Token::Real(r), offset)) => Ok(Expr::Literal { value:  (*r).into(),
                                                             offset: *offset, }),
        Some((Token::Imaginary(im), offset)) => {
            Ok(Expr::Literal { value:  ComplexNumber::new(0.0, *im).into(),
                               offset: *offset, })
        },
        Some((tok, offset)) => Err(unexpected(tok, *offset, "number")),
        None => Err(ParseError::UnexpectedEndOfInput { expected: "number".to_string(),
                                                       offset:   0, }),
    }
}

/// Parses a parenthesized expression.
///
/// Grouping produces no node of its own; the beautifier re-inserts the
/// parentheses that precedence requires.
///
/// Grammar: `grouping := "(" expression ")"`
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    expect_token(tokens, &Token::LParen)?;
    let expr = parse_expression(tokens)?;
    expect_token(tokens, &Token::RParen)?;
    Ok(expr)
}

/// Parses a list literal of the form `[a, b, ...]`.
///
/// Elements may be spreads: `[0, *xs]`.
///
/// Grammar: `list := "[" (argument ("," argument)*)? "]"`
fn parse_list_literal<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let offset = expect_token(tokens, &Token::LBracket)?;
    let elements = parse_comma_separated(tokens, parse_argument, &Token::RBracket)?;
    Ok(Expr::List { elements, offset })
}

/// Parses a lambda of the form `{x, y}(body)`.
///
/// The parameter list may be empty. Each name may appear only once.
///
/// Grammar: `lambda := "{" (IDENT ("," IDENT)*)? "}" "(" expression ")"`
///
/// # Errors
/// Returns a `ParseError` on a repeated parameter name, a missing body, or
/// malformed delimiters.
fn parse_lambda<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let offset = expect_token(tokens, &Token::LBrace)?;
    let params = parse_comma_separated(tokens, parse_identifier, &Token::RBrace)?;

    let mut seen = HashSet::new();
    for (name, param_offset) in &params {
        if !seen.insert(name.as_str()) {
            return Err(ParseError::UnexpectedToken { expected: "distinct parameter names"
                                                                   .to_string(),
                                                     found:    format!("repeated parameter \
                                                                        '{name}'"),
                                                     offset:   *param_offset, });
        }
    }

    expect_token(tokens, &Token::LParen)?;
    let body = parse_expression(tokens)?;
    expect_token(tokens, &Token::RParen)?;

    let params: Rc<[String]> = params.into_iter().map(|(name, _)| name).collect();
    Ok(Expr::Lambda { params,
                      body: Rc::new(body),
                      offset })
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{BinaryOperator, Expr, UnaryOperator},
        error::ParseError,
        interpreter::{lexer::tokenize, parser::core::parse},
    };

    fn parse_str(source: &str) -> Result<Expr, ParseError> {
        let tokens = tokenize(source).expect("source should lex");
        parse(&tokens)
    }

    #[test]
    fn minus_before_number_folds_into_literal() {
        let expr = parse_str("-42").unwrap();
        assert!(matches!(expr, Expr::Literal { offset: 0, .. }));
    }

    #[test]
    fn double_minus_keeps_outer_negation() {
        let expr = parse_str("--5").unwrap();
        let Expr::UnaryOp { op, expr, .. } = expr else {
            panic!("expected a unary operation");
        };
        assert_eq!(op, UnaryOperator::Negate);
        assert!(matches!(*expr, Expr::Literal { offset: 1, .. }));
    }

    #[test]
    fn number_followed_by_parenthesis_is_a_product() {
        let expr = parse_str("2(3)").unwrap();
        assert!(matches!(expr,
                         Expr::BinaryOp { op: BinaryOperator::Mul,
                                          .. }));
    }

    #[test]
    fn chained_postfixes_nest_left_to_right() {
        let expr = parse_str("[f, g][1](4, 3)").unwrap();
        let Expr::Call { callee, arguments, .. } = expr else {
            panic!("expected a call");
        };
        assert_eq!(arguments.len(), 2);
        assert!(matches!(*callee, Expr::Index { .. }));
    }

    #[test]
    fn lambda_collects_parameters() {
        let expr = parse_str("{x, y}(x - y)").unwrap();
        let Expr::Lambda { params, .. } = expr else {
            panic!("expected a lambda");
        };
        assert_eq!(&*params, ["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn repeated_lambda_parameter_is_rejected() {
        let err = parse_str("{x, x}(x)").unwrap_err();
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn spread_is_parsed_inside_arguments() {
        let expr = parse_str("gcd(*xs)").unwrap();
        let Expr::Call { arguments, .. } = expr else {
            panic!("expected a call");
        };
        assert!(matches!(arguments[0], Expr::Spread { offset: 4, .. }));
    }

    #[test]
    fn missing_closing_bracket_is_reported() {
        assert!(matches!(parse_str("[1, 2").unwrap_err(),
                         ParseError::UnexpectedEndOfInput { .. }));
        assert!(matches!(parse_str("(1 + 2]").unwrap_err(),
                         ParseError::UnexpectedToken { .. }));
    }
}
