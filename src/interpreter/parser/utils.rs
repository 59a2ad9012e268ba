use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, parse_expression},
    },
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals, argument lists and lambda
/// parameter lists. It repeatedly calls `parse_item` to parse one element,
/// expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse, if an unexpected token
/// is encountered, or if the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some((Token::Comma, _)) => {},
            Some((tok, _)) if tok == closing => break,
            Some((tok, offset)) => {
                return Err(unexpected(tok, *offset, &format!("',' or {closing}")));
            },
            None => return Err(end_of_input(&closing.to_string())),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name and offset.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<(String, usize)>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Ident(name), offset)) => Ok((name.clone(), *offset)),
        Some((tok, offset)) => Err(unexpected(tok, *offset, "identifier")),
        None => Err(end_of_input("identifier")),
    }
}

/// Parses one element of an argument list or list literal.
///
/// A leading `*` marks a spread: the operand is expanded into individual
/// elements at evaluation time.
///
/// Grammar: `argument := "*" expression | expression`
pub(in crate::interpreter::parser) fn parse_argument<'a, I>(tokens: &mut Peekable<I>)
                                                            -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::Star, offset)) = tokens.peek() {
        tokens.next();
        let expr = parse_expression(tokens)?;
        return Ok(Expr::Spread { expr:   Box::new(expr),
                                 offset: *offset, });
    }
    parse_expression(tokens)
}

/// Consumes the next token, which must equal `expected`.
///
/// # Returns
/// The offset of the consumed token.
pub(in crate::interpreter::parser) fn expect_token<'a, I>(tokens: &mut Peekable<I>,
                                                          expected: &Token)
                                                          -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, offset)) if tok == expected => Ok(*offset),
        Some((tok, offset)) => Err(unexpected(tok, *offset, &expected.to_string())),
        None => Err(end_of_input(&expected.to_string())),
    }
}

/// Builds the error for `found` appearing where `expected` was required.
///
/// The end-of-input token yields `UnexpectedEndOfInput`.
pub(in crate::interpreter::parser) fn unexpected(found: &Token,
                                                 offset: usize,
                                                 expected: &str)
                                                 -> ParseError {
    if *found == Token::Eof {
        ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                           offset }
    } else {
        ParseError::UnexpectedToken { expected: expected.to_string(),
                                      found: found.to_string(),
                                      offset }
    }
}

/// The iterator ran dry without an end-of-input token.
fn end_of_input(expected: &str) -> ParseError {
    ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                       offset:   0, }
}
