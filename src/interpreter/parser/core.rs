use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{lexer::Token, parser::binary::parse_boolean},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest expression tree the parser builds.
pub const MAX_PARSE_DEPTH: usize = 2048;

/// Parses a complete token stream into a single expression.
///
/// The stream must end with [`Token::Eof`], as produced by
/// [`crate::interpreter::lexer::tokenize`]. Anything left over after the
/// expression is an error.
///
/// # Errors
/// - `NestingTooDeep` if operators or brackets nest deeper than
///   [`MAX_PARSE_DEPTH`].
/// - `TrailingTokens` if tokens remain after a complete expression.
/// - Any error raised by the individual grammar rules.
///
/// # Example
/// ```
/// use mathly::interpreter::{lexer::tokenize, parser::core::parse};
///
/// let tokens = tokenize("2pi").unwrap();
/// let expr = parse(&tokens).unwrap();
/// assert_eq!(expr.to_string(), "2 * pi");
///
/// let tokens = tokenize("(1 + 2").unwrap();
/// assert!(parse(&tokens).is_err());
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[(Token, usize)]) -> ParseResult<Expr> {
    check_nesting(tokens)?;

    let mut iter = tokens.iter().peekable();
    let expr = parse_expression(&mut iter)?;

    match iter.next() {
        Some((Token::Eof, _)) | None => Ok(expr),
        Some((token, offset)) => Err(ParseError::TrailingTokens { found:  token.to_string(),
                                                                  offset: *offset, }),
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, the boolean operators, and
/// recursively descends through the precedence hierarchy.
///
/// Grammar: `expression := boolean`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    parse_boolean(tokens)
}

/// Rejects inputs whose expression tree could nest deeper than
/// [`MAX_PARSE_DEPTH`].
///
/// Every operator, juxtaposition and bracket adds at most one level to the
/// tree built from its group, so a group is bounded by its operator count plus
/// its deepest inner group. Balance itself is checked by the grammar rules.
fn check_nesting(tokens: &[(Token, usize)]) -> ParseResult<()> {
    let mut groups = vec![Group::default()];
    let mut previous_ends_operand = false;

    for (token, offset) in tokens {
        let too_deep = || ParseError::NestingTooDeep { limit:  MAX_PARSE_DEPTH,
                                                       offset: *offset, };
        let grows = match token {
            Token::LParen | Token::LBracket | Token::LBrace => true,
            token if starts_operand(token) => previous_ends_operand,
            Token::RParen | Token::RBracket | Token::RBrace | Token::Comma | Token::Eof => false,
            _ => true,
        };

        if let Some(group) = groups.last_mut() {
            if grows {
                group.levels += 1;
            }
            if *token == Token::Comma {
                group.finish_element();
            }
            if group.depth() > MAX_PARSE_DEPTH {
                return Err(too_deep());
            }
        }

        match token {
            Token::LParen | Token::LBracket | Token::LBrace => {
                groups.push(Group::default());
                if groups.len() > MAX_PARSE_DEPTH {
                    return Err(too_deep());
                }
            },
            Token::RParen | Token::RBracket | Token::RBrace if groups.len() > 1 => {
                let depth = groups.pop().map_or(0, |group| group.depth());
                if let Some(parent) = groups.last_mut() {
                    parent.inner = parent.inner.max(depth);
                    if parent.depth() > MAX_PARSE_DEPTH {
                        return Err(too_deep());
                    }
                }
            },
            _ => {},
        }
        previous_ends_operand = ends_operand(token);
    }

    Ok(())
}

/// Depth bookkeeping for one bracket group during [`check_nesting`].
#[derive(Debug, Default)]
struct Group {
    /// Levels added by operators of the current comma-separated element.
    levels:   usize,
    /// Deepest inner group of the current element.
    inner:    usize,
    /// Deepest element already finished.
    finished: usize,
}

impl Group {
    const fn depth(&self) -> usize {
        let current = self.levels + self.inner + 1;
        if current > self.finished { current } else { self.finished }
    }

    const fn finish_element(&mut self) {
        self.finished = self.depth();
        self.levels = 0;
        self.inner = 0;
    }
}

/// Tokens that begin an operand without a bracket.
const fn starts_operand(token: &Token) -> bool {
    matches!(token,
             Token::Integer(_)
             | Token::Real(_)
             | Token::Imaginary(_)
             | Token::Text(_)
             | Token::Bool(_)
             | Token::Ident(_))
}

/// Tokens after which another operand means implicit multiplication.
const fn ends_operand(token: &Token) -> bool {
    starts_operand(token) || matches!(token, Token::RParen | Token::RBracket | Token::RBrace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn nesting_error(source: &str) -> bool {
        matches!(parse(&tokenize(source).unwrap()),
                 Err(ParseError::NestingTooDeep { .. }))
    }

    #[test]
    fn long_operator_chains_are_rejected() {
        assert!(nesting_error(&format!("1{}", "+1".repeat(100_000))));
        assert!(nesting_error(&format!("{}1", "-".repeat(300_000))));
        assert!(nesting_error(&format!("{}1", "NOT ".repeat(10_000))));
        assert!(nesting_error(&format!("2{}", "^2".repeat(10_000))));
        assert!(nesting_error(&"x ".repeat(10_000)));
        assert!(nesting_error(&format!("f{}", "(1)".repeat(10_000))));
    }

    #[test]
    fn deep_brackets_are_rejected() {
        let source = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
        assert!(nesting_error(&source));

        let source = format!("{}{}", "[".repeat(5_000), "]".repeat(5_000));
        assert!(nesting_error(&source));
    }

    #[test]
    fn moderate_expressions_are_accepted() {
        assert!(parse(&tokenize(&format!("1{}", "+1".repeat(500))).unwrap()).is_ok());
        let source = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        assert!(parse(&tokenize(&source).unwrap()).is_ok());
        let source = format!("[{}]", vec!["1 + 2 * 3"; 2_000].join(", "));
        assert!(parse(&tokenize(&source).unwrap()).is_ok());
    }
}
