use std::{fmt::Display, iter::Peekable, ops::Range};

use logos::Logos;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::error::LexError;

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by
/// [`tokenize`]. Keywords and boolean literals are recognized through a
/// case-insensitive alias table, so `vrai`, `TRUE` and `true` all become
/// [`Token::Bool`].
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// Integer literal tokens, such as `42`.
    Integer(BigInt),
    /// Numeric literal tokens, such as `3.14`, `.5` or `2.1e-10`.
    Real(f64),
    /// A number immediately followed by `i`, such as `3i`.
    Imaginary(f64),
    /// Text literal tokens, such as `"abc"`.
    Text(String),
    /// Boolean literal tokens.
    Bool(bool),
    /// Identifier tokens; variable or function names such as `x` or `sqrt`.
    Ident(String),
    /// `and`, `&`
    And,
    /// `or`, `|`
    Or,
    /// `xor`
    Xor,
    /// `not`
    Not,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^`
    Caret,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// End of input; always the last token.
    Eof,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "number '{n}'"),
            Self::Real(r) => write!(f, "number '{r}'"),
            Self::Imaginary(r) => write!(f, "complex number '{r}i'"),
            Self::Text(s) => write!(f, "text \"{s}\""),
            Self::Bool(b) => write!(f, "boolean '{}'", if *b { "TRUE" } else { "FALSE" }),
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::And => write!(f, "operator 'AND'"),
            Self::Or => write!(f, "operator 'OR'"),
            Self::Xor => write!(f, "operator 'XOR'"),
            Self::Not => write!(f, "operator 'NOT'"),
            Self::Plus => write!(f, "operator '+'"),
            Self::Minus => write!(f, "operator '-'"),
            Self::Star => write!(f, "operator '*'"),
            Self::Slash => write!(f, "operator '/'"),
            Self::Caret => write!(f, "operator '^'"),
            Self::EqualEqual => write!(f, "operator '=='"),
            Self::BangEqual => write!(f, "operator '!='"),
            Self::GreaterEqual => write!(f, "operator '>='"),
            Self::LessEqual => write!(f, "operator '<='"),
            Self::Less => write!(f, "operator '<'"),
            Self::Greater => write!(f, "operator '>'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::LBracket => write!(f, "'['"),
            Self::RBracket => write!(f, "']'"),
            Self::LBrace => write!(f, "'{{'"),
            Self::RBrace => write!(f, "'}}'"),
            Self::Comma => write!(f, "','"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// Raw token from logos, before keyword classification and imaginary-suffix
/// merging.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_real)]
    Real(f64),
    #[regex(r"[0-9]+", parse_integer)]
    Integer(BigInt),
    #[regex(r#""([^"\\]|\\.)*""#, parse_text)]
    Text(String),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Word(String),
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<=")]
    LessEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
}

/// Words with a fixed meaning, matched case-insensitively.
///
/// The French and Italian spellings are accepted alongside the English ones.
static KEYWORD_ALIASES: &[(&str, Token)] = &[("true", Token::Bool(true)),
                                             ("vrai", Token::Bool(true)),
                                             ("vero", Token::Bool(true)),
                                             ("false", Token::Bool(false)),
                                             ("faux", Token::Bool(false)),
                                             ("falso", Token::Bool(false)),
                                             ("and", Token::And),
                                             ("et", Token::And),
                                             ("or", Token::Or),
                                             ("ou", Token::Or),
                                             ("xor", Token::Xor),
                                             ("not", Token::Not),
                                             ("non", Token::Not)];

/// Splits source text into tokens paired with their byte offsets.
///
/// The returned vector always ends with [`Token::Eof`] at `source.len()`.
/// A number written directly before the word `i` becomes a single
/// [`Token::Imaginary`]; any other adjacent word stays separate so that the
/// parser can read `2pi` as an implicit multiplication.
///
/// # Errors
/// Returns a [`LexError`] for unrecognized characters, unterminated text
/// literals, numbers glued together such as `1.2.3` and numbers too large
/// for a real such as `1e400`.
///
/// # Example
/// ```
/// use mathly::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("3i + vrai").unwrap();
/// let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();
///
/// assert_eq!(kinds,
///            vec![Token::Imaginary(3.0), Token::Plus, Token::Bool(true), Token::Eof]);
/// ```
#[tracing::instrument(level = "trace", skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, LexError> {
    let raw = lex_raw(source)?;
    let mut tokens = Vec::with_capacity(raw.len() + 1);
    let mut iter = raw.into_iter().peekable();

    while let Some((raw_token, span)) = iter.next() {
        let token = match raw_token {
            RawToken::Integer(n) => {
                let value = n.to_f64().unwrap_or(f64::INFINITY);
                number_or_imaginary(Token::Integer(n), value, &span, &mut iter, source)?
            },
            RawToken::Real(r) if !r.is_finite() => {
                let literal = source[span.start..span.end].to_string();
                return Err(LexError::MalformedNumber { literal,
                                                       offset: span.start });
            },
            RawToken::Real(r) => number_or_imaginary(Token::Real(r), r, &span, &mut iter, source)?,
            RawToken::Text(text) => Token::Text(text),
            RawToken::Word(word) => classify_word(word),
            RawToken::Ampersand => Token::And,
            RawToken::Pipe => Token::Or,
            RawToken::Plus => Token::Plus,
            RawToken::Minus => Token::Minus,
            RawToken::Star => Token::Star,
            RawToken::Slash => Token::Slash,
            RawToken::Caret => Token::Caret,
            RawToken::EqualEqual => Token::EqualEqual,
            RawToken::BangEqual => Token::BangEqual,
            RawToken::GreaterEqual => Token::GreaterEqual,
            RawToken::LessEqual => Token::LessEqual,
            RawToken::Less => Token::Less,
            RawToken::Greater => Token::Greater,
            RawToken::LParen => Token::LParen,
            RawToken::RParen => Token::RParen,
            RawToken::LBracket => Token::LBracket,
            RawToken::RBracket => Token::RBracket,
            RawToken::LBrace => Token::LBrace,
            RawToken::RBrace => Token::RBrace,
            RawToken::Comma => Token::Comma,
        };
        tokens.push((token, span.start));
    }

    tokens.push((Token::Eof, source.len()));
    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Runs the logos lexer over the whole source, keeping spans.
fn lex_raw(source: &str) -> Result<Vec<(RawToken, Range<usize>)>, LexError> {
    let mut lexer = RawToken::lexer(source);
    let mut raw = Vec::new();

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(token) => raw.push((token, span)),
            Err(()) => {
                let rest = &source[span.start..];
                return Err(if rest.starts_with('"') {
                    LexError::UnterminatedText { offset: span.start }
                } else {
                    LexError::UnrecognizedCharacter { character: rest.chars()
                                                                     .next()
                                                                     .unwrap_or_default(),
                                                      offset:    span.start, }
                });
            },
        }
    }

    Ok(raw)
}

/// Maps a word to its keyword token, or to an identifier.
fn classify_word(word: String) -> Token {
    KEYWORD_ALIASES.iter()
                   .find(|(alias, _)| alias.eq_ignore_ascii_case(&word))
                   .map_or(Token::Ident(word), |(_, token)| token.clone())
}

/// Merges a number with a directly following `i` into an imaginary literal.
///
/// A second number glued to the first one is a malformed literal.
fn number_or_imaginary<I>(number: Token,
                          value: f64,
                          span: &Range<usize>,
                          rest: &mut Peekable<I>,
                          source: &str)
                          -> Result<Token, LexError>
    where I: Iterator<Item = (RawToken, Range<usize>)>
{
    match rest.peek() {
        Some((RawToken::Word(word), next)) if word == "i" && next.start == span.end => {
            let end = next.end;
            rest.next();
            if value.is_finite() {
                Ok(Token::Imaginary(value))
            } else {
                Err(LexError::MalformedNumber { literal: source[span.start..end].to_string(),
                                                offset:  span.start, })
            }
        },
        Some((RawToken::Integer(_) | RawToken::Real(_), next)) if next.start == span.end => {
            Err(LexError::MalformedNumber { literal: source[span.start..next.end].to_string(),
                                            offset:  span.start, })
        },
        _ => Ok(number),
    }
}

/// Parses a floating-point literal from the current token slice.
fn parse_real(lex: &logos::Lexer<RawToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal of any size from the current token slice.
fn parse_integer(lex: &logos::Lexer<RawToken>) -> Option<BigInt> {
    lex.slice().parse().ok()
}

/// Strips the quotes of a text literal and resolves `\"`, `\\`, `\n` and `\t`.
///
/// Any other backslash is kept as written, so `"a\rb"` holds four characters.
fn parse_text(lex: &logos::Lexer<RawToken>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some(c @ ('"' | '\\')) => text.push(c),
            Some(other) => {
                text.push('\\');
                text.push(other);
            },
            None => text.push('\\'),
        }
    }

    text
}
