use thiserror::Error;

/// Represents all errors that can occur while parsing a token stream.
///
/// Every variant records the byte offset of the offending token together
/// with what the parser expected and what it found instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found a token that cannot appear here.
    #[error("Error at offset {offset}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: String,
        /// The token encountered.
        found:    String,
        /// Byte offset of the token.
        offset:   usize,
    },
    /// Reached the end of input in the middle of an expression.
    #[error("Error at offset {offset}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: String,
        /// Byte offset of the end of input.
        offset:   usize,
    },
    /// The expression is complete but more tokens follow.
    #[error("Error at offset {offset}: Unexpected token {found} after end of expression.")]
    TrailingTokens {
        /// The first extra token.
        found:  String,
        /// Byte offset of the token.
        offset: usize,
    },
    /// Operators or brackets nest deeper than the parser accepts.
    #[error("Error at offset {offset}: Expression nested deeper than {limit} levels.")]
    NestingTooDeep {
        /// The maximum accepted nesting.
        limit:  usize,
        /// Byte offset of the token that exceeded the limit.
        offset: usize,
    },
}

impl ParseError {
    /// Byte offset in the source where the error was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedToken { offset, .. }
            | Self::UnexpectedEndOfInput { offset, .. }
            | Self::TrailingTokens { offset, .. }
            | Self::NestingTooDeep { offset, .. } => *offset,
        }
    }

    /// What the parser expected at [`Self::offset`].
    #[must_use]
    pub fn expected(&self) -> String {
        match self {
            Self::UnexpectedToken { expected, .. } | Self::UnexpectedEndOfInput { expected, .. } => {
                expected.clone()
            },
            Self::TrailingTokens { .. } => "end of input".to_string(),
            Self::NestingTooDeep { limit, .. } => format!("at most {limit} nested levels"),
        }
    }

    /// What the parser found at [`Self::offset`].
    #[must_use]
    pub fn found(&self) -> String {
        match self {
            Self::UnexpectedToken { found, .. } | Self::TrailingTokens { found, .. } => {
                found.clone()
            },
            Self::UnexpectedEndOfInput { .. } => "end of input".to_string(),
            Self::NestingTooDeep { .. } => "deeper nesting".to_string(),
        }
    }
}
