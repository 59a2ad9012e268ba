use thiserror::Error;

/// Represents all errors that can occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[error("Error at offset {offset}: Unrecognized character '{character}'.")]
    UnrecognizedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character.
        offset:    usize,
    },
    /// A `"` that is never closed.
    #[error("Error at offset {offset}: Unterminated text literal.")]
    UnterminatedText {
        /// Byte offset of the opening quote.
        offset: usize,
    },
    /// Two numeric literals glued together, such as `1.2.3`, or a literal too
    /// large for a real number, such as `1e400`.
    #[error("Error at offset {offset}: Malformed numeric literal '{literal}'.")]
    MalformedNumber {
        /// The source text of the malformed literal.
        literal: String,
        /// Byte offset where the literal starts.
        offset:  usize,
    },
}

impl LexError {
    /// Byte offset in the source where the error was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnrecognizedCharacter { offset, .. }
            | Self::UnterminatedText { offset }
            | Self::MalformedNumber { offset, .. } => *offset,
        }
    }
}
