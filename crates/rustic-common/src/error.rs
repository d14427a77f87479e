use serde::Serialize;
use thiserror::Error;

use crate::span::Span;

/// Something the lexer could not make sense of.
///
/// Lexing never stops at an error. The bad input is still emitted as an
/// `Error` token, so the tree keeps every byte.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum LexErrorKind {
    #[error("unexpected character: {0:?}")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
    /// `/*` with no matching `*/`, nesting included.
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_lowercase_phrases() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('€'), Span::new(0, 3));
        assert_eq!(err.to_string(), "unexpected character: '€'");

        let unterminated: Vec<String> = [
            LexErrorKind::UnterminatedString,
            LexErrorKind::UnterminatedChar,
            LexErrorKind::UnterminatedBlockComment,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            unterminated,
            [
                "unterminated string literal",
                "unterminated character literal",
                "unterminated block comment",
            ]
        );
    }
}
