//! Errors reported while building the syntax tree.

use rustic_common::span::Span;
use thiserror::Error;

/// A syntax error. `related` points back at context such as the opening
/// delimiter of an unclosed block.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self {
            related: Some((related_message.into(), related_span)),
            ..Self::new(message, span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = ParseError::new("expected a type", Span::new(5, 10));
        assert_eq!(err.to_string(), "expected a type");
        assert_eq!(err.related, None);
    }

    #[test]
    fn related_location_is_kept() {
        let err = ParseError::with_related(
            "expected `}`",
            Span::new(50, 51),
            "unclosed brace",
            Span::new(10, 11),
        );
        assert_eq!(
            err.related,
            Some(("unclosed brace".to_string(), Span::new(10, 11)))
        );
    }
}
