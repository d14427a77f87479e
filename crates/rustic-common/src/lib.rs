//! Shared building blocks for the Rustic crates: byte spans, the line
//! index, the token vocabulary produced by the lexer, and lexer errors.

pub mod error;
pub mod span;
pub mod token;

pub use error::{LexError, LexErrorKind};
pub use span::{LineIndex, Span};
pub use token::{keyword_from_str, Token, TokenKind};
