use serde::Serialize;

use crate::span::Span;

/// A token produced by the Rustic lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the supported Rust subset.
///
/// The lexer is lossless: whitespace and comments are real tokens so the
/// parser can place them in the CST and text ranges line up with the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords ───────────────────────────────────────────────────────
    As,
    Break,
    Const,
    Continue,
    Crate,
    Dyn,
    Else,
    Enum,
    False,
    Fn,
    For,
    If,
    Impl,
    In,
    Let,
    Loop,
    Match,
    Mod,
    Move,
    Mut,
    Pub,
    Ref,
    Return,
    /// The `self` value keyword.
    SelfKw,
    /// The `Self` type keyword.
    SelfType,
    Static,
    Struct,
    Super,
    Trait,
    True,
    Type,
    Unsafe,
    Use,
    Where,
    While,

    // ── Operators ──────────────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `+=`, `-=`, `*=`, `/=`, `%=`, `^=`, `&=`, `|=`
    CompoundAssign,
    /// `@`
    At,
    /// `..`
    DotDot,
    /// `..=`
    DotDotEq,
    /// `->`
    Arrow,
    /// `=>`
    FatArrow,
    /// `::`
    ColonColon,
    /// `?`
    Question,
    /// `#`
    Pound,
    /// `$`
    Dollar,
    /// `~`
    Tilde,

    // ── Delimiters ─────────────────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // ── Punctuation ────────────────────────────────────────────────────
    Comma,
    Dot,
    Colon,
    Semicolon,

    // ── Literals ───────────────────────────────────────────────────────
    /// Integer literal, e.g. `42`, `0xFF`, `1_000u64`.
    IntLiteral,
    /// Floating-point literal, e.g. `3.14`, `1e10`, `2.5f32`.
    FloatLiteral,
    /// String literal including raw and byte strings.
    StringLiteral,
    /// Character or byte literal, e.g. `'a'`, `b'\n'`.
    CharLiteral,
    /// Lifetime or label, e.g. `'a`, `'static`.
    Lifetime,

    // ── Identifiers and trivia ─────────────────────────────────────────
    Ident,
    Whitespace,
    /// Line or block comment, doc comments included.
    Comment,

    // ── Special ────────────────────────────────────────────────────────
    Eof,
    /// Invalid/unexpected input. Used for error recovery.
    Error,
}

impl TokenKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// Look up a keyword from its string representation.
///
/// Only strict keywords are recognised; contextual words such as `union` or
/// `auto` stay identifiers.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "as" => Some(TokenKind::As),
        "break" => Some(TokenKind::Break),
        "const" => Some(TokenKind::Const),
        "continue" => Some(TokenKind::Continue),
        "crate" => Some(TokenKind::Crate),
        "dyn" => Some(TokenKind::Dyn),
        "else" => Some(TokenKind::Else),
        "enum" => Some(TokenKind::Enum),
        "false" => Some(TokenKind::False),
        "fn" => Some(TokenKind::Fn),
        "for" => Some(TokenKind::For),
        "if" => Some(TokenKind::If),
        "impl" => Some(TokenKind::Impl),
        "in" => Some(TokenKind::In),
        "let" => Some(TokenKind::Let),
        "loop" => Some(TokenKind::Loop),
        "match" => Some(TokenKind::Match),
        "mod" => Some(TokenKind::Mod),
        "move" => Some(TokenKind::Move),
        "mut" => Some(TokenKind::Mut),
        "pub" => Some(TokenKind::Pub),
        "ref" => Some(TokenKind::Ref),
        "return" => Some(TokenKind::Return),
        "self" => Some(TokenKind::SelfKw),
        "Self" => Some(TokenKind::SelfType),
        "static" => Some(TokenKind::Static),
        "struct" => Some(TokenKind::Struct),
        "super" => Some(TokenKind::Super),
        "trait" => Some(TokenKind::Trait),
        "true" => Some(TokenKind::True),
        "type" => Some(TokenKind::Type),
        "unsafe" => Some(TokenKind::Unsafe),
        "use" => Some(TokenKind::Use),
        "where" => Some(TokenKind::Where),
        "while" => Some(TokenKind::While),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_keywords() {
        assert_eq!(keyword_from_str("struct"), Some(TokenKind::Struct));
        assert_eq!(keyword_from_str("where"), Some(TokenKind::Where));
        assert_eq!(keyword_from_str("self"), Some(TokenKind::SelfKw));
        assert_eq!(keyword_from_str("Self"), Some(TokenKind::SelfType));
        assert_eq!(keyword_from_str("ref"), Some(TokenKind::Ref));
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("union"), None);
        assert_eq!(keyword_from_str("Struct"), None);
        assert_eq!(keyword_from_str(""), None);
    }

    #[test]
    fn trivia_kinds() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Ident.is_trivia());
    }

    #[test]
    fn token_new_constructor() {
        let tok = Token::new(TokenKind::Fn, 10, 12);
        assert_eq!(tok.kind, TokenKind::Fn);
        assert_eq!(tok.span, Span::new(10, 12));
    }
}
