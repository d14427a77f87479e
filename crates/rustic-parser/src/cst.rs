//! Rowan-based concrete syntax tree types for Rustic.
//!
//! Defines the `RustLanguage` marker type that connects [`SyntaxKind`] to
//! rowan's generic tree infrastructure, plus type aliases for convenience.

use crate::syntax_kind::SyntaxKind;

/// Marker type for the Rust subset in rowan's generic tree system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RustLanguage {}

impl rowan::Language for RustLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::FN_PTR_TYPE as u16);
        // Safety: SyntaxKind is #[repr(u16)], its discriminants are dense and
        // the assert above keeps the value inside the enum's range.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A CST node (interior node with children).
pub type SyntaxNode = rowan::SyntaxNode<RustLanguage>;

/// A CST token (leaf node with text).
pub type SyntaxToken = rowan::SyntaxToken<RustLanguage>;

/// Either a node or a token in the CST.
pub type SyntaxElement = rowan::SyntaxElement<RustLanguage>;

/// A stable, tree-independent pointer to a node, resolvable against the
/// root of the same parse.
pub type SyntaxNodePtr = rowan::ast::SyntaxNodePtr<RustLanguage>;
