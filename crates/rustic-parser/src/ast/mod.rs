//! Typed AST layer on top of the rowan CST.
//!
//! The typed AST provides zero-cost wrappers around `SyntaxNode` with typed
//! accessor methods. Each wrapper holds a `SyntaxNode` and provides methods
//! to navigate to children by their kind, following the rust-analyzer
//! pattern.
//!
//! # Architecture
//!
//! - [`AstNode`] trait: every typed wrapper implements `cast()` and `syntax()`.
//! - `ast_node!` macro: generates boilerplate for each wrapper type.
//! - Helper functions: `child_node()`, `child_nodes()` and `child_token()`.
//!
//! Nodes shared by items, expressions, patterns and types (names, paths,
//! generic arguments, visibility) live in this module.

pub mod expr;
pub mod item;
pub mod pat;
pub mod ty;

use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

/// Trait for typed AST nodes that wrap a rowan `SyntaxNode`.
pub trait AstNode: Sized {
    /// Try to cast a generic `SyntaxNode` into this typed AST node.
    ///
    /// Returns `Some(Self)` if the node's kind matches, `None` otherwise.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Access the underlying `SyntaxNode`.
    fn syntax(&self) -> &SyntaxNode;
}

/// Generate boilerplate for a typed AST node wrapper.
///
/// Creates a struct wrapping `SyntaxNode`, and implements `AstNode` with a
/// kind check against the specified `SyntaxKind` variant.
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                if node.kind() == SyntaxKind::$kind {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

pub(crate) use ast_node;

/// Generate an enum over several node wrappers plus its `AstNode` impl.
macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($node:ident) = $kind:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($node),)+
        }

        impl AstNode for $name {
            fn cast(node: SyntaxNode) -> Option<Self> {
                match node.kind() {
                    $(SyntaxKind::$kind => Some($name::$variant($node { syntax: node })),)+
                    _ => None,
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $($name::$variant(it) => &it.syntax,)+
                }
            }
        }
    };
}

pub(crate) use ast_enum;

/// Find the first child node that can be cast to type `N`.
pub fn child_node<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
    parent.children().find_map(N::cast)
}

/// Find all child nodes that can be cast to type `N`.
pub fn child_nodes<'a, N: AstNode + 'a>(parent: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

/// Find the first child token with the given kind.
pub fn child_token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|it| it.kind() == kind)
}

/// The first non-trivia token of a node.
pub fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia())
}

// ── Names ────────────────────────────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    /// The identifier token.
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::SELF_KW))
    }

    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        self.ident_token().map(|t| t.text().to_string())
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    /// The referencing token: an identifier, `self`, `Self`, `crate`,
    /// `super`, or an integer for tuple field access.
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    /// The referenced text.
    pub fn text(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }

    /// Whether this is a positional (`0`, `1`) field reference.
    pub fn is_index(&self) -> bool {
        self.token()
            .is_some_and(|t| t.kind() == SyntaxKind::INT_LITERAL)
    }
}

// ── Paths ────────────────────────────────────────────────────────────────

ast_node!(Path, PATH);

impl Path {
    /// All segments in order.
    pub fn segments(&self) -> impl Iterator<Item = PathSegment> + '_ {
        child_nodes(&self.syntax)
    }

    /// The last segment, which names the item the path resolves to.
    pub fn last_segment(&self) -> Option<PathSegment> {
        self.segments().last()
    }

    /// Segment texts, e.g. `["Test", "A"]` for `Test::A`.
    pub fn segment_texts(&self) -> Vec<String> {
        self.segments()
            .filter_map(|s| s.name_ref().and_then(|n| n.text()))
            .collect()
    }

    /// Whether the path starts with `::`.
    pub fn is_global(&self) -> bool {
        first_significant_token(&self.syntax).is_some_and(|t| t.kind() == SyntaxKind::COLON_COLON)
    }
}

ast_node!(PathSegment, PATH_SEGMENT);

impl PathSegment {
    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    /// Explicit generic arguments (`Vec<T>`, `Vec::<T>`).
    pub fn generic_arg_list(&self) -> Option<GenericArgList> {
        child_node(&self.syntax)
    }

    /// Whether the segment is the `Self` type keyword.
    pub fn is_self_type(&self) -> bool {
        self.name_ref()
            .and_then(|n| n.token())
            .is_some_and(|t| t.kind() == SyntaxKind::SELF_TYPE_KW)
    }
}

ast_node!(GenericArgList, GENERIC_ARG_LIST);

impl GenericArgList {
    /// Type arguments in order (lifetimes, const and associated type
    /// arguments skipped).
    pub fn type_args(&self) -> impl Iterator<Item = TypeArg> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(TypeArg, TYPE_ARG);

impl TypeArg {
    pub fn ty(&self) -> Option<ty::Type> {
        child_node(&self.syntax)
    }
}

// ── Visibility and attributes ────────────────────────────────────────────

ast_node!(Visibility, VISIBILITY);

impl Visibility {
    /// The `pub` keyword token.
    pub fn pub_kw(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::PUB_KW)
    }
}

ast_node!(Attr, ATTR);

ast_node!(TokenTree, TOKEN_TREE);

ast_node!(MacroCall, MACRO_CALL);

impl MacroCall {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }

    pub fn token_tree(&self) -> Option<TokenTree> {
        child_node(&self.syntax)
    }
}
