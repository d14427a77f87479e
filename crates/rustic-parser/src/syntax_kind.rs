//! SyntaxKind enum for the Rustic CST.
//!
//! This is a superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus
//! composite node kinds for CST nodes produced by the parser. Node names
//! follow the shapes of Rust's grammar (`RECORD_EXPR`, `RECORD_PAT`, ...).

use rustic_common::token::TokenKind;

/// Every kind of syntax element in the Rustic CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. The first two
/// values are sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords ───────────────────────────────────────────────────────
    AS_KW,
    BREAK_KW,
    CONST_KW,
    CONTINUE_KW,
    CRATE_KW,
    DYN_KW,
    ELSE_KW,
    ENUM_KW,
    FALSE_KW,
    FN_KW,
    FOR_KW,
    IF_KW,
    IMPL_KW,
    IN_KW,
    LET_KW,
    LOOP_KW,
    MATCH_KW,
    MOD_KW,
    MOVE_KW,
    MUT_KW,
    PUB_KW,
    REF_KW,
    RETURN_KW,
    SELF_KW,
    SELF_TYPE_KW,
    STATIC_KW,
    STRUCT_KW,
    SUPER_KW,
    TRAIT_KW,
    TRUE_KW,
    TYPE_KW,
    UNSAFE_KW,
    USE_KW,
    WHERE_KW,
    WHILE_KW,

    // ── Operators ──────────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    CARET,
    BANG,
    AMP,
    PIPE,
    AMP_AMP,
    PIPE_PIPE,
    EQ,
    EQ_EQ,
    NOT_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    COMPOUND_ASSIGN,
    AT,
    DOT_DOT,
    DOT_DOT_EQ,
    ARROW,
    FAT_ARROW,
    COLON_COLON,
    QUESTION,
    POUND,
    DOLLAR,
    TILDE,

    // ── Delimiters ─────────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,

    // ── Punctuation ────────────────────────────────────────────────────
    COMMA,
    DOT,
    COLON,
    SEMICOLON,

    // ── Literals ───────────────────────────────────────────────────────
    INT_LITERAL,
    FLOAT_LITERAL,
    STRING_LITERAL,
    CHAR_LITERAL,
    LIFETIME,

    // ── Identifiers and trivia ─────────────────────────────────────────
    IDENT,
    WHITESPACE,
    COMMENT,

    // ── Special tokens ─────────────────────────────────────────────────
    EOF,
    ERROR,

    // ── Composite node kinds: common ───────────────────────────────────
    /// Root node of a file.
    SOURCE_FILE,
    /// `#[...]` or `#![...]`.
    ATTR,
    /// `pub`, `pub(crate)`, `pub(in path)`.
    VISIBILITY,
    /// Declared name (definition site).
    NAME,
    /// Referenced name (use site), also wraps tuple indices like `0`.
    NAME_REF,
    /// `a::b::C`.
    PATH,
    /// One segment of a path, possibly with generic arguments.
    PATH_SEGMENT,
    /// `<T, U>` or `::<T>`.
    GENERIC_ARG_LIST,
    TYPE_ARG,
    LIFETIME_ARG,
    /// `Item = T` inside generic arguments.
    ASSOC_TYPE_ARG,
    /// `Fn(A, B) -> C` argument sugar.
    PAREN_TYPE_ARG_LIST,
    GENERIC_PARAM_LIST,
    TYPE_PARAM,
    LIFETIME_PARAM,
    CONST_PARAM,
    WHERE_CLAUSE,
    WHERE_PRED,
    TYPE_BOUND_LIST,
    TYPE_BOUND,
    /// Balanced delimited token sequence (macro bodies, attributes).
    TOKEN_TREE,
    /// `name!(...)` in item, statement, expression, pattern or type position.
    MACRO_CALL,

    // ── Items ──────────────────────────────────────────────────────────
    FN_DEF,
    PARAM_LIST,
    PARAM,
    SELF_PARAM,
    RET_TYPE,
    STRUCT_DEF,
    RECORD_FIELD_LIST,
    RECORD_FIELD,
    TUPLE_FIELD_LIST,
    TUPLE_FIELD,
    ENUM_DEF,
    VARIANT_LIST,
    VARIANT,
    IMPL_DEF,
    TRAIT_DEF,
    ASSOC_ITEM_LIST,
    USE_ITEM,
    USE_TREE,
    USE_TREE_LIST,
    /// `as name` in a use tree.
    RENAME,
    MOD_ITEM,
    ITEM_LIST,
    CONST_ITEM,
    STATIC_ITEM,
    TYPE_ALIAS,

    // ── Statements ─────────────────────────────────────────────────────
    LET_STMT,
    EXPR_STMT,
    /// `else { ... }` of a `let ... else`.
    LET_ELSE,

    // ── Expressions ────────────────────────────────────────────────────
    LITERAL,
    PATH_EXPR,
    RECORD_EXPR,
    RECORD_EXPR_FIELD_LIST,
    RECORD_EXPR_FIELD,
    CALL_EXPR,
    ARG_LIST,
    METHOD_CALL_EXPR,
    FIELD_EXPR,
    INDEX_EXPR,
    /// `-x`, `!x`, `*x`.
    PREFIX_EXPR,
    /// `&x`, `&mut x`.
    REF_EXPR,
    BIN_EXPR,
    CAST_EXPR,
    TRY_EXPR,
    RANGE_EXPR,
    PAREN_EXPR,
    TUPLE_EXPR,
    ARRAY_EXPR,
    BLOCK_EXPR,
    IF_EXPR,
    /// `let pat = expr` inside an `if`/`while` condition.
    LET_EXPR,
    MATCH_EXPR,
    MATCH_ARM_LIST,
    MATCH_ARM,
    MATCH_GUARD,
    WHILE_EXPR,
    LOOP_EXPR,
    FOR_EXPR,
    RETURN_EXPR,
    BREAK_EXPR,
    CONTINUE_EXPR,
    CLOSURE_EXPR,
    /// `'label:` before a loop or block.
    LABEL,
    UNDERSCORE_EXPR,

    // ── Patterns ───────────────────────────────────────────────────────
    WILDCARD_PAT,
    IDENT_PAT,
    LITERAL_PAT,
    RANGE_PAT,
    TUPLE_PAT,
    PAREN_PAT,
    SLICE_PAT,
    TUPLE_STRUCT_PAT,
    RECORD_PAT,
    RECORD_PAT_FIELD_LIST,
    RECORD_PAT_FIELD,
    REST_PAT,
    REF_PAT,
    OR_PAT,
    PATH_PAT,

    // ── Types ──────────────────────────────────────────────────────────
    PATH_TYPE,
    REF_TYPE,
    PTR_TYPE,
    SLICE_TYPE,
    ARRAY_TYPE,
    TUPLE_TYPE,
    INFER_TYPE,
    NEVER_TYPE,
    IMPL_TRAIT_TYPE,
    DYN_TRAIT_TYPE,
    FN_PTR_TYPE,
}

impl SyntaxKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::WHITESPACE | SyntaxKind::COMMENT)
    }

    /// Any expression node.
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            SyntaxKind::LITERAL
                | SyntaxKind::PATH_EXPR
                | SyntaxKind::RECORD_EXPR
                | SyntaxKind::CALL_EXPR
                | SyntaxKind::METHOD_CALL_EXPR
                | SyntaxKind::FIELD_EXPR
                | SyntaxKind::INDEX_EXPR
                | SyntaxKind::PREFIX_EXPR
                | SyntaxKind::REF_EXPR
                | SyntaxKind::BIN_EXPR
                | SyntaxKind::CAST_EXPR
                | SyntaxKind::TRY_EXPR
                | SyntaxKind::RANGE_EXPR
                | SyntaxKind::PAREN_EXPR
                | SyntaxKind::TUPLE_EXPR
                | SyntaxKind::ARRAY_EXPR
                | SyntaxKind::BLOCK_EXPR
                | SyntaxKind::IF_EXPR
                | SyntaxKind::LET_EXPR
                | SyntaxKind::MATCH_EXPR
                | SyntaxKind::WHILE_EXPR
                | SyntaxKind::LOOP_EXPR
                | SyntaxKind::FOR_EXPR
                | SyntaxKind::RETURN_EXPR
                | SyntaxKind::BREAK_EXPR
                | SyntaxKind::CONTINUE_EXPR
                | SyntaxKind::CLOSURE_EXPR
                | SyntaxKind::MACRO_CALL
                | SyntaxKind::UNDERSCORE_EXPR
        )
    }

    /// Any pattern node.
    pub fn is_pat(self) -> bool {
        matches!(
            self,
            SyntaxKind::WILDCARD_PAT
                | SyntaxKind::IDENT_PAT
                | SyntaxKind::LITERAL_PAT
                | SyntaxKind::RANGE_PAT
                | SyntaxKind::TUPLE_PAT
                | SyntaxKind::PAREN_PAT
                | SyntaxKind::SLICE_PAT
                | SyntaxKind::TUPLE_STRUCT_PAT
                | SyntaxKind::RECORD_PAT
                | SyntaxKind::REST_PAT
                | SyntaxKind::REF_PAT
                | SyntaxKind::OR_PAT
                | SyntaxKind::PATH_PAT
        )
    }

    /// Any type node.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::PATH_TYPE
                | SyntaxKind::REF_TYPE
                | SyntaxKind::PTR_TYPE
                | SyntaxKind::SLICE_TYPE
                | SyntaxKind::ARRAY_TYPE
                | SyntaxKind::TUPLE_TYPE
                | SyntaxKind::INFER_TYPE
                | SyntaxKind::NEVER_TYPE
                | SyntaxKind::IMPL_TRAIT_TYPE
                | SyntaxKind::DYN_TRAIT_TYPE
                | SyntaxKind::FN_PTR_TYPE
        )
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::As => SyntaxKind::AS_KW,
            TokenKind::Break => SyntaxKind::BREAK_KW,
            TokenKind::Const => SyntaxKind::CONST_KW,
            TokenKind::Continue => SyntaxKind::CONTINUE_KW,
            TokenKind::Crate => SyntaxKind::CRATE_KW,
            TokenKind::Dyn => SyntaxKind::DYN_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::Enum => SyntaxKind::ENUM_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::Fn => SyntaxKind::FN_KW,
            TokenKind::For => SyntaxKind::FOR_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Impl => SyntaxKind::IMPL_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::Let => SyntaxKind::LET_KW,
            TokenKind::Loop => SyntaxKind::LOOP_KW,
            TokenKind::Match => SyntaxKind::MATCH_KW,
            TokenKind::Mod => SyntaxKind::MOD_KW,
            TokenKind::Move => SyntaxKind::MOVE_KW,
            TokenKind::Mut => SyntaxKind::MUT_KW,
            TokenKind::Pub => SyntaxKind::PUB_KW,
            TokenKind::Ref => SyntaxKind::REF_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::SelfKw => SyntaxKind::SELF_KW,
            TokenKind::SelfType => SyntaxKind::SELF_TYPE_KW,
            TokenKind::Static => SyntaxKind::STATIC_KW,
            TokenKind::Struct => SyntaxKind::STRUCT_KW,
            TokenKind::Super => SyntaxKind::SUPER_KW,
            TokenKind::Trait => SyntaxKind::TRAIT_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::Type => SyntaxKind::TYPE_KW,
            TokenKind::Unsafe => SyntaxKind::UNSAFE_KW,
            TokenKind::Use => SyntaxKind::USE_KW,
            TokenKind::Where => SyntaxKind::WHERE_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,

            // Operators
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::AmpAmp => SyntaxKind::AMP_AMP,
            TokenKind::PipePipe => SyntaxKind::PIPE_PIPE,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::CompoundAssign => SyntaxKind::COMPOUND_ASSIGN,
            TokenKind::At => SyntaxKind::AT,
            TokenKind::DotDot => SyntaxKind::DOT_DOT,
            TokenKind::DotDotEq => SyntaxKind::DOT_DOT_EQ,
            TokenKind::Arrow => SyntaxKind::ARROW,
            TokenKind::FatArrow => SyntaxKind::FAT_ARROW,
            TokenKind::ColonColon => SyntaxKind::COLON_COLON,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::Pound => SyntaxKind::POUND,
            TokenKind::Dollar => SyntaxKind::DOLLAR,
            TokenKind::Tilde => SyntaxKind::TILDE,

            // Delimiters
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,

            // Punctuation
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,

            // Literals
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::FloatLiteral => SyntaxKind::FLOAT_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,
            TokenKind::CharLiteral => SyntaxKind::CHAR_LITERAL,
            TokenKind::Lifetime => SyntaxKind::LIFETIME,

            // Identifiers and trivia
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Comment => SyntaxKind::COMMENT,

            // Special
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }

    #[test]
    fn token_kinds_map_to_syntax_kinds() {
        assert_eq!(SyntaxKind::from(TokenKind::Struct), SyntaxKind::STRUCT_KW);
        assert_eq!(SyntaxKind::from(TokenKind::SelfType), SyntaxKind::SELF_TYPE_KW);
        assert_eq!(SyntaxKind::from(TokenKind::DotDot), SyntaxKind::DOT_DOT);
        assert_eq!(SyntaxKind::from(TokenKind::Whitespace), SyntaxKind::WHITESPACE);
    }

    #[test]
    fn classification_helpers() {
        assert!(SyntaxKind::RECORD_EXPR.is_expr());
        assert!(!SyntaxKind::RECORD_PAT.is_expr());
        assert!(SyntaxKind::RECORD_PAT.is_pat());
        assert!(SyntaxKind::SLICE_TYPE.is_type());
        assert!(SyntaxKind::COMMENT.is_trivia());
    }
}
