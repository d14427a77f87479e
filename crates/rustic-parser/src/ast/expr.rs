//! Typed AST nodes for expressions and statements.

use crate::ast::item::{Item, ParamList, RetType};
use crate::ast::pat::Pat;
use crate::ast::ty::Type;
use crate::ast::{
    ast_enum, ast_node, child_node, child_nodes, child_token, AstNode, GenericArgList, MacroCall,
    NameRef, Path,
};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_enum! {
    /// Any expression.
    Expr {
        Literal(Literal) = LITERAL,
        Path(PathExpr) = PATH_EXPR,
        Record(RecordExpr) = RECORD_EXPR,
        Call(CallExpr) = CALL_EXPR,
        MethodCall(MethodCallExpr) = METHOD_CALL_EXPR,
        Field(FieldExpr) = FIELD_EXPR,
        Index(IndexExpr) = INDEX_EXPR,
        Prefix(PrefixExpr) = PREFIX_EXPR,
        Ref(RefExpr) = REF_EXPR,
        Bin(BinExpr) = BIN_EXPR,
        Cast(CastExpr) = CAST_EXPR,
        Try(TryExpr) = TRY_EXPR,
        Range(RangeExpr) = RANGE_EXPR,
        Paren(ParenExpr) = PAREN_EXPR,
        Tuple(TupleExpr) = TUPLE_EXPR,
        Array(ArrayExpr) = ARRAY_EXPR,
        Block(BlockExpr) = BLOCK_EXPR,
        If(IfExpr) = IF_EXPR,
        Let(LetExpr) = LET_EXPR,
        Match(MatchExpr) = MATCH_EXPR,
        While(WhileExpr) = WHILE_EXPR,
        Loop(LoopExpr) = LOOP_EXPR,
        For(ForExpr) = FOR_EXPR,
        Return(ReturnExpr) = RETURN_EXPR,
        Break(BreakExpr) = BREAK_EXPR,
        Continue(ContinueExpr) = CONTINUE_EXPR,
        Closure(ClosureExpr) = CLOSURE_EXPR,
        Underscore(UnderscoreExpr) = UNDERSCORE_EXPR,
        Macro(MacroCall) = MACRO_CALL,
    }
}

impl Expr {
    /// The underlying node, consuming the wrapper.
    pub fn into_syntax(self) -> SyntaxNode {
        self.syntax().clone()
    }
}

// ── Atoms ────────────────────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

impl Literal {
    /// The literal token (the last one, after an optional `-`).
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .last()
    }
}

ast_node!(PathExpr, PATH_EXPR);

impl PathExpr {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }
}

ast_node!(UnderscoreExpr, UNDERSCORE_EXPR);

// ── Record literals ──────────────────────────────────────────────────────

ast_node!(RecordExpr, RECORD_EXPR);

impl RecordExpr {
    pub fn path(&self) -> Option<Path> {
        child_node(&self.syntax)
    }

    pub fn field_list(&self) -> Option<RecordExprFieldList> {
        child_node(&self.syntax)
    }
}

ast_node!(RecordExprFieldList, RECORD_EXPR_FIELD_LIST);

impl RecordExprFieldList {
    pub fn fields(&self) -> impl Iterator<Item = RecordExprField> + '_ {
        child_nodes(&self.syntax)
    }

    /// The `..` token of a functional update.
    pub fn dotdot_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::DOT_DOT)
    }

    /// The base expression after `..`.
    pub fn spread(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(RecordExprField, RECORD_EXPR_FIELD);

impl RecordExprField {
    /// The field name (`a` in both `a: 1` and shorthand `a`).
    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    /// The explicit value; `None` for shorthand.
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn is_shorthand(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::COLON).is_none()
    }

    pub fn field_name(&self) -> Option<String> {
        self.name_ref()?.text()
    }
}

// ── Calls and access ─────────────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(MethodCallExpr, METHOD_CALL_EXPR);

impl MethodCallExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }

    pub fn generic_arg_list(&self) -> Option<GenericArgList> {
        child_node(&self.syntax)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(FieldExpr, FIELD_EXPR);

impl FieldExpr {
    pub fn receiver(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    /// The accessed field (`a` or `0`).
    pub fn name_ref(&self) -> Option<NameRef> {
        child_node(&self.syntax)
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    pub fn base(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn index(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }
}

// ── Operators ────────────────────────────────────────────────────────────

ast_node!(PrefixExpr, PREFIX_EXPR);

impl PrefixExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::MINUS | SyntaxKind::BANG | SyntaxKind::STAR))
    }

    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    /// Whether this is a dereference (`*x`).
    pub fn is_deref(&self) -> bool {
        self.op().is_some_and(|t| t.kind() == SyntaxKind::STAR)
    }
}

ast_node!(RefExpr, REF_EXPR);

impl RefExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn is_mut(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::MUT_KW).is_some()
    }
}

ast_node!(BinExpr, BIN_EXPR);

impl BinExpr {
    pub fn lhs(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn rhs(&self) -> Option<Expr> {
        child_nodes(&self.syntax).nth(1)
    }

    /// The operator text; `<<` and `>>=` span two tokens.
    pub fn op_text(&self) -> String {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string())
            .collect()
    }

    /// Whether this is a plain or compound assignment.
    pub fn is_assignment(&self) -> bool {
        let op = self.op_text();
        op == "=" || (op.ends_with('=') && !matches!(op.as_str(), "==" | "!=" | "<=" | ">="))
    }
}

ast_node!(CastExpr, CAST_EXPR);

impl CastExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }
}

ast_node!(TryExpr, TRY_EXPR);

impl TryExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(RangeExpr, RANGE_EXPR);

impl RangeExpr {
    /// Both bounds in source order, whichever are present.
    pub fn bounds(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

// ── Grouping ─────────────────────────────────────────────────────────────

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(TupleExpr, TUPLE_EXPR);

impl TupleExpr {
    pub fn fields(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    pub fn exprs(&self) -> impl Iterator<Item = Expr> + '_ {
        child_nodes(&self.syntax)
    }

    /// Whether this is the repeat form `[x; n]`.
    pub fn is_repeat(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::SEMICOLON).is_some()
    }
}

// ── Blocks and statements ────────────────────────────────────────────────

ast_node!(BlockExpr, BLOCK_EXPR);

impl BlockExpr {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        child_nodes(&self.syntax)
    }

    /// The trailing expression that is the block's value.
    pub fn tail_expr(&self) -> Option<Expr> {
        child_nodes(&self.syntax).last()
    }
}

ast_enum! {
    /// A statement inside a block. Tail expressions and nested items are
    /// reached through [`BlockExpr::tail_expr`] and [`BlockExpr::items`].
    Stmt {
        Let(LetStmt) = LET_STMT,
        Expr(ExprStmt) = EXPR_STMT,
    }
}

impl BlockExpr {
    /// Items declared inside the block.
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(LetStmt, LET_STMT);

impl LetStmt {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }

    /// The declared type annotation.
    pub fn ty(&self) -> Option<Type> {
        child_node(&self.syntax)
    }

    pub fn initializer(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn let_else(&self) -> Option<LetElse> {
        child_node(&self.syntax)
    }
}

ast_node!(LetElse, LET_ELSE);

impl LetElse {
    pub fn block(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

// ── Control flow ─────────────────────────────────────────────────────────

ast_node!(IfExpr, IF_EXPR);

impl IfExpr {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn then_branch(&self) -> Option<BlockExpr> {
        match self.syntax.children().filter_map(Expr::cast).nth(1)? {
            Expr::Block(block) => Some(block),
            _ => None,
        }
    }

    /// `else { }` or `else if ...`.
    pub fn else_branch(&self) -> Option<Expr> {
        let else_kw = child_token(&self.syntax, SyntaxKind::ELSE_KW)?;
        self.syntax
            .children()
            .filter(|n| n.text_range().start() > else_kw.text_range().start())
            .find_map(Expr::cast)
    }
}

ast_node!(LetExpr, LET_EXPR);

impl LetExpr {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }

    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(MatchExpr, MATCH_EXPR);

impl MatchExpr {
    pub fn scrutinee(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn arms(&self) -> impl Iterator<Item = MatchArm> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::MATCH_ARM_LIST)
            .flat_map(|list| list.children().filter_map(MatchArm::cast))
    }
}

ast_node!(MatchArm, MATCH_ARM);

impl MatchArm {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }

    pub fn guard(&self) -> Option<Expr> {
        let guard = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::MATCH_GUARD)?;
        guard.children().find_map(Expr::cast)
    }

    pub fn body(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(WhileExpr, WHILE_EXPR);

impl WhileExpr {
    pub fn condition(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<BlockExpr> {
        child_nodes(&self.syntax).last()
    }
}

ast_node!(LoopExpr, LOOP_EXPR);

impl LoopExpr {
    pub fn body(&self) -> Option<BlockExpr> {
        child_node(&self.syntax)
    }
}

ast_node!(ForExpr, FOR_EXPR);

impl ForExpr {
    pub fn pat(&self) -> Option<Pat> {
        child_node(&self.syntax)
    }

    pub fn iterable(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<BlockExpr> {
        child_nodes(&self.syntax).last()
    }
}

ast_node!(ReturnExpr, RETURN_EXPR);

impl ReturnExpr {
    pub fn expr(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}

ast_node!(BreakExpr, BREAK_EXPR);
ast_node!(ContinueExpr, CONTINUE_EXPR);

ast_node!(ClosureExpr, CLOSURE_EXPR);

impl ClosureExpr {
    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn ret_type(&self) -> Option<RetType> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        child_node(&self.syntax)
    }
}
