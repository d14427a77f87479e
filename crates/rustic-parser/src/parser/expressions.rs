//! Pratt expression parser plus blocks and statements.
//!
//! Implements operator precedence parsing using binding power tables and the
//! expression forms of the Rust subset: literals, paths, record literals,
//! calls, method calls, field and index access, unary/binary/cast/range
//! operators, closures, and the block-like forms (`if`, `match`, loops,
//! blocks).

use crate::syntax_kind::SyntaxKind;

use super::{items, patterns, types, MarkClosed, Parser};

/// Context restrictions for an expression.
///
/// `no_struct` forbids record literals where a `{` must open a block instead
/// (`if`, `while` and `match` heads, `for` iterables). Delimited
/// sub-expressions reset it.
#[derive(Debug, Clone, Copy, Default)]
struct Restrictions {
    no_struct: bool,
}

const NO_STRUCT: Restrictions = Restrictions { no_struct: true };

// ── Binding Power Tables ───────────────────────────────────────────────

/// An infix operator recognised at the current position.
struct Infix {
    left: u8,
    right: u8,
    /// Number of tokens the operator spans (`<<` is two `<` tokens).
    tokens: usize,
}

/// Returns the infix operator at the current position, if any.
///
/// Left < right means left-associative; assignment is right-associative.
fn infix_op(p: &Parser) -> Option<Infix> {
    let op = |left, right, tokens| Some(Infix { left, right, tokens });

    if p.at_joint(SyntaxKind::LT, SyntaxKind::LT_EQ) || p.at_joint(SyntaxKind::GT, SyntaxKind::GT_EQ) {
        return op(2, 1, 2);
    }
    if p.at_joint(SyntaxKind::LT, SyntaxKind::LT) || p.at_joint(SyntaxKind::GT, SyntaxKind::GT) {
        return op(17, 18, 2);
    }
    match p.current() {
        SyntaxKind::EQ | SyntaxKind::COMPOUND_ASSIGN => op(2, 1, 1),
        SyntaxKind::PIPE_PIPE => op(5, 6, 1),
        SyntaxKind::AMP_AMP => op(7, 8, 1),
        SyntaxKind::EQ_EQ
        | SyntaxKind::NOT_EQ
        | SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ => op(9, 10, 1),
        SyntaxKind::PIPE => op(11, 12, 1),
        SyntaxKind::CARET => op(13, 14, 1),
        SyntaxKind::AMP => op(15, 16, 1),
        SyntaxKind::PLUS | SyntaxKind::MINUS => op(19, 20, 1),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => op(21, 22, 1),
        _ => None,
    }
}

/// Range operators sit between assignment and `||`.
const RANGE_BP: (u8, u8) = (3, 4);

/// `as` binds tighter than every binary operator.
const CAST_BP: u8 = 23;

/// Prefix operators (`-`, `!`, `*`, `&`).
const PREFIX_BP: u8 = 25;

/// Postfix operations (call, field, method, index, `?`).
const POSTFIX_BP: u8 = 27;

/// Scrutinee of `let` in a condition binds tighter than `&&` so let chains
/// (`if let Some(x) = a && b`) split correctly.
const LET_SCRUTINEE_BP: u8 = 8;

// ── Expression Entry Points ────────────────────────────────────────────

/// Parse an expression at the default (lowest) binding power.
pub(crate) fn expr(p: &mut Parser) -> Option<MarkClosed> {
    expr_bp(p, 0, Restrictions::default())
}

fn expr_no_struct(p: &mut Parser) -> Option<MarkClosed> {
    expr_bp(p, 0, NO_STRUCT)
}

/// Core Pratt loop: an atom or prefix expression, then postfix and infix
/// operators as long as their binding power exceeds `min_bp`.
fn expr_bp(p: &mut Parser, min_bp: u8, r: Restrictions) -> Option<MarkClosed> {
    let lhs = lhs(p, r)?;
    Some(expr_continue(p, lhs, min_bp, r))
}

fn expr_continue(p: &mut Parser, mut lhs: MarkClosed, min_bp: u8, r: Restrictions) -> MarkClosed {
    loop {
        let current = p.current();

        if POSTFIX_BP >= min_bp {
            match current {
                SyntaxKind::L_PAREN => {
                    let m = p.open_before(lhs);
                    arg_list(p);
                    lhs = p.close(m, SyntaxKind::CALL_EXPR);
                    continue;
                }
                SyntaxKind::DOT => {
                    lhs = dot_postfix(p, lhs);
                    continue;
                }
                SyntaxKind::L_BRACKET => {
                    let m = p.open_before(lhs);
                    p.advance(); // [
                    expr(p);
                    p.expect(SyntaxKind::R_BRACKET);
                    lhs = p.close(m, SyntaxKind::INDEX_EXPR);
                    continue;
                }
                SyntaxKind::QUESTION => {
                    let m = p.open_before(lhs);
                    p.advance();
                    lhs = p.close(m, SyntaxKind::TRY_EXPR);
                    continue;
                }
                _ => {}
            }
        }

        if current == SyntaxKind::AS_KW {
            if CAST_BP < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance();
            types::type_(p);
            lhs = p.close(m, SyntaxKind::CAST_EXPR);
            continue;
        }

        if matches!(current, SyntaxKind::DOT_DOT | SyntaxKind::DOT_DOT_EQ) {
            if RANGE_BP.0 < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance();
            if at_expr_start(p, r) {
                expr_bp(p, RANGE_BP.1, r);
            }
            lhs = p.close(m, SyntaxKind::RANGE_EXPR);
            continue;
        }

        let Some(infix) = infix_op(p) else {
            break;
        };
        if infix.left < min_bp {
            break;
        }
        let m = p.open_before(lhs);
        for _ in 0..infix.tokens {
            p.advance();
        }
        if expr_bp(p, infix.right, r).is_none() {
            p.error("expected an expression after the operator");
        }
        lhs = p.close(m, SyntaxKind::BIN_EXPR);
    }
    lhs
}

/// `.field`, `.0`, `.method(args)`, `.method::<T>(args)`.
fn dot_postfix(p: &mut Parser, lhs: MarkClosed) -> MarkClosed {
    let m = p.open_before(lhs);
    p.advance(); // .
    match p.current() {
        SyntaxKind::IDENT
            if p.nth(1) == SyntaxKind::L_PAREN
                || (p.nth(1) == SyntaxKind::COLON_COLON && p.nth(2) == SyntaxKind::LT) =>
        {
            name_ref(p);
            if p.at(SyntaxKind::COLON_COLON) {
                types::generic_arg_list(p, true);
            }
            arg_list(p);
            p.close(m, SyntaxKind::METHOD_CALL_EXPR)
        }
        SyntaxKind::IDENT | SyntaxKind::INT_LITERAL => {
            name_ref(p);
            p.close(m, SyntaxKind::FIELD_EXPR)
        }
        _ => {
            p.error("expected a field name or method call after `.`");
            p.close(m, SyntaxKind::FIELD_EXPR)
        }
    }
}

fn name_ref(p: &mut Parser) {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::NAME_REF);
}

/// `(a, b, c)`.
fn arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    comma_separated_exprs(p, SyntaxKind::R_PAREN);
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}

/// Comma-separated expressions up to `close` (not consumed).
fn comma_separated_exprs(p: &mut Parser, close: SyntaxKind) {
    while !p.at(close) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        expr(p);
        if p.position() == before {
            break;
        }
        if !p.at(close) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }
}

/// Whether the current token can begin an expression.
fn at_expr_start(p: &Parser, r: Restrictions) -> bool {
    match p.current() {
        SyntaxKind::L_BRACE => !r.no_struct,
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::CHAR_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::IDENT
        | SyntaxKind::SELF_KW
        | SyntaxKind::SELF_TYPE_KW
        | SyntaxKind::CRATE_KW
        | SyntaxKind::SUPER_KW
        | SyntaxKind::COLON_COLON
        | SyntaxKind::LT
        | SyntaxKind::L_PAREN
        | SyntaxKind::L_BRACKET
        | SyntaxKind::PIPE
        | SyntaxKind::PIPE_PIPE
        | SyntaxKind::MINUS
        | SyntaxKind::BANG
        | SyntaxKind::STAR
        | SyntaxKind::AMP
        | SyntaxKind::AMP_AMP
        | SyntaxKind::DOT_DOT
        | SyntaxKind::DOT_DOT_EQ
        | SyntaxKind::IF_KW
        | SyntaxKind::MATCH_KW
        | SyntaxKind::WHILE_KW
        | SyntaxKind::LOOP_KW
        | SyntaxKind::FOR_KW
        | SyntaxKind::RETURN_KW
        | SyntaxKind::BREAK_KW
        | SyntaxKind::CONTINUE_KW
        | SyntaxKind::LET_KW
        | SyntaxKind::UNSAFE_KW
        | SyntaxKind::MOVE_KW
        | SyntaxKind::LIFETIME => true,
        _ => false,
    }
}

// ── Atom / Prefix Parsing (LHS) ───────────────────────────────────────

fn lhs(p: &mut Parser, r: Restrictions) -> Option<MarkClosed> {
    let kind = match p.current() {
        SyntaxKind::MINUS | SyntaxKind::BANG | SyntaxKind::STAR => SyntaxKind::PREFIX_EXPR,
        SyntaxKind::AMP | SyntaxKind::AMP_AMP => SyntaxKind::REF_EXPR,
        SyntaxKind::DOT_DOT | SyntaxKind::DOT_DOT_EQ => {
            let m = p.open();
            p.advance();
            if at_expr_start(p, r) {
                expr_bp(p, RANGE_BP.1, r);
            }
            return Some(p.close(m, SyntaxKind::RANGE_EXPR));
        }
        _ => return atom(p, r),
    };
    let m = p.open();
    p.advance();
    if kind == SyntaxKind::REF_EXPR {
        p.eat(SyntaxKind::MUT_KW);
    }
    if expr_bp(p, PREFIX_BP, r).is_none() {
        p.error("expected an expression");
    }
    Some(p.close(m, kind))
}

fn atom(p: &mut Parser, r: Restrictions) -> Option<MarkClosed> {
    let closed = match p.current() {
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::CHAR_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::LITERAL)
        }
        SyntaxKind::IDENT if p.current_text() == "_" => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::UNDERSCORE_EXPR)
        }
        SyntaxKind::IDENT if p.at_contextual("async") && matches!(p.nth(1), SyntaxKind::L_BRACE | SyntaxKind::MOVE_KW) => {
            let m = p.open();
            p.advance();
            p.eat(SyntaxKind::MOVE_KW);
            block_body(p);
            p.close(m, SyntaxKind::BLOCK_EXPR)
        }
        SyntaxKind::IDENT
        | SyntaxKind::SELF_KW
        | SyntaxKind::SELF_TYPE_KW
        | SyntaxKind::CRATE_KW
        | SyntaxKind::SUPER_KW
        | SyntaxKind::COLON_COLON
        | SyntaxKind::LT => path_expr(p, r),
        SyntaxKind::L_PAREN => paren_or_tuple(p),
        SyntaxKind::L_BRACKET => array_expr(p),
        SyntaxKind::L_BRACE => block_expr(p),
        SyntaxKind::UNSAFE_KW => {
            let m = p.open();
            p.advance();
            block_body(p);
            p.close(m, SyntaxKind::BLOCK_EXPR)
        }
        SyntaxKind::IF_KW => if_expr(p),
        SyntaxKind::MATCH_KW => match_expr(p),
        SyntaxKind::WHILE_KW | SyntaxKind::LOOP_KW | SyntaxKind::FOR_KW | SyntaxKind::LIFETIME => {
            labeled_loop(p)
        }
        SyntaxKind::LET_KW => {
            let m = p.open();
            p.advance();
            patterns::pattern(p);
            p.expect(SyntaxKind::EQ);
            expr_bp(p, LET_SCRUTINEE_BP, r);
            p.close(m, SyntaxKind::LET_EXPR)
        }
        SyntaxKind::RETURN_KW => {
            let m = p.open();
            p.advance();
            if at_expr_start(p, r) {
                expr_bp(p, 0, r);
            }
            p.close(m, SyntaxKind::RETURN_EXPR)
        }
        SyntaxKind::BREAK_KW => {
            let m = p.open();
            p.advance();
            p.eat(SyntaxKind::LIFETIME);
            if at_expr_start(p, r) {
                expr_bp(p, 0, r);
            }
            p.close(m, SyntaxKind::BREAK_EXPR)
        }
        SyntaxKind::CONTINUE_KW => {
            let m = p.open();
            p.advance();
            p.eat(SyntaxKind::LIFETIME);
            p.close(m, SyntaxKind::CONTINUE_EXPR)
        }
        SyntaxKind::PIPE | SyntaxKind::PIPE_PIPE | SyntaxKind::MOVE_KW => closure_expr(p, r),
        _ => {
            p.error("expected an expression");
            return None;
        }
    };
    Some(closed)
}

/// Path expression, record literal or macro call.
fn path_expr(p: &mut Parser, r: Restrictions) -> MarkClosed {
    let m = p.open();
    let is_macro = items::at_macro_call(p);
    types::path(p, types::PathMode::Expr);
    if is_macro {
        p.advance(); // !
        items::token_tree(p);
        return p.close(m, SyntaxKind::MACRO_CALL);
    }
    if p.at(SyntaxKind::L_BRACE) && !r.no_struct {
        record_expr_field_list(p);
        return p.close(m, SyntaxKind::RECORD_EXPR);
    }
    p.close(m, SyntaxKind::PATH_EXPR)
}

/// `{ a: 1, b, 0: x, ..base }`.
fn record_expr_field_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // {
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        if p.eat(SyntaxKind::DOT_DOT) {
            // Functional update base; `..Default::default()` included.
            if !p.at(SyntaxKind::R_BRACE) {
                expr(p);
            }
            break;
        }
        let field = p.open();
        items::outer_attributes(p);
        if matches!(p.current(), SyntaxKind::IDENT | SyntaxKind::INT_LITERAL) {
            name_ref(p);
            if p.eat(SyntaxKind::COLON) {
                expr(p);
            }
        } else {
            p.error("expected a field name");
        }
        p.close(field, SyntaxKind::RECORD_EXPR_FIELD);
        if p.position() == before {
            p.advance_with_error("expected a field");
            continue;
        }
        if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::RECORD_EXPR_FIELD_LIST);
}

/// `()`, `(e)`, `(e,)`, `(a, b)`.
fn paren_or_tuple(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // (
    let mut elements = 0;
    let mut saw_comma = false;
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        expr(p);
        elements += 1;
        if p.position() == before {
            break;
        }
        if p.eat(SyntaxKind::COMMA) {
            saw_comma = true;
        } else {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    let kind = if elements == 1 && !saw_comma {
        SyntaxKind::PAREN_EXPR
    } else {
        SyntaxKind::TUPLE_EXPR
    };
    p.close(m, kind)
}

/// `[a, b]` or `[x; n]`.
fn array_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // [
    if !p.at(SyntaxKind::R_BRACKET) {
        expr(p);
        if p.eat(SyntaxKind::SEMICOLON) {
            expr(p);
        } else if p.eat(SyntaxKind::COMMA) {
            comma_separated_exprs(p, SyntaxKind::R_BRACKET);
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.close(m, SyntaxKind::ARRAY_EXPR)
}

/// `|a, b: T| body`, `move || body`, `|x| -> T { ... }`.
fn closure_expr(p: &mut Parser, r: Restrictions) -> MarkClosed {
    let m = p.open();
    p.eat(SyntaxKind::MOVE_KW);
    let params = p.open();
    if !p.eat(SyntaxKind::PIPE_PIPE) {
        p.expect(SyntaxKind::PIPE);
        while !p.at(SyntaxKind::PIPE) && !p.at(SyntaxKind::EOF) {
            let before = p.position();
            let param = p.open();
            patterns::pattern_no_top_alt(p);
            if p.eat(SyntaxKind::COLON) {
                types::type_(p);
            }
            p.close(param, SyntaxKind::PARAM);
            if p.position() == before || (!p.at(SyntaxKind::PIPE) && !p.expect(SyntaxKind::COMMA)) {
                break;
            }
        }
        p.expect(SyntaxKind::PIPE);
    }
    p.close(params, SyntaxKind::PARAM_LIST);
    if p.at(SyntaxKind::ARROW) {
        types::ret_type(p);
        if p.at(SyntaxKind::L_BRACE) {
            block_expr(p);
        } else {
            p.error("expected a block after the closure return type");
        }
    } else if expr_bp(p, 0, r).is_none() {
        p.error("expected a closure body");
    }
    p.close(m, SyntaxKind::CLOSURE_EXPR)
}

/// `if cond { } else if cond { } else { }`.
fn if_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // if
    expr_no_struct(p);
    if p.at(SyntaxKind::L_BRACE) {
        block_expr(p);
    } else {
        p.error("expected `{` after the condition");
    }
    if p.eat(SyntaxKind::ELSE_KW) {
        match p.current() {
            SyntaxKind::IF_KW => {
                if_expr(p);
            }
            SyntaxKind::L_BRACE => {
                block_expr(p);
            }
            _ => p.error("expected `if` or `{` after `else`"),
        }
    }
    p.close(m, SyntaxKind::IF_EXPR)
}

/// `match scrutinee { pat if guard => expr, ... }`.
fn match_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // match
    expr_no_struct(p);
    if p.at(SyntaxKind::L_BRACE) {
        let open_span = p.current_span();
        let arms = p.open();
        p.advance();
        items::inner_attributes(p);
        while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
            let before = p.position();
            match_arm(p);
            if p.position() == before {
                p.advance_with_error("expected a match arm");
            }
        }
        if !p.eat(SyntaxKind::R_BRACE) {
            p.error_with_related("expected `}` to close the match", open_span, "match body opened here");
        }
        p.close(arms, SyntaxKind::MATCH_ARM_LIST);
    } else {
        p.error("expected `{` after the match scrutinee");
    }
    p.close(m, SyntaxKind::MATCH_EXPR)
}

fn match_arm(p: &mut Parser) {
    let m = p.open();
    items::outer_attributes(p);
    patterns::pattern(p);
    if p.at(SyntaxKind::IF_KW) {
        let guard = p.open();
        p.advance();
        expr(p);
        p.close(guard, SyntaxKind::MATCH_GUARD);
    }
    p.expect(SyntaxKind::FAT_ARROW);
    // A block-like arm body ends the arm; `{ } - 1` would be a new arm.
    if at_block_like(p) {
        atom(p, Restrictions::default());
    } else {
        expr(p);
    }
    p.eat(SyntaxKind::COMMA);
    p.close(m, SyntaxKind::MATCH_ARM);
}

/// `'label: loop { }`, `while cond { }`, `for pat in iter { }`.
fn labeled_loop(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    if p.at(SyntaxKind::LIFETIME) {
        let label = p.open();
        p.advance();
        p.expect(SyntaxKind::COLON);
        p.close(label, SyntaxKind::LABEL);
    }
    let kind = match p.current() {
        SyntaxKind::LOOP_KW => {
            p.advance();
            SyntaxKind::LOOP_EXPR
        }
        SyntaxKind::WHILE_KW => {
            p.advance();
            expr_no_struct(p);
            SyntaxKind::WHILE_EXPR
        }
        SyntaxKind::FOR_KW => {
            p.advance();
            patterns::pattern(p);
            p.expect(SyntaxKind::IN_KW);
            expr_no_struct(p);
            SyntaxKind::FOR_EXPR
        }
        SyntaxKind::L_BRACE => {
            block_body(p);
            return p.close(m, SyntaxKind::BLOCK_EXPR);
        }
        _ => {
            p.error("expected a loop or block after the label");
            return p.close(m, SyntaxKind::ERROR_NODE);
        }
    };
    if p.at(SyntaxKind::L_BRACE) {
        block_expr(p);
    } else {
        p.error("expected `{`");
    }
    p.close(m, kind)
}

// ── Blocks and statements ──────────────────────────────────────────────

/// `{ stmts; tail }` as a `BLOCK_EXPR`.
pub(crate) fn block_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    block_body(p);
    p.close(m, SyntaxKind::BLOCK_EXPR)
}

/// The braces and statements of a block, emitted into the current node.
fn block_body(p: &mut Parser) {
    let open_span = p.current_span();
    if !p.expect(SyntaxKind::L_BRACE) {
        return;
    }
    items::inner_attributes(p);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        stmt(p);
        if p.position() == before {
            p.advance_with_error("expected a statement");
        }
    }
    if !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}` to close the block", open_span, "block opened here");
    }
}

/// Whether a block-like expression (one that ends a statement without `;`)
/// starts here.
fn at_block_like(p: &Parser) -> bool {
    match p.current() {
        SyntaxKind::IF_KW
        | SyntaxKind::MATCH_KW
        | SyntaxKind::WHILE_KW
        | SyntaxKind::LOOP_KW
        | SyntaxKind::FOR_KW
        | SyntaxKind::L_BRACE => true,
        SyntaxKind::UNSAFE_KW => p.nth(1) == SyntaxKind::L_BRACE,
        SyntaxKind::LIFETIME => p.nth(1) == SyntaxKind::COLON,
        _ => false,
    }
}

fn stmt(p: &mut Parser) {
    if p.eat(SyntaxKind::SEMICOLON) {
        return;
    }
    if p.at(SyntaxKind::LET_KW) {
        let_stmt(p);
        return;
    }
    if items::at_item_start(p) {
        items::parse_item(p);
        return;
    }

    let block_like = at_block_like(p);
    let Some(mut e) = (if block_like {
        atom(p, Restrictions::default())
    } else {
        expr(p)
    }) else {
        return;
    };
    let mut needs_semicolon = !block_like;
    if block_like && at_method_continuation(p) {
        e = expr_continue(p, e, 0, Restrictions::default());
        needs_semicolon = true;
    }

    if p.at(SyntaxKind::SEMICOLON) {
        let m = p.open_before(e);
        p.advance();
        p.close(m, SyntaxKind::EXPR_STMT);
    } else if p.at(SyntaxKind::R_BRACE) {
        // Tail expression: stays a bare child of the block.
    } else {
        if needs_semicolon {
            p.error("expected `;`");
        }
        let m = p.open_before(e);
        p.close(m, SyntaxKind::EXPR_STMT);
    }
}

/// `match x { }.method()` and `if a { b } else { c }?` continue the
/// expression.
fn at_method_continuation(p: &Parser) -> bool {
    matches!(p.current(), SyntaxKind::DOT | SyntaxKind::QUESTION)
}

/// `let pat: Type = init else { ... };`.
fn let_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // let
    patterns::pattern(p);
    if p.eat(SyntaxKind::COLON) {
        types::type_(p);
    }
    if p.eat(SyntaxKind::EQ) {
        if expr(p).is_none() {
            p.error("expected an initializer");
        }
        if p.at(SyntaxKind::ELSE_KW) {
            let else_branch = p.open();
            p.advance();
            block_expr(p);
            p.close(else_branch, SyntaxKind::LET_ELSE);
        }
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::LET_STMT);
}

/// A literal token, optionally negated. Emitted into the current node.
pub(crate) fn literal_or_negated(p: &mut Parser) {
    p.eat(SyntaxKind::MINUS);
    if p.at_any(&[
        SyntaxKind::INT_LITERAL,
        SyntaxKind::FLOAT_LITERAL,
        SyntaxKind::STRING_LITERAL,
        SyntaxKind::CHAR_LITERAL,
        SyntaxKind::TRUE_KW,
        SyntaxKind::FALSE_KW,
    ]) {
        p.advance();
    } else {
        p.error("expected a literal");
    }
}

/// Root for a standalone expression: a `SOURCE_FILE` holding one expression.
pub(crate) fn parse_expr_root(p: &mut Parser) {
    let root = p.open();
    expr(p);
    while !p.at(SyntaxKind::EOF) {
        p.advance_with_error("unexpected token after the expression");
    }
    p.advance();
    p.close(root, SyntaxKind::SOURCE_FILE);
}
