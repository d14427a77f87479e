//! Type and path parsing.
//!
//! Paths come in three flavours: in types, `<` always opens generic
//! arguments (`Vec<u8>`); in expressions and patterns generic arguments need
//! the turbofish (`Vec::<u8>::new`); in `use` trees there are none at all.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, items, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathMode {
    Type,
    Expr,
    Use,
}

/// Whether the current token can begin a path.
pub(crate) fn at_path_start(p: &Parser) -> bool {
    matches!(
        p.current(),
        SyntaxKind::IDENT
            | SyntaxKind::SELF_KW
            | SyntaxKind::SELF_TYPE_KW
            | SyntaxKind::CRATE_KW
            | SyntaxKind::SUPER_KW
            | SyntaxKind::COLON_COLON
    ) || (p.at(SyntaxKind::LT) && p.nth(1) != SyntaxKind::EOF)
}

/// Parse a `PATH`: `[::] segment (:: segment)*`.
pub(crate) fn path(p: &mut Parser, mode: PathMode) {
    let m = p.open();
    p.eat(SyntaxKind::COLON_COLON);
    path_segment(p, mode);
    loop {
        if !p.at(SyntaxKind::COLON_COLON) {
            break;
        }
        match p.nth(1) {
            SyntaxKind::IDENT
            | SyntaxKind::SELF_KW
            | SyntaxKind::SELF_TYPE_KW
            | SyntaxKind::CRATE_KW
            | SyntaxKind::SUPER_KW => {
                p.advance(); // ::
                path_segment(p, mode);
            }
            _ => break,
        }
    }
    p.close(m, SyntaxKind::PATH);
}

fn path_segment(p: &mut Parser, mode: PathMode) {
    let m = p.open();
    match p.current() {
        SyntaxKind::IDENT
        | SyntaxKind::SELF_KW
        | SyntaxKind::SELF_TYPE_KW
        | SyntaxKind::CRATE_KW
        | SyntaxKind::SUPER_KW => {
            let name_ref = p.open();
            p.advance();
            p.close(name_ref, SyntaxKind::NAME_REF);
        }
        // Qualified segment: `<T as Trait>`.
        SyntaxKind::LT if mode != PathMode::Use => {
            p.advance();
            type_(p);
            if p.eat(SyntaxKind::AS_KW) {
                path_type(p);
            }
            p.expect(SyntaxKind::GT);
        }
        _ => p.error("expected a path segment"),
    }
    match mode {
        PathMode::Type => {
            if p.at(SyntaxKind::LT) {
                generic_arg_list(p, false);
            } else if p.at(SyntaxKind::COLON_COLON) && p.nth(1) == SyntaxKind::LT {
                generic_arg_list(p, true);
            } else if p.at(SyntaxKind::L_PAREN) {
                // `Fn(A, B) -> C`
                let args = p.open();
                p.advance();
                while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
                    let before = p.position();
                    type_(p);
                    if p.position() == before
                        || (!p.at(SyntaxKind::R_PAREN) && !p.expect(SyntaxKind::COMMA))
                    {
                        break;
                    }
                }
                p.expect(SyntaxKind::R_PAREN);
                p.close(args, SyntaxKind::PAREN_TYPE_ARG_LIST);
                if p.at(SyntaxKind::ARROW) {
                    ret_type(p);
                }
            }
        }
        PathMode::Expr => {
            if p.at(SyntaxKind::COLON_COLON) && p.nth(1) == SyntaxKind::LT {
                generic_arg_list(p, true);
            }
        }
        PathMode::Use => {}
    }
    p.close(m, SyntaxKind::PATH_SEGMENT);
}

/// `<...>` or `::<...>` (turbofish).
pub(crate) fn generic_arg_list(p: &mut Parser, turbofish: bool) {
    let m = p.open();
    if turbofish {
        p.advance(); // ::
    }
    p.advance(); // <
    while !p.at(SyntaxKind::GT) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        generic_arg(p);
        if p.position() == before || (!p.at(SyntaxKind::GT) && !p.expect(SyntaxKind::COMMA)) {
            break;
        }
    }
    p.expect(SyntaxKind::GT);
    p.close(m, SyntaxKind::GENERIC_ARG_LIST);
}

fn generic_arg(p: &mut Parser) {
    match p.current() {
        SyntaxKind::LIFETIME => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::LIFETIME_ARG);
        }
        SyntaxKind::IDENT if matches!(p.nth(1), SyntaxKind::EQ | SyntaxKind::COLON) => {
            let m = p.open();
            let name_ref = p.open();
            p.advance();
            p.close(name_ref, SyntaxKind::NAME_REF);
            if p.eat(SyntaxKind::EQ) {
                type_(p);
            } else {
                p.advance(); // :
                bounds(p);
            }
            p.close(m, SyntaxKind::ASSOC_TYPE_ARG);
        }
        SyntaxKind::INT_LITERAL
        | SyntaxKind::MINUS
        | SyntaxKind::L_BRACE
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::CHAR_LITERAL
        | SyntaxKind::STRING_LITERAL => const_arg(p),
        _ => {
            let m = p.open();
            type_(p);
            p.close(m, SyntaxKind::TYPE_ARG);
        }
    }
}

/// A const generic argument: literal, negated literal, or block.
pub(crate) fn const_arg(p: &mut Parser) {
    if p.at(SyntaxKind::L_BRACE) {
        expressions::block_expr(p);
    } else {
        let m = p.open();
        expressions::literal_or_negated(p);
        p.close(m, SyntaxKind::LITERAL);
    }
}

/// `-> Type`.
pub(crate) fn ret_type(p: &mut Parser) {
    let m = p.open();
    p.advance(); // ->
    type_(p);
    p.close(m, SyntaxKind::RET_TYPE);
}

/// A `PATH_TYPE`.
pub(crate) fn path_type(p: &mut Parser) {
    let m = p.open();
    path(p, PathMode::Type);
    p.close(m, SyntaxKind::PATH_TYPE);
}

/// `for<'a>` prefix on bounds and where predicates.
pub(crate) fn opt_for_binder(p: &mut Parser) {
    if p.at(SyntaxKind::FOR_KW) && p.nth(1) == SyntaxKind::LT {
        p.advance();
        items::opt_generic_params(p);
    }
}

/// `A + ?Sized + 'a + for<'b> Fn(&'b u8)`.
pub(crate) fn bounds(p: &mut Parser) {
    let m = p.open();
    loop {
        let bound = p.open();
        match p.current() {
            SyntaxKind::LIFETIME => p.advance(),
            SyntaxKind::QUESTION => {
                p.advance();
                path_type(p);
            }
            SyntaxKind::L_PAREN => {
                p.advance();
                opt_for_binder(p);
                path_type(p);
                p.expect(SyntaxKind::R_PAREN);
            }
            SyntaxKind::FOR_KW => {
                opt_for_binder(p);
                path_type(p);
            }
            _ if at_path_start(p) => path_type(p),
            _ => {
                p.abandon(bound);
                break;
            }
        }
        p.close(bound, SyntaxKind::TYPE_BOUND);
        if !p.eat(SyntaxKind::PLUS) {
            break;
        }
    }
    p.close(m, SyntaxKind::TYPE_BOUND_LIST);
}

/// Parse a type.
pub(crate) fn type_(p: &mut Parser) {
    match p.current() {
        SyntaxKind::AMP | SyntaxKind::AMP_AMP => {
            let m = p.open();
            p.advance();
            p.eat(SyntaxKind::LIFETIME);
            p.eat(SyntaxKind::MUT_KW);
            type_(p);
            p.close(m, SyntaxKind::REF_TYPE);
        }
        SyntaxKind::STAR => {
            let m = p.open();
            p.advance();
            if !p.eat(SyntaxKind::CONST_KW) && !p.eat(SyntaxKind::MUT_KW) {
                p.error("expected `const` or `mut`");
            }
            type_(p);
            p.close(m, SyntaxKind::PTR_TYPE);
        }
        SyntaxKind::L_BRACKET => {
            let m = p.open();
            p.advance();
            type_(p);
            let kind = if p.eat(SyntaxKind::SEMICOLON) {
                expressions::expr(p);
                SyntaxKind::ARRAY_TYPE
            } else {
                SyntaxKind::SLICE_TYPE
            };
            p.expect(SyntaxKind::R_BRACKET);
            p.close(m, kind);
        }
        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance();
            while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
                let before = p.position();
                type_(p);
                if p.position() == before
                    || (!p.at(SyntaxKind::R_PAREN) && !p.expect(SyntaxKind::COMMA))
                {
                    break;
                }
            }
            p.expect(SyntaxKind::R_PAREN);
            p.close(m, SyntaxKind::TUPLE_TYPE);
        }
        SyntaxKind::BANG => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::NEVER_TYPE);
        }
        SyntaxKind::IDENT if p.current_text() == "_" => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::INFER_TYPE);
        }
        SyntaxKind::IMPL_KW => {
            let m = p.open();
            p.advance();
            bounds(p);
            p.close(m, SyntaxKind::IMPL_TRAIT_TYPE);
        }
        SyntaxKind::DYN_KW => {
            let m = p.open();
            p.advance();
            bounds(p);
            p.close(m, SyntaxKind::DYN_TRAIT_TYPE);
        }
        SyntaxKind::FN_KW | SyntaxKind::UNSAFE_KW => fn_ptr_type(p),
        SyntaxKind::IDENT if p.at_contextual("extern") => fn_ptr_type(p),
        SyntaxKind::FOR_KW => {
            opt_for_binder(p);
            type_(p);
        }
        _ if at_path_start(p) => {
            if items::at_macro_call(p) {
                let m = p.open();
                path(p, PathMode::Expr);
                p.advance(); // !
                items::token_tree(p);
                p.close(m, SyntaxKind::MACRO_CALL);
            } else {
                path_type(p);
            }
        }
        _ => p.error("expected a type"),
    }
}

/// `unsafe extern "C" fn(A, B) -> C`.
fn fn_ptr_type(p: &mut Parser) {
    let m = p.open();
    p.eat(SyntaxKind::UNSAFE_KW);
    if p.at_contextual("extern") {
        p.advance();
        p.eat(SyntaxKind::STRING_LITERAL);
    }
    p.expect(SyntaxKind::FN_KW);
    if p.at(SyntaxKind::L_PAREN) {
        let params = p.open();
        p.advance();
        while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
            let before = p.position();
            let param = p.open();
            // Named parameters (`fn(x: u8)`) are allowed in pointer types.
            if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::COLON {
                p.advance();
                p.advance();
            }
            type_(p);
            p.close(param, SyntaxKind::PARAM);
            if p.position() == before
                || (!p.at(SyntaxKind::R_PAREN) && !p.expect(SyntaxKind::COMMA))
            {
                break;
            }
        }
        p.expect(SyntaxKind::R_PAREN);
        p.close(params, SyntaxKind::PARAM_LIST);
    } else {
        p.error("expected `(`");
    }
    if p.at(SyntaxKind::ARROW) {
        ret_type(p);
    }
    p.close(m, SyntaxKind::FN_PTR_TYPE);
}
