//! Item parsing: functions, structs, enums, impls, traits, modules, `use`
//! declarations, constants, type aliases and item-position macro calls.
//!
//! Also home to the small pieces shared by several items: attributes,
//! visibility, generic parameter lists, where clauses and token trees.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, patterns, types, Parser};

/// Parse items until `terminator` (`}` for nested lists, `EOF` at the root).
pub(crate) fn item_list_contents(p: &mut Parser, terminator: SyntaxKind) {
    while !p.at(terminator) && !p.at(SyntaxKind::EOF) {
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        let before = p.position();
        if !parse_item(p) || p.position() == before {
            p.advance_with_error("expected an item");
        }
    }
}

/// Whether the upcoming tokens start an item (used inside blocks to tell
/// items from statements).
pub(crate) fn at_item_start(p: &Parser) -> bool {
    match p.current() {
        SyntaxKind::FN_KW
        | SyntaxKind::STRUCT_KW
        | SyntaxKind::ENUM_KW
        | SyntaxKind::IMPL_KW
        | SyntaxKind::TRAIT_KW
        | SyntaxKind::USE_KW
        | SyntaxKind::MOD_KW
        | SyntaxKind::STATIC_KW
        | SyntaxKind::TYPE_KW
        | SyntaxKind::PUB_KW
        | SyntaxKind::POUND => true,
        SyntaxKind::UNSAFE_KW => matches!(
            p.nth(1),
            SyntaxKind::FN_KW | SyntaxKind::IMPL_KW | SyntaxKind::TRAIT_KW
        ),
        SyntaxKind::CONST_KW => matches!(
            p.nth(1),
            SyntaxKind::IDENT | SyntaxKind::FN_KW | SyntaxKind::UNSAFE_KW
        ),
        SyntaxKind::IDENT => {
            (p.at_contextual("macro_rules") && p.nth(1) == SyntaxKind::BANG)
                || (p.at_contextual("async") && p.nth(1) == SyntaxKind::FN_KW)
                || (p.at_contextual("union") && p.nth(1) == SyntaxKind::IDENT)
        }
        _ => false,
    }
}

/// Parse one item. Returns `false` without consuming anything when the
/// current token cannot start an item.
pub(crate) fn parse_item(p: &mut Parser) -> bool {
    let m = p.open();
    let had_attrs = outer_attributes(p);
    let had_vis = opt_visibility(p);

    // Function qualifiers in front of `fn`.
    loop {
        let qualifier = (p.at(SyntaxKind::CONST_KW)
            && matches!(p.nth(1), SyntaxKind::FN_KW | SyntaxKind::UNSAFE_KW))
            || (p.at(SyntaxKind::UNSAFE_KW)
                && matches!(p.nth(1), SyntaxKind::FN_KW | SyntaxKind::IDENT))
            || (p.at_contextual("async") && p.nth(1) == SyntaxKind::FN_KW)
            || (p.at_contextual("extern")
                && matches!(p.nth(1), SyntaxKind::FN_KW | SyntaxKind::STRING_LITERAL));
        if !qualifier {
            break;
        }
        let was_extern = p.at_contextual("extern");
        p.advance();
        if was_extern {
            p.eat(SyntaxKind::STRING_LITERAL);
        }
    }

    match p.current() {
        SyntaxKind::FN_KW => fn_def(p, m),
        SyntaxKind::STRUCT_KW => struct_def(p, m),
        SyntaxKind::IDENT if p.at_contextual("union") && p.nth(1) == SyntaxKind::IDENT => {
            struct_def(p, m)
        }
        SyntaxKind::ENUM_KW => enum_def(p, m),
        SyntaxKind::IMPL_KW => impl_def(p, m),
        SyntaxKind::UNSAFE_KW if p.nth(1) == SyntaxKind::IMPL_KW => {
            p.advance();
            impl_def(p, m)
        }
        SyntaxKind::TRAIT_KW => trait_def(p, m),
        SyntaxKind::UNSAFE_KW if p.nth(1) == SyntaxKind::TRAIT_KW => {
            p.advance();
            trait_def(p, m)
        }
        SyntaxKind::USE_KW => use_item(p, m),
        SyntaxKind::MOD_KW => mod_item(p, m),
        SyntaxKind::CONST_KW => const_or_static(p, m, SyntaxKind::CONST_ITEM),
        SyntaxKind::STATIC_KW => const_or_static(p, m, SyntaxKind::STATIC_ITEM),
        SyntaxKind::TYPE_KW => type_alias(p, m),
        SyntaxKind::IDENT
        | SyntaxKind::COLON_COLON
        | SyntaxKind::SELF_KW
        | SyntaxKind::CRATE_KW
        | SyntaxKind::SUPER_KW
            if at_macro_call(p) =>
        {
            item_macro_call(p, m)
        }
        _ => {
            if had_attrs || had_vis {
                p.error("expected an item after attributes or visibility");
                p.close(m, SyntaxKind::ERROR_NODE);
                return true;
            }
            p.abandon(m);
            return false;
        }
    }
    true
}

/// Whether a path followed by `!` starts here (`foo!`, `a::b!`,
/// `macro_rules! name`).
pub(crate) fn at_macro_call(p: &Parser) -> bool {
    let mut n = 0;
    if p.nth(n) == SyntaxKind::COLON_COLON {
        n += 1;
    }
    loop {
        if !matches!(
            p.nth(n),
            SyntaxKind::IDENT | SyntaxKind::SELF_KW | SyntaxKind::CRATE_KW | SyntaxKind::SUPER_KW
        ) {
            return false;
        }
        n += 1;
        match p.nth(n) {
            SyntaxKind::COLON_COLON => n += 1,
            SyntaxKind::BANG => return true,
            _ => return false,
        }
    }
}

fn item_macro_call(p: &mut Parser, m: super::MarkOpened) {
    types::path(p, types::PathMode::Expr);
    p.expect(SyntaxKind::BANG);
    // `macro_rules! name { ... }`
    if p.at(SyntaxKind::IDENT) {
        p.advance();
    }
    let brace = p.at(SyntaxKind::L_BRACE);
    token_tree(p);
    if !brace {
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.close(m, SyntaxKind::MACRO_CALL);
}

// ── Shared pieces ──────────────────────────────────────────────────────

/// Zero or more `#[...]`. Returns whether any were parsed.
pub(crate) fn outer_attributes(p: &mut Parser) -> bool {
    let mut any = false;
    while p.at(SyntaxKind::POUND) && p.nth(1) == SyntaxKind::L_BRACKET {
        let m = p.open();
        p.advance(); // #
        token_tree(p);
        p.close(m, SyntaxKind::ATTR);
        any = true;
    }
    any
}

/// Zero or more `#![...]`.
pub(crate) fn inner_attributes(p: &mut Parser) {
    while p.at(SyntaxKind::POUND) && p.nth(1) == SyntaxKind::BANG && p.nth(2) == SyntaxKind::L_BRACKET
    {
        let m = p.open();
        p.advance(); // #
        p.advance(); // !
        token_tree(p);
        p.close(m, SyntaxKind::ATTR);
    }
}

/// `pub`, `pub(crate)`, `pub(self)`, `pub(super)`, `pub(in path)`.
pub(crate) fn opt_visibility(p: &mut Parser) -> bool {
    if !p.at(SyntaxKind::PUB_KW) {
        return false;
    }
    let m = p.open();
    p.advance();
    if p.at(SyntaxKind::L_PAREN) {
        match p.nth(1) {
            SyntaxKind::CRATE_KW | SyntaxKind::SELF_KW | SyntaxKind::SUPER_KW
                if p.nth(2) == SyntaxKind::R_PAREN =>
            {
                p.advance();
                p.advance();
                p.advance();
            }
            SyntaxKind::IN_KW => {
                p.advance();
                p.advance();
                types::path(p, types::PathMode::Use);
                p.expect(SyntaxKind::R_PAREN);
            }
            _ => {}
        }
    }
    p.close(m, SyntaxKind::VISIBILITY);
    true
}

/// A `NAME` node around the current identifier.
pub(crate) fn name(p: &mut Parser) {
    if p.at(SyntaxKind::IDENT) {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::NAME);
    } else {
        p.error("expected a name");
    }
}

/// `<'a, T: Bound = Default, const N: usize>`.
pub(crate) fn opt_generic_params(p: &mut Parser) {
    if !p.at(SyntaxKind::LT) {
        return;
    }
    let m = p.open();
    p.advance(); // <
    while !p.at(SyntaxKind::GT) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        outer_attributes(p);
        match p.current() {
            SyntaxKind::LIFETIME => {
                let param = p.open();
                p.advance();
                if p.eat(SyntaxKind::COLON) {
                    lifetime_bounds(p);
                }
                p.close(param, SyntaxKind::LIFETIME_PARAM);
            }
            SyntaxKind::CONST_KW => {
                let param = p.open();
                p.advance();
                name(p);
                p.expect(SyntaxKind::COLON);
                types::type_(p);
                if p.eat(SyntaxKind::EQ) {
                    types::const_arg(p);
                }
                p.close(param, SyntaxKind::CONST_PARAM);
            }
            SyntaxKind::IDENT => {
                let param = p.open();
                name(p);
                if p.eat(SyntaxKind::COLON) {
                    types::bounds(p);
                }
                if p.eat(SyntaxKind::EQ) {
                    types::type_(p);
                }
                p.close(param, SyntaxKind::TYPE_PARAM);
            }
            _ => {
                p.advance_with_error("expected a generic parameter");
            }
        }
        if p.position() == before || (!p.at(SyntaxKind::GT) && !p.expect(SyntaxKind::COMMA)) {
            break;
        }
    }
    p.expect(SyntaxKind::GT);
    p.close(m, SyntaxKind::GENERIC_PARAM_LIST);
}

fn lifetime_bounds(p: &mut Parser) {
    while p.eat(SyntaxKind::LIFETIME) {
        if !p.eat(SyntaxKind::PLUS) {
            break;
        }
    }
}

/// `where T: A + B, 'a: 'b,` up to (not including) `{`, `;` or `=`.
pub(crate) fn opt_where_clause(p: &mut Parser) {
    if !p.at(SyntaxKind::WHERE_KW) {
        return;
    }
    let m = p.open();
    p.advance();
    while !p.at_any(&[
        SyntaxKind::L_BRACE,
        SyntaxKind::SEMICOLON,
        SyntaxKind::EQ,
        SyntaxKind::EOF,
    ]) {
        let before = p.position();
        let pred = p.open();
        if p.at(SyntaxKind::LIFETIME) {
            p.advance();
            p.expect(SyntaxKind::COLON);
            lifetime_bounds(p);
        } else {
            types::opt_for_binder(p);
            types::type_(p);
            p.expect(SyntaxKind::COLON);
            types::bounds(p);
        }
        p.close(pred, SyntaxKind::WHERE_PRED);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
        if p.position() == before {
            break;
        }
    }
    p.close(m, SyntaxKind::WHERE_CLAUSE);
}

/// A balanced `(...)`, `[...]` or `{...}` with nested trees as children.
pub(crate) fn token_tree(p: &mut Parser) {
    let close = match p.current() {
        SyntaxKind::L_PAREN => SyntaxKind::R_PAREN,
        SyntaxKind::L_BRACKET => SyntaxKind::R_BRACKET,
        SyntaxKind::L_BRACE => SyntaxKind::R_BRACE,
        _ => {
            p.error("expected `(`, `[` or `{`");
            return;
        }
    };
    let open_span = p.current_span();
    let m = p.open();
    p.advance();
    loop {
        match p.current() {
            k if k == close => {
                p.advance();
                break;
            }
            SyntaxKind::EOF => {
                p.error_with_related("unclosed delimiter", open_span, "opened here");
                break;
            }
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => token_tree(p),
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                p.advance_with_error("mismatched closing delimiter");
            }
            _ => p.advance(),
        }
    }
    p.close(m, SyntaxKind::TOKEN_TREE);
}

// ── Items ──────────────────────────────────────────────────────────────

fn fn_def(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // fn
    name(p);
    opt_generic_params(p);
    if p.at(SyntaxKind::L_PAREN) {
        param_list(p);
    } else {
        p.error("expected `(`");
    }
    if p.at(SyntaxKind::ARROW) {
        types::ret_type(p);
    }
    opt_where_clause(p);
    if p.at(SyntaxKind::L_BRACE) {
        expressions::block_expr(p);
    } else {
        p.expect(SyntaxKind::SEMICOLON);
    }
    p.close(m, SyntaxKind::FN_DEF);
}

/// `(self, pat: Type, ...)`.
fn param_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    let mut first = true;
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        let param = p.open();
        outer_attributes(p);
        if first && at_self_param(p) {
            self_param(p);
            p.close(param, SyntaxKind::SELF_PARAM);
        } else {
            patterns::pattern_no_top_alt(p);
            if p.eat(SyntaxKind::COLON) {
                types::type_(p);
            } else {
                p.error("expected `:` and a parameter type");
            }
            p.close(param, SyntaxKind::PARAM);
        }
        first = false;
        if !p.at(SyntaxKind::R_PAREN) && !p.expect(SyntaxKind::COMMA) {
            if p.position() == before {
                p.advance_with_error("expected a parameter");
            }
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PARAM_LIST);
}

fn at_self_param(p: &Parser) -> bool {
    match p.current() {
        SyntaxKind::SELF_KW => true,
        SyntaxKind::MUT_KW => p.nth(1) == SyntaxKind::SELF_KW,
        SyntaxKind::AMP => match p.nth(1) {
            SyntaxKind::SELF_KW => true,
            SyntaxKind::MUT_KW => p.nth(2) == SyntaxKind::SELF_KW,
            SyntaxKind::LIFETIME => {
                p.nth(2) == SyntaxKind::SELF_KW
                    || (p.nth(2) == SyntaxKind::MUT_KW && p.nth(3) == SyntaxKind::SELF_KW)
            }
            _ => false,
        },
        _ => false,
    }
}

fn self_param(p: &mut Parser) {
    if p.eat(SyntaxKind::AMP) {
        p.eat(SyntaxKind::LIFETIME);
    }
    p.eat(SyntaxKind::MUT_KW);
    p.expect(SyntaxKind::SELF_KW);
    if p.eat(SyntaxKind::COLON) {
        types::type_(p);
    }
}

/// `struct Name<G> { ... }`, `struct Name<G>(...) where ...;`, `struct Name;`.
fn struct_def(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // struct / union
    name(p);
    opt_generic_params(p);
    match p.current() {
        SyntaxKind::WHERE_KW | SyntaxKind::L_BRACE => {
            opt_where_clause(p);
            if p.at(SyntaxKind::L_BRACE) {
                record_field_list(p);
            } else {
                p.expect(SyntaxKind::SEMICOLON);
            }
        }
        SyntaxKind::L_PAREN => {
            tuple_field_list(p);
            opt_where_clause(p);
            p.expect(SyntaxKind::SEMICOLON);
        }
        SyntaxKind::SEMICOLON => p.advance(),
        _ => p.error("expected `{`, `(` or `;` after struct name"),
    }
    p.close(m, SyntaxKind::STRUCT_DEF);
}

/// `{ #[attr] pub name: Type, ... }`.
pub(crate) fn record_field_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // {
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        let field = p.open();
        outer_attributes(p);
        opt_visibility(p);
        name(p);
        p.expect(SyntaxKind::COLON);
        types::type_(p);
        p.close(field, SyntaxKind::RECORD_FIELD);
        if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
            if p.position() == before {
                p.advance_with_error("expected a field");
            } else if !p.at(SyntaxKind::IDENT) && !p.at(SyntaxKind::PUB_KW) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::RECORD_FIELD_LIST);
}

/// `(#[attr] pub Type, ...)`.
pub(crate) fn tuple_field_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        let field = p.open();
        outer_attributes(p);
        opt_visibility(p);
        types::type_(p);
        p.close(field, SyntaxKind::TUPLE_FIELD);
        if !p.at(SyntaxKind::R_PAREN) && !p.expect(SyntaxKind::COMMA) {
            if p.position() == before {
                p.advance_with_error("expected a field type");
            }
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::TUPLE_FIELD_LIST);
}

fn enum_def(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // enum
    name(p);
    opt_generic_params(p);
    opt_where_clause(p);
    if p.at(SyntaxKind::L_BRACE) {
        variant_list(p);
    } else {
        p.error("expected `{`");
    }
    p.close(m, SyntaxKind::ENUM_DEF);
}

fn variant_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // {
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        let variant = p.open();
        outer_attributes(p);
        opt_visibility(p);
        name(p);
        match p.current() {
            SyntaxKind::L_BRACE => record_field_list(p),
            SyntaxKind::L_PAREN => tuple_field_list(p),
            _ => {}
        }
        if p.eat(SyntaxKind::EQ) {
            expressions::expr(p);
        }
        p.close(variant, SyntaxKind::VARIANT);
        if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
            if p.position() == before {
                p.advance_with_error("expected a variant");
            } else if !p.at(SyntaxKind::IDENT) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::VARIANT_LIST);
}

/// `impl<G> [!]Trait for Type where ... { ... }` or `impl<G> Type { ... }`.
fn impl_def(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // impl
    // `impl<T>` generics vs `impl <T as X>::Y` is not worth distinguishing here.
    opt_generic_params(p);
    p.eat(SyntaxKind::BANG);
    types::type_(p);
    if p.eat(SyntaxKind::FOR_KW) {
        types::type_(p);
    }
    opt_where_clause(p);
    if p.at(SyntaxKind::L_BRACE) {
        assoc_item_list(p);
    } else {
        p.error("expected `{`");
    }
    p.close(m, SyntaxKind::IMPL_DEF);
}

fn trait_def(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // trait
    name(p);
    opt_generic_params(p);
    if p.eat(SyntaxKind::COLON) {
        types::bounds(p);
    }
    opt_where_clause(p);
    if p.at(SyntaxKind::L_BRACE) {
        assoc_item_list(p);
    } else {
        p.error("expected `{`");
    }
    p.close(m, SyntaxKind::TRAIT_DEF);
}

fn assoc_item_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // {
    inner_attributes(p);
    item_list_contents(p, SyntaxKind::R_BRACE);
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::ASSOC_ITEM_LIST);
}

fn use_item(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // use
    use_tree(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::USE_ITEM);
}

/// `a::b::{c, d as e, *}`.
fn use_tree(p: &mut Parser) {
    let m = p.open();
    if !p.at(SyntaxKind::L_BRACE) && !p.at(SyntaxKind::STAR) {
        if p.at(SyntaxKind::COLON_COLON)
            && matches!(p.nth(1), SyntaxKind::L_BRACE | SyntaxKind::STAR)
        {
            p.advance();
        } else {
            types::path(p, types::PathMode::Use);
            if !p.eat(SyntaxKind::COLON_COLON) {
                if p.at(SyntaxKind::AS_KW) {
                    let rename = p.open();
                    p.advance();
                    if p.at_contextual("_") {
                        p.advance();
                    } else {
                        name(p);
                    }
                    p.close(rename, SyntaxKind::RENAME);
                }
                p.close(m, SyntaxKind::USE_TREE);
                return;
            }
        }
    }
    match p.current() {
        SyntaxKind::STAR => p.advance(),
        SyntaxKind::L_BRACE => {
            let list = p.open();
            p.advance();
            while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
                let before = p.position();
                use_tree(p);
                if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
                    if p.position() == before {
                        p.advance_with_error("expected a use tree");
                    }
                    break;
                }
            }
            p.expect(SyntaxKind::R_BRACE);
            p.close(list, SyntaxKind::USE_TREE_LIST);
        }
        _ => p.error("expected a path, `*` or `{`"),
    }
    p.close(m, SyntaxKind::USE_TREE);
}

fn mod_item(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // mod
    name(p);
    if p.at(SyntaxKind::L_BRACE) {
        let list = p.open();
        p.advance();
        inner_attributes(p);
        item_list_contents(p, SyntaxKind::R_BRACE);
        p.expect(SyntaxKind::R_BRACE);
        p.close(list, SyntaxKind::ITEM_LIST);
    } else {
        p.expect(SyntaxKind::SEMICOLON);
    }
    p.close(m, SyntaxKind::MOD_ITEM);
}

/// `const NAME: T = expr;` / `static [mut] NAME: T = expr;`.
fn const_or_static(p: &mut Parser, m: super::MarkOpened, kind: SyntaxKind) {
    p.advance(); // const / static
    p.eat(SyntaxKind::MUT_KW);
    if p.at_contextual("_") {
        p.advance();
    } else {
        name(p);
    }
    if p.eat(SyntaxKind::COLON) {
        types::type_(p);
    } else {
        p.error("expected `:`");
    }
    if p.eat(SyntaxKind::EQ) {
        expressions::expr(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, kind);
}

/// `type Name<G>: Bounds where ... = Type;`.
fn type_alias(p: &mut Parser, m: super::MarkOpened) {
    p.advance(); // type
    name(p);
    opt_generic_params(p);
    if p.eat(SyntaxKind::COLON) {
        types::bounds(p);
    }
    opt_where_clause(p);
    if p.eat(SyntaxKind::EQ) {
        types::type_(p);
    }
    opt_where_clause(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::TYPE_ALIAS);
}
