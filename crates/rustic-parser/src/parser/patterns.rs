//! Pattern parsing for `let`, `match` arms, parameters and closures.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, items, types, MarkClosed, Parser};

/// Parse a pattern, allowing top-level alternatives (`A | B`).
pub(crate) fn pattern(p: &mut Parser) {
    // A leading `|` is allowed in match arms.
    if p.at(SyntaxKind::PIPE) {
        let m = p.open();
        while p.eat(SyntaxKind::PIPE) {
            pattern_no_top_alt(p);
        }
        p.close(m, SyntaxKind::OR_PAT);
        return;
    }
    let Some(first) = pattern_no_top_alt(p) else {
        return;
    };
    if p.at(SyntaxKind::PIPE) {
        let m = p.open_before(first);
        while p.eat(SyntaxKind::PIPE) {
            pattern_no_top_alt(p);
        }
        p.close(m, SyntaxKind::OR_PAT);
    }
}

/// Parse a single pattern without top-level `|`.
pub(crate) fn pattern_no_top_alt(p: &mut Parser) -> Option<MarkClosed> {
    let closed = match p.current() {
        SyntaxKind::IDENT if p.current_text() == "_" => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::WILDCARD_PAT)
        }
        SyntaxKind::DOT_DOT => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::REST_PAT)
        }
        SyntaxKind::AMP | SyntaxKind::AMP_AMP => {
            let m = p.open();
            p.advance();
            p.eat(SyntaxKind::MUT_KW);
            pattern_no_top_alt(p);
            p.close(m, SyntaxKind::REF_PAT)
        }
        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance();
            let mut elements = 0;
            let mut trailing_comma = false;
            while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
                let before = p.position();
                pattern(p);
                elements += 1;
                trailing_comma = p.eat(SyntaxKind::COMMA);
                if p.position() == before || (!trailing_comma && !p.at(SyntaxKind::R_PAREN)) {
                    p.error("expected `,` or `)`");
                    break;
                }
            }
            p.expect(SyntaxKind::R_PAREN);
            let kind = if elements == 1 && !trailing_comma {
                SyntaxKind::PAREN_PAT
            } else {
                SyntaxKind::TUPLE_PAT
            };
            p.close(m, kind)
        }
        SyntaxKind::L_BRACKET => {
            let m = p.open();
            p.advance();
            pattern_list(p, SyntaxKind::R_BRACKET);
            p.expect(SyntaxKind::R_BRACKET);
            p.close(m, SyntaxKind::SLICE_PAT)
        }
        SyntaxKind::REF_KW | SyntaxKind::MUT_KW => ident_pat(p),
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::CHAR_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::MINUS => literal_or_range_pat(p),
        SyntaxKind::IDENT
        | SyntaxKind::SELF_KW
        | SyntaxKind::SELF_TYPE_KW
        | SyntaxKind::CRATE_KW
        | SyntaxKind::SUPER_KW
        | SyntaxKind::COLON_COLON
        | SyntaxKind::LT => path_pat(p),
        _ => {
            p.error("expected a pattern");
            return None;
        }
    };
    Some(closed)
}

/// `ref mut name @ subpattern`.
fn ident_pat(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.eat(SyntaxKind::REF_KW);
    p.eat(SyntaxKind::MUT_KW);
    if p.at(SyntaxKind::IDENT) || p.at(SyntaxKind::SELF_KW) {
        let name = p.open();
        p.advance();
        p.close(name, SyntaxKind::NAME);
    } else {
        p.error("expected an identifier");
    }
    if p.eat(SyntaxKind::AT) {
        pattern_no_top_alt(p);
    }
    p.close(m, SyntaxKind::IDENT_PAT)
}

fn literal_or_range_pat(p: &mut Parser) -> MarkClosed {
    let lit = p.open();
    expressions::literal_or_negated(p);
    let lit = p.close(lit, SyntaxKind::LITERAL_PAT);
    if !p.at(SyntaxKind::DOT_DOT_EQ) && !p.at(SyntaxKind::DOT_DOT) {
        return lit;
    }
    let range = p.open_before(lit);
    p.advance();
    if p.at_any(&[
        SyntaxKind::INT_LITERAL,
        SyntaxKind::FLOAT_LITERAL,
        SyntaxKind::CHAR_LITERAL,
        SyntaxKind::MINUS,
    ]) {
        let end = p.open();
        expressions::literal_or_negated(p);
        p.close(end, SyntaxKind::LITERAL_PAT);
    }
    p.close(range, SyntaxKind::RANGE_PAT)
}

/// Identifier, path, tuple-struct or record pattern.
fn path_pat(p: &mut Parser) -> MarkClosed {
    // A lone identifier not followed by `::`, `(`, `{` or `!` binds a name.
    let simple_ident = p.at(SyntaxKind::IDENT)
        && !matches!(
            p.nth(1),
            SyntaxKind::COLON_COLON | SyntaxKind::L_PAREN | SyntaxKind::L_BRACE | SyntaxKind::BANG
        );
    if simple_ident {
        return ident_pat(p);
    }

    let m = p.open();
    let is_macro = items::at_macro_call(p);
    types::path(p, types::PathMode::Expr);
    if is_macro {
        p.advance(); // !
        items::token_tree(p);
        return p.close(m, SyntaxKind::MACRO_CALL);
    }
    match p.current() {
        SyntaxKind::L_PAREN => {
            p.advance();
            pattern_list(p, SyntaxKind::R_PAREN);
            p.expect(SyntaxKind::R_PAREN);
            p.close(m, SyntaxKind::TUPLE_STRUCT_PAT)
        }
        SyntaxKind::L_BRACE => {
            record_pat_field_list(p);
            p.close(m, SyntaxKind::RECORD_PAT)
        }
        _ => p.close(m, SyntaxKind::PATH_PAT),
    }
}

/// Comma-separated patterns up to `close` (not consumed).
fn pattern_list(p: &mut Parser, close: SyntaxKind) {
    while !p.at(close) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        pattern(p);
        if p.position() == before || (!p.at(close) && !p.expect(SyntaxKind::COMMA)) {
            break;
        }
    }
}

/// `{ a, b: pat, ref mut c, .. }`.
fn record_pat_field_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // {
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        let before = p.position();
        items::outer_attributes(p);
        if p.at(SyntaxKind::DOT_DOT) {
            let rest = p.open();
            p.advance();
            p.close(rest, SyntaxKind::REST_PAT);
        } else {
            let field = p.open();
            let named = matches!(p.current(), SyntaxKind::IDENT | SyntaxKind::INT_LITERAL)
                && p.nth(1) == SyntaxKind::COLON;
            if named {
                let name_ref = p.open();
                p.advance();
                p.close(name_ref, SyntaxKind::NAME_REF);
                p.advance(); // :
                pattern(p);
            } else if matches!(
                p.current(),
                SyntaxKind::IDENT | SyntaxKind::REF_KW | SyntaxKind::MUT_KW
            ) {
                ident_pat(p);
            } else {
                p.error("expected a field pattern");
            }
            p.close(field, SyntaxKind::RECORD_PAT_FIELD);
        }
        if p.position() == before {
            p.advance_with_error("expected a field pattern");
            continue;
        }
        if !p.at(SyntaxKind::R_BRACE) && !p.expect(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::RECORD_PAT_FIELD_LIST);
}
