use insta::assert_snapshot;
use rustic_lexer::Lexer;

/// Render every non-trivia token as `Kind "text" start..end`, one per line.
fn tokenize_snapshot(source: &str) -> String {
    Lexer::tokenize(source)
        .into_iter()
        .filter(|tok| !tok.kind.is_trivia())
        .map(|tok| {
            let text = &source[tok.span.start as usize..tok.span.end as usize];
            format!("{:?} {:?} {}..{}", tok.kind, text, tok.span.start, tok.span.end)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_record_struct_declaration() {
    let tokens = tokenize_snapshot("struct Test<T> where T: Trait { pub a: T }");
    assert_snapshot!(tokens, @r#"
    Struct "struct" 0..6
    Ident "Test" 7..11
    Lt "<" 11..12
    Ident "T" 12..13
    Gt ">" 13..14
    Where "where" 15..20
    Ident "T" 21..22
    Colon ":" 22..23
    Ident "Trait" 24..29
    LBrace "{" 30..31
    Pub "pub" 32..35
    Ident "a" 36..37
    Colon ":" 37..38
    Ident "T" 39..40
    RBrace "}" 41..42
    Eof "" 42..42
    "#);
}

#[test]
fn test_record_pattern_with_rest() {
    let tokens = tokenize_snapshot("let Test { ref a, .. } = x;");
    assert_snapshot!(tokens, @r#"
    Let "let" 0..3
    Ident "Test" 4..8
    LBrace "{" 9..10
    Ref "ref" 11..14
    Ident "a" 15..16
    Comma "," 16..17
    DotDot ".." 18..20
    RBrace "}" 21..22
    Eq "=" 23..24
    Ident "x" 25..26
    Semicolon ";" 26..27
    Eof "" 27..27
    "#);
}

#[test]
fn test_trivia_is_preserved() {
    let source = "a // trailing\n/* block */ b";
    let tokens = Lexer::tokenize(source);
    let kinds: Vec<String> = tokens.iter().map(|t| format!("{:?}", t.kind)).collect();
    assert_eq!(
        kinds,
        vec!["Ident", "Whitespace", "Comment", "Whitespace", "Comment", "Whitespace", "Ident", "Eof"]
    );
    let end = tokens.last().map(|t| t.span.end);
    assert_eq!(end, Some(source.len() as u32));
}

#[test]
fn test_macro_call_tokens() {
    let tokens = tokenize_snapshot("println!(\"{}\", s.a)");
    assert_snapshot!(tokens, @r#"
    Ident "println" 0..7
    Bang "!" 7..8
    LParen "(" 8..9
    StringLiteral "\"{}\"" 9..13
    Comma "," 13..14
    Ident "s" 15..16
    Dot "." 16..17
    Ident "a" 17..18
    RParen ")" 18..19
    Eof "" 19..19
    "#);
}
