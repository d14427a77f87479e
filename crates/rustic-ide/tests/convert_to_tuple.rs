//! End-to-end tests for the convert-to-tuple assist.
//!
//! Each test places a `/*caret*/` marker on the declaration, runs the
//! assist against an in-memory workspace and checks the resulting text.

use rowan::TextSize;
use rustic_ide::{
    convert_to_tuple, run_convert_to_tuple, CancellationToken, ConvertConfig, FileId,
    FilePosition, RefactorError, Workspace,
};

// ── Helpers ────────────────────────────────────────────────────────────

const CARET: &str = "/*caret*/";

/// Remove the caret marker, returning the text and the caret offset.
fn split_caret(text: &str) -> (String, TextSize) {
    let offset = text.find(CARET).expect("source has a caret marker");
    let cleaned = text.replacen(CARET, "", 1);
    (cleaned, TextSize::from(offset as u32))
}

fn workspace_with(text: &str) -> (Workspace, FilePosition) {
    let (text, offset) = split_caret(text);
    let ws = Workspace::new();
    let file = ws.set_file("main.rs", text);
    (ws, FilePosition { file, offset })
}

fn text_of(ws: &Workspace, file: FileId) -> String {
    ws.snapshot().file(file).unwrap().text().to_string()
}

fn check_with(before: &str, config: &ConvertConfig) -> String {
    let (ws, position) = workspace_with(before);
    if let Err(err) = run_convert_to_tuple(&ws, position, config, &CancellationToken::new()) {
        panic!("conversion failed: {err} {:?}", err.diagnostics());
    }
    text_of(&ws, position.file)
}

fn check(before: &str) -> String {
    check_with(before, &ConvertConfig::default())
}

/// Run a conversion that must fail; also asserts nothing was written.
fn check_err(before: &str) -> RefactorError {
    let (ws, position) = workspace_with(before);
    let original = text_of(&ws, position.file);
    let err = run_convert_to_tuple(
        &ws,
        position,
        &ConvertConfig::default(),
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert_eq!(text_of(&ws, position.file), original);
    err
}

// ── Declarations and literals ──────────────────────────────────────────

#[test]
fn converts_declaration_literals_and_patterns() {
    let after = check(
        r#"
struct /*caret*/Test { pub a: usize, b: i32 }

fn main() {
    let x = Test { a: 0, b: 0 };
    let Test { a, .. } = Test { a: 0, b: 0 };
}
"#,
    );
    insta::assert_snapshot!(after, @r"
    struct Test(pub usize, i32);

    fn main() {
        let x = Test(0, 0);
        let Test(a, _) = Test(0, 0);
    }
    ");
}

#[test]
fn empty_struct() {
    let after = check("struct /*caret*/Test {}\nfn f() -> Test { Test {} }");
    assert_eq!(after, "struct Test();\nfn f() -> Test { Test() }");
}

#[test]
fn literal_fields_follow_declaration_order() {
    let after = check(
        "struct /*caret*/Test { a: i32, b: bool }\nfn f(b: bool) -> Test {\n    Test { b, a: 5 }\n}",
    );
    assert_eq!(
        after,
        "struct Test(i32, bool);\nfn f(b: bool) -> Test {\n    Test(5, b)\n}"
    );
}

#[test]
fn functional_update_keeps_braces() {
    let after = check(
        "struct /*caret*/Test { a: i32, b: i32 }\nfn f(x: Test, a: i32) -> Test {\n    Test{a, ..x }\n}",
    );
    assert_eq!(
        after,
        "struct Test(i32, i32);\nfn f(x: Test, a: i32) -> Test {\n    Test { 0: a, ..x }\n}"
    );
}

#[test]
fn field_accesses_become_indices() {
    let after = check(
        "struct /*caret*/Test { a: i32, b: i32 }\nfn sum(var: &Test) -> i32 {\n    var.a + var.b\n}",
    );
    assert_eq!(
        after,
        "struct Test(i32, i32);\nfn sum(var: &Test) -> i32 {\n    var.0 + var.1\n}"
    );
}

#[test]
fn nested_literals_and_accesses_compose() {
    let after = check(
        "struct /*caret*/P { a: i32, b: i32 }\nfn f(p: P) -> P {\n    P { a: p.b, b: P { a: 1, b: 2 }.a }\n}",
    );
    assert_eq!(
        after,
        "struct P(i32, i32);\nfn f(p: P) -> P {\n    P(p.1, P(1, 2).0)\n}"
    );
}

// ── Patterns ───────────────────────────────────────────────────────────

#[test]
fn destructuring_with_rest_marker() {
    let after = check(
        r#"
struct /*caret*/S { a: i32, b: i32, c: i32, d: i32, e: i32 }
fn f(s: S) {
    let S { a, c, .. } = s;
    let S { b: v, .. } = s;
    let S { ref mut e, .. } = s;
    let S { a, b, c, d, e } = s;
    let S { a, b, .. } = s;
}
"#,
    );
    insta::assert_snapshot!(after, @r"
    struct S(i32, i32, i32, i32, i32);
    fn f(s: S) {
        let S(a, _, c, _, _) = s;
        let S(_, v, _, _, _) = s;
        let S(_, _, _, _, ref mut e) = s;
        let S(a, b, c, d, e) = s;
        let S(a, b, ..) = s;
    }
    ");
}

#[test]
fn second_field_only() {
    let after = check(
        "struct /*caret*/Test { a: i32, b: i32 }\nfn f(t: Test) -> i32 {\n    let Test { b: v, .. } = t;\n    v\n}",
    );
    assert_eq!(
        after,
        "struct Test(i32, i32);\nfn f(t: Test) -> i32 {\n    let Test(_, v) = t;\n    v\n}"
    );
}

#[test]
fn collapse_threshold_comes_from_config() {
    let config = ConvertConfig {
        collapse_rest_min: 3,
    };
    let after = check_with(
        "struct /*caret*/S { a: u8, b: u8, c: u8, d: u8 }\nfn f(s: S) {\n    let S { a, b, .. } = s;\n    let S { a, .. } = s;\n}",
        &config,
    );
    assert_eq!(
        after,
        "struct S(u8, u8, u8, u8);\nfn f(s: S) {\n    let S(a, b, _, _) = s;\n    let S(a, ..) = s;\n}"
    );
}

// ── Enum variants and `Self` ───────────────────────────────────────────

#[test]
fn enum_variant() {
    let after = check(
        r#"
enum E { /*caret*/A { x: i32, y: bool }, B }
fn f(e: E) -> i32 {
    match e {
        E::A { y, x } => x,
        E::B => 0,
    }
}
fn g() -> E { E::A { y: true, x: 1 } }
"#,
    );
    insta::assert_snapshot!(after, @r"
    enum E { A(i32, bool), B }
    fn f(e: E) -> i32 {
        match e {
            E::A(x, y) => x,
            E::B => 0,
        }
    }
    fn g() -> E { E::A(1, true) }
    ");
}

#[test]
fn variant_through_self() {
    let after = check(
        "enum E { /*caret*/V { a: u8 } }\nimpl E {\n    fn make() -> Self { Self::V { a: 1 } }\n    fn get(&self) -> u8 { match self { Self::V { a } => *a } }\n}",
    );
    assert_eq!(
        after,
        "enum E { V(u8) }\nimpl E {\n    fn make() -> Self { Self::V(1) }\n    fn get(&self) -> u8 { match self { Self::V(a) => *a } }\n}"
    );
}

#[test]
fn self_literals_and_accesses_in_impl() {
    let after = check(
        r#"
struct /*caret*/S { a: i32 }
impl S {
    fn new(v: i32) -> Self {
        Self { a: v }
    }
    fn get(&self) -> i32 {
        self.a
    }
    fn other(v: i32) -> S {
        S { a: v }
    }
}
"#,
    );
    insta::assert_snapshot!(after, @r"
    struct S(i32);
    impl S {
        fn new(v: i32) -> Self {
            Self(v)
        }
        fn get(&self) -> i32 {
            self.0
        }
        fn other(v: i32) -> S {
            S(v)
        }
    }
    ");
}

#[test]
fn doc_comments_are_kept_per_field() {
    let after = check(
        r#"
/// A pair.
struct /*caret*/Test {
    /// The first.
    a: i32,
    #[allow(unused)]
    b: i32,
}
enum E {
    V {
        /// Only.
        x: u8,
    },
}
fn f(t: Test) -> i32 { t.a }
"#,
    );
    insta::assert_snapshot!(after, @r"
    /// A pair.
    struct Test(
        /// The first.
        i32,
        #[allow(unused)] i32,
    );
    enum E {
        V {
            /// Only.
            x: u8,
        },
    }
    fn f(t: Test) -> i32 { t.0 }
    ");

    let after = check("enum E {\n    /*caret*/V {\n        /// Only.\n        x: u8,\n    },\n}");
    assert_eq!(after, "enum E {\n    V(\n        /// Only.\n        u8,\n    ),\n}");

    let after = check("struct /*caret*/Test { /** Inline. */ a: i32, b: i32 }");
    assert_eq!(after, "struct Test(/** Inline. */ i32, i32);");
}

// ── Where clauses ──────────────────────────────────────────────────────

#[test]
fn single_line_where_clause() {
    let after = check(
        "struct /*caret*/S<T> where T: Copy, { a: T }\nfn f<T: Copy>(s: S<T>) -> T { s.a }",
    );
    assert_eq!(
        after,
        "struct S<T>(T) where T: Copy;\nfn f<T: Copy>(s: S<T>) -> T { s.0 }"
    );
}

#[test]
fn multi_line_where_clause() {
    let after = check("struct /*caret*/S<T>\nwhere\n    T: Copy,\n{\n    a: T,\n    b: u8,\n}");
    assert_eq!(after, "struct S<T>(T, u8)\nwhere\n    T: Copy;");
}

// ── Receivers ──────────────────────────────────────────────────────────

#[test]
fn generic_receiver_chains() {
    let after = check(
        r#"
struct /*caret*/Inner { v: u8 }
struct Wrap<T> { item: T }
impl<T> Wrap<T> {
    fn get(&self) -> &T {
        &self.item
    }
}
fn f(w: Wrap<Inner>) -> u8 {
    w.get().v + w.item.v
}
"#,
    );
    insta::assert_snapshot!(after, @r"
    struct Inner(u8);
    struct Wrap<T> { item: T }
    impl<T> Wrap<T> {
        fn get(&self) -> &T {
            &self.item
        }
    }
    fn f(w: Wrap<Inner>) -> u8 {
        w.get().0 + w.item.0
    }
    ");
}

#[test]
fn unwrapped_and_iterated_receivers() {
    let after = check(
        r#"
struct /*caret*/S { a: i32 }
fn f(o: Option<S>) -> i32 { o.unwrap().a }
fn g(v: &[S]) -> i32 { v.iter().map(|s| s.a).sum() }
"#,
    );
    insta::assert_snapshot!(after, @r"
    struct S(i32);
    fn f(o: Option<S>) -> i32 { o.unwrap().0 }
    fn g(v: &[S]) -> i32 { v.iter().map(|s| s.0).sum() }
    ");
}

#[test]
fn unknown_receiver_fails_the_whole_batch() {
    let err = check_err(
        "struct /*caret*/S { a: i32 }\ntrait Tr {}\nfn f(x: impl Tr, s: S) -> i32 { x.a + s.a }",
    );
    let diags = err.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "receiver of `.a` could not be resolved");
}

// ── Failures ───────────────────────────────────────────────────────────

#[test]
fn macro_usage_fails_the_whole_batch() {
    let err = check_err(
        "struct /*caret*/S { a: i32 }\nfn f(s: S) -> S {\n    println!(\"{}\", s.a);\n    S { a: 1 }\n}",
    );
    let diags = err.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].message, "`a` is used inside a macro invocation");

    let err = check_err("struct /*caret*/S { a: i32 }\nfn f() -> Vec<S> { vec![S { a: 1 }] }");
    assert_eq!(err.diagnostics()[0].message, "`S` is used inside a macro invocation");
}

#[test]
fn only_named_field_declarations_apply() {
    let err = check_err("struct /*caret*/S(i32);");
    assert_eq!(err, RefactorError::NotApplicable("`S` already has positional fields".to_string()));
    let err = check_err("struct /*caret*/S;");
    assert!(matches!(err, RefactorError::NotApplicable(_)));
    let err = check_err("fn /*caret*/f() {}");
    assert!(matches!(err, RefactorError::NotApplicable(_)));
}

#[test]
fn converting_twice_is_not_applicable() {
    let (ws, position) = workspace_with("struct /*caret*/S { a: i32 }\nfn f(s: S) -> i32 { s.a }");
    let config = ConvertConfig::default();
    let cancel = CancellationToken::new();
    run_convert_to_tuple(&ws, position, &config, &cancel).unwrap();
    assert_eq!(text_of(&ws, position.file), "struct S(i32);\nfn f(s: S) -> i32 { s.0 }");
    let err = run_convert_to_tuple(&ws, position, &config, &cancel).unwrap_err();
    assert!(matches!(err, RefactorError::NotApplicable(_)));
}

#[test]
fn cancellation_applies_nothing() {
    let (ws, position) = workspace_with("struct /*caret*/S { a: i32 }\nfn f(s: S) -> i32 { s.a }");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = run_convert_to_tuple(&ws, position, &ConvertConfig::default(), &cancel).unwrap_err();
    assert_eq!(err, RefactorError::Cancelled);
    assert_eq!(text_of(&ws, position.file), "struct S { a: i32 }\nfn f(s: S) -> i32 { s.a }");
}

#[test]
fn stale_changes_are_rejected() {
    let (ws, position) = workspace_with("struct /*caret*/S { a: i32 }");
    let change = {
        let snapshot = ws.snapshot();
        convert_to_tuple(
            &snapshot,
            position,
            &ConvertConfig::default(),
            &CancellationToken::new(),
        )
        .unwrap()
    };
    ws.set_text(position.file, "struct S { a: i32, b: i32 }").unwrap();
    assert!(matches!(
        ws.apply(&change),
        Err(RefactorError::StaleSnapshot { .. })
    ));
    assert_eq!(text_of(&ws, position.file), "struct S { a: i32, b: i32 }");
}

// ── Multiple files ─────────────────────────────────────────────────────

#[test]
fn edits_span_files() {
    let (decl, offset) = split_caret("pub struct /*caret*/P { pub x: i32 }");
    let ws = Workspace::new();
    let a = ws.set_file("a.rs", decl);
    let b = ws.set_file(
        "b.rs",
        "use crate::a::P;\nfn mk() -> P { P { x: 1 } }\nfn get(p: &P) -> i32 { p.x }",
    );
    let change = {
        let snapshot = ws.snapshot();
        convert_to_tuple(
            &snapshot,
            FilePosition { file: a, offset },
            &ConvertConfig::default(),
            &CancellationToken::new(),
        )
        .unwrap()
    };
    assert_eq!(change.file_edits.len(), 2);
    ws.apply(&change).unwrap();
    assert_eq!(text_of(&ws, a), "pub struct P(pub i32);");
    assert_eq!(
        text_of(&ws, b),
        "use crate::a::P;\nfn mk() -> P { P(1) }\nfn get(p: &P) -> i32 { p.0 }"
    );
}
