//! End-to-end tests for the `rustic` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Locate the rustic binary built by cargo.
fn rustic_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rustic"))
}

fn run(args: &[&str]) -> Output {
    Command::new(rustic_bin())
        .args(args)
        .output()
        .expect("failed to run rustic")
}

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn location(path: &Path, line: u32, col: u32) -> String {
    format!("{}:{}:{}", path.display(), line, col)
}

// ── convert-to-tuple ─────────────────────────────────────────────────

#[test]
fn convert_rewrites_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("src/main.rs");
    write(
        &main,
        "struct Test { pub a: usize, b: i32 }\n\nfn main() {\n    let x = Test { a: 0, b: 0 };\n    let Test { a, .. } = Test { a: 0, b: 0 };\n}\n",
    );

    let output = run(&["convert-to-tuple", &location(&main, 1, 8)]);
    assert!(
        output.status.success(),
        "rustic convert-to-tuple failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        read(&main),
        "struct Test(pub usize, i32);\n\nfn main() {\n    let x = Test(0, 0);\n    let Test(a, _) = Test(0, 0);\n}\n"
    );
}

#[test]
fn dry_run_prints_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.rs");
    let original = "struct S { a: i32 }\nfn f(s: S) -> i32 { s.a }\n";
    write(&main, original);

    let output = run(&["convert-to-tuple", "--dry-run", &location(&main, 1, 8)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("--- "), "{stdout}");
    assert!(
        stdout.contains("struct S(i32);\nfn f(s: S) -> i32 { s.0 }\n"),
        "{stdout}"
    );
    assert_eq!(read(&main), original);
}

#[test]
fn usages_across_the_root_are_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("src/a.rs");
    let b = dir.path().join("src/nested/b.rs");
    write(&a, "pub struct P { pub x: i32 }\n");
    write(
        &b,
        "use crate::a::P;\nfn mk() -> P { P { x: 1 } }\nfn get(p: &P) -> i32 { p.x }\n",
    );

    let root = dir.path().to_str().unwrap();
    let output = run(&["convert-to-tuple", "--root", root, &location(&a, 1, 12)]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(read(&a), "pub struct P(pub i32);\n");
    assert_eq!(
        read(&b),
        "use crate::a::P;\nfn mk() -> P { P(1) }\nfn get(p: &P) -> i32 { p.0 }\n"
    );
}

#[test]
fn config_file_in_root_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.rs");
    write(
        &dir.path().join("rustic.toml"),
        "[convert-to-tuple]\ncollapse-rest-min = 3\n",
    );
    write(
        &main,
        "struct S { a: u8, b: u8, c: u8, d: u8 }\nfn f(s: S) {\n    let S { a, b, .. } = s;\n}\n",
    );

    let output = run(&["convert-to-tuple", &location(&main, 1, 8)]);
    assert!(output.status.success());
    assert_eq!(
        read(&main),
        "struct S(u8, u8, u8, u8);\nfn f(s: S) {\n    let S(a, b, _, _) = s;\n}\n"
    );
}

#[test]
fn macro_usage_fails_and_leaves_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.rs");
    let original = "struct S { a: i32 }\nfn f(s: S) {\n    println!(\"{}\", s.a);\n}\n";
    write(&main, original);

    let output = run(&["convert-to-tuple", &location(&main, 1, 8)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[R0001] Error: usage cannot be converted"),
        "{stderr}"
    );
    assert!(
        stderr.contains("`a` is used inside a macro invocation"),
        "{stderr}"
    );
    assert!(!stderr.contains("\x1b["), "diagnostics should be colorless");
    assert_eq!(read(&main), original);
}

#[test]
fn not_applicable_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.rs");
    write(&main, "struct S(i32);\n");

    let output = run(&["convert-to-tuple", &location(&main, 1, 8)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: `S` already has positional fields"),
        "{stderr}"
    );
}

#[test]
fn malformed_location_is_rejected() {
    let output = run(&["convert-to-tuple", "main.rs:3"]);
    assert!(!output.status.success());
}

// ── symbols / lsp ────────────────────────────────────────────────────

#[test]
fn symbols_prints_the_outline() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("shapes.rs");
    write(
        &file,
        "struct Point { x: i32 }\nenum E { A { r: f64 }, B }\nfn area(p: &Point) -> f64 { 0.0 }\n",
    );

    let output = run(&["symbols", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "struct Point\n  field x: i32\nenum E\n  variant A\n    field r: f64\n  variant B\nfn area(p: &Point) -> f64\n"
    );
}

#[test]
fn lsp_subcommand_is_available() {
    let output = run(&["lsp", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LSP"), "{stdout}");
}
