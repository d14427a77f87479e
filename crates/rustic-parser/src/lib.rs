//! Rustic parser: event-based recursive descent producing a rowan CST.
//!
//! This crate turns the lossless token stream from `rustic-lexer` into a
//! concrete syntax tree using `rowan`. Whitespace and comments stay in the
//! tree as tokens, so every node's text range maps back to the exact source
//! bytes and rewrites can splice text around untouched trivia.
//!
//! Parsing never stops at the first problem: errors are collected and the
//! parser recovers, so a tree is always produced.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

use std::fmt::Write;

use rustic_lexer::Lexer;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxNodePtr, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

/// Result of parsing a source file.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) and every
/// lexical and syntax error encountered, sorted by position.
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The immutable green tree.
    pub fn green(&self) -> &rowan::GreenNode {
        &self.green
    }

    /// Parse errors encountered during parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a source file into a CST.
///
/// This is the main entry point for the parser. It lexes the source,
/// parses the token stream, and returns a [`Parse`] result containing
/// the syntax tree and any errors.
pub fn parse(source: &str) -> Parse {
    run(source, parser::parse_source_file)
}

/// Parse a single expression. The root is still a `SOURCE_FILE` node, with
/// the expression as its only child node.
pub fn parse_expr(source: &str) -> Parse {
    run(source, parser::expressions::parse_expr_root)
}

fn run(source: &str, entry: fn(&mut parser::Parser)) -> Parse {
    let (tokens, lex_errors) = Lexer::tokenize_with_errors(source);
    let mut p = parser::Parser::new(tokens, source);
    p.push_errors(
        lex_errors
            .into_iter()
            .map(|e| ParseError::new(e.to_string(), e.span)),
    );
    entry(&mut p);
    let (green, errors) = p.build_tree();
    Parse { green, errors }
}

/// Render a tree as indented `KIND@start..end` lines, tokens with their text.
///
/// Used by snapshot tests and the CLI's `--tree` output.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            rowan::WalkEvent::Enter(element) => {
                let range = element.text_range();
                let indent = "  ".repeat(depth);
                match element {
                    SyntaxElement::Node(n) => {
                        let _ = writeln!(
                            out,
                            "{indent}{:?}@{}..{}",
                            n.kind(),
                            u32::from(range.start()),
                            u32::from(range.end())
                        );
                    }
                    SyntaxElement::Token(t) => {
                        let _ = writeln!(
                            out,
                            "{indent}{:?}@{}..{} {:?}",
                            t.kind(),
                            u32::from(range.start()),
                            u32::from(range.end()),
                            t.text()
                        );
                    }
                }
                depth += 1;
            }
            rowan::WalkEvent::Leave(_) => depth -= 1,
        }
    }
    out
}
