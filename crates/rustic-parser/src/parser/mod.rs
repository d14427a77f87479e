//! Recursive-descent parser for the supported Rust subset.
//!
//! Grammar functions never touch the tree directly. They record a flat list
//! of events and [`Parser::build_tree`] replays that list into a rowan green
//! node once parsing is done.
//!
//! A grammar function brackets a node with `open()` and `close(kind)`; the
//! kind is only known at close time. Postfix forms such as method calls and
//! field accesses wrap a finished node with `open_before()`, which links the
//! inner node to its new parent instead of shifting events around.
//!
//! # Trivia
//!
//! Whitespace and comments are invisible to lookahead. They are attached to
//! the tree lazily: `open()` flushes pending trivia *before* starting the
//! node, so every node's text range begins at its first significant token
//! and ends at its last one. Edits computed from node ranges therefore never
//! swallow surrounding comments.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod patterns;
pub(crate) mod types;

use rustic_common::span::Span;
use rustic_common::token::Token;

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

#[derive(Debug)]
enum Event {
    /// Node start. Holds TOMBSTONE until `close()` fills in the kind.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    Close,
    /// One raw token, trivia included.
    Advance,
}

/// Handle to a node that is still open.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// Handle to a finished node, usable with [`Parser::open_before`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

/// Event-based parser over a lossless token stream.
pub(crate) struct Parser<'src> {
    /// Lexer output, trivia included, terminated by `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    events: Vec<Event>,
    source: &'src str,
    /// Errors never stop the parse.
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
        }
    }

    /// Kind of the next non-trivia token.
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Kind of the non-trivia token `n` positions ahead, or `EOF`.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|i| SyntaxKind::from(self.tokens[i].kind))
            .unwrap_or(SyntaxKind::EOF)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'src str {
        match self.nth_index(n) {
            Some(i) => {
                let span = self.tokens[i].span;
                &self.source[span.start as usize..span.end as usize]
            }
            None => "",
        }
    }

    pub(crate) fn current_text(&self) -> &'src str {
        self.nth_text(0)
    }

    /// Span of the next non-trivia token; empty at the end of input.
    pub(crate) fn current_span(&self) -> Span {
        match self.nth_index(0) {
            Some(i) => self.tokens[i].span,
            None => {
                let end = self.source.len() as u32;
                Span::new(end, end)
            }
        }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Whether the current identifier token spells `word` (contextual
    /// keywords such as `union`, `async`, `macro_rules`).
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.current_text() == word
    }

    /// Whether the current token is `first` immediately followed (no trivia)
    /// by `second`. Used to recognise `<<`, `>>` and `>>=`.
    pub(crate) fn at_joint(&self, first: SyntaxKind, second: SyntaxKind) -> bool {
        let (Some(a), Some(b)) = (self.nth_index(0), self.nth_index(1)) else {
            return false;
        };
        self.nth(0) == first && self.nth(1) == second && self.tokens[a].span.end == self.tokens[b].span.start
    }

    /// Token-stream index of the Nth significant token at or after `pos`.
    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut remaining = n;
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if token.kind.is_trivia() {
                continue;
            }
            if remaining == 0 {
                return Some(i);
            }
            remaining -= 1;
        }
        None
    }

    /// Index of the next significant token. Loops compare it before and
    /// after an iteration to guarantee progress; flushing trivia does not
    /// count as progress.
    pub(crate) fn position(&self) -> usize {
        self.nth_index(0).unwrap_or(self.tokens.len())
    }

    /// Begin a node. Every mark must reach `close()` or `abandon()`.
    pub(crate) fn open(&mut self) -> MarkOpened {
        // The root must own every token, so only nested nodes push their
        // leading trivia out to the parent.
        if !self.events.is_empty() {
            self.flush_trivia();
        }
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Begin a node that will enclose `completed`.
    ///
    /// The new Open event goes at the end of the list and `completed` points
    /// at it through `forward_parent`; `build_tree` resolves the link.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    /// Finish a node and give it its kind.
    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open {
            kind: slot_kind, ..
        } = &mut self.events[m.index]
        {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    /// Drop a node that turned out to be empty. When tokens were already
    /// consumed the node is kept as an `ERROR_NODE` instead.
    pub(crate) fn abandon(&mut self, m: MarkOpened) {
        if m.index + 1 == self.events.len() {
            self.events.pop();
        } else {
            self.close(m, SyntaxKind::ERROR_NODE);
        }
    }

    /// Step over the next non-trivia token and any trivia before it.
    pub(crate) fn advance(&mut self) {
        self.flush_trivia();
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// Report `message` and swallow one token into an `ERROR_NODE`.
    pub(crate) fn advance_with_error(&mut self, message: &str) {
        self.error(message);
        let m = self.open();
        self.advance();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    /// Like [`Parser::eat`], but a missing token is reported.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(&format!("expected {}", describe(kind)));
            false
        }
    }

    /// Consume a `kind` token if one is next.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn flush_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    pub(crate) fn error(&mut self, message: &str) {
        let span = self.current_span();
        // One error per position keeps cascades out of the diagnostics.
        if self.errors.last().is_some_and(|e| e.span == span) {
            return;
        }
        self.errors.push(ParseError::new(message, span));
    }

    /// Record a parse error pointing back at an opening delimiter.
    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        let span = self.current_span();
        self.errors
            .push(ParseError::with_related(message, span, related_msg, related_span));
    }

    /// Add lexer errors so callers see one list.
    pub(crate) fn push_errors(&mut self, errors: impl IntoIterator<Item = ParseError>) {
        self.errors.extend(errors);
    }

    /// Replay the events into a green tree. Errors come back sorted by
    /// position.
    ///
    /// An Open with a `forward_parent` starts its whole chain of enclosing
    /// nodes at once, outermost first. Those later Open events are turned
    /// into tombstones so the replay skips them when it gets there.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<SyntaxKind> = Vec::new();

        for i in 0..self.events.len() {
            match self.events[i] {
                Event::Open {
                    kind,
                    forward_parent: Some(_),
                } => {
                    forward_parents.clear();
                    forward_parents.push(kind);
                    let mut next = self.take_forward_parent(i);
                    while let Some(idx) = next {
                        if let Event::Open { kind, .. } = self.events[idx] {
                            forward_parents.push(kind);
                        }
                        next = self.take_forward_parent(idx);
                        if let Event::Open { kind, .. } = &mut self.events[idx] {
                            *kind = SyntaxKind::TOMBSTONE;
                        }
                    }
                    for &kind in forward_parents.iter().rev() {
                        if kind != SyntaxKind::TOMBSTONE {
                            builder.start_node(rowan::SyntaxKind(kind as u16));
                        }
                    }
                }
                Event::Open { kind, .. } => {
                    if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => {
                    builder.finish_node();
                }
                Event::Advance => {
                    if let Some(token) = self.tokens.get(token_pos) {
                        let syntax_kind = SyntaxKind::from(token.kind);
                        let text = &self.source[token.span.start as usize..token.span.end as usize];
                        builder.token(rowan::SyntaxKind(syntax_kind as u16), text);
                        token_pos += 1;
                    }
                }
            }
        }

        self.errors.sort_by_key(|e| e.span.start);
        (builder.finish(), self.errors)
    }

    fn take_forward_parent(&mut self, idx: usize) -> Option<usize> {
        match &mut self.events[idx] {
            Event::Open { forward_parent, .. } => forward_parent.take(),
            _ => None,
        }
    }
}

/// How a token kind reads in an `expected ...` message.
pub(crate) fn describe(kind: SyntaxKind) -> String {
    let text = match kind {
        SyntaxKind::L_PAREN => "`(`",
        SyntaxKind::R_PAREN => "`)`",
        SyntaxKind::L_BRACKET => "`[`",
        SyntaxKind::R_BRACKET => "`]`",
        SyntaxKind::L_BRACE => "`{`",
        SyntaxKind::R_BRACE => "`}`",
        SyntaxKind::COMMA => "`,`",
        SyntaxKind::COLON => "`:`",
        SyntaxKind::SEMICOLON => "`;`",
        SyntaxKind::EQ => "`=`",
        SyntaxKind::GT => "`>`",
        SyntaxKind::FAT_ARROW => "`=>`",
        SyntaxKind::IN_KW => "`in`",
        SyntaxKind::IDENT => "an identifier",
        other => return format!("{other:?}"),
    };
    text.to_string()
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// Parse a complete source file: inner attributes followed by items.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    items::inner_attributes(p);
    items::item_list_contents(p, SyntaxKind::EOF);

    // Trailing trivia and the zero-width EOF token belong to the root.
    while !p.at(SyntaxKind::EOF) {
        p.advance_with_error("expected an item");
    }
    p.advance();

    p.close(root, SyntaxKind::SOURCE_FILE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustic_lexer::Lexer;

    #[test]
    fn events_replay_into_a_lossless_tree() {
        let source = "let x = 5";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open();
        let binding = parser.open();
        parser.advance(); // let
        parser.advance(); // x
        parser.advance(); // =
        parser.advance(); // 5
        parser.close(binding, SyntaxKind::LET_STMT);
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty(), "{errors:?}");

        let file = crate::cst::SyntaxNode::new_root(green);
        assert_eq!(file.kind(), SyntaxKind::SOURCE_FILE);
        assert_eq!(file.text().to_string(), source);
        let kinds: Vec<_> = file.children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![SyntaxKind::LET_STMT]);
    }

    #[test]
    fn nodes_start_at_first_significant_token() {
        let source = "  /* c */ x";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open();
        let name = parser.open();
        parser.advance();
        parser.close(name, SyntaxKind::NAME_REF);
        parser.advance();
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, _) = parser.build_tree();
        let root_node = crate::cst::SyntaxNode::new_root(green);
        let name_ref = root_node.children().next().unwrap();
        assert_eq!(u32::from(name_ref.text_range().start()), 10);
        assert_eq!(name_ref.text().to_string(), "x");
    }

    #[test]
    fn lookahead_skips_trivia() {
        let source = "x // comment\n y";
        let tokens = Lexer::tokenize(source);
        let parser = Parser::new(tokens, source);

        assert_eq!(parser.current(), SyntaxKind::IDENT);
        assert_eq!(parser.nth(1), SyntaxKind::IDENT);
        assert_eq!(parser.nth_text(1), "y");
        assert_eq!(parser.nth(2), SyntaxKind::EOF);
    }

    #[test]
    fn joint_tokens() {
        let tokens = Lexer::tokenize("a >> b > > c");
        let mut parser = Parser::new(tokens, "a >> b > > c");
        parser.advance();
        assert!(parser.at_joint(SyntaxKind::GT, SyntaxKind::GT));
        parser.advance();
        parser.advance();
        parser.advance();
        assert!(!parser.at_joint(SyntaxKind::GT, SyntaxKind::GT));
    }

    #[test]
    fn expect_records_error_and_continues() {
        let source = "let x";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open();
        assert!(parser.expect(SyntaxKind::LET_KW));
        assert!(!parser.expect(SyntaxKind::LET_KW));
        assert_eq!(parser.errors.len(), 1);
        assert_eq!(parser.errors[0].message, "expected LET_KW");

        parser.advance(); // x
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (_green, errors) = parser.build_tree();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn open_before_wraps_completed_node() {
        let source = "f(42)";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open();
        let name = parser.open();
        parser.advance(); // f
        let name_closed = parser.close(name, SyntaxKind::PATH_EXPR);

        let call = parser.open_before(name_closed);
        parser.advance(); // (
        parser.advance(); // 42
        parser.advance(); // )
        let call_closed = parser.close(call, SyntaxKind::CALL_EXPR);

        // Second wrap makes a two-link chain.
        let outer = parser.open_before(call_closed);
        parser.advance(); // Eof
        parser.close(outer, SyntaxKind::EXPR_STMT);
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty());

        let file = crate::cst::SyntaxNode::new_root(green);
        let nesting: Vec<_> = std::iter::successors(file.first_child(), |n| n.first_child())
            .map(|n| n.kind())
            .collect();
        assert_eq!(
            nesting,
            vec![SyntaxKind::EXPR_STMT, SyntaxKind::CALL_EXPR, SyntaxKind::PATH_EXPR]
        );
    }

    #[test]
    fn abandon_removes_empty_node() {
        let source = "x";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open();
        let empty = parser.open();
        parser.abandon(empty);
        parser.advance();
        parser.advance();
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, _) = parser.build_tree();
        let root_node = crate::cst::SyntaxNode::new_root(green);
        assert_eq!(root_node.children().count(), 0);
    }
}
