// Rustic lexer -- lossless tokenizer for the Rust subset the refactoring
// engine understands.

mod cursor;

use cursor::Cursor;
use rustic_common::error::{LexError, LexErrorKind};
use rustic_common::token::{keyword_from_str, Token, TokenKind};

/// Converts source text into a stream of tokens.
///
/// Unlike a compiler front-end, nothing is skipped: whitespace and comments
/// come out as trivia tokens, so concatenating every token's text reproduces
/// the input exactly. Malformed input becomes `Error` tokens and a
/// [`LexError`] is recorded; lexing never stops early.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Kind of the last non-trivia token, used to keep `t.0.1` as two
    /// integer indices instead of one float.
    prev_significant: Option<TokenKind>,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            prev_significant: None,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source into a `Vec<Token>`, ending with `Eof`.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize the entire source and also return the errors encountered.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        for token in lexer.by_ref() {
            tokens.push(token);
        }
        (tokens, lexer.errors)
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            c if c.is_whitespace() => {
                self.cursor.eat_while(char::is_whitespace);
                Token::new(TokenKind::Whitespace, start, self.cursor.pos())
            }

            // ── Single-character delimiters ───────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '@' => self.single_char_token(TokenKind::At, start),
            '?' => self.single_char_token(TokenKind::Question, start),
            '#' => self.single_char_token(TokenKind::Pound, start),
            '$' => self.single_char_token(TokenKind::Dollar, start),
            '~' => self.single_char_token(TokenKind::Tilde, start),
            // Never glued into `>>` or `>=`-after-generics; the parser
            // recombines adjacent tokens where it needs to.
            '>' => self.lex_gt(start),

            // ── Multi-character operators ─────────────────────────────────
            '=' => self.lex_eq(start),
            '!' => self.lex_with_assign(TokenKind::Bang, start, TokenKind::NotEq),
            '<' => self.lex_with_assign(TokenKind::Lt, start, TokenKind::LtEq),
            '&' => self.lex_doubled(TokenKind::Amp, TokenKind::AmpAmp, '&', start),
            '|' => self.lex_doubled(TokenKind::Pipe, TokenKind::PipePipe, '|', start),
            '-' => self.lex_minus(start),
            '+' | '*' | '%' | '^' => self.lex_arith(c, start),
            '/' => self.lex_slash(start),
            ':' => self.lex_colon(start),
            '.' => self.lex_dot(start),

            // ── Literals ──────────────────────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '"' => self.lex_string(start),
            '\'' => self.lex_quote(start),
            'r' if self.raw_string_ahead(1) => self.lex_raw_string(start),
            'b' if self.cursor.peek_nth(1) == Some('"') => {
                self.cursor.advance();
                self.lex_string(start)
            }
            'b' if self.cursor.peek_nth(1) == Some('r') && self.raw_string_ahead(2) => {
                self.cursor.advance();
                self.lex_raw_string(start)
            }
            'b' if self.cursor.peek_nth(1) == Some('\'') => {
                self.cursor.advance();
                self.lex_char_body(start)
            }

            // ── Identifiers and keywords ─────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.cursor.advance();
                self.error(LexErrorKind::UnexpectedCharacter(c), start)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// Record an error and produce an `Error` token covering everything
    /// consumed since `start`.
    fn error(&mut self, kind: LexErrorKind, start: u32) -> Token {
        let token = Token::new(TokenKind::Error, start, self.cursor.pos());
        self.errors.push(LexError::new(kind, token.span));
        token
    }

    // ── Operator lexing ──────────────────────────────────────────────────

    /// `=` -> `Eq`, `==` -> `EqEq`, `=>` -> `FatArrow`
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat('=') {
            TokenKind::EqEq
        } else if self.cursor.eat('>') {
            TokenKind::FatArrow
        } else {
            TokenKind::Eq
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat('=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// A one-character operator that becomes `with_eq` when followed by `=`.
    fn lex_with_assign(&mut self, plain: TokenKind, start: u32, with_eq: TokenKind) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat('=') { with_eq } else { plain };
        Token::new(kind, start, self.cursor.pos())
    }

    /// `&`/`|` family: single, doubled, or compound assignment.
    fn lex_doubled(
        &mut self,
        single: TokenKind,
        double: TokenKind,
        ch: char,
        start: u32,
    ) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat(ch) {
            double
        } else if self.cursor.eat('=') {
            TokenKind::CompoundAssign
        } else {
            single
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// `-` -> `Minus`, `->` -> `Arrow`, `-=` -> `CompoundAssign`
    fn lex_minus(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat('>') {
            TokenKind::Arrow
        } else if self.cursor.eat('=') {
            TokenKind::CompoundAssign
        } else {
            TokenKind::Minus
        };
        Token::new(kind, start, self.cursor.pos())
    }

    fn lex_arith(&mut self, c: char, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat('=') {
            TokenKind::CompoundAssign
        } else {
            match c {
                '+' => TokenKind::Plus,
                '*' => TokenKind::Star,
                '%' => TokenKind::Percent,
                _ => TokenKind::Caret,
            }
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// `/`, `/=`, or the start of a line or block comment.
    fn lex_slash(&mut self, start: u32) -> Token {
        match self.cursor.peek_nth(1) {
            Some('/') => {
                self.cursor.eat_while(|c| c != '\n');
                Token::new(TokenKind::Comment, start, self.cursor.pos())
            }
            Some('*') => self.lex_block_comment(start),
            _ => {
                self.cursor.advance();
                let kind = if self.cursor.eat('=') {
                    TokenKind::CompoundAssign
                } else {
                    TokenKind::Slash
                };
                Token::new(kind, start, self.cursor.pos())
            }
        }
    }

    /// Block comments nest, as in rustc.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.advance();
        let mut depth = 1u32;
        while depth > 0 {
            match self.cursor.advance() {
                None => return self.error(LexErrorKind::UnterminatedBlockComment, start),
                Some('/') if self.cursor.eat('*') => depth += 1,
                Some('*') if self.cursor.eat('/') => depth -= 1,
                Some(_) => {}
            }
        }
        Token::new(TokenKind::Comment, start, self.cursor.pos())
    }

    /// `:` -> `Colon`, `::` -> `ColonColon`
    fn lex_colon(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat(':') {
            TokenKind::ColonColon
        } else {
            TokenKind::Colon
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// `.` -> `Dot`, `..` -> `DotDot`, `..=` -> `DotDotEq`
    fn lex_dot(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat('.') {
            if self.cursor.eat('=') {
                TokenKind::DotDotEq
            } else {
                TokenKind::DotDot
            }
        } else {
            TokenKind::Dot
        };
        Token::new(kind, start, self.cursor.pos())
    }

    // ── Number literals ──────────────────────────────────────────────────

    fn lex_number(&mut self, start: u32) -> Token {
        let radix_prefix = self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_nth(1), Some('x' | 'o' | 'b'));
        if radix_prefix {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.eat_suffix();
            return Token::new(TokenKind::IntLiteral, start, self.cursor.pos());
        }

        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
        let mut is_float = false;

        // `1.5` is a float; `1..2`, `1.max(2)` and `t.0.1` are not.
        let after_field_dot = self.prev_significant == Some(TokenKind::Dot);
        if !after_field_dot
            && self.cursor.peek() == Some('.')
            && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
            is_float = true;
        }

        if !after_field_dot && matches!(self.cursor.peek(), Some('e' | 'E')) {
            let exponent_digits = match self.cursor.peek_nth(1) {
                Some('+' | '-') => self.cursor.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if exponent_digits {
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+' | '-')) {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
                is_float = true;
            }
        }

        if self.cursor.peek() == Some('f') {
            is_float = true;
        }
        self.eat_suffix();

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        Token::new(kind, start, self.cursor.pos())
    }

    /// Type suffix such as `u8`, `i64`, `f32`, `usize`.
    fn eat_suffix(&mut self) {
        if self.cursor.peek().is_some_and(is_ident_start) {
            self.cursor.eat_while(is_ident_continue);
        }
    }

    // ── String and character literals ────────────────────────────────────

    /// Lex a (byte) string starting at the opening `"`.
    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None => return self.error(LexErrorKind::UnterminatedString, start),
                Some('"') => break,
                Some('\\') => {
                    self.cursor.advance();
                }
                Some(_) => {}
            }
        }
        self.eat_suffix();
        Token::new(TokenKind::StringLiteral, start, self.cursor.pos())
    }

    /// Whether `r"` or `r#...#"` starts `offset` characters ahead of the
    /// opening `r`'s successor.
    fn raw_string_ahead(&self, offset: usize) -> bool {
        let mut n = offset;
        while self.cursor.peek_nth(n) == Some('#') {
            n += 1;
        }
        self.cursor.peek_nth(n) == Some('"')
    }

    /// Lex `r"..."` / `r#"..."#` with the cursor on the `r`.
    fn lex_raw_string(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let mut hashes = 0usize;
        while self.cursor.eat('#') {
            hashes += 1;
        }
        self.cursor.advance();
        loop {
            match self.cursor.advance() {
                None => return self.error(LexErrorKind::UnterminatedString, start),
                Some('"') => {
                    let closing = (0..hashes).all(|i| self.cursor.peek_nth(i) == Some('#'));
                    if closing {
                        for _ in 0..hashes {
                            self.cursor.advance();
                        }
                        break;
                    }
                }
                Some(_) => {}
            }
        }
        Token::new(TokenKind::StringLiteral, start, self.cursor.pos())
    }

    /// A `'` starts either a lifetime/label or a character literal.
    fn lex_quote(&mut self, start: u32) -> Token {
        let next = self.cursor.peek_nth(1);
        let is_lifetime =
            next.is_some_and(is_ident_start) && self.cursor.peek_nth(2) != Some('\'');
        if is_lifetime {
            self.cursor.advance();
            self.cursor.eat_while(is_ident_continue);
            return Token::new(TokenKind::Lifetime, start, self.cursor.pos());
        }
        self.lex_char_body(start)
    }

    /// Lex a character literal with the cursor on the opening `'`.
    fn lex_char_body(&mut self, start: u32) -> Token {
        self.cursor.advance();
        match self.cursor.advance() {
            None | Some('\n') => return self.error(LexErrorKind::UnterminatedChar, start),
            Some('\\') => {
                // `\u{...}` spans several characters; everything else is one.
                if self.cursor.advance() == Some('u') && self.cursor.peek() == Some('{') {
                    self.cursor.eat_while(|c| c != '}' && c != '\'' && c != '\n');
                    self.cursor.eat('}');
                }
            }
            Some(_) => {}
        }
        if !self.cursor.eat('\'') {
            return self.error(LexErrorKind::UnterminatedChar, start);
        }
        Token::new(TokenKind::CharLiteral, start, self.cursor.pos())
    }

    // ── Identifiers and keywords ─────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());

        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, self.cursor.pos())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }

        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        } else if !token.kind.is_trivia() {
            self.prev_significant = Some(token.kind);
        }
        Some(token)
    }
}

/// Whether a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Whether a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn lex_struct_declaration() {
        assert_eq!(
            kinds("pub struct S { a: i32 }"),
            vec![
                TokenKind::Pub,
                TokenKind::Struct,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lossless_concatenation() {
        let source = "fn f() {\n    // hi\n    let x = /* c */ s.a;\n}\n";
        let text: String = Lexer::tokenize(source)
            .iter()
            .map(|t| &source[t.span.start as usize..t.span.end as usize])
            .collect();
        assert_eq!(text, source);
    }

    #[test]
    fn tuple_index_chain_is_not_float() {
        assert_eq!(
            kinds("t.0.1"),
            vec![
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::IntLiteral,
                TokenKind::Dot,
                TokenKind::IntLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn float_and_range() {
        assert_eq!(
            kinds("1.5 1..2 2f32 1e3"),
            vec![
                TokenKind::FloatLiteral,
                TokenKind::IntLiteral,
                TokenKind::DotDot,
                TokenKind::IntLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lifetime_versus_char() {
        assert_eq!(
            kinds("'a 'b' '\\n' 'static"),
            vec![
                TokenKind::Lifetime,
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::Lifetime,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn generic_close_stays_single() {
        assert_eq!(
            kinds("Vec<Vec<u8>>"),
            vec![
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::Gt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn raw_and_byte_strings() {
        assert_eq!(
            kinds(r###"r#"a"b"# b"x" br"y" b'z'"###),
            vec![
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::StringLiteral,
                TokenKind::CharLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_block_comment() {
        let tokens = Lexer::tokenize("/* a /* b */ c */x");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].span.end, 17);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn errors_are_collected() {
        let (tokens, errors) = Lexer::tokenize_with_errors("let s = \"open");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn unexpected_character() {
        let (tokens, errors) = Lexer::tokenize_with_errors("a \u{00A7} b");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
        assert_eq!(
            errors[0].kind,
            LexErrorKind::UnexpectedCharacter('\u{00A7}')
        );
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            kinds("a += 1; b -> c => d :: e"),
            vec![
                TokenKind::Ident,
                TokenKind::CompoundAssign,
                TokenKind::IntLiteral,
                TokenKind::Semicolon,
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::FatArrow,
                TokenKind::Ident,
                TokenKind::ColonColon,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }
}
