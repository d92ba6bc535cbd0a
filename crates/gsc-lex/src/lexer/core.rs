//! The main `Lexer` struct: dispatch, position tracking, and the
//! two-token-lookahead contract the parser is built against.

use gsc_util::{DiagnosticBuilder, ErrorCode, Handler, Span};

use crate::char_source::CharSource;
use crate::token::{Punct, Token, TokenKind};
use crate::unicode::is_ascii_ident_start;

/// Transforms a [`CharSource`] into a stream of [`Token`]s.
///
/// The lexer always keeps the current token and one token of lookahead
/// buffered, matching the `current_token`/`next_token`/`advance_next`
/// contract the parser is written against.
pub struct Lexer<'a, S: CharSource> {
    source: S,
    pub(crate) handler: &'a Handler,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) bom_checked: bool,
    pub(crate) token_start_line: u32,
    pub(crate) token_start_column: u32,
    buf0: Option<char>,
    buf1: Option<char>,
    current: Token,
    lookahead: Token,
}

impl<'a, S: CharSource> Lexer<'a, S> {
    /// Builds a lexer over `source`, priming both the current token and its
    /// one-token lookahead.
    pub fn new(source: S, handler: &'a Handler) -> Self {
        let mut lexer = Self {
            source,
            handler,
            line: 1,
            column: 1,
            bom_checked: false,
            token_start_line: 1,
            token_start_column: 1,
            buf0: None,
            buf1: None,
            current: Token::eof(1, 1),
            lookahead: Token::eof(1, 1),
        };
        lexer.buf0 = lexer.pull();
        lexer.buf1 = lexer.pull();
        lexer.current = lexer.scan_token();
        lexer.lookahead = lexer.scan_token();
        lexer
    }

    fn pull(&mut self) -> Option<char> {
        match self.source.advance() {
            Ok(c) => c,
            Err(err) => {
                self.report_error(ErrorCode::LexerUnexpectedChar, err.to_string());
                None
            }
        }
    }

    /// The token the parser is currently positioned on.
    pub fn current_token(&self) -> Token {
        self.current
    }

    /// The token one position ahead of `current_token`.
    pub fn next_token(&self) -> Token {
        self.lookahead
    }

    /// Shifts the lookahead window forward by one token.
    pub fn advance_next(&mut self) {
        self.current = self.lookahead;
        self.lookahead = self.scan_token();
    }

    /// Consumes the current lookahead character and advances position
    /// tracking (line/column) accordingly.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.buf0;
        self.buf0 = self.buf1;
        self.buf1 = self.pull();
        if let Some(c) = c {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        c
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.buf0
    }

    pub(crate) fn peek_second(&self) -> Option<char> {
        self.buf1
    }

    pub(crate) fn has_next(&self) -> bool {
        self.buf0.is_some()
    }

    /// Builds a single-character punctuation token and consumes that
    /// character.
    pub(crate) fn single(&mut self, punct: Punct) -> Token {
        self.bump();
        Token::new(
            TokenKind::Punct(punct),
            self.token_start_line,
            self.token_start_column,
        )
    }

    pub(crate) fn report_error(&self, code: ErrorCode, message: impl Into<String>) {
        DiagnosticBuilder::error(message.into())
            .code(code)
            .span(Span::point(self.token_start_line, self.token_start_column))
            .emit(self.handler);
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.token_start_line = self.line;
        self.token_start_column = self.column;

        let Some(c) = self.peek() else {
            return Token::eof(self.line, self.column);
        };

        match c {
            '(' => self.single(Punct::LParen),
            ')' => self.single(Punct::RParen),
            '{' => self.single(Punct::LBrace),
            '}' => self.single(Punct::RBrace),
            '[' => self.single(Punct::LBracket),
            ']' => self.single(Punct::RBracket),
            ',' => self.single(Punct::Comma),
            ';' => self.single(Punct::Semicolon),
            ':' => self.single(Punct::Colon),
            '.' => self.single(Punct::Dot),
            '+' => self.single(Punct::Plus),
            '-' => self.single(Punct::Minus),
            '*' => self.single(Punct::Star),
            '/' => self.single(Punct::Slash),
            '%' => self.single(Punct::Percent),
            '=' => self.single(Punct::Eq),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ascii_ident_start(c) => self.lex_identifier(),
            _ => {
                self.bump();
                self.report_error(
                    ErrorCode::LexerUnexpectedChar,
                    format!("unexpected character '{}'", c),
                );
                self.scan_token()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_source::StringSource;
    use crate::token::TokenKind;

    fn tokens(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut lexer = Lexer::new(StringSource::new(source), &handler);
        let mut out = Vec::new();
        loop {
            let tok = lexer.current_token();
            if tok.is_eof() {
                out.push(tok);
                break;
            }
            out.push(tok);
            lexer.advance_next();
        }
        out
    }

    #[test]
    fn test_empty_source() {
        let toks = tokens("");
        assert_eq!(toks.len(), 1);
        assert!(toks[0].is_eof());
    }

    #[test]
    fn test_lookahead_contract() {
        let handler = Handler::new();
        let mut lexer = Lexer::new(StringSource::new("+ -"), &handler);
        assert_eq!(lexer.current_token().kind, TokenKind::Punct(Punct::Plus));
        assert_eq!(lexer.next_token().kind, TokenKind::Punct(Punct::Minus));
        lexer.advance_next();
        assert_eq!(lexer.current_token().kind, TokenKind::Punct(Punct::Minus));
        assert!(lexer.next_token().is_eof());
    }

    #[test]
    fn test_delimiters() {
        let toks = tokens("(){}[],;:.");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Punct(Punct::LParen),
                TokenKind::Punct(Punct::RParen),
                TokenKind::Punct(Punct::LBrace),
                TokenKind::Punct(Punct::RBrace),
                TokenKind::Punct(Punct::LBracket),
                TokenKind::Punct(Punct::RBracket),
                TokenKind::Punct(Punct::Comma),
                TokenKind::Punct(Punct::Semicolon),
                TokenKind::Punct(Punct::Colon),
                TokenKind::Punct(Punct::Dot),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_char_reports_error_and_resyncs() {
        let handler = Handler::new();
        let mut lexer = Lexer::new(StringSource::new("@+"), &handler);
        assert!(handler.has_errors());
        assert_eq!(lexer.current_token().kind, TokenKind::Punct(Punct::Plus));
    }

    #[test]
    fn test_line_column_tracking() {
        let handler = Handler::new();
        let lexer = Lexer::new(StringSource::new("\n\n  +"), &handler);
        let tok = lexer.current_token();
        assert_eq!(tok.line, 3);
        assert_eq!(tok.column, 3);
    }
}
