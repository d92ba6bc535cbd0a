//! Recursive-descent parser for Gunderscript source.
//!
//! The parser drives a [`gsc_lex::Lexer`] through its two-token window
//! (`current`/`peek_next`/`bump`) rather than working off a pre-lexed
//! token vector, and builds a homogeneous [`Node`] tree: see [`node`] for
//! the AST shape and [`symbol`] for what a node's symbol annotation holds
//! once the semantic pass has run.

pub mod expr;
pub mod items;
pub mod node;
pub mod stmt;
pub mod symbol;
pub mod types;

pub use node::{Node, NodePayload, NodeRule};
pub use symbol::{
    FunctionKind, FunctionSymbol, GenericKind, GenericTypeSymbol, PrimitiveType, SemSymbol,
    TypeFormat, TypeSymbol,
};

use gsc_lex::{CharSource, Lexer, Punct, Token, TokenKind};
use gsc_util::{DiagnosticBuilder, ErrorCode, Handler, Span};

/// Maximum nesting depth for recursive grammar productions (expressions,
/// nested blocks, generic type arguments). Guards against stack overflow on
/// malicious or accidentally-unbalanced input.
pub const MAX_RECURSION_DEPTH: u32 = 200;

pub struct Parser<'a, S: CharSource> {
    lexer: Lexer<'a, S>,
    handler: &'a Handler,
    depth: u32,
}

impl<'a, S: CharSource> Parser<'a, S> {
    pub fn new(source: S, handler: &'a Handler) -> Self {
        Parser {
            lexer: Lexer::new(source, handler),
            handler,
            depth: 0,
        }
    }

    /// Parses a complete module: the top-level entry point.
    pub fn parse(&mut self) -> Node {
        self.parse_module()
    }

    pub(crate) fn current(&self) -> Token {
        self.lexer.current_token()
    }

    pub(crate) fn peek_next(&self) -> Token {
        self.lexer.next_token()
    }

    pub(crate) fn bump(&mut self) -> Token {
        let tok = self.current();
        self.lexer.advance_next();
        tok
    }

    pub(crate) fn at_punct(&self, punct: Punct) -> bool {
        matches!(self.current().kind, TokenKind::Punct(p) if p == punct)
    }

    pub(crate) fn eat_punct(&mut self, punct: Punct) -> bool {
        if self.at_punct(punct) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes `punct`, or reports [`ErrorCode::ParserExpectedToken`] at
    /// the current token and returns it unconsumed.
    pub(crate) fn expect_punct(&mut self, punct: Punct) -> Token {
        if self.at_punct(punct) {
            self.bump()
        } else {
            let tok = self.current();
            self.error(
                ErrorCode::ParserExpectedToken,
                format!("expected '{}', found {}", punct.as_str(), describe(tok)),
            );
            tok
        }
    }

    pub(crate) fn enter_recursion(&mut self) {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            self.error(
                ErrorCode::ParserUnexpectedToken,
                "expression or block nesting exceeds the maximum recursion depth",
            );
            panic!("gsc-par: max recursion depth exceeded");
        }
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn error(&self, code: ErrorCode, message: impl Into<String>) {
        let tok = self.current();
        DiagnosticBuilder::error(message.into())
            .code(code)
            .span(Span::point(tok.line, tok.column))
            .emit(self.handler);
    }

    /// Skips tokens until a statement/declaration boundary (`;`, `{`, `}`)
    /// or end of file, so that one syntax error does not cascade into
    /// spurious follow-on errors.
    pub(crate) fn recover_to_sync_point(&mut self) {
        loop {
            match self.current().kind {
                TokenKind::Eof => return,
                TokenKind::Punct(Punct::Semicolon) => {
                    self.bump();
                    return;
                }
                TokenKind::Punct(Punct::LBrace) | TokenKind::Punct(Punct::RBrace) => {
                    self.bump();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }
}

fn describe(tok: Token) -> String {
    match tok.kind {
        TokenKind::Eof => "end of file".to_string(),
        TokenKind::Name(sym) => format!("'{}'", sym.as_str()),
        TokenKind::Integer(n) => format!("'{}'", n),
        TokenKind::Float(n) => format!("'{}'", n),
        TokenKind::Str(_) => "a string literal".to_string(),
        TokenKind::Char(c) => format!("'{}'", c),
        TokenKind::Keyword(k) => format!("'{}'", k.as_str()),
        TokenKind::AccessModifier(a) => format!("'{}'", a.as_str()),
        TokenKind::Punct(p) => format!("'{}'", p.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsc_lex::StringSource;

    fn parser(src: &str, handler: &Handler) -> Parser<'_, StringSource> {
        Parser::new(StringSource::new(src), handler)
    }

    #[test]
    fn test_bump_advances_the_token_window() {
        let handler = Handler::new();
        let mut p = parser("package \"foo\";", &handler);
        assert!(matches!(p.current().kind, TokenKind::Keyword(gsc_lex::Keyword::Package)));
        p.bump();
        assert!(matches!(p.current().kind, TokenKind::Str(_)));
    }

    #[test]
    fn test_expect_punct_reports_error_on_mismatch() {
        let handler = Handler::new();
        let mut p = parser("package \"foo\"", &handler);
        p.bump();
        p.bump();
        p.expect_punct(Punct::Semicolon);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_recover_to_sync_point_stops_at_semicolon() {
        let handler = Handler::new();
        let mut p = parser("garbage garbage ; next", &handler);
        p.recover_to_sync_point();
        assert!(matches!(p.current().kind, TokenKind::Name(_)));
    }
}
