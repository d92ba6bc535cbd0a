//! Multi-character operator lexing.
//!
//! Gunderscript's punctuation is maximal-munch: `<` must be disambiguated
//! between `<-` (assign), `<->` (swap), `<=`, and bare `<`; `&` and `|` are
//! only valid doubled, since there are no bitwise operators.

use gsc_util::ErrorCode;

use crate::char_source::CharSource;
use crate::token::{Punct, Token, TokenKind};

use super::Lexer;

impl<'a, S: CharSource> Lexer<'a, S> {
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.bump();
        let punct = if self.peek() == Some('=') {
            self.bump();
            Punct::NotEq
        } else {
            Punct::Bang
        };
        Token::new(TokenKind::Punct(punct), self.token_start_line, self.token_start_column)
    }

    pub(crate) fn lex_less(&mut self) -> Token {
        self.bump();
        let punct = match self.peek() {
            Some('-') => {
                self.bump();
                if self.peek() == Some('>') {
                    self.bump();
                    Punct::Swap
                } else {
                    Punct::Assign
                }
            }
            Some('=') => {
                self.bump();
                Punct::LessEq
            }
            _ => Punct::Less,
        };
        Token::new(TokenKind::Punct(punct), self.token_start_line, self.token_start_column)
    }

    pub(crate) fn lex_greater(&mut self) -> Token {
        self.bump();
        let punct = if self.peek() == Some('=') {
            self.bump();
            Punct::GreaterEq
        } else {
            Punct::Greater
        };
        Token::new(TokenKind::Punct(punct), self.token_start_line, self.token_start_column)
    }

    pub(crate) fn lex_ampersand(&mut self) -> Token {
        self.bump();
        if self.peek() == Some('&') {
            self.bump();
            Token::new(
                TokenKind::Punct(Punct::AndAnd),
                self.token_start_line,
                self.token_start_column,
            )
        } else {
            self.report_error(ErrorCode::LexerUnexpectedChar, "expected '&&', found a single '&'");
            self.scan_token()
        }
    }

    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.bump();
        if self.peek() == Some('|') {
            self.bump();
            Token::new(
                TokenKind::Punct(Punct::OrOr),
                self.token_start_line,
                self.token_start_column,
            )
        } else {
            self.report_error(ErrorCode::LexerUnexpectedChar, "expected '||', found a single '|'");
            self.scan_token()
        }
    }
}
