//! String and character literal lexing.
//!
//! The escape set is closed: `\' \" \? \\ \b \n \t \r \v \f`. Anything else
//! after a `\` is a bad-escape error; an unclosed quote or a bare newline
//! inside the literal aborts it as unterminated.

use gsc_util::{ErrorCode, Symbol};

use crate::char_source::CharSource;
use crate::token::{Token, TokenKind};

use super::Lexer;

impl<'a, S: CharSource> Lexer<'a, S> {
    pub(crate) fn lex_string(&mut self) -> Token {
        self.bump();

        let mut content = String::new();
        loop {
            let Some(c) = self.peek() else {
                self.report_error(
                    ErrorCode::LexerUnterminatedString,
                    "unterminated string literal",
                );
                break;
            };

            if c == '"' {
                self.bump();
                break;
            }
            if c == '\n' {
                self.report_error(
                    ErrorCode::LexerUnterminatedString,
                    "unterminated string literal",
                );
                break;
            }
            if c == '\\' {
                self.bump();
                if let Some(escaped) = self.parse_escape() {
                    content.push(escaped);
                }
            } else {
                content.push(c);
                self.bump();
            }
        }

        Token::new(
            TokenKind::Str(Symbol::intern(&content)),
            self.token_start_line,
            self.token_start_column,
        )
    }

    pub(crate) fn lex_char(&mut self) -> Token {
        self.bump();

        let Some(c) = self.peek() else {
            self.report_error(
                ErrorCode::LexerInvalidCharLiteral,
                "unterminated character literal",
            );
            return Token::new(
                TokenKind::Char('\0'),
                self.token_start_line,
                self.token_start_column,
            );
        };

        let value = if c == '\\' {
            self.bump();
            self.parse_escape().unwrap_or('\0')
        } else {
            if c == '\'' || c == '\n' {
                self.report_error(ErrorCode::LexerInvalidCharLiteral, "empty character literal");
                return Token::new(
                    TokenKind::Char('\0'),
                    self.token_start_line,
                    self.token_start_column,
                );
            }
            self.bump();
            c
        };

        match self.peek() {
            Some('\'') => {
                self.bump();
            }
            _ => {
                self.report_error(
                    ErrorCode::LexerInvalidCharLiteral,
                    "character literal contains more than one character",
                );
                while let Some(c) = self.peek() {
                    if c == '\'' || c == '\n' {
                        break;
                    }
                    self.bump();
                }
                if self.peek() == Some('\'') {
                    self.bump();
                }
            }
        }

        Token::new(
            TokenKind::Char(value),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Parses the character following a `\` against the closed escape set
    /// `\' \" \? \\ \b \n \t \r \v \f`.
    fn parse_escape(&mut self) -> Option<char> {
        let Some(c) = self.peek() else {
            self.report_error(ErrorCode::LexerInvalidEscape, "unterminated escape sequence");
            return None;
        };
        self.bump();

        match c {
            '\'' => Some('\''),
            '"' => Some('"'),
            '?' => Some('?'),
            '\\' => Some('\\'),
            'b' => Some('\u{0008}'),
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'v' => Some('\u{000B}'),
            'f' => Some('\u{000C}'),
            _ => {
                self.report_error(
                    ErrorCode::LexerInvalidEscape,
                    format!("unrecognized escape sequence '\\{}'", c),
                );
                None
            }
        }
    }
}
