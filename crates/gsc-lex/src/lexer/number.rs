//! Numeric literal lexing.
//!
//! Gunderscript numbers are a greedy run of digits with at most one `.` —
//! there is no hex/octal/binary prefix and no exponent notation.

use gsc_util::ErrorCode;

use crate::char_source::CharSource;
use crate::token::{Token, TokenKind};

use super::Lexer;

impl<'a, S: CharSource> Lexer<'a, S> {
    pub(crate) fn lex_number(&mut self) -> Token {
        let mut text = String::new();
        let mut dot_seen = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else if c == '.' && !dot_seen {
                dot_seen = true;
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }

        let kind = if dot_seen {
            match text.parse::<f64>() {
                Ok(value) => TokenKind::Float(value),
                Err(_) => {
                    self.report_error(
                        ErrorCode::LexerInvalidNumberLiteral,
                        format!("invalid floating point literal '{}'", text),
                    );
                    TokenKind::Float(0.0)
                }
            }
        } else {
            match text.parse::<i32>() {
                Ok(value) => TokenKind::Integer(value),
                Err(_) => {
                    self.report_error(
                        ErrorCode::LexerInvalidNumberLiteral,
                        format!("integer literal '{}' out of range", text),
                    );
                    TokenKind::Integer(0)
                }
            }
        };

        Token::new(kind, self.token_start_line, self.token_start_column)
    }
}
