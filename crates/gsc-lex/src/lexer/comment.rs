//! Whitespace and comment skipping.
//!
//! Line comments run `//` to end of line; block comments run `/* ... */`
//! and nest, so a `/*` inside a block comment increases the depth instead of
//! being ignored.

use gsc_util::ErrorCode;

use crate::char_source::CharSource;

use super::Lexer;

const MAX_COMMENT_DEPTH: u32 = 100;

impl<'a, S: CharSource> Lexer<'a, S> {
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.peek() == Some('\u{FEFF}') {
                self.bump();
            }
        }

        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.bump();
                }
                Some('/') => {
                    if self.peek_second() == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_second() == Some('*') {
                        self.skip_block_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.bump();
        self.bump();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        self.bump();
        self.bump();
        let mut depth = 1u32;

        while depth > 0 {
            match self.peek() {
                None => {
                    self.report_error(ErrorCode::LexerUnexpectedChar, "unterminated block comment");
                    return;
                }
                Some('/') if self.peek_second() == Some('*') => {
                    self.bump();
                    self.bump();
                    depth += 1;
                    if depth > MAX_COMMENT_DEPTH {
                        self.report_error(ErrorCode::LexerUnexpectedChar, "block comment nesting too deep");
                        return;
                    }
                }
                Some('*') if self.peek_second() == Some('/') => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }
}
