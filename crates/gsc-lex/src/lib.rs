//! Lexical analysis for Gunderscript source.
//!
//! The lexer sits between a [`CharSource`] and the parser: it exposes a
//! two-token window (`current_token`/`next_token`) that the parser advances
//! with `advance_next`, rather than handing back an iterator of tokens.

pub mod char_source;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use char_source::{CharSource, FileSource, SourceError, StringSource};
pub use lexer::Lexer;
pub use token::{AccessModifier, Keyword, Punct, Token, TokenKind};
