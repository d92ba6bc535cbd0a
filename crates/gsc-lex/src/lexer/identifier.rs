//! Identifier, keyword, and access-modifier lexing.

use gsc_util::Symbol;

use crate::char_source::CharSource;
use crate::token::{keyword_from_ident, Token, TokenKind};
use crate::unicode::is_ascii_ident_continue;

use super::Lexer;

impl<'a, S: CharSource> Lexer<'a, S> {
    /// Lexes an identifier, then checks it against the reserved-word table.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !is_ascii_ident_continue(c) {
                break;
            }
            text.push(c);
            self.bump();
        }

        let kind = keyword_from_ident(&text).unwrap_or_else(|| TokenKind::Name(Symbol::intern(&text)));
        Token::new(kind, self.token_start_line, self.token_start_column)
    }
}

#[cfg(test)]
mod tests {
    use gsc_util::Handler;

    use crate::char_source::StringSource;
    use crate::token::{AccessModifier, Keyword, TokenKind};
    use crate::Lexer;

    fn lex_one(source: &str) -> TokenKind {
        let handler = Handler::new();
        let lexer = Lexer::new(StringSource::new(source), &handler);
        lexer.current_token().kind
    }

    #[test]
    fn test_simple_identifier() {
        assert_eq!(lex_one("foo"), TokenKind::Name(gsc_util::Symbol::intern("foo")));
    }

    #[test]
    fn test_identifier_with_underscore_and_digits() {
        assert_eq!(
            lex_one("foo_bar_123"),
            TokenKind::Name(gsc_util::Symbol::intern("foo_bar_123"))
        );
    }

    #[test]
    fn test_keyword_spec() {
        assert_eq!(lex_one("spec"), TokenKind::Keyword(Keyword::Spec));
    }

    #[test]
    fn test_keyword_package() {
        assert_eq!(lex_one("package"), TokenKind::Keyword(Keyword::Package));
    }

    #[test]
    fn test_keyword_depends() {
        assert_eq!(lex_one("depends"), TokenKind::Keyword(Keyword::Depends));
    }

    #[test]
    fn test_keyword_if_else() {
        assert_eq!(lex_one("if"), TokenKind::Keyword(Keyword::If));
        assert_eq!(lex_one("else"), TokenKind::Keyword(Keyword::Else));
    }

    #[test]
    fn test_keyword_while_for() {
        assert_eq!(lex_one("while"), TokenKind::Keyword(Keyword::While));
        assert_eq!(lex_one("for"), TokenKind::Keyword(Keyword::For));
    }

    #[test]
    fn test_keyword_return() {
        assert_eq!(lex_one("return"), TokenKind::Keyword(Keyword::Return));
    }

    #[test]
    fn test_keyword_get_set() {
        assert_eq!(lex_one("get"), TokenKind::Keyword(Keyword::Get));
        assert_eq!(lex_one("set"), TokenKind::Keyword(Keyword::Set));
    }

    #[test]
    fn test_keyword_construct_new_default() {
        assert_eq!(lex_one("construct"), TokenKind::Keyword(Keyword::Construct));
        assert_eq!(lex_one("new"), TokenKind::Keyword(Keyword::New));
        assert_eq!(lex_one("default"), TokenKind::Keyword(Keyword::Default));
    }

    #[test]
    fn test_keyword_true_false_this() {
        assert_eq!(lex_one("true"), TokenKind::Keyword(Keyword::True));
        assert_eq!(lex_one("false"), TokenKind::Keyword(Keyword::False));
        assert_eq!(lex_one("this"), TokenKind::Keyword(Keyword::This));
    }

    #[test]
    fn test_access_modifiers() {
        assert_eq!(
            lex_one("public"),
            TokenKind::AccessModifier(AccessModifier::Public)
        );
        assert_eq!(
            lex_one("concealed"),
            TokenKind::AccessModifier(AccessModifier::Concealed)
        );
        assert_eq!(
            lex_one("internal"),
            TokenKind::AccessModifier(AccessModifier::Internal)
        );
    }

    #[test]
    fn test_primitive_type_names_are_plain_identifiers() {
        assert_eq!(lex_one("int32"), TokenKind::Name(gsc_util::Symbol::intern("int32")));
        assert_eq!(lex_one("string"), TokenKind::Name(gsc_util::Symbol::intern("string")));
    }
}
