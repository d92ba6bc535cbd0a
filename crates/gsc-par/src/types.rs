//! `type_expr := NAME ('<' type_expr (',' type_expr)* '>')?`
//!
//! A type expression is its own `Type` node: the base name is the node's
//! symbol payload, and each generic argument is itself a child `Type` node.
//! `List<int32>` and `Map<string, List<int32>>` both parse this way, with no
//! depth limit beyond the parser's general recursion guard.

use gsc_lex::{Punct, TokenKind};
use gsc_util::ErrorCode;

use crate::node::{Node, NodePayload, NodeRule};
use crate::Parser;

impl<'a, S: gsc_lex::CharSource> Parser<'a, S> {
    pub(crate) fn parse_type_expr(&mut self) -> Node {
        self.enter_recursion();
        let tok = self.current();
        let name = match tok.kind {
            TokenKind::Name(sym) => {
                self.bump();
                sym
            }
            _ => {
                self.error(
                    ErrorCode::ParserUnexpectedToken,
                    "expected a type name".to_string(),
                );
                self.exit_recursion();
                return Node::new(NodeRule::AnyType, tok.line, tok.column);
            }
        };

        let mut node = Node::with_payload(NodeRule::Type, tok.line, tok.column, NodePayload::Symbol(name));

        if self.eat_punct(Punct::Less) {
            loop {
                node.add_child(self.parse_type_expr());
                if !self.eat_punct(Punct::Comma) {
                    break;
                }
            }
            self.expect_punct(Punct::Greater);
        }

        self.exit_recursion();
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsc_lex::StringSource;
    use gsc_util::Handler;

    fn parse(src: &str) -> (Node, Handler) {
        let handler = Handler::new();
        let mut p = Parser::new(StringSource::new(src), &handler);
        let node = p.parse_type_expr();
        drop(p);
        (node, handler)
    }

    #[test]
    fn test_simple_type_has_no_children() {
        let (node, handler) = parse("int32");
        assert_eq!(node.rule(), NodeRule::Type);
        assert_eq!(node.symbol_value().as_str(), "int32");
        assert_eq!(node.child_count(), 0);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_generic_type_collects_one_argument() {
        let (node, _) = parse("List<int32>");
        assert_eq!(node.symbol_value().as_str(), "List");
        assert_eq!(node.child_count(), 1);
        assert_eq!(node.child(0).symbol_value().as_str(), "int32");
    }

    #[test]
    fn test_generic_type_collects_multiple_arguments() {
        let (node, _) = parse("Map<string, int32>");
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.child(0).symbol_value().as_str(), "string");
        assert_eq!(node.child(1).symbol_value().as_str(), "int32");
    }

    #[test]
    fn test_nested_generic_type() {
        let (node, _) = parse("List<List<int32>>");
        assert_eq!(node.child_count(), 1);
        let inner = node.child(0);
        assert_eq!(inner.symbol_value().as_str(), "List");
        assert_eq!(inner.child_count(), 1);
    }

    #[test]
    fn test_missing_name_reports_error() {
        let (node, handler) = parse("123");
        assert_eq!(node.rule(), NodeRule::AnyType);
        assert!(handler.has_errors());
    }
}
