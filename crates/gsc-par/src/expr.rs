//! Expression parsing, precedence-climbing from lowest to highest binding:
//! assign (`<-`, right-assoc) < logical-or < logical-and < comparison <
//! additive < multiplicative < member/call (left-assoc) < unary prefix <
//! primary.
//!
//! Unary `-` produces a `Sub` node with an `any-type` placeholder as its
//! left operand, so a negative literal never needs a typecast from its
//! neighbor: semantic analysis special-cases `any-type` to match anything.

use gsc_lex::{Keyword, Punct, TokenKind};
use gsc_util::ErrorCode;

use crate::node::{Node, NodePayload, NodeRule};
use crate::Parser;

impl<'a, S: gsc_lex::CharSource> Parser<'a, S> {
    pub(crate) fn parse_expr(&mut self) -> Node {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Node {
        let lhs = self.parse_logor();
        if self.eat_punct(Punct::Assign) {
            let rhs = self.parse_assign();
            let (line, column) = (lhs.line(), lhs.column());
            Node::new(NodeRule::Assign, line, column)
                .with_child(lhs)
                .with_child(rhs)
        } else {
            lhs
        }
    }

    fn parse_logor(&mut self) -> Node {
        let mut lhs = self.parse_logand();
        while self.eat_punct(Punct::OrOr) {
            let rhs = self.parse_logand();
            let (line, column) = (lhs.line(), lhs.column());
            lhs = Node::new(NodeRule::LogOr, line, column).with_child(lhs).with_child(rhs);
        }
        lhs
    }

    fn parse_logand(&mut self) -> Node {
        let mut lhs = self.parse_comparison();
        while self.eat_punct(Punct::AndAnd) {
            let rhs = self.parse_comparison();
            let (line, column) = (lhs.line(), lhs.column());
            lhs = Node::new(NodeRule::LogAnd, line, column).with_child(lhs).with_child(rhs);
        }
        lhs
    }

    fn parse_comparison(&mut self) -> Node {
        let mut lhs = self.parse_additive();
        loop {
            let rule = if self.eat_punct(Punct::Eq) {
                NodeRule::Equals
            } else if self.eat_punct(Punct::NotEq) {
                NodeRule::NotEquals
            } else if self.eat_punct(Punct::Less) {
                NodeRule::Less
            } else if self.eat_punct(Punct::LessEq) {
                NodeRule::LessEquals
            } else if self.eat_punct(Punct::Greater) {
                NodeRule::Greater
            } else if self.eat_punct(Punct::GreaterEq) {
                NodeRule::GreaterEquals
            } else {
                break;
            };
            let rhs = self.parse_additive();
            let (line, column) = (lhs.line(), lhs.column());
            lhs = Node::new(rule, line, column).with_child(lhs).with_child(rhs);
        }
        lhs
    }

    fn parse_additive(&mut self) -> Node {
        let mut lhs = self.parse_multiplicative();
        loop {
            let rule = if self.eat_punct(Punct::Plus) {
                NodeRule::Add
            } else if self.eat_punct(Punct::Minus) {
                NodeRule::Sub
            } else {
                break;
            };
            let rhs = self.parse_multiplicative();
            let (line, column) = (lhs.line(), lhs.column());
            lhs = Node::new(rule, line, column).with_child(lhs).with_child(rhs);
        }
        lhs
    }

    fn parse_multiplicative(&mut self) -> Node {
        let mut lhs = self.parse_member();
        loop {
            let rule = if self.eat_punct(Punct::Star) {
                NodeRule::Mul
            } else if self.eat_punct(Punct::Slash) {
                NodeRule::Div
            } else if self.eat_punct(Punct::Percent) {
                NodeRule::Mod
            } else {
                break;
            };
            let rhs = self.parse_member();
            let (line, column) = (lhs.line(), lhs.column());
            lhs = Node::new(rule, line, column).with_child(lhs).with_child(rhs);
        }
        lhs
    }

    /// Member access and calls share a precedence level: both are
    /// left-associative postfixes applied to whatever came before them.
    fn parse_member(&mut self) -> Node {
        let mut expr = self.parse_unary();
        loop {
            if self.eat_punct(Punct::Dot) {
                let tok = self.current();
                let name = match tok.kind {
                    TokenKind::Name(sym) => {
                        self.bump();
                        sym
                    }
                    _ => {
                        self.error(ErrorCode::ParserUnexpectedToken, "expected a member name");
                        continue;
                    }
                };
                let (line, column) = (expr.line(), expr.column());
                let name_node = Node::with_payload(NodeRule::Name, tok.line, tok.column, NodePayload::Symbol(name));
                expr = Node::new(NodeRule::Member, line, column)
                    .with_child(expr)
                    .with_child(name_node);
            } else if self.at_punct(Punct::LParen) {
                let (line, column) = (expr.line(), expr.column());
                let params = self.parse_call_parameters();
                expr = Node::new(NodeRule::Call, line, column)
                    .with_child(expr)
                    .with_child(params);
            } else {
                break;
            }
        }
        expr
    }

    fn parse_call_parameters(&mut self) -> Node {
        let open = self.expect_punct(Punct::LParen);
        let mut node = Node::new(NodeRule::CallParameters, open.line, open.column);
        if !self.at_punct(Punct::RParen) {
            loop {
                node.add_child(self.parse_expr());
                if !self.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen);
        node
    }

    fn parse_unary(&mut self) -> Node {
        let tok = self.current();
        if self.eat_punct(Punct::Minus) {
            self.enter_recursion();
            let operand = self.parse_unary();
            self.exit_recursion();
            let placeholder = Node::new(NodeRule::AnyType, tok.line, tok.column);
            return Node::new(NodeRule::Sub, tok.line, tok.column)
                .with_child(placeholder)
                .with_child(operand);
        }
        if self.eat_punct(Punct::Bang) {
            self.enter_recursion();
            let operand = self.parse_unary();
            self.exit_recursion();
            return Node::new(NodeRule::LogNot, tok.line, tok.column).with_child(operand);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Node {
        self.enter_recursion();
        let node = self.parse_primary_inner();
        self.exit_recursion();
        node
    }

    fn parse_primary_inner(&mut self) -> Node {
        let tok = self.current();
        match tok.kind {
            TokenKind::Keyword(Keyword::True) => {
                self.bump();
                Node::with_payload(NodeRule::BoolLiteral, tok.line, tok.column, NodePayload::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.bump();
                Node::with_payload(NodeRule::BoolLiteral, tok.line, tok.column, NodePayload::Bool(false))
            }
            TokenKind::Integer(v) => {
                self.bump();
                Node::with_payload(NodeRule::IntLiteral, tok.line, tok.column, NodePayload::Int(v))
            }
            TokenKind::Float(v) => {
                self.bump();
                Node::with_payload(NodeRule::FloatLiteral, tok.line, tok.column, NodePayload::Float(v))
            }
            TokenKind::Char(v) => {
                self.bump();
                Node::with_payload(NodeRule::CharLiteral, tok.line, tok.column, NodePayload::Char(v))
            }
            TokenKind::Str(sym) => {
                self.bump();
                Node::with_payload(NodeRule::StringLiteral, tok.line, tok.column, NodePayload::Symbol(sym))
            }
            TokenKind::Name(sym) => {
                self.bump();
                Node::with_payload(NodeRule::SymbolRef, tok.line, tok.column, NodePayload::Symbol(sym))
            }
            TokenKind::Keyword(Keyword::This) => {
                self.bump();
                Node::with_payload(
                    NodeRule::SymbolRef,
                    tok.line,
                    tok.column,
                    NodePayload::Symbol(gsc_util::Symbol::intern_known("this")),
                )
            }
            TokenKind::Keyword(Keyword::New) => {
                self.bump();
                let ty = self.parse_type_expr();
                let params = self.parse_call_parameters();
                Node::new(NodeRule::New, tok.line, tok.column).with_child(ty).with_child(params)
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.bump();
                self.expect_punct(Punct::LParen);
                let ty = self.parse_type_expr();
                self.expect_punct(Punct::RParen);
                Node::new(NodeRule::Default, tok.line, tok.column).with_child(ty)
            }
            TokenKind::Punct(Punct::LParen) => {
                self.bump();
                let inner = self.parse_expr();
                self.expect_punct(Punct::RParen);
                Node::new(NodeRule::Expression, tok.line, tok.column).with_child(inner)
            }
            _ => {
                self.error(
                    ErrorCode::ParserUnexpectedToken,
                    "expected an expression",
                );
                self.bump();
                Node::new(NodeRule::AnyType, tok.line, tok.column)
            }
        }
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
        let node = p.parse_expr();
        (node, handler)
    }

    #[test]
    fn test_assign_is_right_associative() {
        let (node, _) = parse("a <- b <- c");
        assert_eq!(node.rule(), NodeRule::Assign);
        assert_eq!(node.child(1).rule(), NodeRule::Assign);
    }

    #[test]
    fn test_additive_left_associative() {
        let (node, _) = parse("a - b - c");
        assert_eq!(node.rule(), NodeRule::Sub);
        assert_eq!(node.child(0).rule(), NodeRule::Sub);
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let (node, _) = parse("a + b * c");
        assert_eq!(node.rule(), NodeRule::Add);
        assert_eq!(node.child(1).rule(), NodeRule::Mul);
    }

    #[test]
    fn test_unary_minus_has_any_type_placeholder() {
        let (node, _) = parse("-5");
        assert_eq!(node.rule(), NodeRule::Sub);
        assert_eq!(node.child(0).rule(), NodeRule::AnyType);
        assert_eq!(node.child(1).int_value(), 5);
    }

    #[test]
    fn test_member_chain() {
        let (node, _) = parse("a.b.c");
        assert_eq!(node.rule(), NodeRule::Member);
        assert_eq!(node.child(1).symbol_value().as_str(), "c");
        assert_eq!(node.child(0).rule(), NodeRule::Member);
    }

    #[test]
    fn test_call_on_member() {
        let (node, _) = parse("a.b(1, 2)");
        assert_eq!(node.rule(), NodeRule::Call);
        assert_eq!(node.child(0).rule(), NodeRule::Member);
        assert_eq!(node.child(1).child_count(), 2);
    }

    #[test]
    fn test_new_with_generic_type() {
        let (node, _) = parse("new List<int32>()");
        assert_eq!(node.rule(), NodeRule::New);
        assert_eq!(node.child(0).rule(), NodeRule::Type);
        assert_eq!(node.child(0).symbol_value().as_str(), "List");
    }

    #[test]
    fn test_default_of_type() {
        let (node, _) = parse("default(int32)");
        assert_eq!(node.rule(), NodeRule::Default);
        assert_eq!(node.child(0).symbol_value().as_str(), "int32");
    }

    #[test]
    fn test_parenthesized_expression() {
        let (node, _) = parse("(a + b)");
        assert_eq!(node.rule(), NodeRule::Expression);
        assert_eq!(node.child(0).rule(), NodeRule::Add);
    }

    #[test]
    fn test_comparison_chain_reports_no_error() {
        let (_, handler) = parse("a < b");
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_this_parses_as_a_symbol_ref() {
        let (node, handler) = parse("this.X");
        assert_eq!(node.rule(), NodeRule::Member);
        assert_eq!(node.child(0).rule(), NodeRule::SymbolRef);
        assert_eq!(node.child(0).symbol_value().as_str(), "this");
        assert!(!handler.has_errors());
    }
}
