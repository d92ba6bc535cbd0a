//! Statement parsing: blocks, `if`/`else`, `while`, `for`, `return`, and
//! bare assignment statements.
//!
//! `while (cond) block` is desugared straight into a `for` node with an
//! empty initializer and update, since the IR generator only ever needs to
//! handle one loop shape.

use gsc_lex::{Keyword, Punct, TokenKind};

use crate::node::{Node, NodeRule};
use crate::Parser;

impl<'a, S: gsc_lex::CharSource> Parser<'a, S> {
    pub(crate) fn parse_block(&mut self) -> Node {
        self.enter_recursion();
        let open = self.expect_punct(Punct::LBrace);
        let mut node = Node::new(NodeRule::Block, open.line, open.column);
        while !self.at_punct(Punct::RBrace) && !matches!(self.current().kind, TokenKind::Eof) {
            node.add_child(self.parse_statement());
        }
        self.expect_punct(Punct::RBrace);
        self.exit_recursion();
        node
    }

    fn parse_statement(&mut self) -> Node {
        match self.current().kind {
            TokenKind::Punct(Punct::LBrace) => self.parse_block(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            _ => self.parse_name_stmt(),
        }
    }

    fn parse_if(&mut self) -> Node {
        let tok = self.bump();
        self.expect_punct(Punct::LParen);
        let cond = self.parse_expr();
        self.expect_punct(Punct::RParen);
        let then_block = self.parse_block();

        let mut node = Node::new(NodeRule::If, tok.line, tok.column)
            .with_child(cond)
            .with_child(then_block);

        if matches!(self.current().kind, TokenKind::Keyword(Keyword::Else)) {
            self.bump();
            let else_branch = if matches!(self.current().kind, TokenKind::Keyword(Keyword::If)) {
                self.parse_if()
            } else {
                self.parse_block()
            };
            node.add_child(else_branch);
        }

        node
    }

    fn parse_while(&mut self) -> Node {
        let tok = self.bump();
        self.expect_punct(Punct::LParen);
        let cond = self.parse_expr();
        self.expect_punct(Punct::RParen);
        let body = self.parse_block();

        let init = Node::new(NodeRule::LoopInitialize, tok.line, tok.column);
        let condition = Node::new(NodeRule::LoopCondition, tok.line, tok.column).with_child(cond);
        let update = Node::new(NodeRule::LoopUpdate, tok.line, tok.column);

        Node::new(NodeRule::For, tok.line, tok.column)
            .with_child(init)
            .with_child(condition)
            .with_child(update)
            .with_child(body)
    }

    fn parse_for(&mut self) -> Node {
        let tok = self.bump();
        self.expect_punct(Punct::LParen);

        let init_line = self.current().line;
        let init_col = self.current().column;
        let mut init = Node::new(NodeRule::LoopInitialize, init_line, init_col);
        if !self.at_punct(Punct::Semicolon) {
            init.add_child(self.parse_expr());
        }
        self.expect_punct(Punct::Semicolon);

        let cond_line = self.current().line;
        let cond_col = self.current().column;
        let mut condition = Node::new(NodeRule::LoopCondition, cond_line, cond_col);
        if !self.at_punct(Punct::Semicolon) {
            condition.add_child(self.parse_expr());
        }
        self.expect_punct(Punct::Semicolon);

        let update_line = self.current().line;
        let update_col = self.current().column;
        let mut update = Node::new(NodeRule::LoopUpdate, update_line, update_col);
        if !self.at_punct(Punct::RParen) {
            update.add_child(self.parse_expr());
        }
        self.expect_punct(Punct::RParen);

        let body = self.parse_block();

        Node::new(NodeRule::For, tok.line, tok.column)
            .with_child(init)
            .with_child(condition)
            .with_child(update)
            .with_child(body)
    }

    fn parse_return(&mut self) -> Node {
        let tok = self.bump();
        let mut node = Node::new(NodeRule::Return, tok.line, tok.column);
        if !self.at_punct(Punct::Semicolon) {
            node.add_child(self.parse_expr());
        }
        self.expect_punct(Punct::Semicolon);
        node
    }

    fn parse_name_stmt(&mut self) -> Node {
        let expr = self.parse_expr();
        self.expect_punct(Punct::Semicolon);
        expr
    }
}
