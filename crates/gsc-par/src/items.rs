//! Module-level parsing: the package header, `depends` declarations, and
//! the `spec`/function declarations that make up a module's body.
//!
//! ```text
//! module            := PACKAGE string SEMI depends* spec_or_function*
//! depends           := DEPENDS string SEMI
//! spec_or_function  := access spec_def | function_def
//! spec_def          := access SPEC type_expr LBRACE (function_def | property)* RBRACE
//! property          := type_expr name LBRACE prop_fn? prop_fn? RBRACE
//! prop_fn           := access (GET|SET) (SEMI | block)
//! function_def      := access (type_expr name | CONSTRUCT) LPAREN params? RPAREN block
//! params            := param (COMMA param)*
//! param             := type_expr name
//! ```
//!
//! Specs and functions found anywhere in the module body or inside a spec
//! are bucketed into `Specs`/`Functions` container nodes in declaration
//! order within each bucket, rather than kept interleaved as written.

use gsc_lex::{AccessModifier, Keyword, Punct, TokenKind};
use gsc_util::ErrorCode;

use crate::node::{Node, NodePayload, NodeRule};
use crate::Parser;

impl<'a, S: gsc_lex::CharSource> Parser<'a, S> {
    fn expect_string(&mut self) -> Node {
        let tok = self.current();
        match tok.kind {
            TokenKind::Str(sym) => {
                self.bump();
                Node::with_payload(NodeRule::Name, tok.line, tok.column, NodePayload::Symbol(sym))
            }
            _ => {
                self.error(ErrorCode::ParserExpectedToken, "expected a string literal");
                Node::new(NodeRule::Name, tok.line, tok.column)
            }
        }
    }

    fn expect_name(&mut self) -> Node {
        let tok = self.current();
        match tok.kind {
            TokenKind::Name(sym) => {
                self.bump();
                Node::with_payload(NodeRule::Name, tok.line, tok.column, NodePayload::Symbol(sym))
            }
            _ => {
                self.error(ErrorCode::ParserExpectedToken, "expected a name");
                Node::new(NodeRule::Name, tok.line, tok.column)
            }
        }
    }

    fn parse_access_modifier(&mut self) -> Node {
        let tok = self.current();
        match tok.kind {
            TokenKind::AccessModifier(modifier) => {
                self.bump();
                Node::with_payload(
                    NodeRule::AccessModifier,
                    tok.line,
                    tok.column,
                    NodePayload::Access(modifier),
                )
            }
            _ => {
                self.error(
                    ErrorCode::ParserInvalidAccessModifier,
                    "expected 'public', 'concealed', or 'internal'",
                );
                Node::with_payload(
                    NodeRule::AccessModifier,
                    tok.line,
                    tok.column,
                    NodePayload::Access(AccessModifier::Public),
                )
            }
        }
    }

    /// Parses a complete module: `package` header, `depends` list, then the
    /// mixed sequence of top-level specs and functions.
    pub fn parse_module(&mut self) -> Node {
        let tok = self.current();
        let mut module = Node::new(NodeRule::Module, tok.line, tok.column);

        if matches!(tok.kind, TokenKind::Keyword(Keyword::Package)) {
            self.bump();
            module.add_child(self.expect_string());
            self.expect_punct(Punct::Semicolon);
        } else {
            self.error(ErrorCode::ParserExpectedToken, "expected 'package' at the start of a module");
        }

        while matches!(self.current().kind, TokenKind::Keyword(Keyword::Depends)) {
            module.add_child(self.parse_depends());
        }

        let mut specs = Node::new(NodeRule::Specs, tok.line, tok.column);
        let mut functions = Node::new(NodeRule::Functions, tok.line, tok.column);

        while !matches!(self.current().kind, TokenKind::Eof) {
            let start = self.current();
            if self.looks_like_spec() {
                specs.add_child(self.parse_spec_def());
            } else {
                functions.add_child(self.parse_function_def());
            }
            if self.current().line == start.line && self.current().column == start.column {
                // A production consumed nothing; force progress to avoid looping forever.
                self.error(ErrorCode::ParserUnexpectedToken, "expected a spec or function declaration");
                self.recover_to_sync_point();
            }
        }

        module.add_child(specs);
        module.add_child(functions);
        module
    }

    /// Looks past the access modifier to see whether `spec` follows,
    /// without consuming anything.
    fn looks_like_spec(&self) -> bool {
        matches!(self.current().kind, TokenKind::AccessModifier(_))
            && matches!(self.peek_next().kind, TokenKind::Keyword(Keyword::Spec))
    }

    fn parse_depends(&mut self) -> Node {
        let tok = self.bump();
        let path = self.expect_string();
        self.expect_punct(Punct::Semicolon);
        Node::with_payload(NodeRule::Depends, tok.line, tok.column, NodePayload::Symbol(path.symbol_value()))
    }

    fn parse_spec_def(&mut self) -> Node {
        let access = self.parse_access_modifier();
        let tok = self.expect_keyword(Keyword::Spec);
        let ty = self.parse_type_expr();
        self.expect_punct(Punct::LBrace);

        let mut properties = Node::new(NodeRule::Properties, tok.line, tok.column);
        let mut functions = Node::new(NodeRule::Functions, tok.line, tok.column);

        while !self.at_punct(Punct::RBrace) && !matches!(self.current().kind, TokenKind::Eof) {
            if self.looks_like_property() {
                properties.add_child(self.parse_property());
            } else {
                functions.add_child(self.parse_function_def());
            }
        }
        self.expect_punct(Punct::RBrace);

        Node::new(NodeRule::Spec, tok.line, tok.column)
            .with_child(access)
            .with_child(ty)
            .with_child(properties)
            .with_child(functions)
    }

    /// A member starts a property, not a function, when the token after the
    /// access modifier and type expression is a bare name followed by `{`
    /// rather than `(`. `function_def` allows `CONSTRUCT` with no type at
    /// all, so anything beginning with `construct` is always a function.
    fn looks_like_property(&self) -> bool {
        !matches!(self.current().kind, TokenKind::AccessModifier(_))
    }

    fn parse_property(&mut self) -> Node {
        let ty = self.parse_type_expr();
        let name = self.expect_name();
        self.expect_punct(Punct::LBrace);

        let mut node = Node::new(NodeRule::Property, ty.line(), ty.column())
            .with_child(ty)
            .with_child(name);

        while matches!(self.current().kind, TokenKind::AccessModifier(_)) {
            node.add_child(self.parse_prop_fn());
        }
        self.expect_punct(Punct::RBrace);
        node
    }

    fn parse_prop_fn(&mut self) -> Node {
        let access = self.parse_access_modifier();
        let tok = self.current();
        let is_getter = match tok.kind {
            TokenKind::Keyword(Keyword::Get) => {
                self.bump();
                true
            }
            TokenKind::Keyword(Keyword::Set) => {
                self.bump();
                false
            }
            _ => {
                self.error(ErrorCode::ParserExpectedToken, "expected 'get' or 'set'");
                true
            }
        };

        let mut node = Node::with_payload(
            NodeRule::PropertyFunction,
            tok.line,
            tok.column,
            NodePayload::IsGetter(is_getter),
        )
        .with_child(access);

        if self.eat_punct(Punct::Semicolon) {
            node
        } else {
            node.add_child(self.parse_block());
            node
        }
    }

    fn parse_function_def(&mut self) -> Node {
        let access = self.parse_access_modifier();
        let tok = self.current();

        let (return_type, name) = if matches!(tok.kind, TokenKind::Keyword(Keyword::Construct)) {
            self.bump();
            let name = Node::with_payload(
                NodeRule::Name,
                tok.line,
                tok.column,
                NodePayload::Symbol(gsc_util::Symbol::intern_known("construct")),
            );
            (None, name)
        } else {
            let ty = self.parse_type_expr();
            let name = self.expect_name();
            (Some(ty), name)
        };

        let params = self.parse_function_parameters();
        let body = self.parse_block();

        let mut node = Node::new(NodeRule::Function, tok.line, tok.column).with_child(access);
        if let Some(ty) = return_type {
            node.add_child(ty);
        }
        node.with_child(name).with_child(params).with_child(body)
    }

    fn parse_function_parameters(&mut self) -> Node {
        let open = self.expect_punct(Punct::LParen);
        let mut node = Node::new(NodeRule::FunctionParameters, open.line, open.column);
        if !self.at_punct(Punct::RParen) {
            loop {
                let ty = self.parse_type_expr();
                let name = self.expect_name();
                let param = Node::new(NodeRule::FunctionParameter, ty.line(), ty.column())
                    .with_child(ty)
                    .with_child(name);
                node.add_child(param);
                if !self.eat_punct(Punct::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(Punct::RParen);
        node
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> gsc_lex::Token {
        let tok = self.current();
        if matches!(tok.kind, TokenKind::Keyword(k) if k == keyword) {
            self.bump()
        } else {
            self.error(
                ErrorCode::ParserExpectedToken,
                format!("expected '{}'", keyword.as_str()),
            );
            tok
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
        let node = p.parse();
        (node, handler)
    }

    #[test]
    fn test_empty_module() {
        let (node, handler) = parse("package \"demo\";");
        assert_eq!(node.rule(), NodeRule::Module);
        assert_eq!(node.child(0).symbol_value().as_str(), "demo");
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_depends_declarations_are_collected() {
        let (node, _) = parse("package \"demo\"; depends \"io\"; depends \"collections\";");
        let depends: Vec<_> = node
            .children()
            .iter()
            .filter(|c| c.rule() == NodeRule::Depends)
            .collect();
        assert_eq!(depends.len(), 2);
        assert_eq!(depends[0].symbol_value().as_str(), "io");
    }

    #[test]
    fn test_top_level_function() {
        let (node, handler) = parse("package \"demo\"; public int32 main() { return 0; }");
        let functions = node.children().iter().find(|c| c.rule() == NodeRule::Functions).unwrap();
        assert_eq!(functions.child_count(), 1);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_spec_with_constructor_and_property() {
        let src = r#"
            package "demo";
            public spec Counter {
                int32 value {
                    public get;
                }

                public construct() {
                    value <- 0;
                }
            }
        "#;
        let (node, handler) = parse(src);
        let specs = node.children().iter().find(|c| c.rule() == NodeRule::Specs).unwrap();
        assert_eq!(specs.child_count(), 1);
        let spec = specs.child(0);
        assert_eq!(spec.rule(), NodeRule::Spec);

        let properties = spec.children().iter().find(|c| c.rule() == NodeRule::Properties).unwrap();
        assert_eq!(properties.child_count(), 1);
        let property = properties.child(0);
        assert_eq!(property.child_count(), 3); // type, name, one prop_fn

        let functions = spec.children().iter().find(|c| c.rule() == NodeRule::Functions).unwrap();
        assert_eq!(functions.child_count(), 1);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_generic_spec_type() {
        let src = r#"package "demo"; public spec Box<T> { }"#;
        let (node, handler) = parse(src);
        let specs = node.children().iter().find(|c| c.rule() == NodeRule::Specs).unwrap();
        let spec_type = specs.child(0).child(1);
        assert_eq!(spec_type.rule(), NodeRule::Type);
        assert_eq!(spec_type.child_count(), 1);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_function_parameters() {
        let src = r#"package "demo"; public int32 add(int32 a, int32 b) { return a + b; }"#;
        let (node, _) = parse(src);
        let functions = node.children().iter().find(|c| c.rule() == NodeRule::Functions).unwrap();
        let func = functions.child(0);
        // [access, type, name, params, block]
        let params = &func.children()[3];
        assert_eq!(params.rule(), NodeRule::FunctionParameters);
        assert_eq!(params.child_count(), 2);
    }

    #[test]
    fn test_missing_package_reports_error() {
        let (_, handler) = parse("public int32 main() { return 0; }");
        assert!(handler.has_errors());
    }
}
