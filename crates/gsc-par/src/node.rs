//! The AST: one homogeneous [`Node`] type carrying a closed [`NodeRule`]
//! tag, ordered children, an optional literal payload, and a symbol
//! annotation the semantic walker fills in later.

use std::rc::Rc;

use gsc_lex::{AccessModifier, Token};

use crate::symbol::SemSymbol;

/// The production a [`Node`] was built from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeRule {
    Module,
    Depends,
    Name,
    Type,
    AccessModifier,
    Specs,
    Spec,
    Properties,
    Property,
    PropertyFunction,
    Functions,
    Function,
    FunctionParameters,
    FunctionParameter,
    Block,
    Assign,
    Return,
    If,
    For,
    LoopInitialize,
    LoopCondition,
    LoopUpdate,
    Expression,
    Member,
    Call,
    CallParameters,
    New,
    Default,
    SymbolRef,
    LogOr,
    LogAnd,
    LogNot,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BoolLiteral,
    IntLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    AnyType,
}

/// The literal value a leaf node carries, if its rule has one.
///
/// Interior nodes (`Block`, `If`, `Add`, ...) have no payload; their meaning
/// lives entirely in their rule and children.
#[derive(Clone, Debug, PartialEq)]
pub enum NodePayload {
    None,
    Bool(bool),
    Int(i32),
    Float(f64),
    Char(char),
    /// Interned string contents, for `StringLiteral`, `Name`, and `SymbolRef`.
    Symbol(gsc_util::Symbol),
    /// The `public`/`concealed`/`internal` tag on an `AccessModifier` node.
    Access(AccessModifier),
    /// Whether a `PropertyFunction` node is the getter (`true`) or the
    /// setter (`false`) half of a property.
    IsGetter(bool),
}

/// One node in the AST.
///
/// Mirrors the source tree's own `Node`: a rule tag, ordered children, a
/// small payload union, and a symbol slot the node owns and overwrites
/// (never merges) once the semantic pass resolves it.
#[derive(Clone, Debug)]
pub struct Node {
    rule: NodeRule,
    line: u32,
    column: u32,
    payload: NodePayload,
    children: Vec<Node>,
    symbol: Option<Rc<SemSymbol>>,
}

impl Node {
    pub fn new(rule: NodeRule, line: u32, column: u32) -> Self {
        Self::with_payload(rule, line, column, NodePayload::None)
    }

    pub fn with_payload(rule: NodeRule, line: u32, column: u32, payload: NodePayload) -> Self {
        Node {
            rule,
            line,
            column,
            payload,
            children: Vec::new(),
            symbol: None,
        }
    }

    /// Builds a leaf node positioned at the token that produced it.
    pub fn at_token(rule: NodeRule, token: Token, payload: NodePayload) -> Self {
        Self::with_payload(rule, token.line, token.column, payload)
    }

    pub fn add_child(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn rule(&self) -> NodeRule {
        self.rule
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> &Node {
        &self.children[index]
    }

    pub fn child_mut(&mut self, index: usize) -> &mut Node {
        &mut self.children[index]
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn bool_value(&self) -> bool {
        match self.payload {
            NodePayload::Bool(v) => v,
            _ => panic!("node rule {:?} has no bool payload", self.rule),
        }
    }

    pub fn int_value(&self) -> i32 {
        match self.payload {
            NodePayload::Int(v) => v,
            _ => panic!("node rule {:?} has no int payload", self.rule),
        }
    }

    pub fn float_value(&self) -> f64 {
        match self.payload {
            NodePayload::Float(v) => v,
            _ => panic!("node rule {:?} has no float payload", self.rule),
        }
    }

    pub fn char_value(&self) -> char {
        match self.payload {
            NodePayload::Char(v) => v,
            _ => panic!("node rule {:?} has no char payload", self.rule),
        }
    }

    pub fn symbol_value(&self) -> gsc_util::Symbol {
        match self.payload {
            NodePayload::Symbol(v) => v,
            _ => panic!("node rule {:?} has no symbol payload", self.rule),
        }
    }

    pub fn access_value(&self) -> AccessModifier {
        match self.payload {
            NodePayload::Access(v) => v,
            _ => panic!("node rule {:?} has no access-modifier payload", self.rule),
        }
    }

    pub fn is_getter(&self) -> bool {
        match self.payload {
            NodePayload::IsGetter(v) => v,
            _ => panic!("node rule {:?} has no getter/setter payload", self.rule),
        }
    }

    /// The symbol this node was annotated with, if the semantic pass has
    /// run over it.
    pub fn symbol(&self) -> Option<&Rc<SemSymbol>> {
        self.symbol.as_ref()
    }

    /// Overwrites this node's symbol annotation, cloning the `Rc` handle
    /// rather than the pointee.
    pub fn set_symbol(&mut self, symbol: Rc<SemSymbol>) {
        self.symbol = Some(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_node_carries_its_payload() {
        let node = Node::with_payload(NodeRule::IntLiteral, 3, 7, NodePayload::Int(42));
        assert_eq!(node.rule(), NodeRule::IntLiteral);
        assert_eq!(node.int_value(), 42);
        assert_eq!((node.line(), node.column()), (3, 7));
    }

    #[test]
    fn test_children_are_ordered() {
        let node = Node::new(NodeRule::Add, 1, 1)
            .with_child(Node::with_payload(NodeRule::IntLiteral, 1, 1, NodePayload::Int(1)))
            .with_child(Node::with_payload(NodeRule::IntLiteral, 1, 3, NodePayload::Int(2)));
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.child(0).int_value(), 1);
        assert_eq!(node.child(1).int_value(), 2);
    }

    #[test]
    fn test_symbol_slot_starts_unset_and_is_overwritten_on_set() {
        use crate::symbol::{PrimitiveType, TypeFormat, TypeSymbol};
        use gsc_lex::AccessModifier;

        let mut node = Node::new(NodeRule::Name, 1, 1);
        assert!(node.symbol().is_none());

        let sym = Rc::new(SemSymbol::Type(TypeSymbol {
            name: gsc_util::Symbol::intern("int32"),
            primitive: PrimitiveType::Int32,
            size_bytes: 4,
            format: TypeFormat::Int,
            access: AccessModifier::Public,
        }));
        node.set_symbol(sym.clone());
        assert!(Rc::ptr_eq(node.symbol().unwrap(), &sym));
    }

    #[test]
    #[should_panic]
    fn test_wrong_payload_accessor_panics() {
        let node = Node::with_payload(NodeRule::IntLiteral, 1, 1, NodePayload::Int(1));
        node.float_value();
    }
}
