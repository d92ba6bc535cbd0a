//! Token vocabulary for Gunderscript source.
//!
//! A token carries its kind plus the line/column of its first character.
//! Keywords and access modifiers are distinct token kinds even though both
//! are lexed through the same identifier path: `public`/`concealed`/
//! `internal` are access modifiers, everything else in the reserved-word
//! table is a keyword, and anything not in the table is a plain name.

use gsc_util::Symbol;

/// A reserved word that is not one of the three access modifiers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Keyword {
    Package,
    Depends,
    Spec,
    If,
    Else,
    While,
    For,
    Return,
    Get,
    Set,
    Construct,
    New,
    Default,
    True,
    False,
    This,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Depends => "depends",
            Self::Spec => "spec",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Return => "return",
            Self::Get => "get",
            Self::Set => "set",
            Self::Construct => "construct",
            Self::New => "new",
            Self::Default => "default",
            Self::True => "true",
            Self::False => "false",
            Self::This => "this",
        }
    }
}

/// One of the three visibility modifiers a member declaration may carry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AccessModifier {
    Public,
    Concealed,
    Internal,
}

impl AccessModifier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Concealed => "concealed",
            Self::Internal => "internal",
        }
    }
}

/// Punctuation and operator tokens.
///
/// `=` is equality, not assignment: assignment is the two-character `<-`,
/// and `<->` is the swap operator. There is no `==`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Punct {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Assign,    // <-
    Swap,      // <->
    Eq,        // =
    NotEq,     // !=
    Less,      // <
    LessEq,    // <=
    Greater,   // >
    GreaterEq, // >=
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !
}

impl Punct {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Assign => "<-",
            Self::Swap => "<->",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
        }
    }
}

/// The kind of a token, together with any payload it carries.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TokenKind {
    AccessModifier(AccessModifier),
    Keyword(Keyword),
    Punct(Punct),
    Name(Symbol),
    Integer(i32),
    Float(f64),
    Str(Symbol),
    Char(char),
    Eof,
}

/// A single lexical token with its source position.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub const fn new(kind: TokenKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }

    pub const fn eof(line: u32, column: u32) -> Self {
        Self::new(TokenKind::Eof, line, column)
    }

    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Looks up `text` in the closed keyword/access-modifier table.
///
/// Returns `None` for anything else, which the caller then interns as a
/// plain `Name` token.
pub fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    Some(match text {
        "package" => TokenKind::Keyword(Keyword::Package),
        "depends" => TokenKind::Keyword(Keyword::Depends),
        "spec" => TokenKind::Keyword(Keyword::Spec),
        "public" => TokenKind::AccessModifier(AccessModifier::Public),
        "concealed" => TokenKind::AccessModifier(AccessModifier::Concealed),
        "internal" => TokenKind::AccessModifier(AccessModifier::Internal),
        "if" => TokenKind::Keyword(Keyword::If),
        "else" => TokenKind::Keyword(Keyword::Else),
        "while" => TokenKind::Keyword(Keyword::While),
        "for" => TokenKind::Keyword(Keyword::For),
        "return" => TokenKind::Keyword(Keyword::Return),
        "get" => TokenKind::Keyword(Keyword::Get),
        "set" => TokenKind::Keyword(Keyword::Set),
        "construct" => TokenKind::Keyword(Keyword::Construct),
        "new" => TokenKind::Keyword(Keyword::New),
        "default" => TokenKind::Keyword(Keyword::Default),
        "true" => TokenKind::Keyword(Keyword::True),
        "false" => TokenKind::Keyword(Keyword::False),
        "this" => TokenKind::Keyword(Keyword::This),
        _ => return None,
    })
}
