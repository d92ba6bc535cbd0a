//! Error codes for categorizing compiler diagnostics.
//!
//! This module provides the [`ErrorCode`] type: a closed, kebab-case taxonomy
//! of every failure the front end can report, clustered by the compiler
//! layer that raised it. Unlike an open numeric scheme, the set of codes is
//! fixed here and extended only when a new layer or failure mode is added.
//!
//! # Examples
//!
//! ```
//! use gsc_util::diagnostic::ErrorCode;
//!
//! let code = ErrorCode::LexerUnexpectedChar;
//! assert_eq!(code.as_str(), "lexer-unexpected-char");
//! assert_eq!(code.layer(), "lexer");
//! ```

/// A code identifying the specific kind of compiler diagnostic.
///
/// Codes cluster by layer: `lexer-*`, `parser-*`, `semantic-*`, `ir-*`,
/// `symboltable-*`, plus two layer-less codes, `illegal-state` and
/// `not-implemented`, reserved for conditions that should never occur in a
/// correct program (an escaped `illegal-state`/`symboltable-*` code
/// indicates a compiler bug, not a user error).
///
/// # Examples
///
/// ```
/// use gsc_util::diagnostic::ErrorCode;
///
/// assert_eq!(ErrorCode::SemanticTypeMismatch.as_str(), "semantic-type-mismatch");
/// assert_eq!(ErrorCode::NotImplemented.as_str(), "not-implemented");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ErrorCode {
    // -- lexer-* --------------------------------------------------------
    /// An input character does not begin any valid token.
    LexerUnexpectedChar,
    /// A string literal was not closed before end of line or end of file.
    LexerUnterminatedString,
    /// A character literal was not closed, or contained more than one character.
    LexerInvalidCharLiteral,
    /// A `\` inside a string or character literal was followed by a character
    /// outside the recognized escape set.
    LexerInvalidEscape,
    /// A numeric literal has an invalid digit sequence.
    LexerInvalidNumberLiteral,
    /// A punctuation sequence does not match any known operator or delimiter.
    LexerUnknownToken,

    // -- parser-* ---------------------------------------------------------
    /// The next token cannot start any production valid at this point.
    ParserUnexpectedToken,
    /// A specific token was required (e.g. a closing brace) but a different one was found.
    ParserExpectedToken,
    /// Input ended in the middle of a production.
    ParserUnexpectedEof,
    /// An access modifier token was not one of `public`, `concealed`, `internal`.
    ParserInvalidAccessModifier,
    /// A generic parameter list contains the same name twice.
    ParserDuplicateGenericParam,

    // -- semantic-* ---------------------------------------------------------
    /// A name reference does not resolve to any visible symbol.
    SemanticUndefinedSymbol,
    /// Two symbols in the same scope were declared under the same mangled name.
    SemanticDuplicateDefinition,
    /// Two type symbols that should match strictly do not.
    SemanticTypeMismatch,
    /// A call's argument count does not match any overload of the callee.
    SemanticWrongArity,
    /// A call's mangled name does not match any declared overload.
    SemanticNoMatchingOverload,
    /// A `return` statement's expression type does not match the function's declared return type.
    SemanticInvalidReturn,
    /// A `concealed` member was referenced from outside its declaring spec.
    SemanticAccessViolation,
    /// The left-hand side of an assignment does not refer to an assignable location.
    SemanticNotAssignable,
    /// A module's package name does not match the dotted-identifier pattern.
    SemanticInvalidPackageName,

    // -- ir-* ---------------------------------------------------------------
    /// The IR generator could not resolve a callee to a function-pointer-table slot.
    IrUnresolvedFunction,
    /// The function-pointer table prescan and the emission pass disagreed on node order.
    IrPassOrderMismatch,
    /// A register-table lookup for a local/parameter found no entry.
    IrUnknownRegister,
    /// A second compilation was attempted against a module already marked `compiled`.
    IrInvalidCall,

    // -- symboltable-* --------------------------------------------------
    /// A `Pop` was requested on a symbol table with no pushed frame.
    SymbolTableScopeUnderflow,
    /// A `Put` targeted a name already bound in the same frame.
    SymbolTableDuplicateBinding,
    /// A `Get`/`GetTopOnly` found no binding for the requested name.
    SymbolTableNotFound,

    // -- layer-less, compiler-bug-if-escaped -----------------------------
    /// An internal invariant was violated; indicates a compiler bug if it
    /// ever reaches a caller undiagnosed. Also raised, per design, when the
    /// IR generator encounters a string literal.
    IllegalState,
    /// The requested behavior is recognized by the grammar/semantics but
    /// deliberately unimplemented (e.g. the `internal` access modifier).
    NotImplemented,
}

impl ErrorCode {
    /// The compiler layer this code belongs to (`"lexer"`, `"parser"`,
    /// `"semantic"`, `"ir"`, `"symboltable"`, or `"internal"` for the two
    /// layer-less codes).
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::diagnostic::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::ParserUnexpectedEof.layer(), "parser");
    /// assert_eq!(ErrorCode::IllegalState.layer(), "internal");
    /// ```
    pub const fn layer(&self) -> &'static str {
        match self {
            Self::LexerUnexpectedChar
            | Self::LexerUnterminatedString
            | Self::LexerInvalidCharLiteral
            | Self::LexerInvalidEscape
            | Self::LexerInvalidNumberLiteral
            | Self::LexerUnknownToken => "lexer",

            Self::ParserUnexpectedToken
            | Self::ParserExpectedToken
            | Self::ParserUnexpectedEof
            | Self::ParserInvalidAccessModifier
            | Self::ParserDuplicateGenericParam => "parser",

            Self::SemanticUndefinedSymbol
            | Self::SemanticDuplicateDefinition
            | Self::SemanticTypeMismatch
            | Self::SemanticWrongArity
            | Self::SemanticNoMatchingOverload
            | Self::SemanticInvalidReturn
            | Self::SemanticAccessViolation
            | Self::SemanticNotAssignable
            | Self::SemanticInvalidPackageName => "semantic",

            Self::IrUnresolvedFunction
            | Self::IrPassOrderMismatch
            | Self::IrUnknownRegister
            | Self::IrInvalidCall => "ir",

            Self::SymbolTableScopeUnderflow
            | Self::SymbolTableDuplicateBinding
            | Self::SymbolTableNotFound => "symboltable",

            Self::IllegalState | Self::NotImplemented => "internal",
        }
    }

    /// The kebab-case code string as it appears in CLI output, e.g.
    /// `<file>:<line>:<column>: <code>: <message>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gsc_util::diagnostic::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::LexerUnexpectedChar.as_str(), "lexer-unexpected-char");
    /// assert_eq!(ErrorCode::NotImplemented.as_str(), "not-implemented");
    /// ```
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LexerUnexpectedChar => "lexer-unexpected-char",
            Self::LexerUnterminatedString => "lexer-unterminated-string",
            Self::LexerInvalidCharLiteral => "lexer-invalid-char-literal",
            Self::LexerInvalidEscape => "lexer-invalid-escape",
            Self::LexerInvalidNumberLiteral => "lexer-invalid-number-literal",
            Self::LexerUnknownToken => "lexer-unknown-token",

            Self::ParserUnexpectedToken => "parser-unexpected-token",
            Self::ParserExpectedToken => "parser-expected-token",
            Self::ParserUnexpectedEof => "parser-unexpected-eof",
            Self::ParserInvalidAccessModifier => "parser-invalid-access-modifier",
            Self::ParserDuplicateGenericParam => "parser-duplicate-generic-param",

            Self::SemanticUndefinedSymbol => "semantic-undefined-symbol",
            Self::SemanticDuplicateDefinition => "semantic-duplicate-definition",
            Self::SemanticTypeMismatch => "semantic-type-mismatch",
            Self::SemanticWrongArity => "semantic-wrong-arity",
            Self::SemanticNoMatchingOverload => "semantic-no-matching-overload",
            Self::SemanticInvalidReturn => "semantic-invalid-return",
            Self::SemanticAccessViolation => "semantic-access-violation",
            Self::SemanticNotAssignable => "semantic-not-assignable",
            Self::SemanticInvalidPackageName => "semantic-invalid-package-name",

            Self::IrUnresolvedFunction => "ir-unresolved-function",
            Self::IrPassOrderMismatch => "ir-pass-order-mismatch",
            Self::IrUnknownRegister => "ir-unknown-register",
            Self::IrInvalidCall => "ir-invalid-call",

            Self::SymbolTableScopeUnderflow => "symboltable-scope-underflow",
            Self::SymbolTableDuplicateBinding => "symboltable-duplicate-binding",
            Self::SymbolTableNotFound => "symboltable-not-found",

            Self::IllegalState => "illegal-state",
            Self::NotImplemented => "not-implemented",
        }
    }

    /// The default human-readable message for this code.
    ///
    /// Call sites are free to attach more specific context via
    /// [`super::DiagnosticBuilder::note`]; this is only the fallback used
    /// when no message override is given.
    pub const fn default_message(&self) -> &'static str {
        match self {
            Self::LexerUnexpectedChar => "unexpected character",
            Self::LexerUnterminatedString => "unterminated string literal",
            Self::LexerInvalidCharLiteral => "invalid character literal",
            Self::LexerInvalidEscape => "unrecognized escape sequence",
            Self::LexerInvalidNumberLiteral => "invalid numeric literal",
            Self::LexerUnknownToken => "unknown token",

            Self::ParserUnexpectedToken => "unexpected token",
            Self::ParserExpectedToken => "expected a different token",
            Self::ParserUnexpectedEof => "unexpected end of input",
            Self::ParserInvalidAccessModifier => "invalid access modifier",
            Self::ParserDuplicateGenericParam => "duplicate generic parameter name",

            Self::SemanticUndefinedSymbol => "undefined symbol",
            Self::SemanticDuplicateDefinition => "duplicate definition",
            Self::SemanticTypeMismatch => "type mismatch",
            Self::SemanticWrongArity => "wrong number of arguments",
            Self::SemanticNoMatchingOverload => "no matching overload",
            Self::SemanticInvalidReturn => "return type does not match function signature",
            Self::SemanticAccessViolation => "member is not accessible from this context",
            Self::SemanticNotAssignable => "expression is not assignable",
            Self::SemanticInvalidPackageName => "package name must be dot-separated identifiers",

            Self::IrUnresolvedFunction => "could not resolve function to a pointer-table slot",
            Self::IrPassOrderMismatch => "prescan and emission passes visited nodes out of order",
            Self::IrUnknownRegister => "no register-table entry for this name",
            Self::IrInvalidCall => "module has already been compiled",

            Self::SymbolTableScopeUnderflow => "attempted to pop an empty scope stack",
            Self::SymbolTableDuplicateBinding => "name already bound in this scope",
            Self::SymbolTableNotFound => "name not found in any enclosing scope",

            Self::IllegalState => "internal compiler invariant violated",
            Self::NotImplemented => "feature recognized but not yet implemented",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str() {
        assert_eq!(ErrorCode::LexerUnexpectedChar.as_str(), "lexer-unexpected-char");
        assert_eq!(ErrorCode::ParserUnexpectedEof.as_str(), "parser-unexpected-eof");
        assert_eq!(ErrorCode::SemanticTypeMismatch.as_str(), "semantic-type-mismatch");
        assert_eq!(ErrorCode::IrUnresolvedFunction.as_str(), "ir-unresolved-function");
        assert_eq!(
            ErrorCode::SymbolTableNotFound.as_str(),
            "symboltable-not-found"
        );
        assert_eq!(ErrorCode::IllegalState.as_str(), "illegal-state");
        assert_eq!(ErrorCode::NotImplemented.as_str(), "not-implemented");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::LexerUnknownToken), "lexer-unknown-token");
    }

    #[test]
    fn test_layer() {
        assert_eq!(ErrorCode::LexerUnexpectedChar.layer(), "lexer");
        assert_eq!(ErrorCode::ParserExpectedToken.layer(), "parser");
        assert_eq!(ErrorCode::SemanticUndefinedSymbol.layer(), "semantic");
        assert_eq!(ErrorCode::IrUnknownRegister.layer(), "ir");
        assert_eq!(ErrorCode::SymbolTableScopeUnderflow.layer(), "symboltable");
        assert_eq!(ErrorCode::IllegalState.layer(), "internal");
        assert_eq!(ErrorCode::NotImplemented.layer(), "internal");
    }

    #[test]
    fn test_default_message_nonempty() {
        assert!(!ErrorCode::SemanticNoMatchingOverload.default_message().is_empty());
    }

    #[test]
    fn test_code_equality() {
        assert_eq!(ErrorCode::LexerUnexpectedChar, ErrorCode::LexerUnexpectedChar);
        assert_ne!(ErrorCode::LexerUnexpectedChar, ErrorCode::LexerUnknownToken);
    }
}
