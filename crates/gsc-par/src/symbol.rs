//! Symbol-table entry kinds.
//!
//! These are the values an AST node's symbol-annotation slot points at once
//! the semantic analyzer has run. The parser never constructs one itself —
//! it only gives each [`crate::node::Node`] a place to hold one.

use std::rc::Rc;

use gsc_lex::AccessModifier;
use gsc_util::Symbol as Name;

/// The primitive encoding a [`TypeSymbol`] carries, independent of its name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrimitiveType {
    Void,
    Int8,
    Int32,
    Float32,
    Bool,
    String,
    Pointer,
}

/// The broad shape a type's values take at runtime.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TypeFormat {
    Void,
    Int,
    Float,
    Bool,
    Pointer,
}

/// A concrete or built-in type: `int32`, `bool`, a user `spec` name, ...
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSymbol {
    pub name: Name,
    pub primitive: PrimitiveType,
    pub size_bytes: u32,
    pub format: TypeFormat,
    pub access: AccessModifier,
}

/// Whether a [`GenericTypeSymbol`] is an unapplied template (`List`) or has
/// concrete type arguments substituted in (`List<int32>`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GenericKind {
    Template,
    Applied,
}

/// A generic spec, either as a template or with its parameters applied.
///
/// An applied instance's `base.name` is already mangled to embed its
/// parameters (see the module-level name-mangling scheme gsc-sem builds on
/// top of this type).
#[derive(Clone, Debug, PartialEq)]
pub struct GenericTypeSymbol {
    pub base: TypeSymbol,
    pub params: Vec<Rc<SemSymbol>>,
    pub kind: GenericKind,
}

/// The role a [`FunctionSymbol`] plays, since properties, parameters, and
/// locals are all represented with the same record shape.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FunctionKind {
    Function,
    PropertyGetter,
    PropertySetter,
    Parameter,
    LocalVariable,
}

/// A callable, property accessor, parameter, or local variable binding.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSymbol {
    /// The enclosing spec's name, or `None` for a module-level function.
    pub spec_name: Option<Name>,
    pub mangled_name: Name,
    pub param_types: Vec<Rc<SemSymbol>>,
    pub return_type: Rc<SemSymbol>,
    pub access: AccessModifier,
    pub kind: FunctionKind,
}

/// The value stored in an AST node's symbol-annotation slot.
#[derive(Clone, Debug, PartialEq)]
pub enum SemSymbol {
    Type(TypeSymbol),
    GenericType(GenericTypeSymbol),
    Function(FunctionSymbol),
}

impl SemSymbol {
    /// The type this symbol denotes or produces: itself for a type symbol,
    /// the return type for a function/property symbol.
    pub fn type_symbol(&self) -> &TypeSymbol {
        match self {
            SemSymbol::Type(t) => t,
            SemSymbol::GenericType(g) => &g.base,
            SemSymbol::Function(f) => f.return_type.type_symbol(),
        }
    }

    pub fn name(&self) -> Name {
        match self {
            SemSymbol::Type(t) => t.name,
            SemSymbol::GenericType(g) => g.base.name,
            SemSymbol::Function(f) => f.mangled_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_type() -> TypeSymbol {
        TypeSymbol {
            name: Name::intern_type("int32"),
            primitive: PrimitiveType::Int32,
            size_bytes: 4,
            format: TypeFormat::Int,
            access: AccessModifier::Public,
        }
    }

    #[test]
    fn test_type_symbol_self_type_symbol() {
        let sym = SemSymbol::Type(int_type());
        assert_eq!(sym.type_symbol().primitive, PrimitiveType::Int32);
    }

    #[test]
    fn test_function_symbol_type_symbol_is_return_type() {
        let ret = Rc::new(SemSymbol::Type(int_type()));
        let func = SemSymbol::Function(FunctionSymbol {
            spec_name: None,
            mangled_name: Name::intern("::foo$int32"),
            param_types: vec![ret.clone()],
            return_type: ret,
            access: AccessModifier::Public,
            kind: FunctionKind::Function,
        });
        assert_eq!(func.type_symbol().primitive, PrimitiveType::Int32);
    }

    #[test]
    fn test_generic_type_symbol_kind() {
        let base = int_type();
        let generic = GenericTypeSymbol {
            base: base.clone(),
            params: vec![],
            kind: GenericKind::Template,
        };
        assert_eq!(generic.kind, GenericKind::Template);
        assert_eq!(generic.base, base);
    }
}
