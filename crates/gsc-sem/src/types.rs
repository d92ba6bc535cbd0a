//! Type-equivalence, operator typing, and typecast rules.
//!
//! Gunderscript has no implicit numeric promotion: two types match only if
//! they carry the same (post-mangling) name. The lone exception is the
//! `any-type` sentinel the parser attaches to a unary minus's placeholder
//! operand, which matches everything and must never escape into a
//! user-visible annotation.

use gsc_par::{PrimitiveType, TypeFormat, TypeSymbol};
use gsc_util::symbol::TY_ANY_TYPE;

/// Strict name equality, with `any-type` matching anything.
pub fn types_match(a: &TypeSymbol, b: &TypeSymbol) -> bool {
    a.name == TY_ANY_TYPE || b.name == TY_ANY_TYPE || a.name == b.name
}

pub fn is_any_type(t: &TypeSymbol) -> bool {
    t.name == TY_ANY_TYPE
}

pub fn is_numeric(t: &TypeSymbol) -> bool {
    matches!(t.format, TypeFormat::Int | TypeFormat::Float) || is_any_type(t)
}

pub fn is_bool(t: &TypeSymbol) -> bool {
    matches!(t.format, TypeFormat::Bool) || is_any_type(t)
}

/// Result type of `+`, restricted to int/int, float/float, string/string.
pub fn add_result<'a>(lhs: &'a TypeSymbol, rhs: &'a TypeSymbol) -> Option<&'a TypeSymbol> {
    if is_any_type(lhs) {
        return Some(rhs);
    }
    if is_any_type(rhs) {
        return Some(lhs);
    }
    let numeric_or_string = matches!(lhs.format, TypeFormat::Int | TypeFormat::Float)
        || matches!(lhs.primitive, PrimitiveType::String);
    if numeric_or_string && lhs.name == rhs.name {
        Some(lhs)
    } else {
        None
    }
}

/// Result type of `- * / %`: both operands the same numeric type.
pub fn arith_result<'a>(lhs: &'a TypeSymbol, rhs: &'a TypeSymbol) -> Option<&'a TypeSymbol> {
    if is_any_type(lhs) {
        return Some(rhs);
    }
    if is_any_type(rhs) {
        return Some(lhs);
    }
    if matches!(lhs.format, TypeFormat::Int | TypeFormat::Float) && lhs.name == rhs.name {
        Some(lhs)
    } else {
        None
    }
}

/// `= !=`: same type (pointer-equality for non-primitives); result is bool.
pub fn equality_operands_ok(lhs: &TypeSymbol, rhs: &TypeSymbol) -> bool {
    types_match(lhs, rhs)
}

/// `< <= > >=`: both operands the same numeric type.
pub fn ordering_operands_ok(lhs: &TypeSymbol, rhs: &TypeSymbol) -> bool {
    is_numeric(lhs) && is_numeric(rhs) && types_match(lhs, rhs)
}

/// Whether a function-call-like cast `T(x)` from `from` to `to` is allowed.
///
/// any numeric-or-bool -> int; any numeric-or-bool -> float;
/// int/bool -> bool. float -> bool is deliberately forbidden.
pub fn allowed_cast(from: &TypeSymbol, to: &TypeSymbol) -> bool {
    if is_any_type(from) || is_any_type(to) {
        return true;
    }
    let from_numeric_or_bool = matches!(
        from.primitive,
        PrimitiveType::Int8 | PrimitiveType::Int32 | PrimitiveType::Float32 | PrimitiveType::Bool
    );
    match to.primitive {
        PrimitiveType::Int32 | PrimitiveType::Int8 => from_numeric_or_bool,
        PrimitiveType::Float32 => from_numeric_or_bool,
        PrimitiveType::Bool => {
            matches!(from.primitive, PrimitiveType::Int8 | PrimitiveType::Int32 | PrimitiveType::Bool)
        }
        _ => false,
    }
}
