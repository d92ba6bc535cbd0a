//! gsc-util - Core utilities and foundation types.
//!
//! This crate provides the fundamental utilities shared by every compiler
//! phase: interned identifiers ([`Symbol`]), source locations ([`Span`],
//! [`SourceMap`]), diagnostic reporting ([`Handler`], [`Diagnostic`],
//! [`ErrorCode`]), typed-index collections ([`IndexVec`], [`Idx`]), and
//! definition identifiers ([`DefId`]).
//!
//! Nothing in this crate knows about lexing, parsing, or IR generation; it
//! exists so those layers don't each reinvent interning, span tracking, or
//! error reporting.

pub mod def_id;
pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use def_id::{DefId, DefIdGenerator};
pub use diagnostic::{ColorConfig, Diagnostic, DiagnosticBuilder, ErrorCode, Handler, LabelStyle, Level};
// `define_idx!` is exported at the crate root automatically via `#[macro_export]`.
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
