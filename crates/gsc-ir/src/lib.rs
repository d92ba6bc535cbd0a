//! gsc-ir - IR generator.
//!
//! Lowers a semantically-analyzed AST into one backend-agnostic
//! [`builder::IrBuilder::Fragment`] per function and property accessor. The
//! op vocabulary a backend implements lives in [`builder`]; [`recording`]
//! is the reference implementation the rest of this crate tests against.
//! [`layout`] prescans spec sizes, property offsets, and function-pointer-
//! table slots before a single fragment is emitted; [`registers`] tracks
//! live local/parameter bindings during emission the way
//! [`gsc_sem::SymbolTable`] tracks them during analysis. [`generator`] ties
//! all four together; [`module`] is the artifact it produces.

pub mod builder;
pub mod generator;
pub mod layout;
pub mod module;
pub mod recording;
pub mod registers;

pub use builder::{CallInfo, CompareOp, IrBuilder, ReturnKind};
pub use generator::generate;
pub use module::Module;
