//! The [`IrBuilder`] trait: the op vocabulary the generator emits against.
//!
//! An implementation does not need to understand Gunderscript at all - it
//! only needs to turn this fixed set of typed, backend-agnostic operations
//! into whatever it assembles to (a flat instruction stream, a textual
//! dump, real machine code). [`crate::recording::RecordingIrBuilder`] is
//! the reference implementation the rest of this crate tests against.

use gsc_util::Symbol;

/// `= != < <= > >=`, shared across the int/float/pointer comparison ops.
/// Pointer comparisons only ever use `Eq`/`Ne`; the others are accepted so
/// one enum covers every comparison primitive instead of three.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// The format a function returns through, which fixes which typed return
/// op and which call-info record a call site needs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReturnKind {
    Int,
    Float,
    Pointer,
}

/// One of the (return-kind x has-self) call shapes the generator ever
/// emits a `call_indirect` against. Six combinations cover every
/// Gunderscript call site; the GC allocator and the float-mod helper each
/// get their own record with `has_self: false`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CallInfo {
    pub return_kind: ReturnKind,
    pub has_self: bool,
}

impl CallInfo {
    pub const fn new(return_kind: ReturnKind, has_self: bool) -> Self {
        CallInfo { return_kind, has_self }
    }
}

/// Backend-agnostic IR emission surface.
///
/// `Value` and `Label` are opaque handles the builder hands back and later
/// consumes; the generator never inspects them. `Fragment` is whatever a
/// completed function lowers to (an instruction vector, assembled machine
/// code, ...).
pub trait IrBuilder {
    type Value: Copy + std::fmt::Debug;
    type Label: Copy + std::fmt::Debug;
    type Fragment;

    /// Opens a new function under `name`. Returns the pointer to its
    /// argument buffer and, for a spec member, the incoming `this`
    /// pointer - the two physical parameters every compiled function
    /// takes, per the calling convention every call site also assumes.
    fn begin_function(&mut self, name: Symbol, has_self: bool) -> (Self::Value, Option<Self::Value>);

    /// Closes the function opened by the last `begin_function` and returns
    /// its assembled fragment.
    fn end_function(&mut self) -> Self::Fragment;

    fn new_label(&mut self) -> Self::Label;
    fn bind_label(&mut self, label: Self::Label);
    fn jump(&mut self, label: Self::Label);
    /// Jumps to `label` when `cond` is nonzero. The vocabulary's only
    /// conditional jump; `xor` flips a condition before this when the
    /// "false" branch needs to be the one taken on a zero test.
    fn jump_if_true(&mut self, cond: Self::Value, label: Self::Label);
    /// Hints the register allocator to restart its live-range tracking
    /// after a foreign call, emitted after every outgoing `call_indirect`.
    fn regfence(&mut self);

    fn const_int(&mut self, value: i32) -> Self::Value;
    fn const_float(&mut self, value: f32) -> Self::Value;
    fn const_null(&mut self) -> Self::Value;

    fn add_i(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn sub_i(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn mul_i(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn div_i(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn mod_i(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    fn add_f(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn sub_f(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn mul_f(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn div_f(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    /// `float % float` has no dedicated op; the generator lowers it as a
    /// call through [`IrBuilder::native_float_mod`] instead.

    fn cmp_i(&mut self, op: CompareOp, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn cmp_f(&mut self, op: CompareOp, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn cmp_p(&mut self, op: CompareOp, lhs: Self::Value, rhs: Self::Value) -> Self::Value;
    fn xor(&mut self, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    /// Reserves a stack-local block and returns a handle to it. Its byte
    /// size may still be zero; call [`IrBuilder::resize_alloca`] once the
    /// true size is known (locals whose size depends on an assignment's
    /// right-hand side are sized after the fact).
    fn alloca(&mut self) -> Self::Value;
    fn resize_alloca(&mut self, handle: Self::Value, byte_size: u32);

    fn load_i8(&mut self, ptr: Self::Value, offset: i32) -> Self::Value;
    fn load_i32(&mut self, ptr: Self::Value, offset: i32) -> Self::Value;
    fn load_f32(&mut self, ptr: Self::Value, offset: i32) -> Self::Value;
    fn load_p(&mut self, ptr: Self::Value, offset: i32) -> Self::Value;
    fn store_i8(&mut self, ptr: Self::Value, offset: i32, value: Self::Value);
    fn store_i32(&mut self, ptr: Self::Value, offset: i32, value: Self::Value);
    fn store_f32(&mut self, ptr: Self::Value, offset: i32, value: Self::Value);
    fn store_p(&mut self, ptr: Self::Value, offset: i32, value: Self::Value);

    /// Indirect call through a pointer already holding the callee's
    /// address (as loaded from the module's function-pointer table).
    fn call_indirect(&mut self, callee: Self::Value, args: &[Self::Value], info: CallInfo) -> Self::Value;

    /// Resolves function-pointer-table slot `slot` (as assigned by the
    /// prescan pass) to a callable value for [`IrBuilder::call_indirect`].
    fn function_ref(&mut self, slot: usize) -> Self::Value;

    /// The function pointer backing the GC allocator's `allocate` call,
    /// the first of the two native calls the generator ever emits.
    fn native_alloc(&mut self) -> Self::Value;
    /// The function pointer backing the host C `fmod`-style helper used
    /// to lower `%` between two floats.
    fn native_float_mod(&mut self) -> Self::Value;

    fn ret_i(&mut self, value: Self::Value);
    fn ret_f(&mut self, value: Self::Value);
    fn ret_p(&mut self, value: Self::Value);
}
