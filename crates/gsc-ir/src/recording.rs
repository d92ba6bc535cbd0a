//! [`RecordingIrBuilder`]: an [`IrBuilder`] that accumulates emitted ops
//! into an in-memory [`IrFragment`] instead of assembling real code.
//!
//! This is the reference implementation the rest of the crate's tests
//! exercise the generator against; a real back end would implement
//! [`IrBuilder`] the same way but lower each method straight to machine
//! code instead of pushing an [`IrOp`].

use gsc_util::Symbol;

use crate::builder::{CallInfo, CompareOp, IrBuilder};

/// A value handle: the index, within the current function, of the op that
/// produced it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegValue(pub u32);

/// A label handle: an opaque, per-function label id. Not yet bound to a
/// position until [`RecordingIrBuilder::bind_label`] pushes an
/// [`IrOp::Label`] for it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegLabel(pub u32);

/// One emitted operation. `dest` slots name the [`RegValue`] the op
/// produces, for ops that produce one.
#[derive(Clone, Debug, PartialEq)]
pub enum IrOp {
    ConstInt(RegValue, i32),
    ConstFloat(RegValue, f32),
    ConstNull(RegValue),

    AddI(RegValue, RegValue, RegValue),
    SubI(RegValue, RegValue, RegValue),
    MulI(RegValue, RegValue, RegValue),
    DivI(RegValue, RegValue, RegValue),
    ModI(RegValue, RegValue, RegValue),

    AddF(RegValue, RegValue, RegValue),
    SubF(RegValue, RegValue, RegValue),
    MulF(RegValue, RegValue, RegValue),
    DivF(RegValue, RegValue, RegValue),

    CmpI(RegValue, CompareOp, RegValue, RegValue),
    CmpF(RegValue, CompareOp, RegValue, RegValue),
    CmpP(RegValue, CompareOp, RegValue, RegValue),
    Xor(RegValue, RegValue, RegValue),

    Label(RegLabel),
    Jump(RegLabel),
    JumpIfTrue(RegValue, RegLabel),
    Regfence,

    Alloca(RegValue),
    ResizeAlloca(RegValue, u32),

    LoadI8(RegValue, RegValue, i32),
    LoadI32(RegValue, RegValue, i32),
    LoadF32(RegValue, RegValue, i32),
    LoadP(RegValue, RegValue, i32),
    StoreI8(RegValue, i32, RegValue),
    StoreI32(RegValue, i32, RegValue),
    StoreF32(RegValue, i32, RegValue),
    StoreP(RegValue, i32, RegValue),

    CallIndirect(RegValue, RegValue, Vec<RegValue>, CallInfo),
    FunctionRef(RegValue, usize),
    NativeAlloc(RegValue),
    NativeFloatMod(RegValue),

    RetI(RegValue),
    RetF(RegValue),
    RetP(RegValue),
}

/// A compiled function's recorded op stream.
#[derive(Clone, Debug, PartialEq)]
pub struct IrFragment {
    pub name: Symbol,
    pub has_self: bool,
    pub ops: Vec<IrOp>,
    pub value_count: u32,
    pub label_count: u32,
}

struct InProgress {
    name: Symbol,
    has_self: bool,
    ops: Vec<IrOp>,
    value_count: u32,
    label_count: u32,
}

impl InProgress {
    fn fresh_value(&mut self) -> RegValue {
        let v = RegValue(self.value_count);
        self.value_count += 1;
        v
    }
}

/// Reference [`IrBuilder`] that records ops rather than assembling them.
pub struct RecordingIrBuilder {
    current: Option<InProgress>,
}

impl RecordingIrBuilder {
    pub fn new() -> Self {
        RecordingIrBuilder { current: None }
    }

    fn current(&mut self) -> &mut InProgress {
        self.current.as_mut().expect("IrBuilder method called with no active function")
    }
}

impl Default for RecordingIrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! binop {
    ($name:ident, $variant:ident) => {
        fn $name(&mut self, lhs: RegValue, rhs: RegValue) -> RegValue {
            let dest = self.current().fresh_value();
            self.current().ops.push(IrOp::$variant(dest, lhs, rhs));
            dest
        }
    };
}

macro_rules! load_op {
    ($name:ident, $variant:ident) => {
        fn $name(&mut self, ptr: RegValue, offset: i32) -> RegValue {
            let dest = self.current().fresh_value();
            self.current().ops.push(IrOp::$variant(dest, ptr, offset));
            dest
        }
    };
}

macro_rules! store_op {
    ($name:ident, $variant:ident) => {
        fn $name(&mut self, ptr: RegValue, offset: i32, value: RegValue) {
            self.current().ops.push(IrOp::$variant(ptr, offset, value));
        }
    };
}

impl IrBuilder for RecordingIrBuilder {
    type Value = RegValue;
    type Label = RegLabel;
    type Fragment = IrFragment;

    fn begin_function(&mut self, name: Symbol, has_self: bool) -> (RegValue, Option<RegValue>) {
        self.current = Some(InProgress { name, has_self, ops: Vec::new(), value_count: 0, label_count: 0 });
        let state = self.current();
        let args = state.fresh_value();
        let this = if has_self { Some(state.fresh_value()) } else { None };
        (args, this)
    }

    fn end_function(&mut self) -> IrFragment {
        let state = self.current.take().expect("end_function called with no active function");
        IrFragment {
            name: state.name,
            has_self: state.has_self,
            ops: state.ops,
            value_count: state.value_count,
            label_count: state.label_count,
        }
    }

    fn new_label(&mut self) -> RegLabel {
        let state = self.current();
        let label = RegLabel(state.label_count);
        state.label_count += 1;
        label
    }

    fn bind_label(&mut self, label: RegLabel) {
        self.current().ops.push(IrOp::Label(label));
    }

    fn jump(&mut self, label: RegLabel) {
        self.current().ops.push(IrOp::Jump(label));
    }

    fn jump_if_true(&mut self, cond: RegValue, label: RegLabel) {
        self.current().ops.push(IrOp::JumpIfTrue(cond, label));
    }

    fn regfence(&mut self) {
        self.current().ops.push(IrOp::Regfence);
    }

    fn const_int(&mut self, value: i32) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::ConstInt(dest, value));
        dest
    }

    fn const_float(&mut self, value: f32) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::ConstFloat(dest, value));
        dest
    }

    fn const_null(&mut self) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::ConstNull(dest));
        dest
    }

    binop!(add_i, AddI);
    binop!(sub_i, SubI);
    binop!(mul_i, MulI);
    binop!(div_i, DivI);
    binop!(mod_i, ModI);
    binop!(add_f, AddF);
    binop!(sub_f, SubF);
    binop!(mul_f, MulF);
    binop!(div_f, DivF);

    fn cmp_i(&mut self, op: CompareOp, lhs: RegValue, rhs: RegValue) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::CmpI(dest, op, lhs, rhs));
        dest
    }

    fn cmp_f(&mut self, op: CompareOp, lhs: RegValue, rhs: RegValue) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::CmpF(dest, op, lhs, rhs));
        dest
    }

    fn cmp_p(&mut self, op: CompareOp, lhs: RegValue, rhs: RegValue) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::CmpP(dest, op, lhs, rhs));
        dest
    }

    binop!(xor, Xor);

    fn alloca(&mut self) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::Alloca(dest));
        dest
    }

    fn resize_alloca(&mut self, handle: RegValue, byte_size: u32) {
        self.current().ops.push(IrOp::ResizeAlloca(handle, byte_size));
    }

    load_op!(load_i8, LoadI8);
    load_op!(load_i32, LoadI32);
    load_op!(load_f32, LoadF32);
    load_op!(load_p, LoadP);
    store_op!(store_i8, StoreI8);
    store_op!(store_i32, StoreI32);
    store_op!(store_f32, StoreF32);
    store_op!(store_p, StoreP);

    fn call_indirect(&mut self, callee: RegValue, args: &[RegValue], info: CallInfo) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::CallIndirect(dest, callee, args.to_vec(), info));
        dest
    }

    fn function_ref(&mut self, slot: usize) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::FunctionRef(dest, slot));
        dest
    }

    fn native_alloc(&mut self) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::NativeAlloc(dest));
        dest
    }

    fn native_float_mod(&mut self) -> RegValue {
        let dest = self.current().fresh_value();
        self.current().ops.push(IrOp::NativeFloatMod(dest));
        dest
    }

    fn ret_i(&mut self, value: RegValue) {
        self.current().ops.push(IrOp::RetI(value));
    }

    fn ret_f(&mut self, value: RegValue) {
        self.current().ops.push(IrOp::RetF(value));
    }

    fn ret_p(&mut self, value: RegValue) {
        self.current().ops.push(IrOp::RetP(value));
    }
}
