//! The two-pass IR generator: [`generate`] walks a semantically-analyzed
//! module and emits one [`crate::builder::IrBuilder::Fragment`] per
//! function/property accessor, producing a populated [`Module`].
//!
//! Property reads and writes never call through a getter/setter: both are
//! lowered as a direct typed load/store at the property's prescanned
//! offset. Accessor bodies are still emitted (and still occupy a
//! function-pointer-table slot) since the pointer table is sized to every
//! compiled function, not just the ones a member expression can reach.

use std::rc::Rc;

use gsc_lex::AccessModifier;
use gsc_par::{Node, NodeRule, PrimitiveType, SemSymbol, TypeFormat, TypeSymbol};
use gsc_sem::mangle;
use gsc_sem::types;
use gsc_util::symbol::{TY_BOOL, TY_FLOAT32, TY_INT32, TY_INT8, TY_STRING};
use gsc_util::{DiagnosticBuilder, ErrorCode, FxHashMap, Handler, Span, Symbol};

use crate::builder::{CallInfo, CompareOp, IrBuilder, ReturnKind};
use crate::layout::{self, Layout};
use crate::module::Module;
use crate::registers::{RegKind, RegisterEntry, RegisterTable};

/// Runs the IR generator over `module`, appending every compiled function
/// into `target`. Returns `false` (and reports [`ErrorCode::IrInvalidCall`])
/// without touching `target` if it was already compiled.
pub fn generate<B: IrBuilder>(module: &Node, builder: &mut B, target: &mut Module<B::Fragment>, handler: &Handler) -> bool {
    if target.is_compiled() {
        DiagnosticBuilder::error("module has already been compiled")
            .code(ErrorCode::IrInvalidCall)
            .span(Span::point(0, 0))
            .emit(handler);
        return false;
    }

    let layout = layout::build(module);
    let mut gen = Generator::new(builder, &layout, handler);

    let specs_idx = module.children().iter().position(|c| c.rule() == NodeRule::Specs).expect("module has Specs");
    let functions_idx = module.children().iter().position(|c| c.rule() == NodeRule::Functions).expect("module has Functions");

    let specs = module.child(specs_idx);
    for i in 0..specs.child_count() {
        gen.emit_spec(specs.child(i), target);
    }

    let functions = module.child(functions_idx);
    for i in 0..functions.child_count() {
        gen.emit_function(functions.child(i), None, target);
    }

    target.mark_compiled();
    true
}

/// The byte-width "family" a type's values fall into: which load/store/
/// compare/return op variant and which [`ReturnKind`] it selects.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Family {
    Int,
    Float,
    Pointer,
}

fn family_of(ty: &TypeSymbol) -> Family {
    match ty.format {
        TypeFormat::Float => Family::Float,
        TypeFormat::Pointer => Family::Pointer,
        TypeFormat::Int | TypeFormat::Bool | TypeFormat::Void => Family::Int,
    }
}

fn return_kind_of(ty: &TypeSymbol) -> ReturnKind {
    match family_of(ty) {
        Family::Float => ReturnKind::Float,
        Family::Pointer => ReturnKind::Pointer,
        Family::Int => ReturnKind::Int,
    }
}

fn seed_builtins() -> FxHashMap<Symbol, Rc<SemSymbol>> {
    let defs = [
        (TY_INT8, PrimitiveType::Int8, 1u32, TypeFormat::Int),
        (TY_INT32, PrimitiveType::Int32, 4u32, TypeFormat::Int),
        (TY_FLOAT32, PrimitiveType::Float32, 4u32, TypeFormat::Float),
        (TY_BOOL, PrimitiveType::Bool, 1u32, TypeFormat::Bool),
        (TY_STRING, PrimitiveType::String, 0u32, TypeFormat::Pointer),
    ];
    defs.into_iter()
        .map(|(name, primitive, size_bytes, format)| {
            let symbol = Rc::new(SemSymbol::Type(TypeSymbol { name, primitive, size_bytes, format, access: AccessModifier::Public }));
            (name, symbol)
        })
        .collect()
}

struct Generator<'b, 'a, B: IrBuilder> {
    builder: &'b mut B,
    layout: &'a Layout,
    handler: &'a Handler,
    registers: RegisterTable<B::Value>,
    builtins: FxHashMap<Symbol, Rc<SemSymbol>>,
    current_spec: Option<Symbol>,
    return_kind: ReturnKind,
}

impl<'b, 'a, B: IrBuilder> Generator<'b, 'a, B> {
    fn new(builder: &'b mut B, layout: &'a Layout, handler: &'a Handler) -> Self {
        Generator {
            builder,
            layout,
            handler,
            registers: RegisterTable::new(),
            builtins: seed_builtins(),
            current_spec: None,
            return_kind: ReturnKind::Int,
        }
    }

    fn builtin(&self, name: Symbol) -> Rc<SemSymbol> {
        self.builtins.get(&name).expect("builtin types are seeded at construction").clone()
    }

    // -- Top-level emission ------------------------------------------------

    fn emit_spec(&mut self, spec: &Node, target: &mut Module<B::Fragment>) {
        let spec_name = spec.child(1).symbol_value();
        let self_type = spec.child(1).symbol().expect("spec type resolved by semantic analysis").clone();
        self.current_spec = Some(spec_name);

        let properties_idx =
            spec.children().iter().position(|c| c.rule() == NodeRule::Properties).expect("spec has Properties");
        let functions_idx =
            spec.children().iter().position(|c| c.rule() == NodeRule::Functions).expect("spec has Functions");

        let properties = spec.child(properties_idx);
        for i in 0..properties.child_count() {
            let property = properties.child(i);
            let prop_name = property.child(1).symbol_value();
            for child_idx in 2..property.child_count() {
                let prop_fn = property.child(child_idx);
                if prop_fn.child_count() < 2 {
                    continue; // abstract accessor: no body, nothing to emit.
                }
                self.emit_property_fn(prop_fn, spec_name, prop_name, self_type.clone(), target);
            }
        }

        let functions = spec.child(functions_idx);
        for i in 0..functions.child_count() {
            self.emit_function(functions.child(i), Some(self_type.clone()), target);
        }

        self.current_spec = None;
    }

    fn emit_property_fn(
        &mut self,
        prop_fn: &Node,
        spec_name: Symbol,
        prop_name: Symbol,
        self_type: Rc<SemSymbol>,
        target: &mut Module<B::Fragment>,
    ) {
        let is_getter = prop_fn.is_getter();
        let mangled = Symbol::intern(&mangle::mangle_property(spec_name.as_str(), prop_name.as_str(), is_getter));
        let prop = self.layout.property(spec_name, prop_name).expect("property reserved by prescan").clone();
        let expected_slot = self.layout.function_slot(mangled).expect("accessor reserved by prescan");

        let (args, this) = self.builder.begin_function(mangled, true);
        let this = this.expect("property accessor always takes a self pointer");
        self.registers = RegisterTable::new();
        self.registers
            .put(
                Symbol::intern(&mangle::mangle_local("this")),
                RegisterEntry { type_symbol: self_type, base: this, offset: 0, kind: RegKind::Direct },
            )
            .expect("fresh register table has no 'this' binding yet");

        self.return_kind = return_kind_of(prop.type_symbol.type_symbol());

        if !is_getter {
            // The setter's sole implicit parameter lives in the args buffer
            // at offset 0, same as any other single-parameter function.
            self.registers
                .put(
                    Symbol::intern(&mangle::mangle_local("value")),
                    RegisterEntry { type_symbol: prop.type_symbol.clone(), base: args, offset: 0, kind: RegKind::Memory },
                )
                .expect("fresh register table has no 'value' binding yet");
        }

        let body = prop_fn.child(1);
        self.walk_block(body);

        let zero = self.zero_value(self.return_kind);
        self.emit_return_kind(self.return_kind, zero);

        let fragment = self.builder.end_function();
        let idx = target.push_record(mangled, fragment);
        assert_eq!(idx, expected_slot, "prescan/emission slot mismatch for '{}'", mangled.as_str());
    }

    fn emit_function(&mut self, func: &Node, self_type: Option<Rc<SemSymbol>>, target: &mut Module<B::Fragment>) {
        let is_ctor = func.child_count() == 4;
        let (params_idx, block_idx) = if is_ctor { (2, 3) } else { (3, 4) };

        let symbol = func.symbol().expect("function signature resolved by semantic analysis").clone();
        let mangled = match symbol.as_ref() {
            SemSymbol::Function(f) => f.mangled_name,
            _ => unreachable!("function node annotated with a non-function symbol"),
        };
        let expected_slot = self.layout.function_slot(mangled).expect("function reserved by prescan");
        let has_self = self_type.is_some();

        let (args, this) = self.builder.begin_function(mangled, has_self);
        self.registers = RegisterTable::new();
        if let (Some(self_type), Some(this)) = (self_type, this) {
            self.registers
                .put(
                    Symbol::intern(&mangle::mangle_local("this")),
                    RegisterEntry { type_symbol: self_type, base: this, offset: 0, kind: RegKind::Direct },
                )
                .expect("fresh register table has no 'this' binding yet");
        }

        self.return_kind = return_kind_of(symbol.type_symbol());

        let params = func.child(params_idx);
        let mut offset: i32 = 0;
        for i in 0..params.child_count() {
            let param = params.child(i);
            let param_name = param.child(1).symbol_value();
            let param_type = param.child(0).symbol().expect("parameter type resolved by semantic analysis").clone();
            let width = layout::width_of(&param_type);
            let mangled_param = Symbol::intern(&mangle::mangle_local(param_name.as_str()));
            self.registers
                .put(mangled_param, RegisterEntry { type_symbol: param_type, base: args, offset, kind: RegKind::Memory })
                .expect("duplicate parameters are rejected by semantic analysis");
            offset += width as i32;
        }

        let body = func.child(block_idx);
        self.walk_block(body);

        let zero = self.zero_value(self.return_kind);
        self.emit_return_kind(self.return_kind, zero);

        let fragment = self.builder.end_function();
        let idx = target.push_record(mangled, fragment);
        assert_eq!(idx, expected_slot, "prescan/emission slot mismatch for '{}'", mangled.as_str());
    }

    // -- Statements ---------------------------------------------------------

    fn walk_block(&mut self, block: &Node) {
        self.registers.push();
        for i in 0..block.child_count() {
            self.walk_stmt(block.child(i));
        }
        let _ = self.registers.pop();
    }

    fn walk_stmt(&mut self, stmt: &Node) {
        match stmt.rule() {
            NodeRule::Block => self.walk_block(stmt),
            NodeRule::If => self.lower_if(stmt),
            NodeRule::For => self.lower_for(stmt),
            NodeRule::Return => self.lower_return(stmt),
            NodeRule::Assign => {
                self.lower_assign(stmt);
            }
            _ => {
                self.eval_expr(stmt);
            }
        }
    }

    fn lower_if(&mut self, node: &Node) {
        let (cond, _) = self.eval_expr(node.child(0));
        let one = self.builder.const_int(1);
        let inverted = self.builder.xor(cond, one);
        let else_label = self.builder.new_label();
        self.builder.jump_if_true(inverted, else_label);
        self.walk_block(node.child(1));

        if node.child_count() == 3 {
            let end_label = self.builder.new_label();
            self.builder.jump(end_label);
            self.builder.bind_label(else_label);
            match node.child(2).rule() {
                NodeRule::If => self.lower_if(node.child(2)),
                _ => self.walk_block(node.child(2)),
            }
            self.builder.bind_label(end_label);
        } else {
            self.builder.bind_label(else_label);
        }
    }

    fn lower_for(&mut self, node: &Node) {
        self.registers.push();

        let init = node.child(0);
        if init.child_count() == 1 {
            self.eval_expr(init.child(0));
        }

        let cond_label = self.builder.new_label();
        let end_label = self.builder.new_label();
        self.builder.bind_label(cond_label);

        let cond = node.child(1);
        if cond.child_count() == 1 {
            let (value, _) = self.eval_expr(cond.child(0));
            let one = self.builder.const_int(1);
            let inverted = self.builder.xor(value, one);
            self.builder.jump_if_true(inverted, end_label);
        }

        self.walk_block(node.child(3));

        let update = node.child(2);
        if update.child_count() == 1 {
            self.eval_expr(update.child(0));
        }

        self.builder.jump(cond_label);
        self.builder.bind_label(end_label);

        let _ = self.registers.pop();
    }

    fn lower_return(&mut self, node: &Node) {
        if node.child_count() == 0 {
            let zero = self.zero_value(self.return_kind);
            self.emit_return_kind(self.return_kind, zero);
            return;
        }
        let (value, _) = self.eval_expr(node.child(0));
        self.emit_return_kind(self.return_kind, value);
    }

    // -- Assignment -----------------------------------------------------------

    /// The bare-assignment three-branch rule: reuse the innermost frame's
    /// binding if one already exists there; else reuse an outer binding of
    /// the same type; else allocate a fresh stack slot in the innermost
    /// frame. Returns the assigned value, since `Assign` may also appear as
    /// an ordinary expression.
    fn lower_assign(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let lhs = node.child(0);
        let rhs = node.child(1);
        match lhs.rule() {
            NodeRule::SymbolRef => self.lower_variable_assign(lhs, rhs),
            NodeRule::Member => self.lower_member_assign(lhs, rhs),
            other => unreachable!("{:?} cannot appear as an assignment target", other),
        }
    }

    fn lower_variable_assign(&mut self, lhs: &Node, rhs: &Node) -> (B::Value, Rc<SemSymbol>) {
        let name = lhs.symbol_value();
        let mangled = Symbol::intern(&mangle::mangle_local(name.as_str()));
        let (value, ty) = self.eval_expr(rhs);

        if let Some(top) = self.registers.get_top_only(mangled) {
            self.store_entry(&top, value);
            return (value, ty);
        }
        if let Some(outer) = self.registers.get(mangled) {
            if types::types_match(outer.type_symbol.type_symbol(), ty.type_symbol()) {
                self.store_entry(&outer, value);
                return (value, ty);
            }
        }

        let width = layout::width_of(&ty);
        let slot = self.builder.alloca();
        self.builder.resize_alloca(slot, width);
        self.store_typed(ty.type_symbol(), slot, 0, value);
        self.registers.put_force(mangled, RegisterEntry { type_symbol: ty.clone(), base: slot, offset: 0, kind: RegKind::Memory });
        (value, ty)
    }

    fn lower_member_assign(&mut self, lhs: &Node, rhs: &Node) -> (B::Value, Rc<SemSymbol>) {
        let obj_expr = lhs.child(0);
        let field_name = lhs.child(1).symbol_value();
        let (obj_ptr, obj_ty) = self.eval_expr(obj_expr);
        let (value, ty) = self.eval_expr(rhs);

        let spec_name = Symbol::intern(mangle::base_spec_name(obj_ty.type_symbol().name.as_str()));
        let prop = self.layout.property(spec_name, field_name).expect("property resolved by semantic analysis").clone();
        self.store_typed(prop.type_symbol.type_symbol(), obj_ptr, prop.offset, value);
        (value, ty)
    }

    fn store_entry(&mut self, entry: &RegisterEntry<B::Value>, value: B::Value) {
        match entry.kind {
            RegKind::Memory => {
                let ty = entry.type_symbol.type_symbol().clone();
                self.store_typed(&ty, entry.base, entry.offset, value);
            }
            RegKind::Direct => unreachable!("'this' is never a reassignment target"),
        }
    }

    // -- Expressions ----------------------------------------------------------

    fn eval_expr(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        match node.rule() {
            NodeRule::Expression => self.eval_expr(node.child(0)),
            NodeRule::Assign => self.lower_assign(node),
            NodeRule::LogOr => self.lower_logical(node, true),
            NodeRule::LogAnd => self.lower_logical(node, false),
            NodeRule::LogNot => self.lower_lognot(node),
            NodeRule::Equals => self.lower_compare(node, CompareOp::Eq),
            NodeRule::NotEquals => self.lower_compare(node, CompareOp::Ne),
            NodeRule::Less => self.lower_compare(node, CompareOp::Lt),
            NodeRule::LessEquals => self.lower_compare(node, CompareOp::Le),
            NodeRule::Greater => self.lower_compare(node, CompareOp::Gt),
            NodeRule::GreaterEquals => self.lower_compare(node, CompareOp::Ge),
            NodeRule::Add => self.lower_add(node),
            NodeRule::Sub if node.child(0).rule() == NodeRule::AnyType => self.lower_negate(node),
            NodeRule::Sub | NodeRule::Mul | NodeRule::Div | NodeRule::Mod => self.lower_arith(node),
            NodeRule::Member => self.lower_member_get(node),
            NodeRule::Call => self.lower_call(node),
            NodeRule::New => self.lower_new(node),
            NodeRule::Default => self.lower_default(node),
            NodeRule::SymbolRef => self.lower_symbol_ref(node),
            NodeRule::BoolLiteral => (self.builder.const_int(node.bool_value() as i32), self.builtin(TY_BOOL)),
            NodeRule::IntLiteral => (self.builder.const_int(node.int_value()), self.builtin(TY_INT32)),
            NodeRule::FloatLiteral => (self.builder.const_float(node.float_value() as f32), self.builtin(TY_FLOAT32)),
            NodeRule::CharLiteral => (self.builder.const_int(node.char_value() as i32), self.builtin(TY_INT8)),
            NodeRule::StringLiteral => self.lower_string_literal(node),
            other => unreachable!("{:?} cannot appear as an expression", other),
        }
    }

    fn lower_string_literal(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        DiagnosticBuilder::error("string literals cannot yet reach IR generation")
            .code(ErrorCode::IllegalState)
            .span(Span::point(node.line(), node.column()))
            .emit(self.handler);
        (self.builder.const_null(), self.builtin(TY_STRING))
    }

    fn lower_logical(&mut self, node: &Node, is_or: bool) -> (B::Value, Rc<SemSymbol>) {
        let (lhs, _) = self.eval_expr(node.child(0));

        let result = self.builder.alloca();
        self.builder.resize_alloca(result, 1);
        self.builder.store_i8(result, 0, lhs);

        let end_label = self.builder.new_label();
        let short_circuit_cond = if is_or {
            lhs
        } else {
            let one = self.builder.const_int(1);
            self.builder.xor(lhs, one)
        };
        self.builder.jump_if_true(short_circuit_cond, end_label);

        let (rhs, _) = self.eval_expr(node.child(1));
        self.builder.store_i8(result, 0, rhs);

        self.builder.bind_label(end_label);
        let value = self.builder.load_i8(result, 0);
        (value, self.builtin(TY_BOOL))
    }

    fn lower_lognot(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let (operand, _) = self.eval_expr(node.child(0));
        let one = self.builder.const_int(1);
        (self.builder.xor(operand, one), self.builtin(TY_BOOL))
    }

    fn lower_compare(&mut self, node: &Node, op: CompareOp) -> (B::Value, Rc<SemSymbol>) {
        let (lhs, lty) = self.eval_expr(node.child(0));
        let (rhs, _) = self.eval_expr(node.child(1));
        let value = match family_of(lty.type_symbol()) {
            Family::Float => self.builder.cmp_f(op, lhs, rhs),
            Family::Pointer => self.builder.cmp_p(op, lhs, rhs),
            Family::Int => self.builder.cmp_i(op, lhs, rhs),
        };
        (value, self.builtin(TY_BOOL))
    }

    fn lower_add(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let (lhs, lty) = self.eval_expr(node.child(0));
        let (rhs, _) = self.eval_expr(node.child(1));
        let value = match family_of(lty.type_symbol()) {
            Family::Int => self.builder.add_i(lhs, rhs),
            Family::Float => self.builder.add_f(lhs, rhs),
            Family::Pointer => {
                DiagnosticBuilder::error("string concatenation is not yet implemented")
                    .code(ErrorCode::NotImplemented)
                    .span(Span::point(node.line(), node.column()))
                    .emit(self.handler);
                self.builder.const_null()
            }
        };
        (value, lty)
    }

    fn lower_arith(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let (lhs, lty) = self.eval_expr(node.child(0));
        let (rhs, _) = self.eval_expr(node.child(1));
        let is_float = family_of(lty.type_symbol()) == Family::Float;
        let value = match (node.rule(), is_float) {
            (NodeRule::Sub, false) => self.builder.sub_i(lhs, rhs),
            (NodeRule::Sub, true) => self.builder.sub_f(lhs, rhs),
            (NodeRule::Mul, false) => self.builder.mul_i(lhs, rhs),
            (NodeRule::Mul, true) => self.builder.mul_f(lhs, rhs),
            (NodeRule::Div, false) => self.builder.div_i(lhs, rhs),
            (NodeRule::Div, true) => self.builder.div_f(lhs, rhs),
            (NodeRule::Mod, false) => self.builder.mod_i(lhs, rhs),
            (NodeRule::Mod, true) => {
                let helper = self.builder.native_float_mod();
                let result = self.builder.call_indirect(helper, &[lhs, rhs], CallInfo::new(ReturnKind::Float, false));
                self.builder.regfence();
                result
            }
            _ => unreachable!("non-arithmetic rule reached lower_arith"),
        };
        (value, lty)
    }

    /// `Sub[AnyType, operand]`: the parser's placeholder shape for unary
    /// minus. `0 - operand`, selected by the operand's own family.
    fn lower_negate(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let (operand, ty) = self.eval_expr(node.child(1));
        let value = match family_of(ty.type_symbol()) {
            Family::Float => {
                let zero = self.builder.const_float(0.0);
                self.builder.sub_f(zero, operand)
            }
            _ => {
                let zero = self.builder.const_int(0);
                self.builder.sub_i(zero, operand)
            }
        };
        (value, ty)
    }

    fn lower_member_get(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let (obj_ptr, obj_ty) = self.eval_expr(node.child(0));
        let field_name = node.child(1).symbol_value();
        let spec_name = Symbol::intern(mangle::base_spec_name(obj_ty.type_symbol().name.as_str()));
        let prop = self.layout.property(spec_name, field_name).expect("property resolved by semantic analysis").clone();
        let value = self.load_typed(&prop.type_symbol.type_symbol().clone(), obj_ptr, prop.offset);
        (value, prop.type_symbol)
    }

    /// A bare name: a local/parameter/`this` register read, or - when no
    /// such binding exists - an implicit `this.<name>` property get.
    fn lower_symbol_ref(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let name = node.symbol_value();
        let mangled = Symbol::intern(&mangle::mangle_local(name.as_str()));
        if let Some(entry) = self.registers.get(mangled) {
            let value = self.read_entry(&entry);
            return (value, entry.type_symbol);
        }

        let spec_name = self.current_spec.expect("implicit property access only occurs inside a spec member");
        let this_entry =
            self.registers.get(Symbol::intern(&mangle::mangle_local("this"))).expect("spec member always binds 'this'");
        let this_value = self.read_entry(&this_entry);
        let prop = self.layout.property(spec_name, name).expect("property resolved by semantic analysis").clone();
        let value = self.load_typed(&prop.type_symbol.type_symbol().clone(), this_value, prop.offset);
        (value, prop.type_symbol)
    }

    fn lower_call(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let symbol = node.symbol().expect("call resolved by semantic analysis").clone();
        if let SemSymbol::Type(_) = symbol.as_ref() {
            return self.lower_cast(node, symbol);
        }

        let (mangled, return_type) = match symbol.as_ref() {
            SemSymbol::Function(f) => (f.mangled_name, f.return_type.clone()),
            _ => unreachable!("call target resolved to neither a function nor a type"),
        };
        let slot = self.layout.function_slot(mangled).expect("callee reserved by prescan");
        let callee = self.builder.function_ref(slot);

        let params = node.child(1);
        let mut args: Vec<B::Value> = (0..params.child_count()).map(|i| self.eval_expr(params.child(i)).0).collect();

        let has_self = node.child(0).rule() == NodeRule::Member;
        if has_self {
            let member = node.child(0);
            let (obj_ptr, _) = self.eval_expr(member.child(0));
            args.insert(0, obj_ptr);
        }

        let return_kind = return_kind_of(return_type.type_symbol());
        let result = self.builder.call_indirect(callee, &args, CallInfo::new(return_kind, has_self));
        self.builder.regfence();
        (result, return_type)
    }

    /// A function-call-like typecast `T(x)`. The register representation
    /// already reconciles every primitive family (bool/int8/int32 share the
    /// same integer register shape; float32 is the only float shape), so
    /// the cast is a pass-through of the operand's value under the target
    /// type.
    fn lower_cast(&mut self, node: &Node, target_type: Rc<SemSymbol>) -> (B::Value, Rc<SemSymbol>) {
        let params = node.child(1);
        let (value, _) = self.eval_expr(params.child(0));
        (value, target_type)
    }

    fn lower_new(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let ty = node.child(0).symbol().expect("type resolved by semantic analysis").clone();
        let base_name = Symbol::intern(mangle::base_spec_name(ty.type_symbol().name.as_str()));

        let params = node.child(1);
        let mut args = Vec::with_capacity(params.child_count());
        let mut arg_names = Vec::with_capacity(params.child_count());
        for i in 0..params.child_count() {
            let (value, arg_ty) = self.eval_expr(params.child(i));
            args.push(value);
            arg_names.push(arg_ty.name());
        }

        let size = self.layout.spec_size(base_name);
        let alloc_fn = self.builder.native_alloc();
        let size_value = self.builder.const_int(size as i32);
        let instance = self.builder.call_indirect(alloc_fn, &[size_value], CallInfo::new(ReturnKind::Pointer, false));
        self.builder.regfence();

        let mangled = Symbol::intern(&mangle::mangle_constructor(base_name.as_str(), &arg_names));
        let slot = self.layout.function_slot(mangled).expect("constructor reserved by prescan");
        let callee = self.builder.function_ref(slot);
        let mut ctor_args = Vec::with_capacity(args.len() + 1);
        ctor_args.push(instance);
        ctor_args.extend(args);
        self.builder.call_indirect(callee, &ctor_args, CallInfo::new(ReturnKind::Pointer, true));
        self.builder.regfence();

        (instance, ty)
    }

    fn lower_default(&mut self, node: &Node) -> (B::Value, Rc<SemSymbol>) {
        let ty = node.child(0).symbol().expect("type resolved by semantic analysis").clone();
        let value = match family_of(ty.type_symbol()) {
            Family::Float => self.builder.const_float(0.0),
            Family::Pointer => self.builder.const_null(),
            Family::Int => self.builder.const_int(0),
        };
        (value, ty)
    }

    // -- Typed load/store helpers ----------------------------------------------

    fn load_typed(&mut self, ty: &TypeSymbol, ptr: B::Value, offset: i32) -> B::Value {
        match ty.primitive {
            PrimitiveType::Int8 | PrimitiveType::Bool => self.builder.load_i8(ptr, offset),
            PrimitiveType::Int32 => self.builder.load_i32(ptr, offset),
            PrimitiveType::Float32 => self.builder.load_f32(ptr, offset),
            PrimitiveType::String | PrimitiveType::Pointer => self.builder.load_p(ptr, offset),
            PrimitiveType::Void => self.builder.const_int(0),
        }
    }

    fn store_typed(&mut self, ty: &TypeSymbol, ptr: B::Value, offset: i32, value: B::Value) {
        match ty.primitive {
            PrimitiveType::Int8 | PrimitiveType::Bool => self.builder.store_i8(ptr, offset, value),
            PrimitiveType::Int32 => self.builder.store_i32(ptr, offset, value),
            PrimitiveType::Float32 => self.builder.store_f32(ptr, offset, value),
            PrimitiveType::String | PrimitiveType::Pointer => self.builder.store_p(ptr, offset, value),
            PrimitiveType::Void => {}
        }
    }

    fn read_entry(&mut self, entry: &RegisterEntry<B::Value>) -> B::Value {
        match entry.kind {
            RegKind::Direct => entry.base,
            RegKind::Memory => {
                let ty = entry.type_symbol.type_symbol().clone();
                self.load_typed(&ty, entry.base, entry.offset)
            }
        }
    }

    fn zero_value(&mut self, kind: ReturnKind) -> B::Value {
        match kind {
            ReturnKind::Int => self.builder.const_int(0),
            ReturnKind::Float => self.builder.const_float(0.0),
            ReturnKind::Pointer => self.builder.const_null(),
        }
    }

    fn emit_return_kind(&mut self, kind: ReturnKind, value: B::Value) {
        match kind {
            ReturnKind::Int => self.builder.ret_i(value),
            ReturnKind::Float => self.builder.ret_f(value),
            ReturnKind::Pointer => self.builder.ret_p(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{IrOp, RecordingIrBuilder};
    use gsc_util::Handler;

    fn compiled(src: &str) -> (Module<crate::recording::IrFragment>, Handler) {
        let handler = Handler::new();
        let mut parser = gsc_par::Parser::new(gsc_lex::StringSource::new(src), &handler);
        let mut module = parser.parse();
        gsc_sem::analyze(&mut module, &handler);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());

        let mut builder = RecordingIrBuilder::new();
        let mut target = Module::new();
        generate(&module, &mut builder, &mut target, &handler);
        (target, handler)
    }

    fn fragment<'a>(module: &'a Module<crate::recording::IrFragment>, mangled: &str) -> &'a crate::recording::IrFragment {
        &module.records().iter().find(|r| r.name.eq_str(mangled)).expect("fragment recorded").fragment
    }

    #[test]
    fn test_simple_function_ends_with_safety_floor_return() {
        let (module, _handler) = compiled(r#"package "test"; public int32 main() { return 1; }"#);
        let frag = fragment(&module, "::main");
        assert!(matches!(frag.ops.last().unwrap(), IrOp::RetI(_)));
        assert_eq!(frag.ops.iter().filter(|op| matches!(op, IrOp::RetI(_))).count(), 2);
    }

    #[test]
    fn test_assignment_reuses_top_frame_slot_on_second_write() {
        let (module, _handler) = compiled(
            r#"
            package "test";
            public int32 main() {
                x <- 1;
                x <- 2;
                return x;
            }
            "#,
        );
        let frag = fragment(&module, "::main");
        let alloca_count = frag.ops.iter().filter(|op| matches!(op, IrOp::Alloca(_))).count();
        assert_eq!(alloca_count, 1, "second assignment to 'x' must reuse its existing slot: {:?}", frag.ops);
    }

    #[test]
    fn test_if_else_emits_two_labels_and_a_join_jump() {
        let (module, _handler) = compiled(
            r#"
            package "test";
            public int32 main() {
                if (true) {
                    return 1;
                } else {
                    return 2;
                }
            }
            "#,
        );
        let frag = fragment(&module, "::main");
        let label_count = frag.ops.iter().filter(|op| matches!(op, IrOp::Label(_))).count();
        assert_eq!(label_count, 2);
        assert!(frag.ops.iter().any(|op| matches!(op, IrOp::Jump(_))));
    }

    #[test]
    fn test_for_loop_binds_cond_and_end_labels() {
        let (module, _handler) = compiled(
            r#"
            package "test";
            public int32 main() {
                for (x <- 0; x < 10; x <- x + 1) { }
                return 0;
            }
            "#,
        );
        let frag = fragment(&module, "::main");
        assert_eq!(frag.ops.iter().filter(|op| matches!(op, IrOp::Label(_))).count(), 2);
        assert!(frag.ops.iter().any(|op| matches!(op, IrOp::CmpI(_, CompareOp::Lt, _, _))));
    }

    #[test]
    fn test_property_get_and_set_are_direct_loads_and_stores() {
        let (module, _handler) = compiled(
            r#"
            package "test";
            public spec Point {
                int32 x { public get; public set; }
                public construct() { }
                public int32 bump() {
                    this.x <- this.x + 1;
                    return this.x;
                }
            }
            "#,
        );
        let frag = fragment(&module, "Point::bump");
        assert!(frag.ops.iter().any(|op| matches!(op, IrOp::LoadI32(_, _, 0))));
        assert!(frag.ops.iter().any(|op| matches!(op, IrOp::StoreI32(_, 0, _))));
        // no call should be needed to read or write a property
        assert!(!frag.ops.iter().any(|op| matches!(op, IrOp::CallIndirect(..))));
    }

    #[test]
    fn test_new_lowers_to_alloc_then_constructor_call() {
        let (module, _handler) = compiled(
            r#"
            package "test";
            public spec Point {
                int32 x { public get; public set; }
                public construct() { }
            }
            public Point main() {
                return new Point();
            }
            "#,
        );
        let frag = fragment(&module, "::main");
        let calls: Vec<&IrOp> = frag.ops.iter().filter(|op| matches!(op, IrOp::CallIndirect(..))).collect();
        assert_eq!(calls.len(), 2, "expected one alloc call and one constructor call: {:?}", frag.ops);
        assert!(matches!(calls[0], IrOp::CallIndirect(_, _, _, info) if !info.has_self));
        assert!(matches!(calls[1], IrOp::CallIndirect(_, _, _, info) if info.has_self));
    }

    #[test]
    fn test_string_literal_reports_illegal_state() {
        let (_module, handler) = compiled(
            r#"
            package "test";
            public string main() { return "hi"; }
            "#,
        );
        assert!(handler.has_errors());
        assert!(handler.diagnostics().iter().any(|d| d.code == Some(ErrorCode::IllegalState)));
    }

    #[test]
    fn test_generate_twice_rejects_the_second_call() {
        let handler = Handler::new();
        let mut parser = gsc_par::Parser::new(gsc_lex::StringSource::new(r#"package "test"; public int32 main() { return 0; }"#), &handler);
        let mut module = parser.parse();
        gsc_sem::analyze(&mut module, &handler);
        let mut builder = RecordingIrBuilder::new();
        let mut target = Module::new();
        assert!(generate(&module, &mut builder, &mut target, &handler));
        assert!(!generate(&module, &mut builder, &mut target, &handler));
        assert!(handler.diagnostics().iter().any(|d| d.code == Some(ErrorCode::IrInvalidCall)));
    }
}
