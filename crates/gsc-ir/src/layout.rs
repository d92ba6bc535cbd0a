//! Prescan data the generator needs before it can emit a single body:
//! each spec's instance size and per-property byte offset, and the
//! function-pointer-table slot every function/property accessor occupies.
//!
//! Pointers always occupy [`POINTER_SIZE_BYTES`]; this crate never reaches
//! real hardware, so the width is a fixed convention rather than a
//! target-specific fact.

use std::rc::Rc;

use gsc_par::{Node, NodeRule, PrimitiveType, SemSymbol};
use gsc_sem::mangle;
use gsc_util::{FxHashMap, Symbol};

pub const POINTER_SIZE_BYTES: u32 = 8;

/// Byte width of the value a symbol's type denotes.
pub fn width_of(symbol: &SemSymbol) -> u32 {
    let ty = symbol.type_symbol();
    match ty.primitive {
        PrimitiveType::Int8 | PrimitiveType::Bool => 1,
        PrimitiveType::Int32 => 4,
        PrimitiveType::Float32 => 4,
        PrimitiveType::Void => 0,
        PrimitiveType::String | PrimitiveType::Pointer => POINTER_SIZE_BYTES,
    }
}

#[derive(Clone)]
pub struct PropertyLayout {
    pub offset: i32,
    pub type_symbol: Rc<SemSymbol>,
}

pub struct Layout {
    spec_sizes: FxHashMap<Symbol, u32>,
    properties: FxHashMap<(Symbol, Symbol), PropertyLayout>,
    function_slots: FxHashMap<Symbol, usize>,
    slot_count: usize,
}

impl Layout {
    fn new() -> Self {
        Layout {
            spec_sizes: FxHashMap::default(),
            properties: FxHashMap::default(),
            function_slots: FxHashMap::default(),
            slot_count: 0,
        }
    }

    pub fn spec_size(&self, spec: Symbol) -> u32 {
        self.spec_sizes.get(&spec).copied().unwrap_or(0)
    }

    pub fn property(&self, spec: Symbol, name: Symbol) -> Option<&PropertyLayout> {
        self.properties.get(&(spec, name))
    }

    pub fn function_slot(&self, mangled: Symbol) -> Option<usize> {
        self.function_slots.get(&mangled).copied()
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn reserve_slot(&mut self, mangled: Symbol) -> usize {
        let idx = self.slot_count;
        self.slot_count += 1;
        self.function_slots.insert(mangled, idx);
        idx
    }
}

/// Walks a semantically-analyzed module in the same order the generator's
/// emission pass walks it, assigning every function/property accessor its
/// function-pointer-table slot and every spec property its byte offset.
pub fn build(module: &Node) -> Layout {
    let mut layout = Layout::new();

    let specs_idx = module.children().iter().position(|c| c.rule() == NodeRule::Specs).expect("module has Specs");
    let functions_idx =
        module.children().iter().position(|c| c.rule() == NodeRule::Functions).expect("module has Functions");

    let specs = module.child(specs_idx);
    for i in 0..specs.child_count() {
        build_spec(&mut layout, specs.child(i));
    }

    let functions = module.child(functions_idx);
    for i in 0..functions.child_count() {
        reserve_function_slot(&mut layout, functions.child(i));
    }

    layout
}

fn build_spec(layout: &mut Layout, spec: &Node) {
    let spec_name = spec.child(1).symbol_value();

    let properties_idx =
        spec.children().iter().position(|c| c.rule() == NodeRule::Properties).expect("spec has Properties");
    let functions_idx =
        spec.children().iter().position(|c| c.rule() == NodeRule::Functions).expect("spec has Functions");

    let mut offset: i32 = 0;
    let properties = spec.child(properties_idx);
    for i in 0..properties.child_count() {
        let property = properties.child(i);
        let prop_type = property.child(0).symbol().expect("property type resolved by semantic analysis").clone();
        let prop_name = property.child(1).symbol_value();
        let width = width_of(&prop_type);

        layout.properties.insert((spec_name, prop_name), PropertyLayout { offset, type_symbol: prop_type });
        offset += width as i32;

        for child_idx in 2..property.child_count() {
            let prop_fn = property.child(child_idx);
            if prop_fn.child_count() < 2 {
                continue; // abstract accessor: no body, no slot.
            }
            let is_getter = prop_fn.is_getter();
            let mangled = Symbol::intern(&mangle::mangle_property(spec_name.as_str(), prop_name.as_str(), is_getter));
            layout.reserve_slot(mangled);
        }
    }
    layout.spec_sizes.insert(spec_name, offset.max(0) as u32);

    let functions = spec.child(functions_idx);
    for i in 0..functions.child_count() {
        reserve_function_slot(layout, functions.child(i));
    }
}

fn reserve_function_slot(layout: &mut Layout, func: &Node) {
    let symbol = func.symbol().expect("function signature resolved by semantic analysis");
    if let SemSymbol::Function(f) = symbol.as_ref() {
        layout.reserve_slot(f.mangled_name);
    }
}
