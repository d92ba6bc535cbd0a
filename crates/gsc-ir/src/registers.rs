//! The register table: the IR generator's counterpart to
//! [`gsc_sem::SymbolTable`]'s stack-of-frames shape, except each binding
//! carries a base value and byte offset instead of a semantic symbol.
//!
//! Locals get a fresh stack [`RegKind::Memory`] slot at offset `0`;
//! parameters are [`RegKind::Memory`] slots into the incoming argument
//! buffer at their cumulative offset; `this` is a [`RegKind::Direct`]
//! binding, since the incoming `this` pointer is already a value and needs
//! no load to read. Frames push/pop exactly where the semantic walker's
//! scopes do, so a block's locals disappear when the block's braces close.

use std::rc::Rc;

use gsc_par::SemSymbol;
use gsc_util::{ErrorCode, FxHashMap, Symbol};

/// Whether reading this binding's value means using `base` directly, or
/// loading through it at `offset`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RegKind {
    /// `base` already holds the value (the incoming `this` pointer).
    Direct,
    /// `base` is a pointer; the value lives `offset` bytes into it.
    Memory,
}

#[derive(Clone, Debug)]
pub struct RegisterEntry<V> {
    pub type_symbol: Rc<SemSymbol>,
    pub base: V,
    pub offset: i32,
    pub kind: RegKind,
}

pub struct RegisterTable<V> {
    frames: Vec<FxHashMap<Symbol, RegisterEntry<V>>>,
}

impl<V: Clone> RegisterTable<V> {
    pub fn new() -> Self {
        RegisterTable { frames: vec![FxHashMap::default()] }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) -> Result<(), ErrorCode> {
        if self.frames.len() <= 1 {
            return Err(ErrorCode::SymbolTableScopeUnderflow);
        }
        self.frames.pop();
        Ok(())
    }

    pub fn put(&mut self, name: Symbol, entry: RegisterEntry<V>) -> Result<(), ErrorCode> {
        let top = self.frames.last_mut().expect("bottom frame is never popped");
        if top.contains_key(&name) {
            return Err(ErrorCode::SymbolTableDuplicateBinding);
        }
        top.insert(name, entry);
        Ok(())
    }

    /// Overwrites (or inserts) `name` in the top frame unconditionally,
    /// for the bare-assignment rule's "reuse this frame's existing slot"
    /// branch.
    pub fn put_force(&mut self, name: Symbol, entry: RegisterEntry<V>) {
        let top = self.frames.last_mut().expect("bottom frame is never popped");
        top.insert(name, entry);
    }

    pub fn get(&self, name: Symbol) -> Option<RegisterEntry<V>> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name).cloned())
    }

    pub fn get_top_only(&self, name: Symbol) -> Option<RegisterEntry<V>> {
        self.frames.last().expect("bottom frame is never popped").get(&name).cloned()
    }
}

impl<V: Clone> Default for RegisterTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard mirroring [`gsc_sem::ScopeGuard`]: pushes on construction,
/// pops on drop, so an error returned mid-scope can never leave the table
/// unbalanced.
pub struct RegisterScopeGuard<'a, V> {
    table: &'a mut RegisterTable<V>,
}

impl<'a, V: Clone> RegisterScopeGuard<'a, V> {
    pub fn new(table: &'a mut RegisterTable<V>) -> Self {
        table.push();
        RegisterScopeGuard { table }
    }

    pub fn table(&mut self) -> &mut RegisterTable<V> {
        self.table
    }
}

impl<V> Drop for RegisterScopeGuard<'_, V> {
    fn drop(&mut self) {
        let _ = self.table.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsc_lex::AccessModifier;
    use gsc_par::{PrimitiveType, TypeFormat, TypeSymbol};

    fn int_symbol() -> Rc<SemSymbol> {
        Rc::new(SemSymbol::Type(TypeSymbol {
            name: Symbol::intern_type("int32"),
            primitive: PrimitiveType::Int32,
            size_bytes: 4,
            format: TypeFormat::Int,
            access: AccessModifier::Public,
        }))
    }

    fn entry(base: u32) -> RegisterEntry<u32> {
        RegisterEntry { type_symbol: int_symbol(), base, offset: 0, kind: RegKind::Memory }
    }

    #[test]
    fn test_put_then_get_finds_the_binding() {
        let mut table = RegisterTable::new();
        let name = Symbol::intern("Local%%x");
        table.put(name, entry(1)).unwrap();
        assert_eq!(table.get(name).unwrap().base, 1);
    }

    #[test]
    fn test_outer_binding_visible_through_nested_frames() {
        let mut table: RegisterTable<u32> = RegisterTable::new();
        let name = Symbol::intern("Local%%x");
        table.put(name, entry(7)).unwrap();
        table.push();
        table.push();
        assert_eq!(table.get(name).unwrap().base, 7);
        assert!(table.get_top_only(name).is_none());
    }

    #[test]
    fn test_scope_guard_pops_on_drop() {
        let mut table: RegisterTable<u32> = RegisterTable::new();
        {
            let mut guard = RegisterScopeGuard::new(&mut table);
            guard.table().put(Symbol::intern("Local%%y"), entry(2)).unwrap();
            assert_eq!(table.depth(), 2);
        }
        assert_eq!(table.depth(), 1);
    }

    #[test]
    fn test_put_force_overwrites_same_frame_entry() {
        let mut table: RegisterTable<u32> = RegisterTable::new();
        let name = Symbol::intern("Local%%x");
        table.put(name, entry(1)).unwrap();
        table.put_force(name, entry(2));
        assert_eq!(table.get(name).unwrap().base, 2);
    }
}
