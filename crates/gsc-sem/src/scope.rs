//! The symbol table: a stack of name-to-symbol frames.
//!
//! The bottom frame holds the builtin primitive types and lives for the
//! whole walk; every spec, function/property body, and block pushes one
//! frame of its own and pops it on the way back out. `get` walks the stack
//! top-down so an inner binding shadows an outer one of a different type;
//! `get_top_only` is used where shadowing must not happen (duplicate-name
//! checks within a single scope).

use std::rc::Rc;

use gsc_par::SemSymbol;
use gsc_util::{ErrorCode, FxHashMap, Symbol};

pub struct SymbolTable {
    frames: Vec<FxHashMap<Symbol, Rc<SemSymbol>>>,
}

impl SymbolTable {
    /// A fresh table with just the bottom frame.
    pub fn new() -> Self {
        SymbolTable {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Pops the top frame. Errs if called with only the bottom frame left.
    pub fn pop(&mut self) -> Result<(), ErrorCode> {
        if self.frames.len() <= 1 {
            return Err(ErrorCode::SymbolTableScopeUnderflow);
        }
        self.frames.pop();
        Ok(())
    }

    /// Binds `name` in the top frame. Errs on a duplicate within that frame.
    pub fn put(&mut self, name: Symbol, symbol: Rc<SemSymbol>) -> Result<(), ErrorCode> {
        let top = self.frames.last_mut().expect("bottom frame is never popped");
        if top.contains_key(&name) {
            return Err(ErrorCode::SymbolTableDuplicateBinding);
        }
        top.insert(name, symbol);
        Ok(())
    }

    /// Binds `name` in the bottom frame, for builtins seeded once up front.
    pub fn put_bottom(&mut self, name: Symbol, symbol: Rc<SemSymbol>) -> Result<(), ErrorCode> {
        let bottom = self.frames.first_mut().expect("bottom frame always exists");
        if bottom.contains_key(&name) {
            return Err(ErrorCode::SymbolTableDuplicateBinding);
        }
        bottom.insert(name, symbol);
        Ok(())
    }

    /// Searches frames top-down.
    pub fn get(&self, name: Symbol) -> Option<Rc<SemSymbol>> {
        self.frames.iter().rev().find_map(|frame| frame.get(&name).cloned())
    }

    /// Searches only the current (top) frame.
    pub fn get_top_only(&self, name: Symbol) -> Option<Rc<SemSymbol>> {
        self.frames.last().expect("bottom frame is never popped").get(&name).cloned()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard that pushes a frame on construction and pops it on drop, so a
/// `?`-propagated error partway through a scope can never leave the table
/// unbalanced.
pub struct ScopeGuard<'a> {
    table: &'a mut SymbolTable,
}

impl<'a> ScopeGuard<'a> {
    pub fn new(table: &'a mut SymbolTable) -> Self {
        table.push();
        ScopeGuard { table }
    }

    pub fn table(&mut self) -> &mut SymbolTable {
        self.table
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        let _ = self.table.pop();
    }
}
