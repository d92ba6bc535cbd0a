//! The semantic walker: resolves names, checks types, and annotates every
//! AST node with the symbol its type-checking produced.
//!
//! Mirrors the parser's own two-pass shape. Spec type names are registered
//! globally before any spec is fully processed, so specs can reference each
//! other regardless of declaration order; within each spec, member
//! signatures are prescanned before any member body is walked, so members
//! can call each other regardless of order too.

use std::rc::Rc;

use gsc_lex::AccessModifier;
use gsc_par::{FunctionKind, FunctionSymbol, Node, NodeRule, PrimitiveType, SemSymbol, TypeFormat, TypeSymbol};
use gsc_util::symbol::{TY_ANY_TYPE, TY_BOOL, TY_FLOAT32, TY_INT32, TY_INT8, TY_STRING};
use gsc_util::{DiagnosticBuilder, ErrorCode, Handler, Span, Symbol};

use crate::mangle;
use crate::scope::{ScopeGuard, SymbolTable};
use crate::types;

/// Runs the semantic walker over a parsed module, annotating its nodes in
/// place. Errors are reported to `handler`; callers check
/// `handler.has_errors()` afterward rather than relying on a return value.
pub fn analyze(module: &mut Node, handler: &Handler) {
    let mut table = SymbolTable::new();
    let mut walker = SemanticWalker::new(handler);
    walker.seed_builtins(&mut table);
    walker.walk_module(&mut table, module);
}

struct SemanticWalker<'h> {
    handler: &'h Handler,
    current_spec: Option<Symbol>,
    return_type: Option<Rc<SemSymbol>>,
    in_setter: bool,
    error_symbol: Rc<SemSymbol>,
}

impl<'h> SemanticWalker<'h> {
    fn new(handler: &'h Handler) -> Self {
        let error_symbol = Rc::new(SemSymbol::Type(TypeSymbol {
            name: TY_ANY_TYPE,
            primitive: PrimitiveType::Void,
            size_bytes: 0,
            format: TypeFormat::Void,
            access: AccessModifier::Public,
        }));
        SemanticWalker {
            handler,
            current_spec: None,
            return_type: None,
            in_setter: false,
            error_symbol,
        }
    }

    fn error_at(&self, node: &Node, code: ErrorCode, message: impl Into<String>) {
        DiagnosticBuilder::error(message.into())
            .code(code)
            .span(Span::point(node.line(), node.column()))
            .emit(self.handler);
    }

    // -- Builtins ---------------------------------------------------------

    fn seed_builtins(&self, table: &mut SymbolTable) {
        let builtins = [
            (TY_INT8, PrimitiveType::Int8, 1u32, TypeFormat::Int),
            (TY_INT32, PrimitiveType::Int32, 4u32, TypeFormat::Int),
            (TY_FLOAT32, PrimitiveType::Float32, 4u32, TypeFormat::Float),
            (TY_BOOL, PrimitiveType::Bool, 1u32, TypeFormat::Bool),
            (TY_STRING, PrimitiveType::String, 0u32, TypeFormat::Pointer),
            // `void` has no reserved keyword of its own; it is an ordinary
            // name that happens to name the builtin no-value return type.
            (Symbol::intern("void"), PrimitiveType::Void, 0u32, TypeFormat::Void),
        ];
        for (name, primitive, size_bytes, format) in builtins {
            let symbol = Rc::new(SemSymbol::Type(TypeSymbol {
                name,
                primitive,
                size_bytes,
                format,
                access: AccessModifier::Public,
            }));
            table
                .put_bottom(name, symbol)
                .expect("builtin type names are interned once and never collide");
        }
    }

    fn builtin_ref(&self, table: &SymbolTable, name: Symbol) -> Rc<SemSymbol> {
        table.get(name).unwrap_or_else(|| self.error_symbol.clone())
    }

    // -- Module -------------------------------------------------------------

    fn walk_module(&mut self, table: &mut SymbolTable, module: &mut Node) {
        let package_name = module.child(0).symbol_value();
        if !Self::is_valid_package_name(package_name.as_str()) {
            self.error_at(
                module.child(0),
                ErrorCode::SemanticInvalidPackageName,
                format!("'{}' is not a valid package name", package_name.as_str()),
            );
        }

        let specs_idx = module
            .children()
            .iter()
            .position(|c| c.rule() == NodeRule::Specs)
            .expect("module always has a Specs container");
        let functions_idx = module
            .children()
            .iter()
            .position(|c| c.rule() == NodeRule::Functions)
            .expect("module always has a Functions container");

        self.prescan_spec_types(table, module.child_mut(specs_idx));

        let spec_count = module.child(specs_idx).child_count();
        for i in 0..spec_count {
            let specs_node = module.child_mut(specs_idx);
            let spec = specs_node.child_mut(i);
            self.walk_spec(table, spec);
        }

        let functions_node = module.child_mut(functions_idx);
        self.prescan_functions(table, None, functions_node);
        let fn_count = functions_node.child_count();
        for i in 0..fn_count {
            let func = module.child_mut(functions_idx).child_mut(i);
            self.walk_function_body(table, None, func);
        }
    }

    /// `([A-Za-z]+)(\.[A-Za-z]+)*`, matching the original source's package
    /// name validation.
    fn is_valid_package_name(name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        name.split('.').all(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphabetic()))
    }

    // -- Specs ----------------------------------------------------------------

    fn prescan_spec_types(&mut self, table: &mut SymbolTable, specs: &mut Node) {
        let count = specs.child_count();
        for i in 0..count {
            let spec = specs.child_mut(i);
            let access = spec.child(0).access_value();
            let type_node = spec.child(1);
            let name = type_node.symbol_value();
            let is_generic = type_node.child_count() > 0;
            let symbol = Rc::new(SemSymbol::Type(TypeSymbol {
                name,
                primitive: PrimitiveType::Pointer,
                size_bytes: 0,
                format: TypeFormat::Pointer,
                access,
            }));
            // Registered under the bare name so member bodies can resolve
            // `this` and the constructor's implicit return type; a generic
            // spec is additionally registered under its mangled template
            // name, which is what `resolve_type` looks up when computing a
            // fresh applied instantiation's access modifier.
            if table.put(name, symbol.clone()).is_err() {
                self.error_at(
                    spec.child(1),
                    ErrorCode::SemanticDuplicateDefinition,
                    format!("spec '{}' is already defined", name.as_str()),
                );
            }
            if is_generic {
                let template_name = Symbol::intern(&mangle::mangle_generic_template(name.as_str(), type_node.child_count()));
                let _ = table.put(template_name, symbol.clone());
            }
            spec.child_mut(1).set_symbol(symbol);
        }
    }

    fn walk_spec(&mut self, table: &mut SymbolTable, spec: &mut Node) {
        let spec_name = spec.child(1).symbol_value();
        let generic_param_count = spec.child(1).child_count();

        let mut guard = ScopeGuard::new(table);
        if generic_param_count > 0 {
            for i in 0..generic_param_count {
                let param_name = spec.child(1).child(i).symbol_value();
                let placeholder = Rc::new(SemSymbol::Type(TypeSymbol {
                    name: param_name,
                    primitive: PrimitiveType::Pointer,
                    size_bytes: 0,
                    format: TypeFormat::Pointer,
                    access: AccessModifier::Public,
                }));
                let _ = guard.table().put(param_name, placeholder);
            }
        }

        let properties_idx = spec
            .children()
            .iter()
            .position(|c| c.rule() == NodeRule::Properties)
            .expect("spec always has a Properties container");
        let functions_idx = spec
            .children()
            .iter()
            .position(|c| c.rule() == NodeRule::Functions)
            .expect("spec always has a Functions container");

        {
            let properties = spec.child_mut(properties_idx);
            self.prescan_properties(guard.table(), spec_name, properties);
        }
        {
            let functions = spec.child_mut(functions_idx);
            self.prescan_functions(guard.table(), Some(spec_name), functions);
        }

        let prop_count = spec.child(properties_idx).child_count();
        for i in 0..prop_count {
            let property = spec.child_mut(properties_idx).child_mut(i);
            self.walk_property_bodies(guard.table(), spec_name, property);
        }

        let fn_count = spec.child(functions_idx).child_count();
        for i in 0..fn_count {
            let func = spec.child_mut(functions_idx).child_mut(i);
            self.walk_function_body(guard.table(), Some(spec_name), func);
        }
    }

    // -- Types ----------------------------------------------------------------

    fn resolve_type(&mut self, table: &mut SymbolTable, ty_node: &mut Node) -> Rc<SemSymbol> {
        if ty_node.rule() == NodeRule::AnyType {
            // The parser already reported a syntax error for this node.
            return self.error_symbol.clone();
        }

        let base_name = ty_node.symbol_value();
        if ty_node.child_count() == 0 {
            let resolved = match table.get(base_name) {
                Some(sym) => sym,
                None => {
                    self.error_at(
                        ty_node,
                        ErrorCode::SemanticUndefinedSymbol,
                        format!("unknown type '{}'", base_name.as_str()),
                    );
                    self.error_symbol.clone()
                }
            };
            ty_node.set_symbol(resolved.clone());
            return resolved;
        }

        let mut arg_names = Vec::with_capacity(ty_node.child_count());
        for i in 0..ty_node.child_count() {
            let arg_symbol = self.resolve_type(table, ty_node.child_mut(i));
            arg_names.push(arg_symbol.name());
        }

        let applied_name = Symbol::intern(&mangle::mangle_generic_applied(base_name.as_str(), &arg_names));
        let resolved = if let Some(existing) = table.get(applied_name) {
            existing
        } else {
            let template_name = Symbol::intern(&mangle::mangle_generic_template(base_name.as_str(), arg_names.len()));
            let template_access = match table.get(template_name) {
                Some(t) => t.type_symbol().access,
                None => {
                    self.error_at(
                        ty_node,
                        ErrorCode::SemanticUndefinedSymbol,
                        format!("unknown generic spec '{}'", base_name.as_str()),
                    );
                    AccessModifier::Public
                }
            };
            let instance = Rc::new(SemSymbol::Type(TypeSymbol {
                name: applied_name,
                primitive: PrimitiveType::Pointer,
                size_bytes: 0,
                format: TypeFormat::Pointer,
                access: template_access,
            }));
            let _ = table.put_bottom(applied_name, instance.clone());
            instance
        };
        ty_node.set_symbol(resolved.clone());
        resolved
    }

    // -- Member/function signatures --------------------------------------

    fn prescan_properties(&mut self, table: &mut SymbolTable, spec_name: Symbol, properties: &mut Node) {
        let count = properties.child_count();
        for i in 0..count {
            let property = properties.child_mut(i);
            let prop_type = self.resolve_type(table, property.child_mut(0));
            let prop_name = property.child(1).symbol_value();

            for child_idx in 2..property.child_count() {
                let prop_fn = property.child(child_idx);
                let is_getter = prop_fn.is_getter();
                let access = prop_fn.child(0).access_value();
                let kind = if is_getter { FunctionKind::PropertyGetter } else { FunctionKind::PropertySetter };
                let mangled = Symbol::intern(&mangle::mangle_property(spec_name.as_str(), prop_name.as_str(), is_getter));
                let symbol = Rc::new(SemSymbol::Function(FunctionSymbol {
                    spec_name: Some(spec_name),
                    mangled_name: mangled,
                    param_types: Vec::new(),
                    return_type: prop_type.clone(),
                    access,
                    kind,
                }));
                if table.put(mangled, symbol).is_err() {
                    self.error_at(
                        property.child(child_idx),
                        ErrorCode::SemanticDuplicateDefinition,
                        format!(
                            "{} for '{}' is already defined",
                            if is_getter { "getter" } else { "setter" },
                            prop_name.as_str()
                        ),
                    );
                }
            }
        }
    }

    fn prescan_functions(&mut self, table: &mut SymbolTable, spec_name: Option<Symbol>, functions: &mut Node) {
        let count = functions.child_count();
        for i in 0..count {
            let func = functions.child_mut(i);
            self.register_function(table, spec_name, func);
        }
    }

    fn register_function(&mut self, table: &mut SymbolTable, spec_name: Option<Symbol>, func: &mut Node) {
        let is_ctor = func.child_count() == 4;
        let access = func.child(0).access_value();

        let (name_idx, params_idx, return_type) = if is_ctor {
            // Overwritten below with the enclosing spec's own type; this
            // placeholder is never observed.
            (1, 2, self.error_symbol.clone())
        } else {
            let ret = self.resolve_type(table, func.child_mut(1));
            (2, 3, ret)
        };

        let name = func.child(name_idx).symbol_value();
        let params_node = func.child_mut(params_idx);
        let param_count = params_node.child_count();
        let mut param_types = Vec::with_capacity(param_count);
        for i in 0..param_count {
            let param = params_node.child_mut(i);
            let ty = self.resolve_type(table, param.child_mut(0));
            param_types.push(ty);
        }
        let arg_names: Vec<Symbol> = param_types.iter().map(|t| t.name()).collect();

        let mangled = if is_ctor {
            let spec = spec_name.expect("a constructor is always a spec member");
            Symbol::intern(&mangle::mangle_constructor(spec.as_str(), &arg_names))
        } else {
            let spec_str = spec_name.map(|s| s.as_str());
            Symbol::intern(&mangle::mangle_function(spec_str, name.as_str(), &arg_names))
        };

        let return_type = if is_ctor {
            match spec_name.and_then(|s| table.get(s)) {
                Some(sym) => sym,
                None => return_type,
            }
        } else {
            return_type
        };

        let symbol = Rc::new(SemSymbol::Function(FunctionSymbol {
            spec_name,
            mangled_name: mangled,
            param_types,
            return_type,
            access,
            kind: FunctionKind::Function,
        }));

        if table.put(mangled, symbol.clone()).is_err() {
            self.error_at(
                func,
                ErrorCode::SemanticDuplicateDefinition,
                format!("'{}' is already defined with this signature", name.as_str()),
            );
        }
        func.set_symbol(symbol);
    }

    // -- Bodies ---------------------------------------------------------------

    fn walk_property_bodies(&mut self, table: &mut SymbolTable, spec_name: Symbol, property: &mut Node) {
        let prop_type = property.child(0).symbol().expect("prescanned by prescan_properties").clone();

        for child_idx in 2..property.child_count() {
            let is_getter = property.child(child_idx).is_getter();
            if property.child(child_idx).child_count() < 2 {
                continue; // bare `;` body: nothing to walk.
            }

            let mut guard = ScopeGuard::new(table);
            self.bind_this(guard.table(), spec_name);
            let prev_spec = self.current_spec.replace(spec_name);
            let prev_ret = self.return_type.replace(prop_type.clone());
            let prev_setter = self.in_setter;
            self.in_setter = !is_getter;
            if !is_getter {
                // A setter's implicit incoming value is bound under the
                // reserved name `value`, matching the original source.
                let value_mangled = Symbol::intern(&mangle::mangle_local("value"));
                let value_sym = Rc::new(SemSymbol::Function(FunctionSymbol {
                    spec_name: None,
                    mangled_name: value_mangled,
                    param_types: Vec::new(),
                    return_type: prop_type.clone(),
                    access: AccessModifier::Public,
                    kind: FunctionKind::Parameter,
                }));
                let _ = guard.table().put(value_mangled, value_sym);
            }

            let body = property.child_mut(child_idx).child_mut(1);
            self.walk_block(guard.table(), body);

            self.in_setter = prev_setter;
            self.return_type = prev_ret;
            self.current_spec = prev_spec;
        }
    }

    fn bind_this(&mut self, table: &mut SymbolTable, spec_name: Symbol) {
        let this_type = table.get(spec_name).unwrap_or_else(|| self.error_symbol.clone());
        let mangled = Symbol::intern(&mangle::mangle_local("this"));
        let symbol = Rc::new(SemSymbol::Function(FunctionSymbol {
            spec_name: Some(spec_name),
            mangled_name: mangled,
            param_types: Vec::new(),
            return_type: this_type,
            access: AccessModifier::Public,
            kind: FunctionKind::Parameter,
        }));
        let _ = table.put(mangled, symbol);
    }

    fn walk_function_body(&mut self, table: &mut SymbolTable, spec_name: Option<Symbol>, func: &mut Node) {
        let is_ctor = func.child_count() == 4;
        let (params_idx, block_idx) = if is_ctor { (2, 3) } else { (3, 4) };

        let return_type = func
            .symbol()
            .map(|s| s.type_symbol())
            .cloned()
            .map(|t| Rc::new(SemSymbol::Type(t)) as Rc<SemSymbol>)
            .unwrap_or_else(|| self.error_symbol.clone());

        let mut guard = ScopeGuard::new(table);
        if let Some(spec) = spec_name {
            self.bind_this(guard.table(), spec);
        }

        let params_node = func.child(params_idx);
        let param_count = params_node.child_count();
        for i in 0..param_count {
            let param = func.child(params_idx).child(i);
            let param_name = param.child(1).symbol_value();
            let param_type = param.child(0).symbol().expect("prescanned by register_function").clone();
            let mangled = Symbol::intern(&mangle::mangle_local(param_name.as_str()));
            let symbol = Rc::new(SemSymbol::Function(FunctionSymbol {
                spec_name,
                mangled_name: mangled,
                param_types: Vec::new(),
                return_type: param_type,
                access: AccessModifier::Public,
                kind: FunctionKind::Parameter,
            }));
            if guard.table().put(mangled, symbol).is_err() {
                self.error_at(param, ErrorCode::SemanticDuplicateDefinition, format!("duplicate parameter '{}'", param_name.as_str()));
            }
        }

        let prev_spec = self.current_spec;
        self.current_spec = spec_name;
        let prev_ret = self.return_type.replace(return_type);
        let prev_setter = self.in_setter;
        self.in_setter = false;

        let body = func.child_mut(block_idx);
        self.walk_block(guard.table(), body);

        self.in_setter = prev_setter;
        self.return_type = prev_ret;
        self.current_spec = prev_spec;
    }

    // -- Statements -----------------------------------------------------------

    fn walk_block(&mut self, table: &mut SymbolTable, block: &mut Node) {
        let mut guard = ScopeGuard::new(table);
        let count = block.child_count();
        for i in 0..count {
            let stmt = block.child_mut(i);
            self.walk_stmt(guard.table(), stmt);
        }
    }

    fn walk_stmt(&mut self, table: &mut SymbolTable, stmt: &mut Node) {
        match stmt.rule() {
            NodeRule::Block => self.walk_block(table, stmt),
            NodeRule::If => self.walk_if(table, stmt),
            NodeRule::For => self.walk_for(table, stmt),
            NodeRule::Return => self.walk_return(table, stmt),
            _ => {
                self.walk_expr(table, stmt);
            }
        }
    }

    fn walk_if(&mut self, table: &mut SymbolTable, node: &mut Node) {
        let cond_type = self.walk_expr(table, node.child_mut(0));
        if !types::is_bool(cond_type.type_symbol()) {
            self.error_at(node.child(0), ErrorCode::SemanticTypeMismatch, "'if' condition must be bool");
        }
        self.walk_block(table, node.child_mut(1));
        if node.child_count() == 3 {
            match node.child(2).rule() {
                NodeRule::If => self.walk_if(table, node.child_mut(2)),
                _ => self.walk_block(table, node.child_mut(2)),
            }
        }
    }

    fn walk_for(&mut self, table: &mut SymbolTable, node: &mut Node) {
        let mut guard = ScopeGuard::new(table);

        let init = node.child_mut(0);
        if init.child_count() == 1 {
            self.walk_expr(guard.table(), init.child_mut(0));
        }

        let cond = node.child_mut(1);
        if cond.child_count() == 1 {
            let cond_type = self.walk_expr(guard.table(), cond.child_mut(0));
            if !types::is_bool(cond_type.type_symbol()) {
                self.error_at(cond.child(0), ErrorCode::SemanticTypeMismatch, "loop condition must be bool");
            }
        }

        self.walk_block(guard.table(), node.child_mut(3));

        let update = node.child_mut(2);
        if update.child_count() == 1 {
            self.walk_expr(guard.table(), update.child_mut(0));
        }
    }

    fn walk_return(&mut self, table: &mut SymbolTable, node: &mut Node) {
        let expected = self.return_type.clone().unwrap_or_else(|| self.error_symbol.clone());

        if self.in_setter {
            if node.child_count() != 0 {
                self.error_at(node, ErrorCode::SemanticInvalidReturn, "a property setter may not return a value");
            }
            return;
        }

        if node.child_count() == 0 {
            if !types::is_any_type(expected.type_symbol()) && expected.type_symbol().format != TypeFormat::Void {
                self.error_at(node, ErrorCode::SemanticInvalidReturn, "missing return value");
            }
            return;
        }

        let actual = self.walk_expr(table, node.child_mut(0));
        if !types::types_match(actual.type_symbol(), expected.type_symbol()) {
            self.error_at(
                node.child(0),
                ErrorCode::SemanticInvalidReturn,
                "return expression does not match the declared return type",
            );
        }
    }

    // -- Expressions ------------------------------------------------------

    fn walk_expr(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let result = match node.rule() {
            NodeRule::Assign => self.walk_assign(table, node),
            NodeRule::LogOr | NodeRule::LogAnd => self.walk_logical(table, node),
            NodeRule::LogNot => self.walk_lognot(table, node),
            NodeRule::Equals | NodeRule::NotEquals => self.walk_equality(table, node),
            NodeRule::Less | NodeRule::LessEquals | NodeRule::Greater | NodeRule::GreaterEquals => {
                self.walk_ordering(table, node)
            }
            NodeRule::Add => self.walk_add(table, node),
            NodeRule::Sub | NodeRule::Mul | NodeRule::Div | NodeRule::Mod => self.walk_arith(table, node),
            NodeRule::Member => self.walk_member_get(table, node),
            NodeRule::Call => self.walk_call(table, node),
            NodeRule::New => self.walk_new(table, node),
            NodeRule::Default => self.walk_default(table, node),
            NodeRule::SymbolRef => self.walk_symbol_ref(table, node),
            NodeRule::Expression => self.walk_expr(table, node.child_mut(0)),
            NodeRule::BoolLiteral => self.builtin_ref(table, TY_BOOL),
            NodeRule::IntLiteral => self.builtin_ref(table, TY_INT32),
            NodeRule::FloatLiteral => self.builtin_ref(table, TY_FLOAT32),
            NodeRule::CharLiteral => self.builtin_ref(table, TY_INT8),
            NodeRule::StringLiteral => self.builtin_ref(table, TY_STRING),
            NodeRule::AnyType => self.error_symbol.clone(),
            other => {
                self.error_at(node, ErrorCode::IllegalState, format!("{:?} cannot appear as an expression", other));
                self.error_symbol.clone()
            }
        };
        node.set_symbol(result.clone());
        result
    }

    fn walk_logical(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let lhs = self.walk_expr(table, node.child_mut(0));
        let rhs = self.walk_expr(table, node.child_mut(1));
        if !types::is_bool(lhs.type_symbol()) || !types::is_bool(rhs.type_symbol()) {
            self.error_at(node, ErrorCode::SemanticTypeMismatch, "operands of '&&'/'||' must be bool");
        }
        self.builtin_ref(table, TY_BOOL)
    }

    fn walk_lognot(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let operand = self.walk_expr(table, node.child_mut(0));
        if !types::is_bool(operand.type_symbol()) {
            self.error_at(node, ErrorCode::SemanticTypeMismatch, "operand of '!' must be bool");
        }
        self.builtin_ref(table, TY_BOOL)
    }

    fn walk_equality(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let lhs = self.walk_expr(table, node.child_mut(0));
        let rhs = self.walk_expr(table, node.child_mut(1));
        if !types::equality_operands_ok(lhs.type_symbol(), rhs.type_symbol()) {
            self.error_at(node, ErrorCode::SemanticTypeMismatch, "'='/'!=' operands must be the same type");
        }
        self.builtin_ref(table, TY_BOOL)
    }

    fn walk_ordering(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let lhs = self.walk_expr(table, node.child_mut(0));
        let rhs = self.walk_expr(table, node.child_mut(1));
        if !types::ordering_operands_ok(lhs.type_symbol(), rhs.type_symbol()) {
            self.error_at(node, ErrorCode::SemanticTypeMismatch, "comparison operands must be the same numeric type");
        }
        self.builtin_ref(table, TY_BOOL)
    }

    fn walk_add(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let lhs = self.walk_expr(table, node.child_mut(0));
        let rhs = self.walk_expr(table, node.child_mut(1));
        match types::add_result(lhs.type_symbol(), rhs.type_symbol()) {
            Some(_) => lhs,
            None => {
                self.error_at(node, ErrorCode::SemanticTypeMismatch, "invalid operand types for '+'");
                self.error_symbol.clone()
            }
        }
    }

    fn walk_arith(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let lhs = self.walk_expr(table, node.child_mut(0));
        let rhs = self.walk_expr(table, node.child_mut(1));
        match types::arith_result(lhs.type_symbol(), rhs.type_symbol()) {
            Some(_) => lhs,
            None => {
                self.error_at(node, ErrorCode::SemanticTypeMismatch, "operands must be the same numeric type");
                self.error_symbol.clone()
            }
        }
    }

    /// Resolves `obj.name` as a property read. Used whenever a `Member` node
    /// appears in a plain expression position (not as an assignment LHS or a
    /// call's callee, both of which route through their own resolvers).
    fn walk_member_get(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let obj_type = self.walk_expr(table, node.child_mut(0));
        let field_name = node.child(1).symbol_value();
        self.resolve_property(table, node, obj_type.type_symbol(), field_name, true)
    }

    fn resolve_property(
        &mut self,
        table: &mut SymbolTable,
        node: &Node,
        obj_type: &TypeSymbol,
        field_name: Symbol,
        is_getter: bool,
    ) -> Rc<SemSymbol> {
        let base_name = mangle::base_spec_name(obj_type.name.as_str());
        let mangled = Symbol::intern(&mangle::mangle_property(base_name, field_name.as_str(), is_getter));
        match table.get(mangled) {
            Some(symbol) => {
                if !self.access_ok(symbol.as_ref()) {
                    self.error_at(node, ErrorCode::SemanticAccessViolation, format!("'{}' is not accessible here", field_name.as_str()));
                }
                symbol
            }
            None => {
                self.error_at(
                    node,
                    ErrorCode::SemanticUndefinedSymbol,
                    format!("'{}' has no {} named '{}'", obj_type.name.as_str(), if is_getter { "getter" } else { "setter" }, field_name.as_str()),
                );
                self.error_symbol.clone()
            }
        }
    }

    fn access_ok(&self, symbol: &SemSymbol) -> bool {
        let (access, owner) = match symbol {
            SemSymbol::Function(f) => (f.access, f.spec_name),
            SemSymbol::Type(t) => (t.access, None),
            SemSymbol::GenericType(g) => (g.base.access, None),
        };
        match access {
            AccessModifier::Public => true,
            AccessModifier::Concealed => owner.is_some() && owner == self.current_spec,
            AccessModifier::Internal => false,
        }
    }

    fn walk_symbol_ref(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let name = node.symbol_value();
        if name.eq_str("this") {
            return match table.get(Symbol::intern(&mangle::mangle_local("this"))) {
                Some(sym) => sym,
                None => {
                    self.error_at(node, ErrorCode::SemanticUndefinedSymbol, "'this' is not valid outside a spec member");
                    self.error_symbol.clone()
                }
            };
        }

        let local_name = Symbol::intern(&mangle::mangle_local(name.as_str()));
        if let Some(sym) = table.get(local_name) {
            return sym;
        }

        if let Some(spec) = self.current_spec {
            let mangled = Symbol::intern(&mangle::mangle_property(spec.as_str(), name.as_str(), true));
            if let Some(sym) = table.get(mangled) {
                return sym;
            }
        }

        self.error_at(node, ErrorCode::SemanticUndefinedSymbol, format!("undefined name '{}'", name.as_str()));
        self.error_symbol.clone()
    }

    /// Resolves the target of a call. Free calls, member calls, and
    /// function-call-like typecasts all share the `Call` node shape and are
    /// distinguished here.
    fn walk_call(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let callee_rule = node.child(0).rule();
        match callee_rule {
            NodeRule::Member => self.walk_member_call(table, node),
            NodeRule::SymbolRef => self.walk_free_call_or_cast(table, node),
            _ => {
                self.error_at(node, ErrorCode::SemanticUndefinedSymbol, "call target is not callable");
                self.error_symbol.clone()
            }
        }
    }

    fn arg_types(&mut self, table: &mut SymbolTable, params: &mut Node) -> Vec<Rc<SemSymbol>> {
        let count = params.child_count();
        let mut types = Vec::with_capacity(count);
        for i in 0..count {
            types.push(self.walk_expr(table, params.child_mut(i)));
        }
        types
    }

    fn walk_member_call(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let member = node.child_mut(0);
        let obj_type = self.walk_expr(table, member.child_mut(0));
        let method_name = member.child(1).symbol_value();
        let obj_type_symbol = obj_type.type_symbol().clone();

        let params = node.child_mut(1);
        let arg_syms = self.arg_types(table, params);
        let arg_names: Vec<Symbol> = arg_syms.iter().map(|s| s.name()).collect();

        let base_name = mangle::base_spec_name(obj_type_symbol.name.as_str());
        let mangled = Symbol::intern(&mangle::mangle_function(Some(base_name), method_name.as_str(), &arg_names));
        match table.get(mangled) {
            Some(symbol) => {
                if !self.access_ok(symbol.as_ref()) {
                    self.error_at(node, ErrorCode::SemanticAccessViolation, format!("'{}' is not accessible here", method_name.as_str()));
                }
                symbol
            }
            None => {
                self.error_at(
                    node,
                    ErrorCode::SemanticNoMatchingOverload,
                    format!("no overload of '{}' matches these argument types", method_name.as_str()),
                );
                self.error_symbol.clone()
            }
        }
    }

    fn walk_free_call_or_cast(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let callee_name = node.child(0).symbol_value();

        // A call whose target resolves to a type, rather than a function, is
        // a function-call-like typecast of its single argument.
        if let Some(target) = table.get(callee_name) {
            if matches!(target.as_ref(), SemSymbol::Type(_)) {
                let params = node.child_mut(1);
                if params.child_count() != 1 {
                    self.error_at(node, ErrorCode::SemanticWrongArity, "a typecast takes exactly one argument");
                    return self.error_symbol.clone();
                }
                let arg = self.walk_expr(table, params.child_mut(0));
                if !types::allowed_cast(arg.type_symbol(), target.type_symbol()) {
                    self.error_at(
                        node,
                        ErrorCode::SemanticTypeMismatch,
                        format!("cannot cast to '{}'", callee_name.as_str()),
                    );
                    return self.error_symbol.clone();
                }
                return target;
            }
        }

        let params = node.child_mut(1);
        let arg_syms = self.arg_types(table, params);
        let arg_names: Vec<Symbol> = arg_syms.iter().map(|s| s.name()).collect();
        let mangled = Symbol::intern(&mangle::mangle_function(None, callee_name.as_str(), &arg_names));
        match table.get(mangled) {
            Some(symbol) => symbol,
            None => {
                self.error_at(
                    node,
                    ErrorCode::SemanticNoMatchingOverload,
                    format!("no overload of '{}' matches these argument types", callee_name.as_str()),
                );
                self.error_symbol.clone()
            }
        }
    }

    fn walk_new(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let ty = self.resolve_type(table, node.child_mut(0));
        let type_name = ty.type_symbol().name;

        let params = node.child_mut(1);
        let arg_syms = self.arg_types(table, params);
        let arg_names: Vec<Symbol> = arg_syms.iter().map(|s| s.name()).collect();

        let base_name = mangle::base_spec_name(type_name.as_str());
        let mangled = Symbol::intern(&mangle::mangle_constructor(base_name, &arg_names));
        match table.get(mangled) {
            Some(_) => ty,
            None => {
                self.error_at(
                    node,
                    ErrorCode::SemanticNoMatchingOverload,
                    format!("'{}' has no matching constructor", type_name.as_str()),
                );
                self.error_symbol.clone()
            }
        }
    }

    fn walk_default(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        self.resolve_type(table, node.child_mut(0))
    }

    // -- Assignment -------------------------------------------------------

    fn walk_assign(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let lhs_rule = node.child(0).rule();
        match lhs_rule {
            NodeRule::Member => self.walk_member_assign(table, node),
            NodeRule::SymbolRef => self.walk_variable_assign(table, node),
            _ => {
                self.error_at(node.child(0), ErrorCode::SemanticNotAssignable, "left-hand side is not assignable");
                let rhs = self.walk_expr(table, node.child_mut(1));
                node.child_mut(0).set_symbol(self.error_symbol.clone());
                rhs
            }
        }
    }

    fn walk_member_assign(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let rhs = self.walk_expr(table, node.child_mut(1));

        let member = node.child_mut(0);
        let obj_type = self.walk_expr(table, member.child_mut(0));
        let field_name = member.child(1).symbol_value();
        let property = self.resolve_property(table, member, obj_type.type_symbol(), field_name, false);

        if !types::types_match(rhs.type_symbol(), property.type_symbol()) {
            self.error_at(node.child(1), ErrorCode::SemanticTypeMismatch, "type-mismatch-in-assign");
        }
        member.set_symbol(property.clone());
        rhs
    }

    fn walk_variable_assign(&mut self, table: &mut SymbolTable, node: &mut Node) -> Rc<SemSymbol> {
        let name = node.child(0).symbol_value();

        if name.eq_str("this") {
            self.error_at(node.child(0), ErrorCode::SemanticNotAssignable, "this-assigned");
            let rhs = self.walk_expr(table, node.child_mut(1));
            node.child_mut(0).set_symbol(self.error_symbol.clone());
            return rhs;
        }

        let rhs = self.walk_expr(table, node.child_mut(1));
        let mangled = Symbol::intern(&mangle::mangle_local(name.as_str()));

        let binding = if let Some(existing) = table.get_top_only(mangled) {
            if !types::types_match(rhs.type_symbol(), existing.type_symbol()) {
                self.error_at(node.child(0), ErrorCode::SemanticTypeMismatch, "type-mismatch-in-assign");
            }
            existing
        } else if let Some(outer) = table.get(mangled) {
            if types::types_match(rhs.type_symbol(), outer.type_symbol()) {
                outer
            } else {
                self.bind_new_local(table, mangled, rhs.clone())
            }
        } else {
            self.bind_new_local(table, mangled, rhs.clone())
        };

        node.child_mut(0).set_symbol(binding);
        rhs
    }

    fn bind_new_local(&mut self, table: &mut SymbolTable, mangled: Symbol, value_type: Rc<SemSymbol>) -> Rc<SemSymbol> {
        let symbol = Rc::new(SemSymbol::Function(FunctionSymbol {
            spec_name: None,
            mangled_name: mangled,
            param_types: Vec::new(),
            return_type: value_type,
            access: AccessModifier::Public,
            kind: FunctionKind::LocalVariable,
        }));
        let _ = table.put(mangled, symbol.clone());
        symbol
    }
}
