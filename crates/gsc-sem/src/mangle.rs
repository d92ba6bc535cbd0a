//! Name mangling: turns a declaration's surface name plus its signature
//! into the single flat key the symbol table binds it under, so overload
//! resolution is just a table lookup on the mangled name rather than a
//! search over candidate lists.

use gsc_util::Symbol;

/// The fixed internal name a spec's constructor mangles under, since
/// `construct` is a keyword rather than a name the parser hands back.
pub const CONSTRUCTOR_NAME: &str = "$construct";

/// `<spec>::<name>$<argType1>$<argType2>...`. `spec` is empty for a
/// module-level function.
pub fn mangle_function(spec: Option<&str>, name: &str, arg_type_names: &[Symbol]) -> String {
    let mut mangled = String::new();
    if let Some(spec) = spec {
        mangled.push_str(spec);
    }
    mangled.push_str("::");
    mangled.push_str(name);
    for arg in arg_type_names {
        mangled.push('$');
        mangled.push_str(arg.as_str());
    }
    mangled
}

/// A spec's constructor, mangled the same way as any other member function
/// but under the fixed [`CONSTRUCTOR_NAME`] rather than the source text.
pub fn mangle_constructor(spec: &str, arg_type_names: &[Symbol]) -> String {
    mangle_function(Some(spec), CONSTRUCTOR_NAME, arg_type_names)
}

/// `Local%%<name>`, for both local variables and parameters (and `this`).
pub fn mangle_local(name: &str) -> String {
    format!("Local%%{name}")
}

/// `<spec><-<name>` for a getter, `<spec>-><name>` for a setter.
pub fn mangle_property(spec: &str, name: &str, is_getter: bool) -> String {
    let arrow = if is_getter { "<-" } else { "->" };
    format!("{spec}{arrow}{name}")
}

/// A generic template's name: the base name with one `~` per type
/// parameter, so `List<T>` mangles to `List~` and `Pair<T,U>` to `Pair~~`.
pub fn mangle_generic_template(base_name: &str, param_count: usize) -> String {
    let mut mangled = base_name.to_string();
    for _ in 0..param_count {
        mangled.push('~');
    }
    mangled
}

/// A generic instantiation's name: `<name><T1,T2,...>`.
pub fn mangle_generic_applied(base_name: &str, arg_names: &[Symbol]) -> String {
    let mut mangled = base_name.to_string();
    mangled.push('<');
    for (i, arg) in arg_names.iter().enumerate() {
        if i > 0 {
            mangled.push(',');
        }
        mangled.push_str(arg.as_str());
    }
    mangled.push('>');
    mangled
}

/// Strips a generic instantiation's argument list, so a member lookup on
/// `Pair<int32,float32>` finds `Pair`'s constructors/methods/properties,
/// which are registered once under the template spec's bare name rather
/// than once per instantiation.
pub fn base_spec_name(type_name: &str) -> &str {
    type_name.split('<').next().unwrap_or(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_level_function_has_empty_spec_component() {
        let arg = Symbol::intern_type("int32");
        assert_eq!(mangle_function(None, "main", &[arg]), "::main$int32");
    }

    #[test]
    fn test_member_function_includes_spec_name() {
        let arg = Symbol::intern_type("float32");
        assert_eq!(mangle_function(Some("Circle"), "perimeter", &[arg]), "Circle::perimeter$float32");
    }

    #[test]
    fn test_constructor_uses_fixed_sentinel_name() {
        let arg = Symbol::intern_type("float32");
        assert_eq!(mangle_constructor("Circle", &[arg]), "Circle::$construct$float32");
    }

    #[test]
    fn test_local_variable_mangling() {
        assert_eq!(mangle_local("x"), "Local%%x");
        assert_eq!(mangle_local("this"), "Local%%this");
    }

    #[test]
    fn test_property_getter_and_setter_use_different_arrows() {
        assert_eq!(mangle_property("Circle", "radius", true), "Circle<-radius");
        assert_eq!(mangle_property("Circle", "radius", false), "Circle->radius");
    }

    #[test]
    fn test_generic_template_gets_one_tilde_per_param() {
        assert_eq!(mangle_generic_template("List", 1), "List~");
        assert_eq!(mangle_generic_template("Pair", 2), "Pair~~");
        assert_eq!(mangle_generic_template("Unit", 0), "Unit");
    }

    #[test]
    fn test_generic_applied_lists_argument_names() {
        let args = [Symbol::intern_type("string"), Symbol::intern_type("int32")];
        assert_eq!(mangle_generic_applied("Pair", &args), "Pair<string,int32>");
    }
}
