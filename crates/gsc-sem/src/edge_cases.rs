//! Boundary and negative-scenario tests for the semantic walker, run
//! end-to-end from source text through the parser.

#[cfg(test)]
mod tests {
    use gsc_lex::StringSource;
    use gsc_par::Parser;
    use gsc_util::{ErrorCode, Handler};

    use crate::analyze;

    fn check(src: &str) -> Handler {
        let handler = Handler::new();
        let mut module = Parser::new(StringSource::new(src), &handler).parse();
        assert!(!handler.has_errors(), "parse errors in test fixture: {:?}", handler.diagnostics());
        analyze(&mut module, &handler);
        handler
    }

    fn error_codes(handler: &Handler) -> Vec<ErrorCode> {
        handler.diagnostics().iter().filter_map(|d| d.code).collect()
    }

    #[test]
    fn test_empty_spec_body_is_legal() {
        let handler = check(r#"package "edge.empty"; public spec Empty { }"#);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_for_with_all_clauses_empty_is_legal() {
        let handler = check(
            r#"
            package "edge.forever";
            public int32 main() {
                for (;;) {
                    return 0;
                }
                return 0;
            }
            "#,
        );
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_32bit_integer_literal_boundary() {
        let handler = check(
            r#"
            package "edge.intbound";
            public int32 main() {
                x <- 2147483647;
                return x;
            }
            "#,
        );
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_invalid_package_name_is_rejected() {
        let handler = check(r#"package "123.bad";"#);
        assert!(error_codes(&handler).contains(&ErrorCode::SemanticInvalidPackageName));
    }

    #[test]
    fn test_type_mismatch_in_assign_is_rejected() {
        let handler = check(
            r#"
            package "edge.assign";
            public int32 main() {
                x <- 5;
                x <- "oops";
                return x;
            }
            "#,
        );
        assert!(error_codes(&handler).contains(&ErrorCode::SemanticTypeMismatch));
    }

    #[test]
    fn test_invalid_type_in_add_is_rejected() {
        let handler = check(
            r#"
            package "edge.add";
            public int32 main() {
                return 1 + "two";
            }
            "#,
        );
        assert!(error_codes(&handler).contains(&ErrorCode::SemanticTypeMismatch));
    }

    #[test]
    fn test_this_assigned_is_rejected() {
        let handler = check(
            r#"
            package "edge.thisassign";
            public spec Widget {
                public construct() { }
                public void reset() {
                    this <- default(Widget);
                }
            }
            "#,
        );
        assert!(error_codes(&handler).contains(&ErrorCode::SemanticNotAssignable));
    }

    #[test]
    fn test_constructor_overload_not_found_is_rejected() {
        let handler = check(
            r#"
            package "edge.ctor";
            public spec Widget {
                public construct() { }
                public void build() {
                    w <- new Widget(1);
                }
            }
            "#,
        );
        assert!(error_codes(&handler).contains(&ErrorCode::SemanticNoMatchingOverload));
    }

    #[test]
    fn test_generic_instantiations_with_different_args_are_distinct_types() {
        let handler = Handler::new();
        let mut module = Parser::new(
            StringSource::new(
                r#"
                package "edge.generics";
                public spec Pair<T,U> {
                    public construct() { }
                }
                public int32 main() {
                    a <- new Pair<int32,float32>();
                    b <- new Pair<int32,int32>();
                    return 0;
                }
                "#,
            ),
            &handler,
        )
        .parse();
        analyze(&mut module, &handler);
        assert!(!handler.has_errors());

        fn find_new_names(node: &gsc_par::Node, out: &mut Vec<gsc_util::Symbol>) {
            if node.rule() == gsc_par::NodeRule::New {
                if let Some(sym) = node.symbol() {
                    out.push(sym.name());
                }
            }
            for child in node.children() {
                find_new_names(child, out);
            }
        }
        let mut names = Vec::new();
        find_new_names(&module, &mut names);
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
    }

    #[test]
    fn test_undefined_symbol_is_rejected() {
        let handler = check(
            r#"
            package "edge.undef";
            public int32 main() {
                return nonexistent;
            }
            "#,
        );
        assert!(error_codes(&handler).contains(&ErrorCode::SemanticUndefinedSymbol));
    }

    #[test]
    fn test_spec_forward_reference_resolves_regardless_of_order() {
        let handler = check(
            r#"
            package "edge.order";
            public spec Later {
                public construct() { }
            }
            public spec Earlier {
                public construct() { }
                public void make() {
                    l <- new Later();
                }
            }
            "#,
        );
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_property_getter_and_setter_round_trip() {
        let handler = check(
            r#"
            package "edge.property";
            public spec Counter {
                int32 value {
                    public get;
                    public set;
                }
                public construct() {
                    this.value <- 0;
                }
                public void bump() {
                    this.value <- this.value + 1;
                }
            }
            "#,
        );
        assert!(!handler.has_errors());
    }
}
