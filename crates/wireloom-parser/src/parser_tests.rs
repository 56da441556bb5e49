//! Grammar coverage tests for the token-level parser.
//!
//! These run the lexer and the grammar parser together over whole source
//! files, checking what the language accepts and rejects and where parser
//! diagnostics land.

use crate::{
    error::{Diagnostic, ErrorCode},
    lexer, parser,
};

fn parse_source(source: &str) -> Result<(), Diagnostic> {
    let tokens = lexer::tokenize(source).map_err(|err| err.into_diagnostics().remove(0))?;
    parser::build_project(&tokens)?;
    Ok(())
}

fn assert_parses_successfully(source: &str) {
    if let Err(e) = parse_source(source) {
        panic!("Expected parsing to succeed, but got error: {e}");
    }
}

fn parse_error(source: &str) -> Diagnostic {
    match parse_source(source) {
        Ok(()) => panic!("Expected parsing to fail, but it succeeded"),
        Err(diag) => diag,
    }
}

#[cfg(test)]
mod basic_parsing_tests {
    use super::*;

    #[test]
    fn test_minimal_project() {
        assert_parses_successfully(r#"project "App" { screen Main { layout stack { } } }"#);
    }

    #[test]
    fn test_project_without_screens_is_grammatical() {
        // The missing screen is reported after the grammar pass
        assert_parses_successfully(r#"project "App" { }"#);
    }

    #[test]
    fn test_screen_with_params() {
        assert_parses_successfully(
            r#"project "App" { screen Login(route: "/login", auth: false) { layout stack { } } }"#,
        );
    }

    #[test]
    fn test_nested_layouts_and_cells() {
        let source = r#"
            project "Dashboard" {
                screen Home {
                    layout split(left: 240) {
                        layout stack(gap: md) {
                            component Heading text: "Menu"
                            component Link text: "Home" href: "/"
                        }
                        layout grid(columns: 12) {
                            cell span: 6 { component Card title: "Sales" }
                            cell span: 6 align: end {
                                layout stack { component Text text: "42" }
                            }
                        }
                    }
                }
            }
        "#;
        assert_parses_successfully(source);
    }

    #[test]
    fn test_map_blocks() {
        let source = r#"
            project "App" {
                style { theme: dark density: compact }
                mocks { users: "users.json" }
                colors { primary: #3B82F6 accent: #f0a }
                style { }
                screen Main { layout stack { } }
            }
        "#;
        assert_parses_successfully(source);
    }

    #[test]
    fn test_comments_are_ignored() {
        let source = r#"
            // leading comment
            project "App" { /* inline */
                screen Main {
                    /* a block
                       over lines */
                    layout stack { component Divider } // trailing
                }
            }
        "#;
        assert_parses_successfully(source);
    }
}

#[cfg(test)]
mod definition_tests {
    use super::*;

    #[test]
    fn test_component_definition_with_layout_body() {
        assert_parses_successfully(
            r#"project "App" {
                define Component "Card" {
                    layout card(padding: md) { component Children }
                }
                screen Main { layout stack { component Card } }
            }"#,
        );
    }

    #[test]
    fn test_component_definition_with_component_body() {
        assert_parses_successfully(
            r#"project "App" {
                define Component "PrimaryButton" { component Button variant: primary }
                screen Main { layout stack { component PrimaryButton text: "Go" } }
            }"#,
        );
    }

    #[test]
    fn test_layout_definition() {
        assert_parses_successfully(
            r#"project "App" {
                define Layout "shell" { layout split(left: 200) { component Nav component Children } }
                screen Main { layout shell { layout stack { } } }
            }"#,
        );
    }

    #[test]
    fn test_layout_definition_rejects_component_body() {
        let diag = parse_error(
            r#"project "App" {
                define Layout "shell" { component Children }
                screen Main { layout stack { } }
            }"#,
        );
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedToken);
        assert!(diag.message().contains("`layout`"), "{}", diag.message());
    }

    #[test]
    fn test_definition_holds_a_single_node() {
        let diag = parse_error(
            r#"project "App" {
                define Component "Pair" { component A component B }
                screen Main { layout stack { } }
            }"#,
        );
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedToken);
    }

    #[test]
    fn test_definition_needs_kind() {
        let diag = parse_error(r#"project "App" { define Widget "X" { component A } }"#);
        assert!(
            diag.message().contains("`Component` or `Layout`"),
            "{}",
            diag.message()
        );
    }
}

#[cfg(test)]
mod keyword_boundary_tests {
    use super::*;

    #[test]
    fn test_identifiers_with_keyword_prefixes() {
        assert_parses_successfully(
            r#"project "App" {
                define Layout "screen_default" { layout stack { component Children } }
                screen layouts { layout screen_default { component components } }
            }"#,
        );
    }

    #[test]
    fn test_capitalised_keywords_as_names_and_values() {
        assert_parses_successfully(
            r#"project "App" { screen Main { layout stack { component Text mode: Layout Component: x } } }"#,
        );
    }

    #[test]
    fn test_lowercase_keywords_are_not_values() {
        let diag = parse_error(
            r#"project "App" { screen Main { layout stack { component Text mode: layout } } }"#,
        );
        assert!(diag.message().contains("value"), "{}", diag.message());
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_screen_requires_exactly_one_layout() {
        let diag = parse_error(
            r#"project "App" { screen Main { layout stack { } layout stack { } } }"#,
        );
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedToken);
        assert!(diag.message().contains("exactly one layout"), "{}", diag.message());
    }

    #[test]
    fn test_missing_colon_in_property() {
        let diag = parse_error(
            r#"project "App" { screen Main { layout stack { component Text text "x" } } }"#,
        );
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedToken);
        assert!(diag.message().contains("`:`"), "{}", diag.message());
    }

    #[test]
    fn test_missing_property_value() {
        let diag = parse_error(
            r#"project "App" { screen Main { layout stack(gap: ) { } } }"#,
        );
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedToken);
        assert!(diag.message().contains("value"), "{}", diag.message());
    }

    #[test]
    fn test_unclosed_project() {
        let diag = parse_error(r#"project "App" { screen Main { layout stack { } }"#);
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedEof);
        assert_eq!(diag.suggestion(), Some("check for a missing closing `}`"));
    }

    #[test]
    fn test_trailing_tokens_after_project() {
        let diag = parse_error(
            r#"project "App" { screen Main { layout stack { } } } screen Extra { }"#,
        );
        assert_eq!(diag.code(), ErrorCode::ParserUnexpectedToken);
        assert!(diag.message().contains("end of input"), "{}", diag.message());
    }

    #[test]
    fn test_project_name_must_be_string() {
        let diag = parse_error("project App { }");
        assert!(diag.message().contains("project name string"), "{}", diag.message());
    }

    #[test]
    fn test_error_range_is_on_the_right_line() {
        let source = "project \"App\" {\n  screen Main {\n    layout stack {\n      cell { cell }\n    }\n  }\n}";
        let diag = parse_error(source);
        assert_eq!(diag.range().start.line, 4);
    }
}
