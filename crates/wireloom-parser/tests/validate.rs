use wireloom_parser::{
    Diagnostic, ErrorCode, ParseOptions, Phase, Severity, parse_with_diagnostics,
};

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    parse_with_diagnostics(source, None, ParseOptions::default())
        .expect("tolerant parse")
        .diagnostics
}

fn find(diagnostics: &[Diagnostic], code: ErrorCode) -> &Diagnostic {
    diagnostics
        .iter()
        .find(|d| d.code() == code)
        .unwrap_or_else(|| panic!("no {code} diagnostic in {diagnostics:#?}"))
}

#[test]
fn test_grid_without_columns_warns() {
    let diags = diagnostics(r#"project "T" { screen Main { layout grid { component Divider } } }"#);

    let diag = find(&diags, ErrorCode::LayoutGridMissingColumns);
    assert_eq!(diag.severity(), Severity::Warning);
    assert_eq!(diag.phase(), Phase::Semantic);
    assert!(diag.message().contains("columns"));
    assert_eq!(diag.node_id(), Some("layout-grid-0"));
}

#[test]
fn test_split_with_single_child_and_no_side() {
    let diags = diagnostics(
        r#"project "T" { screen Main { layout split { component Heading text: "A" } } }"#,
    );

    let errors: Vec<ErrorCode> = diags
        .iter()
        .filter(|d| d.severity().is_error())
        .map(|d| d.code())
        .collect();
    assert!(errors.len() >= 2);
    assert!(errors.contains(&ErrorCode::LayoutSplitMissingSide));
    assert!(errors.contains(&ErrorCode::LayoutSplitChildrenCount));
}

#[test]
fn test_missing_required_properties_listed_together() {
    let diags = diagnostics(
        r#"project "T" { screen Main { layout stack { component StatCard caption: "x" } } }"#,
    );

    assert_eq!(diags.len(), 1);
    let diag = &diags[0];
    assert_eq!(diag.code(), ErrorCode::ComponentMissingRequiredProperty);
    assert!(diag.message().ends_with("properties: title, value"), "{}", diag.message());
    assert_eq!(diag.node_id(), Some("component-statcard-0"));
}

#[test]
fn test_unknown_property_points_at_its_name() {
    let source = [
        r#"project "T" {"#,
        "  screen Main {",
        "    layout stack {",
        r#"      component Button text: "Go" colour: red"#,
        "    }",
        "  }",
        "}",
    ]
    .join("\n");
    let diags = diagnostics(&source);

    let diag = find(&diags, ErrorCode::ComponentUnknownProperty);
    assert_eq!(diag.severity(), Severity::Warning);
    let range = diag.range();
    assert_eq!((range.start.line, range.start.column), (4, 34));
    assert_eq!((range.end.line, range.end.column), (4, 40));
    assert!(diag.suggestion().is_some_and(|s| s.contains("variant")));
}

#[test]
fn test_enum_and_boolean_values() {
    let diags = diagnostics(
        r#"project "T" {
            screen Main {
                layout stack {
                    component Button text: "Go" variant: loud disabled: yes
                    component Checkbox label: "A" checked: 1
                    component Toggle enabled: "false"
                }
            }
        }"#,
    );

    let codes: Vec<ErrorCode> = diags.iter().map(|d| d.code()).collect();
    assert_eq!(
        codes,
        vec![
            ErrorCode::ComponentInvalidEnumValue,
            ErrorCode::ComponentInvalidBooleanValue,
        ]
    );
    assert!(diags[0].message().contains("loud"));
}

#[test]
fn test_unknown_component_suggests_a_definition() {
    let diags = diagnostics(r#"project "T" { screen Main { layout stack { component Hero } } }"#);

    let diag = find(&diags, ErrorCode::ComponentUnknownType);
    assert_eq!(diag.severity(), Severity::Warning);
    assert!(
        diag.suggestion()
            .is_some_and(|s| s.contains(r#"define Component "Hero""#))
    );
}

#[test]
fn test_user_defined_components_skip_property_checks() {
    let diags = diagnostics(
        r#"project "T" {
            define Component "Hero" { component Heading text: "Hi" }
            screen Main { layout stack { component Hero anything: 1 } }
        }"#,
    );
    assert!(diags.is_empty(), "{diags:#?}");
}

#[test]
fn test_children_slot_outside_layout_definition() {
    let diags = diagnostics(
        r#"project "T" {
            define Component "Card" { layout stack { component Children } }
            screen Main { layout stack { component Card } }
        }"#,
    );

    let diag = find(&diags, ErrorCode::ChildrenSlotOutsideLayoutDefinition);
    assert_eq!(diag.severity(), Severity::Error);
    assert_eq!(diag.node_id(), Some("component-children-0"));
}

#[test]
fn test_layout_definition_contract() {
    let diags = diagnostics(
        r#"project "T" {
            define Layout "Shell" { layout stack { component Divider } }
            screen Main { layout Shell { component Divider component Divider } }
        }"#,
    );

    let errors: Vec<ErrorCode> = diags
        .iter()
        .filter(|d| d.severity().is_error())
        .map(|d| d.code())
        .collect();
    assert_eq!(
        errors,
        vec![
            ErrorCode::LayoutDefinitionInvalidName,
            ErrorCode::LayoutDefinitionMissingChildrenSlot,
            ErrorCode::DefinedLayoutChildrenCount,
        ]
    );
}

#[test]
fn test_cycle_diagnostic_is_anchored_at_project() {
    let diags = diagnostics(
        r#"project "T" {
            define Component "Card" { layout frame { component Children } }
            define Layout "frame" { layout stack { component Card component Children } }
            screen Main { layout stack { component Card } }
        }"#,
    );

    let diag = find(&diags, ErrorCode::DefinitionCycle);
    assert_eq!(diag.node_id(), Some("project"));
    assert_eq!(diag.message(), "circular definitions: Card → frame → Card");
    assert_eq!(diag.range().start.line, 1);
}

#[test]
fn test_valid_dashboard_is_clean() {
    let diags = diagnostics(
        r##"project "Admin" {
            style { theme: light }
            colors { primary: #2563EB }
            define Layout "shell" {
                layout split(left: 240) {
                    component SidebarMenu items: "Home,Users,Settings"
                    component Children
                }
            }
            define Component "KpiRow" {
                layout grid(columns: 12) {
                    cell span: 4 { component StatCard title: "Users" value: "1,204" }
                    cell span: 4 { component StatCard title: "Revenue" value: "$9k" }
                    cell span: 4 { component StatCard title: "Churn" value: "2%" }
                }
            }
            screen Dashboard {
                layout shell {
                    layout stack(gap: lg, padding: md) {
                        component Topbar title: "Dashboard"
                        component KpiRow
                        component Table title: "Recent" rows: 10 pagination: true
                    }
                }
            }
        }"##,
    );
    assert!(diags.is_empty(), "{diags:#?}");
}
