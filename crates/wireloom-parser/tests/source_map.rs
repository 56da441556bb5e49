use wireloom_core::ast::{LayoutChild, PropertyValue};
use wireloom_parser::{ParseOptions, ParseOutcome, SourceNodeType, parse_with_diagnostics};

fn outcome(source: &str) -> ParseOutcome {
    parse_with_diagnostics(source, None, ParseOptions::default()).expect("tolerant parse")
}

fn ids(outcome: &ParseOutcome) -> Vec<&str> {
    outcome
        .source_map
        .as_ref()
        .expect("source map")
        .iter()
        .map(|entry| entry.node_id.as_str())
        .collect()
}

#[test]
fn test_single_button_project() {
    let outcome = outcome(r#"project "T" { screen Main { layout stack { component Button text: "Go" } } }"#);

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(
        ids(&outcome),
        vec!["project", "screen-0", "layout-stack-0", "component-button-0"]
    );

    let resolver = outcome.resolver().unwrap();
    let button = resolver.get_node_by_id("component-button-0").unwrap();
    assert_eq!(button.parent_id.as_deref(), Some("layout-stack-0"));
    assert_eq!(button.node_type, SourceNodeType::Component);
    assert_eq!(button.component_type.as_deref(), Some("Button"));
    assert_eq!(button.is_user_defined, Some(false));

    let project = resolver.get_node_by_id("project").unwrap();
    assert!(project.parent_id.is_none());
    assert_eq!(project.name.as_deref(), Some("T"));
}

#[test]
fn test_ast_carries_source_map_ids() {
    let outcome = outcome(r#"project "T" { screen Main { layout stack { component Button text: "Go" } } }"#);
    let ast = outcome.ast.as_ref().unwrap();

    assert_eq!(ast.source_map_id.as_deref(), Some("project"));
    assert_eq!(ast.screens[0].source_map_id.as_deref(), Some("screen-0"));
    let LayoutChild::Component(button) = &ast.screens[0].layout.children[0] else {
        panic!("Expected a component");
    };
    assert_eq!(button.source_map_id.as_deref(), Some("component-button-0"));
}

#[test]
fn test_sibling_ids_follow_document_order() {
    let source = r#"
        project "T" {
            screen Main {
                layout stack {
                    component Button text: "a"
                    component Text text: "x"
                    component Button text: "b"
                    layout stack { component Button text: "c" }
                    component Button text: "d"
                }
            }
        }
    "#;
    let outcome = outcome(source);
    let resolver = outcome.resolver().unwrap();

    let labels: Vec<(&str, &str)> = resolver
        .get_nodes_by_type(SourceNodeType::Component, Some("Button"))
        .into_iter()
        .map(|entry| {
            let label = entry.properties.as_ref().unwrap()["text"].value.as_str().unwrap();
            (entry.node_id.as_str(), label)
        })
        .collect();

    assert_eq!(
        labels,
        vec![
            ("component-button-0", "a"),
            ("component-button-1", "b"),
            ("component-button-2", "c"),
            ("component-button-3", "d"),
        ]
    );
    assert_eq!(
        resolver.get_node_by_id("layout-stack-1").unwrap().parent_id.as_deref(),
        Some("layout-stack-0")
    );
}

#[test]
fn test_definition_ids_and_user_defined_flags() {
    let source = r#"
        project "T" {
            style { theme: dark }
            colors { primary: #000 }
            define Component "Card" { layout stack { component Children } }
            define Layout "shell" { layout stack { component Children } }
            screen Main { layout shell { component Card } }
        }
    "#;
    let outcome = outcome(source);

    assert_eq!(
        ids(&outcome),
        vec![
            "project",
            "theme",
            "colors",
            "define-Card",
            "layout-stack-0",
            "component-children-0",
            "define-shell",
            "layout-stack-1",
            "component-children-1",
            "screen-0",
            "layout-shell-0",
            "component-card-0",
        ]
    );

    let resolver = outcome.resolver().unwrap();
    let shell = resolver.get_node_by_id("layout-shell-0").unwrap();
    assert_eq!(shell.is_user_defined, Some(true));
    let card = resolver.get_node_by_id("component-card-0").unwrap();
    assert_eq!(card.is_user_defined, Some(true));

    let define = resolver.get_node_by_id("define-Card").unwrap();
    assert_eq!(define.node_type, SourceNodeType::ComponentDefinition);
    assert_eq!(define.name.as_deref(), Some("Card"));
    assert_eq!(
        resolver.get_node_by_id("define-shell").unwrap().node_type,
        SourceNodeType::LayoutDefinition
    );
}

#[test]
fn test_ranges_and_property_ranges() {
    let source = [
        r#"project "T" {"#,
        "  screen Main {",
        "    layout stack {",
        r#"      component Button text: "Go""#,
        "    }",
        "  }",
        "}",
    ]
    .join("\n");
    let outcome = outcome(&source);
    let resolver = outcome.resolver().unwrap();

    let button = resolver.get_node_by_id("component-button-0").unwrap();
    assert_eq!((button.range.start.line, button.range.start.column), (4, 6));
    assert_eq!((button.range.end.line, button.range.end.column), (4, 33));
    let name = button.name_range.unwrap();
    assert_eq!((name.start.column, name.end.column), (16, 22));

    let text = &button.properties.as_ref().unwrap()["text"];
    assert_eq!(text.value, PropertyValue::String("Go".to_string()));
    assert_eq!((text.name_range.start.column, text.name_range.end.column), (23, 27));
    assert_eq!((text.value_range.start.column, text.value_range.end.column), (29, 33));

    let layout = resolver.get_node_by_id("layout-stack-0").unwrap();
    assert_eq!((layout.range.start.line, layout.range.end.line), (3, 5));

    let project = resolver.get_node_by_id("project").unwrap();
    assert_eq!((project.range.start.line, project.range.start.column), (1, 0));
    assert_eq!((project.range.end.line, project.range.end.column), (7, 1));
}

#[test]
fn test_insertion_points() {
    let source = [
        r#"project "T" {"#,
        "  screen Main {",
        "    layout stack {",
        r#"      component Button text: "Go""#,
        "      layout grid(columns: 2) { }",
        "    }",
        "  }",
        "}",
    ]
    .join("\n");
    let outcome = outcome(&source);
    let resolver = outcome.resolver().unwrap();

    let stack = resolver.get_node_by_id("layout-stack-0").unwrap();
    let point = stack.insertion_point.as_ref().unwrap();
    assert_eq!(point.after.as_deref(), Some("layout-grid-0"));
    assert_eq!((point.line, point.column), (5, 33));
    assert_eq!(point.indentation, "      ");

    // Empty container: just before its closing brace, one level deeper
    let grid = resolver.get_node_by_id("layout-grid-0").unwrap();
    let point = grid.insertion_point.as_ref().unwrap();
    assert!(point.after.is_none());
    assert_eq!((point.line, point.column), (5, 32));
    assert_eq!(point.indentation, "        ");

    // Leaves have none
    let button = resolver.get_node_by_id("component-button-0").unwrap();
    assert!(button.insertion_point.is_none());
}

#[test]
fn test_resolver_queries() {
    let source = [
        r#"project "T" {"#,
        "  screen Main {",
        "    layout grid(columns: 2) {",
        r#"      cell span: 1 { component Heading text: "A" }"#,
        r#"      cell span: 1 { component Text text: "B" }"#,
        "    }",
        "  }",
        "}",
    ]
    .join("\n");
    let outcome = outcome(&source);
    let resolver = outcome.resolver().unwrap();

    let text = resolver.get_node_by_position(5, 40).unwrap();
    assert_eq!(text.node_id, "component-text-0");

    let cell = resolver.get_node_by_position(5, 8).unwrap();
    assert_eq!(cell.node_id, "cell-1");

    assert!(resolver.get_node_by_position(40, 0).is_none());

    let path: Vec<&str> = resolver
        .get_path("component-heading-0")
        .iter()
        .map(|entry| entry.node_id.as_str())
        .collect();
    assert_eq!(
        path,
        vec!["project", "screen-0", "layout-grid-0", "cell-0", "component-heading-0"]
    );
    assert!(resolver.get_path("nope").is_empty());

    let siblings: Vec<&str> = resolver
        .get_siblings("cell-0")
        .iter()
        .map(|entry| entry.node_id.as_str())
        .collect();
    assert_eq!(siblings, vec!["cell-1"]);
    assert!(resolver.get_siblings("project").is_empty());

    assert_eq!(resolver.get_children("layout-grid-0").len(), 2);
    assert!(resolver.get_children("component-text-0").is_empty());
    assert!(resolver.get_parent("project").is_none());

    let stats = resolver.get_stats();
    assert_eq!(stats.total_nodes, 7);
    assert_eq!(stats.nodes_by_type[&SourceNodeType::Cell], 2);
    assert_eq!(stats.max_depth, 4);
}

#[test]
fn test_source_map_json_shape() {
    let outcome = outcome(r#"project "T" { screen Main { layout stack { component Button text: "Go" } } }"#);
    let json = serde_json::to_value(outcome.source_map.as_ref().unwrap()).unwrap();

    let button = &json[3];
    assert_eq!(button["nodeId"], "component-button-0");
    assert_eq!(button["type"], "component");
    assert_eq!(button["parentId"], "layout-stack-0");
    assert_eq!(button["componentType"], "Button");
    assert_eq!(button["properties"]["text"]["value"], "Go");
    assert!(json[0]["parentId"].is_null());
    assert_eq!(json[2]["insertionPoint"]["after"], "component-button-0");
}

#[test]
fn test_repeated_style_blocks_do_not_cover_screens() {
    let source = "project \"T\" {\n  style { theme: dark }\n  screen Main { layout stack { component Button text: \"Go\" } }\n  style { font: serif }\n}";
    let outcome = outcome(source);
    let resolver = outcome.resolver().unwrap();

    let theme = resolver.get_node_by_id("theme").unwrap();
    assert_eq!(theme.range.start.line, 2);
    assert_eq!(theme.range.end.line, 2);
    assert_eq!(theme.properties.as_ref().unwrap().len(), 2);

    let screen = resolver.get_node_by_position(3, 3).unwrap();
    assert_eq!(screen.node_id, "screen-0");
    let theme_hit = resolver.get_node_by_position(2, 4).unwrap();
    assert_eq!(theme_hit.node_id, "theme");
    // the second block belongs to no entry of its own
    assert_eq!(resolver.get_node_by_position(4, 4).unwrap().node_id, "project");
}

#[test]
fn test_layout_range_spans_parameter_list() {
    let outcome = outcome(
        r#"project "T" { screen Main(route: "/") { layout grid(columns: 2) { component Divider } } }"#,
    );
    let resolver = outcome.resolver().unwrap();

    let grid = resolver.get_node_by_id("layout-grid-0").unwrap();
    let columns = &grid.properties.as_ref().unwrap()["columns"];
    assert!(grid.range.contains(columns.range.start.line, columns.range.start.column));
    assert!(grid.range.contains(columns.range.end.line, columns.range.end.column));

    let screen = resolver.get_node_by_id("screen-0").unwrap();
    let route = &screen.properties.as_ref().unwrap()["route"];
    assert!(screen.range.contains(route.value_range.end.line, route.value_range.end.column));
}
