//! Property tests over generated wireframes.

use proptest::prelude::*;

use wireloom_parser::{
    ParseOptions, ParseOutcome, SourceMapResolver, SourceNodeType, parse, parse_with_diagnostics,
};

// ===================
// Strategies
// ===================

#[derive(Debug, Clone)]
enum Node {
    Component(&'static str),
    Layout(&'static str, Vec<Node>),
    Cell(Vec<Node>),
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        Just(Node::Component("Button")),
        Just(Node::Component("Divider")),
        Just(Node::Component("Heading")),
        Just(Node::Component("Spinner")),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            (
                prop_oneof![Just("stack"), Just("panel"), Just("card")],
                prop::collection::vec(inner.clone(), 0..5)
            )
                .prop_map(|(kind, children)| Node::Layout(kind, children)),
            prop::collection::vec(inner, 0..4).prop_map(Node::Cell),
        ]
    })
}

fn render(node: &Node, in_cell: bool, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Component("Button") => {
            let label = out.len();
            out.push_str(&format!("{indent}component Button text: \"b{label}\"\n"));
        }
        Node::Component("Heading") => {
            out.push_str(&format!("{indent}component Heading text: \"Title\"\n"));
        }
        Node::Component(kind) => out.push_str(&format!("{indent}component {kind}\n")),
        Node::Layout(kind, children) => {
            out.push_str(&format!("{indent}layout {kind} {{\n"));
            for child in children {
                render(child, false, depth + 1, out);
            }
            out.push_str(&format!("{indent}}}\n"));
        }
        // Cells cannot nest; a nested one becomes a stack
        Node::Cell(children) if in_cell => {
            render(&Node::Layout("stack", children.clone()), false, depth, out)
        }
        Node::Cell(children) => {
            out.push_str(&format!("{indent}cell span: 1 {{\n"));
            for child in children {
                render(child, true, depth + 1, out);
            }
            out.push_str(&format!("{indent}}}\n"));
        }
    }
}

fn project_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(node_strategy(), 0..6).prop_map(|children| {
        let mut source = String::from("project \"Gen\" {\n  screen Main {\n");
        render(&Node::Layout("stack", children), false, 2, &mut source);
        source.push_str("  }\n}\n");
        source
    })
}

fn outcome(source: &str) -> ParseOutcome {
    parse_with_diagnostics(source, Some("gen.wl"), ParseOptions::default())
        .expect("tolerant parse")
}

// ===================
// Property Test Functions
// ===================

/// Parsing the same text twice yields the same tree, map and diagnostics.
fn check_deterministic(source: &str) -> Result<(), TestCaseError> {
    prop_assert_eq!(outcome(source), outcome(source));
    Ok(())
}

/// Same-type components are numbered 0, 1, 2, ... in document order.
fn check_sibling_ids(source: &str) -> Result<(), TestCaseError> {
    let outcome = outcome(source);
    let resolver = outcome.resolver().expect("source map");
    let buttons = resolver.get_nodes_by_type(SourceNodeType::Component, Some("Button"));

    let mut previous = None;
    for (index, entry) in buttons.iter().enumerate() {
        prop_assert_eq!(&entry.node_id, &format!("component-button-{index}"));
        let start = (entry.range.start.line, entry.range.start.column);
        prop_assert!(previous < Some(start), "{} is out of order", entry.node_id);
        previous = Some(start);
    }
    Ok(())
}

/// Every path runs from the root to the node, one entry per level.
fn check_paths(resolver: &SourceMapResolver<'_>) -> Result<(), TestCaseError> {
    for entry in resolver.get_nodes_by_type(SourceNodeType::Project, None) {
        prop_assert!(resolver.get_parent(&entry.node_id).is_none());
    }

    let all = [
        SourceNodeType::Screen,
        SourceNodeType::Layout,
        SourceNodeType::Cell,
        SourceNodeType::Component,
    ];
    for node_type in all {
        for entry in resolver.get_nodes_by_type(node_type, None) {
            let id = entry.node_id.as_str();
            prop_assert!(resolver.get_parent(id).is_some(), "{id} has no parent");

            let path = resolver.get_path(id);
            let depth = resolver.depth(id).expect("known id");
            prop_assert_eq!(path.len(), depth + 1);
            prop_assert_eq!(path[0].node_id.as_str(), "project");
            prop_assert_eq!(path[path.len() - 1].node_id.as_str(), id);
        }
    }
    Ok(())
}

/// A position inside a single leaf resolves to that leaf.
fn check_position_lookup(resolver: &SourceMapResolver<'_>) -> Result<(), TestCaseError> {
    for entry in resolver.get_nodes_by_type(SourceNodeType::Component, None) {
        let start = entry.range.start;
        for _ in 0..2 {
            let found = resolver
                .get_node_by_position(start.line, start.column)
                .expect("position inside the map");
            prop_assert_eq!(&found.node_id, &entry.node_id);
        }
    }
    Ok(())
}

/// Stripping source-map ids from the tolerant tree gives the strict tree.
fn check_round_trip(source: &str) -> Result<(), TestCaseError> {
    let strict = parse(source).map_err(|err| TestCaseError::fail(err.to_string()))?;

    let outcome = outcome(source);
    prop_assert!(!outcome.has_errors());
    let mut tolerant = outcome.ast.expect("ast");
    tolerant.clear_source_map_ids();

    prop_assert_eq!(tolerant, strict);
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn parsing_is_deterministic(source in project_strategy()) {
        check_deterministic(&source)?;
    }

    #[test]
    fn sibling_ids_follow_document_order(source in project_strategy()) {
        check_sibling_ids(&source)?;
    }

    #[test]
    fn paths_match_depths(source in project_strategy()) {
        let outcome = outcome(&source);
        let resolver = outcome.resolver().expect("source map");
        check_paths(&resolver)?;
    }

    #[test]
    fn leaf_positions_resolve_to_the_leaf(source in project_strategy()) {
        let outcome = outcome(&source);
        let resolver = outcome.resolver().expect("source map");
        check_position_lookup(&resolver)?;
    }

    #[test]
    fn strict_and_tolerant_trees_agree(source in project_strategy()) {
        check_round_trip(&source)?;
    }
}
