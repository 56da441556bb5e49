//! Checks on `define Component` and `define Layout` declarations.

use std::collections::HashSet;

use wireloom_core::{
    ast::{Definition, LayoutDefinition, NodeRef, Project},
    registry::CHILDREN_SLOT,
};

use super::Validator;
use crate::error::{Diagnostic, ErrorCode};

impl Validator<'_> {
    pub(super) fn check_definitions(&mut self, project: &Project) {
        let mut seen: HashSet<&str> = HashSet::new();

        for definition in &project.definitions {
            let name = definition.name();
            let node_id = match definition {
                Definition::Component(def) => def.source_map_id.as_deref(),
                Definition::Layout(def) => def.source_map_id.as_deref(),
            };

            if !seen.insert(name) {
                let diagnostic = Diagnostic::error(
                    ErrorCode::DefinitionDuplicateName,
                    format!("`{name}` is already defined"),
                )
                .with_suggestion("rename one of the definitions");
                let range = self.name_range(node_id);
                self.emit_at(diagnostic, node_id, range);
            }

            match definition {
                Definition::Component(_) => {
                    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
                        let diagnostic = Diagnostic::warning(
                            ErrorCode::ComponentDefinitionNameNotPascalCase,
                            format!("component definition `{name}` should start with a capital letter"),
                        )
                        .with_suggestion(format!("rename it to `{}`", capitalize(name)));
                        let range = self.name_range(node_id);
                        self.emit_at(diagnostic, node_id, range);
                    }
                }
                Definition::Layout(def) => {
                    if !is_layout_name(name) {
                        let diagnostic = Diagnostic::error(
                            ErrorCode::LayoutDefinitionInvalidName,
                            format!(
                                "layout definition `{name}` must start with a lowercase letter and contain only letters, digits and `_`"
                            ),
                        )
                        .with_suggestion("use a name such as `appShell` or `two_column`");
                        let range = self.name_range(node_id);
                        self.emit_at(diagnostic, node_id, range);
                    }
                    self.check_children_slots(def);
                }
            }
        }
    }

    /// A layout definition holds exactly one `Children` slot, at any depth.
    fn check_children_slots(&mut self, definition: &LayoutDefinition) {
        let mut slots = 0;
        NodeRef::Layout(&definition.layout).walk(&mut |node| {
            if let NodeRef::Component(component) = node {
                if component.component_type == CHILDREN_SLOT {
                    slots += 1;
                }
            }
        });

        let node_id = definition.source_map_id.as_deref();
        let name = &definition.name;
        let diagnostic = match slots {
            1 => return,
            0 => Diagnostic::error(
                ErrorCode::LayoutDefinitionMissingChildrenSlot,
                format!("layout definition `{name}` has no `{CHILDREN_SLOT}` slot"),
            )
            .with_suggestion(format!(
                "add `component {CHILDREN_SLOT}` where the invocation's child should go"
            )),
            n => Diagnostic::error(
                ErrorCode::LayoutDefinitionMultipleChildrenSlots,
                format!("layout definition `{name}` has {n} `{CHILDREN_SLOT}` slots"),
            )
            .with_suggestion(format!("keep a single `component {CHILDREN_SLOT}`")),
        };
        self.emit(diagnostic, node_id);
    }
}

/// `^[a-z][A-Za-z0-9_]*$`
fn is_layout_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseOptions, parse_with_diagnostics};

    fn codes(source: &str) -> Vec<ErrorCode> {
        parse_with_diagnostics(source, None, ParseOptions::default())
            .expect("tolerant parse")
            .diagnostics
            .iter()
            .map(|d| d.code())
            .collect()
    }

    fn project(definitions: &str) -> String {
        format!(
            "project \"T\" {{ {definitions} screen Main {{ layout stack {{ component Divider }} }} }}"
        )
    }

    #[test]
    fn test_layout_name_pattern() {
        assert!(is_layout_name("shell"));
        assert!(is_layout_name("appShell_2"));
        assert!(!is_layout_name("Shell"));
        assert!(!is_layout_name("2col"));
        assert!(!is_layout_name("app-shell"));
        assert!(!is_layout_name(""));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("card"), "Card");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_invalid_layout_name_is_error() {
        let source = project(r#"define Layout "Shell" { layout stack { component Children } }"#);
        assert_eq!(codes(&source), vec![ErrorCode::LayoutDefinitionInvalidName]);
    }

    #[test]
    fn test_lowercase_component_name_is_warning() {
        let source = project(r#"define Component "card" { component Divider }"#);
        assert_eq!(
            codes(&source),
            vec![ErrorCode::ComponentDefinitionNameNotPascalCase]
        );
    }

    #[test]
    fn test_duplicate_names() {
        let source = project(
            r#"define Component "Card" { component Divider }
               define Component "Card" { component Divider }"#,
        );
        assert_eq!(codes(&source), vec![ErrorCode::DefinitionDuplicateName]);
    }

    #[test]
    fn test_children_slot_count() {
        let none = project(r#"define Layout "shell" { layout stack { component Divider } }"#);
        assert_eq!(
            codes(&none),
            vec![ErrorCode::LayoutDefinitionMissingChildrenSlot]
        );

        let nested = project(
            r#"define Layout "shell" { layout stack { component Divider layout panel { component Children } } }"#,
        );
        assert!(codes(&nested).is_empty());

        let two = project(
            r#"define Layout "shell" { layout stack { component Children cell { component Children } } }"#,
        );
        assert_eq!(
            codes(&two),
            vec![ErrorCode::LayoutDefinitionMultipleChildrenSlots]
        );
    }
}
