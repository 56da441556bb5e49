//! Layout-specific checks.

use wireloom_core::ast::{Layout, PropertyValue};

use super::{PropertyPart, Subject, Validator, rules::rules};
use crate::error::{Diagnostic, ErrorCode};

const GRID_COLUMNS: std::ops::RangeInclusive<f64> = 1.0..=12.0;

impl Validator<'_> {
    pub(super) fn check_layout(&mut self, layout: &Layout) {
        let node_id = layout.source_map_id.as_deref();
        let kind = layout.layout_type.as_str();

        if self.defined_layouts.contains(kind) {
            self.check_defined_layout_invocation(layout);
            return;
        }

        let Some(rules) = rules().layout(kind) else {
            let diagnostic = Diagnostic::warning(
                ErrorCode::LayoutUnknownType,
                format!("unknown layout type `{kind}`"),
            )
            .with_suggestion(format!(
                "define it: define Layout \"{kind}\" {{ layout stack {{ component Children }} }}"
            ));
            let range = self.name_range(node_id);
            self.emit_at(diagnostic, node_id, range);
            return;
        };

        self.check_properties(Subject::Layout(kind), rules, &layout.params, node_id);

        for &(name, fallback) in &rules.sizes {
            let Some(value) = layout.params.get(name) else {
                continue;
            };
            if value.as_number().is_some_and(|n| n > 0.0) {
                continue;
            }
            let range = self.property_range(node_id, name, PropertyPart::Value);
            let diagnostic = Diagnostic::warning(
                ErrorCode::LayoutInvalidSize,
                format!("`{name}` must be a positive number, found `{value}`; using {fallback}"),
            )
            .with_suggestion(format!("set `{name}` to a width in pixels, e.g. {fallback}"));
            self.emit_at(diagnostic, node_id, range);
        }

        if layout.children.is_empty() {
            let diagnostic = Diagnostic::warning(
                ErrorCode::LayoutEmpty,
                format!("layout `{kind}` has no children"),
            )
            .with_suggestion("add a component or remove the layout");
            self.emit(diagnostic, node_id);
        }

        match kind {
            "grid" => self.check_grid(layout),
            "split" => self.check_split(layout),
            _ => {}
        }
    }

    fn check_grid(&mut self, layout: &Layout) {
        let node_id = layout.source_map_id.as_deref();

        let Some(columns) = layout.params.get("columns") else {
            let diagnostic = Diagnostic::warning(
                ErrorCode::LayoutGridMissingColumns,
                "grid layout is missing the `columns` parameter",
            )
            .with_suggestion("add a column count, e.g. `layout grid(columns: 12)`");
            self.emit(diagnostic, node_id);
            return;
        };

        let in_range = match columns {
            PropertyValue::Number(n) => n.fract() == 0.0 && GRID_COLUMNS.contains(n),
            PropertyValue::String(_) => false,
        };
        if !in_range {
            let range = self.property_range(node_id, "columns", PropertyPart::Value);
            let diagnostic = Diagnostic::warning(
                ErrorCode::LayoutGridColumnsOutOfRange,
                format!("grid `columns` must be a whole number from 1 to 12, found `{columns}`"),
            )
            .with_suggestion("use a column count from 1 to 12");
            self.emit_at(diagnostic, node_id, range);
        }
    }

    fn check_split(&mut self, layout: &Layout) {
        let node_id = layout.source_map_id.as_deref();
        let params = &layout.params;

        if params.contains_key("sidebar") {
            let range = self.property_range(node_id, "sidebar", PropertyPart::Name);
            let diagnostic = Diagnostic::error(
                ErrorCode::LayoutSplitDeprecatedSidebar,
                "split parameter `sidebar` is no longer supported",
            )
            .with_suggestion("use `left: <width>` or `right: <width>` instead");
            self.emit_at(diagnostic, node_id, range);
        }

        match (params.contains_key("left"), params.contains_key("right")) {
            (true, true) => {
                let diagnostic = Diagnostic::error(
                    ErrorCode::LayoutSplitSideConflict,
                    "split layout declares both `left` and `right`",
                )
                .with_suggestion("keep only one of `left` or `right`");
                self.emit(diagnostic, node_id);
            }
            (false, false) => {
                let diagnostic = Diagnostic::error(
                    ErrorCode::LayoutSplitMissingSide,
                    "split layout needs a fixed `left` or `right` width",
                )
                .with_suggestion("add `(left: 250)` or `(right: 250)` after `split`");
                self.emit(diagnostic, node_id);
            }
            _ => {}
        }

        let count = layout.children.len();
        if count != 2 {
            let diagnostic = Diagnostic::error(
                ErrorCode::LayoutSplitChildrenCount,
                format!("split layout needs exactly 2 children, found {count}"),
            )
            .with_suggestion("wrap extra children in a `layout stack`");
            self.emit(diagnostic, node_id);
        }
    }

    /// A defined layout is invoked with exactly one child, which fills its
    /// `Children` slot.
    fn check_defined_layout_invocation(&mut self, layout: &Layout) {
        let count = layout.children.len();
        if count == 1 {
            return;
        }
        let node_id = layout.source_map_id.as_deref();
        let diagnostic = Diagnostic::error(
            ErrorCode::DefinedLayoutChildrenCount,
            format!(
                "layout `{}` takes exactly one child, found {count}",
                layout.layout_type
            ),
        )
        .with_suggestion("wrap the children in a single `layout stack`");
        self.emit(diagnostic, node_id);
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParseOptions, error::ErrorCode, parse_with_diagnostics};

    fn codes(source: &str) -> Vec<ErrorCode> {
        parse_with_diagnostics(source, None, ParseOptions::default())
            .expect("tolerant parse")
            .diagnostics
            .iter()
            .map(|d| d.code())
            .collect()
    }

    fn screen(body: &str) -> String {
        format!("project \"T\" {{ screen Main {{ {body} }} }}")
    }

    #[test]
    fn test_grid_without_columns() {
        let codes = codes(&screen("layout grid { }"));
        assert!(codes.contains(&ErrorCode::LayoutGridMissingColumns));
        assert!(codes.contains(&ErrorCode::LayoutEmpty));
    }

    #[test]
    fn test_grid_columns_range() {
        let cases = [
            ("1", true),
            ("12", true),
            ("6.0", true),
            ("0", false),
            ("13", false),
            ("2.5", false),
            ("many", false),
        ];
        for (columns, ok) in cases {
            let source = screen(&format!(
                "layout grid(columns: {columns}) {{ component Divider }}"
            ));
            let found = codes(&source).contains(&ErrorCode::LayoutGridColumnsOutOfRange);
            assert_eq!(found, !ok, "columns: {columns}");
        }
    }

    #[test]
    fn test_split_single_child_without_side() {
        let codes = codes(&screen(r#"layout split { component Heading text: "A" }"#));
        assert!(codes.contains(&ErrorCode::LayoutSplitMissingSide));
        assert!(codes.contains(&ErrorCode::LayoutSplitChildrenCount));
    }

    #[test]
    fn test_split_side_rules() {
        let valid = screen("layout split(left: 240) { component Divider component Divider }");
        assert!(codes(&valid).is_empty());

        let both = screen(
            "layout split(left: 200, right: 200) { component Divider component Divider }",
        );
        assert_eq!(codes(&both), vec![ErrorCode::LayoutSplitSideConflict]);

        let sidebar = screen("layout split(sidebar: 200) { component Divider component Divider }");
        let sidebar = codes(&sidebar);
        assert!(sidebar.contains(&ErrorCode::LayoutSplitDeprecatedSidebar));
        assert!(sidebar.contains(&ErrorCode::LayoutSplitMissingSide));
    }

    #[test]
    fn test_non_positive_size() {
        let source = screen("layout split(left: 0) { component Divider component Divider }");
        assert_eq!(codes(&source), vec![ErrorCode::LayoutInvalidSize]);
    }

    #[test]
    fn test_layout_parameters() {
        let source = screen("layout stack(gap: huge, wrap: 1) { component Divider }");
        assert_eq!(
            codes(&source),
            vec![
                ErrorCode::LayoutInvalidEnumValue,
                ErrorCode::LayoutUnknownParameter
            ]
        );

        let source = screen("layout card(border: maybe) { component Divider }");
        assert_eq!(codes(&source), vec![ErrorCode::LayoutInvalidBooleanValue]);
    }

    #[test]
    fn test_defined_layout_invocation_arity() {
        let define = r#"define Layout "shell" { layout stack { component Children } }"#;

        let one = format!(
            "project \"T\" {{ {define} screen Main {{ layout shell {{ component Divider }} }} }}"
        );
        assert!(codes(&one).is_empty());

        let two = format!(
            "project \"T\" {{ {define} screen Main {{ layout shell {{ component Divider component Divider }} }} }}"
        );
        assert_eq!(codes(&two), vec![ErrorCode::DefinedLayoutChildrenCount]);

        let none = format!("project \"T\" {{ {define} screen Main {{ layout shell {{ }} }} }}");
        assert_eq!(codes(&none), vec![ErrorCode::DefinedLayoutChildrenCount]);
    }
}
