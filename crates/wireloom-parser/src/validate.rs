//! Semantic validation of a lowered project.
//!
//! Validation is a pure function of the AST and its source map: it never
//! changes either and only reports [`Diagnostic`]s. Source-map ids attached
//! to the AST are used to anchor each diagnostic to the right range.
//!
//! ## Checks
//!
//! - **Registry rules**: unknown component and layout types, missing
//!   required properties, unknown properties, enum and boolean values
//! - **Layout rules**: `grid` columns, `split` sides and arity, sizing
//!   parameters, empty containers, defined-layout invocations
//! - **Definitions**: naming conventions, duplicates, the `Children` slot
//! - **Cycles**: definitions that reference each other in a loop
//!
//! User-defined components accept any properties; only built-in types are
//! checked against the registry.

mod cycles;
mod definitions;
mod layouts;
mod rules;

use std::collections::HashSet;

use log::debug;

use wireloom_core::{
    ast::{
        Cell, CellChild, Component, ComponentDefinition, Definition, DefinitionBody, Layout,
        LayoutChild, LayoutDefinition, Project, Properties, Screen,
    },
    registry::CHILDREN_SLOT,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    source_map::{SourceMap, resolver::SourceMapResolver},
    span::CodeRange,
};
use rules::{TypeRules, is_boolean_like, rules};

/// Visitor trait for read-only traversal of the AST.
///
/// Default implementations recurse into children, so implementors only
/// override the nodes they care about. Overrides that still want the
/// default recursion call the matching `walk_*` function.
pub trait Visitor<'a> {
    fn visit_project(&mut self, project: &'a Project) {
        for definition in &project.definitions {
            self.visit_definition(definition);
        }
        for screen in &project.screens {
            self.visit_screen(screen);
        }
    }

    fn visit_definition(&mut self, definition: &'a Definition) {
        match definition {
            Definition::Component(def) => self.visit_component_definition(def),
            Definition::Layout(def) => self.visit_layout_definition(def),
        }
    }

    fn visit_component_definition(&mut self, definition: &'a ComponentDefinition) {
        match &definition.body {
            DefinitionBody::Layout(layout) => self.visit_layout(layout),
            DefinitionBody::Component(component) => self.visit_component(component),
        }
    }

    fn visit_layout_definition(&mut self, definition: &'a LayoutDefinition) {
        self.visit_layout(&definition.layout);
    }

    fn visit_screen(&mut self, screen: &'a Screen) {
        self.visit_layout(&screen.layout);
    }

    fn visit_layout(&mut self, layout: &'a Layout) {
        walk_layout(self, layout);
    }

    fn visit_cell(&mut self, cell: &'a Cell) {
        walk_cell(self, cell);
    }

    fn visit_component(&mut self, _component: &'a Component) {}
}

/// Visit the children of a layout, in order.
pub fn walk_layout<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, layout: &'a Layout) {
    for child in &layout.children {
        match child {
            LayoutChild::Component(component) => visitor.visit_component(component),
            LayoutChild::Layout(layout) => visitor.visit_layout(layout),
            LayoutChild::Cell(cell) => visitor.visit_cell(cell),
        }
    }
}

/// Visit the children of a cell, in order.
pub fn walk_cell<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, cell: &'a Cell) {
    for child in &cell.children {
        match child {
            CellChild::Component(component) => visitor.visit_component(component),
            CellChild::Layout(layout) => visitor.visit_layout(layout),
        }
    }
}

/// Run every semantic check over a project.
///
/// Diagnostics come back in the order the checks ran: definitions first,
/// then a walk over definitions and screens, then cycle detection.
pub fn validate(project: &Project, source_map: &SourceMap) -> Vec<Diagnostic> {
    let mut validator = Validator::new(project, source_map);

    validator.check_definitions(project);
    validator.visit_project(project);
    validator.check_cycles(project);

    debug!(diagnostics = validator.diagnostics.len(); "Semantic validation complete");
    validator.diagnostics
}

/// Where a property diagnostic should point.
#[derive(Debug, Clone, Copy)]
enum PropertyPart {
    Name,
    Value,
}

/// What kind of node a property list belongs to, for codes and messages.
#[derive(Debug, Clone, Copy)]
enum Subject<'n> {
    Component(&'n str),
    Layout(&'n str),
    Cell,
}

impl Subject<'_> {
    fn describe(&self) -> String {
        match self {
            Subject::Component(kind) => format!("component `{kind}`"),
            Subject::Layout(kind) => format!("layout `{kind}`"),
            Subject::Cell => "cell".to_string(),
        }
    }

    fn unknown_code(&self) -> ErrorCode {
        match self {
            Subject::Component(_) => ErrorCode::ComponentUnknownProperty,
            Subject::Layout(_) => ErrorCode::LayoutUnknownParameter,
            Subject::Cell => ErrorCode::CellUnknownProperty,
        }
    }

    fn enum_code(&self) -> ErrorCode {
        match self {
            Subject::Component(_) => ErrorCode::ComponentInvalidEnumValue,
            Subject::Layout(_) => ErrorCode::LayoutInvalidEnumValue,
            Subject::Cell => ErrorCode::CellInvalidEnumValue,
        }
    }

    fn boolean_code(&self) -> Option<ErrorCode> {
        match self {
            Subject::Component(_) => Some(ErrorCode::ComponentInvalidBooleanValue),
            Subject::Layout(_) => Some(ErrorCode::LayoutInvalidBooleanValue),
            Subject::Cell => None,
        }
    }

    fn property_noun(&self) -> &'static str {
        match self {
            Subject::Layout(_) => "parameter",
            Subject::Component(_) | Subject::Cell => "property",
        }
    }
}

/// Validator that checks all semantic constraints of a project.
///
/// Collects every diagnostic during traversal; nothing stops at the first
/// problem.
pub(crate) struct Validator<'a> {
    resolver: SourceMapResolver<'a>,
    defined_components: HashSet<&'a str>,
    defined_layouts: HashSet<&'a str>,
    /// Set while walking the body of a layout definition.
    in_layout_definition: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Validator<'a> {
    fn new(project: &'a Project, source_map: &'a SourceMap) -> Self {
        Self {
            resolver: SourceMapResolver::new(source_map),
            defined_components: project
                .component_definitions()
                .map(|def| def.name.as_str())
                .collect(),
            defined_layouts: project
                .layout_definitions()
                .map(|def| def.name.as_str())
                .collect(),
            in_layout_definition: false,
            diagnostics: Vec::new(),
        }
    }

    /// Record a diagnostic anchored at a node's full range.
    fn emit(&mut self, diagnostic: Diagnostic, node_id: Option<&str>) {
        let range = node_id
            .and_then(|id| self.resolver.get_node_by_id(id))
            .map(|entry| entry.range);
        self.emit_at(diagnostic, node_id, range);
    }

    fn emit_at(
        &mut self,
        mut diagnostic: Diagnostic,
        node_id: Option<&str>,
        range: Option<CodeRange>,
    ) {
        if let Some(id) = node_id {
            diagnostic = diagnostic.with_node_id(id);
        }
        if let Some(range) = range {
            diagnostic = diagnostic.with_range(range);
        }
        self.diagnostics.push(diagnostic);
    }

    /// Range of one part of a property, falling back to the node range.
    fn property_range(
        &self,
        node_id: Option<&str>,
        name: &str,
        part: PropertyPart,
    ) -> Option<CodeRange> {
        let entry = self.resolver.get_node_by_id(node_id?)?;
        let property = entry
            .properties
            .as_ref()
            .and_then(|properties| properties.get(name));
        match (property, part) {
            (Some(property), PropertyPart::Name) => Some(property.name_range),
            (Some(property), PropertyPart::Value) => Some(property.value_range),
            (None, _) => Some(entry.range),
        }
    }

    /// Name range of a node when it has one, else its full range.
    fn name_range(&self, node_id: Option<&str>) -> Option<CodeRange> {
        let entry = self.resolver.get_node_by_id(node_id?)?;
        Some(entry.name_range.unwrap_or(entry.range))
    }

    /// Unknown names, enum values and boolean values for one property list.
    fn check_properties(
        &mut self,
        subject: Subject<'_>,
        rules: &TypeRules,
        props: &Properties,
        node_id: Option<&str>,
    ) {
        for (name, value) in props {
            if !rules.allows(name) {
                let range = self.property_range(node_id, name, PropertyPart::Name);
                let diagnostic = Diagnostic::warning(
                    subject.unknown_code(),
                    format!(
                        "unknown {} `{name}` on {}",
                        subject.property_noun(),
                        subject.describe()
                    ),
                )
                .with_suggestion(format!("allowed: {}", rules.allowed_list()));
                self.emit_at(diagnostic, node_id, range);
                continue;
            }

            if let Some(&allowed) = rules.enums.get(name.as_str()) {
                let valid = value
                    .as_str()
                    .is_some_and(|v| allowed.iter().any(|candidate| *candidate == v));
                if !valid {
                    let range = self.property_range(node_id, name, PropertyPart::Value);
                    let diagnostic = Diagnostic::warning(
                        subject.enum_code(),
                        format!(
                            "invalid value `{value}` for `{name}` on {}",
                            subject.describe()
                        ),
                    )
                    .with_suggestion(format!("expected one of: {}", allowed.join(", ")));
                    self.emit_at(diagnostic, node_id, range);
                }
            }

            if rules.booleans.contains(name.as_str()) && !is_boolean_like(value) {
                if let Some(code) = subject.boolean_code() {
                    let range = self.property_range(node_id, name, PropertyPart::Value);
                    let diagnostic = Diagnostic::warning(
                        code,
                        format!(
                            "`{name}` on {} expects a boolean, found `{value}`",
                            subject.describe()
                        ),
                    )
                    .with_suggestion("use `true` or `false`");
                    self.emit_at(diagnostic, node_id, range);
                }
            }
        }
    }

    fn check_component(&mut self, component: &Component) {
        let node_id = component.source_map_id.as_deref();
        let kind = component.component_type.as_str();

        if kind == CHILDREN_SLOT {
            if !self.in_layout_definition {
                let diagnostic = Diagnostic::error(
                    ErrorCode::ChildrenSlotOutsideLayoutDefinition,
                    format!("`{CHILDREN_SLOT}` can only be used inside a layout definition"),
                )
                .with_suggestion("move it into a `define Layout` body, or remove it");
                self.emit(diagnostic, node_id);
            }
            return;
        }

        if self.defined_components.contains(kind) {
            return;
        }

        let Some(rules) = rules().component(kind) else {
            let diagnostic = Diagnostic::warning(
                ErrorCode::ComponentUnknownType,
                format!("unknown component type `{kind}`"),
            )
            .with_suggestion(format!(
                "define it: define Component \"{kind}\" {{ component Text text: \"{kind}\" }}"
            ));
            let range = self.name_range(node_id);
            self.emit_at(diagnostic, node_id, range);
            return;
        };

        let missing: Vec<&str> = rules
            .required
            .iter()
            .copied()
            .filter(|name| !component.props.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            let diagnostic = Diagnostic::warning(
                ErrorCode::ComponentMissingRequiredProperty,
                format!(
                    "component `{kind}` is missing required {}: {}",
                    if missing.len() == 1 {
                        "property"
                    } else {
                        "properties"
                    },
                    missing.join(", ")
                ),
            )
            .with_suggestion(format!(
                "add {}",
                missing
                    .iter()
                    .map(|name| format!("{name}: \"...\""))
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
            self.emit(diagnostic, node_id);
        }

        self.check_properties(Subject::Component(kind), rules, &component.props, node_id);
    }

    fn check_cell(&mut self, cell: &Cell) {
        let node_id = cell.source_map_id.as_deref();
        self.check_properties(Subject::Cell, rules().cell(), &cell.props, node_id);
    }
}

impl<'a> Visitor<'a> for Validator<'a> {
    fn visit_layout_definition(&mut self, definition: &'a LayoutDefinition) {
        self.in_layout_definition = true;
        self.visit_layout(&definition.layout);
        self.in_layout_definition = false;
    }

    fn visit_layout(&mut self, layout: &'a Layout) {
        self.check_layout(layout);
        walk_layout(self, layout);
    }

    fn visit_cell(&mut self, cell: &'a Cell) {
        self.check_cell(cell);
        walk_cell(self, cell);
    }

    fn visit_component(&mut self, component: &'a Component) {
        self.check_component(component);
    }
}
