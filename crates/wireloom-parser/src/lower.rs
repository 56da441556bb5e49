//! CST to AST lowering.
//!
//! [`Lowerer`] walks the concrete syntax tree once, producing the typed AST
//! and driving a [`SourceMapBuilder`] so that every AST node gets its
//! source-map entry in the same traversal.
//!
//! Containers in the CST group their children by kind. Before lowering a
//! container the children are gathered with their starting byte offset and
//! stably sorted, which restores the order in which they were written.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use wireloom_core::ast::{
    Cell, CellChild, Component, ComponentDefinition, Definition, DefinitionBody, Layout,
    LayoutChild, LayoutDefinition, Project, Properties, PropertyValue, Screen,
};

use crate::{
    cst::{
        CellNode, ComponentNode, DefinedBodyNode, DefinedComponentNode, DefinedLayoutNode,
        LayoutNode, MapDeclNode, ParamListNode, ProjectNode, PropertyNode, ScreenNode, Tok,
    },
    source_map::{
        PropertySourceMap, SourceMap, SourceMapEntry, SourceNodeType,
        builder::{SourceMapBuilder, hull},
    },
    span::CodeRange,
    tokens::Token,
};

type PropertyRanges = IndexMap<String, PropertySourceMap>;

/// Lower a project CST into its AST and source map.
///
/// `source` is the text the tokens were read from; it is only used to
/// recover indentation for insertion points.
pub(crate) fn lower(node: &ProjectNode<'_>, source: Option<&str>) -> (Project, SourceMap) {
    let mut lowerer = Lowerer::new(node, source);
    let project = lowerer.project(node);
    let source_map = lowerer.builder.finish();

    debug!(
        definitions = project.definitions.len(),
        screens = project.screens.len(),
        entries = source_map.len();
        "Lowered project"
    );
    (project, source_map)
}

/// Children of a layout, tagged by kind.
enum ChildRef<'a, 'src> {
    Component(&'a ComponentNode<'src>),
    Layout(&'a LayoutNode<'src>),
    Cell(&'a CellNode<'src>),
}

/// Children of a cell; cells never nest directly.
enum CellChildRef<'a, 'src> {
    Component(&'a ComponentNode<'src>),
    Layout(&'a LayoutNode<'src>),
}

/// Full range of a block: keyword, optional parameter list and braces.
fn block_range(keyword: Tok<'_>, params: Option<&ParamListNode<'_>>, close: Tok<'_>) -> CodeRange {
    let params = params
        .into_iter()
        .flat_map(|params| [params.open.range, params.close.range]);
    hull(std::iter::once(keyword.range).chain(params).chain([close.range]))
        .unwrap_or(keyword.range)
}

enum ProjectItem<'a, 'src> {
    Map(SourceNodeType, &'a [MapDeclNode<'src>]),
    ComponentDefinition(&'a DefinedComponentNode<'src>),
    LayoutDefinition(&'a DefinedLayoutNode<'src>),
    Screen(&'a ScreenNode<'src>),
}

pub(crate) struct Lowerer<'src> {
    builder: SourceMapBuilder<'src>,
    defined_components: HashSet<String>,
    defined_layouts: HashSet<String>,
}

impl<'src> Lowerer<'src> {
    fn new(node: &ProjectNode<'_>, source: Option<&'src str>) -> Self {
        let defined_components = node
            .defined_components
            .iter()
            .map(|def| unquote(def.name.text()))
            .collect();
        let defined_layouts = node
            .defined_layouts
            .iter()
            .map(|def| unquote(def.name.text()))
            .collect();

        Self {
            builder: SourceMapBuilder::new(source),
            defined_components,
            defined_layouts,
        }
    }

    fn project(&mut self, node: &ProjectNode<'_>) -> Project {
        let name = unquote(node.name.text());

        let mut entry = SourceMapEntry::new(
            self.builder.next_id(SourceNodeType::Project, None),
            SourceNodeType::Project,
            node.keyword.range.union(node.close.range),
        );
        entry.keyword_range = Some(node.keyword.range);
        entry.name_range = Some(node.name.range);
        entry.body_range = Some(node.open.range.union(node.close.range));
        entry.name = Some(name.clone());
        let id = self.builder.add(entry);
        self.builder.enter(id.clone());

        // Repeated `style`/`mocks`/`colors` blocks merge into one entry,
        // placed where the first block of that kind appears.
        let mut items: Vec<(usize, ProjectItem<'_, '_>)> = Vec::new();
        for (node_type, decls) in [
            (SourceNodeType::Theme, &node.styles),
            (SourceNodeType::Mocks, &node.mocks),
            (SourceNodeType::Colors, &node.colors),
        ] {
            if let Some(first) = decls.first() {
                items.push((
                    first.keyword.span.start(),
                    ProjectItem::Map(node_type, decls.as_slice()),
                ));
            }
        }
        items.extend(node.defined_components.iter().map(|def| {
            (def.define.span.start(), ProjectItem::ComponentDefinition(def))
        }));
        items.extend(
            node.defined_layouts
                .iter()
                .map(|def| (def.define.span.start(), ProjectItem::LayoutDefinition(def))),
        );
        items.extend(
            node.screens
                .iter()
                .map(|screen| (screen.keyword.span.start(), ProjectItem::Screen(screen))),
        );
        items.sort_by_key(|(offset, _)| *offset);

        let mut project = Project {
            name,
            style: IndexMap::new(),
            mocks: IndexMap::new(),
            colors: IndexMap::new(),
            definitions: Vec::new(),
            screens: Vec::new(),
            source_map_id: None,
        };

        for (_, item) in items {
            match item {
                ProjectItem::Map(node_type, decls) => {
                    let values = self.map_decls(node_type, decls);
                    match node_type {
                        SourceNodeType::Theme => project.style = values,
                        SourceNodeType::Mocks => project.mocks = values,
                        _ => project.colors = values,
                    }
                }
                ProjectItem::ComponentDefinition(def) => project
                    .definitions
                    .push(Definition::Component(self.component_definition(def))),
                ProjectItem::LayoutDefinition(def) => project
                    .definitions
                    .push(Definition::Layout(self.layout_definition(def))),
                ProjectItem::Screen(screen) => project.screens.push(self.screen(screen)),
            }
        }

        self.builder.exit();
        project.source_map_id = Some(id);
        project
    }

    /// Lower every block of one kind into a single string map.
    ///
    /// A later key overwrites an earlier one.
    fn map_decls(
        &mut self,
        node_type: SourceNodeType,
        decls: &[MapDeclNode<'_>],
    ) -> IndexMap<String, String> {
        let mut values = IndexMap::new();
        let mut ranges = PropertyRanges::new();
        for property in decls.iter().flat_map(|decl| decl.properties.iter()) {
            let name = property.name.text().to_string();
            let value = text_value(property.value);
            ranges.insert(
                name.clone(),
                property_source_map(property, PropertyValue::String(value.clone())),
            );
            values.insert(name, value);
        }

        // Later blocks add properties only; the entry covers the first one.
        let Some(first) = decls.first() else {
            return values;
        };
        let mut entry = SourceMapEntry::new(
            self.builder.next_id(node_type, None),
            node_type,
            first.keyword.range.union(first.close.range),
        );
        entry.keyword_range = Some(first.keyword.range);
        entry.body_range = Some(first.open.range.union(first.close.range));
        entry.properties = Some(ranges);
        self.builder.add(entry);

        values
    }

    fn component_definition(&mut self, node: &DefinedComponentNode<'_>) -> ComponentDefinition {
        let name = unquote(node.name.text());

        let mut entry = SourceMapEntry::new(
            self.builder
                .next_id(SourceNodeType::ComponentDefinition, Some(name.as_str())),
            SourceNodeType::ComponentDefinition,
            node.define.range.union(node.close.range),
        );
        entry.keyword_range = Some(node.define.range.union(node.kind.range));
        entry.name_range = Some(node.name.range);
        entry.body_range = Some(node.open.range.union(node.close.range));
        entry.name = Some(name.clone());
        let id = self.builder.add(entry);

        self.builder.enter(id.clone());
        let body = match &node.body {
            DefinedBodyNode::Layout(layout) => DefinitionBody::Layout(self.layout(layout)),
            DefinedBodyNode::Component(component) => {
                DefinitionBody::Component(self.component(component))
            }
        };
        self.builder.exit();

        ComponentDefinition {
            name,
            body,
            source_map_id: Some(id),
        }
    }

    fn layout_definition(&mut self, node: &DefinedLayoutNode<'_>) -> LayoutDefinition {
        let name = unquote(node.name.text());

        let mut entry = SourceMapEntry::new(
            self.builder
                .next_id(SourceNodeType::LayoutDefinition, Some(name.as_str())),
            SourceNodeType::LayoutDefinition,
            node.define.range.union(node.close.range),
        );
        entry.keyword_range = Some(node.define.range.union(node.kind.range));
        entry.name_range = Some(node.name.range);
        entry.body_range = Some(node.open.range.union(node.close.range));
        entry.name = Some(name.clone());
        let id = self.builder.add(entry);

        self.builder.enter(id.clone());
        let layout = self.layout(&node.layout);
        self.builder.exit();

        LayoutDefinition {
            name,
            layout,
            source_map_id: Some(id),
        }
    }

    fn screen(&mut self, node: &ScreenNode<'_>) -> Screen {
        let name = node.name.text().to_string();
        let param_nodes = node
            .params
            .as_ref()
            .map_or(&[][..], |params| params.properties.as_slice());
        let (params, ranges) = lower_properties(param_nodes);

        let mut entry = SourceMapEntry::new(
            self.builder.next_id(SourceNodeType::Screen, None),
            SourceNodeType::Screen,
            block_range(node.keyword, node.params.as_ref(), node.close),
        );
        entry.keyword_range = Some(node.keyword.range);
        entry.name_range = Some(node.name.range);
        entry.body_range = Some(node.open.range.union(node.close.range));
        entry.name = Some(name.clone());
        entry.properties = Some(ranges);
        let id = self.builder.add(entry);

        self.builder.enter(id.clone());
        let layout = self.layout(&node.layout);
        self.builder.exit();

        Screen {
            name,
            params,
            layout,
            source_map_id: Some(id),
        }
    }

    fn layout(&mut self, node: &LayoutNode<'_>) -> Layout {
        let layout_type = node.kind.text().to_string();
        let param_nodes = node
            .params
            .as_ref()
            .map_or(&[][..], |params| params.properties.as_slice());
        let (params, ranges) = lower_properties(param_nodes);

        let mut entry = SourceMapEntry::new(
            self.builder
                .next_id(SourceNodeType::Layout, Some(layout_type.as_str())),
            SourceNodeType::Layout,
            block_range(node.keyword, node.params.as_ref(), node.close),
        );
        entry.keyword_range = Some(node.keyword.range);
        entry.name_range = Some(node.kind.range);
        entry.body_range = Some(node.open.range.union(node.close.range));
        entry.layout_type = Some(layout_type.clone());
        entry.is_user_defined = Some(self.defined_layouts.contains(&layout_type));
        entry.properties = Some(ranges);
        let id = self.builder.add(entry);

        let mut children: Vec<(usize, ChildRef<'_, '_>)> = Vec::new();
        children.extend(
            node.components
                .iter()
                .map(|c| (c.start_offset(), ChildRef::Component(c))),
        );
        children.extend(
            node.layouts
                .iter()
                .map(|l| (l.start_offset(), ChildRef::Layout(l))),
        );
        children.extend(
            node.cells
                .iter()
                .map(|c| (c.start_offset(), ChildRef::Cell(c))),
        );
        children.sort_by_key(|(offset, _)| *offset);

        self.builder.enter(id.clone());
        let children = children
            .into_iter()
            .map(|(_, child)| match child {
                ChildRef::Component(c) => LayoutChild::Component(self.component(c)),
                ChildRef::Layout(l) => LayoutChild::Layout(self.layout(l)),
                ChildRef::Cell(c) => LayoutChild::Cell(self.cell(c)),
            })
            .collect();
        self.builder.exit();

        Layout {
            layout_type,
            params,
            children,
            source_map_id: Some(id),
        }
    }

    fn cell(&mut self, node: &CellNode<'_>) -> Cell {
        let (props, ranges) = lower_properties(&node.properties);

        let mut entry = SourceMapEntry::new(
            self.builder.next_id(SourceNodeType::Cell, None),
            SourceNodeType::Cell,
            node.keyword.range.union(node.close.range),
        );
        entry.keyword_range = Some(node.keyword.range);
        entry.body_range = Some(node.open.range.union(node.close.range));
        entry.properties = Some(ranges);
        let id = self.builder.add(entry);

        let mut children: Vec<(usize, CellChildRef<'_, '_>)> = Vec::new();
        children.extend(
            node.components
                .iter()
                .map(|c| (c.start_offset(), CellChildRef::Component(c))),
        );
        children.extend(
            node.layouts
                .iter()
                .map(|l| (l.start_offset(), CellChildRef::Layout(l))),
        );
        children.sort_by_key(|(offset, _)| *offset);

        self.builder.enter(id.clone());
        let children = children
            .into_iter()
            .map(|(_, child)| match child {
                CellChildRef::Component(c) => CellChild::Component(self.component(c)),
                CellChildRef::Layout(l) => CellChild::Layout(self.layout(l)),
            })
            .collect();
        self.builder.exit();

        Cell {
            props,
            children,
            source_map_id: Some(id),
        }
    }

    fn component(&mut self, node: &ComponentNode<'_>) -> Component {
        let component_type = node.kind.text().to_string();
        let (props, ranges) = lower_properties(&node.properties);

        let range = node
            .properties
            .last()
            .map_or(node.kind.range, |property| property.value.range);
        let mut entry = SourceMapEntry::new(
            self.builder
                .next_id(SourceNodeType::Component, Some(component_type.as_str())),
            SourceNodeType::Component,
            node.keyword.range.union(range),
        );
        entry.keyword_range = Some(node.keyword.range);
        entry.name_range = Some(node.kind.range);
        entry.component_type = Some(component_type.clone());
        entry.is_user_defined = Some(self.defined_components.contains(&component_type));
        entry.properties = Some(ranges);
        let id = self.builder.add(entry);

        Component {
            component_type,
            props,
            source_map_id: Some(id),
        }
    }
}

/// Lower a property list into values plus their source locations.
///
/// A repeated key keeps its first position and its last value.
fn lower_properties(nodes: &[PropertyNode<'_>]) -> (Properties, PropertyRanges) {
    let mut props = Properties::new();
    let mut ranges = PropertyRanges::new();
    for property in nodes {
        let name = property.name.text().to_string();
        let value = lower_value(property.value);
        ranges.insert(name.clone(), property_source_map(property, value.clone()));
        props.insert(name, value);
    }
    (props, ranges)
}

fn property_source_map(node: &PropertyNode<'_>, value: PropertyValue) -> PropertySourceMap {
    PropertySourceMap {
        name: node.name.text().to_string(),
        value,
        range: node.range(),
        name_range: node.name.range,
        value_range: node.value.range,
    }
}

/// Convert a value token to a property value.
///
/// String literals and hex colors stay strings. Any other token whose text
/// reads as a finite number becomes a number, so `columns: 3` and an
/// identifier such as `0` are both numeric.
fn lower_value(token: Tok<'_>) -> PropertyValue {
    match token.token {
        Token::StringLiteral(raw) => PropertyValue::String(unquote(raw)),
        Token::HexColor(raw) => PropertyValue::String(raw.to_string()),
        _ => {
            let text = token.text();
            match text.parse::<f64>() {
                Ok(number) if number.is_finite() => PropertyValue::Number(number),
                _ => PropertyValue::String(text.to_string()),
            }
        }
    }
}

/// Textual form of a value token, used for the string-only project maps.
fn text_value(token: Tok<'_>) -> String {
    match token.token {
        Token::StringLiteral(raw) => unquote(raw),
        _ => token.text().to_string(),
    }
}

/// Strip the surrounding quotes of a string literal and resolve escapes.
///
/// Unknown escape sequences are kept as written.
pub(crate) fn unquote(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
