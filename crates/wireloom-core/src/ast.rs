//! Abstract syntax tree for Wireloom projects.
//!
//! The AST is the hand-off artifact of the parser: a typed, ordered tree
//! whose child order is exactly the order written in the source. Consumers
//! (the IR normalizer, editor tooling) read it but never mutate it.
//!
//! Every node carries an optional `source_map_id`, a non-owning back
//! reference to the matching source-map entry. It is `None` for trees
//! returned by the strict entry point.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Property values are either strings or numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Number(f64),
}

impl PropertyValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            PropertyValue::Number(_) => None,
        }
    }

    /// Returns the numeric payload, if this is a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            PropertyValue::String(_) => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "{s}"),
            PropertyValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Ordered property map. Insertion order is source order.
pub type Properties = IndexMap<String, PropertyValue>;

/// Root of a parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub style: IndexMap<String, String>,
    pub mocks: IndexMap<String, String>,
    pub colors: IndexMap<String, String>,
    pub definitions: Vec<Definition>,
    pub screens: Vec<Screen>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

impl Project {
    /// Iterates over the component definitions, in source order.
    pub fn component_definitions(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Component(def) => Some(def),
            Definition::Layout(_) => None,
        })
    }

    /// Iterates over the layout definitions, in source order.
    pub fn layout_definitions(&self) -> impl Iterator<Item = &LayoutDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Layout(def) => Some(def),
            Definition::Component(_) => None,
        })
    }

    /// Removes every source-map annotation from the tree.
    pub fn clear_source_map_ids(&mut self) {
        self.source_map_id = None;
        for definition in &mut self.definitions {
            match definition {
                Definition::Component(def) => {
                    def.source_map_id = None;
                    match &mut def.body {
                        DefinitionBody::Layout(layout) => layout.clear_source_map_ids(),
                        DefinitionBody::Component(component) => component.source_map_id = None,
                    }
                }
                Definition::Layout(def) => {
                    def.source_map_id = None;
                    def.layout.clear_source_map_ids();
                }
            }
        }
        for screen in &mut self.screens {
            screen.source_map_id = None;
            screen.layout.clear_source_map_ids();
        }
    }
}

/// A user-declared reusable component or layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Definition {
    Component(ComponentDefinition),
    Layout(LayoutDefinition),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Component(def) => &def.name,
            Definition::Layout(def) => &def.name,
        }
    }
}

/// `define Component "Name" { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    pub name: String,
    pub body: DefinitionBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

/// Body of a component definition: a single layout or a single component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DefinitionBody {
    Layout(Layout),
    Component(Component),
}

/// `define Layout "name" { layout ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDefinition {
    pub name: String,
    pub layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub name: String,
    pub params: Properties,
    pub layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

/// A layout container. Children are kept in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub layout_type: String,
    pub params: Properties,
    pub children: Vec<LayoutChild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

impl Layout {
    fn clear_source_map_ids(&mut self) {
        self.source_map_id = None;
        for child in &mut self.children {
            match child {
                LayoutChild::Component(component) => component.source_map_id = None,
                LayoutChild::Layout(layout) => layout.clear_source_map_ids(),
                LayoutChild::Cell(cell) => {
                    cell.source_map_id = None;
                    for child in &mut cell.children {
                        match child {
                            CellChild::Component(component) => component.source_map_id = None,
                            CellChild::Layout(layout) => layout.clear_source_map_ids(),
                        }
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutChild {
    Component(Component),
    Layout(Layout),
    Cell(Cell),
}

/// A grid cell: properties plus an ordered list of children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub props: Properties,
    pub children: Vec<CellChild>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellChild {
    Component(Component),
    Layout(Layout),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub component_type: String,
    pub props: Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map_id: Option<String>,
}

/// Borrowed, closed view over every AST node kind.
///
/// Lets passes such as validation match exhaustively instead of
/// special-casing each container type.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Project(&'a Project),
    Screen(&'a Screen),
    Layout(&'a Layout),
    Cell(&'a Cell),
    Component(&'a Component),
    ComponentDefinition(&'a ComponentDefinition),
    LayoutDefinition(&'a LayoutDefinition),
}

impl<'a> NodeRef<'a> {
    /// The source-map identifier attached to this node, if any.
    pub fn source_map_id(&self) -> Option<&'a str> {
        match self {
            NodeRef::Project(node) => node.source_map_id.as_deref(),
            NodeRef::Screen(node) => node.source_map_id.as_deref(),
            NodeRef::Layout(node) => node.source_map_id.as_deref(),
            NodeRef::Cell(node) => node.source_map_id.as_deref(),
            NodeRef::Component(node) => node.source_map_id.as_deref(),
            NodeRef::ComponentDefinition(node) => node.source_map_id.as_deref(),
            NodeRef::LayoutDefinition(node) => node.source_map_id.as_deref(),
        }
    }

    /// Direct children of this node, in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::Project(project) => project
                .definitions
                .iter()
                .map(|def| match def {
                    Definition::Component(def) => NodeRef::ComponentDefinition(def),
                    Definition::Layout(def) => NodeRef::LayoutDefinition(def),
                })
                .chain(project.screens.iter().map(NodeRef::Screen))
                .collect(),
            NodeRef::Screen(screen) => vec![NodeRef::Layout(&screen.layout)],
            NodeRef::Layout(layout) => layout
                .children
                .iter()
                .map(|child| match child {
                    LayoutChild::Component(c) => NodeRef::Component(c),
                    LayoutChild::Layout(l) => NodeRef::Layout(l),
                    LayoutChild::Cell(c) => NodeRef::Cell(c),
                })
                .collect(),
            NodeRef::Cell(cell) => cell
                .children
                .iter()
                .map(|child| match child {
                    CellChild::Component(c) => NodeRef::Component(c),
                    CellChild::Layout(l) => NodeRef::Layout(l),
                })
                .collect(),
            NodeRef::Component(_) => Vec::new(),
            NodeRef::ComponentDefinition(def) => match &def.body {
                DefinitionBody::Layout(layout) => vec![NodeRef::Layout(layout)],
                DefinitionBody::Component(component) => vec![NodeRef::Component(component)],
            },
            NodeRef::LayoutDefinition(def) => vec![NodeRef::Layout(&def.layout)],
        }
    }

    /// Visits this node and all of its descendants in pre-order.
    pub fn walk(&self, f: &mut impl FnMut(NodeRef<'a>)) {
        f(*self);
        for child in self.children() {
            child.walk(f);
        }
    }
}
