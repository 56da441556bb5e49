//! Position-aware index of the AST.
//!
//! A [`SourceMap`] holds one [`SourceMapEntry`] per AST node (plus one per
//! project-level `style`, `mocks` and `colors` block) in traversal order.
//! Entries carry a stable node id, the node's source ranges, its parent id
//! and, for property-bearing nodes, per-property name and value ranges.
//!
//! Maps are produced by [`SourceMapBuilder`](builder::SourceMapBuilder)
//! while the CST is lowered, and queried through
//! [`SourceMapResolver`](resolver::SourceMapResolver).

pub(crate) mod builder;
pub mod resolver;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use wireloom_core::ast::PropertyValue;

use crate::span::CodeRange;

/// Stable, human-legible node identifier such as `component-button-0`.
pub type NodeId = String;

/// Kind of node a source-map entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceNodeType {
    Project,
    Theme,
    Mocks,
    Colors,
    Screen,
    Layout,
    Cell,
    Component,
    ComponentDefinition,
    LayoutDefinition,
}

impl SourceNodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceNodeType::Project => "project",
            SourceNodeType::Theme => "theme",
            SourceNodeType::Mocks => "mocks",
            SourceNodeType::Colors => "colors",
            SourceNodeType::Screen => "screen",
            SourceNodeType::Layout => "layout",
            SourceNodeType::Cell => "cell",
            SourceNodeType::Component => "component",
            SourceNodeType::ComponentDefinition => "component-definition",
            SourceNodeType::LayoutDefinition => "layout-definition",
        }
    }

    /// Returns `true` for node kinds that can hold child nodes.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SourceNodeType::Project
                | SourceNodeType::Screen
                | SourceNodeType::Layout
                | SourceNodeType::Cell
                | SourceNodeType::ComponentDefinition
                | SourceNodeType::LayoutDefinition
        )
    }
}

impl fmt::Display for SourceNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of one property: `name: value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySourceMap {
    pub name: String,
    pub value: PropertyValue,
    /// From the start of the name to the end of the value.
    pub range: CodeRange,
    pub name_range: CodeRange,
    pub value_range: CodeRange,
}

/// Where a new child could be inserted textually into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionPoint {
    pub line: usize,
    pub column: usize,
    /// Leading whitespace to use for the inserted line.
    pub indentation: String,
    /// The sibling the new node would follow, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapEntry {
    pub node_id: NodeId,
    #[serde(rename = "type")]
    pub node_type: SourceNodeType,
    pub range: CodeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_range: Option<CodeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_range: Option<CodeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_range: Option<CodeRange>,
    /// `None` only for the project root.
    pub parent_id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_user_defined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, PropertySourceMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insertion_point: Option<InsertionPoint>,
}

impl SourceMapEntry {
    pub(crate) fn new(node_id: NodeId, node_type: SourceNodeType, range: CodeRange) -> Self {
        Self {
            node_id,
            node_type,
            range,
            keyword_range: None,
            name_range: None,
            body_range: None,
            parent_id: None,
            name: None,
            layout_type: None,
            component_type: None,
            is_user_defined: None,
            properties: None,
            insertion_point: None,
        }
    }

    /// Component type or layout type, whichever applies.
    pub fn subtype(&self) -> Option<&str> {
        self.component_type
            .as_deref()
            .or(self.layout_type.as_deref())
    }
}

/// Flat list of entries in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SourceMap {
    entries: Vec<SourceMapEntry>,
}

impl SourceMap {
    pub(crate) fn new(entries: Vec<SourceMapEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SourceMapEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceMapEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear lookup by id. Use a [`resolver::SourceMapResolver`] for
    /// repeated queries.
    pub fn find(&self, node_id: &str) -> Option<&SourceMapEntry> {
        self.entries.iter().find(|entry| entry.node_id == node_id)
    }
}

impl<'a> IntoIterator for &'a SourceMap {
    type Item = &'a SourceMapEntry;
    type IntoIter = std::slice::Iter<'a, SourceMapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
