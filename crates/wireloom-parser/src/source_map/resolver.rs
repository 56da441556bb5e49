//! Read-only queries over a finished [`SourceMap`].

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::source_map::{SourceMap, SourceMapEntry, SourceNodeType};

/// Aggregate figures about a source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapStats {
    pub total_nodes: usize,
    pub nodes_by_type: IndexMap<SourceNodeType, usize>,
    /// Depth of the deepest entry; the root has depth 0.
    pub max_depth: usize,
}

/// Indexed view over a source map.
///
/// Building the resolver is linear in the number of entries; id, parent,
/// children and sibling lookups are then constant time. The map itself is
/// only borrowed and never modified.
#[derive(Debug)]
pub struct SourceMapResolver<'a> {
    entries: &'a [SourceMapEntry],
    by_id: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<usize>>,
    depths: Vec<usize>,
}

impl<'a> SourceMapResolver<'a> {
    pub fn new(source_map: &'a SourceMap) -> Self {
        let entries = source_map.entries();

        let mut by_id = HashMap::with_capacity(entries.len());
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            by_id.entry(entry.node_id.as_str()).or_insert(index);
            if let Some(parent) = entry.parent_id.as_deref() {
                children.entry(parent).or_default().push(index);
            }
        }

        // Parents are always recorded before their children, so one forward
        // pass settles every depth.
        let mut depths = vec![0; entries.len()];
        for (index, entry) in entries.iter().enumerate() {
            if let Some(&parent) = entry
                .parent_id
                .as_deref()
                .and_then(|parent| by_id.get(parent))
            {
                if parent < index {
                    depths[index] = depths[parent] + 1;
                }
            }
        }

        debug!(entries = entries.len(); "Built source map resolver");
        Self {
            entries,
            by_id,
            children,
            depths,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_node_by_id(&self, node_id: &str) -> Option<&'a SourceMapEntry> {
        self.by_id.get(node_id).map(|&index| &self.entries[index])
    }

    /// The deepest entry whose range contains `(line, column)`.
    ///
    /// Ranges are inclusive on both ends. When several entries at the same
    /// depth match, the first in map order wins.
    pub fn get_node_by_position(&self, line: usize, column: usize) -> Option<&'a SourceMapEntry> {
        let mut best: Option<usize> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            if !entry.range.contains(line, column) {
                continue;
            }
            if best.is_none_or(|current| self.depths[index] > self.depths[current]) {
                best = Some(index);
            }
        }
        best.map(|index| &self.entries[index])
    }

    /// Direct children, in source order. Empty for leaves and unknown ids.
    pub fn get_children(&self, node_id: &str) -> Vec<&'a SourceMapEntry> {
        self.children
            .get(node_id)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// The parent entry; `None` for the root and unknown ids.
    pub fn get_parent(&self, node_id: &str) -> Option<&'a SourceMapEntry> {
        let entry = self.get_node_by_id(node_id)?;
        self.get_node_by_id(entry.parent_id.as_deref()?)
    }

    /// Other children of the same parent, excluding the node itself.
    pub fn get_siblings(&self, node_id: &str) -> Vec<&'a SourceMapEntry> {
        let Some(parent) = self
            .get_node_by_id(node_id)
            .and_then(|entry| entry.parent_id.as_deref())
        else {
            return Vec::new();
        };
        self.get_children(parent)
            .into_iter()
            .filter(|sibling| sibling.node_id != node_id)
            .collect()
    }

    /// Chain of entries from the root down to `node_id`, inclusive.
    ///
    /// Empty when the id is unknown.
    pub fn get_path(&self, node_id: &str) -> Vec<&'a SourceMapEntry> {
        let mut path = Vec::new();
        let mut current = self.by_id.get(node_id).copied();
        while let Some(index) = current {
            let entry = &self.entries[index];
            path.push(entry);
            current = entry
                .parent_id
                .as_deref()
                .and_then(|parent| self.by_id.get(parent).copied())
                .filter(|&parent| parent < index);
        }
        path.reverse();
        path
    }

    /// Entries of one type, optionally restricted to a component or layout
    /// subtype (`Button`, `grid`, ...).
    pub fn get_nodes_by_type(
        &self,
        node_type: SourceNodeType,
        subtype: Option<&str>,
    ) -> Vec<&'a SourceMapEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.node_type == node_type)
            .filter(|entry| subtype.is_none_or(|wanted| entry.subtype() == Some(wanted)))
            .collect()
    }

    /// Depth of a node below the root; `None` for unknown ids.
    pub fn depth(&self, node_id: &str) -> Option<usize> {
        self.by_id.get(node_id).map(|&index| self.depths[index])
    }

    pub fn get_stats(&self) -> SourceMapStats {
        let mut nodes_by_type = IndexMap::new();
        for entry in self.entries {
            *nodes_by_type.entry(entry.node_type).or_insert(0) += 1;
        }
        SourceMapStats {
            total_nodes: self.entries.len(),
            nodes_by_type,
            max_depth: self.depths.iter().copied().max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{CodeRange, Position};

    fn entry(
        id: &str,
        node_type: SourceNodeType,
        parent: Option<&str>,
        start: (usize, usize),
        end: (usize, usize),
    ) -> SourceMapEntry {
        let mut entry = SourceMapEntry::new(
            id.to_string(),
            node_type,
            CodeRange::new(
                Position::new(start.0, start.1, None),
                Position::new(end.0, end.1, None),
            ),
        );
        entry.parent_id = parent.map(str::to_string);
        entry
    }

    fn sample() -> SourceMap {
        let mut button = entry(
            "component-button-0",
            SourceNodeType::Component,
            Some("layout-stack-0"),
            (3, 6),
            (3, 30),
        );
        button.component_type = Some("Button".to_string());
        let mut text = entry(
            "component-text-0",
            SourceNodeType::Component,
            Some("layout-stack-0"),
            (4, 6),
            (4, 30),
        );
        text.component_type = Some("Text".to_string());
        let mut stack = entry(
            "layout-stack-0",
            SourceNodeType::Layout,
            Some("screen-0"),
            (2, 4),
            (5, 5),
        );
        stack.layout_type = Some("stack".to_string());

        SourceMap::new(vec![
            entry("project", SourceNodeType::Project, None, (1, 0), (6, 1)),
            entry("screen-0", SourceNodeType::Screen, Some("project"), (2, 2), (5, 7)),
            stack,
            button,
            text,
        ])
    }

    #[test]
    fn test_lookup_by_id() {
        let map = sample();
        let resolver = SourceMapResolver::new(&map);

        assert_eq!(resolver.len(), 5);
        assert!(!resolver.is_empty());
        assert_eq!(
            resolver.get_node_by_id("screen-0").unwrap().node_type,
            SourceNodeType::Screen
        );
        assert!(resolver.get_node_by_id("screen-9").is_none());
    }

    #[test]
    fn test_position_prefers_deepest() {
        let map = sample();
        let resolver = SourceMapResolver::new(&map);

        let hit = resolver.get_node_by_position(3, 10).unwrap();
        assert_eq!(hit.node_id, "component-button-0");
        let hit = resolver.get_node_by_position(5, 6).unwrap();
        assert_eq!(hit.node_id, "screen-0");
        assert_eq!(resolver.get_node_by_position(1, 0).unwrap().node_id, "project");
        assert!(resolver.get_node_by_position(9, 0).is_none());
    }

    #[test]
    fn test_hierarchy_navigation() {
        let map = sample();
        let resolver = SourceMapResolver::new(&map);

        let children: Vec<_> = resolver
            .get_children("layout-stack-0")
            .iter()
            .map(|e| e.node_id.as_str())
            .collect();
        assert_eq!(children, ["component-button-0", "component-text-0"]);
        assert!(resolver.get_children("component-text-0").is_empty());

        assert!(resolver.get_parent("project").is_none());
        assert_eq!(
            resolver.get_parent("component-text-0").unwrap().node_id,
            "layout-stack-0"
        );

        let siblings = resolver.get_siblings("component-button-0");
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].node_id, "component-text-0");
        assert!(resolver.get_siblings("project").is_empty());
    }

    #[test]
    fn test_path_is_root_first() {
        let map = sample();
        let resolver = SourceMapResolver::new(&map);

        let path: Vec<_> = resolver
            .get_path("component-text-0")
            .iter()
            .map(|e| e.node_id.as_str())
            .collect();
        assert_eq!(
            path,
            ["project", "screen-0", "layout-stack-0", "component-text-0"]
        );
        assert_eq!(resolver.depth("component-text-0"), Some(3));
        assert!(resolver.get_path("missing").is_empty());
    }

    #[test]
    fn test_nodes_by_type_and_stats() {
        let map = sample();
        let resolver = SourceMapResolver::new(&map);

        assert_eq!(
            resolver
                .get_nodes_by_type(SourceNodeType::Component, None)
                .len(),
            2
        );
        let buttons = resolver.get_nodes_by_type(SourceNodeType::Component, Some("Button"));
        assert_eq!(buttons.len(), 1);
        assert!(
            resolver
                .get_nodes_by_type(SourceNodeType::Layout, Some("grid"))
                .is_empty()
        );

        let stats = resolver.get_stats();
        assert_eq!(stats.total_nodes, 5);
        assert_eq!(stats.nodes_by_type[&SourceNodeType::Component], 2);
        assert_eq!(stats.nodes_by_type[&SourceNodeType::Project], 1);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_empty_map() {
        let map = SourceMap::default();
        let resolver = SourceMapResolver::new(&map);

        assert!(resolver.is_empty());
        assert!(resolver.get_node_by_position(1, 0).is_none());
        assert_eq!(resolver.get_stats().max_depth, 0);
    }
}
