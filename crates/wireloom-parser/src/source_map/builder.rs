//! Incremental construction of a [`SourceMap`].
//!
//! The builder is driven by the lowering pass: it hands out node ids,
//! records each entry with the parent that is current at creation time and,
//! once the traversal is over, computes insertion points for every
//! container.
//!
//! Counters and the parent stack belong to one builder instance, so
//! independent parses never share state.

use std::collections::HashMap;

use log::trace;

use crate::{
    source_map::{InsertionPoint, NodeId, SourceMap, SourceMapEntry, SourceNodeType},
    span::{CodeRange, LineIndex},
};

pub(crate) struct SourceMapBuilder<'src> {
    lines: Option<LineIndex<'src>>,
    entries: Vec<SourceMapEntry>,
    parents: Vec<NodeId>,
    /// Next index per id prefix (`screen`, `cell`, `component-button`, ...).
    counters: HashMap<String, usize>,
    /// Occurrences of each definition name seen so far.
    definitions: HashMap<String, usize>,
}

impl<'src> SourceMapBuilder<'src> {
    /// Create a builder. Without source text, insertion points get an
    /// empty indentation.
    pub fn new(source: Option<&'src str>) -> Self {
        Self {
            lines: source.map(LineIndex::new),
            entries: Vec::new(),
            parents: Vec::new(),
            counters: HashMap::new(),
            definitions: HashMap::new(),
        }
    }

    /// Allocate the id for the next node of the given kind.
    ///
    /// `subtype` is the component or layout type for those kinds and the
    /// declared name for definitions; it is ignored otherwise.
    pub fn next_id(&mut self, node_type: SourceNodeType, subtype: Option<&str>) -> NodeId {
        let subtype = subtype.unwrap_or_default();
        match node_type {
            SourceNodeType::Project
            | SourceNodeType::Theme
            | SourceNodeType::Mocks
            | SourceNodeType::Colors => node_type.as_str().to_string(),
            SourceNodeType::Screen | SourceNodeType::Cell => self.counted(node_type.as_str()),
            SourceNodeType::Component | SourceNodeType::Layout => {
                self.counted(&format!("{node_type}-{}", subtype.to_lowercase()))
            }
            SourceNodeType::ComponentDefinition | SourceNodeType::LayoutDefinition => {
                let seen = self.definitions.entry(subtype.to_string()).or_default();
                let id = match *seen {
                    0 => format!("define-{subtype}"),
                    k => format!("define-{subtype}-{k}"),
                };
                *seen += 1;
                id
            }
        }
    }

    fn counted(&mut self, prefix: &str) -> NodeId {
        let counter = self.counters.entry(prefix.to_string()).or_default();
        let id = format!("{prefix}-{counter}");
        *counter += 1;
        id
    }

    /// Record an entry under the current parent and return its id.
    pub fn add(&mut self, mut entry: SourceMapEntry) -> NodeId {
        entry.parent_id = self.parents.last().cloned();
        trace!(node_id = entry.node_id.as_str(); "Source map entry");
        let id = entry.node_id.clone();
        self.entries.push(entry);
        id
    }

    /// Make `id` the parent of the entries added until the matching
    /// [`exit`](Self::exit).
    pub fn enter(&mut self, id: NodeId) {
        self.parents.push(id);
    }

    pub fn exit(&mut self) {
        self.parents.pop();
    }

    /// Finish the traversal and compute container insertion points.
    pub fn finish(mut self) -> SourceMap {
        let mut last_child: HashMap<&str, usize> = HashMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(parent) = entry.parent_id.as_deref() else {
                continue;
            };
            let is_later = last_child
                .get(parent)
                .is_none_or(|&current| end_key(&self.entries[current]) <= end_key(entry));
            if is_later {
                last_child.insert(parent, index);
            }
        }

        let points: Vec<Option<InsertionPoint>> = self
            .entries
            .iter()
            .map(|entry| {
                if !entry.node_type.is_container() {
                    return None;
                }
                let point = match last_child.get(entry.node_id.as_str()) {
                    Some(&child) => self.after_child(&self.entries[child]),
                    None => self.before_close(entry),
                };
                Some(point)
            })
            .collect();

        for (entry, point) in self.entries.iter_mut().zip(points) {
            entry.insertion_point = point;
        }

        SourceMap::new(self.entries)
    }

    fn after_child(&self, child: &SourceMapEntry) -> InsertionPoint {
        InsertionPoint {
            line: child.range.end.line,
            column: child.range.end.column,
            indentation: self.indentation(child.range.start.line).to_string(),
            after: Some(child.node_id.clone()),
        }
    }

    /// Just before the closing brace, one level deeper than the container.
    fn before_close(&self, container: &SourceMapEntry) -> InsertionPoint {
        let end = container.body_range.unwrap_or(container.range).end;
        let outer = self.indentation(container.range.start.line);
        let indentation = match &self.lines {
            None => String::new(),
            Some(_) if outer.starts_with('\t') => format!("{outer}\t"),
            Some(_) => format!("{outer}  "),
        };
        InsertionPoint {
            line: end.line,
            column: end.column.saturating_sub(1),
            indentation,
            after: None,
        }
    }

    fn indentation(&self, line: usize) -> &'src str {
        self.lines.as_ref().map_or("", |lines| lines.indentation(line))
    }
}

fn end_key(entry: &SourceMapEntry) -> (usize, usize) {
    (entry.range.end.line, entry.range.end.column)
}

/// Smallest range covering every given range; `None` when there is none.
pub(crate) fn hull(ranges: impl IntoIterator<Item = CodeRange>) -> Option<CodeRange> {
    ranges.into_iter().reduce(|acc, range| acc.union(range))
}
