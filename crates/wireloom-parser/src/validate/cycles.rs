//! Circular definition detection.
//!
//! Component and layout definitions share one dependency graph. Nodes are
//! keyed `component:<Name>` or `layout:<name>` so that a component whose
//! body uses a layout that in turn uses the component is caught by the same
//! search. Built-in types never become nodes.

use std::collections::{HashMap, HashSet};

use log::trace;
use petgraph::graph::{DiGraph, NodeIndex};

use wireloom_core::ast::{Definition, DefinitionBody, NodeRef, Project};

use super::Validator;
use crate::error::{Diagnostic, ErrorCode};

/// Dependency graph between user definitions.
struct DefinitionGraph<'a> {
    graph: DiGraph<&'a str, ()>,
}

impl<'a> DefinitionGraph<'a> {
    fn build(project: &'a Project) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        // The first definition of a name owns the node.
        for definition in &project.definitions {
            let key = definition_key(definition);
            if !nodes.contains_key(&key) {
                let index = graph.add_node(definition.name());
                nodes.insert(key, index);
            }
        }

        let mut edges = Vec::new();
        for definition in &project.definitions {
            let Some(&from) = nodes.get(&definition_key(definition)) else {
                continue;
            };
            let root = match definition {
                Definition::Component(def) => match &def.body {
                    DefinitionBody::Layout(layout) => NodeRef::Layout(layout),
                    DefinitionBody::Component(component) => NodeRef::Component(component),
                },
                Definition::Layout(def) => NodeRef::Layout(&def.layout),
            };
            root.walk(&mut |node| {
                let key = match node {
                    NodeRef::Component(c) => format!("component:{}", c.component_type),
                    NodeRef::Layout(l) => format!("layout:{}", l.layout_type),
                    _ => return,
                };
                if let Some(&to) = nodes.get(&key) {
                    edges.push((from, to));
                }
            });
        }
        for (from, to) in edges {
            graph.update_edge(from, to, ());
        }

        trace!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Built definition graph"
        );
        Self { graph }
    }

    /// Successors in the order their edges were added.
    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut successors: Vec<_> = self.graph.neighbors(node).collect();
        // petgraph yields the most recent edge first
        successors.reverse();
        successors
    }

    /// Every cycle reachable in the graph, as name chains that start and
    /// end on the same definition.
    ///
    /// Iterative depth-first search from each node in definition order. A
    /// node is resolved once fully explored and never searched again; an
    /// edge back into the current search stack closes a cycle.
    fn cycles(&self) -> Vec<Vec<&'a str>> {
        let mut cycles = Vec::new();
        let mut resolved: HashSet<NodeIndex> = HashSet::new();

        for start in self.graph.node_indices() {
            if resolved.contains(&start) {
                continue;
            }

            let mut on_stack: HashSet<NodeIndex> = HashSet::from([start]);
            let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
                vec![(start, self.successors(start), 0)];

            while let Some((node, successors, cursor)) = stack.last_mut() {
                let Some(&next) = successors.get(*cursor) else {
                    let node = *node;
                    stack.pop();
                    on_stack.remove(&node);
                    resolved.insert(node);
                    continue;
                };
                *cursor += 1;

                if on_stack.contains(&next) {
                    let from = stack
                        .iter()
                        .position(|(n, ..)| *n == next)
                        .unwrap_or_default();
                    let mut chain: Vec<&str> =
                        stack[from..].iter().map(|(n, ..)| self.graph[*n]).collect();
                    chain.push(self.graph[next]);
                    cycles.push(chain);
                } else if !resolved.contains(&next) {
                    on_stack.insert(next);
                    stack.push((next, self.successors(next), 0));
                }
            }
        }

        cycles
    }
}

fn definition_key(definition: &Definition) -> String {
    match definition {
        Definition::Component(def) => format!("component:{}", def.name),
        Definition::Layout(def) => format!("layout:{}", def.name),
    }
}

/// Cycles among a project's definitions, each as a chain of names.
pub(crate) fn find_cycles(project: &Project) -> Vec<Vec<&str>> {
    DefinitionGraph::build(project).cycles()
}

impl Validator<'_> {
    /// Report every cycle in one error anchored at the project.
    pub(super) fn check_cycles(&mut self, project: &Project) {
        let cycles = find_cycles(project);
        if cycles.is_empty() {
            return;
        }

        let chains: Vec<String> = cycles.iter().map(|chain| chain.join(" → ")).collect();
        let diagnostic = Diagnostic::error(
            ErrorCode::DefinitionCycle,
            format!("circular definitions: {}", chains.join("; ")),
        )
        .with_suggestion("break the cycle by removing one of the references");
        self.emit(diagnostic, project.source_map_id.as_deref());
    }
}
