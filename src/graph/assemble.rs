// src/graph/assemble.rs
// =============================================================================
// The package dependency graph.
//
// Nodes are packages, edges point from a package to something it depends on.
// Both carry a "type" attribute ("PACKAGE" / "DEPENDS") because that is what
// the graph-hosting service groups and colors by.
//
// The graph sits on a petgraph DiGraph plus a name -> node index map, so
// adding a node or an edge that already exists is a no-op. That makes
// assembly idempotent and keeps every edge endpoint a real node.
// =============================================================================

use crate::crawl::DependencyMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

pub const PACKAGE: &str = "PACKAGE";
pub const DEPENDS: &str = "DEPENDS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependsEdge {
    pub kind: String,
}

#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    graph: DiGraph<PackageNode, DependsEdge>,
    index: HashMap<String, NodeIndex>,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from resolved dependencies
    ///
    /// A dependency that was never crawled itself still becomes a node, just
    /// one without outgoing edges.
    pub fn from_dependencies(dependencies: &DependencyMap) -> Self {
        let mut graph = Self::new();
        graph.extend_from(dependencies);
        graph
    }

    pub fn extend_from(&mut self, dependencies: &DependencyMap) {
        for (package, deps) in dependencies {
            self.add_node(package, PACKAGE);
            for dep in deps {
                self.add_edge(package, dep, DEPENDS);
            }
        }
    }

    /// Adds a node unless one with this name exists already
    ///
    /// An existing node keeps its original type.
    pub fn add_node(&mut self, name: &str, kind: &str) -> NodeIndex {
        if let Some(&index) = self.index.get(name) {
            return index;
        }

        let index = self.graph.add_node(PackageNode {
            name: name.to_string(),
            kind: kind.to_string(),
        });
        self.index.insert(name.to_string(), index);
        index
    }

    /// Adds `from -> to`, creating missing endpoints as packages
    ///
    /// Repeating an edge replaces its type instead of adding a parallel edge.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: &str) {
        let source = self.add_node(from, PACKAGE);
        let target = self.add_node(to, PACKAGE);
        self.graph.update_edge(
            source,
            target,
            DependsEdge {
                kind: kind.to_string(),
            },
        );
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&source), Some(&target)) => self.graph.contains_edge(source, target),
            _ => false,
        }
    }

    pub fn node(&self, name: &str) -> Option<&PackageNode> {
        self.index.get(name).map(|&index| &self.graph[index])
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &PackageNode> + '_ {
        self.graph.node_indices().map(move |index| &self.graph[index])
    }

    /// Edges in insertion order as (source, target, edge)
    pub fn edges(&self) -> impl Iterator<Item = (&PackageNode, &PackageNode, &DependsEdge)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    // Order-independent views used for equality
    fn node_set(&self) -> BTreeSet<(&str, &str)> {
        self.nodes()
            .map(|node| (node.name.as_str(), node.kind.as_str()))
            .collect()
    }

    fn edge_set(&self) -> BTreeSet<(&str, &str, &str)> {
        self.edges()
            .map(|(from, to, edge)| (from.name.as_str(), to.name.as_str(), edge.kind.as_str()))
            .collect()
    }
}

/// Two graphs are equal when they have the same named nodes with the same
/// types and the same typed edges, whatever order they were added in
impl PartialEq for PackageGraph {
    fn eq(&self, other: &Self) -> bool {
        self.node_set() == other.node_set() && self.edge_set() == other.edge_set()
    }
}

impl Eq for PackageGraph {}
