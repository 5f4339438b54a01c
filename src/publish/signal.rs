// src/publish/signal.rs
// =============================================================================
// Translates a PackageGraph into Graph Commons "signals".
//
// A signal is one creation instruction. The API builds the remote graph by
// replaying them in order, and an edge may only name nodes that an earlier
// signal created. So: every node first, then every edge.
// =============================================================================

use crate::graph::PackageGraph;
use serde::Serialize;

/// One node/edge creation instruction for the graph API
///
/// Serializes as e.g. `{"action": "node_create", "name": "react", "type": "PACKAGE"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Signal {
    NodeCreate {
        name: String,
        #[serde(rename = "type")]
        kind: String,
    },
    EdgeCreate {
        from_name: String,
        from_type: String,
        to_name: String,
        to_type: String,
        /// The edge type, e.g. "DEPENDS"
        name: String,
        weight: u32,
    },
}

pub fn signals(graph: &PackageGraph) -> Vec<Signal> {
    let nodes = graph.nodes().map(|node| Signal::NodeCreate {
        name: node.name.clone(),
        kind: node.kind.clone(),
    });

    let edges = graph.edges().map(|(from, to, edge)| Signal::EdgeCreate {
        from_name: from.name.clone(),
        from_type: from.kind.clone(),
        to_name: to.name.clone(),
        to_type: to.kind.clone(),
        name: edge.kind.clone(),
        weight: 1,
    });

    nodes.chain(edges).collect()
}
