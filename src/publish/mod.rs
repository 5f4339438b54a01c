// src/publish/mod.rs
// =============================================================================
// Uploads a package graph to Graph Commons so it can be browsed online.
//
// Submodules:
// - signal: PackageGraph -> ordered list of creation signals
// - client: the HTTP call that submits them
// =============================================================================

mod client;
mod signal;

pub use client::GraphCommonsClient;
pub use signal::{signals, Signal};

use crate::config::PublishSettings;
use crate::error::{DepGraphError, Result};
use crate::graph::PackageGraph;
use tracing::info;

// Publishes `graph` as a new remote graph and returns its public URL
//
// The API key is required here and nowhere else, so a missing key only
// fails runs that actually publish.
pub async fn publish(graph: &PackageGraph, settings: &PublishSettings) -> Result<String> {
    let api_key = settings.api_key.clone().ok_or_else(|| {
        DepGraphError::Config(
            "no Graph Commons API key (set GRAPHCOMMONS_API_KEY or pass --api-key)".to_string(),
        )
    })?;

    let signals = signals(graph);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "publishing {} signal(s)",
        signals.len()
    );

    let client = GraphCommonsClient::new(settings, api_key)?;
    let id = client
        .create_graph(&settings.graph_name, &settings.graph_description, &signals)
        .await?;

    Ok(client.graph_url(&id))
}
