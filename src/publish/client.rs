// src/publish/client.rs
// =============================================================================
// Minimal client for the Graph Commons REST API.
//
// Only one call is needed: POST /graphs with a name, a description and the
// signal list. The response carries the new graph's id, from which we build
// the public URL.
//
// Authentication is a single API key sent in the `Authentication` header
// (that is the header name the API expects, not a typo for Authorization).
// =============================================================================

use super::Signal;
use crate::config::PublishSettings;
use crate::error::{DepGraphError, PublishError, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct CreateGraphRequest<'a> {
    name: &'a str,
    description: &'a str,
    signals: &'a [Signal],
}

pub struct GraphCommonsClient {
    client: Client,
    api_base: String,
    share_base: String,
    api_key: String,
}

impl GraphCommonsClient {
    pub fn new(settings: &PublishSettings, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DepGraphError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            share_base: settings.share_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    // Creates a new remote graph from `signals` and returns its id
    pub async fn create_graph(
        &self,
        name: &str,
        description: &str,
        signals: &[Signal],
    ) -> Result<String> {
        let url = format!("{}/graphs", self.api_base);
        let body = CreateGraphRequest {
            name,
            description,
            signals,
        };
        debug!(url = %url, signals = signals.len(), "creating graph");

        let response = self
            .client
            .post(&url)
            .header("Authentication", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(PublishError::from)?;

        let status = response.status();
        let text = response.text().await.map_err(PublishError::from)?;

        if !status.is_success() {
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        Ok(graph_id(&text)?)
    }

    /// Public URL of a created graph
    pub fn graph_url(&self, id: &str) -> String {
        format!("{}/graphs/{}", self.share_base, id)
    }
}

// Pulls `graph.id` out of a create-graph response
//
// The id is normally a string, but accept a number too.
fn graph_id(body: &str) -> std::result::Result<String, PublishError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PublishError::Response(format!("invalid JSON: {}", e)))?;

    match &value["graph"]["id"] {
        serde_json::Value::String(id) if !id.is_empty() => Ok(id.clone()),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        _ => Err(PublishError::Response("missing graph.id".to_string())),
    }
}
