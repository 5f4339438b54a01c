// src/error.rs
// =============================================================================
// Error types shared by the crawler, the graph store and the publisher.
//
// main.rs works with anyhow::Result and adds context; everything below it
// returns DepGraphError so callers (and tests) can match on what went wrong.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by every module below `main.rs`.
pub type Result<T> = std::result::Result<T, DepGraphError>;

#[derive(Debug, Error)]
pub enum DepGraphError {
    /// The request never produced a response (DNS, TLS, connection, timeout)
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered, but not with a 2xx status
    #[error("failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// A configured CSS selector could not be parsed
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Failures while reading or writing the edge-list file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No edge-list exists yet; expected when publishing without crawling first
    #[error("edge-list file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A package name that would not survive the pipe-delimited format
    #[error("package name {name:?} cannot be written to an edge-list")]
    InvalidName { name: String },

    /// A node or edge type that would not survive the pipe-delimited format
    #[error("type {kind:?} cannot be written to an edge-list")]
    InvalidType { kind: String },
}

/// Failures talking to the Graph Commons API.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("graph API rejected the request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("unexpected graph API response: {0}")]
    Response(String),
}
