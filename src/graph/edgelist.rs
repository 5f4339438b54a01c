// src/graph/edgelist.rs
// =============================================================================
// Saves and loads the package graph as a pipe-delimited text file.
//
// Format, one record per line:
//   name|type=PACKAGE               a node
//   source|target|type=DEPENDS      an edge
//
// Every node gets its own line (before the edges) so that node types and
// packages without any edges survive a round trip. Blank lines are skipped,
// and so are lines starting with '#' that contain no '|'. Every record has a
// '|' and names never do, so a package called `#hash` is still a record.
//
// Files written by earlier versions of this tool carry networkx-style edge
// lines instead, e.g. `source|target|{'type': 'DEPENDS'}`, and no node lines.
// Those still load; missing endpoints become PACKAGE nodes.
// =============================================================================

use super::{PackageGraph, DEPENDS};
use crate::error::{PersistenceError, Result};
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

const DELIMITER: char = '|';

// Writes the graph to `path`, replacing any previous file
pub fn save(graph: &PackageGraph, path: &Path) -> Result<()> {
    let text = render(graph)?;

    std::fs::write(path, text).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "wrote {}",
        path.display()
    );
    Ok(())
}

// Reads a graph previously written by `save`
//
// A missing file is PersistenceError::NotFound, which callers treat as
// "nothing has been crawled yet".
pub fn load(path: &Path) -> Result<PackageGraph> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => PersistenceError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let graph = parse(&text, path)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded {}",
        path.display()
    );
    Ok(graph)
}

fn render(graph: &PackageGraph) -> Result<String> {
    let mut text = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(
        text,
        "# npm-depgraph edge-list: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    for node in graph.nodes() {
        check_name(&node.name)?;
        check_kind(&node.kind)?;
        let _ = writeln!(text, "{}{}type={}", node.name, DELIMITER, node.kind);
    }

    for (from, to, edge) in graph.edges() {
        check_kind(&edge.kind)?;
        let _ = writeln!(
            text,
            "{}{d}{}{d}type={}",
            from.name,
            to.name,
            edge.kind,
            d = DELIMITER
        );
    }

    Ok(text)
}

// Names that would be split, cut short or skipped when read back
fn check_name(name: &str) -> std::result::Result<(), PersistenceError> {
    let unreadable =
        name.is_empty() || name.contains(|c: char| c == DELIMITER || c == '\n' || c == '\r');

    if unreadable {
        return Err(PersistenceError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

// Types are trimmed on load, so padding would not survive either
fn check_kind(kind: &str) -> std::result::Result<(), PersistenceError> {
    let unreadable = kind.is_empty()
        || kind.trim() != kind
        || kind.contains(|c: char| c == DELIMITER || c == '\n' || c == '\r');

    if unreadable {
        return Err(PersistenceError::InvalidType {
            kind: kind.to_string(),
        });
    }
    Ok(())
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') && !line.contains(DELIMITER)
}

fn parse(text: &str, path: &Path) -> Result<PackageGraph> {
    let mut graph = PackageGraph::new();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() || is_comment(line) {
            continue;
        }

        let malformed = |reason: String| PersistenceError::Malformed {
            path: path.to_path_buf(),
            line: number + 1,
            reason,
        };

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.iter().take(2).any(|name| name.is_empty()) {
            return Err(malformed("empty package name".to_string()).into());
        }

        match fields.as_slice() {
            [name, attribute] => match parse_type(attribute) {
                Some(kind) => {
                    graph.add_node(name, &kind);
                }
                // networkx without edge data writes bare `source|target`
                None => graph.add_edge(name, attribute, DEPENDS),
            },
            [from, to, attribute] => {
                let kind = match parse_type(attribute) {
                    Some(kind) => kind,
                    None if attribute.trim() == "{}" => DEPENDS.to_string(),
                    None => {
                        return Err(
                            malformed(format!("unrecognized edge attributes '{}'", attribute))
                                .into(),
                        )
                    }
                };
                graph.add_edge(from, to, &kind);
            }
            _ => {
                return Err(
                    malformed(format!("expected 2 or 3 fields, found {}", fields.len())).into(),
                )
            }
        }
    }

    Ok(graph)
}

// Reads the "type" out of `type=X` or a Python dict literal like
// `{'type': 'X', 'weight': 1}`
fn parse_type(field: &str) -> Option<String> {
    let field = field.trim();

    if let Some(kind) = field.strip_prefix("type=") {
        return non_empty(kind);
    }

    let inner = field.strip_prefix('{')?.strip_suffix('}')?;
    inner.split(',').find_map(|entry| {
        let (key, value) = entry.split_once(':')?;
        if unquote(key) == "type" {
            non_empty(unquote(value))
        } else {
            None
        }
    })
}

fn unquote(text: &str) -> &str {
    text.trim().trim_matches(|c: char| c == '\'' || c == '"')
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
