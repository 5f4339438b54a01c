// src/registry/mod.rs
// =============================================================================
// Everything that touches the registry website directly.
//
// Submodules:
// - fetch: downloads pages (PageFetcher trait + reqwest implementation)
// - extract: finds package names inside downloaded HTML
// =============================================================================

mod extract;
mod fetch;

pub use extract::Extractor;
pub use fetch::{HttpFetcher, PageFetcher};
