// src/crawl/mod.rs
// =============================================================================
// This module crawls the registry.
//
// Features:
// - Paginated listing of the most depended-upon packages (paginator.rs)
// - Breadth-first dependency discovery with a depth limit (resolver.rs)
// - Every package page fetched at most once per run
//
// Both halves share a Crawler, which bundles the fetcher, the compiled
// selectors and the registry URLs so they don't have to be passed around
// separately.
// =============================================================================

mod paginator;
mod resolver;

pub use resolver::DependencyMap;

use crate::config::RegistrySettings;
use crate::error::Result;
use crate::registry::{Extractor, PageFetcher};
use tracing::info;

pub struct Crawler<'a> {
    fetcher: &'a dyn PageFetcher,
    extractor: &'a Extractor,
    registry: &'a RegistrySettings,
}

impl<'a> Crawler<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        extractor: &'a Extractor,
        registry: &'a RegistrySettings,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            registry,
        }
    }

    // Lists `size` seed packages and resolves their dependencies
    //
    // Parameters:
    //   size: how many packages to take from the top of the listing
    //   max_depth: dependency hops to follow from the seeds
    pub async fn crawl(&self, size: usize, max_depth: usize) -> Result<DependencyMap> {
        let seeds = self.list_packages(size).await?;
        info!("listed {} seed package(s)", seeds.len());

        self.find_dependencies(&seeds, max_depth, 0).await
    }
}
