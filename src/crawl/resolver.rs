// src/crawl/resolver.rs
// =============================================================================
// Discovers dependencies breadth-first, one depth level at a time.
//
// How it works:
// 1. The seed packages form the first frontier
// 2. Fetch every package page in the frontier and read its dependency list
// 3. Mark the frontier as visited
// 4. If we are still below max depth, the next frontier is every dependency
//    we just saw that has not been visited yet
// 5. Repeat until the frontier is empty or max depth is reached
//
// Each package is fetched at most once per run, so cycles (a -> b -> a) end
// naturally. The next frontier is only computed after every fetch of the
// current level has finished.
// =============================================================================

use super::Crawler;
use crate::error::{DepGraphError, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Package name -> its direct dependencies, in the order the registry lists them
pub type DependencyMap = BTreeMap<String, Vec<String>>;

impl Crawler<'_> {
    // Resolves the dependencies of `packages` and of everything they reach
    //
    // Parameters:
    //   packages: the seed set (duplicates are ignored)
    //   max_depth: how many dependency hops to follow (0 = seeds only)
    //   current_level: the depth the seeds sit at, normally 0
    //
    // Returns: one entry per package fetched. Dependencies found at the last
    // level are listed as values but get no entry of their own.
    pub async fn find_dependencies(
        &self,
        packages: &[String],
        max_depth: usize,
        current_level: usize,
    ) -> Result<DependencyMap> {
        let mut resolved = DependencyMap::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier = unvisited(packages.iter().cloned(), &visited);
        let mut level = current_level;

        while !frontier.is_empty() {
            info!(
                "depth {} of {}: visiting {} package(s)",
                level,
                max_depth,
                frontier.len()
            );

            let fetched = self.fetch_level(&frontier).await?;
            visited.extend(frontier);

            if level >= max_depth {
                resolved.extend(fetched);
                break;
            }

            frontier = unvisited(
                fetched.iter().flat_map(|(_, deps)| deps.iter().cloned()),
                &visited,
            );
            resolved.extend(fetched);
            level += 1;
        }

        Ok(resolved)
    }

    // Fetches one level's package pages
    //
    // Up to `concurrency` requests run at once. Results come back in frontier
    // order regardless of which request finishes first.
    async fn fetch_level(&self, packages: &[String]) -> Result<Vec<(String, Vec<String>)>> {
        let total = packages.len();
        let counter = AtomicUsize::new(0);
        let counter = &counter;

        stream::iter(packages)
            .map(|package| async move {
                let url = self.registry.package_page(package);
                let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
                info!("{}/{} - access: {}", n, total, url);

                let html = self.fetcher.fetch(&url).await?;
                let dependencies = self.extractor.dependency_names(&html);
                if dependencies.is_empty() {
                    debug!(package = %package, "no dependencies listed");
                }

                Ok::<_, DepGraphError>((package.clone(), dependencies))
            })
            .buffered(self.registry.concurrency.max(1))
            .try_collect()
            .await
    }
}

// Names not yet visited, de-duplicated, in first-seen order
fn unvisited(names: impl Iterator<Item = String>, visited: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|name| !visited.contains(name) && seen.insert(name.clone()))
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a loop instead of recursion?
//    - Each pass of the while loop is one depth level
//    - The visited set and the result map live in plain local variables
//    - No risk of running out of stack on deep graphs
//
// 2. What does .buffered(n) do?
//    - Runs up to n of the fetch futures at the same time
//    - Unlike buffer_unordered, it yields results in the original order
//    - With n = 1 the crawl is fully sequential
//
// 3. What is try_collect?
//    - Collects a stream of Result items into Result<Vec<_>>
//    - Stops at the first Err, so one failed fetch fails the whole level
//
// 4. Why AtomicUsize for the progress counter?
//    - Several fetch futures may bump it while others are still waiting
//    - An atomic can be updated through a shared reference (&), no Mutex
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RegistrySettings, SelectorSettings};
    use crate::registry::testing::{package_html, FakeFetcher};
    use crate::registry::Extractor;

    // A registry whose package pages follow the given dependency table
    fn registry_of(registry: &RegistrySettings, table: &[(&str, &[&str])]) -> FakeFetcher {
        table.iter().fold(FakeFetcher::new(), |fetcher, (name, deps)| {
            fetcher.page(registry.package_page(name), package_html(deps))
        })
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn extractor() -> Extractor {
        Extractor::from_settings(&SelectorSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_cycle_fetches_each_package_once() {
        let registry = RegistrySettings::default();
        let fetcher = registry_of(&registry, &[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let map = crawler.find_dependencies(&names(&["a"]), 5, 0).await.unwrap();

        assert_eq!(fetcher.requests().len(), 3);
        assert_eq!(map.len(), 3);
        assert_eq!(map["c"], vec!["a"]);
    }

    #[tokio::test]
    async fn test_depth_zero_only_fetches_seeds() {
        let registry = RegistrySettings::default();
        let fetcher = registry_of(&registry, &[("a", &["x", "y"]), ("b", &["z"])]);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let map = crawler
            .find_dependencies(&names(&["a", "b"]), 0, 0)
            .await
            .unwrap();

        assert_eq!(
            fetcher.requests(),
            vec![registry.package_page("a"), registry.package_page("b")]
        );
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map["a"], vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_empty_seed_fetches_nothing() {
        let registry = RegistrySettings::default();
        let fetcher = FakeFetcher::new();
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let map = crawler.find_dependencies(&[], 3, 0).await.unwrap();

        assert!(map.is_empty());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_shared_dependency_fetched_once() {
        // a and b both depend on c; c is reachable twice at depth 1
        let registry = RegistrySettings::default();
        let fetcher = registry_of(
            &registry,
            &[("a", &["c"]), ("b", &["c", "a"]), ("c", &["d"]), ("d", &[])],
        );
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let map = crawler
            .find_dependencies(&names(&["a", "b", "a"]), 3, 0)
            .await
            .unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 4);
        let distinct: HashSet<_> = requests.iter().collect();
        assert_eq!(distinct.len(), 4);
        assert_eq!(map.len(), 4);
    }

    #[tokio::test]
    async fn test_last_level_dependencies_are_not_fetched() {
        let registry = RegistrySettings::default();
        let fetcher = registry_of(&registry, &[("a", &["b"]), ("b", &["c"])]);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let map = crawler.find_dependencies(&names(&["a"]), 1, 0).await.unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], vec!["c"]);
        assert!(!map.contains_key("c"));
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_current_level_counts_toward_depth() {
        let registry = RegistrySettings::default();
        let fetcher = registry_of(&registry, &[("a", &["b"]), ("b", &["c"])]);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        // Starting at level 2 of 2 leaves no room to expand
        let map = crawler.find_dependencies(&names(&["a"]), 2, 2).await.unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_level_overlaps_fetches_in_order() {
        let registry = RegistrySettings {
            concurrency: 4,
            ..RegistrySettings::default()
        };
        let fetcher = registry_of(
            &registry,
            &[
                ("a", &["b", "c", "d"]),
                ("b", &["c"]),
                ("c", &["d", "a"]),
                ("d", &["b"]),
            ],
        );
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let map = crawler.find_dependencies(&names(&["a"]), 5, 0).await.unwrap();

        assert_eq!(map.len(), 4);
        // Level 1 is b, c, d: all three run together, started in frontier order
        assert_eq!(fetcher.max_in_flight(), 3);
        assert_eq!(
            fetcher.requests(),
            vec![
                registry.package_page("a"),
                registry.package_page("b"),
                registry.package_page("c"),
                registry.package_page("d"),
            ]
        );
        assert_eq!(map["a"], vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_sequential_by_default() {
        let registry = RegistrySettings::default();
        let fetcher = registry_of(
            &registry,
            &[("a", &["b", "c"]), ("b", &[]), ("c", &[])],
        );
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        crawler.find_dependencies(&names(&["a"]), 1, 0).await.unwrap();

        assert_eq!(fetcher.max_in_flight(), 1);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts() {
        let registry = RegistrySettings::default();
        // "b" has no page, so the second level fails
        let fetcher = registry_of(&registry, &[("a", &["b"])]);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let result = crawler.find_dependencies(&names(&["a"]), 2, 0).await;

        assert!(matches!(
            result,
            Err(DepGraphError::HttpStatus { status: 404, .. })
        ));
    }

    #[test]
    fn test_unvisited_dedups_in_order() {
        let visited: HashSet<String> = names(&["b"]).into_iter().collect();
        let frontier = unvisited(names(&["c", "b", "a", "c"]).into_iter(), &visited);
        assert_eq!(frontier, vec!["c", "a"]);
    }
}
