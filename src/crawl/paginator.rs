// src/crawl/paginator.rs
// =============================================================================
// Walks the registry's "most depended upon" listing page by page.
//
// How it works:
// 1. Start at offset 0
// 2. Fetch the listing page at the current offset
// 3. Append its package names one at a time, stopping as soon as we have
//    enough (even in the middle of a page)
// 4. The next offset is the number of names collected so far, which is how
//    the registry itself paginates
//
// A page with no names means we ran off the end of the listing (or the
// markup changed). Since the offset would never move again, we stop there
// and return what we have.
// =============================================================================

use super::Crawler;
use crate::error::Result;
use tracing::{info, warn};

impl Crawler<'_> {
    // Lists the first `target_count` packages of the registry listing
    //
    // Returns fewer names only when the listing runs dry first.
    pub async fn list_packages(&self, target_count: usize) -> Result<Vec<String>> {
        let mut packages = Vec::with_capacity(target_count);
        let mut page = 0;

        while packages.len() < target_count {
            let offset = packages.len();
            let url = self.registry.listing_page(offset);
            page += 1;
            info!("page {} - access: {}", page, url);

            let html = self.fetcher.fetch(&url).await?;
            let names = self.extractor.package_names(&html);

            if names.is_empty() {
                warn!(
                    offset,
                    "listing page yielded no packages, stopping with {} of {}",
                    packages.len(),
                    target_count
                );
                break;
            }

            for name in names {
                packages.push(name);
                if packages.len() >= target_count {
                    break;
                }
            }
        }

        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{RegistrySettings, SelectorSettings};
    use crate::crawl::Crawler;
    use crate::registry::testing::{listing_html, FakeFetcher};
    use crate::registry::Extractor;

    // A registry that serves `pages` listing pages of `per_page` names each
    fn paged_registry(registry: &RegistrySettings, per_page: usize, pages: usize) -> FakeFetcher {
        let mut fetcher = FakeFetcher::new();
        for page in 0..pages {
            let names: Vec<String> = (0..per_page)
                .map(|i| format!("pkg-{}", page * per_page + i))
                .collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            fetcher = fetcher.page(registry.listing_page(page * per_page), listing_html(&refs));
        }
        fetcher
    }

    fn extractor() -> Extractor {
        Extractor::from_settings(&SelectorSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_exact_multiple_of_page_size() {
        let registry = RegistrySettings::default();
        let fetcher = paged_registry(&registry, 5, 4);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let packages = crawler.list_packages(10).await.unwrap();

        assert_eq!(packages.len(), 10);
        assert_eq!(packages[0], "pkg-0");
        assert_eq!(packages[9], "pkg-9");
        assert_eq!(
            fetcher.requests(),
            vec![registry.listing_page(0), registry.listing_page(5)]
        );
    }

    #[tokio::test]
    async fn test_stops_mid_page() {
        let registry = RegistrySettings::default();
        let fetcher = paged_registry(&registry, 5, 4);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let packages = crawler.list_packages(7).await.unwrap();

        assert_eq!(packages.len(), 7);
        assert_eq!(packages[6], "pkg-6");
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_target_fetches_nothing() {
        let registry = RegistrySettings::default();
        let fetcher = paged_registry(&registry, 5, 1);
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        assert!(crawler.list_packages(0).await.unwrap().is_empty());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_offset_follows_collected_count() {
        // Pages of uneven size: the second request must use offset 3, not a
        // fixed page stride
        let registry = RegistrySettings::default();
        let fetcher = FakeFetcher::new()
            .page(registry.listing_page(0), listing_html(&["a", "b", "c"]))
            .page(registry.listing_page(3), listing_html(&["d", "e", "f", "g"]));
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let packages = crawler.list_packages(6).await.unwrap();

        assert_eq!(packages, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(
            fetcher.requests(),
            vec![registry.listing_page(0), registry.listing_page(3)]
        );
    }

    #[tokio::test]
    async fn test_empty_page_ends_pagination() {
        let registry = RegistrySettings::default();
        let fetcher = FakeFetcher::new()
            .page(registry.listing_page(0), listing_html(&["a", "b"]))
            .page(registry.listing_page(2), listing_html(&[]));
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        let packages = crawler.list_packages(50).await.unwrap();

        assert_eq!(packages, vec!["a", "b"]);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let registry = RegistrySettings::default();
        let fetcher = FakeFetcher::new();
        let extractor = extractor();
        let crawler = Crawler::new(&fetcher, &extractor, &registry);

        assert!(crawler.list_packages(3).await.is_err());
    }
}
