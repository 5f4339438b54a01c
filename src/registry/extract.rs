// src/registry/extract.rs
// =============================================================================
// Pulls package names out of registry HTML.
//
// Two selectors are involved:
// - one for the names on a listing page
// - one for the dependency names on a package's dependencies tab
//
// Both come from the settings (see config.rs) and are compiled once, up
// front, so a typo in a config file fails before the first request instead
// of halfway through a crawl.
//
// A selector that matches nothing is not an error: the page simply yields no
// names. When the registry changes its markup this shows up as empty pages,
// which the paginator and the debug log make visible.
// =============================================================================

use crate::config::SelectorSettings;
use crate::error::{DepGraphError, Result};
use scraper::{Html, Selector};

/// Compiled selectors for listing and package pages
#[derive(Debug, Clone)]
pub struct Extractor {
    packages: Selector,
    dependencies: Selector,
}

impl Extractor {
    pub fn new(packages: &str, dependencies: &str) -> Result<Self> {
        Ok(Self {
            packages: parse_selector(packages)?,
            dependencies: parse_selector(dependencies)?,
        })
    }

    pub fn from_settings(settings: &SelectorSettings) -> Result<Self> {
        Self::new(
            &settings.packages_selector()?,
            &settings.dependencies_selector()?,
        )
    }

    /// Package names on a listing page, in page order
    pub fn package_names(&self, html: &str) -> Vec<String> {
        select_text(html, &self.packages)
    }

    /// Direct dependency names on a package page, in page order
    pub fn dependency_names(&self, html: &str) -> Vec<String> {
        select_text(html, &self.dependencies)
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DepGraphError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

// Collects the trimmed text of every matching element, skipping blank ones
fn select_text(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
