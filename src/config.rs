// src/config.rs
// =============================================================================
// Runtime settings for a crawl.
//
// Settings come from three places, later ones winning:
// 1. Built-in defaults (the live npmjs.com site and Graph Commons)
// 2. An optional TOML file passed with --config
// 3. Command-line flags (see cli.rs)
//
// The CSS selectors live here rather than next to the scraping code because
// they break whenever the registry changes its markup. They are grouped into
// named presets so a config file can pin the variant it was written for.
// =============================================================================

use crate::error::{DepGraphError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_OUTPUT: &str = "grid.edgelist";
pub const DEFAULT_GRAPH_NAME: &str = "NPM Dependency Graph";

/// Named selector sets for the npmjs.com markup.
///
/// `scoped` reads only the first list in the dependencies section (runtime
/// dependencies); `unscoped` reads every list in it, which also picks up the
/// dev-dependency list on pages that render one.
pub const SELECTOR_PRESETS: &[(&str, &str, &str)] = &[
    (
        "scoped",
        "section > div.w-80 > div > a > h3",
        "section#dependencies > ul:first-of-type > li > a",
    ),
    (
        "unscoped",
        "section > div.w-80 > div > a > h3",
        "section#dependencies > ul > li > a",
    ),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub registry: RegistrySettings,
    pub selectors: SelectorSettings,
    pub publish: PublishSettings,
    /// Where the edge-list is written after a crawl and read from otherwise
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// Listing of packages ranked by dependents; `?offset=<n>` is appended
    pub listing_url: String,
    /// Base for package pages; `/<name>?activeTab=dependencies` is appended
    pub package_url: String,
    pub verify_tls: bool,
    /// Per-request timeout in seconds, 0 disables it
    pub timeout_secs: u64,
    /// How many package pages of one depth level may be fetched at once
    pub concurrency: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            listing_url: "https://www.npmjs.com/browse/depended".to_string(),
            package_url: "https://www.npmjs.com/package".to_string(),
            verify_tls: true,
            timeout_secs: 30,
            concurrency: 1,
        }
    }
}

impl RegistrySettings {
    /// URL of the listing page starting at `offset`
    pub fn listing_page(&self, offset: usize) -> String {
        format!("{}?offset={}", self.listing_url, offset)
    }

    /// URL of a package's dependencies tab
    ///
    /// Scoped names like `@babel/core` are kept as-is; npmjs.com routes the
    /// unescaped slash.
    pub fn package_page(&self, name: &str) -> String {
        format!(
            "{}/{}?activeTab=dependencies",
            self.package_url.trim_end_matches('/'),
            name
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorSettings {
    pub preset: String,
    /// Overrides the preset's listing-page selector
    pub packages: Option<String>,
    /// Overrides the preset's package-page selector
    pub dependencies: Option<String>,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            preset: "scoped".to_string(),
            packages: None,
            dependencies: None,
        }
    }
}

impl SelectorSettings {
    fn preset_entry(&self) -> Result<&'static (&'static str, &'static str, &'static str)> {
        SELECTOR_PRESETS
            .iter()
            .find(|(name, _, _)| *name == self.preset)
            .ok_or_else(|| {
                let known: Vec<&str> = SELECTOR_PRESETS.iter().map(|(name, _, _)| *name).collect();
                DepGraphError::Config(format!(
                    "unknown selector preset '{}' (known: {})",
                    self.preset,
                    known.join(", ")
                ))
            })
    }

    pub fn packages_selector(&self) -> Result<String> {
        match &self.packages {
            Some(selector) => Ok(selector.clone()),
            None => Ok(self.preset_entry()?.1.to_string()),
        }
    }

    pub fn dependencies_selector(&self) -> Result<String> {
        match &self.dependencies {
            Some(selector) => Ok(selector.clone()),
            None => Ok(self.preset_entry()?.2.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishSettings {
    pub api_base: String,
    pub share_base: String,
    pub graph_name: String,
    pub graph_description: String,
    /// Usually supplied through GRAPHCOMMONS_API_KEY instead
    pub api_key: Option<String>,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            api_base: "https://graphcommons.com/api/v1".to_string(),
            share_base: "https://graphcommons.com".to_string(),
            graph_name: DEFAULT_GRAPH_NAME.to_string(),
            graph_description: DEFAULT_GRAPH_NAME.to_string(),
            api_key: None,
        }
    }
}

impl Settings {
    /// Loads settings from an optional TOML file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|e| {
            DepGraphError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&text)
            .map_err(|e| DepGraphError::Config(format!("{}: {}", path.display(), e)))
    }

    fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Checks everything that can be checked before the first request
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("registry.listing_url", &self.registry.listing_url),
            ("registry.package_url", &self.registry.package_url),
            ("publish.api_base", &self.publish.api_base),
            ("publish.share_base", &self.publish.share_base),
        ] {
            Url::parse(value)
                .map_err(|e| DepGraphError::Config(format!("{} '{}': {}", key, value, e)))?;
        }

        if self.registry.concurrency == 0 {
            return Err(DepGraphError::Config(
                "registry.concurrency must be at least 1".to_string(),
            ));
        }

        self.selectors.packages_selector()?;
        self.selectors.dependencies_selector()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.registry.verify_tls);
        assert_eq!(settings.output_path(), PathBuf::from("grid.edgelist"));
    }

    #[test]
    fn test_registry_urls() {
        let registry = RegistrySettings::default();
        assert_eq!(
            registry.listing_page(36),
            "https://www.npmjs.com/browse/depended?offset=36"
        );
        assert_eq!(
            registry.package_page("@babel/core"),
            "https://www.npmjs.com/package/@babel/core?activeTab=dependencies"
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            output = "deps.edgelist"

            [registry]
            verify_tls = false
            concurrency = 4

            [selectors]
            preset = "unscoped"
            "#,
        )
        .unwrap();

        assert!(!settings.registry.verify_tls);
        assert_eq!(settings.registry.concurrency, 4);
        assert_eq!(settings.registry.timeout_secs, 30);
        assert_eq!(settings.output_path(), PathBuf::from("deps.edgelist"));
        assert_eq!(
            settings.selectors.dependencies_selector().unwrap(),
            "section#dependencies > ul > li > a"
        );
        assert_eq!(settings.publish.graph_name, DEFAULT_GRAPH_NAME);
    }

    #[test]
    fn test_selector_override_wins_over_preset() {
        let selectors = SelectorSettings {
            dependencies: Some("ul.deps a".to_string()),
            ..SelectorSettings::default()
        };
        assert_eq!(selectors.dependencies_selector().unwrap(), "ul.deps a");
        assert_eq!(
            selectors.packages_selector().unwrap(),
            "section > div.w-80 > div > a > h3"
        );
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let mut settings = Settings::default();
        settings.selectors.preset = "v0".to_string();
        assert!(matches!(settings.validate(), Err(DepGraphError::Config(_))));
    }

    #[test]
    fn test_example_file_parses() {
        let settings = Settings::from_toml(include_str!("../depgraph.example.toml")).unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.registry.concurrency, 1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_toml("[registry]\nlisting = \"x\"").is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut settings = Settings::default();
        settings.registry.concurrency = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/depgraph.toml")));
        assert!(matches!(result, Err(DepGraphError::Config(_))));
    }
}
