// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are two modes, picked by whether --size is given:
// - crawl:   npm-depgraph --size 50 --depth 2
//            list 50 packages, resolve their dependencies, save, publish
// - publish: npm-depgraph
//            load the previously saved edge-list and publish it
//
// Flags override values from the optional --config file (see config.rs).
// =============================================================================

use crate::config::Settings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "npm-depgraph",
    version,
    about = "Builds a dependency graph of the most depended-upon npm packages",
    long_about = "npm-depgraph walks the npm registry's 'most depended upon' listing, follows each \
                  package's dependencies up to a maximum depth, saves the resulting graph as an \
                  edge-list and publishes it to Graph Commons. Without --size it skips the crawl \
                  and publishes the previously saved edge-list."
)]
pub struct Cli {
    /// Number of packages to take from the registry listing
    ///
    /// Omit it to publish the saved edge-list without crawling.
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Maximum number of dependency hops to follow from the listed packages
    ///
    /// 0 = only read the listed packages' own dependencies
    #[arg(short, long, default_value_t = 3)]
    pub depth: usize,

    /// Edge-list file to write after crawling, or to read when not crawling
    /// [default: grid.edgelist]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How many package pages of one depth level to fetch at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Accept invalid TLS certificates from the registry
    #[arg(long)]
    pub insecure: bool,

    /// Save the edge-list but don't upload it
    #[arg(long)]
    pub no_publish: bool,

    /// Graph Commons API key
    #[arg(long, env = "GRAPHCOMMONS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// CSS selector for package names on listing pages
    #[arg(long)]
    pub packages_selector: Option<String>,

    /// CSS selector for dependency names on package pages
    #[arg(long)]
    pub dependencies_selector: Option<String>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    // Copies every flag that was actually given over the loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(output) = &self.output {
            settings.output = Some(output.clone());
        }
        if let Some(concurrency) = self.concurrency {
            settings.registry.concurrency = concurrency;
        }
        if self.insecure {
            settings.registry.verify_tls = false;
        }
        if let Some(api_key) = &self.api_key {
            settings.publish.api_key = Some(api_key.clone());
        }
        if let Some(selector) = &self.packages_selector {
            settings.selectors.packages = Some(selector.clone());
        }
        if let Some(selector) = &self.dependencies_selector {
            settings.selectors.dependencies = Some(selector.clone());
        }
    }
}
