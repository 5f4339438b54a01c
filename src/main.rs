// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Load settings (defaults, then --config file, then flags)
// 3. Either crawl the registry and save the graph, or load a saved graph
// 4. Publish the graph and print its URL
// 5. Exit with proper code (0 = success, 1 = empty graph, 2 = error)
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config.rs - settings file and defaults
mod crawl;     // src/crawl/ - listing pagination and dependency discovery
mod error;     // src/error.rs - error types
mod graph;     // src/graph/ - package graph and edge-list persistence
mod publish;   // src/publish/ - Graph Commons upload
mod registry;  // src/registry/ - page fetching and HTML extraction

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::Cli;
use config::Settings;
use crawl::Crawler;
use error::{DepGraphError, PersistenceError};
use graph::{edgelist, PackageGraph};
use registry::{Extractor, HttpFetcher};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("Warning: {}", e);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only carries the summary lines
//
// RUST_LOG, when set, wins over --log-level.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

// Returns:
//   Ok(0) = graph saved and (unless --no-publish) published
//   Ok(1) = the graph is empty, nothing was published
//   Err = anything failed along the way
async fn run(cli: Cli) -> Result<i32> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut settings);
    settings.validate()?;

    let output = settings.output_path();

    let graph = match cli.size {
        Some(size) => handle_crawl(&settings, size, cli.depth, &output).await?,
        None => handle_load(&output)?,
    };

    if graph.is_empty() {
        println!("⚠️  The graph is empty, nothing to publish");
        return Ok(1);
    }

    if cli.no_publish {
        println!("⏭️  Skipping publish (--no-publish)");
        return Ok(0);
    }

    let url = publish::publish(&graph, &settings.publish)
        .await
        .context("Failed to publish graph")?;

    println!("Created Graph URL:");
    println!("{}", url);
    Ok(0)
}

// Crawls the registry, builds the graph and writes it to `output`
async fn handle_crawl(
    settings: &Settings,
    size: usize,
    depth: usize,
    output: &Path,
) -> Result<PackageGraph> {
    println!("🔍 Crawling the {} most depended-upon package(s)", size);
    println!("📊 Max dependency depth: {}", depth);

    let fetcher = HttpFetcher::new(&settings.registry)?;
    let extractor = Extractor::from_settings(&settings.selectors)?;
    let crawler = Crawler::new(&fetcher, &extractor, &settings.registry);

    let dependencies = crawler.crawl(size, depth).await.context("Crawl failed")?;
    let graph = PackageGraph::from_dependencies(&dependencies);

    println!(
        "📄 Resolved {} package(s): {} node(s), {} edge(s)",
        dependencies.len(),
        graph.node_count(),
        graph.edge_count()
    );

    edgelist::save(&graph, output)
        .with_context(|| format!("Failed to save graph to {}", output.display()))?;
    println!("💾 Saved graph to {}", output.display());

    Ok(graph)
}

// Loads the graph saved by an earlier crawl
fn handle_load(output: &Path) -> Result<PackageGraph> {
    println!("📂 No --size given, loading {}", output.display());

    match edgelist::load(output) {
        Ok(graph) => {
            println!(
                "📄 Loaded {} node(s), {} edge(s)",
                graph.node_count(),
                graph.edge_count()
            );
            Ok(graph)
        }
        Err(DepGraphError::Persistence(PersistenceError::NotFound { path })) => Err(anyhow!(
            "Nothing to publish: {} does not exist (run with --size to crawl first)",
            path.display()
        )),
        Err(e) => Err(e.into()),
    }
}
