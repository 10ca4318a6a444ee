//! Pagemap main entry point
//!
//! This is the command-line interface for the pagemap site content mapper.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pagemap::config::{compile_exclude_patterns, load_or_default, Config};
use pagemap::crawler::CrawlRequest;
use pagemap::discovery::{DiscoveryService, SiteStructure};
use pagemap::fetch::HttpFetcher;
use pagemap::ingest::IngestPipeline;
use pagemap::keys::KeyScheme;
use pagemap::render::HttpRenderer;
use pagemap::storage::FsSink;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagemap: a site content mapper
///
/// Pagemap discovers the pages of a website, crawls them breadth-first,
/// and stores one addressable JSON record per page for downstream
/// ingestion.
#[derive(Parser, Debug)]
#[command(name = "pagemap")]
#[command(version)]
#[command(about = "A site content mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Map a site's URL space via its sitemaps (or a bounded crawl)
    Discover {
        /// Seed URL of the site
        seed: String,

        /// Write the resulting manifest JSON here
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Crawl a site and store one JSON record per page
    Crawl {
        /// Seed URL; overrides the config file's seed-url
        seed: Option<String>,

        /// Crawl exactly the URLs of this manifest instead of following links
        #[arg(short, long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Output directory; overrides the config file's output-dir
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Maximum link depth; overrides the config file
        #[arg(long)]
        max_depth: Option<u32>,

        /// Maximum number of pages; overrides the config file
        #[arg(long)]
        max_pages: Option<usize>,

        /// Also download page assets (images, documents)
        #[arg(long)]
        resources: bool,

        /// Page key scheme: "hash" or "hierarchical"
        #[arg(long, value_name = "SCHEME")]
        key_scheme: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_or_default(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Command::Discover { seed, manifest } => handle_discover(&config, &seed, manifest).await,
        Command::Crawl {
            seed,
            manifest,
            output,
            max_depth,
            max_pages,
            resources,
            key_scheme,
        } => {
            handle_crawl(
                config, seed, manifest, output, max_depth, max_pages, resources, key_scheme,
            )
            .await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagemap=info,warn"),
            1 => EnvFilter::new("pagemap=debug,info"),
            2 => EnvFilter::new("pagemap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the discover subcommand
async fn handle_discover(
    config: &Config,
    seed: &str,
    manifest: Option<PathBuf>,
) -> anyhow::Result<()> {
    let renderer = HttpRenderer::new(&config.http.user_agent)?;
    let fetcher = HttpFetcher::new(&config.http.user_agent)?;

    let service = DiscoveryService::new(&renderer, &fetcher);
    let structure = service.discover(seed).await?;

    println!("Discovered {} URLs", structure.total_urls);
    println!("\nSections:");
    for (section, count) in &structure.sections {
        println!("  {:<30} {}", section, count);
    }

    if let Some(path) = manifest {
        structure.save(&path)?;
        println!("\nManifest written to {}", path.display());
    }

    Ok(())
}

/// Handles the crawl subcommand
#[allow(clippy::too_many_arguments)]
async fn handle_crawl(
    config: Config,
    seed: Option<String>,
    manifest: Option<PathBuf>,
    output: Option<PathBuf>,
    max_depth: Option<u32>,
    max_pages: Option<usize>,
    resources: bool,
    key_scheme: Option<String>,
) -> anyhow::Result<()> {
    let seed_url = seed
        .or_else(|| config.crawl.seed_url.clone())
        .unwrap_or_default();

    let mut request = CrawlRequest::new(
        seed_url,
        max_depth.unwrap_or(config.crawl.max_depth),
        max_pages.unwrap_or(config.crawl.max_pages),
    );
    request.include_resources = resources || config.crawl.include_resources;
    request.exclude_patterns = compile_exclude_patterns(&config.crawl.exclude_patterns)?;

    if let Some(path) = manifest {
        let structure = SiteStructure::load(&path)?;
        tracing::info!(
            "Loaded manifest with {} URLs from {}",
            structure.total_urls,
            path.display()
        );
        request.include_urls = structure.urls;
    }

    let scheme = match key_scheme.as_deref() {
        None => config.storage.key_scheme,
        Some("hash") => KeyScheme::Hash,
        Some("hierarchical") => KeyScheme::Hierarchical,
        Some(other) => bail!("unknown key scheme '{}' (expected hash or hierarchical)", other),
    };

    let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.storage.output_dir));

    let renderer = HttpRenderer::new(&config.http.user_agent)?;
    let fetcher = HttpFetcher::new(&config.http.user_agent)?;
    let sink = FsSink::new(&output_dir);

    let pipeline = IngestPipeline::new(&renderer, &fetcher, &sink, scheme);
    let report = pipeline.run(request).await?;

    println!("Crawled {} pages", report.pages_crawled);
    println!("Stored {} page records", report.pages_stored);
    if report.resources_stored > 0 {
        println!("Stored {} resources", report.resources_stored);
    }
    if report.put_failures > 0 {
        println!("{} objects failed to store", report.put_failures);
    }
    println!("Output: {}", output_dir.display());

    Ok(())
}
