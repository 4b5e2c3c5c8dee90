//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest site harvester.
//! Results go to stdout (or `--output`); logs and statistics go to stderr.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_harvest::config::{load_config_with_hash, Config, OutputMode};
use sumi_harvest::crawler::{
    crawl_streaming, crawl_with_statistics, CrawlOptions, HttpFetcher, PageOutcome,
};
use sumi_harvest::output::{print_statistics, JsonOutput, NdjsonOutput, OutputHandler};
use sumi_harvest::request::CrawlRequest;
use sumi_harvest::sitemap::seeds_or_root;
use sumi_harvest::url::AllowedDomains;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a bounded, polite site harvester
///
/// Sumi-Harvest seeds a crawl from a site's sitemaps, follows links inside a
/// set of allowed domains, and reports every visited page as sanitized
/// content or as a classified failure.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, polite site harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// JSON crawl request overriding the [crawler] and [target] sections
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Emit newline-delimited JSON as results arrive
    #[arg(long, conflicts_with = "batch")]
    stream: bool,

    /// Emit one JSON document once the crawl is over
    #[arg(long, conflicts_with = "stream")]
    batch: bool,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Indent the batch JSON document
    #[arg(long, conflicts_with = "stream")]
    pretty: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let request = match &cli.request {
        Some(path) => load_request(path)?,
        None => CrawlRequest::from_config(&config),
    };
    request.validate().context("Invalid crawl request")?;

    let mode = if cli.stream {
        OutputMode::Stream
    } else if cli.batch {
        OutputMode::Batch
    } else {
        config.output.mode
    };

    if cli.dry_run {
        handle_dry_run(&config, &request, mode);
        return Ok(());
    }

    handle_crawl(&config, request, mode, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_request(path: &Path) -> anyhow::Result<CrawlRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read crawl request {}", path.display()))?;
    let request = CrawlRequest::from_json(&json)
        .with_context(|| format!("Failed to parse crawl request {}", path.display()))?;
    tracing::info!("Loaded crawl request from: {}", path.display());
    Ok(request)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, request: &CrawlRequest, mode: OutputMode) {
    println!("=== Sumi-Harvest Dry Run ===\n");

    println!("Crawl:");
    println!("  Concurrency: {}", request.concurrency);
    match request.depth_limit() {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unbounded"),
    }
    println!("  Min time between requests: {}ms", request.min_time_between);
    println!("  Max pages to visit: {}", request.max_pages_to_visit);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nTarget:");
    println!("  Root URL: {}", request.root_url);
    println!(
        "  Seeds: {}",
        if config.target.use_sitemaps {
            "sitemaps from robots.txt, falling back to the root URL"
        } else {
            "root URL only"
        }
    );
    println!("  Valid Domains ({}):", request.valid_domains.len());
    for domain in &request.valid_domains {
        println!("    - {}", domain);
    }

    println!("\nOutput:");
    println!(
        "  Mode: {}",
        match mode {
            OutputMode::Batch => "batch (one JSON document)",
            OutputMode::Stream => "stream (newline-delimited JSON)",
        }
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    request: CrawlRequest,
    mode: OutputMode,
    cli: &Cli,
) -> anyhow::Result<()> {
    let allowed = AllowedDomains::new(&request.valid_domains).context("Invalid crawl request")?;
    let fetcher = Arc::new(
        HttpFetcher::scoped(&config.user_agent, allowed).context("Failed to build HTTP client")?,
    );

    let seeds = if config.target.use_sitemaps {
        seeds_or_root(Arc::clone(&fetcher), &request.root_url).await
    } else {
        vec![request.root_url.trim().to_string()]
    };
    tracing::info!("Total seed URLs: {}", seeds.len());

    let options = request.into_options(seeds).context("Invalid crawl request")?;

    let writer: Box<dyn Write> = match cli.output.as_deref() {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let stats = match mode {
        OutputMode::Batch => {
            let mut handler = JsonOutput::new(writer).pretty(cli.pretty);
            let (result, stats) = crawl_with_statistics(options, fetcher).await;
            for outcome in result.successful.into_iter().map(PageOutcome::from) {
                handler.record_outcome(&outcome)?;
            }
            for outcome in result.failed.into_iter().map(PageOutcome::from) {
                handler.record_outcome(&outcome)?;
            }
            handler.finalize().context("Failed to write results")?;
            stats
        }
        OutputMode::Stream => stream_results(options, fetcher, NdjsonOutput::new(writer)).await?,
    };

    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}

/// Forwards outcomes to `handler` as the crawl produces them
async fn stream_results<H: OutputHandler>(
    options: CrawlOptions,
    fetcher: Arc<HttpFetcher>,
    mut handler: H,
) -> anyhow::Result<sumi_harvest::output::CrawlStatistics> {
    let mut stream = crawl_streaming(options, fetcher);

    while let Some(outcome) = stream.next_outcome().await {
        handler
            .record_outcome(&outcome)
            .context("Failed to write result")?;
    }
    handler.finalize().context("Failed to write results")?;

    tracing::info!("Streamed {} result(s)", handler.recorded());

    stream.handle.await.context("Crawl task failed")
}
