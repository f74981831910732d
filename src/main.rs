//! Catalog-Harvester main entry point
//!
//! This is the command-line interface for both processes: the scheduled
//! catalog scraper and the parser service it reports to.

use anyhow::Context;
use catalog_harvester::config::{load_config_from_env, load_config_with_hash, Config};
use catalog_harvester::crawler::{run_crawl, run_scheduled};
use catalog_harvester::rpc::serve;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvester: scheduled catalog scraping with a validating parser service
///
/// Configuration is read from a TOML file when `--config` is given, otherwise
/// from the environment (PARSER_HOST, PARSER_PORT, INTERVAL_MINUTES,
/// PARSER_MAX_WORKERS, OUTPUT_DIR, CATALOG_URL).
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version)]
#[command(about = "Scheduled catalog scraper and parser service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
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
    /// Crawl the catalog on the configured interval and send each batch to the parser service
    Scrape {
        /// Run a single crawl right away and exit
        #[arg(long)]
        once: bool,
    },

    /// Run the parser service
    Serve,

    /// Validate the configuration, print it and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_ref())?;

    match cli.command {
        Command::Scrape { once: true } => {
            let report = run_crawl(config).await.context("crawl run failed")?;
            tracing::info!(
                "Run started at {} sent {} records",
                report.started_at.to_rfc3339(),
                report.records
            );
        }
        Command::Scrape { once: false } => run_scheduled(config).await?,
        Command::Serve => serve(&config).await.context("parser service stopped")?,
        Command::CheckConfig => print_config(&config),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvester=info,warn"),
            1 => EnvFilter::new("catalog_harvester=debug,info"),
            2 => EnvFilter::new("catalog_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration from the given file, or from the environment
fn load(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let config =
                load_config_from_env().context("failed to load configuration from environment")?;
            tracing::info!("Configuration loaded from environment");
            Ok(config)
        }
    }
}

/// Handles `check-config`: shows the resolved configuration
fn print_config(config: &Config) {
    println!("=== Catalog-Harvester Configuration ===\n");

    println!("Source:");
    println!("  Catalog URL: {}", config.source.catalog_url);
    println!("  User agent: {}", config.source.user_agent);
    println!("  Request timeout: {}s", config.source.request_timeout_secs);

    println!("\nParser service:");
    println!("  Endpoint: {}", config.rpc.endpoint());
    println!("  Bind host: {}", config.server.bind_host);
    println!("  Max workers: {}", config.server.max_workers);

    println!("\nSchedule:");
    println!("  Interval: {} min", config.schedule.interval_minutes);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!("  JSON: {}", config.output.json_path);

    println!("\n✓ Configuration is valid");
}
