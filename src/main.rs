//! fanout-search CLI - multi-engine search aggregation from the command line.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use fanout_search::{
    MemoryProxyStore, MemorySearchStore, MultiEngineSearch, ProxyMaintenance, SearchConfig,
    SearchQuery,
};

/// fanout-search - multi-engine search aggregation CLI
#[derive(Parser)]
#[command(name = "fanout-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search across the configured engines
    Search(SearchArgs),

    /// List available search engines
    Engines,

    /// Fetch, validate, and store fresh proxies
    RefreshProxies,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Engines to use (comma-separated)
    /// Available: google, bing, duckduckgo
    #[arg(short, long, value_delimiter = ',')]
    engines: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Skip persisting results to the search store
    #[arg(long)]
    no_save: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Engines => list_engines(),
        Commands::RefreshProxies => refresh_proxies().await,
    }
}

fn list_engines() -> Result<()> {
    println!("Available search engines:\n");
    println!("  google      - Google web search");
    println!("  bing        - Bing web search");
    println!("  duckduckgo  - DuckDuckGo (HTML endpoint)");
    println!();
    println!("Usage: fanout-search search \"query\" -e google,bing");
    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let config = SearchConfig {
        persist_results: !args.no_save,
        ..SearchConfig::default()
    };

    let mut search = MultiEngineSearch::with_default_engines(config);
    search.set_store(Arc::new(MemorySearchStore::new()));

    let mut query = SearchQuery::new(&args.query);
    if let Some(engines) = args.engines {
        query = query.with_engines(engines);
    }

    let report = search.search(query).await?;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "\nSearch results for \"{}\" ({} results in {}ms):\n",
                report.query,
                report.total_results(),
                report.duration_ms
            );

            for (engine, outcome) in report.outcomes() {
                println!("[{}] via {}", engine, outcome.egress);
                if let Some(error) = &outcome.error {
                    println!("  error: {error}");
                }
                if outcome.results.is_empty() {
                    println!("  (no results)");
                }
                for result in &outcome.results {
                    println!("  {}. {}", result.rank, result.title);
                    println!("     URL: {}", result.url);
                    if !result.description.is_empty() {
                        println!("     {}", result.description);
                    }
                }
                println!();
            }
        }
    }

    Ok(())
}

async fn refresh_proxies() -> Result<()> {
    println!("Fetching and validating proxies...");

    let store = Arc::new(MemoryProxyStore::new());
    let job = ProxyMaintenance::with_default_sources(&SearchConfig::default(), store);
    let count = job.refresh().await?;

    println!("Stored {count} validated proxies.");
    Ok(())
}
