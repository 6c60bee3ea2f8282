use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use feed_source::{FeedSource, HttpFetcher, serialize_feed};
use pipeline::predicates::PointsThreshold;
use pipeline::{EngineConfig, FeedFilter, FilterEngine, FilteredFeed};
use serde::Serialize;
use server::ServerConfig;
use server::config::{
    DEFAULT_FEED_URL, DEFAULT_MAX_CONCURRENCY, DEFAULT_PREDICATE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// feed-diet - keep only the RSS items worth reading
#[derive(Parser)]
#[command(name = "feed-diet")]
#[command(about = "Filters an RSS feed by the score on each item's comments page", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, env = "FEED_DIET_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Filter the feed once and write the result to stdout
    Filter {
        /// Minimum score an item needs to be kept
        #[arg(long)]
        min_points: u64,

        #[command(flatten)]
        engine: EngineArgs,

        /// Print a summary of the run to stderr
        #[arg(long)]
        report: bool,

        /// Print the summary as JSON (implies --report)
        #[arg(long)]
        json: bool,
    },
}

/// Flags shared by every subcommand that runs the filter
#[derive(Args, Debug, Clone)]
struct EngineArgs {
    /// RSS feed to filter
    #[arg(long, env = "FEED_DIET_FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Maximum comments pages fetched at once (0 is treated as 1)
    #[arg(long, env = "FEED_DIET_MAX_CONCURRENCY", default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,

    /// Deadline for scoring one item, in seconds (0 disables it)
    #[arg(long, env = "FEED_DIET_PREDICATE_TIMEOUT_SECS", default_value_t = DEFAULT_PREDICATE_TIMEOUT.as_secs())]
    predicate_timeout_secs: u64,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "FEED_DIET_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    request_timeout_secs: u64,
}

impl EngineArgs {
    fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::default().with_max_concurrency(self.max_concurrency);
        match self.predicate_timeout_secs {
            0 => config,
            secs => config.with_predicate_timeout(Duration::from_secs(secs)),
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn server_config(&self, bind_addr: SocketAddr) -> ServerConfig {
        ServerConfig {
            bind_addr,
            feed_url: self.feed_url.clone(),
            engine: self.engine_config(),
            request_timeout: self.request_timeout(),
        }
    }
}

/// What `filter --json` prints
#[derive(Debug, Serialize)]
struct RunSummary {
    feed_url: String,
    min_points: u64,
    accepted: Vec<String>,
    rejected: usize,
    failed: Vec<FailedItem>,
    elapsed_ms: u128,
}

#[derive(Debug, Serialize)]
struct FailedItem {
    item: String,
    error: String,
}

impl RunSummary {
    fn new(feed_url: &str, min_points: u64, filtered: &FilteredFeed, elapsed: Duration) -> Self {
        Self {
            feed_url: feed_url.to_string(),
            min_points,
            accepted: filtered
                .document
                .items()
                .iter()
                .map(|item| item.label().to_string())
                .collect(),
            rejected: filtered.rejected,
            failed: filtered
                .failures
                .iter()
                .map(|failure| FailedItem {
                    item: failure.item.label().to_string(),
                    error: failure.error.to_string(),
                })
                .collect(),
            elapsed_ms: elapsed.as_millis(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the feed, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, engine } => server::serve(engine.server_config(bind)).await?,
        Commands::Filter {
            min_points,
            engine,
            report,
            json,
        } => handle_filter(engine, min_points, report, json).await?,
    }

    Ok(())
}

/// Handle the 'filter' command
async fn handle_filter(engine: EngineArgs, min_points: u64, report: bool, json: bool) -> Result<()> {
    let fetcher = HttpFetcher::with_timeout(engine.request_timeout())
        .context("Failed to build HTTP client")?;
    let source: Arc<dyn FeedSource> = Arc::new(fetcher);
    let filter = FeedFilter::new(source.clone(), FilterEngine::new(engine.engine_config()));
    let predicate = Arc::new(PointsThreshold::new(source, min_points));

    info!("Filtering {} for >= {} points", engine.feed_url, min_points);
    let start = Instant::now();
    let filtered = filter
        .filter_feed(&engine.feed_url, predicate)
        .await
        .with_context(|| format!("Failed to filter {}", engine.feed_url))?;
    let elapsed = start.elapsed();

    let body = serialize_feed(&filtered.document).context("Failed to serialize feed")?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;

    let summary = RunSummary::new(&engine.feed_url, min_points, &filtered, elapsed);
    if json {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    } else if report {
        print_report(&summary);
    }
    Ok(())
}

/// Colored summary on stderr
fn print_report(summary: &RunSummary) {
    eprintln!(
        "{}",
        format!("{} (>= {} points)", summary.feed_url, summary.min_points)
            .bold()
            .blue()
    );
    for title in &summary.accepted {
        eprintln!("  {} {}", "✓".green(), title);
    }
    for failure in &summary.failed {
        eprintln!("  {} {}: {}", "?".yellow(), failure.item, failure.error.dimmed());
    }
    eprintln!(
        "{} kept, {} rejected, {} unknown in {}ms",
        summary.accepted.len().to_string().green(),
        summary.rejected.to_string().red(),
        summary.failed.len().to_string().yellow(),
        summary.elapsed_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let cli = Cli::try_parse_from(["feed-diet", "filter", "--min-points", "100"]).unwrap();
        let Commands::Filter {
            min_points,
            engine,
            report,
            json,
        } = cli.command
        else {
            panic!("expected filter");
        };
        assert_eq!(min_points, 100);
        assert!(!report && !json);
        assert_eq!(engine.feed_url, DEFAULT_FEED_URL);

        let config = engine.engine_config();
        assert_eq!(config.max_concurrency, Some(DEFAULT_MAX_CONCURRENCY));
        assert_eq!(config.predicate_timeout, Some(DEFAULT_PREDICATE_TIMEOUT));
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let cli = Cli::try_parse_from([
            "feed-diet",
            "filter",
            "--min-points",
            "1",
            "--predicate-timeout-secs",
            "0",
            "--max-concurrency",
            "0",
        ])
        .unwrap();
        let Commands::Filter { engine, .. } = cli.command else {
            panic!("expected filter");
        };
        let config = engine.engine_config();
        assert_eq!(config.predicate_timeout, None);
        assert_eq!(config.max_concurrency, Some(1));
    }

    #[test]
    fn test_negative_min_points_rejected() {
        assert!(Cli::try_parse_from(["feed-diet", "filter", "--min-points", "-3"]).is_err());
    }

    #[test]
    fn test_serve_config() {
        let cli = Cli::try_parse_from(["feed-diet", "serve", "--bind", "127.0.0.1:8080"]).unwrap();
        let Commands::Serve { bind, engine } = cli.command else {
            panic!("expected serve");
        };
        let config = engine.server_config(bind);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
