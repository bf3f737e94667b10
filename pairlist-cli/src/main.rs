//! Pairlist CLI: run the pair selection pipeline from a config file.
//!
//! Commands:
//! - `run` - one refresh, then print the pairs and statistics
//! - `watch` - auto refresh for a while, printing the list as it changes
//! - `methods` - list the recognized stage methods

mod sources;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pairlist_core::data::{TickerProvider, UniverseProvider};
use pairlist_core::{PairListManager, PairlistConfig, METHODS};

use sources::SyntheticMarket;

#[derive(Parser)]
#[command(
    name = "pairlist",
    about = "Pairlist CLI - select tradable pairs from an exchange universe"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one refresh and print the selected pairs and statistics.
    Run {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Auto-refresh on an interval and print the list after each cycle.
    Watch {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Seconds between refreshes. Defaults to the config's refresh_period.
        #[arg(long)]
        interval: Option<u64>,

        /// Total seconds to watch before stopping.
        #[arg(long, default_value_t = 10)]
        duration: u64,
    },
    /// List the recognized pairlist methods.
    Methods,
}

#[derive(Args)]
struct PipelineArgs {
    /// Pipeline config (.json or .toml).
    #[arg(long)]
    config: PathBuf,

    /// JSON array of instruments.
    #[arg(long, requires = "tickers", conflicts_with = "synthetic")]
    markets: Option<PathBuf>,

    /// JSON tickers, keyed by symbol or as an array.
    #[arg(long, requires = "markets", conflicts_with = "synthetic")]
    tickers: Option<PathBuf>,

    /// Use a generated market instead of files.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Number of synthetic instruments.
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// Seed for the synthetic market. Defaults to a random seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { pipeline } => run_once(&pipeline),
        Commands::Watch {
            pipeline,
            interval,
            duration,
        } => run_watch(&pipeline, interval, duration),
        Commands::Methods => {
            for method in METHODS {
                println!("{method}");
            }
            Ok(())
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_manager(args: &PipelineArgs) -> Result<(PairListManager, PairlistConfig)> {
    let config = PairlistConfig::from_file(&args.config)
        .with_context(|| format!("loading pipeline config {}", args.config.display()))?;

    let (universe, tickers): (Arc<dyn UniverseProvider>, Arc<dyn TickerProvider>) =
        match (&args.markets, &args.tickers, args.synthetic) {
            (Some(markets), Some(tickers), false) => (
                sources::market_file(markets.clone()),
                sources::ticker_file(tickers.clone()),
            ),
            (None, None, true) => {
                let seed = args.seed.unwrap_or_else(rand::random);
                tracing::info!(count = args.count, seed, "Generating synthetic market");
                let market = SyntheticMarket::generate(args.count, seed);
                (market.universe_provider(), market.ticker_provider())
            }
            _ => bail!("pass either --markets and --tickers, or --synthetic"),
        };

    let manager = PairListManager::new();
    manager.set_market_provider(universe);
    manager.set_ticker_provider(tickers);
    let loaded = manager.load_from_config(&config);
    if loaded < config.pairlist_filters.len() {
        tracing::warn!(
            loaded,
            declared = config.pairlist_filters.len(),
            "Some filters could not be loaded"
        );
    }
    Ok((manager, config))
}

fn run_once(args: &PipelineArgs) -> Result<()> {
    let (manager, _) = build_manager(args)?;
    let report = manager.refresh().context("refreshing pair list")?;

    print_pairs(&manager.get_pairs());
    println!();
    println!(
        "{} of {} active pairs selected in {}ms",
        report.published, report.initial, report.elapsed_ms
    );
    println!("{}", serde_json::to_string_pretty(&manager.get_statistics())?);
    Ok(())
}

fn run_watch(args: &PipelineArgs, interval: Option<u64>, duration: u64) -> Result<()> {
    let (manager, config) = build_manager(args)?;
    let interval = Duration::from_secs(
        interval
            .or(config.refresh_period)
            .unwrap_or(manager.refresh_interval().as_secs()),
    );

    manager
        .start_auto_refresh(interval)
        .context("starting auto refresh")?;

    let deadline = Instant::now() + Duration::from_secs(duration);
    let mut last_seen = None;
    while Instant::now() < deadline {
        let stats = manager.get_statistics();
        if last_seen != Some(stats.refresh_count) && stats.refresh_count > 0 {
            last_seen = Some(stats.refresh_count);
            println!("── refresh #{} at {} ──", stats.refresh_count, stats.last_refresh_time);
            print_pairs(&manager.get_pairs());
        }
        thread::sleep(Duration::from_millis(200));
    }

    manager.stop_auto_refresh();
    println!("{}", serde_json::to_string_pretty(&manager.get_statistics())?);
    Ok(())
}

fn print_pairs(pairs: &[String]) {
    println!("Selected pairs ({}):", pairs.len());
    for pair in pairs {
        println!("  - {pair}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_manager_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pairlist.json");
        std::fs::write(
            &config,
            r#"{"pairlist_filters": [{"method": "BlacklistFilter", "blacklist": ["B/USDT"]}]}"#,
        )
        .unwrap();
        let markets = dir.path().join("markets.json");
        std::fs::write(
            &markets,
            r#"[
                {"symbol": "A/USDT", "base": "A", "quote": "USDT", "active": true, "listed_at": "2020-01-01T00:00:00Z"},
                {"symbol": "B/USDT", "base": "B", "quote": "USDT", "active": true, "listed_at": "2020-01-01T00:00:00Z"}
            ]"#,
        )
        .unwrap();
        let tickers = dir.path().join("tickers.json");
        std::fs::write(&tickers, "{}").unwrap();

        let args = PipelineArgs {
            config,
            markets: Some(markets),
            tickers: Some(tickers),
            synthetic: false,
            count: 0,
            seed: None,
        };
        let (manager, _) = build_manager(&args).unwrap();
        manager.refresh().unwrap();
        assert_eq!(manager.get_pairs(), vec!["A/USDT"]);
    }

    #[test]
    fn build_manager_synthetic() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pairlist.toml");
        std::fs::write(
            &config,
            "[[pairlist_filters]]\nmethod = \"VolumePairList\"\nnumber_assets = 5\n",
        )
        .unwrap();

        let args = PipelineArgs {
            config,
            markets: None,
            tickers: None,
            synthetic: true,
            count: 40,
            seed: Some(11),
        };
        let (manager, _) = build_manager(&args).unwrap();
        manager.refresh().unwrap();
        assert_eq!(manager.get_pair_count(), 5);
    }

    #[test]
    fn build_manager_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pairlist.json");
        std::fs::write(&config, "{}").unwrap();
        let args = PipelineArgs {
            config,
            markets: None,
            tickers: None,
            synthetic: false,
            count: 0,
            seed: None,
        };
        assert!(build_manager(&args).is_err());
    }
}
