//! Market data sources for the CLI: JSON files on disk, or a seeded
//! synthetic market.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use pairlist_core::data::{ProviderError, TickerProvider, UniverseProvider};
use pairlist_core::domain::{Instrument, Ticker, TickerMap};

// ─── File-backed ─────────────────────────────────────────────────────

/// Tickers on disk, either keyed by symbol or as a plain array.
#[derive(Deserialize)]
#[serde(untagged)]
enum TickerFile {
    Map(TickerMap),
    List(Vec<Ticker>),
}

impl TickerFile {
    fn into_map(self) -> TickerMap {
        match self {
            TickerFile::Map(map) => map,
            TickerFile::List(list) => list.into_iter().map(|t| (t.symbol.clone(), t)).collect(),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProviderError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProviderError::Unavailable(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ProviderError::Malformed(format!("{}: {e}", path.display())))
}

/// Instruments read from a JSON array. The file is re-read on every call.
pub fn market_file(path: PathBuf) -> Arc<dyn UniverseProvider> {
    Arc::new(move || -> Result<Vec<Instrument>, ProviderError> { read_json(&path) })
}

/// Tickers read from a JSON file. The file is re-read on every call.
pub fn ticker_file(path: PathBuf) -> Arc<dyn TickerProvider> {
    Arc::new(move || -> Result<TickerMap, ProviderError> {
        read_json::<TickerFile>(&path).map(TickerFile::into_map)
    })
}

// ─── Synthetic ───────────────────────────────────────────────────────

const MAJORS: &[&str] = &[
    "BTC", "ETH", "BNB", "XRP", "ADA", "SOL", "DOT", "DOGE", "AVAX", "SHIB", "MATIC", "UNI",
    "LINK", "ATOM", "LTC", "BCH", "FIL", "ETC", "XLM", "ALGO",
];

/// Deterministic fake exchange for demos and smoke tests.
///
/// Instruments are fixed for a given `(count, seed)`. Tickers drift on every
/// call so that watch mode shows the list changing.
#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    instruments: Vec<Instrument>,
    seed: u64,
}

impl SyntheticMarket {
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let now = Utc::now();

        let instruments = (0..count)
            .map(|i| {
                let base = MAJORS
                    .get(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("SYN{i}"));
                let mut inst = Instrument::spot(
                    format!("{base}/USDT"),
                    now - Duration::days(rng.gen_range(1..2_000)),
                );
                // One in twenty is delisted/halted.
                inst.active = rng.gen_ratio(19, 20);
                inst.min_amount = 0.001;
                inst.max_amount = 10_000.0;
                inst.min_cost = 10.0;
                inst.amount_precision = 8;
                inst.price_precision = 2;
                inst.maker_fee = 0.001;
                inst.taker_fee = 0.001;
                inst.market_cap_rank = (i + 1) as u32;
                inst.market_cap = 1.0e12 / (i as f64 + 1.0).powf(1.3);
                inst
            })
            .collect();

        Self { instruments, seed }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// One ticker snapshot per instrument; `round` varies the draw.
    pub fn tickers(&self, round: u64) -> TickerMap {
        let mut rng = StdRng::seed_from_u64(self.seed ^ round.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.instruments
            .iter()
            .map(|inst| {
                let price: f64 = 10f64.powf(rng.gen_range(-4.0..4.7));
                let half_spread = rng.gen_range(0.0002..0.006);
                let quote_volume = 10f64.powf(rng.gen_range(4.0..9.0));
                let ticker = Ticker {
                    symbol: inst.symbol.clone(),
                    last_price: price,
                    bid: price * (1.0 - half_spread),
                    ask: price * (1.0 + half_spread),
                    high_24h: price * (1.0 + rng.gen_range(0.0..0.15)),
                    low_24h: price * (1.0 - rng.gen_range(0.0..0.15)),
                    volume_24h: quote_volume / price,
                    quote_volume_24h: quote_volume,
                    price_change_percent_24h: rng.gen_range(-10.0..10.0),
                    timestamp: Utc::now(),
                };
                (inst.symbol.clone(), ticker)
            })
            .collect()
    }

    pub fn universe_provider(&self) -> Arc<dyn UniverseProvider> {
        let instruments = self.instruments.clone();
        Arc::new(move || -> Result<Vec<Instrument>, ProviderError> { Ok(instruments.clone()) })
    }

    pub fn ticker_provider(&self) -> Arc<dyn TickerProvider> {
        let market = self.clone();
        let round = AtomicU64::new(0);
        Arc::new(move || -> Result<TickerMap, ProviderError> {
            Ok(market.tickers(round.fetch_add(1, Ordering::Relaxed)))
        })
    }
}
