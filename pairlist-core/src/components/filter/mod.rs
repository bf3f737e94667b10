//! Pair filters - the stages of the selection pipeline.
//!
//! Each stage receives the current candidate list and the ticker snapshot and
//! returns a new candidate list. Stages are stateless between calls: all they
//! keep is their configuration and, for a few of them, a handle to an
//! external collaborator (metadata, performance or remote pair provider).
//!
//! Convention for symbols without a ticker: stages that read ticker data drop
//! them, stages that don't (whitelist, blacklist, offset, shuffle) pass them
//! through untouched.

pub mod age;
pub mod blacklist;
pub mod market_cap;
pub(crate) mod options;
pub mod offset;
pub mod performance;
pub mod price;
pub mod producer;
pub mod shuffle;
pub(crate) mod slot;
pub mod spread;
pub mod static_list;
pub mod volatility;
pub mod volume;

use std::sync::Arc;

use serde_json::Value;

use crate::data::{PerformanceProvider, ProviderError, RemotePairProvider, UniverseProvider};
use crate::domain::{Symbol, TickerMap};

/// Trait for pipeline stages.
///
/// # Contract
/// - `filter` never mutates its inputs and never introduces a symbol that is
///   not in `pairs`; `ProducerPairList` is the one exception and replaces
///   the list wholesale.
/// - `configure` is idempotent. Unknown keys are ignored and missing keys
///   keep their current value.
/// - The only error `filter` reports is a failing collaborator.
pub trait PairFilter: Send + Sync {
    /// Stable name, identical to the factory method name (e.g. "VolumePairList").
    fn name(&self) -> &str;

    /// Narrow, reorder or replace the candidate list.
    fn filter(&self, pairs: &[Symbol], tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError>;

    /// Apply recognized options from a JSON object.
    fn configure(&mut self, options: &Value);

    /// Hand the stage the collaborators it may need. Stages that need none
    /// ignore this. Takes `&self` so a stage already shared by a running
    /// chain still picks up providers set later.
    fn attach(&self, _collaborators: &Collaborators) {}
}

/// Optional external providers that some stages depend on.
///
/// `metadata` feeds `AgeFilter` and `MarketCapPairList`, `performance`
/// feeds `PerformanceFilter`, `remote_pairs` feeds `ProducerPairList`.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub metadata: Option<Arc<dyn UniverseProvider>>,
    pub performance: Option<Arc<dyn PerformanceProvider>>,
    pub remote_pairs: Option<Arc<dyn RemotePairProvider>>,
}

impl Collaborators {
    pub fn is_empty(&self) -> bool {
        self.metadata.is_none() && self.performance.is_none() && self.remote_pairs.is_none()
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("metadata", &self.metadata.is_some())
            .field("performance", &self.performance.is_some())
            .field("remote_pairs", &self.remote_pairs.is_some())
            .finish()
    }
}

/// A stage whose collaborator failed mid-chain.
#[derive(Debug, thiserror::Error)]
#[error("filter {stage} failed: {source}")]
pub struct StageError {
    pub stage: String,
    #[source]
    pub source: ProviderError,
}

/// Run `pairs` through `chain` in order.
///
/// Stops as soon as the list is empty. Returns the final list and the number
/// of stages that actually ran.
pub fn apply_chain<F>(
    chain: &[F],
    pairs: Vec<Symbol>,
    tickers: &TickerMap,
) -> Result<(Vec<Symbol>, usize), StageError>
where
    F: std::ops::Deref,
    F::Target: PairFilter,
{
    let mut current = pairs;
    let mut executed = 0;
    for stage in chain {
        if current.is_empty() {
            break;
        }
        current = stage.filter(&current, tickers).map_err(|source| StageError {
            stage: stage.name().to_string(),
            source,
        })?;
        executed += 1;
    }
    Ok((current, executed))
}

// Re-export concrete stage types.
pub use age::AgeFilter;
pub use blacklist::BlacklistFilter;
pub use market_cap::MarketCapPairList;
pub use offset::OffsetFilter;
pub use performance::PerformanceFilter;
pub use price::PriceFilter;
pub use producer::ProducerPairList;
pub use shuffle::ShuffleFilter;
pub use spread::SpreadFilter;
pub use static_list::StaticPairList;
pub use volatility::VolatilityFilter;
pub use volume::VolumePairList;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::domain::{Symbol, Ticker, TickerMap};

    pub fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|s| s.to_string()).collect()
    }

    pub fn ticker(symbol: &str, last_price: f64, quote_volume: f64) -> Ticker {
        Ticker {
            symbol: symbol.to_string(),
            last_price,
            bid: last_price * 0.999,
            ask: last_price * 1.001,
            high_24h: last_price * 1.05,
            low_24h: last_price * 0.95,
            volume_24h: quote_volume / last_price,
            quote_volume_24h: quote_volume,
            price_change_percent_24h: 0.0,
            timestamp: Utc::now(),
        }
    }

    pub fn ticker_map(tickers: Vec<Ticker>) -> TickerMap {
        tickers.into_iter().map(|t| (t.symbol.clone(), t)).collect()
    }
}
