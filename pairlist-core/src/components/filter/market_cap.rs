//! Top-N by market capitalization, restricted to well-ranked assets.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::options::usize_opt;
use super::slot::ProviderSlot;
use super::{Collaborators, PairFilter};
use crate::data::{ProviderError, UniverseProvider};
use crate::domain::{Instrument, Symbol, TickerMap};

/// Keeps candidates ranked `1..=max_rank`, ordered by market cap descending,
/// truncated to `number_assets`.
///
/// Unranked (rank 0) and unknown candidates are dropped. Without a metadata
/// provider the stage passes everything through.
#[derive(Clone)]
pub struct MarketCapPairList {
    pub number_assets: usize,
    pub max_rank: u32,
    metadata: ProviderSlot<dyn UniverseProvider>,
}

impl Default for MarketCapPairList {
    fn default() -> Self {
        Self {
            number_assets: 20,
            max_rank: 100,
            metadata: ProviderSlot::default(),
        }
    }
}

impl std::fmt::Debug for MarketCapPairList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketCapPairList")
            .field("number_assets", &self.number_assets)
            .field("max_rank", &self.max_rank)
            .field("metadata", &self.metadata.is_set())
            .finish()
    }
}

impl MarketCapPairList {
    pub fn new(number_assets: usize, max_rank: u32) -> Self {
        Self {
            number_assets,
            max_rank,
            metadata: ProviderSlot::default(),
        }
    }

    pub fn with_market_provider(self, provider: Arc<dyn UniverseProvider>) -> Self {
        self.metadata.set(provider);
        self
    }
}

impl PairFilter for MarketCapPairList {
    fn name(&self) -> &str {
        "MarketCapPairList"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let Some(provider) = self.metadata.get() else {
            warn!(filter = self.name(), "No market provider attached, passing pairs through");
            return Ok(pairs.to_vec());
        };

        let instruments = provider.instruments()?;
        let by_symbol: HashMap<&str, &Instrument> = instruments
            .iter()
            .map(|inst| (inst.symbol.as_str(), inst))
            .collect();

        let mut ranked: Vec<(&Symbol, f64)> = pairs
            .iter()
            .filter_map(|pair| {
                let inst = by_symbol.get(pair.as_str())?;
                (inst.is_ranked()
                    && inst.market_cap_rank <= self.max_rank
                    && inst.market_cap.is_finite())
                .then_some((pair, inst.market_cap))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let result: Vec<Symbol> = ranked
            .into_iter()
            .take(self.number_assets)
            .map(|(pair, _)| pair.clone())
            .collect();

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            max_rank = self.max_rank,
            "Ranked pairs by market cap"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(n) = usize_opt(options, self.name(), "number_assets") {
            self.number_assets = n;
        }
        if let Some(rank) = usize_opt(options, self.name(), "max_rank") {
            self.max_rank = u32::try_from(rank).unwrap_or(u32::MAX);
        }
    }

    fn attach(&self, collaborators: &Collaborators) {
        if let Some(metadata) = &collaborators.metadata {
            self.metadata.set(Arc::clone(metadata));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::filter::test_support::symbols;
    use chrono::Utc;
    use serde_json::json;

    fn ranked(symbol: &str, rank: u32, cap: f64) -> Instrument {
        let mut inst = Instrument::spot(symbol, Utc::now());
        inst.market_cap_rank = rank;
        inst.market_cap = cap;
        inst
    }

    fn provider() -> Arc<dyn UniverseProvider> {
        Arc::new(|| -> Result<Vec<Instrument>, ProviderError> {
            Ok(vec![
                ranked("BTC", 1, 1_000.0),
                ranked("ETH", 2, 400.0),
                ranked("SOL", 5, 80.0),
                ranked("DEEP", 250, 1.0),
                ranked("NONE", 0, 0.0),
            ])
        })
    }

    #[test]
    fn orders_by_cap_within_rank_limit() {
        let f = MarketCapPairList::default().with_market_provider(provider());
        let out = f
            .filter(&symbols(&["SOL", "DEEP", "NONE", "ETH", "BTC", "GHOST"]), &TickerMap::new())
            .unwrap();
        assert_eq!(out, symbols(&["BTC", "ETH", "SOL"]));
    }

    #[test]
    fn truncates_to_number_assets() {
        let f = MarketCapPairList::new(2, 10).with_market_provider(provider());
        let out = f.filter(&symbols(&["SOL", "ETH", "BTC"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["BTC", "ETH"]));
    }

    #[test]
    fn non_finite_caps_are_dropped() {
        let odd: Arc<dyn UniverseProvider> =
            Arc::new(|| -> Result<Vec<Instrument>, ProviderError> {
                Ok(vec![
                    ranked("NAN", 3, f64::NAN),
                    ranked("INF", 4, f64::INFINITY),
                    ranked("ETH", 2, 400.0),
                ])
            });
        let f = MarketCapPairList::default().with_market_provider(odd);
        let out = f.filter(&symbols(&["NAN", "INF", "ETH"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["ETH"]));
    }

    #[test]
    fn passes_through_without_provider() {
        let pairs = symbols(&["X", "Y"]);
        let out = MarketCapPairList::new(1, 1).filter(&pairs, &TickerMap::new()).unwrap();
        assert_eq!(out, pairs);
    }

    #[test]
    fn configure_reads_limits() {
        let mut f = MarketCapPairList::default();
        f.configure(&json!({ "number_assets": 3, "max_rank": 2 }));
        f.attach(&Collaborators {
            metadata: Some(provider()),
            ..Collaborators::default()
        });
        let out = f.filter(&symbols(&["SOL", "ETH", "BTC"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["BTC", "ETH"]));
    }
}
