//! Spread ceiling - drops illiquid pairs with a wide bid-ask spread.

use serde_json::Value;
use tracing::{debug, info};

use super::options::f64_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

/// Keeps candidates whose `(ask - bid) / ask` is at most `max_spread_ratio`.
#[derive(Debug, Clone)]
pub struct SpreadFilter {
    pub max_spread_ratio: f64,
}

impl Default for SpreadFilter {
    fn default() -> Self {
        Self {
            max_spread_ratio: 0.005,
        }
    }
}

impl SpreadFilter {
    pub fn new(max_spread_ratio: f64) -> Self {
        Self { max_spread_ratio }
    }
}

impl PairFilter for SpreadFilter {
    fn name(&self) -> &str {
        "SpreadFilter"
    }

    fn filter(&self, pairs: &[Symbol], tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let mut result = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let Some(ticker) = tickers.get(pair) else {
                continue;
            };
            let ratio = ticker.spread_ratio();
            if ratio <= self.max_spread_ratio {
                result.push(pair.clone());
            } else {
                debug!(
                    filter = self.name(),
                    pair = %pair,
                    spread_pct = ratio * 100.0,
                    "Filtered out wide spread"
                );
            }
        }

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            max_spread_pct = self.max_spread_ratio * 100.0,
            "Spread filter applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(v) = f64_opt(options, self.name(), "max_spread_ratio") {
            self.max_spread_ratio = v;
        }
    }
}
