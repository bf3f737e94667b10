//! Volatility range - gates pairs by their 24h high/low range relative to price.
//!
//! Rejects dead markets (no movement) and erratic ones alike.

use serde_json::Value;
use tracing::info;

use super::options::f64_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

/// Keeps candidates whose `(high - low) / last_price` lies in
/// `[min_volatility, max_volatility]`.
#[derive(Debug, Clone)]
pub struct VolatilityFilter {
    pub min_volatility: f64,
    pub max_volatility: f64,
}

impl Default for VolatilityFilter {
    fn default() -> Self {
        Self {
            min_volatility: 0.0,
            max_volatility: f64::MAX,
        }
    }
}

impl VolatilityFilter {
    pub fn new(min_volatility: f64, max_volatility: f64) -> Self {
        Self {
            min_volatility,
            max_volatility,
        }
    }
}

impl PairFilter for VolatilityFilter {
    fn name(&self) -> &str {
        "VolatilityFilter"
    }

    fn filter(&self, pairs: &[Symbol], tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let result: Vec<Symbol> = pairs
            .iter()
            .filter(|pair| {
                tickers.get(*pair).is_some_and(|t| {
                    let vol = t.volatility();
                    vol >= self.min_volatility && vol <= self.max_volatility
                })
            })
            .cloned()
            .collect();

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            min_pct = self.min_volatility * 100.0,
            max_pct = self.max_volatility * 100.0,
            "Volatility filter applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(v) = f64_opt(options, self.name(), "min_volatility") {
            self.min_volatility = v;
        }
        if let Some(v) = f64_opt(options, self.name(), "max_volatility") {
            self.max_volatility = v;
        }
    }
}
