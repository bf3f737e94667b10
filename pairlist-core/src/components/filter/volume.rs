//! Top-N ranking by a ticker field (quote volume, base volume, |price change|, volatility).

use serde_json::Value;
use tracing::{info, warn};

use super::options::{f64_opt, string_opt, usize_opt};
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{SortKey, Symbol, TickerMap};

/// Ranks candidates by `sort_key` and keeps the best `number_assets`.
///
/// Candidates without a ticker, with a non-finite ranking value, or with a
/// value below `min_value` are dropped before ranking. Ties keep their
/// candidate order (stable sort).
#[derive(Debug, Clone)]
pub struct VolumePairList {
    pub number_assets: usize,
    pub sort_key: SortKey,
    pub min_value: f64,
}

impl Default for VolumePairList {
    fn default() -> Self {
        Self {
            number_assets: 20,
            sort_key: SortKey::QuoteVolume,
            min_value: 0.0,
        }
    }
}

impl VolumePairList {
    pub fn new(number_assets: usize, sort_key: SortKey, min_value: f64) -> Self {
        Self {
            number_assets,
            sort_key,
            min_value,
        }
    }
}

impl PairFilter for VolumePairList {
    fn name(&self) -> &str {
        "VolumePairList"
    }

    fn filter(&self, pairs: &[Symbol], tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let mut ranked: Vec<(&Symbol, f64)> = pairs
            .iter()
            .filter_map(|pair| {
                let value = tickers.get(pair)?.rank_value(self.sort_key);
                (value.is_finite() && value >= self.min_value).then_some((pair, value))
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
            sort_key = %self.sort_key,
            before = pairs.len(),
            after = result.len(),
            "Ranked top pairs"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(n) = usize_opt(options, self.name(), "number_assets") {
            self.number_assets = n;
        }
        if let Some(v) = f64_opt(options, self.name(), "min_value") {
            self.min_value = v;
        }
        if let Some(key) = string_opt(options, self.name(), "sort_key") {
            match key.parse() {
                Ok(k) => self.sort_key = k,
                Err(e) => warn!(filter = self.name(), error = %e, "Keeping previous sort key"),
            }
        }
    }
}
