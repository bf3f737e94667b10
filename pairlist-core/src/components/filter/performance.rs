//! Cutoff on historical strategy performance per pair.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::options::f64_opt;
use super::slot::ProviderSlot;
use super::{Collaborators, PairFilter};
use crate::data::{PerformanceProvider, ProviderError};
use crate::domain::{Symbol, TickerMap};

/// Drops candidates whose reported profit is below `min_profit`.
///
/// Pairs with no performance record yet are kept, so new pairs get a chance
/// to build a history.
#[derive(Clone, Default)]
pub struct PerformanceFilter {
    pub min_profit: f64,
    provider: ProviderSlot<dyn PerformanceProvider>,
}

impl std::fmt::Debug for PerformanceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceFilter")
            .field("min_profit", &self.min_profit)
            .field("provider", &self.provider.is_set())
            .finish()
    }
}

impl PerformanceFilter {
    pub fn new(min_profit: f64) -> Self {
        Self {
            min_profit,
            provider: ProviderSlot::default(),
        }
    }

    pub fn with_performance_provider(self, provider: Arc<dyn PerformanceProvider>) -> Self {
        self.provider.set(provider);
        self
    }
}

impl PairFilter for PerformanceFilter {
    fn name(&self) -> &str {
        "PerformanceFilter"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let Some(provider) = self.provider.get() else {
            warn!(filter = self.name(), "No performance provider attached, passing pairs through");
            return Ok(pairs.to_vec());
        };

        let performance = provider.performance()?;
        let result: Vec<Symbol> = pairs
            .iter()
            .filter(|pair| match performance.get(*pair) {
                Some(&profit) if profit.is_nan() || profit < self.min_profit => {
                    debug!(filter = self.name(), pair = %pair, profit, "Below profit threshold");
                    false
                }
                _ => true,
            })
            .cloned()
            .collect();

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            min_profit = self.min_profit,
            "Performance filter applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(v) = f64_opt(options, self.name(), "min_profit") {
            self.min_profit = v;
        }
    }

    fn attach(&self, collaborators: &Collaborators) {
        if let Some(performance) = &collaborators.performance {
            self.provider.set(Arc::clone(performance));
        }
    }
}
