//! Listing age gate - skips freshly listed pairs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::options::i64_opt;
use super::slot::ProviderSlot;
use super::{Collaborators, PairFilter};
use crate::data::{ProviderError, UniverseProvider};
use crate::domain::{Instrument, Symbol, TickerMap};

/// Drops candidates listed fewer than `min_days_listed` whole days ago.
///
/// Listing dates come from the metadata provider, queried on every call.
/// Candidates the provider does not know about are dropped. Without a
/// provider the stage passes everything through.
#[derive(Clone)]
pub struct AgeFilter {
    pub min_days_listed: i64,
    metadata: ProviderSlot<dyn UniverseProvider>,
}

impl Default for AgeFilter {
    fn default() -> Self {
        Self {
            min_days_listed: 10,
            metadata: ProviderSlot::default(),
        }
    }
}

impl std::fmt::Debug for AgeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgeFilter")
            .field("min_days_listed", &self.min_days_listed)
            .field("metadata", &self.metadata.is_set())
            .finish()
    }
}

impl AgeFilter {
    pub fn new(min_days_listed: i64) -> Self {
        Self {
            min_days_listed,
            ..Self::default()
        }
    }

    pub fn with_market_provider(self, provider: Arc<dyn UniverseProvider>) -> Self {
        self.metadata.set(provider);
        self
    }
}

impl PairFilter for AgeFilter {
    fn name(&self) -> &str {
        "AgeFilter"
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

        let now = Utc::now();
        let mut result = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let Some(inst) = by_symbol.get(pair.as_str()) else {
                debug!(filter = self.name(), pair = %pair, "No listing metadata, dropping");
                continue;
            };
            let days = inst.days_listed(now);
            if days >= self.min_days_listed {
                result.push(pair.clone());
            } else {
                debug!(filter = self.name(), pair = %pair, days, "Listed too recently");
            }
        }

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            min_days = self.min_days_listed,
            "Age filter applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(days) = i64_opt(options, self.name(), "min_days_listed") {
            self.min_days_listed = days;
        }
    }

    fn attach(&self, collaborators: &Collaborators) {
        if let Some(metadata) = &collaborators.metadata {
            self.metadata.set(Arc::clone(metadata));
        }
    }
}
