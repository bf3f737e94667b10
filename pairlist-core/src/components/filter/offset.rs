//! Positional paging over the candidate list.

use serde_json::Value;
use tracing::info;

use super::options::usize_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

/// Returns `pairs[offset .. offset + number_assets]`, clamped to the list.
///
/// `number_assets == 0` means no upper bound.
#[derive(Debug, Clone, Default)]
pub struct OffsetFilter {
    pub offset: usize,
    pub number_assets: usize,
}

impl OffsetFilter {
    pub fn new(offset: usize, number_assets: usize) -> Self {
        Self {
            offset,
            number_assets,
        }
    }
}

impl PairFilter for OffsetFilter {
    fn name(&self) -> &str {
        "OffsetFilter"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let start = self.offset.min(pairs.len());
        let end = if self.number_assets == 0 {
            pairs.len()
        } else {
            start.saturating_add(self.number_assets).min(pairs.len())
        };
        let result = pairs[start..end].to_vec();

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            offset = self.offset,
            "Offset applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(v) = usize_opt(options, self.name(), "offset") {
            self.offset = v;
        }
        if let Some(v) = usize_opt(options, self.name(), "number_assets") {
            self.number_assets = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ten() -> Vec<Symbol> {
        (0..10).map(|i| format!("P{i}")).collect()
    }

    #[test]
    fn pages_a_window() {
        let out = OffsetFilter::new(2, 3).filter(&ten(), &TickerMap::new()).unwrap();
        assert_eq!(out, vec!["P2", "P3", "P4"]);
    }

    #[test]
    fn zero_count_is_unbounded() {
        let out = OffsetFilter::new(7, 0).filter(&ten(), &TickerMap::new()).unwrap();
        assert_eq!(out, vec!["P7", "P8", "P9"]);
    }

    #[test]
    fn clamps_past_the_end() {
        assert!(OffsetFilter::new(50, 3)
            .filter(&ten(), &TickerMap::new())
            .unwrap()
            .is_empty());
        let out = OffsetFilter::new(8, usize::MAX).filter(&ten(), &TickerMap::new()).unwrap();
        assert_eq!(out, vec!["P8", "P9"]);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(OffsetFilter::default().filter(&ten(), &TickerMap::new()).unwrap(), ten());
    }
}
