//! Price range - keeps pairs whose last price lies within bounds.

use serde_json::Value;
use tracing::info;

use super::options::f64_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

/// Keeps candidates with `min_price <= last_price <= max_price`.
#[derive(Debug, Clone)]
pub struct PriceFilter {
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for PriceFilter {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: f64::MAX,
        }
    }
}

impl PriceFilter {
    pub fn new(min_price: f64, max_price: f64) -> Self {
        Self {
            min_price,
            max_price,
        }
    }
}

impl PairFilter for PriceFilter {
    fn name(&self) -> &str {
        "PriceFilter"
    }

    fn filter(&self, pairs: &[Symbol], tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let result: Vec<Symbol> = pairs
            .iter()
            .filter(|pair| {
                tickers.get(*pair).is_some_and(|t| {
                    t.last_price >= self.min_price && t.last_price <= self.max_price
                })
            })
            .cloned()
            .collect();

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            min_price = self.min_price,
            max_price = self.max_price,
            "Price filter applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(v) = f64_opt(options, self.name(), "min_price") {
            self.min_price = v;
        }
        if let Some(v) = f64_opt(options, self.name(), "max_price") {
            self.max_price = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::filter::test_support::{symbols, ticker, ticker_map};
    use serde_json::json;

    fn tickers() -> TickerMap {
        ticker_map(vec![
            ticker("CHEAP", 0.001, 1.0),
            ticker("MID", 5.0, 1.0),
            ticker("PRICEY", 60_000.0, 1.0),
        ])
    }

    #[test]
    fn default_keeps_everything_with_a_ticker() {
        let out = PriceFilter::default()
            .filter(&symbols(&["CHEAP", "MID", "PRICEY", "NONE"]), &tickers())
            .unwrap();
        assert_eq!(out, symbols(&["CHEAP", "MID", "PRICEY"]));
    }

    #[test]
    fn bounds_are_inclusive() {
        let f = PriceFilter::new(5.0, 60_000.0);
        let out = f.filter(&symbols(&["CHEAP", "MID", "PRICEY"]), &tickers()).unwrap();
        assert_eq!(out, symbols(&["MID", "PRICEY"]));
    }

    #[test]
    fn configure_partial_update() {
        let mut f = PriceFilter::default();
        f.configure(&json!({ "min_price": 1.0 }));
        assert_eq!(f.min_price, 1.0);
        assert_eq!(f.max_price, f64::MAX);

        f.configure(&json!({ "max_price": 100.0 }));
        assert_eq!(f.min_price, 1.0);
        assert_eq!(f.max_price, 100.0);
    }
}
