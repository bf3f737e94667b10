//! Blacklist - removes explicitly excluded pairs.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};

use super::options::symbols_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

#[derive(Debug, Clone, Default)]
pub struct BlacklistFilter {
    blacklist: Vec<Symbol>,
}

impl BlacklistFilter {
    pub fn new(blacklist: Vec<Symbol>) -> Self {
        Self { blacklist }
    }

    pub fn set_blacklist(&mut self, blacklist: Vec<Symbol>) {
        self.blacklist = blacklist;
    }

    pub fn add_to_blacklist(&mut self, pair: impl Into<Symbol>) {
        self.blacklist.push(pair.into());
    }

    pub fn blacklist(&self) -> &[Symbol] {
        &self.blacklist
    }
}

impl PairFilter for BlacklistFilter {
    fn name(&self) -> &str {
        "BlacklistFilter"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        if self.blacklist.is_empty() {
            return Ok(pairs.to_vec());
        }

        let blocked: HashSet<&str> = self.blacklist.iter().map(String::as_str).collect();
        let mut result = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if blocked.contains(pair.as_str()) {
                debug!(filter = self.name(), pair = %pair, "Filtered out blacklisted pair");
            } else {
                result.push(pair.clone());
            }
        }

        info!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            removed = pairs.len() - result.len(),
            "Blacklist applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(list) = symbols_opt(options, self.name(), "blacklist") {
            self.blacklist = list;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::filter::test_support::symbols;
    use serde_json::json;

    #[test]
    fn removes_listed_pairs() {
        let f = BlacklistFilter::new(symbols(&["X"]));
        let out = f.filter(&symbols(&["X", "Y", "Z"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["Y", "Z"]));
    }

    #[test]
    fn idempotent() {
        let f = BlacklistFilter::new(symbols(&["B", "D"]));
        let once = f.filter(&symbols(&["A", "B", "C", "D"]), &TickerMap::new()).unwrap();
        let twice = f.filter(&once, &TickerMap::new()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn add_to_blacklist_extends() {
        let mut f = BlacklistFilter::default();
        f.add_to_blacklist("A");
        f.add_to_blacklist("B");
        let out = f.filter(&symbols(&["A", "B", "C"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["C"]));
    }

    #[test]
    fn configure_reads_blacklist() {
        let mut f = BlacklistFilter::default();
        f.configure(&json!({ "blacklist": ["DOGE/USDT"], "unrelated": 1 }));
        assert_eq!(f.blacklist(), &symbols(&["DOGE/USDT"])[..]);
    }

    #[test]
    fn configure_ignores_malformed_list() {
        let mut f = BlacklistFilter::new(symbols(&["A"]));
        f.configure(&json!({ "blacklist": "A,B" }));
        assert_eq!(f.blacklist(), &symbols(&["A"])[..]);
    }
}
