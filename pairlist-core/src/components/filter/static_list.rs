//! Static whitelist - keeps only explicitly listed pairs.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::options::symbols_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

/// Keeps candidates present in the whitelist, in candidate order.
///
/// An empty whitelist passes everything through.
#[derive(Debug, Clone, Default)]
pub struct StaticPairList {
    whitelist: Vec<Symbol>,
}

impl StaticPairList {
    pub fn new(whitelist: Vec<Symbol>) -> Self {
        Self { whitelist }
    }

    pub fn set_whitelist(&mut self, whitelist: Vec<Symbol>) {
        self.whitelist = whitelist;
    }

    pub fn whitelist(&self) -> &[Symbol] {
        &self.whitelist
    }
}

impl PairFilter for StaticPairList {
    fn name(&self) -> &str {
        "StaticPairList"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        if self.whitelist.is_empty() {
            return Ok(pairs.to_vec());
        }

        let allowed: HashSet<&str> = self.whitelist.iter().map(String::as_str).collect();
        let result: Vec<Symbol> = pairs
            .iter()
            .filter(|p| allowed.contains(p.as_str()))
            .cloned()
            .collect();

        debug!(
            filter = self.name(),
            before = pairs.len(),
            after = result.len(),
            "Whitelist applied"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(list) = symbols_opt(options, self.name(), "whitelist") {
            self.whitelist = list;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::filter::test_support::symbols;
    use serde_json::json;

    #[test]
    fn empty_whitelist_passes_through() {
        let f = StaticPairList::default();
        let pairs = symbols(&["A", "B"]);
        assert_eq!(f.filter(&pairs, &TickerMap::new()).unwrap(), pairs);
    }

    #[test]
    fn keeps_intersection_in_candidate_order() {
        let f = StaticPairList::new(symbols(&["C", "A", "X"]));
        let out = f.filter(&symbols(&["A", "B", "C"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["A", "C"]));
    }

    #[test]
    fn configure_replaces_whitelist() {
        let mut f = StaticPairList::new(symbols(&["A"]));
        f.configure(&json!({ "whitelist": ["B"] }));
        assert_eq!(f.whitelist(), &symbols(&["B"])[..]);

        // Missing key keeps the current list.
        f.configure(&json!({ "method": "StaticPairList" }));
        assert_eq!(f.whitelist(), &symbols(&["B"])[..]);
    }

    #[test]
    fn does_not_need_tickers() {
        let f = StaticPairList::new(symbols(&["A"]));
        let out = f.filter(&symbols(&["A"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["A"]));
    }
}
