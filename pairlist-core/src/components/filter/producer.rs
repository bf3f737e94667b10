//! Passthrough of a list published by an external producer.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use super::options::string_opt;
use super::slot::ProviderSlot;
use super::{Collaborators, PairFilter};
use crate::data::{ProviderError, RemotePairProvider};
use crate::domain::{Symbol, TickerMap};

/// Replaces the candidate list with whatever the remote provider returns.
///
/// This is the one stage allowed to introduce symbols that were not in its
/// input. Without a provider it yields an empty list.
#[derive(Clone, Default)]
pub struct ProducerPairList {
    pub producer_name: String,
    remote: ProviderSlot<dyn RemotePairProvider>,
}

impl std::fmt::Debug for ProducerPairList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProducerPairList")
            .field("producer_name", &self.producer_name)
            .field("remote", &self.remote.is_set())
            .finish()
    }
}

impl ProducerPairList {
    pub fn new(producer_name: impl Into<String>) -> Self {
        Self {
            producer_name: producer_name.into(),
            remote: ProviderSlot::default(),
        }
    }

    pub fn with_remote_provider(self, provider: Arc<dyn RemotePairProvider>) -> Self {
        self.remote.set(provider);
        self
    }
}

impl PairFilter for ProducerPairList {
    fn name(&self) -> &str {
        "ProducerPairList"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let Some(remote) = self.remote.get() else {
            error!(
                filter = self.name(),
                producer = %self.producer_name,
                "No remote pair provider attached, producing an empty list"
            );
            return Ok(Vec::new());
        };

        let result = remote.pairs()?;
        info!(
            filter = self.name(),
            producer = %self.producer_name,
            before = pairs.len(),
            after = result.len(),
            "Received pairs from producer"
        );
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(name) = string_opt(options, self.name(), "producer_name") {
            self.producer_name = name;
        }
    }

    fn attach(&self, collaborators: &Collaborators) {
        if let Some(remote) = &collaborators.remote_pairs {
            self.remote.set(Arc::clone(remote));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::filter::test_support::symbols;
    use serde_json::json;

    fn remote() -> Arc<dyn RemotePairProvider> {
        Arc::new(|| -> Result<Vec<Symbol>, ProviderError> {
            Ok(vec!["NEW/USDT".to_string(), "ALT/USDT".to_string()])
        })
    }

    #[test]
    fn replaces_the_candidate_list() {
        let f = ProducerPairList::new("signals").with_remote_provider(remote());
        let out = f.filter(&symbols(&["BTC/USDT"]), &TickerMap::new()).unwrap();
        assert_eq!(out, symbols(&["NEW/USDT", "ALT/USDT"]));
    }

    #[test]
    fn empty_without_provider() {
        let f = ProducerPairList::default();
        assert!(f.filter(&symbols(&["BTC/USDT"]), &TickerMap::new()).unwrap().is_empty());
    }

    #[test]
    fn configure_and_attach() {
        let mut f = ProducerPairList::default();
        f.configure(&json!({ "producer_name": "upstream" }));
        f.attach(&Collaborators {
            remote_pairs: Some(remote()),
            ..Collaborators::default()
        });
        assert_eq!(f.producer_name, "upstream");
        assert_eq!(f.filter(&[], &TickerMap::new()).unwrap().len(), 2);
    }
}
