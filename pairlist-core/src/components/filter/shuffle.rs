//! Random permutation of the candidate list.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::Value;
use tracing::info;

use super::options::u64_opt;
use super::PairFilter;
use crate::data::ProviderError;
use crate::domain::{Symbol, TickerMap};

/// Shuffles candidates.
///
/// A non-zero `seed` gives the same permutation on every call for the same
/// input; `seed == 0` draws from OS entropy each time.
#[derive(Debug, Clone, Default)]
pub struct ShuffleFilter {
    pub seed: u64,
}

impl ShuffleFilter {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self) -> StdRng {
        if self.seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(self.seed)
        }
    }
}

impl PairFilter for ShuffleFilter {
    fn name(&self) -> &str {
        "ShuffleFilter"
    }

    fn filter(&self, pairs: &[Symbol], _tickers: &TickerMap) -> Result<Vec<Symbol>, ProviderError> {
        let mut result = pairs.to_vec();
        result.shuffle(&mut self.rng());
        info!(filter = self.name(), count = result.len(), seed = self.seed, "Shuffled pairs");
        Ok(result)
    }

    fn configure(&mut self, options: &Value) {
        if let Some(seed) = u64_opt(options, self.name(), "seed") {
            self.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<Symbol> {
        (0..20).map(|i| format!("P{i}")).collect()
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let f = ShuffleFilter::new(42);
        let a = f.filter(&pairs(), &TickerMap::new()).unwrap();
        let b = f.filter(&pairs(), &TickerMap::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_a_permutation() {
        let out = ShuffleFilter::new(7).filter(&pairs(), &TickerMap::new()).unwrap();
        let mut sorted_out = out.clone();
        sorted_out.sort();
        let mut sorted_in = pairs();
        sorted_in.sort();
        assert_eq!(sorted_out, sorted_in);
    }

    #[test]
    fn different_seeds_differ() {
        let a = ShuffleFilter::new(1).filter(&pairs(), &TickerMap::new()).unwrap();
        let b = ShuffleFilter::new(2).filter(&pairs(), &TickerMap::new()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn entropy_seed_keeps_length() {
        let out = ShuffleFilter::default().filter(&pairs(), &TickerMap::new()).unwrap();
        assert_eq!(out.len(), 20);
    }
}
