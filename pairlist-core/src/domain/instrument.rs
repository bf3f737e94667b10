use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Symbol;

/// Kind of market an instrument trades on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PairType {
    #[default]
    Spot,
    Futures,
    Margin,
}

/// Market metadata for a tradable symbol.
///
/// Produced fresh by the universe provider on every refresh and only ever
/// read by the pipeline. `market_cap_rank == 0` means the instrument is
/// unranked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub symbol: Symbol,
    pub base: String,
    pub quote: String,
    #[serde(default)]
    pub pair_type: PairType,
    pub active: bool,

    // Trading limits
    #[serde(default)]
    pub min_amount: f64,
    #[serde(default)]
    pub max_amount: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub min_cost: f64,

    // Precision (decimal places)
    #[serde(default)]
    pub amount_precision: u32,
    #[serde(default)]
    pub price_precision: u32,

    // Fees
    #[serde(default)]
    pub maker_fee: f64,
    #[serde(default)]
    pub taker_fee: f64,

    pub listed_at: DateTime<Utc>,

    #[serde(default)]
    pub market_cap: f64,
    #[serde(default)]
    pub market_cap_rank: u32,
}

impl Instrument {
    /// Active spot instrument with zeroed limits, fees and market-cap data.
    ///
    /// `symbol` is expected in `BASE/QUOTE` form; anything else leaves the
    /// quote asset empty.
    pub fn spot(symbol: impl Into<Symbol>, listed_at: DateTime<Utc>) -> Self {
        let symbol = symbol.into();
        let (base, quote) = match symbol.split_once('/') {
            Some((b, q)) => (b.to_string(), q.to_string()),
            None => (symbol.clone(), String::new()),
        };
        Self {
            symbol,
            base,
            quote,
            pair_type: PairType::Spot,
            active: true,
            min_amount: 0.0,
            max_amount: 0.0,
            min_price: 0.0,
            max_price: 0.0,
            min_cost: 0.0,
            amount_precision: 0,
            price_precision: 0,
            maker_fee: 0.0,
            taker_fee: 0.0,
            listed_at,
            market_cap: 0.0,
            market_cap_rank: 0,
        }
    }

    /// Elapsed whole days between listing and `now` (negative if listed in the future).
    pub fn days_listed(&self, now: DateTime<Utc>) -> i64 {
        (now - self.listed_at).num_hours() / 24
    }

    /// Whether the instrument carries a usable market-cap rank.
    pub fn is_ranked(&self) -> bool {
        self.market_cap_rank > 0
    }
}
