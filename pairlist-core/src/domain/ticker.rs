use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Symbol;

/// Ticker snapshots keyed by symbol.
pub type TickerMap = HashMap<Symbol, Ticker>;

/// Point-in-time quote for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticker {
    pub symbol: Symbol,
    pub last_price: f64,
    pub bid: f64,
    pub ask: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    /// 24h volume in the base asset.
    pub volume_24h: f64,
    /// 24h volume in the quote asset.
    pub quote_volume_24h: f64,
    /// 24h price change in percent.
    pub price_change_percent_24h: f64,
    pub timestamp: DateTime<Utc>,
}

impl Ticker {
    /// Absolute bid-ask spread.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// `(ask - bid) / ask`. NaN or infinite when `ask` is zero.
    pub fn spread_ratio(&self) -> f64 {
        (self.ask - self.bid) / self.ask
    }

    /// Simplified 24h volatility: `(high - low) / last_price`.
    pub fn volatility(&self) -> f64 {
        (self.high_24h - self.low_24h) / self.last_price
    }

    /// Numeric value used when ranking by `key`.
    pub fn rank_value(&self, key: SortKey) -> f64 {
        match key {
            SortKey::QuoteVolume => self.quote_volume_24h,
            SortKey::Volume => self.volume_24h,
            SortKey::PriceChange => self.price_change_percent_24h.abs(),
            SortKey::Volatility => self.volatility(),
        }
    }
}

/// Field a ranking stage sorts by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    #[serde(rename = "quoteVolume", alias = "quote_volume")]
    QuoteVolume,
    #[serde(rename = "volume", alias = "base_volume")]
    Volume,
    /// Absolute 24h price change.
    #[serde(rename = "priceChange", alias = "price_change")]
    PriceChange,
    #[serde(rename = "volatility")]
    Volatility,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuoteVolume => "quoteVolume",
            Self::Volume => "volume",
            Self::PriceChange => "priceChange",
            Self::Volatility => "volatility",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quoteVolume" | "quote_volume" => Ok(Self::QuoteVolume),
            "volume" | "base_volume" => Ok(Self::Volume),
            "priceChange" | "price_change" => Ok(Self::PriceChange),
            "volatility" => Ok(Self::Volatility),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}
