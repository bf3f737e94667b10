//! Stage factory: turns a method name (plus its JSON options) into a
//! configured `PairFilter` trait object.
//!
//! Adding a new stage means adding it to `METHODS` and to the match in
//! `create`; nothing else in the crate dispatches on method names.

use serde_json::Value;
use tracing::error;

use super::filter::{
    AgeFilter, BlacklistFilter, MarketCapPairList, OffsetFilter, PairFilter, PerformanceFilter,
    PriceFilter, ProducerPairList, ShuffleFilter, SpreadFilter, StaticPairList, VolatilityFilter,
    VolumePairList,
};

// ─── Error type ──────────────────────────────────────────────────────

/// Errors that can occur during stage construction.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FactoryError {
    #[error("Unknown pairlist method: {0}")]
    UnknownMethod(String),
    #[error("Filter config is missing a string 'method' field")]
    MissingMethod,
}

/// Every method name `create` recognizes, in documentation order.
pub const METHODS: &[&str] = &[
    "StaticPairList",
    "BlacklistFilter",
    "VolumePairList",
    "SpreadFilter",
    "PriceFilter",
    "VolatilityFilter",
    "AgeFilter",
    "OffsetFilter",
    "ShuffleFilter",
    "PerformanceFilter",
    "ProducerPairList",
    "MarketCapPairList",
];

// ─── Factory ─────────────────────────────────────────────────────────

/// Create a stage with default settings.
pub fn create(method: &str) -> Result<Box<dyn PairFilter>, FactoryError> {
    let stage: Box<dyn PairFilter> = match method {
        "StaticPairList" => Box::<StaticPairList>::default(),
        "BlacklistFilter" => Box::<BlacklistFilter>::default(),
        "VolumePairList" => Box::<VolumePairList>::default(),
        "SpreadFilter" => Box::<SpreadFilter>::default(),
        "PriceFilter" => Box::<PriceFilter>::default(),
        "VolatilityFilter" => Box::<VolatilityFilter>::default(),
        "AgeFilter" => Box::<AgeFilter>::default(),
        "OffsetFilter" => Box::<OffsetFilter>::default(),
        "ShuffleFilter" => Box::<ShuffleFilter>::default(),
        "PerformanceFilter" => Box::<PerformanceFilter>::default(),
        "ProducerPairList" => Box::<ProducerPairList>::default(),
        "MarketCapPairList" => Box::<MarketCapPairList>::default(),
        other => {
            error!(method = other, "Unknown pairlist method");
            return Err(FactoryError::UnknownMethod(other.to_string()));
        }
    };
    Ok(stage)
}

/// Create a stage from a config object such as
/// `{"method": "VolumePairList", "number_assets": 30}`.
///
/// The whole object is passed to `configure`; the `method` key itself is
/// ignored by every stage.
pub fn create_from_config(config: &Value) -> Result<Box<dyn PairFilter>, FactoryError> {
    let Some(method) = config.get("method").and_then(Value::as_str) else {
        error!(%config, "Filter config has no 'method' field");
        return Err(FactoryError::MissingMethod);
    };
    let mut stage = create(method)?;
    stage.configure(config);
    Ok(stage)
}

// ─── Tests ───────────────────────────────────────────────────────────
