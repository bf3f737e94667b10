//! Pipeline configuration document.
//!
//! ```toml
//! refresh_period = 1800
//!
//! [[pairlist_filters]]
//! method = "VolumePairList"
//! number_assets = 20
//! ```
//!
//! The same shape is accepted as JSON. Stage entries stay as raw JSON values
//! so each stage reads only the options it understands.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Ordered stage definitions plus an optional refresh period in seconds.
///
/// Both fields are read leniently: a `pairlist_filters` that is not an array
/// loads no stages, and a `refresh_period` that is not a non-negative integer
/// is ignored. Either case is logged and never rejects the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairlistConfig {
    #[serde(default, deserialize_with = "lenient_filters")]
    pub pairlist_filters: Vec<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_period",
        skip_serializing_if = "Option::is_none"
    )]
    pub refresh_period: Option<u64>,
}

fn lenient_filters<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(entries) => Ok(entries),
        Value::Null => Ok(Vec::new()),
        other => {
            warn!(value = %other, "pairlist_filters is not an array, loading no filters");
            Ok(Vec::new())
        }
    }
}

fn lenient_period<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let period = value.as_u64();
    if period.is_none() {
        warn!(value = %value, "Ignoring refresh_period, expected whole seconds");
    }
    Ok(period)
}

impl PairlistConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from disk. `.toml` files are parsed as TOML, everything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Method names in declared order; entries without a string `method` are skipped.
    pub fn methods(&self) -> Vec<&str> {
        self.pairlist_filters
            .iter()
            .filter_map(|f| f.get("method").and_then(Value::as_str))
            .collect()
    }
}
