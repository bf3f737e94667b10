//! Typed lookups into a stage's JSON options.
//!
//! A missing key yields `None` silently; a key holding the wrong type is
//! logged and also yields `None`, so the stage keeps its current value.

use serde_json::Value;
use tracing::warn;

use crate::domain::Symbol;

fn lookup<'a>(options: &'a Value, key: &str) -> Option<&'a Value> {
    options.get(key).filter(|v| !v.is_null())
}

fn rejected(stage: &str, key: &str, expected: &str, value: &Value) {
    warn!(filter = stage, key, expected, %value, "Ignoring filter option with wrong type");
}

pub(crate) fn f64_opt(options: &Value, stage: &str, key: &str) -> Option<f64> {
    let value = lookup(options, key)?;
    match value.as_f64() {
        Some(v) => Some(v),
        None => {
            rejected(stage, key, "number", value);
            None
        }
    }
}

pub(crate) fn usize_opt(options: &Value, stage: &str, key: &str) -> Option<usize> {
    let value = lookup(options, key)?;
    match value.as_u64() {
        Some(v) => Some(usize::try_from(v).unwrap_or(usize::MAX)),
        None => {
            rejected(stage, key, "non-negative integer", value);
            None
        }
    }
}

pub(crate) fn u64_opt(options: &Value, stage: &str, key: &str) -> Option<u64> {
    let value = lookup(options, key)?;
    match value.as_u64() {
        Some(v) => Some(v),
        None => {
            rejected(stage, key, "non-negative integer", value);
            None
        }
    }
}

pub(crate) fn i64_opt(options: &Value, stage: &str, key: &str) -> Option<i64> {
    let value = lookup(options, key)?;
    match value.as_i64() {
        Some(v) => Some(v),
        None => {
            rejected(stage, key, "integer", value);
            None
        }
    }
}

pub(crate) fn string_opt(options: &Value, stage: &str, key: &str) -> Option<String> {
    let value = lookup(options, key)?;
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            rejected(stage, key, "string", value);
            None
        }
    }
}

/// Array of symbol strings. Non-string elements reject the whole value.
pub(crate) fn symbols_opt(options: &Value, stage: &str, key: &str) -> Option<Vec<Symbol>> {
    let value = lookup(options, key)?;
    let parsed = value.as_array().and_then(|items| {
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
    });
    if parsed.is_none() {
        rejected(stage, key, "array of strings", value);
    }
    parsed
}
