//! Provider traits and structured error types.
//!
//! The pipeline never talks to an exchange itself. Everything it consumes
//! comes through these traits, so callers can plug in exchange clients,
//! file-backed sources, or closures in tests. Each trait is implemented for
//! any matching `Fn` closure.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{Instrument, Symbol, TickerMap};

/// Structured error type for provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider error: {0}")]
    Other(String),
}

/// Source of the full instrument universe (and of instrument metadata).
pub trait UniverseProvider: Send + Sync {
    fn instruments(&self) -> Result<Vec<Instrument>, ProviderError>;
}

/// Source of ticker snapshots keyed by symbol.
pub trait TickerProvider: Send + Sync {
    fn tickers(&self) -> Result<TickerMap, ProviderError>;
}

/// Source of per-symbol performance, as a fractional return (0.05 = +5%).
pub trait PerformanceProvider: Send + Sync {
    fn performance(&self) -> Result<HashMap<Symbol, f64>, ProviderError>;
}

/// Source of a pair list produced by another pipeline instance.
pub trait RemotePairProvider: Send + Sync {
    fn pairs(&self) -> Result<Vec<Symbol>, ProviderError>;
}

impl<F> UniverseProvider for F
where
    F: Fn() -> Result<Vec<Instrument>, ProviderError> + Send + Sync,
{
    fn instruments(&self) -> Result<Vec<Instrument>, ProviderError> {
        self()
    }
}

impl<F> TickerProvider for F
where
    F: Fn() -> Result<TickerMap, ProviderError> + Send + Sync,
{
    fn tickers(&self) -> Result<TickerMap, ProviderError> {
        self()
    }
}

impl<F> PerformanceProvider for F
where
    F: Fn() -> Result<HashMap<Symbol, f64>, ProviderError> + Send + Sync,
{
    fn performance(&self) -> Result<HashMap<Symbol, f64>, ProviderError> {
        self()
    }
}

impl<F> RemotePairProvider for F
where
    F: Fn() -> Result<Vec<Symbol>, ProviderError> + Send + Sync,
{
    fn pairs(&self) -> Result<Vec<Symbol>, ProviderError> {
        self()
    }
}
