//! Pairlist Core: selects the working set of tradable pairs from an
//! exchange universe.
//!
//! This crate contains:
//! - Domain types (instruments, tickers, ranking keys)
//! - Provider contracts for market data and stage collaborators
//! - Selection stages and the factory that builds them from config
//! - Pipeline configuration loading (JSON / TOML)
//! - The pipeline manager with thread-safe publication and auto refresh

pub mod components;
pub mod config;
pub mod data;
pub mod domain;
pub mod manager;

pub use components::{create, create_from_config, FactoryError, PairFilter, METHODS};
pub use config::{ConfigError, PairlistConfig};
pub use data::ProviderError;
pub use manager::{PairListManager, PairlistStatistics, RefreshError, RefreshReport};
