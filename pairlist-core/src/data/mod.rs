//! Data layer: provider contracts for the universe, tickers and stage collaborators.

pub mod provider;

pub use provider::{
    PerformanceProvider, ProviderError, RemotePairProvider, TickerProvider, UniverseProvider,
};
