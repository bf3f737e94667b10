//! Domain types for the pair selection pipeline

pub mod instrument;
pub mod ticker;

pub use instrument::{Instrument, PairType};
pub use ticker::{SortKey, Ticker, TickerMap, UnknownSortKey};

/// Symbol type alias
pub type Symbol = String;
