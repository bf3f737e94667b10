//! Pipeline components: the selection stages and the factory that builds them.

pub mod factory;
pub mod filter;

pub use factory::{create, create_from_config, FactoryError, METHODS};
pub use filter::{apply_chain, Collaborators, PairFilter, StageError};
