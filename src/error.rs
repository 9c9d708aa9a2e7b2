use crate::types::Symbol;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown symbol: {0:?}")]
    UnknownSymbol(Symbol),

    #[error("Child slot {side:?} of node {parent:?} is already occupied")]
    SlotOccupied { parent: Symbol, side: crate::engines::generation::Side },

    #[error("Tree depth {depth} exceeds the maximum depth {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("Symbol {symbol:?} has {actual} children, expected {expected}")]
    ArityMismatch {
        symbol: Symbol,
        expected: usize,
        actual: usize,
    },

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GpError>;
