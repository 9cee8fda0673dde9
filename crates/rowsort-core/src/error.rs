//! Error types for rowsort

use thiserror::Error;

/// Core error type for rowsort operations
#[derive(Error, Debug)]
pub enum RowsortError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid sort key: {0}")]
    InvalidSortKey(String),

    #[error("Row tree depth {depth} exceeds the configured maximum of {max_depth}")]
    DepthLimitExceeded { max_depth: usize, depth: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for rowsort operations
pub type Result<T> = std::result::Result<T, RowsortError>;
