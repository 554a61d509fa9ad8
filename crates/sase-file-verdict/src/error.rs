//! Error types for the file verdict engine

use thiserror::Error;

/// File verdict engine error type
#[derive(Error, Debug)]
pub enum FileVerdictError {
    /// Key could not be built from the flow addresses
    #[error("malformed disposition key: {0}")]
    MalformedKey(String),

    /// Store had no slot for a new file
    #[error("file disposition cache has no free slot")]
    CapacityExhausted,

    /// Configuration failed validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for the file verdict engine
pub type FileVerdictResult<T> = Result<T, FileVerdictError>;
