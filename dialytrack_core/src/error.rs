//! Error types for the dialytrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for dialytrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller input outside the domain a metric is defined over
    #[error("Validation error: {0}")]
    Validation(String),

    /// Plan table consistency error
    #[error("Plan table error: {0}")]
    PlanTable(String),

    /// Unrecognised plan, feature or resource key
    #[error("Unknown {kind}: '{key}'")]
    UnknownKey { kind: &'static str, key: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
