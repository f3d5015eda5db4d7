//! Error types for the mnemo_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mnemo_core operations
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

    /// Review quality grade outside the 1..=5 scale
    #[error("Invalid review quality: expected 1-5, got {0}")]
    InvalidQuality(u8),

    /// A stored timestamp failed to parse
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    /// Deck store error
    #[error("Deck store error: {0}")]
    Store(String),

    /// Review journal error
    #[error("Journal error: {0}")]
    Journal(String),
}
