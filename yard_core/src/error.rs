//! Error types for the yard_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for yard_core operations
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

    /// HTTP transport error talking to the Rec Yard service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rule set validation error
    #[error("Rule set error: {0}")]
    RuleSet(String),

    /// Session state machine misuse (e.g. flipping while paused)
    #[error("Session error: {0}")]
    Session(String),

    /// Rec Yard remote service error (non-2xx response, missing row)
    #[error("Rec Yard error: {0}")]
    Remote(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
