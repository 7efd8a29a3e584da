//! Error types for the order book view

use offerbook_ports::RequestError;
use thiserror::Error;

/// Errors surfaced to callers of the controller
///
/// Feed-driven failures never appear here; they are logged and recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    #[error("Controller already subscribed to a feed")]
    AlreadyStarted,

    #[error("No tokio runtime to run the feed task: {0}")]
    NoRuntime(String),
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
