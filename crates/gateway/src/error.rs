//! Error types for the gateway crate

use offerbook_ports::RequestError;
use thiserror::Error;

/// Transport-level errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Channel closed")]
    ChannelClosed,

    /// The subscriber fell behind and missed this many messages
    #[error("Subscriber lagged, {0} messages skipped")]
    Lagged(u64),
}

/// Gateway-level errors (adapter operations)
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for GatewayError {
    fn from(e: bincode::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}
