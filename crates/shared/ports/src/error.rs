use thiserror::Error;

/// A feed payload could not be interpreted as an offer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Empty payload")]
    Empty,

    #[error("Malformed offer payload: {0}")]
    Malformed(String),

    #[error("Payload is not an offer: {0}")]
    WrongType(String),
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// An outbound request could not be handed to the collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Request channel closed")]
    ChannelClosed,

    #[error("Request rejected: {0}")]
    Rejected(String),
}

pub type RequestResult<T> = std::result::Result<T, RequestError>;
