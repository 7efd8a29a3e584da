//! Offer Book Ports
//!
//! Port definitions (traits) for the offer book.
//! These define the boundaries between the order book view and the
//! collaborators it does not own: the P2P offer feed, the trade manager,
//! and offer deserialization.

mod decoder;
mod error;
mod feed;
mod trade;

pub use decoder::{OfferDecoder, OfferPayload};
pub use error::{DecodeError, DecodeResult, RequestError, RequestResult};
pub use feed::OfferRequester;
pub use trade::TradeManager;
