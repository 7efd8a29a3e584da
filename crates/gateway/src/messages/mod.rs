//! Wire message types for feed communication
//!
//! Offers travel as opaque payloads; the order book decodes them through
//! the `OfferDecoder` port.

pub mod feed;

pub use feed::{FeedEvent, FeedRequest};
