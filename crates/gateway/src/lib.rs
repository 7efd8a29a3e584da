//! Offer Book Gateway
//!
//! Gateway layer between the order book view and the P2P network. Provides:
//! - Feed wire messages (offer added / offers received / offer removed)
//! - The offer codec used for feed payloads
//! - Transport abstraction (tokio channels, with traits for future transports)
//! - Network adapters (channel-backed request sender, in-memory offer network)
//!
//! ## Architecture
//!
//! ```text
//! P2P network (DHT, simulator)
//!         │ FeedEvent             ▲ FeedRequest
//!    ┌────▼────┐             ┌────┴────┐
//!    │Subscriber│            │ Request │
//!    │ (events) │            │ Sender  │
//!    └────┬────┘             └────▲────┘
//!         │                       │ request_offers / request_remove_offer
//!    ┌────▼───────────────────────┴────┐
//!    │          Order book view        │
//!    └─────────────────────────────────┘
//! ```

pub mod adapters;
pub mod codec;
pub mod error;
pub mod messages;
pub mod transport;

// Re-export commonly used types
pub use adapters::{FeedRequestSender, InMemoryOfferNetwork};
pub use codec::{OfferCodec, StoredValue};
pub use error::{GatewayError, TransportError};
pub use messages::{FeedEvent, FeedRequest};
pub use transport::{
    Publisher, Subscriber,
    channel::{ChannelPublisher, ChannelSubscriber},
};
