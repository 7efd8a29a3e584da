//! Network adapters
//!
//! Adapters implement the order book's outbound ports on top of the channel
//! transport, and provide an in-memory network for tests and simulation.

pub mod memory;
pub mod requests;

pub use memory::InMemoryOfferNetwork;
pub use requests::FeedRequestSender;
