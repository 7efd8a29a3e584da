//! Offer Book Runner - Offer Network Simulation
//!
//! Exercises the order book view against a simulated P2P network:
//!
//! - **Offer Generator**: Seeded source of plausible offers
//! - **Simulation**: Wires the in-memory network, request channel and
//!   controller, then reports the resulting sorted view
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────┐
//!   │ Offer Generator │
//!   └────────┬────────┘
//!            │ publish_offer
//!            ▼
//!   ┌─────────────────────┐   FeedRequest    ┌─────────────────────┐
//!   │ InMemoryOfferNetwork│ ◄─────────────── │  FeedRequestSender  │
//!   └────────┬────────────┘                  └──────────▲──────────┘
//!            │ FeedEvent                                │
//!            ▼                                          │ load_offers / remove_offer
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                    OrderBookController                      │
//!   └─────────────────────────────────────────────────────────────┘
//! ```

pub mod offer_generator;
pub mod simulation;

// Re-export main types
pub use offer_generator::{CurrencyQuote, GeneratorConfig, OfferGenerator};
pub use simulation::{
    OrderBookSimulation, OfferSummary, SimulationConfig, SimulationError, SimulationResults,
    UserProfile,
};
