//! Offer Book View
//!
//! Holds the offers known from the P2P network, filters them against the
//! local user's account and trust settings, and keeps a live, sorted result
//! set up to date as offers are added, removed, or bulk-refreshed.
//!
//! ## Architecture
//!
//! ```text
//!   Feed events (network)
//!          │ FeedEvent
//!          ▼
//!  ┌──────────────────────┐      request_offers / request_remove_offer
//!  │ OrderBookController  │ ─────────────────────────────────────────► ports
//!  └──────────┬───────────┘
//!             │ add / replace_all / remove_by_id   (single write lock)
//!             ▼
//!  ┌──────────────────────┐
//!  │      OfferStore      │
//!  └──────────┬───────────┘
//!             │ full re-evaluation (OfferMatcher)
//!             ▼
//!  ┌──────────────────────┐
//!  │  FilteredProjection  │ ──► ViewChange listeners
//!  └──────────┬───────────┘
//!             │ OfferOrdering
//!             ▼
//!  ┌──────────────────────┐
//!  │   SortedProjection   │ ──► ViewChange listeners (presentation)
//!  └──────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use offerbook_orderbook::{OrderBookConfig, OrderBookController};
//!
//! let controller = OrderBookController::new(requests.clone(), requests, codec, OrderBookConfig::default());
//! controller.init(network.subscribe())?;
//! controller.apply_filter(Some(OrderBookFilter::new(Direction::Buy)));
//! controller.load_offers()?;
//! let offers = controller.sorted_offers();
//! ```

pub mod book;
pub mod config;
pub mod controller;
pub mod error;
pub mod item;
pub mod matcher;
pub mod notify;
pub mod ordering;
pub mod projection;
pub mod store;

// Re-export main types
pub use book::OrderBook;
pub use config::OrderBookConfig;
pub use controller::{FeedHandler, OrderBookController};
pub use error::{ConfigError, OrderBookError};
pub use item::OrderBookItem;
pub use matcher::{Mismatch, OfferMatcher};
pub use notify::{ListenerId, Listeners, ViewChange};
pub use ordering::OfferOrdering;
pub use projection::{FilteredProjection, SortedProjection};
pub use store::OfferStore;
