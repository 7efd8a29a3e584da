//! Offer Book Core Domain
//!
//! Pure domain types for the peer-to-peer offer book.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod context;
pub mod entities;
pub mod filter;
pub mod values;

// Re-export commonly used types at crate root
pub use context::UserContext;
pub use entities::{Arbitrator, ArbitratorId, BankAccount, BankAccountId, Direction, Offer};
pub use filter::OrderBookFilter;
pub use values::{Country, CurrencyCode, LanguageTag, OfferId, Price, Quantity, Timestamp};
