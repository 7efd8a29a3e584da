use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

mod country;
mod language;

pub use country::Country;
pub use language::LanguageTag;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// ISO 4217 currency code, compared verbatim ("USD", "EUR")
pub type CurrencyCode = String;

/// Opaque unique offer identifier assigned by the offering peer
pub type OfferId = String;
