//! Sorted view comparators
//!
//! Every ordering breaks ties by offer id, then by store sequence number,
//! so the sorted view is a deterministic total order even with duplicate
//! offer ids.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::item::OrderBookItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferOrdering {
    /// Cheapest first
    #[default]
    #[serde(rename = "price-asc")]
    PriceAscending,
    /// Most expensive first
    #[serde(rename = "price-desc")]
    PriceDescending,
    /// Largest amount first
    #[serde(rename = "amount-desc")]
    AmountDescending,
}

impl OfferOrdering {
    pub fn compare(&self, a: &OrderBookItem, b: &OrderBookItem) -> Ordering {
        let (x, y) = (a.offer(), b.offer());
        let primary = match self {
            OfferOrdering::PriceAscending => x.price.cmp(&y.price),
            OfferOrdering::PriceDescending => y.price.cmp(&x.price),
            OfferOrdering::AmountDescending => y.amount.cmp(&x.amount),
        };

        primary
            .then_with(|| x.id.cmp(&y.id))
            .then_with(|| a.seq().cmp(&b.seq()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferOrdering::PriceAscending => "price-asc",
            OfferOrdering::PriceDescending => "price-desc",
            OfferOrdering::AmountDescending => "amount-desc",
        }
    }
}

impl FromStr for OfferOrdering {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price-asc" | "price" => Ok(OfferOrdering::PriceAscending),
            "price-desc" => Ok(OfferOrdering::PriceDescending),
            "amount-desc" | "amount" => Ok(OfferOrdering::AmountDescending),
            other => Err(ConfigError::Parse(format!("unknown offer ordering '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OfferStore;
    use offerbook_core::{Country, Direction, Offer};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn item(store: &mut OfferStore, id: &str, amount: Decimal, price: Decimal) -> OrderBookItem {
        store.add(Offer::new(id, Direction::Sell, amount, price, "USD", Country::from_code("US")))
    }

    #[test]
    fn test_price_then_id_then_seq() {
        let mut store = OfferStore::new();
        let b = item(&mut store, "b", dec!(1), dec!(100));
        let a = item(&mut store, "a", dec!(1), dec!(100));
        let a_dup = item(&mut store, "a", dec!(1), dec!(100));
        let cheap = item(&mut store, "z", dec!(1), dec!(90));

        let mut items = vec![b.clone(), a_dup.clone(), cheap.clone(), a.clone()];
        items.sort_by(|x, y| OfferOrdering::PriceAscending.compare(x, y));

        assert_eq!(items, vec![cheap, a, a_dup, b]);
    }

    #[test]
    fn test_descending_orderings() {
        let mut store = OfferStore::new();
        let small = item(&mut store, "s", dec!(1), dec!(120));
        let large = item(&mut store, "l", dec!(9), dec!(80));

        assert_eq!(
            OfferOrdering::PriceDescending.compare(&small, &large),
            Ordering::Less
        );
        assert_eq!(
            OfferOrdering::AmountDescending.compare(&large, &small),
            Ordering::Less
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("price-desc".parse::<OfferOrdering>().unwrap(), OfferOrdering::PriceDescending);
        assert_eq!("AMOUNT".parse::<OfferOrdering>().unwrap(), OfferOrdering::AmountDescending);
        assert!("volume".parse::<OfferOrdering>().is_err());
    }
}
