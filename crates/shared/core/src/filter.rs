use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::Direction;
use crate::values::{Price, Quantity};

/// User-specified criteria narrowing the visible offers
///
/// `direction` is the side the *user* wants to trade: a Buy filter surfaces
/// Sell offers. Without a direction the filter matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBookFilter {
    pub direction: Option<Direction>,
    /// Minimum amount the offer must cover
    pub amount: Option<Quantity>,
    /// Price bound: ceiling when buying, floor when selling
    pub price: Option<Price>,
}

impl OrderBookFilter {
    /// Filter for the given trade direction with no amount or price bound
    pub fn new(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            amount: None,
            price: None,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}
