use offerbook_core::Offer;

use crate::error::RequestResult;

/// Port for the trade manager that owns offer lifecycle
///
/// Removal is confirmed asynchronously through an offer-removed event on
/// the feed; the order book never drops the offer on its own.
pub trait TradeManager: Send + Sync {
    fn request_remove_offer(&self, offer: &Offer) -> RequestResult<()>;
}
