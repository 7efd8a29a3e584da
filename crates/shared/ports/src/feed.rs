use crate::error::RequestResult;

/// Port for requesting offers from the P2P network
///
/// Requests are fire-and-forget: the result arrives later as an
/// offers-received event on the feed.
pub trait OfferRequester: Send + Sync {
    /// Ask the network for all offers quoted in `currency_code`
    fn request_offers(&self, currency_code: &str) -> RequestResult<()>;

    /// Requester name for logging
    fn name(&self) -> &str {
        "OfferRequester"
    }
}
