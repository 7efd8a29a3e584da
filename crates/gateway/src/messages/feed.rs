//! Feed message types

use offerbook_core::{CurrencyCode, Offer};
use offerbook_ports::OfferPayload;

/// Inbound event from the P2P network
///
/// Every variant carries the success flag reported by the network layer.
/// Payloads stay undecoded until the order book consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A single offer was published
    OfferAdded { payload: OfferPayload, success: bool },
    /// Answer to an offers request; `batch` is absent when the lookup failed
    OffersReceived {
        batch: Option<Vec<OfferPayload>>,
        success: bool,
    },
    /// An offer was withdrawn from the network
    OfferRemoved {
        payload: Option<OfferPayload>,
        success: bool,
    },
}

impl FeedEvent {
    pub fn offer_added(payload: OfferPayload) -> Self {
        Self::OfferAdded {
            payload,
            success: true,
        }
    }

    pub fn offers_received(batch: Vec<OfferPayload>) -> Self {
        Self::OffersReceived {
            batch: Some(batch),
            success: true,
        }
    }

    /// Failed lookup: no batch, success = false
    pub fn offers_failed() -> Self {
        Self::OffersReceived {
            batch: None,
            success: false,
        }
    }

    pub fn offer_removed(payload: OfferPayload) -> Self {
        Self::OfferRemoved {
            payload: Some(payload),
            success: true,
        }
    }

    pub fn removal_failed(payload: Option<OfferPayload>) -> Self {
        Self::OfferRemoved {
            payload,
            success: false,
        }
    }

    /// Event name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            FeedEvent::OfferAdded { .. } => "offer_added",
            FeedEvent::OffersReceived { .. } => "offers_received",
            FeedEvent::OfferRemoved { .. } => "offer_removed",
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            FeedEvent::OfferAdded { success, .. }
            | FeedEvent::OffersReceived { success, .. }
            | FeedEvent::OfferRemoved { success, .. } => *success,
        }
    }
}

/// Outbound request to the P2P network
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRequest {
    /// Fetch every offer quoted in `currency`
    Offers { currency: CurrencyCode },
    /// Withdraw an offer (issued by the trade manager)
    RemoveOffer { offer: Offer },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_success_flag() {
        let added = FeedEvent::offer_added(OfferPayload::new(vec![1, 2, 3]));
        assert!(added.is_success());
        assert_eq!(added.kind(), "offer_added");

        let failed = FeedEvent::offers_failed();
        assert!(!failed.is_success());
        assert_eq!(
            failed,
            FeedEvent::OffersReceived {
                batch: None,
                success: false
            }
        );

        let removal = FeedEvent::removal_failed(None);
        assert!(!removal.is_success());
        assert_eq!(removal.kind(), "offer_removed");
    }
}
