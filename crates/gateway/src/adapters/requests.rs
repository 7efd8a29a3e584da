//! Channel-backed request sender
//!
//! Implements both outbound ports (`OfferRequester`, `TradeManager`) by
//! queueing `FeedRequest`s for whatever serves the network side.

use crate::messages::FeedRequest;
use log::debug;
use offerbook_core::Offer;
use offerbook_ports::{OfferRequester, RequestError, RequestResult, TradeManager};
use tokio::sync::mpsc;

/// Sends feed requests over a bounded mpsc channel without blocking
#[derive(Debug, Clone)]
pub struct FeedRequestSender {
    tx: mpsc::Sender<FeedRequest>,
}

impl FeedRequestSender {
    pub fn new(tx: mpsc::Sender<FeedRequest>) -> Self {
        Self { tx }
    }

    /// Create a sender and the receiving end for the network side
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<FeedRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    fn send(&self, request: FeedRequest) -> RequestResult<()> {
        self.tx.try_send(request).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                RequestError::Rejected("request queue full".to_string())
            }
            mpsc::error::TrySendError::Closed(_) => RequestError::ChannelClosed,
        })
    }
}

impl OfferRequester for FeedRequestSender {
    fn request_offers(&self, currency_code: &str) -> RequestResult<()> {
        debug!("Requesting offers for {}", currency_code);
        self.send(FeedRequest::Offers {
            currency: currency_code.to_string(),
        })
    }

    fn name(&self) -> &str {
        "FeedRequestSender"
    }
}

impl TradeManager for FeedRequestSender {
    fn request_remove_offer(&self, offer: &Offer) -> RequestResult<()> {
        debug!("Requesting removal of offer {}", offer.id);
        self.send(FeedRequest::RemoveOffer {
            offer: offer.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerbook_core::{Country, Direction};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_requests_are_queued() {
        let (sender, mut rx) = FeedRequestSender::channel(4);

        sender.request_offers("USD").unwrap();
        let offer = Offer::new("o-1", Direction::Buy, dec!(1), dec!(10), "USD", Country::from_code("US"));
        sender.request_remove_offer(&offer).unwrap();

        assert_eq!(
            rx.recv().await,
            Some(FeedRequest::Offers {
                currency: "USD".to_string()
            })
        );
        assert_eq!(rx.recv().await, Some(FeedRequest::RemoveOffer { offer }));
    }

    #[test]
    fn test_full_queue_rejects() {
        let (sender, _rx) = FeedRequestSender::channel(1);

        sender.request_offers("USD").unwrap();
        assert!(matches!(
            sender.request_offers("USD"),
            Err(RequestError::Rejected(_))
        ));
    }

    #[test]
    fn test_closed_channel() {
        let (sender, rx) = FeedRequestSender::channel(1);
        drop(rx);

        assert_eq!(sender.request_offers("EUR"), Err(RequestError::ChannelClosed));
    }
}
