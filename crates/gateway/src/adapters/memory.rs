//! In-memory offer network
//!
//! Stands in for the P2P offer store. Keeps every published offer, answers
//! feed requests, and broadcasts the resulting events to all subscribers.

use crate::codec::OfferCodec;
use crate::error::{GatewayError, TransportError};
use crate::messages::{FeedEvent, FeedRequest};
use crate::transport::{
    Publisher,
    channel::{ChannelPublisher, ChannelSubscriber},
};
use log::{debug, info, trace, warn};
use offerbook_core::Offer;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Single-process offer network
pub struct InMemoryOfferNetwork {
    offers: Mutex<Vec<Offer>>,
    publisher: ChannelPublisher<FeedEvent>,
    codec: OfferCodec,
    /// When offline, lookups and removals report failure
    online: AtomicBool,
}

impl InMemoryOfferNetwork {
    /// Create an empty network with the given event buffer capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            offers: Mutex::new(Vec::new()),
            publisher: ChannelPublisher::new(capacity),
            codec: OfferCodec::new(),
            online: AtomicBool::new(true),
        }
    }

    /// Subscribe to feed events
    pub fn subscribe(&self) -> ChannelSubscriber<FeedEvent> {
        self.publisher.subscribe()
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of offers currently stored
    pub fn offer_count(&self) -> usize {
        self.offers.lock().len()
    }

    /// Stored offers quoted in `currency`
    pub fn offers_for(&self, currency: &str) -> Vec<Offer> {
        self.offers
            .lock()
            .iter()
            .filter(|offer| offer.currency == currency)
            .cloned()
            .collect()
    }

    /// Store an offer and announce it to subscribers
    pub async fn publish_offer(&self, offer: Offer) -> Result<(), GatewayError> {
        let payload = self.codec.encode(&offer)?;
        debug!("Publishing offer {} ({})", offer.id, offer.currency);
        self.offers.lock().push(offer);

        self.broadcast(FeedEvent::offer_added(payload)).await
    }

    /// Broadcast an event as-is (no storage side effects)
    pub async fn publish_event(&self, event: FeedEvent) -> Result<(), GatewayError> {
        self.broadcast(event).await
    }

    /// Answer a single request
    pub async fn handle_request(&self, request: FeedRequest) -> Result<(), GatewayError> {
        match request {
            FeedRequest::Offers { currency } => {
                if !self.is_online() {
                    warn!("Offer lookup for {} failed: network offline", currency);
                    return self.broadcast(FeedEvent::offers_failed()).await;
                }

                let batch = self
                    .offers_for(&currency)
                    .iter()
                    .map(|offer| self.codec.encode(offer))
                    .collect::<Result<Vec<_>, _>>()?;

                debug!("Answering lookup for {} with {} offers", currency, batch.len());
                self.broadcast(FeedEvent::offers_received(batch)).await
            }
            FeedRequest::RemoveOffer { offer } => {
                let payload = self.codec.encode(&offer)?;
                if !self.is_online() {
                    warn!("Removal of offer {} failed: network offline", offer.id);
                    return self
                        .broadcast(FeedEvent::removal_failed(Some(payload)))
                        .await;
                }

                self.offers.lock().retain(|stored| stored.id != offer.id);
                debug!("Offer {} removed", offer.id);
                self.broadcast(FeedEvent::offer_removed(payload)).await
            }
        }
    }

    /// Serve requests until every sender is dropped
    pub async fn serve(self: Arc<Self>, mut requests: mpsc::Receiver<FeedRequest>) {
        info!("Offer network started, listening for requests");

        while let Some(request) = requests.recv().await {
            if let Err(e) = self.handle_request(request).await {
                warn!("Failed to answer feed request: {}", e);
            }
        }

        info!("Offer network stopped");
    }

    /// Every subscriber sees every event; currency selection happens on the receiving side
    async fn broadcast(&self, event: FeedEvent) -> Result<(), GatewayError> {
        match self.publisher.publish(&event).await {
            Ok(()) => Ok(()),
            Err(TransportError::ChannelClosed) => {
                // No subscribers is ok
                trace!("No feed subscribers for {}", event.kind());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Subscriber;
    use offerbook_core::{Country, Direction};
    use offerbook_ports::OfferDecoder;
    use rust_decimal_macros::dec;

    fn offer(id: &str, currency: &str) -> Offer {
        Offer::new(id, Direction::Sell, dec!(1), dec!(100), currency, Country::from_code("US"))
    }

    #[tokio::test]
    async fn test_publish_broadcasts_offer_added() {
        let network = InMemoryOfferNetwork::new(16);
        let mut sub = network.subscribe();

        network.publish_offer(offer("a", "USD")).await.unwrap();

        match sub.next().await.unwrap() {
            FeedEvent::OfferAdded { payload, success } => {
                assert!(success);
                assert_eq!(OfferCodec::new().decode(&payload).unwrap().id, "a");
            }
            other => panic!("Unexpected event: {:?}", other),
        }
        assert_eq!(network.offer_count(), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_currency() {
        let network = InMemoryOfferNetwork::new(16);
        let mut sub = network.subscribe();

        network.publish_offer(offer("a", "USD")).await.unwrap();
        network.publish_offer(offer("b", "EUR")).await.unwrap();
        network.publish_event(FeedEvent::offers_failed()).await.unwrap();

        let codec = OfferCodec::new();
        for expected in ["a", "b"] {
            match sub.next().await.unwrap() {
                FeedEvent::OfferAdded { payload, .. } => {
                    assert_eq!(codec.decode(&payload).unwrap().id, expected);
                }
                other => panic!("Unexpected event: {:?}", other),
            }
        }
        assert_eq!(sub.next().await.unwrap(), FeedEvent::offers_failed());
    }

    #[tokio::test]
    async fn test_lookup_filters_by_currency() {
        let network = InMemoryOfferNetwork::new(16);
        network.publish_offer(offer("a", "USD")).await.unwrap();
        network.publish_offer(offer("b", "EUR")).await.unwrap();
        network.publish_offer(offer("c", "USD")).await.unwrap();

        let mut sub = network.subscribe();
        network
            .handle_request(FeedRequest::Offers {
                currency: "USD".to_string(),
            })
            .await
            .unwrap();

        match sub.next().await.unwrap() {
            FeedEvent::OffersReceived {
                batch: Some(batch),
                success: true,
            } => assert_eq!(batch.len(), 2),
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_offline_lookup_reports_failure() {
        let network = InMemoryOfferNetwork::new(16);
        network.publish_offer(offer("a", "USD")).await.unwrap();
        network.set_online(false);

        let mut sub = network.subscribe();
        network
            .handle_request(FeedRequest::Offers {
                currency: "USD".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(sub.next().await.unwrap(), FeedEvent::offers_failed());
    }

    #[tokio::test]
    async fn test_remove_drops_stored_offer() {
        let network = InMemoryOfferNetwork::new(16);
        network.publish_offer(offer("a", "USD")).await.unwrap();

        let mut sub = network.subscribe();
        network
            .handle_request(FeedRequest::RemoveOffer {
                offer: offer("a", "USD"),
            })
            .await
            .unwrap();

        assert_eq!(network.offer_count(), 0);
        assert!(matches!(
            sub.next().await.unwrap(),
            FeedEvent::OfferRemoved { success: true, .. }
        ));
    }
}
