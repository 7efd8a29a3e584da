use offerbook_core::Offer;

use crate::error::DecodeResult;

/// Opaque offer payload as delivered by the network feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferPayload(pub Vec<u8>);

impl OfferPayload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Port for turning feed payloads into offers
///
/// The serialization format belongs to the transport; the order book only
/// needs to know whether a payload is a valid offer.
pub trait OfferDecoder: Send + Sync {
    fn decode(&self, payload: &OfferPayload) -> DecodeResult<Offer>;
}
