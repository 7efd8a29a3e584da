//! Offer payload codec
//!
//! Network records are bincode-encoded `StoredValue` envelopes. Only the
//! `Offer` variant decodes to an offer; anything else is a typed miss.

use offerbook_core::Offer;
use offerbook_ports::{DecodeError, DecodeResult, OfferDecoder, OfferPayload};
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Value stored under a key in the offer network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    Offer(Offer),
    /// Any other record type sharing the key space
    Other { kind: String, bytes: Vec<u8> },
}

/// Bincode codec for offer payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferCodec;

impl OfferCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode an offer into a feed payload
    pub fn encode(&self, offer: &Offer) -> Result<OfferPayload, GatewayError> {
        self.encode_value(&StoredValue::Offer(offer.clone()))
    }

    /// Encode an arbitrary stored value
    pub fn encode_value(&self, value: &StoredValue) -> Result<OfferPayload, GatewayError> {
        Ok(OfferPayload::new(bincode::serialize(value)?))
    }
}

impl OfferDecoder for OfferCodec {
    fn decode(&self, payload: &OfferPayload) -> DecodeResult<Offer> {
        if payload.is_empty() {
            return Err(DecodeError::Empty);
        }

        match bincode::deserialize::<StoredValue>(payload.as_bytes()) {
            Ok(StoredValue::Offer(offer)) => Ok(offer),
            Ok(StoredValue::Other { kind, .. }) => Err(DecodeError::WrongType(kind)),
            Err(e) => Err(DecodeError::Malformed(e.to_string())),
        }
    }
}
