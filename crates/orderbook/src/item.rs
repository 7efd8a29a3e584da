use offerbook_core::Offer;
use std::sync::Arc;

/// One entry of the order book: a shared, immutable offer
///
/// Identity for the book is the offer id. The store also stamps every item
/// with a sequence number so that duplicates of the same offer stay
/// distinguishable inside the projections.
#[derive(Debug, Clone)]
pub struct OrderBookItem {
    seq: u64,
    offer: Arc<Offer>,
}

impl OrderBookItem {
    pub(crate) fn new(seq: u64, offer: Offer) -> Self {
        Self {
            seq,
            offer: Arc::new(offer),
        }
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    /// Offer id of the wrapped offer
    pub fn id(&self) -> &str {
        &self.offer.id
    }

    /// Store-assigned sequence number, unique per store
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl PartialEq for OrderBookItem {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for OrderBookItem {}
