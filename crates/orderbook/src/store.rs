//! Offer Store
//!
//! The canonical sequence of currently known offers. Only three operations
//! mutate it: `add`, `replace_all` and `remove_by_id`.

use offerbook_core::Offer;

use crate::item::OrderBookItem;

/// Insertion-ordered collection of order book items
#[derive(Debug, Clone)]
pub struct OfferStore {
    items: Vec<OrderBookItem>,
    /// Next sequence number; never reset, even across replace_all
    next_seq: u64,
}

impl OfferStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_seq: 1,
        }
    }

    /// Append an item for `offer`
    ///
    /// No duplicate check: adding the same offer id twice yields two items.
    pub fn add(&mut self, offer: Offer) -> OrderBookItem {
        let item = self.wrap(offer);
        self.items.push(item.clone());
        item
    }

    /// Replace the whole population in one step, returns the new item count
    pub fn replace_all(&mut self, offers: impl IntoIterator<Item = Offer>) -> usize {
        let items: Vec<OrderBookItem> = offers.into_iter().map(|offer| self.wrap(offer)).collect();
        self.items = items;
        self.items.len()
    }

    /// Remove every item whose offer id equals `id`, returns how many were removed
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        before - self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderBookItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[OrderBookItem] {
        &self.items
    }

    /// Number of items carrying offer `id`
    pub fn count_id(&self, id: &str) -> usize {
        self.items.iter().filter(|item| item.id() == id).count()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn wrap(&mut self, offer: Offer) -> OrderBookItem {
        let item = OrderBookItem::new(self.next_seq, offer);
        self.next_seq += 1;
        item
    }
}

impl Default for OfferStore {
    fn default() -> Self {
        Self::new()
    }
}
