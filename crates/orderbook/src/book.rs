//! Order book state
//!
//! Owns the store, the active filter and user context, and both projections.
//! Every mutation ends with a refresh, so the projections are never stale
//! when the caller regains control.

use log::debug;
use offerbook_core::{BankAccount, Offer, OrderBookFilter, UserContext};

use crate::item::OrderBookItem;
use crate::notify::{ListenerId, ViewChange};
use crate::ordering::OfferOrdering;
use crate::projection::{FilteredProjection, SortedProjection};
use crate::store::OfferStore;

#[derive(Debug)]
pub struct OrderBook {
    store: OfferStore,
    filter: Option<OrderBookFilter>,
    context: UserContext,
    filtered: FilteredProjection,
    sorted: SortedProjection,
}

impl OrderBook {
    pub fn new(ordering: OfferOrdering) -> Self {
        Self {
            store: OfferStore::new(),
            filter: None,
            context: UserContext::default(),
            filtered: FilteredProjection::new(),
            sorted: SortedProjection::new(ordering),
        }
    }

    // === Store mutations ===

    pub fn add_offer(&mut self, offer: Offer) -> OrderBookItem {
        let item = self.store.add(offer);
        self.refresh();
        item
    }

    /// Replace the whole store; readers see either the old or the new set
    pub fn replace_offers(&mut self, offers: impl IntoIterator<Item = Offer>) -> usize {
        let count = self.store.replace_all(offers);
        self.refresh();
        count
    }

    pub fn remove_offer(&mut self, id: &str) -> usize {
        let removed = self.store.remove_by_id(id);
        if removed > 0 {
            self.refresh();
        }
        removed
    }

    // === Filter and context ===

    pub fn apply_filter(&mut self, filter: Option<OrderBookFilter>) {
        self.filter = filter;
        self.refresh();
    }

    pub fn set_context(&mut self, context: UserContext) {
        self.context = context;
        self.refresh();
    }

    pub fn set_current_bank_account(&mut self, account: Option<BankAccount>) {
        self.context.current_bank_account = account;
        self.refresh();
    }

    pub fn set_ordering(&mut self, ordering: OfferOrdering) {
        if self.sorted.set_ordering(ordering).is_some() {
            debug!("Sorted view reordered by {}", ordering.as_str());
        }
    }

    // === Read access ===

    pub fn store(&self) -> &OfferStore {
        &self.store
    }

    pub fn filter(&self) -> Option<&OrderBookFilter> {
        self.filter.as_ref()
    }

    pub fn context(&self) -> &UserContext {
        &self.context
    }

    pub fn filtered(&self) -> &FilteredProjection {
        &self.filtered
    }

    pub fn sorted(&self) -> &SortedProjection {
        &self.sorted
    }

    // === Listeners ===

    pub fn on_filtered_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ViewChange) + Send + Sync + 'static,
    {
        self.filtered.subscribe(listener)
    }

    pub fn on_sorted_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ViewChange) + Send + Sync + 'static,
    {
        self.sorted.subscribe(listener)
    }

    /// Remove a listener from whichever projection holds it
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.sorted.unsubscribe(id) || self.filtered.unsubscribe(id)
    }

    fn refresh(&mut self) {
        if let Some(change) =
            self.filtered
                .recompute(&self.store, self.filter.as_ref(), &self.context)
        {
            debug!(
                "Filtered view v{}: +{} -{} ({} of {} offers)",
                change.version,
                change.added.len(),
                change.removed.len(),
                change.len(),
                self.store.len()
            );
            self.sorted.rebuild(self.filtered.items());
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new(OfferOrdering::default())
    }
}
