//! Live projections over the offer store
//!
//! `FilteredProjection` holds exactly the store items accepted by the
//! matcher; `SortedProjection` holds the same items in a total order.
//! Both are rebuilt eagerly and report what changed to their listeners.

use log::trace;
use offerbook_core::{OrderBookFilter, UserContext};
use std::collections::HashSet;

use crate::item::OrderBookItem;
use crate::matcher::OfferMatcher;
use crate::notify::{ListenerId, Listeners, ViewChange};
use crate::ordering::OfferOrdering;
use crate::store::OfferStore;

/// Store items matching the active filter and user context, in store order
#[derive(Debug, Default)]
pub struct FilteredProjection {
    items: Vec<OrderBookItem>,
    version: u64,
    listeners: Listeners<ViewChange>,
}

impl FilteredProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-evaluate every store item
    ///
    /// Always a full pass: a new filter or context can both widen and narrow
    /// the result. Returns the change, or `None` if membership is unchanged.
    pub fn recompute(
        &mut self,
        store: &OfferStore,
        filter: Option<&OrderBookFilter>,
        context: &UserContext,
    ) -> Option<ViewChange> {
        let next: Vec<OrderBookItem> = store
            .iter()
            .filter(|item| match OfferMatcher::evaluate(item.offer(), filter, context) {
                Ok(()) => true,
                Err(mismatch) => {
                    trace!("Offer {} filtered out: {}", item.id(), mismatch);
                    false
                }
            })
            .cloned()
            .collect();

        let (added, removed) = membership_diff(&self.items, &next);
        if added.is_empty() && removed.is_empty() && same_sequence(&self.items, &next) {
            return None;
        }

        self.items = next;
        self.version += 1;
        let change = ViewChange {
            version: self.version,
            added,
            removed,
            reordered: false,
            items: self.items.clone(),
        };
        self.listeners.notify(&change);
        Some(change)
    }

    pub fn items(&self) -> &[OrderBookItem] {
        &self.items
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ViewChange) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// The filtered items in `OfferOrdering` order
#[derive(Debug, Default)]
pub struct SortedProjection {
    items: Vec<OrderBookItem>,
    ordering: OfferOrdering,
    version: u64,
    listeners: Listeners<ViewChange>,
}

impl SortedProjection {
    pub fn new(ordering: OfferOrdering) -> Self {
        Self {
            ordering,
            ..Default::default()
        }
    }

    /// Rebuild from the filtered items
    ///
    /// The order only moves when the filtered set or the ordering changes.
    pub fn rebuild(&mut self, filtered: &[OrderBookItem]) -> Option<ViewChange> {
        let mut next = filtered.to_vec();
        let ordering = self.ordering;
        next.sort_by(|a, b| ordering.compare(a, b));

        let (added, removed) = membership_diff(&self.items, &next);
        let reordered = survivors_reordered(&self.items, &next);
        if added.is_empty() && removed.is_empty() && !reordered {
            return None;
        }

        self.items = next;
        self.version += 1;
        let change = ViewChange {
            version: self.version,
            added,
            removed,
            reordered,
            items: self.items.clone(),
        };
        self.listeners.notify(&change);
        Some(change)
    }

    /// Switch comparator and re-sort the current items
    pub fn set_ordering(&mut self, ordering: OfferOrdering) -> Option<ViewChange> {
        if ordering == self.ordering {
            return None;
        }
        self.ordering = ordering;
        let current = self.items.clone();
        self.rebuild(&current)
    }

    pub fn ordering(&self) -> OfferOrdering {
        self.ordering
    }

    pub fn items(&self) -> &[OrderBookItem] {
        &self.items
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ViewChange) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// Items entering and leaving the view, keyed by store sequence number
fn membership_diff(
    old: &[OrderBookItem],
    new: &[OrderBookItem],
) -> (Vec<OrderBookItem>, Vec<OrderBookItem>) {
    let old_seqs: HashSet<u64> = old.iter().map(OrderBookItem::seq).collect();
    let new_seqs: HashSet<u64> = new.iter().map(OrderBookItem::seq).collect();

    let added = new
        .iter()
        .filter(|item| !old_seqs.contains(&item.seq()))
        .cloned()
        .collect();
    let removed = old
        .iter()
        .filter(|item| !new_seqs.contains(&item.seq()))
        .cloned()
        .collect();
    (added, removed)
}

fn same_sequence(old: &[OrderBookItem], new: &[OrderBookItem]) -> bool {
    old.len() == new.len() && old.iter().zip(new).all(|(a, b)| a.seq() == b.seq())
}

/// True if items present in both lists appear in a different relative order
fn survivors_reordered(old: &[OrderBookItem], new: &[OrderBookItem]) -> bool {
    let old_seqs: HashSet<u64> = old.iter().map(OrderBookItem::seq).collect();
    let new_seqs: HashSet<u64> = new.iter().map(OrderBookItem::seq).collect();

    let old_survivors = old.iter().map(OrderBookItem::seq).filter(|s| new_seqs.contains(s));
    let new_survivors = new.iter().map(OrderBookItem::seq).filter(|s| old_seqs.contains(s));
    !old_survivors.eq(new_survivors)
}
