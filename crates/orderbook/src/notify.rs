//! View change notifications
//!
//! Each projection keeps its own listener list. Listeners run synchronously
//! while the order book is being mutated, so they must not call back into
//! the controller.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::item::OrderBookItem;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `subscribe`, used to unsubscribe
///
/// Unique across all listener lists in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// What changed in a projection after a recompute
#[derive(Debug, Clone)]
pub struct ViewChange {
    /// Monotonic per-projection version
    pub version: u64,
    /// Items that entered the view
    pub added: Vec<OrderBookItem>,
    /// Items that left the view
    pub removed: Vec<OrderBookItem>,
    /// Surviving items changed relative order
    pub reordered: bool,
    /// Full view contents after the change
    pub items: Vec<OrderBookItem>,
}

impl ViewChange {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

type Listener<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Registered callbacks for one event type
pub struct Listeners<E> {
    entries: Vec<(ListenerId, Listener<E>)>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        before != self.entries.len()
    }

    pub fn notify(&self, event: &E) {
        for (_, listener) in &self.entries {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_subscribe_notify_unsubscribe() {
        let mut listeners = Listeners::<u32>::new();
        let total = Arc::new(AtomicUsize::new(0));

        let sink = total.clone();
        let id = listeners.subscribe(move |v: &u32| {
            sink.fetch_add(*v as usize, Ordering::SeqCst);
        });

        listeners.notify(&3);
        listeners.notify(&4);
        assert_eq!(total.load(Ordering::SeqCst), 7);

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.notify(&100);
        assert_eq!(total.load(Ordering::SeqCst), 7);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_ids_unique_across_lists() {
        let mut a = Listeners::<u32>::new();
        let mut b = Listeners::<u32>::new();
        let id_a = a.subscribe(|_| {});
        let id_b = b.subscribe(|_| {});

        assert_ne!(id_a, id_b);
        assert!(!b.unsubscribe(id_a));
        assert_eq!(b.len(), 1);
    }
}
