//! Order book controller
//!
//! Wires the order book state to its collaborators: the network feed that
//! delivers `FeedEvent`s, the requester used by `load_offers`, and the trade
//! manager used by `remove_offer`. All state changes go through one write
//! lock, so readers never observe a projection mid-recompute.

use log::{debug, info, warn};
use offerbook_core::{BankAccount, CurrencyCode, Offer, OrderBookFilter, UserContext};
use offerbook_gateway::{FeedEvent, Subscriber, TransportError};
use offerbook_ports::{OfferDecoder, OfferPayload, OfferRequester, TradeManager};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;

use crate::book::OrderBook;
use crate::config::OrderBookConfig;
use crate::error::OrderBookError;
use crate::item::OrderBookItem;
use crate::notify::{ListenerId, ViewChange};
use crate::ordering::OfferOrdering;

/// Session id meaning "not subscribed"
const INACTIVE: u64 = 0;

/// Applies feed events to the shared order book
///
/// Cheap to clone; each feed task owns a copy bound to the session it was
/// started for, while the controller's own copy follows whatever session is
/// current. A bound copy goes quiet for good once its session ends, even if
/// the controller is re-initialised.
#[derive(Clone)]
pub struct FeedHandler {
    book: Arc<RwLock<OrderBook>>,
    decoder: Arc<dyn OfferDecoder>,
    session: Arc<AtomicU64>,
    bound: Option<u64>,
}

impl FeedHandler {
    fn new(
        book: Arc<RwLock<OrderBook>>,
        decoder: Arc<dyn OfferDecoder>,
        session: Arc<AtomicU64>,
    ) -> Self {
        Self {
            book,
            decoder,
            session,
            bound: None,
        }
    }

    fn bound_to(&self, session: u64) -> Self {
        Self {
            bound: Some(session),
            ..self.clone()
        }
    }

    fn accepts(&self) -> bool {
        let current = self.session.load(Ordering::SeqCst);
        current != INACTIVE && self.bound.is_none_or(|id| id == current)
    }

    pub fn handle_event(&self, event: FeedEvent) {
        match event {
            FeedEvent::OfferAdded { payload, success } => self.on_offer_added(&payload, success),
            FeedEvent::OffersReceived { batch, success } => {
                self.on_offers_received(batch.as_deref(), success)
            }
            FeedEvent::OfferRemoved { payload, success } => {
                self.on_offer_removed(payload.as_ref(), success)
            }
        }
    }

    fn on_offer_added(&self, payload: &OfferPayload, success: bool) {
        if !success {
            debug!("Ignoring unsuccessful offer_added event");
            return;
        }
        let Some(offer) = self.decode(payload, "offer_added") else {
            return;
        };
        self.with_book("offer_added", |book| {
            let item = book.add_offer(offer);
            debug!("Offer {} added (seq {})", item.id(), item.seq());
        });
    }

    fn on_offers_received(&self, batch: Option<&[OfferPayload]>, success: bool) {
        let offers: Vec<Offer> = match batch {
            Some(batch) if success => batch
                .iter()
                .filter_map(|payload| self.decode(payload, "offers_received"))
                .collect(),
            _ => {
                warn!("Offer lookup failed, clearing order book");
                Vec::new()
            }
        };
        self.with_book("offers_received", |book| {
            let count = book.replace_offers(offers);
            debug!("Order book replaced with {} offers", count);
        });
    }

    fn on_offer_removed(&self, payload: Option<&OfferPayload>, success: bool) {
        let offer = match payload {
            Some(payload) if success => self.decode(payload, "offer_removed"),
            _ => None,
        };
        let Some(offer) = offer else {
            warn!("Offer removal failed, order book left unchanged");
            return;
        };
        self.with_book("offer_removed", |book| {
            let removed = book.remove_offer(&offer.id);
            debug!("Offer {} removed ({} items)", offer.id, removed);
        });
    }

    fn decode(&self, payload: &OfferPayload, kind: &str) -> Option<Offer> {
        match self.decoder.decode(payload) {
            Ok(offer) => Some(offer),
            Err(e) => {
                warn!("Dropping undecodable {} payload: {}", kind, e);
                None
            }
        }
    }

    /// Run `f` under the write lock unless this handler's session has ended
    fn with_book(&self, kind: &str, f: impl FnOnce(&mut OrderBook)) {
        let mut book = self.book.write();
        if !self.accepts() {
            debug!("Ignoring late {} event after cleanup", kind);
            return;
        }
        f(&mut book);
    }
}

/// Issues bulk offer lookups for the currency the book currently shows
#[derive(Clone)]
struct OfferLoader {
    book: Arc<RwLock<OrderBook>>,
    requester: Arc<dyn OfferRequester>,
    default_currency: CurrencyCode,
}

impl OfferLoader {
    fn load(&self) -> Result<CurrencyCode, OrderBookError> {
        let currency = self
            .book
            .read()
            .context()
            .currency()
            .map(str::to_string)
            .unwrap_or_else(|| self.default_currency.clone());

        debug!("Loading offers for {} via {}", currency, self.requester.name());
        self.requester.request_offers(&currency).map_err(|e| {
            warn!("Offer request for {} failed: {}", currency, e);
            OrderBookError::from(e)
        })?;
        Ok(currency)
    }
}

/// Entry point of the order book view
pub struct OrderBookController {
    book: Arc<RwLock<OrderBook>>,
    handler: FeedHandler,
    loader: OfferLoader,
    trade_manager: Arc<dyn TradeManager>,
    config: OrderBookConfig,
    /// Current session id, `INACTIVE` when unsubscribed
    session: Arc<AtomicU64>,
    next_session: AtomicU64,
    feed_task: Mutex<Option<JoinHandle<()>>>,
}

impl OrderBookController {
    pub fn new(
        requester: Arc<dyn OfferRequester>,
        trade_manager: Arc<dyn TradeManager>,
        decoder: Arc<dyn OfferDecoder>,
        config: OrderBookConfig,
    ) -> Self {
        let book = Arc::new(RwLock::new(OrderBook::new(config.ordering)));
        let session = Arc::new(AtomicU64::new(INACTIVE));
        let handler = FeedHandler::new(book.clone(), decoder, session.clone());
        let loader = OfferLoader {
            book: book.clone(),
            requester,
            default_currency: config.default_currency.clone(),
        };

        Self {
            book,
            handler,
            loader,
            trade_manager,
            config,
            session,
            next_session: AtomicU64::new(INACTIVE + 1),
            feed_task: Mutex::new(None),
        }
    }

    // === Lifecycle ===

    /// Subscribe to the network feed
    ///
    /// Spawns a task on the current tokio runtime that applies events in
    /// arrival order until the feed closes or `cleanup` is called. If the
    /// subscriber falls behind and drops events, the task reloads the whole
    /// book with a fresh lookup.
    pub fn init<S>(&self, mut subscriber: S) -> Result<(), OrderBookError>
    where
        S: Subscriber<FeedEvent> + 'static,
    {
        let mut feed_task = self.feed_task.lock();
        if feed_task.as_ref().is_some_and(|task| !task.is_finished()) {
            return Err(OrderBookError::AlreadyStarted);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| OrderBookError::NoRuntime(e.to_string()))?;

        let handler = self.start_feed_handler();
        let loader = self.loader.clone();
        *feed_task = Some(runtime.spawn(async move {
            loop {
                match subscriber.next().await {
                    Ok(event) => handler.handle_event(event),
                    Err(TransportError::Lagged(skipped)) => {
                        warn!("Offer feed dropped {} events, reloading offers", skipped);
                        if let Err(e) = loader.load() {
                            warn!("Reload after lag failed: {}", e);
                        }
                    }
                    Err(e) => {
                        info!("Offer feed stopped: {}", e);
                        break;
                    }
                }
            }
        }));

        info!("Order book subscribed to offer feed");
        Ok(())
    }

    /// Accept events through `handle_event` without a feed subscription
    ///
    /// Keeps the current session if one is running.
    pub fn activate(&self) {
        let id = self.next_session.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .session
            .compare_exchange(INACTIVE, id, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// Start a new session and return a handler bound to it
    fn start_feed_handler(&self) -> FeedHandler {
        let id = self.next_session.fetch_add(1, Ordering::SeqCst);
        self.session.store(id, Ordering::SeqCst);
        debug!("Feed session {} started", id);
        self.handler.bound_to(id)
    }

    /// Unsubscribe from the feed; events delivered afterwards are ignored
    pub fn cleanup(&self) {
        self.session.store(INACTIVE, Ordering::SeqCst);
        // Wait out any event currently being applied
        drop(self.book.write());

        if let Some(task) = self.feed_task.lock().take() {
            task.abort();
        }
        info!("Order book unsubscribed from offer feed");
    }

    pub fn is_active(&self) -> bool {
        self.session.load(Ordering::SeqCst) != INACTIVE
    }

    /// Apply one feed event in the caller's context
    pub fn handle_event(&self, event: FeedEvent) {
        self.handler.handle_event(event);
    }

    // === Outbound requests ===

    /// Ask the network for offers in the current account's currency
    ///
    /// Falls back to the configured default currency when no bank account is
    /// selected. The answer arrives later as an `OffersReceived` event.
    pub fn load_offers(&self) -> Result<CurrencyCode, OrderBookError> {
        self.loader.load()
    }

    /// Ask the trade manager to withdraw `offer`
    ///
    /// The store only changes once the network confirms with `OfferRemoved`.
    pub fn remove_offer(&self, offer: &Offer) -> Result<(), OrderBookError> {
        self.trade_manager.request_remove_offer(offer).map_err(|e| {
            warn!("Removal request for offer {} failed: {}", offer.id, e);
            OrderBookError::from(e)
        })
    }

    // === Inputs ===

    pub fn apply_filter(&self, filter: Option<OrderBookFilter>) {
        self.book.write().apply_filter(filter);
    }

    pub fn set_user_context(&self, context: UserContext) {
        self.book.write().set_context(context);
    }

    pub fn set_current_bank_account(&self, account: Option<BankAccount>) {
        self.book.write().set_current_bank_account(account);
    }

    pub fn set_ordering(&self, ordering: OfferOrdering) {
        self.book.write().set_ordering(ordering);
    }

    // === Read surface ===

    /// Run `f` against one consistent snapshot of the whole book
    pub fn read<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(&self.book.read())
    }

    pub fn sorted_offers(&self) -> Vec<OrderBookItem> {
        self.book.read().sorted().items().to_vec()
    }

    pub fn filtered_offers(&self) -> Vec<OrderBookItem> {
        self.book.read().filtered().items().to_vec()
    }

    pub fn all_offers(&self) -> Vec<OrderBookItem> {
        self.book.read().store().items().to_vec()
    }

    /// Number of items in the store, matching or not
    pub fn offer_count(&self) -> usize {
        self.book.read().store().len()
    }

    pub fn active_filter(&self) -> Option<OrderBookFilter> {
        self.book.read().filter().cloned()
    }

    pub fn ordering(&self) -> OfferOrdering {
        self.book.read().sorted().ordering()
    }

    pub fn config(&self) -> &OrderBookConfig {
        &self.config
    }

    /// Listen for changes of the sorted view
    ///
    /// Listeners run under the order book lock and must not call back into
    /// the controller.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ViewChange) + Send + Sync + 'static,
    {
        self.book.write().on_sorted_change(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.book.write().unsubscribe(id)
    }
}

impl Drop for OrderBookController {
    fn drop(&mut self) {
        if let Some(task) = self.feed_task.get_mut().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerbook_core::{Arbitrator, Country, Direction};
    use offerbook_gateway::{FeedRequest, FeedRequestSender, OfferCodec};
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    fn controller() -> (OrderBookController, mpsc::Receiver<FeedRequest>) {
        let (sender, rx) = FeedRequestSender::channel(8);
        let sender = Arc::new(sender);
        let controller = OrderBookController::new(
            sender.clone(),
            sender,
            Arc::new(OfferCodec::new()),
            OrderBookConfig::default(),
        );
        (controller, rx)
    }

    fn offer(id: &str) -> Offer {
        Offer::new(id, Direction::Sell, dec!(1), dec!(100), "USD", Country::from_code("US"))
            .with_languages(["en"])
            .with_arbitrators([Arbitrator::new("X", "Xavier")])
    }

    fn added(offer: &Offer) -> FeedEvent {
        FeedEvent::offer_added(OfferCodec::new().encode(offer).unwrap())
    }

    #[test]
    fn test_inactive_controller_ignores_events() {
        let (controller, _rx) = controller();
        controller.handle_event(added(&offer("a")));
        assert_eq!(controller.offer_count(), 0);

        controller.activate();
        controller.handle_event(added(&offer("a")));
        assert_eq!(controller.offer_count(), 1);
    }

    #[test]
    fn test_load_offers_uses_default_currency() {
        let (controller, mut rx) = controller();
        assert_eq!(controller.load_offers().unwrap(), "EUR");
        assert_eq!(
            rx.try_recv().unwrap(),
            FeedRequest::Offers {
                currency: "EUR".to_string()
            }
        );
    }

    #[test]
    fn test_remove_offer_does_not_touch_store() {
        let (controller, mut rx) = controller();
        controller.activate();
        controller.handle_event(added(&offer("a")));

        controller.remove_offer(&offer("a")).unwrap();
        assert_eq!(controller.offer_count(), 1);
        assert!(matches!(rx.try_recv().unwrap(), FeedRequest::RemoveOffer { .. }));
    }

    #[test]
    fn test_closed_request_channel_is_reported() {
        let (controller, rx) = controller();
        drop(rx);
        assert!(matches!(
            controller.load_offers(),
            Err(OrderBookError::Request(_))
        ));
    }

    #[test]
    fn test_init_requires_runtime() {
        let (controller, _rx) = controller();
        let network = offerbook_gateway::InMemoryOfferNetwork::new(4);
        assert!(matches!(
            controller.init(network.subscribe()),
            Err(OrderBookError::NoRuntime(_))
        ));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_stale_session_ignored_after_restart() {
        let (controller, _rx) = controller();
        let stale = controller.start_feed_handler();
        stale.handle_event(added(&offer("a")));
        assert_eq!(controller.offer_count(), 1);

        controller.cleanup();
        let fresh = controller.start_feed_handler();
        assert!(controller.is_active());

        // Queued behind the restart: must not land in the new session
        stale.handle_event(added(&offer("b")));
        stale.handle_event(FeedEvent::offers_failed());
        assert_eq!(controller.offer_count(), 1);

        fresh.handle_event(added(&offer("c")));
        controller.handle_event(added(&offer("d")));
        let ids: Vec<String> = controller
            .all_offers()
            .iter()
            .map(|item| item.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_activate_keeps_running_session() {
        let (controller, _rx) = controller();
        let bound = controller.start_feed_handler();
        controller.activate();

        bound.handle_event(added(&offer("a")));
        assert_eq!(controller.offer_count(), 1);
    }

    #[tokio::test]
    async fn test_double_init_rejected() {
        let (controller, _rx) = controller();
        let network = offerbook_gateway::InMemoryOfferNetwork::new(4);
        controller.init(network.subscribe()).unwrap();
        assert_eq!(
            controller.init(network.subscribe()),
            Err(OrderBookError::AlreadyStarted)
        );

        controller.cleanup();
        assert!(!controller.is_active());
        controller.init(network.subscribe()).unwrap();
        assert!(controller.is_active());
    }
}
