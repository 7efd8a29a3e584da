//! Simulation - Order book view against an in-memory offer network
//!
//! Ties together all components:
//! - In-memory offer network serving feed requests
//! - Offer generator publishing remote offers
//! - Order book controller filtering and sorting them for a local user
//! - Removal requests routed back through the network

use crate::offer_generator::{GeneratorConfig, OfferGenerator};
use log::{debug, info, warn};
use offerbook_core::{
    Arbitrator, BankAccount, Country, Direction, Offer, OrderBookFilter, UserContext,
};
use offerbook_gateway::{FeedRequestSender, GatewayError, InMemoryOfferNetwork, OfferCodec};
use offerbook_orderbook::{ConfigError, OrderBookConfig, OrderBookController, OrderBookError};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Order book error: {0}")]
    OrderBook(#[from] OrderBookError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// The local user whose view is simulated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub holder_name: String,
    /// Currency of the selected bank account
    pub currency: String,
    /// Country of the selected bank account
    pub country: String,
    pub accepted_countries: Vec<String>,
    pub accepted_languages: Vec<String>,
    pub accepted_arbitrators: Vec<String>,
    /// Side the user wants to trade
    pub direction: Direction,
    /// Price bound of the filter
    pub price: Option<Decimal>,
    /// Minimum amount of the filter
    pub amount: Option<Decimal>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            holder_name: "Local User".to_string(),
            currency: "EUR".to_string(),
            country: "DE".to_string(),
            accepted_countries: vec!["DE".into(), "AT".into()],
            accepted_languages: vec!["de".into(), "en".into()],
            accepted_arbitrators: vec!["arb-1".into(), "arb-2".into()],
            direction: Direction::Buy,
            price: None,
            amount: None,
        }
    }
}

impl UserProfile {
    pub fn context(&self) -> UserContext {
        let account = BankAccount::new(
            "local-account",
            self.currency.as_str(),
            Country::from_code(self.country.as_str()),
            self.holder_name.as_str(),
        );
        UserContext::new(Some(account))
            .with_countries(
                self.accepted_countries
                    .iter()
                    .map(|code| Country::from_code(code.as_str())),
            )
            .with_languages(self.accepted_languages.iter().map(String::as_str))
            .with_arbitrators(
                self.accepted_arbitrators
                    .iter()
                    .map(|id| Arbitrator::new(id.as_str(), id.as_str())),
            )
    }

    pub fn filter(&self) -> OrderBookFilter {
        let mut filter = OrderBookFilter::new(self.direction);
        if let Some(price) = self.price {
            filter = filter.with_price(price);
        }
        if let Some(amount) = self.amount {
            filter = filter.with_amount(amount);
        }
        filter
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Order book configuration
    pub orderbook: OrderBookConfig,
    /// Offer generator configuration
    pub generator: GeneratorConfig,
    /// Local user settings
    pub user: UserProfile,
    /// Offers published by remote peers
    pub offer_count: usize,
    /// Seed for reproducible runs; entropy if absent
    pub seed: Option<u64>,
    /// Delay between published offers (ms)
    pub event_interval_ms: u64,
    /// Probability of withdrawing an earlier offer after each publish
    pub removal_probability: f64,
    /// Max time to wait for the final refresh to land (ms)
    pub settle_timeout_ms: u64,
    /// Number of offers listed in the results
    pub top_n: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            orderbook: OrderBookConfig::default(),
            generator: GeneratorConfig::default(),
            user: UserProfile::default(),
            offer_count: 50,
            seed: None,
            event_interval_ms: 10,
            removal_probability: 0.1,
            settle_timeout_ms: 2000,
            top_n: 10,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// One row of the final sorted view
#[derive(Debug, Clone, PartialEq)]
pub struct OfferSummary {
    pub id: String,
    pub direction: Direction,
    pub price: Decimal,
    pub amount: Decimal,
    pub currency: String,
    pub country: String,
}

impl From<&Offer> for OfferSummary {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id.clone(),
            direction: offer.direction,
            price: offer.price,
            amount: offer.amount,
            currency: offer.currency.clone(),
            country: offer.bank_account_country.code.clone(),
        }
    }
}

/// Simulation results
#[derive(Debug, Clone, Default)]
pub struct SimulationResults {
    /// Offers published by remote peers
    pub published: u64,
    /// Removal requests sent through the trade manager
    pub removal_requests: u64,
    /// Offers left on the network in the user's currency
    pub network_offers: usize,
    /// Items in the order book store at the end
    pub store_count: usize,
    /// Items in the sorted view at the end
    pub visible_count: usize,
    /// Sorted view change notifications received
    pub view_changes: u64,
    /// First `top_n` entries of the sorted view
    pub top_offers: Vec<OfferSummary>,
    /// Whether the final refresh landed before the timeout
    pub success: bool,
}

/// Order book view simulation
pub struct OrderBookSimulation {
    config: SimulationConfig,
    network: Arc<InMemoryOfferNetwork>,
    controller: OrderBookController,
    requests: Option<tokio::sync::mpsc::Receiver<offerbook_gateway::FeedRequest>>,
    generator: OfferGenerator,
    /// Drives removal decisions
    rng: rand::rngs::StdRng,
}

impl OrderBookSimulation {
    /// Create a new simulation with default configuration
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Create a new simulation with custom configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        let buffer = config.orderbook.feed_buffer.max(1);
        let network = Arc::new(InMemoryOfferNetwork::new(buffer));
        let (sender, requests) = FeedRequestSender::channel(buffer);
        let sender = Arc::new(sender);

        let controller = OrderBookController::new(
            sender.clone(),
            sender,
            Arc::new(OfferCodec::new()),
            config.orderbook.clone(),
        );

        let (generator, rng): (OfferGenerator, rand::rngs::StdRng) = match config.seed {
            Some(seed) => (
                OfferGenerator::with_seed(config.generator.clone(), seed),
                rand::SeedableRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (
                OfferGenerator::new(config.generator.clone()),
                rand::SeedableRng::from_entropy(),
            ),
        };

        Self {
            config,
            network,
            controller,
            requests: Some(requests),
            generator,
            rng,
        }
    }

    pub fn controller(&self) -> &OrderBookController {
        &self.controller
    }

    pub fn network(&self) -> &Arc<InMemoryOfferNetwork> {
        &self.network
    }

    /// Run the full simulation
    pub async fn run(mut self) -> Result<SimulationResults, SimulationError> {
        info!("Starting offer book simulation...");

        let mut results = SimulationResults::default();
        let view_changes = Arc::new(AtomicU64::new(0));

        // Spawn network request server
        let server_handle = self
            .requests
            .take()
            .map(|requests| tokio::spawn(self.network.clone().serve(requests)));

        // Wire the local user's view
        self.controller.set_user_context(self.config.user.context());
        self.controller.apply_filter(Some(self.config.user.filter()));
        let counter = view_changes.clone();
        self.controller.subscribe(move |change| {
            debug!(
                "Sorted view v{}: {} offers (+{} -{})",
                change.version,
                change.len(),
                change.added.len(),
                change.removed.len()
            );
            counter.fetch_add(1, Ordering::Relaxed);
        });
        self.controller.init(self.network.subscribe())?;
        self.controller.load_offers()?;

        // Remote peers publish and withdraw offers
        let interval = Duration::from_millis(self.config.event_interval_ms);
        let removal_probability = match self.config.removal_probability {
            p if (0.0..=1.0).contains(&p) => p,
            p => {
                warn!("Ignoring removal probability {} outside [0, 1]", p);
                0.0
            }
        };
        let mut published: Vec<Offer> = Vec::new();
        for _ in 0..self.config.offer_count {
            let offer = self.generator.next_offer();
            self.network.publish_offer(offer.clone()).await?;
            published.push(offer);
            results.published += 1;

            if self.rng.gen_bool(removal_probability) {
                let index = self.rng.gen_range(0..published.len());
                let offer = published.swap_remove(index);
                match self.controller.remove_offer(&offer) {
                    Ok(()) => results.removal_requests += 1,
                    Err(e) => warn!("Could not withdraw offer {}: {}", offer.id, e),
                }
            }

            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }

        // Full refresh, then wait for it to land
        let currency = self.controller.load_offers()?;
        results.network_offers = self.network.offers_for(&currency).len();
        results.success = self.wait_for_refresh(&currency).await;
        if !results.success {
            warn!("Order book did not settle within {}ms", self.config.settle_timeout_ms);
        }

        results.store_count = self.controller.offer_count();
        let sorted = self.controller.sorted_offers();
        results.visible_count = sorted.len();
        results.top_offers = sorted
            .iter()
            .take(self.config.top_n)
            .map(|item| OfferSummary::from(item.offer()))
            .collect();

        // Shutdown
        self.controller.cleanup();
        if let Some(handle) = server_handle {
            handle.abort();
        }
        results.view_changes = view_changes.load(Ordering::Relaxed);

        info!(
            "Simulation finished: {} published, {} withdrawn, {} of {} offers visible",
            results.published, results.removal_requests, results.visible_count, results.store_count
        );

        Ok(results)
    }

    /// Poll until the store mirrors the network's offers for `currency`
    async fn wait_for_refresh(&self, currency: &str) -> bool {
        let deadline = tokio::time::Instant::now()
            + Duration::from_millis(self.config.settle_timeout_ms);
        loop {
            let expected = self.network.offers_for(currency);
            let items = self.controller.all_offers();
            let settled = items.len() == expected.len()
                && items
                    .iter()
                    .zip(&expected)
                    .all(|(item, offer)| item.id() == offer.id);
            if settled {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

impl Default for OrderBookSimulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_builds_matching_context() {
        let profile = UserProfile::default();
        let context = profile.context();
        assert_eq!(context.currency(), Some("EUR"));
        assert_eq!(context.accepted_countries.len(), 2);
        assert_eq!(profile.filter().direction, Some(Direction::Buy));
    }

    #[test]
    fn test_partial_config_json() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"offer_count": 5, "seed": 9, "user": {"currency": "USD"}}"#)
                .unwrap();
        assert_eq!(config.offer_count, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.user.currency, "USD");
        assert_eq!(config.user.country, "DE");
        assert_eq!(config.orderbook.default_currency, "EUR");
    }

    #[tokio::test]
    async fn test_simulation_short_run() {
        let config = SimulationConfig {
            offer_count: 10,
            seed: Some(3),
            event_interval_ms: 0,
            ..Default::default()
        };

        let results = OrderBookSimulation::with_config(config).run().await.unwrap();

        assert!(results.success);
        assert_eq!(results.published, 10);
        assert_eq!(results.store_count, results.network_offers);
        assert!(results.visible_count <= results.store_count);
    }
}
