//! Offer Generator - Simulated offers from remote peers
//!
//! Produces plausible offers around a base price per currency, drawing
//! countries, languages and arbitrators from configured pools. Seeded
//! generators are fully reproducible.

use chrono::{Duration, Utc};
use offerbook_core::{Arbitrator, Country, Direction, Offer};
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base price for one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    pub currency: String,
    pub base_price: Decimal,
}

impl CurrencyQuote {
    pub fn new(currency: impl Into<String>, base_price: Decimal) -> Self {
        Self {
            currency: currency.into(),
            base_price,
        }
    }
}

/// Configuration for offer generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Currencies offers are quoted in, with their base price
    pub currencies: Vec<CurrencyQuote>,
    /// Country codes of offerer bank accounts
    pub countries: Vec<String>,
    /// Language tags offerers speak
    pub languages: Vec<String>,
    /// Arbitrator ids offerers accept
    pub arbitrators: Vec<String>,
    /// Max relative distance from the base price (0.05 = 5%)
    pub price_spread: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            currencies: vec![
                CurrencyQuote::new("EUR", dec!(410)),
                CurrencyQuote::new("USD", dec!(450)),
            ],
            countries: vec!["DE".into(), "AT".into(), "FR".into(), "US".into()],
            languages: vec!["de-DE".into(), "de-AT".into(), "en-US".into(), "fr".into()],
            arbitrators: vec!["arb-1".into(), "arb-2".into(), "arb-3".into()],
            price_spread: dec!(0.05),
            min_amount: dec!(0.1),
            max_amount: dec!(5),
        }
    }
}

/// Generates simulated offers
pub struct OfferGenerator {
    config: GeneratorConfig,
    /// Offers generated so far, used for ids
    generated: u64,
    /// Random generator seed for reproducibility
    rng: rand::rngs::StdRng,
}

impl OfferGenerator {
    /// Create a new generator seeded from entropy
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            generated: 0,
            rng: rand::SeedableRng::from_entropy(),
        }
    }

    /// Create with a specific seed for reproducible simulations
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            generated: 0,
            rng: rand::SeedableRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Generate the next offer
    pub fn next_offer(&mut self) -> Offer {
        self.generated += 1;

        let quote = self
            .config
            .currencies
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| CurrencyQuote::new("EUR", dec!(100)));
        let direction = if self.rng.gen_bool(0.5) {
            Direction::Buy
        } else {
            Direction::Sell
        };

        let price = self.random_price(quote.base_price);
        let amount = self.random_amount();
        let country = self
            .config
            .countries
            .choose(&mut self.rng)
            .map(|code| Country::from_code(code.as_str()))
            .unwrap_or_else(|| Country::from_code("DE"));

        let languages = pick_some(&mut self.rng, &self.config.languages);
        let arbitrators: Vec<Arbitrator> = pick_some(&mut self.rng, &self.config.arbitrators)
            .into_iter()
            .map(|id| {
                let name = format!("Arbitrator {}", id);
                Arbitrator::new(id, name)
            })
            .collect();

        let bank_account = Uuid::from_u128(self.rng.r#gen());
        let age = Duration::seconds(self.rng.gen_range(0..3600));

        Offer::new(
            format!("offer-{:05}", self.generated),
            direction,
            amount,
            price,
            quote.currency,
            country,
        )
        .with_languages(languages)
        .with_arbitrators(arbitrators)
        .with_bank_account(bank_account.to_string())
        .with_created_at(Utc::now() - age)
    }

    /// Generate `count` offers
    pub fn generate(&mut self, count: usize) -> Vec<Offer> {
        (0..count).map(|_| self.next_offer()).collect()
    }

    /// Base price moved by up to `price_spread` in either direction, in cents
    fn random_price(&mut self, base: Decimal) -> Decimal {
        let spread = self.config.price_spread.to_f64().unwrap_or(0.05);
        let change_pct: f64 = self.rng.gen_range(-1.0..1.0);
        let multiplier = Decimal::from_f64_retain(1.0 + spread * change_pct).unwrap_or(Decimal::ONE);
        (base * multiplier).round_dp(2)
    }

    fn random_amount(&mut self) -> Decimal {
        let min = self.config.min_amount.to_f64().unwrap_or(0.1);
        let max = self.config.max_amount.to_f64().unwrap_or(min);
        let amount = if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        };
        Decimal::from_f64_retain(amount)
            .unwrap_or(self.config.min_amount)
            .round_dp(4)
    }
}

/// One or two distinct entries from `pool`
fn pick_some(rng: &mut impl Rng, pool: &[String]) -> Vec<String> {
    let count = rng.gen_range(1..=2).min(pool.len());
    pool.choose_multiple(rng, count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_reproducible() {
        let mut a = OfferGenerator::with_seed(GeneratorConfig::default(), 42);
        let mut b = OfferGenerator::with_seed(GeneratorConfig::default(), 42);

        for _ in 0..20 {
            let (x, y) = (a.next_offer(), b.next_offer());
            assert_eq!(x.id, y.id);
            assert_eq!(x.price, y.price);
            assert_eq!(x.amount, y.amount);
            assert_eq!(x.currency, y.currency);
            assert_eq!(x.accepted_languages, y.accepted_languages);
            assert_eq!(x.bank_account_id, y.bank_account_id);
        }
    }

    #[test]
    fn test_offers_stay_within_bounds() {
        let config = GeneratorConfig::default();
        let mut generator = OfferGenerator::with_seed(config.clone(), 7);

        for offer in generator.generate(200) {
            let quote = config
                .currencies
                .iter()
                .find(|q| q.currency == offer.currency)
                .unwrap();
            let low = quote.base_price * (Decimal::ONE - config.price_spread) - dec!(0.01);
            let high = quote.base_price * (Decimal::ONE + config.price_spread) + dec!(0.01);
            assert!(offer.price >= low && offer.price <= high, "price {}", offer.price);
            assert!(offer.amount >= config.min_amount && offer.amount <= config.max_amount);
            assert!(!offer.accepted_languages.is_empty());
            assert!(!offer.arbitrators.is_empty());
        }
        assert_eq!(generator.generated(), 200);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut generator = OfferGenerator::with_seed(GeneratorConfig::default(), 1);
        let offers = generator.generate(50);
        let mut ids: Vec<&str> = offers.iter().map(|o| o.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
