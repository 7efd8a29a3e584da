//! Offer Matcher
//!
//! Decides whether an offer is visible to the local user. The predicate is
//! the conjunction of independent clauses; the first failing clause is
//! reported as a `Mismatch` for diagnostics.

use offerbook_core::{
    Arbitrator, BankAccount, Country, Direction, LanguageTag, Offer, OrderBookFilter, UserContext,
};
use thiserror::Error;

use crate::item::OrderBookItem;

/// The clause that excluded an offer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    #[error("No filter active")]
    NoFilter,

    #[error("No current bank account")]
    NoBankAccount,

    #[error("Filter has no direction")]
    NoDirection,

    #[error("Offer currency differs from bank account currency")]
    Currency,

    #[error("Offer bank account country not accepted")]
    Country,

    #[error("No common language")]
    Language,

    #[error("Offer amount below requested amount")]
    Amount,

    #[error("Offer is on the same side as the filter")]
    Direction,

    #[error("Offer price outside requested bound")]
    Price,

    #[error("No commonly accepted arbitrator")]
    Arbitrator,
}

/// Stateless offer predicate
pub struct OfferMatcher;

impl OfferMatcher {
    /// True if `item` is visible under `filter` and `context`
    pub fn matches(
        item: &OrderBookItem,
        filter: Option<&OrderBookFilter>,
        context: &UserContext,
    ) -> bool {
        Self::evaluate(item.offer(), filter, context).is_ok()
    }

    /// Evaluate every clause, reporting the first one that fails
    pub fn evaluate(
        offer: &Offer,
        filter: Option<&OrderBookFilter>,
        context: &UserContext,
    ) -> Result<(), Mismatch> {
        let filter = filter.ok_or(Mismatch::NoFilter)?;
        let account = context
            .current_bank_account
            .as_ref()
            .ok_or(Mismatch::NoBankAccount)?;
        let direction = filter.direction.ok_or(Mismatch::NoDirection)?;

        if !Self::currency_matches(account, offer) {
            return Err(Mismatch::Currency);
        }
        if !Self::country_accepted(&offer.bank_account_country, &context.accepted_countries) {
            return Err(Mismatch::Country);
        }
        if !Self::languages_overlap(&context.accepted_languages, &offer.accepted_languages) {
            return Err(Mismatch::Language);
        }
        if !Self::amount_matches(filter, offer) {
            return Err(Mismatch::Amount);
        }
        if !Self::direction_matches(direction, offer) {
            return Err(Mismatch::Direction);
        }
        if !Self::price_matches(filter, offer) {
            return Err(Mismatch::Price);
        }
        if !Self::arbitrators_overlap(&offer.arbitrators, &context.accepted_arbitrators) {
            return Err(Mismatch::Arbitrator);
        }

        Ok(())
    }

    /// Account currency must equal the offer currency exactly
    pub fn currency_matches(account: &BankAccount, offer: &Offer) -> bool {
        account.currency == offer.currency
    }

    /// Offer country must be one of the accepted countries (by code)
    pub fn country_accepted(country: &Country, accepted: &[Country]) -> bool {
        accepted.iter().any(|c| c.code == country.code)
    }

    /// Any accepted language shares its primary subtag with any offer language
    pub fn languages_overlap(accepted: &[LanguageTag], offered: &[LanguageTag]) -> bool {
        accepted
            .iter()
            .any(|mine| offered.iter().any(|theirs| mine.same_language(theirs)))
    }

    /// Requested amount must not exceed the offer amount
    pub fn amount_matches(filter: &OrderBookFilter, offer: &Offer) -> bool {
        filter.amount.is_none_or(|amount| amount <= offer.amount)
    }

    /// The offer must be on the opposite side of the user's direction
    pub fn direction_matches(direction: Direction, offer: &Offer) -> bool {
        direction != offer.direction
    }

    /// A sell offer must ask no more than the filter price; a buy offer must
    /// bid at least the filter price
    pub fn price_matches(filter: &OrderBookFilter, offer: &Offer) -> bool {
        match filter.price {
            None => true,
            Some(price) => match offer.direction {
                Direction::Sell => price >= offer.price,
                Direction::Buy => price <= offer.price,
            },
        }
    }

    /// Any offer arbitrator id equals any accepted arbitrator id
    pub fn arbitrators_overlap(offered: &[Arbitrator], accepted: &[Arbitrator]) -> bool {
        offered
            .iter()
            .any(|theirs| accepted.iter().any(|mine| mine.id == theirs.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offerbook_core::Country;
    use rust_decimal_macros::dec;

    fn context() -> UserContext {
        UserContext::new(Some(BankAccount::new(
            "acct-1",
            "USD",
            Country::from_code("US"),
            "Bob",
        )))
        .with_countries([Country::from_code("US")])
        .with_languages(["en"])
        .with_arbitrators([Arbitrator::new("X", "Xavier")])
    }

    fn sell_offer() -> Offer {
        Offer::new("offer-1", Direction::Sell, dec!(5), dec!(100), "USD", Country::from_code("US"))
            .with_languages(["en"])
            .with_arbitrators([Arbitrator::new("X", "Xavier")])
    }

    fn buy_filter() -> OrderBookFilter {
        OrderBookFilter::new(Direction::Buy)
            .with_amount(dec!(3))
            .with_price(dec!(110))
    }

    #[test]
    fn test_matching_offer() {
        assert_eq!(OfferMatcher::evaluate(&sell_offer(), Some(&buy_filter()), &context()), Ok(()));
    }

    #[test]
    fn test_amount_above_offer_excluded() {
        let filter = buy_filter().with_amount(dec!(10));
        assert_eq!(
            OfferMatcher::evaluate(&sell_offer(), Some(&filter), &context()),
            Err(Mismatch::Amount)
        );
    }

    #[test]
    fn test_amount_equal_to_offer_included() {
        let filter = buy_filter().with_amount(dec!(5));
        assert!(OfferMatcher::evaluate(&sell_offer(), Some(&filter), &context()).is_ok());
    }

    #[test]
    fn test_same_direction_excluded() {
        let filter = OrderBookFilter {
            direction: Some(Direction::Sell),
            ..buy_filter()
        };
        assert_eq!(
            OfferMatcher::evaluate(&sell_offer(), Some(&filter), &context()),
            Err(Mismatch::Direction)
        );
    }

    #[test]
    fn test_missing_inputs_match_nothing() {
        let offer = sell_offer();

        assert_eq!(OfferMatcher::evaluate(&offer, None, &context()), Err(Mismatch::NoFilter));

        let no_account = UserContext {
            current_bank_account: None,
            ..context()
        };
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&buy_filter()), &no_account),
            Err(Mismatch::NoBankAccount)
        );

        let no_direction = OrderBookFilter {
            direction: None,
            ..buy_filter()
        };
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&no_direction), &context()),
            Err(Mismatch::NoDirection)
        );
    }

    #[test]
    fn test_locales_without_language_match_each_other() {
        let offer = sell_offer().with_languages([""]);
        let unnamed = context().with_languages(["", "de"]);
        assert!(OfferMatcher::evaluate(&offer, Some(&buy_filter()), &unnamed).is_ok());

        let german = context().with_languages(["de"]);
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&buy_filter()), &german),
            Err(Mismatch::Language)
        );
    }

    #[test]
    fn test_price_is_direction_asymmetric() {
        let offer = sell_offer();

        // Buyer's ceiling below the ask
        let low = buy_filter().with_price(dec!(90));
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&low), &context()),
            Err(Mismatch::Price)
        );

        let high = buy_filter().with_price(dec!(110));
        assert!(OfferMatcher::evaluate(&offer, Some(&high), &context()).is_ok());

        // Seller's floor against a buy offer
        let mut buy_offer = sell_offer();
        buy_offer.direction = Direction::Buy;
        let floor_ok = OrderBookFilter::new(Direction::Sell).with_price(dec!(90));
        let floor_too_high = OrderBookFilter::new(Direction::Sell).with_price(dec!(110));
        assert!(OfferMatcher::evaluate(&buy_offer, Some(&floor_ok), &context()).is_ok());
        assert_eq!(
            OfferMatcher::evaluate(&buy_offer, Some(&floor_too_high), &context()),
            Err(Mismatch::Price)
        );
    }

    #[test]
    fn test_absent_bounds_are_vacuous() {
        let filter = OrderBookFilter::new(Direction::Buy);
        assert!(OfferMatcher::evaluate(&sell_offer(), Some(&filter), &context()).is_ok());
    }

    #[test]
    fn test_currency_must_be_exact() {
        let mut offer = sell_offer();
        offer.currency = "EUR".to_string();
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&buy_filter()), &context()),
            Err(Mismatch::Currency)
        );
    }

    #[test]
    fn test_country_not_accepted() {
        let mut offer = sell_offer();
        offer.bank_account_country = Country::new("CA", "Canada");
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&buy_filter()), &context()),
            Err(Mismatch::Country)
        );
    }

    #[test]
    fn test_language_overlap_ignores_region_and_side() {
        let us = [LanguageTag::new("en-US")];
        let gb_and_de = [LanguageTag::new("de-AT"), LanguageTag::new("en-GB")];

        assert!(OfferMatcher::languages_overlap(&us, &gb_and_de));
        assert!(OfferMatcher::languages_overlap(&gb_and_de, &us));
        assert!(!OfferMatcher::languages_overlap(&us, &[LanguageTag::new("fr")]));
        assert!(!OfferMatcher::languages_overlap(&us, &[]));
    }

    #[test]
    fn test_no_common_language_excluded() {
        let offer = sell_offer().with_languages(["fr-FR"]);
        assert_eq!(
            OfferMatcher::evaluate(&offer, Some(&buy_filter()), &context()),
            Err(Mismatch::Language)
        );
    }

    #[test]
    fn test_arbitrator_overlap_by_id() {
        let offer = sell_offer().with_arbitrators([
            Arbitrator::new("Y", "Yolanda"),
            Arbitrator::new("X", "renamed"),
        ]);
        assert!(OfferMatcher::evaluate(&offer, Some(&buy_filter()), &context()).is_ok());

        let stranger = sell_offer().with_arbitrators([Arbitrator::new("Z", "Zed")]);
        assert_eq!(
            OfferMatcher::evaluate(&stranger, Some(&buy_filter()), &context()),
            Err(Mismatch::Arbitrator)
        );
    }
}
