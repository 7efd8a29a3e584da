use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{Arbitrator, BankAccountId, Direction};
use crate::values::{Country, CurrencyCode, LanguageTag, OfferId, Price, Quantity, Timestamp};

/// A counterparty's trade proposal as received from the network
///
/// Offers are immutable once received; the order book only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub direction: Direction,
    pub amount: Quantity,
    pub price: Price,
    /// Currency the offer is quoted in
    pub currency: CurrencyCode,
    /// Country of the offerer's bank account
    pub bank_account_country: Country,
    /// Languages the offerer is willing to communicate in
    pub accepted_languages: Vec<LanguageTag>,
    /// Arbitrators the offerer accepts
    pub arbitrators: Vec<Arbitrator>,
    /// Offerer's bank account used for settlement
    pub bank_account_id: BankAccountId,
    pub created_at: Timestamp,
}

impl Offer {
    /// Create an offer with no languages, arbitrators or bank account reference
    pub fn new(
        id: impl Into<OfferId>,
        direction: Direction,
        amount: Quantity,
        price: Price,
        currency: impl Into<CurrencyCode>,
        bank_account_country: Country,
    ) -> Self {
        Self {
            id: id.into(),
            direction,
            amount,
            price,
            currency: currency.into(),
            bank_account_country,
            accepted_languages: Vec::new(),
            arbitrators: Vec::new(),
            bank_account_id: BankAccountId::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_languages<I, L>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LanguageTag>,
    {
        self.accepted_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arbitrators(mut self, arbitrators: impl IntoIterator<Item = Arbitrator>) -> Self {
        self.arbitrators = arbitrators.into_iter().collect();
        self
    }

    pub fn with_bank_account(mut self, bank_account_id: impl Into<BankAccountId>) -> Self {
        self.bank_account_id = bank_account_id.into();
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_builder_fields() {
        let offer = Offer::new("o-1", Direction::Sell, dec!(5), dec!(100), "USD", Country::from_code("US"))
            .with_languages(["en-US", "de"])
            .with_arbitrators([Arbitrator::new("arb-1", "Alice")])
            .with_bank_account("acct-9");

        assert_eq!(offer.accepted_languages.len(), 2);
        assert_eq!(offer.accepted_languages[0].language(), "en");
        assert_eq!(offer.arbitrators[0].id, "arb-1");
        assert_eq!(offer.bank_account_id, "acct-9");
    }
}
