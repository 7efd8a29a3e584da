//! Local user trading context
//!
//! Supplied by the settings and user collaborators; the order book treats it
//! as read-only input and recomputes its views whenever it is replaced.

use serde::{Deserialize, Serialize};

use crate::entities::{Arbitrator, BankAccount};
use crate::values::{Country, LanguageTag};

/// The local user's active bank account and acceptance settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Account currently selected for trading, if any
    pub current_bank_account: Option<BankAccount>,
    /// Countries whose bank accounts the user accepts
    pub accepted_countries: Vec<Country>,
    /// Languages the user can communicate in
    pub accepted_languages: Vec<LanguageTag>,
    /// Arbitrators the user trusts
    pub accepted_arbitrators: Vec<Arbitrator>,
}

impl UserContext {
    pub fn new(current_bank_account: Option<BankAccount>) -> Self {
        Self {
            current_bank_account,
            ..Default::default()
        }
    }

    pub fn with_countries(mut self, countries: impl IntoIterator<Item = Country>) -> Self {
        self.accepted_countries = countries.into_iter().collect();
        self
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
        self.accepted_arbitrators = arbitrators.into_iter().collect();
        self
    }

    /// Currency of the current bank account, if one is selected
    pub fn currency(&self) -> Option<&str> {
        self.current_bank_account
            .as_ref()
            .map(|account| account.currency.as_str())
    }
}
