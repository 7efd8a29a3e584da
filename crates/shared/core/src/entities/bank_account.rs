use serde::{Deserialize, Serialize};

use crate::values::{Country, CurrencyCode};

/// Unique identifier for a bank account
pub type BankAccountId = String;

/// A bank account the local user trades with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: BankAccountId,
    /// Currency held on the account; offers must be quoted in it
    pub currency: CurrencyCode,
    pub country: Country,
    pub holder_name: String,
}

impl BankAccount {
    pub fn new(
        id: impl Into<BankAccountId>,
        currency: impl Into<CurrencyCode>,
        country: Country,
        holder_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            currency: currency.into(),
            country,
            holder_name: holder_name.into(),
        }
    }
}
