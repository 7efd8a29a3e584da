mod arbitrator;
mod bank_account;
mod direction;
mod offer;

pub use arbitrator::{Arbitrator, ArbitratorId};
pub use bank_account::{BankAccount, BankAccountId};
pub use direction::Direction;
pub use offer::Offer;
