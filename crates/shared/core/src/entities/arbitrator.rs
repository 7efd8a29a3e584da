use serde::{Deserialize, Serialize};

/// Unique identifier for an arbitrator
pub type ArbitratorId = String;

/// A trusted third party eligible to mediate a trade
///
/// Arbitrators are matched by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arbitrator {
    pub id: ArbitratorId,
    pub name: String,
}

impl Arbitrator {
    pub fn new(id: impl Into<ArbitratorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Arbitrator {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Arbitrator {}
