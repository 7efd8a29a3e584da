use serde::{Deserialize, Serialize};

/// A country, identified by its ISO 3166 code
///
/// Equality only looks at the code; the display name is informational.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Country known only by its code (name mirrors the code)
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
        }
    }
}

impl PartialEq for Country {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl std::hash::Hash for Country {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_code() {
        let a = Country::new("US", "United States");
        let b = Country::new("US", "USA");
        let c = Country::new("CA", "Canada");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
