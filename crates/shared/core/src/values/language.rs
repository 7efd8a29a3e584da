use serde::{Deserialize, Serialize};
use std::fmt;

/// A BCP 47 style locale tag such as `en`, `en-US` or `zh_Hant_TW`
///
/// Offers and settings carry full locales, but matching only ever looks at
/// the primary language subtag: `en-US` and `en-GB` speak the same language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The full tag as supplied
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag, lowercased (`"en-US"` -> `"en"`)
    pub fn language(&self) -> String {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    /// True if both tags share the same primary language, ignoring region and script
    ///
    /// Tags without a language subtag compare equal to each other.
    pub fn same_language(&self, other: &LanguageTag) -> bool {
        self.language() == other.language()
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for LanguageTag {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}
