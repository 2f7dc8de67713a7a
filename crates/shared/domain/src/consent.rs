//! Persisted consent model.
//!
//! The durable record is a single JSON object:
//!
//! ```json
//! {
//!   "cookieCategoryConsents": { "marketing": false, "analytics": true, "other": false },
//!   "customServiceConsents": { "google-analytics": false, "hotjar": null }
//! }
//! ```
//!
//! The essential category is implicit and always granted, so it never appears here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of non-essential consent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    Marketing,
    Analytics,
    Other,
}

impl ConsentCategory {
    /// All categories in presentation order.
    pub const ALL: [Self; 3] = [Self::Marketing, Self::Analytics, Self::Other];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Analytics => "analytics",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ConsentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marketing" => Ok(Self::Marketing),
            "analytics" => Ok(Self::Analytics),
            "other" => Ok(Self::Other),
            _ => Err(UnknownCategory(s.to_owned())),
        }
    }
}

impl TryFrom<&str> for ConsentCategory {
    type Error = UnknownCategory;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Returned when a string does not name one of the three consent categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown consent category '{}' (expected marketing, analytics or other)", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// Category-level consent decisions.
///
/// Always carries exactly the three non-essential categories; deserialization rejects
/// records with missing or extra keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConsents {
    pub marketing: bool,
    pub analytics: bool,
    pub other: bool,
}

impl CategoryConsents {
    /// Every category set to the same decision.
    #[must_use]
    pub const fn uniform(granted: bool) -> Self {
        Self { marketing: granted, analytics: granted, other: granted }
    }

    #[must_use]
    pub const fn granted() -> Self {
        Self::uniform(true)
    }

    #[must_use]
    pub const fn denied() -> Self {
        Self::uniform(false)
    }

    #[must_use]
    pub const fn get(&self, category: ConsentCategory) -> bool {
        match category {
            ConsentCategory::Marketing => self.marketing,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Other => self.other,
        }
    }

    pub const fn set(&mut self, category: ConsentCategory, granted: bool) {
        match category {
            ConsentCategory::Marketing => self.marketing = granted,
            ConsentCategory::Analytics => self.analytics = granted,
            ConsentCategory::Other => self.other = granted,
        }
    }

    #[must_use]
    pub const fn with(mut self, category: ConsentCategory, granted: bool) -> Self {
        self.set(category, granted);
        self
    }

    /// `true` when every category is granted.
    #[must_use]
    pub const fn is_fully_granted(&self) -> bool {
        self.marketing && self.analytics && self.other
    }

    /// Shallow merge: fields present in `patch` overwrite, absent fields are kept.
    #[must_use]
    pub const fn merge(mut self, patch: CategoryConsentPatch) -> Self {
        if let Some(granted) = patch.marketing {
            self.marketing = granted;
        }
        if let Some(granted) = patch.analytics {
            self.analytics = granted;
        }
        if let Some(granted) = patch.other {
            self.other = granted;
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConsentCategory, bool)> + '_ {
        ConsentCategory::ALL.into_iter().map(|category| (category, self.get(category)))
    }
}

/// A partial category update. Absent fields leave the current decision untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConsentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<bool>,
}

impl CategoryConsentPatch {
    #[must_use]
    pub const fn new() -> Self {
        Self { marketing: None, analytics: None, other: None }
    }

    /// Builder-style setter.
    ///
    /// ```rust
    /// use consent_domain::{CategoryConsentPatch, ConsentCategory};
    ///
    /// let patch = CategoryConsentPatch::new().set(ConsentCategory::Marketing, true);
    /// assert_eq!(patch.get(ConsentCategory::Marketing), Some(true));
    /// assert_eq!(patch.get(ConsentCategory::Analytics), None);
    /// ```
    #[must_use]
    pub const fn set(mut self, category: ConsentCategory, granted: bool) -> Self {
        match category {
            ConsentCategory::Marketing => self.marketing = Some(granted),
            ConsentCategory::Analytics => self.analytics = Some(granted),
            ConsentCategory::Other => self.other = Some(granted),
        }
        self
    }

    #[must_use]
    pub const fn get(&self, category: ConsentCategory) -> Option<bool> {
        match category {
            ConsentCategory::Marketing => self.marketing,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Other => self.other,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.marketing.is_none() && self.analytics.is_none() && self.other.is_none()
    }
}

impl From<CategoryConsents> for CategoryConsentPatch {
    fn from(value: CategoryConsents) -> Self {
        Self {
            marketing: Some(value.marketing),
            analytics: Some(value.analytics),
            other: Some(value.other),
        }
    }
}

/// Per-service overrides keyed by service id.
///
/// Each entry is tri-state: `Some(true)`, `Some(false)`, or `None` (explicit "no override",
/// serialized as `null`). A missing key behaves exactly like `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceOverrides(BTreeMap<String, Option<bool>>);

impl ServiceOverrides {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The effective override for `service_id`; `None` when absent or explicitly cleared.
    #[must_use]
    pub fn get(&self, service_id: &str) -> Option<bool> {
        self.0.get(service_id).copied().flatten()
    }

    /// Whether a key (including an explicit `null`) exists for `service_id`.
    #[must_use]
    pub fn contains(&self, service_id: &str) -> bool {
        self.0.contains_key(service_id)
    }

    pub fn set(&mut self, service_id: impl Into<String>, value: Option<bool>) {
        self.0.insert(service_id.into(), value);
    }

    #[must_use]
    pub fn with(mut self, service_id: impl Into<String>, value: Option<bool>) -> Self {
        self.set(service_id, value);
        self
    }

    /// `true` if at least one entry carries a non-null decision.
    #[must_use]
    pub fn has_decisions(&self) -> bool {
        self.0.values().any(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<bool>)> + '_ {
        self.0.iter().map(|(id, value)| (id.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<bool>)> for ServiceOverrides {
    fn from_iter<I: IntoIterator<Item = (K, Option<bool>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, value)| (id.into(), value)).collect())
    }
}

/// The whole durable record: category decisions plus per-service overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSnapshot {
    #[serde(rename = "cookieCategoryConsents")]
    pub categories: CategoryConsents,
    #[serde(rename = "customServiceConsents")]
    pub overrides: ServiceOverrides,
}

impl ConsentSnapshot {
    #[must_use]
    pub const fn new(categories: CategoryConsents, overrides: ServiceOverrides) -> Self {
        Self { categories, overrides }
    }
}
