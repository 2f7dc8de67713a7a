use consent_domain::CategoryConsents;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentStatus {
    Granted,
    Denied,
}

impl From<bool> for ConsentStatus {
    fn from(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }
}

/// Storage permissions understood by the downstream consent-signaling API.
///
/// `marketing` maps to `ad_storage`, `analytics` to `analytics_storage`; `other` has no
/// counterpart downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSignal {
    pub ad_storage: ConsentStatus,
    pub analytics_storage: ConsentStatus,
    /// Settle budget in milliseconds; only sent with the initial default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_update: Option<u64>,
}

impl ConsentSignal {
    #[must_use]
    pub fn from_categories(categories: &CategoryConsents) -> Self {
        Self {
            ad_storage: categories.marketing.into(),
            analytics_storage: categories.analytics.into(),
            wait_for_update: None,
        }
    }

    #[must_use]
    pub fn with_wait_for_update(mut self, wait: Duration) -> Self {
        self.wait_for_update = Some(u64::try_from(wait.as_millis()).unwrap_or(u64::MAX));
        self
    }
}

/// A single call into the consent-signaling API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCommand {
    /// Initial state, sent once before any dependent script runs.
    Default(ConsentSignal),
    Update(ConsentSignal),
}

impl SignalCommand {
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Default(_) => "default",
            Self::Update(_) => "update",
        }
    }

    #[must_use]
    pub const fn signal(&self) -> &ConsentSignal {
        match self {
            Self::Default(signal) | Self::Update(signal) => signal,
        }
    }

    /// The gtag-style argument list, e.g. `["consent", "update", {...}]`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!(["consent", self.action(), self.signal()])
    }
}

impl fmt::Display for SignalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::ConsentCategory;

    #[test]
    fn maps_marketing_and_analytics_only() {
        let categories = CategoryConsents::denied()
            .with(ConsentCategory::Analytics, true)
            .with(ConsentCategory::Other, true);

        let signal = ConsentSignal::from_categories(&categories);

        assert_eq!(signal.ad_storage, ConsentStatus::Denied);
        assert_eq!(signal.analytics_storage, ConsentStatus::Granted);
    }

    #[test]
    fn default_carries_settle_budget_update_does_not() {
        let signal = ConsentSignal::from_categories(&CategoryConsents::granted());

        let default =
            SignalCommand::Default(signal.with_wait_for_update(Duration::from_millis(500)));
        assert_eq!(
            default.to_value(),
            json!(["consent", "default", {
                "ad_storage": "granted",
                "analytics_storage": "granted",
                "wait_for_update": 500
            }])
        );

        let update = SignalCommand::Update(signal);
        assert_eq!(
            update.to_value(),
            json!(["consent", "update", {"ad_storage": "granted", "analytics_storage": "granted"}])
        );
    }
}
