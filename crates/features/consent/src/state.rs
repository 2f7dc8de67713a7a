use consent_domain::{CategoryConsentPatch, CategoryConsents, ConsentSnapshot, ServiceOverrides};
use consent_storage::{PreferenceStore, PreferenceStoreExt, StorageKey};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// In-memory consent snapshot kept in lockstep with one durable record.
///
/// The record is read once, at open. Every mutation rewrites the whole record while the
/// state lock is held, so concurrent writers are serialized and the durable copy always
/// matches memory when a call returns. A failed write is logged and not retried; memory is
/// updated regardless.
#[derive(Debug)]
pub struct ConsentState {
    store: Arc<dyn PreferenceStore>,
    key: StorageKey,
    snapshot: Mutex<ConsentSnapshot>,
    existed_at_startup: bool,
}

impl ConsentState {
    pub fn open(store: Arc<dyn PreferenceStore>, key: StorageKey) -> Self {
        let existed_at_startup = store.contains(&key).unwrap_or_else(|err| {
            warn!(%key, error = %err, "Could not probe for a stored consent record");
            false
        });
        let snapshot: ConsentSnapshot = store.load_or_default(&key);

        debug!(%key, existed_at_startup, "Consent state loaded");

        Self { store, key, snapshot: Mutex::new(snapshot), existed_at_startup }
    }

    /// Whether a durable record (well-formed or not) was present when the state was opened.
    #[must_use]
    pub const fn existed_at_startup(&self) -> bool {
        self.existed_at_startup
    }

    #[must_use]
    pub const fn key(&self) -> &StorageKey {
        &self.key
    }

    #[must_use]
    pub fn snapshot(&self) -> ConsentSnapshot {
        self.snapshot.lock().clone()
    }

    #[must_use]
    pub fn categories(&self) -> CategoryConsents {
        self.snapshot.lock().categories
    }

    #[must_use]
    pub fn overrides(&self) -> ServiceOverrides {
        self.snapshot.lock().overrides.clone()
    }

    pub fn set_category_consent(&self, patch: CategoryConsentPatch) -> ConsentSnapshot {
        self.mutate(|snapshot| snapshot.categories = snapshot.categories.merge(patch))
    }

    pub fn set_service_override(&self, service_id: &str, value: Option<bool>) -> ConsentSnapshot {
        self.mutate(|snapshot| snapshot.overrides.set(service_id, value))
    }

    pub fn set_full_consent(
        &self,
        categories: CategoryConsents,
        overrides: ServiceOverrides,
    ) -> ConsentSnapshot {
        self.mutate(|snapshot| *snapshot = ConsentSnapshot::new(categories, overrides))
    }

    fn mutate(&self, apply: impl FnOnce(&mut ConsentSnapshot)) -> ConsentSnapshot {
        let mut snapshot = self.snapshot.lock();
        apply(&mut snapshot);

        if let Err(err) = self.store.save(&self.key, &*snapshot) {
            error!(key = %self.key, error = %err, "Failed to persist consent record");
        } else {
            debug!(key = %self.key, "Consent record persisted");
        }

        snapshot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consent_domain::ConsentCategory;
    use consent_storage::MemoryStore;

    fn open(store: &MemoryStore) -> ConsentState {
        ConsentState::open(Arc::new(store.clone()), StorageKey::try_from("cookieConsent").unwrap())
    }

    #[test]
    fn defaults_when_nothing_stored() {
        let state = open(&MemoryStore::new());

        assert!(!state.existed_at_startup());
        assert_eq!(state.snapshot(), ConsentSnapshot::default());
    }

    #[test]
    fn each_mutation_writes_whole_record() {
        let store = MemoryStore::new();
        let state = open(&store);

        state.set_category_consent(
            CategoryConsentPatch::new().set(ConsentCategory::Analytics, true),
        );
        state.set_service_override("pixel", Some(false));

        let stored: ConsentSnapshot = store.load_or_default(state.key());
        assert_eq!(stored, state.snapshot());
        assert!(stored.categories.analytics);
        assert!(!stored.categories.marketing);
        assert_eq!(stored.overrides.get("pixel"), Some(false));
    }

    #[test]
    fn patch_keeps_untouched_categories() {
        let state = open(&MemoryStore::new());
        state.set_full_consent(CategoryConsents::granted(), ServiceOverrides::new());

        let after = state.set_category_consent(
            CategoryConsentPatch::new().set(ConsentCategory::Marketing, false),
        );

        assert_eq!(after.categories, CategoryConsents::granted().with(ConsentCategory::Marketing, false));
    }

    #[test]
    fn reopen_sees_previous_writes() {
        let store = MemoryStore::new();
        let overrides = ServiceOverrides::new().with("ga", Some(true)).with("pixel", None);
        open(&store).set_full_consent(CategoryConsents::denied(), overrides.clone());

        let reopened = open(&store);
        assert!(reopened.existed_at_startup());
        assert_eq!(reopened.overrides(), overrides);
        assert_eq!(reopened.categories(), CategoryConsents::denied());
    }
}
