use crate::error::{ConsentError, ConsentErrorExt};
use crate::events::ConsentEvent;
use crate::gating;
use crate::registry::ServiceRegistry;
use crate::selection::ConsentSelection;
use crate::service::{ServiceDeclaration, ServiceHandle};
use crate::state::ConsentState;
use crate::visibility::{PromptVisibility, initial_visibility};
use consent_domain::config::EngineConfig;
use consent_domain::{
    CategoryConsentPatch, CategoryConsents, ConsentCategory, ConsentSnapshot, ServiceDescriptor,
    ServiceOverrides,
};
use consent_events::ChangeNotifier;
use consent_storage::{PreferenceStore, StorageKey};
use parking_lot::RwLock;
use private::Sealed;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, info};

#[derive(Debug)]
struct EngineInner {
    config: EngineConfig,
    registry: RwLock<ServiceRegistry>,
    state: ConsentState,
    prompt: PromptVisibility,
    consent_mode: AtomicBool,
    events: ChangeNotifier<ConsentEvent>,
}

/// Shared handle to the consent reconciliation engine.
///
/// Cloning is cheap; every clone sees the same registry, consent state and event channel.
///
/// # Example
///
/// ```rust
/// use consent_core::ConsentEngine;
/// use consent_domain::{ConsentCategory, ServiceDescriptor};
/// use consent_storage::MemoryStore;
///
/// # fn main() -> Result<(), consent_core::ConsentError> {
/// let engine = ConsentEngine::builder().store(MemoryStore::new()).init()?;
/// let ga = ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics);
///
/// engine.register_service(ga.clone());
/// assert!(!engine.is_service_enabled(&ga));
///
/// engine.accept_all();
/// assert!(engine.is_service_enabled(&ga));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConsentEngine {
    inner: Arc<EngineInner>,
}

impl ConsentEngine {
    #[must_use = "The engine is not usable until you call .init()"]
    pub fn builder() -> ConsentEngineBuilder {
        ConsentEngineBuilder::new()
    }

    /// Non-owning handle that does not keep the engine (or its event channel) alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakConsentEngine {
        WeakConsentEngine { inner: Arc::downgrade(&self.inner) }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Receiver for every [`ConsentEvent`] published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ConsentEvent>> {
        self.inner.events.subscribe()
    }

    pub(crate) fn publish(&self, event: ConsentEvent) {
        self.inner.events.publish(event);
    }

    // --- Registry ---

    /// Adds `service` unless one with the same id is already known.
    pub fn register_service(&self, service: ServiceDescriptor) -> bool {
        let inserted = self.inner.registry.write().register(service.clone());
        if inserted {
            debug!(service = %service.id, category = %service.category, "Service registered");
            self.publish(ConsentEvent::ServiceRegistered(service));
        }
        inserted
    }

    /// Removes the entry equal to `service`.
    pub fn remove_service(&self, service: &ServiceDescriptor) -> bool {
        let removed = self.inner.registry.write().remove(service);
        if removed {
            debug!(service = %service.id, "Service removed");
            self.publish(ConsentEvent::ServiceRemoved(service.clone()));
        }
        removed
    }

    #[must_use]
    pub fn services(&self) -> Vec<ServiceDescriptor> {
        self.inner.registry.read().list().to_vec()
    }

    #[must_use]
    pub fn services_in(&self, category: ConsentCategory) -> Vec<ServiceDescriptor> {
        self.inner.registry.read().in_category(category).cloned().collect()
    }

    #[must_use]
    pub fn service(&self, id: &str) -> Option<ServiceDescriptor> {
        self.inner.registry.read().get(id).cloned()
    }

    // --- Consent state ---

    #[must_use]
    pub fn category_consents(&self) -> CategoryConsents {
        self.inner.state.categories()
    }

    #[must_use]
    pub fn service_overrides(&self) -> ServiceOverrides {
        self.inner.state.overrides()
    }

    #[must_use]
    pub fn snapshot(&self) -> ConsentSnapshot {
        self.inner.state.snapshot()
    }

    /// Whether a durable record was present when the engine started.
    #[must_use]
    pub fn record_existed_at_startup(&self) -> bool {
        self.inner.state.existed_at_startup()
    }

    /// Merges `patch` into the category decisions and persists.
    pub fn set_category_consent(&self, patch: CategoryConsentPatch) {
        let snapshot = self.inner.state.set_category_consent(patch);
        self.publish(ConsentEvent::ConsentChanged(snapshot));
    }

    /// Sets (or with `None`, clears) one service override and persists.
    pub fn set_service_override(&self, service_id: &str, value: Option<bool>) {
        let snapshot = self.inner.state.set_service_override(service_id, value);
        self.publish(ConsentEvent::ConsentChanged(snapshot));
    }

    /// Replaces both maps in a single write.
    pub fn set_full_consent(&self, categories: CategoryConsents, overrides: ServiceOverrides) {
        let snapshot = self.inner.state.set_full_consent(categories, overrides);
        self.publish(ConsentEvent::ConsentChanged(snapshot));
    }

    // --- Gating ---

    #[must_use]
    pub fn is_service_enabled(&self, service: &ServiceDescriptor) -> bool {
        let snapshot = self.inner.state.snapshot();
        gating::is_service_enabled(&snapshot.categories, &snapshot.overrides, service)
    }

    #[must_use]
    pub fn has_custom_selection(&self) -> bool {
        let snapshot = self.inner.state.snapshot();
        gating::has_custom_selection(&snapshot.categories, &snapshot.overrides)
    }

    // --- Prompt ---

    #[must_use]
    pub fn is_prompt_open(&self) -> bool {
        self.inner.prompt.is_open()
    }

    pub fn set_prompt_open(&self, open: bool) {
        if self.inner.prompt.set(open) {
            debug!(open, "Prompt visibility changed");
            self.publish(ConsentEvent::PromptVisibilityChanged(open));
        }
    }

    pub fn reopen_prompt(&self) {
        self.set_prompt_open(true);
    }

    /// Editable draft seeded from the current state.
    #[must_use]
    pub fn selection(&self) -> ConsentSelection {
        ConsentSelection::from_snapshot(&self.snapshot())
    }

    /// Grants every category, clears overrides and closes the prompt.
    pub fn accept_all(&self) {
        self.set_full_consent(CategoryConsents::granted(), ServiceOverrides::new());
        self.set_prompt_open(false);
    }

    /// Denies every category, clears overrides and closes the prompt.
    pub fn disable_all(&self) {
        self.set_full_consent(CategoryConsents::denied(), ServiceOverrides::new());
        self.set_prompt_open(false);
    }

    /// Persists `selection` verbatim and closes the prompt.
    pub fn save_selection(&self, selection: ConsentSelection) {
        let (categories, overrides) = selection.into_parts();
        self.set_full_consent(categories, overrides);
        self.set_prompt_open(false);
    }

    // --- Consent mode ---

    #[must_use]
    pub fn is_consent_mode_active(&self) -> bool {
        self.inner.consent_mode.load(Ordering::Acquire)
    }

    pub fn set_consent_mode_active(&self, active: bool) {
        let was = self.inner.consent_mode.swap(active, Ordering::AcqRel);
        if active && !was {
            info!("Consent mode activated");
            self.publish(ConsentEvent::ConsentModeActivated);
        }
    }

    // --- Services ---

    /// Registers the declared service and returns its gating handle.
    #[must_use = "Dropping the handle cancels its consent-mode diagnostics"]
    pub fn attach(&self, declaration: ServiceDeclaration) -> ServiceHandle {
        self.register_service(declaration.descriptor.clone());
        ServiceHandle::new(self, declaration)
    }
}

/// Weak counterpart of [`ConsentEngine`].
#[derive(Debug, Clone)]
pub struct WeakConsentEngine {
    inner: Weak<EngineInner>,
}

impl WeakConsentEngine {
    #[must_use]
    pub fn upgrade(&self) -> Option<ConsentEngine> {
        self.inner.upgrade().map(|inner| ConsentEngine { inner })
    }
}

#[derive(Debug, Default)]
pub struct NoStore;
#[derive(Debug)]
pub struct WithStore(Arc<dyn PreferenceStore>);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoStore {}
impl Sealed for WithStore {}

#[derive(Debug)]
pub struct ConsentEngineBuilder<S: Sealed = NoStore> {
    store: S,
    config: EngineConfig,
    location: Option<String>,
}

impl Default for ConsentEngineBuilder<NoStore> {
    fn default() -> Self {
        Self { store: NoStore, config: EngineConfig::default(), location: None }
    }
}

impl<S: Sealed> ConsentEngineBuilder<S> {
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Location the prompt is evaluated against at startup, e.g. the current page path.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl ConsentEngineBuilder<NoStore> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store(self, store: impl PreferenceStore + 'static) -> ConsentEngineBuilder<WithStore> {
        self.shared_store(Arc::new(store))
    }

    #[must_use]
    pub fn shared_store(self, store: Arc<dyn PreferenceStore>) -> ConsentEngineBuilder<WithStore> {
        ConsentEngineBuilder { store: WithStore(store), config: self.config, location: self.location }
    }
}

impl ConsentEngineBuilder<WithStore> {
    /// Loads the durable record and evaluates prompt visibility once.
    ///
    /// # Errors
    /// Returns [`ConsentError::Storage`] if the configured storage key is invalid.
    pub fn init(self) -> Result<ConsentEngine, ConsentError> {
        let key = StorageKey::try_from(&self.config.storage.key).context("storage.key")?;
        let state = ConsentState::open(self.store.0, key);

        let open = initial_visibility(
            state.existed_at_startup(),
            self.location.as_deref(),
            &self.config.prompt.privacy_policy_path,
        );

        info!(
            key = %state.key(),
            record_found = state.existed_at_startup(),
            prompt_open = open,
            "Consent engine initialized"
        );

        Ok(ConsentEngine {
            inner: Arc::new(EngineInner {
                config: self.config,
                registry: RwLock::new(ServiceRegistry::new()),
                state,
                prompt: PromptVisibility::new(open),
                consent_mode: AtomicBool::new(false),
                events: ChangeNotifier::new(),
            }),
        })
    }
}
