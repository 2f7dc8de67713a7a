use crate::engine::{ConsentEngine, WeakConsentEngine};
use crate::error::ConsentError;
use crate::events::ConsentEvent;
use consent_domain::ServiceDescriptor;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What a dependent service declares when it attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDeclaration {
    pub descriptor: ServiceDescriptor,
    /// The service can run in a reduced, signal-driven mode once the consent-mode bridge is
    /// active, regardless of the stored decision.
    pub consent_mode: bool,
}

impl ServiceDeclaration {
    #[must_use]
    pub const fn new(descriptor: ServiceDescriptor) -> Self {
        Self { descriptor, consent_mode: false }
    }

    #[must_use]
    pub const fn consent_mode(mut self, enabled: bool) -> Self {
        self.consent_mode = enabled;
        self
    }
}

impl From<ServiceDescriptor> for ServiceDeclaration {
    fn from(descriptor: ServiceDescriptor) -> Self {
        Self::new(descriptor)
    }
}

/// Gating handle returned by [`ConsentEngine::attach`].
///
/// The handle does not keep the engine alive; once the engine is dropped every query fails
/// with [`ConsentError::MissingContext`]. Dropping the handle cancels its pending
/// consent-mode diagnostic but leaves the registry entry in place; call
/// [`ServiceHandle::detach`] to remove it.
#[derive(Debug)]
pub struct ServiceHandle {
    engine: WeakConsentEngine,
    declaration: ServiceDeclaration,
    readiness: Option<JoinHandle<()>>,
}

impl ServiceHandle {
    pub(crate) fn new(engine: &ConsentEngine, declaration: ServiceDeclaration) -> Self {
        let readiness = if declaration.consent_mode && !engine.is_consent_mode_active() {
            schedule_readiness_check(
                engine,
                declaration.descriptor.clone(),
                engine.config().diagnostics.consent_mode_warning(),
            )
        } else {
            None
        };

        Self { engine: engine.downgrade(), declaration, readiness }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &ServiceDescriptor {
        &self.declaration.descriptor
    }

    #[must_use]
    pub const fn declaration(&self) -> &ServiceDeclaration {
        &self.declaration
    }

    fn engine(&self) -> Result<ConsentEngine, ConsentError> {
        self.engine.upgrade().ok_or_else(|| ConsentError::MissingContext {
            message: self.declaration.descriptor.id.clone().into(),
            context: Some("Service handle used after its consent engine was dropped".into()),
        })
    }

    /// Stored consent decision for this service.
    ///
    /// # Errors
    /// Returns [`ConsentError::MissingContext`] if the engine no longer exists.
    pub fn is_enabled(&self) -> Result<bool, ConsentError> {
        Ok(self.engine()?.is_service_enabled(&self.declaration.descriptor))
    }

    /// # Errors
    /// Returns [`ConsentError::MissingContext`] if the engine no longer exists.
    pub fn is_consent_mode_active(&self) -> Result<bool, ConsentError> {
        Ok(self.engine()?.is_consent_mode_active())
    }

    /// Whether the service's content may run now.
    ///
    /// A consent-mode service runs once the bridge is active; anything else needs consent.
    ///
    /// # Errors
    /// Returns [`ConsentError::MissingContext`] if the engine no longer exists.
    pub fn may_run(&self) -> Result<bool, ConsentError> {
        let engine = self.engine()?;
        Ok((self.declaration.consent_mode && engine.is_consent_mode_active())
            || engine.is_service_enabled(&self.declaration.descriptor))
    }

    /// `Some(content)` when the service may run.
    ///
    /// # Errors
    /// Returns [`ConsentError::MissingContext`] if the engine no longer exists.
    pub fn gate<T>(&self, content: T) -> Result<Option<T>, ConsentError> {
        Ok(self.may_run()?.then_some(content))
    }

    /// # Errors
    /// Returns [`ConsentError::MissingContext`] if the engine no longer exists.
    pub fn gate_or<T>(&self, content: T, fallback: T) -> Result<T, ConsentError> {
        Ok(if self.may_run()? { content } else { fallback })
    }

    /// Removes the registry entry and cancels pending diagnostics.
    ///
    /// # Errors
    /// Returns [`ConsentError::MissingContext`] if the engine no longer exists.
    pub fn detach(mut self) -> Result<bool, ConsentError> {
        self.cancel_readiness();
        let engine = self.engine()?;
        Ok(engine.remove_service(&self.declaration.descriptor))
    }

    fn cancel_readiness(&mut self) {
        if let Some(task) = self.readiness.take() {
            task.abort();
            debug!(service = %self.declaration.descriptor.id, "Consent-mode readiness check cancelled");
        }
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        self.cancel_readiness();
    }
}

fn schedule_readiness_check(
    engine: &ConsentEngine,
    service: ServiceDescriptor,
    grace: Duration,
) -> Option<JoinHandle<()>> {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        debug!(service = %service.id, "No async runtime; consent-mode readiness check skipped");
        return None;
    };

    let weak = engine.downgrade();
    Some(runtime.spawn(async move {
        tokio::time::sleep(grace).await;

        let Some(engine) = weak.upgrade() else {
            return;
        };
        if engine.is_consent_mode_active() {
            return;
        }

        warn!(
            service = %service.id,
            grace_ms = grace.as_millis(),
            "Service requested consent mode but no consent-mode bridge is active; \
             it stays gated by stored consent"
        );
        engine.publish(ConsentEvent::ConsentModeNotReady(service));
    }))
}
