use consent_domain::{ConsentSnapshot, ServiceDescriptor};

/// Notifications published by a [`ConsentEngine`](crate::ConsentEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentEvent {
    /// The consent snapshot was rewritten. Carries the state after the write.
    ConsentChanged(ConsentSnapshot),
    ServiceRegistered(ServiceDescriptor),
    ServiceRemoved(ServiceDescriptor),
    PromptVisibilityChanged(bool),
    /// The consent-signal bridge emitted its initial signal.
    ConsentModeActivated,
    /// A consent-mode service waited out its grace period without an active bridge.
    ConsentModeNotReady(ServiceDescriptor),
}
