//! # Consent engine
//!
//! Reconciles category-level consent decisions with per-service overrides, keeps them in
//! sync with one durable record, and answers the gating question every dependent service
//! asks: may I run?
//!
//! ## Components
//!
//! * [`ServiceRegistry`]: services that declared themselves, first registration wins.
//! * [`ConsentState`]: the in-memory snapshot, written through on every change.
//! * [`gating`]: pure decisions over the consent maps.
//! * [`PromptVisibility`]: whether the preference prompt is shown.
//! * [`ConsentSelection`]: the prompt's editable draft.
//! * [`ServiceHandle`]: per-service gating with consent-mode diagnostics.
//!
//! [`ConsentEngine`] ties them together and publishes a [`ConsentEvent`] for every change.

mod engine;
mod error;
mod events;
pub mod gating;
mod registry;
mod selection;
mod service;
mod state;
mod visibility;

pub use crate::engine::{
    ConsentEngine, ConsentEngineBuilder, NoStore, WeakConsentEngine, WithStore,
};
pub use crate::error::{ConsentError, ConsentErrorExt};
pub use crate::events::ConsentEvent;
pub use crate::registry::ServiceRegistry;
pub use crate::selection::{CategoryRow, ConsentSelection, SecondaryAction, ServiceRow};
pub use crate::service::{ServiceDeclaration, ServiceHandle};
pub use crate::state::ConsentState;
pub use crate::visibility::{PromptVisibility, initial_visibility};
