//! Facade crate for the consent engine.
//! Re-exports the engine, its data model and infrastructure, and wires them from an
//! [`EngineConfig`]. Keep this crate thin: it composes other crates, it does not implement
//! consent logic.
//!
//! ## Usage
//!
//! ```rust
//! use consent::domain::config::{EngineConfig, StorageBackend};
//! use consent::domain::{ConsentCategory, ServiceDescriptor};
//!
//! # fn main() -> Result<(), consent::ConsentError> {
//! let mut config = EngineConfig::default();
//! config.storage.backend = StorageBackend::Memory;
//!
//! let engine = consent::init(config, Some("/"))?;
//! let ga = ServiceDescriptor::new("ga", "Google Analytics", ConsentCategory::Analytics);
//! let handle = engine.attach(ga.into());
//!
//! assert!(engine.is_prompt_open());
//! assert!(!handle.may_run()?);
//! # Ok(())
//! # }
//! ```

pub use consent_core::{
    CategoryRow, ConsentEngine, ConsentError, ConsentErrorExt, ConsentEvent, ConsentSelection,
    SecondaryAction, ServiceDeclaration, ServiceHandle, ServiceRow, WeakConsentEngine, gating,
};
pub use consent_domain as domain;
pub use consent_events as events;
pub use consent_kernel as kernel;
pub use consent_signal as signal;
pub use consent_storage as storage;

use consent_domain::config::{EngineConfig, StorageBackend, StorageConfig};
use consent_storage::{FileStore, MemoryStore, PreferenceStore, StorageError};
use std::sync::Arc;
use tracing::info;

/// Opens the preference store selected by `config.backend`.
///
/// # Errors
/// Returns a [`StorageError`] if the file store's data directory cannot be created.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn PreferenceStore>, StorageError> {
    match config.backend {
        StorageBackend::Memory => {
            info!("Using in-memory preference store");
            Ok(Arc::new(MemoryStore::new()))
        },
        StorageBackend::File => {
            let store = FileStore::builder().root(&config.data_dir).create(true).open()?;
            info!(path = %store.root().display(), "Using file preference store");
            Ok(Arc::new(store))
        },
    }
}

/// Builds an engine from configuration.
///
/// `location` is the page the prompt is evaluated against (see
/// [`consent_core::ConsentEngineBuilder::location`]).
///
/// # Errors
/// Returns [`ConsentError::Storage`] if the store cannot be opened or the key is invalid.
pub fn init(config: EngineConfig, location: Option<&str>) -> Result<ConsentEngine, ConsentError> {
    let store = open_store(&config.storage).context("Opening preference store")?;

    let builder = ConsentEngine::builder().config(config).shared_store(store);
    let builder = match location {
        Some(location) => builder.location(location),
        None => builder,
    };

    builder.init()
}
