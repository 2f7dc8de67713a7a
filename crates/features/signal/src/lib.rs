//! # Consent mode
//!
//! Forwards the engine's category decisions to an analytics consent-signaling API.
//!
//! [`ConsentModeBridge`] emits one `default` command (with a settle budget) when it first
//! syncs, flips the engine's consent-mode flag, and from then on emits an `update` command
//! whenever the category decisions change. [`DataLayer`] is a [`SignalSink`] that records
//! gtag-style argument lists.
//!
//! ```rust
//! use consent_core::ConsentEngine;
//! use consent_signal::{ConsentModeBridge, DataLayer};
//! use consent_storage::MemoryStore;
//!
//! let engine = ConsentEngine::builder().store(MemoryStore::new()).init().unwrap();
//! let layer = DataLayer::new();
//! let bridge = ConsentModeBridge::new(engine.clone(), layer.clone());
//!
//! bridge.sync().unwrap();
//! engine.accept_all();
//! bridge.sync().unwrap();
//!
//! assert_eq!(layer.count("default"), 1);
//! assert_eq!(layer.count("update"), 1);
//! assert!(engine.is_consent_mode_active());
//! ```

mod bridge;
mod error;
mod signal;
mod sink;

pub use crate::bridge::ConsentModeBridge;
pub use crate::error::{SignalError, SignalErrorExt};
pub use crate::signal::{ConsentSignal, ConsentStatus, SignalCommand};
pub use crate::sink::{DataLayer, SignalSink};
