//! # Domain Models
//!
//! This crate contains the pure consent types with a single dependency (`serde`).
//! Keep it lean: no I/O, no locking, no logging, just data and simple helpers.
//!
//! * [`consent`] holds the persisted consent model (category decisions and per-service overrides).
//! * [`service`] holds the descriptors that dependent services declare at runtime.
//! * [`config`] holds the engine configuration tree.

pub mod config;
pub mod consent;
pub mod service;

pub use consent::{
    CategoryConsentPatch, CategoryConsents, ConsentCategory, ConsentSnapshot, ServiceOverrides,
    UnknownCategory,
};
pub use service::ServiceDescriptor;
