//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it only owns configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use consent_kernel::config::load_engine_config;
//!
//! let cfg = load_engine_config(Some("consent")).unwrap();
//! assert_eq!(cfg.prompt.privacy_policy_path, "/privacy");
//! ```
pub mod config;

pub use consent_domain as domain;
