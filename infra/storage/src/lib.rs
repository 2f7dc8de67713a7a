//! Durable key-value storage for user preferences.
//!
//! A record is a whole JSON document stored under a [`StorageKey`]. Two backends implement
//! [`PreferenceStore`]:
//!
//! - **[`FileStore`]**: one `<key>.json` file per record under a root directory. Writes use an
//!   "atomic swap" (unique temp write + `fsync` + `rename`), and stale temp files left by an
//!   interrupted write are purged when the store is opened.
//! - **[`MemoryStore`]**: process-local map, shared between clones.
//!
//! [`PreferenceStoreExt`] layers typed JSON helpers over either backend. Loading never fails:
//! missing or malformed records fall back to a default value.
//!
//! # Examples
//!
//! ```rust
//! use consent_storage::{MemoryStore, PreferenceStore, PreferenceStoreExt, StorageKey};
//! use std::collections::BTreeMap;
//!
//! # fn main() -> Result<(), consent_storage::StorageError> {
//! let store = MemoryStore::new();
//! let key = StorageKey::try_from("cookieConsent")?;
//!
//! let empty: BTreeMap<String, bool> = store.load_or_default(&key);
//! assert!(empty.is_empty());
//!
//! store.save(&key, &BTreeMap::from([("ga".to_owned(), true)]))?;
//! assert!(store.contains(&key)?);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod file;
mod key;
mod maintenance;
mod memory;
mod store;

pub use builder::{FileStoreBuilder, NoRoot, WithRoot};
pub use error::{StorageError, StorageErrorExt};
pub use file::{FileStore, FileStoreInner};
pub use key::StorageKey;
pub use memory::MemoryStore;
pub use store::{PreferenceStore, PreferenceStoreExt};
