use crate::error::{StorageError, StorageErrorExt};
use crate::key::StorageKey;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, warn};

/// Byte-level contract of a durable preference store.
///
/// Writes are whole-value replacements with last-write-wins semantics; there is no merge
/// and no transaction at this layer.
pub trait PreferenceStore: Debug + Send + Sync {
    /// Returns the stored bytes, or `None` when no record exists for `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the backend cannot be read.
    fn read(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the record stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the backend cannot be written.
    fn write(&self, key: &StorageKey, data: &[u8]) -> Result<(), StorageError>;

    /// Deletes the record. Returns `false` if there was nothing to delete.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the backend cannot be modified.
    fn remove(&self, key: &StorageKey) -> Result<bool, StorageError>;

    /// Checks whether a record (well-formed or not) exists under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the backend cannot be inspected.
    fn contains(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self.read(key)?.is_some())
    }
}

/// Typed JSON helpers on top of any [`PreferenceStore`].
pub trait PreferenceStoreExt: PreferenceStore {
    /// Loads and decodes the record under `key`.
    ///
    /// Never fails: a missing record, an unreadable backend or a record that does not decode
    /// as `T` all yield `default()`. The latter two are logged as warnings.
    fn load_or_else<T, F>(&self, key: &StorageKey, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.read(key) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(err) => {
                    warn!(%key, error = %err, "Stored record is malformed; using default");
                    default()
                },
            },
            Ok(None) => {
                debug!(%key, "No stored record; using default");
                default()
            },
            Err(err) => {
                warn!(%key, error = %err, "Stored record is unreadable; using default");
                default()
            },
        }
    }

    /// [`PreferenceStoreExt::load_or_else`] with `T::default()`.
    fn load_or_default<T>(&self, key: &StorageKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.load_or_else(key, T::default)
    }

    /// Encodes `value` as JSON and replaces the record under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::Encode`] if `value` cannot be serialized, or the backend's
    /// write error.
    fn save<T>(&self, key: &StorageKey, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value).context(format!("Encoding record {key}"))?;
        self.write(key, &bytes)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStoreExt for S {}
