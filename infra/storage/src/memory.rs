use crate::error::StorageError;
use crate::key::StorageKey;
use crate::store::PreferenceStore;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// Process-local store.
///
/// Clones share the same records, so a clone handed to a second engine behaves like the
/// same durable storage seen after a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<FxHashMap<StorageKey, Vec<u8>>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.records.read().get(key).cloned())
    }

    fn write(&self, key: &StorageKey, data: &[u8]) -> Result<(), StorageError> {
        self.records.write().insert(key.clone(), data.to_vec());
        trace!(%key, bytes = data.len(), "Record stored in memory");
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self.records.write().remove(key).is_some())
    }

    fn contains(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self.records.read().contains_key(key))
    }
}
