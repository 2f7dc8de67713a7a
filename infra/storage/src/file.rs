//! File-backed preference store.
//!
//! Each key maps to `<root>/<key>.json`. Writes go through an "atomic swap" (unique temp
//! file, `fsync`, rename) so a crash never leaves a half-written record behind.

use crate::builder::FileStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::key::StorageKey;
use crate::store::PreferenceStore;
use std::fs;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Temp names start with a dot, which no [`StorageKey`] may do.
pub(crate) const TMP_PREFIX: &str = ".consenttmp.";
const RECORD_EXTENSION: &str = "json";

/// The internal shared state of a [`FileStore`].
#[derive(Debug)]
pub struct FileStoreInner {
    /// Canonicalized directory holding one file per record.
    pub(crate) root: PathBuf,
    /// Counter used to generate unique temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A thread-safe handle to a directory of JSON records.
///
/// The handle is reference-counted and cheap to clone.
///
/// # Example
///
/// ```rust
/// use consent_storage::{FileStore, PreferenceStoreExt, StorageError, StorageKey};
///
/// # fn main() -> Result<(), StorageError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// let store = FileStore::builder().root(tmp.path().join("prefs")).create(true).open()?;
/// let key = StorageKey::try_from("cookieConsent")?;
///
/// store.save(&key, &vec![1, 2, 3])?;
/// let loaded: Vec<u8> = store.load_or_default(&key);
/// assert_eq!(loaded, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    pub(crate) inner: Arc<FileStoreInner>,
}

impl Deref for FileStore {
    type Target = FileStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FileStore {
    #[must_use = "The store is not usable until you call .open()"]
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    /// Canonical directory holding the records.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path of the record stored under `key`.
    #[must_use]
    pub fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(format!("{key}.{RECORD_EXTENSION}"))
    }

    fn sync_dir(path: &Path) {
        match fs::File::open(path) {
            Ok(dir) => {
                if let Err(err) = dir.sync_all() {
                    warn!(path = %path.display(), error = %err, "Directory sync failed");
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Directory open failed");
            },
        }
    }
}

impl PreferenceStore for FileStore {
    fn read(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", path.display()).into()),
            }),
        }
    }

    fn write(&self, key: &StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let target = self.path_for(key);
        let temp = unique_tmp_path(&target, &self.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &target) {
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&target)
                    .context(format!("Failed to replace existing record: {}", target.display()))?;
                fs::rename(&temp, &target).context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp);
                return Err(StorageError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        Self::sync_dir(&self.root);

        debug!(path = %target.display(), bytes = data.len(), "Record saved atomically");
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<bool, StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Record deleted");
                Ok(true)
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", path.display()).into()),
            }),
        }
    }

    fn contains(&self, key: &StorageKey) -> Result<bool, StorageError> {
        Ok(self.path_for(key).is_file())
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("record");
    let tmp_name = format!("{TMP_PREFIX}{file_name}.{}.{counter}", std::process::id());
    target.with_file_name(tmp_name)
}
