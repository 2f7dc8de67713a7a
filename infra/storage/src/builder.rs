use crate::error::{StorageError, StorageErrorExt};
use crate::file::{FileStore, FileStoreInner};
use crate::maintenance;
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct FileStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    create: bool,
}

impl Default for FileStoreBuilder<NoRoot> {
    fn default() -> Self {
        Self { state: NoRoot, create: true }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> FileStoreBuilder<S> {
    #[must_use = "Sets whether the root directory should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }
}

impl FileStoreBuilder<NoRoot> {
    #[must_use = "Creates a new file store builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the directory holding the records"]
    pub fn root(self, path: impl Into<PathBuf>) -> FileStoreBuilder<WithRoot> {
        FileStoreBuilder { state: WithRoot(path.into()), create: self.create }
    }
}

impl FileStoreBuilder<WithRoot> {
    /// Consumes the configuration and opens the store.
    ///
    /// Boot sequence:
    /// 1. **Bootstrapping**: creates the root directory if `create(true)` was set.
    /// 2. **Canonicalization**: resolves the root to an absolute physical path.
    /// 3. **Self-Healing**: removes stale temp files left behind by interrupted writes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DirectoryNotFound`] if the root does not exist and `create`
    /// is false, or [`StorageError::Io`] if it cannot be created or resolved.
    pub fn open(self) -> Result<FileStore, StorageError> {
        let root = &self.state.0;

        if self.create {
            fs::create_dir_all(root)
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped preference store root");
        } else if !root.is_dir() {
            return Err(StorageError::DirectoryNotFound {
                message: root.display().to_string().into(),
                context: Some("Store root must exist when create(false) is set".into()),
            });
        }

        let canonical = fs::canonicalize(root)
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let store = FileStore {
            inner: Arc::new(FileStoreInner { root: canonical, tmp_counter: AtomicU64::new(1) }),
        };

        maintenance::purge_tmp(store.root());

        Ok(store)
    }
}
