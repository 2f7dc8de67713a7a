use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Directory not found{}: {message}", format_context(.context))]
    DirectoryNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Record encoding failure{}: {source}", format_context(.context))]
    Encode { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

/// Adds `.context(..)` to results that can be converted into [`StorageError`].
pub trait StorageErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StorageError>;
}

impl<T> StorageErrorExt<T> for Result<T, StorageError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                StorageError::InvalidKey { context: c, .. }
                | StorageError::DirectoryNotFound { context: c, .. }
                | StorageError::Io { context: c, .. }
                | StorageError::Encode { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> StorageErrorExt<T> for Result<T, std::io::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StorageError> {
        self.map_err(|source| StorageError::Io { source, context: Some(context.into()) })
    }
}

impl<T> StorageErrorExt<T> for Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StorageError> {
        self.map_err(|source| StorageError::Encode { source, context: Some(context.into()) })
    }
}

impl From<std::io::Error> for StorageError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(source: serde_json::Error) -> Self {
        Self::Encode { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
