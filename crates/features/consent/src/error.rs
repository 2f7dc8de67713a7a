use consent_storage::StorageError;
use std::borrow::Cow;

/// Errors surfaced by the consent engine.
#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    /// A service handle outlived the engine it was attached to.
    #[error("Consent engine unavailable{}: {message}", format_context(.context))]
    MissingContext { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },
}

pub trait ConsentErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConsentError>;
}

impl<T> ConsentErrorExt<T> for Result<T, ConsentError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                ConsentError::MissingContext { context: c, .. }
                | ConsentError::Storage { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> ConsentErrorExt<T> for Result<T, StorageError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConsentError> {
        self.map_err(|source| ConsentError::Storage { source, context: Some(context.into()) })
    }
}

impl From<StorageError> for ConsentError {
    fn from(source: StorageError) -> Self {
        Self::Storage { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
