use std::borrow::Cow;

/// Errors that can occur while setting up change notifications.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub trait EventErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EventError>;
}

impl<T> EventErrorExt<T> for Result<T, EventError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                EventError::InvalidCapacity { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
