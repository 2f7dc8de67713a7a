use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// The downstream signaling API rejected or could not receive a command.
    #[error("Signal sink failure{}: {message}", format_context(.context))]
    Sink { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Signal encoding failure{}: {source}", format_context(.context))]
    Encode { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

pub trait SignalErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SignalError>;
}

impl<T> SignalErrorExt<T> for Result<T, SignalError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                SignalError::Sink { context: c, .. } | SignalError::Encode { context: c, .. } => {
                    *c = Some(context.into());
                },
            }
            e
        })
    }
}

impl<T> SignalErrorExt<T> for Result<T, serde_json::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SignalError> {
        self.map_err(|source| SignalError::Encode { source, context: Some(context.into()) })
    }
}

impl From<serde_json::Error> for SignalError {
    fn from(source: serde_json::Error) -> Self {
        Self::Encode { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
