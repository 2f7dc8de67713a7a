use crate::error::{SignalError, SignalErrorExt};
use crate::signal::{ConsentSignal, SignalCommand};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::trace;

/// Downstream consent-signaling API.
pub trait SignalSink: Debug + Send + Sync {
    /// # Errors
    /// Returns [`SignalError::Sink`] if the command could not be delivered.
    fn emit(&self, command: SignalCommand) -> Result<(), SignalError>;
}

/// In-process stand-in for a page's `window.dataLayer`.
///
/// Every command is appended as its gtag argument list. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct DataLayer {
    entries: Arc<Mutex<Vec<Value>>>,
}

impl DataLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything pushed so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Value> {
        self.entries.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of entries whose action matches `action` (`"default"` or `"update"`).
    #[must_use]
    pub fn count(&self, action: &str) -> usize {
        self.entries.lock().iter().filter(|entry| entry[1] == action).count()
    }

    /// Script that installs `dataLayer`/`gtag` and issues the default command.
    ///
    /// Meant for the document head so the default lands before any tag loads.
    ///
    /// # Errors
    /// Returns [`SignalError::Encode`] if the signal cannot be serialized.
    pub fn bootstrap_script(signal: &ConsentSignal) -> Result<String, SignalError> {
        let payload = serde_json::to_string(signal).context("bootstrap default")?;
        Ok(format!(
            "window.dataLayer = window.dataLayer || [];\n\
             window.gtag = function gtag(){{dataLayer.push(arguments);}}\n\
             gtag('consent', 'default', {payload});\n"
        ))
    }
}

impl SignalSink for DataLayer {
    fn emit(&self, command: SignalCommand) -> Result<(), SignalError> {
        let value = command.to_value();
        trace!(command = %value, "Consent signal pushed to data layer");
        self.entries.lock().push(value);
        Ok(())
    }
}
