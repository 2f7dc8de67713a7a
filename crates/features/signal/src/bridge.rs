use crate::error::SignalError;
use crate::signal::{ConsentSignal, SignalCommand};
use crate::sink::SignalSink;
use consent_core::{ConsentEngine, ConsentEvent};
use consent_domain::CategoryConsents;
use consent_events::EventReceiverExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Relays the engine's category decisions to a [`SignalSink`].
///
/// The first sync emits a default (with the settle budget) and marks consent mode active;
/// later syncs emit an update only when the category decisions changed since the last
/// emitted command.
#[derive(Debug)]
pub struct ConsentModeBridge {
    engine: ConsentEngine,
    relay: Relay,
}

#[derive(Debug)]
struct Relay {
    sink: Arc<dyn SignalSink>,
    wait_for_update: Duration,
    last: Mutex<Option<CategoryConsents>>,
}

impl ConsentModeBridge {
    #[must_use]
    pub fn new(engine: ConsentEngine, sink: impl SignalSink + 'static) -> Self {
        Self::with_shared_sink(engine, Arc::new(sink))
    }

    #[must_use]
    pub fn with_shared_sink(engine: ConsentEngine, sink: Arc<dyn SignalSink>) -> Self {
        let wait_for_update = engine.config().signal.wait_for_update();
        Self { engine, relay: Relay { sink, wait_for_update, last: Mutex::new(None) } }
    }

    /// Emits whatever the current state calls for. Returns the command sent, if any.
    ///
    /// # Errors
    /// Returns the sink's error; consent mode stays inactive if the default failed.
    pub fn sync(&self) -> Result<Option<SignalCommand>, SignalError> {
        self.relay.sync(&self.engine)
    }

    /// Syncs once, then again after every consent change.
    ///
    /// Holds only a weak engine reference while waiting, so the loop ends once every other
    /// engine handle is dropped and the event channel closes.
    pub async fn run(self, mut events: broadcast::Receiver<Arc<ConsentEvent>>) {
        let Self { engine, relay } = self;
        relay.sync_logged(&engine);
        let weak = engine.downgrade();
        drop(engine);

        while let Some(event) = events.recv_event().await {
            if !matches!(*event, ConsentEvent::ConsentChanged(_)) {
                continue;
            }
            let Some(engine) = weak.upgrade() else {
                break;
            };
            relay.sync_logged(&engine);
        }

        debug!("Consent event channel closed; bridge stopped");
    }

    /// Starts [`ConsentModeBridge::run`] on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        let events = self.engine.subscribe();
        tokio::spawn(self.run(events))
    }
}

impl Relay {
    fn sync(&self, engine: &ConsentEngine) -> Result<Option<SignalCommand>, SignalError> {
        let mut last = self.last.lock();
        let categories = engine.category_consents();
        let active = engine.is_consent_mode_active();

        if active && *last == Some(categories) {
            return Ok(None);
        }

        let signal = ConsentSignal::from_categories(&categories);
        let command = if active {
            SignalCommand::Update(signal)
        } else {
            SignalCommand::Default(signal.with_wait_for_update(self.wait_for_update))
        };

        self.sink.emit(command)?;
        *last = Some(categories);
        drop(last);

        if active {
            debug!(%command, "Consent update signalled");
        } else {
            info!(%command, "Consent mode default signalled");
            engine.set_consent_mode_active(true);
        }

        Ok(Some(command))
    }

    fn sync_logged(&self, engine: &ConsentEngine) {
        if let Err(err) = self.sync(engine) {
            error!(error = %err, "Failed to signal consent mode");
        }
    }
}
