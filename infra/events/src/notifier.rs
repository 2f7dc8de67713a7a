use crate::error::EventError;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// 128 is plenty for UI-rate change notifications.
pub const DEFAULT_CAPACITY: usize = 128;

/// Marker trait for types that can be published through a [`ChangeNotifier`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Event for T {}

/// Fan-out channel for a single event type.
///
/// Publishing never blocks and never fails: with no subscribers the event is dropped, and a
/// subscriber that falls more than `capacity` events behind skips to the oldest retained one.
/// Cloned notifiers share the same channel.
#[derive(Debug, Clone)]
pub struct ChangeNotifier<E> {
    sender: broadcast::Sender<Arc<E>>,
}

impl<E: Event> Default for ChangeNotifier<E> {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender }
    }
}

impl<E: Event> ChangeNotifier<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`EventError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    /// ```rust
    /// use consent_events::ChangeNotifier;
    ///
    /// assert!(ChangeNotifier::<u8>::with_capacity(0).is_err());
    /// assert!(ChangeNotifier::<u8>::with_capacity(4).is_ok());
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, EventError> {
        if capacity == 0 {
            return Err(EventError::InvalidCapacity {
                message: "0".into(),
                context: Some(std::any::type_name::<E>().into()),
            });
        }
        let (sender, _) = broadcast::channel(capacity);
        Ok(Self { sender })
    }

    /// Opens a receiver that sees every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<E>> {
        self.sender.subscribe()
    }

    /// Publishes `event` and returns the number of receivers it reached.
    pub fn publish(&self, event: E) -> usize {
        self.publish_arc(Arc::new(event))
    }

    pub fn publish_arc(&self, event: Arc<E>) -> usize {
        self.sender.send(event).map_or_else(
            |_| {
                trace!(event = std::any::type_name::<E>(), "Event dropped: no active subscribers");
                0
            },
            |count| {
                trace!(event = std::any::type_name::<E>(), count, "Event dispatched");
                count
            },
        )
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
