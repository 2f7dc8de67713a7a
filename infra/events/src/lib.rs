//! # Change notifications
//!
//! A typed fan-out channel ([`ChangeNotifier`]) over `tokio::sync::broadcast`, plus
//! [`EventReceiverExt`] for receivers that should survive lag instead of erroring.
//!
//! Publishing is synchronous, so state owners can notify from plain (non-async) code while
//! subscribers await on any runtime.
//!
//! # Example
//!
//! ```rust
//! use consent_events::{ChangeNotifier, EventReceiverExt};
//!
//! #[derive(Debug, PartialEq)]
//! struct Changed { id: u64 }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let notifier = ChangeNotifier::new();
//!     let mut rx = notifier.subscribe();
//!
//!     notifier.publish(Changed { id: 42 });
//!
//!     let event = rx.recv_event().await.unwrap();
//!     assert_eq!(event.id, 42);
//! }
//! ```

mod error;
mod notifier;
mod receiver;

pub use error::{EventError, EventErrorExt};
pub use notifier::{ChangeNotifier, DEFAULT_CAPACITY, Event};
pub use receiver::EventReceiverExt;
