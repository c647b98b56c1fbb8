//! The bounded hand-off between webhook requests and the publisher loop.
//!
//! Many request handlers produce, one publisher consumes. A producer waits at
//! most the configured deadline for space; past it the event is dropped and
//! the request answered 503, so a stalled publisher cannot pile up waiting
//! tasks.

use std::time::Duration;

use blogger::QueuedEvent;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

/// Receiving half, owned by the publisher loop.
pub type EventReceiver = mpsc::Receiver<QueuedEvent>;

/// The event could not be handed to the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnqueueError {
    #[error("event queue still full after {waited:?}; event dropped")]
    Full {
        /// The deadline that elapsed.
        waited: Duration,
    },

    #[error("publisher is not running; event dropped")]
    Closed,
}

/// Producer handle, cloned into every request.
#[derive(Debug, Clone)]
pub struct EventQueue {
    sender: mpsc::Sender<QueuedEvent>,
    enqueue_timeout: Duration,
}

/// Creates a queue holding up to `capacity` events.
///
/// # Panics
///
/// Panics if `capacity` is zero; `ServerConfig::validate` rejects that value.
pub fn event_queue(capacity: usize, enqueue_timeout: Duration) -> (EventQueue, EventReceiver) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        EventQueue {
            sender,
            enqueue_timeout,
        },
        receiver,
    )
}

impl EventQueue {
    /// Hands `event` to the publisher, waiting at most the configured deadline.
    pub async fn enqueue(&self, event: QueuedEvent) -> Result<(), EnqueueError> {
        self.sender
            .send_timeout(event, self.enqueue_timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => EnqueueError::Full {
                    waited: self.enqueue_timeout,
                },
                SendTimeoutError::Closed(_) => EnqueueError::Closed,
            })
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }
}
