//! release-blogger webhook receiver.
//!
//! Binds an HTTP server and receives GitHub webhook deliveries directly.
//! Each request is validated (method, path, event type, HMAC-SHA1 signature),
//! decoded into a typed [`blogger::WebhookEvent`], and handed to the publisher
//! loop through a bounded [`queue::EventQueue`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, signature checking, and the hand-off
//! queue live here. The `publisher` crate sees only the receiving half of the
//! queue.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`signature`] | HMAC-SHA1 computation and verification |
//! | [`router`] | Event-type → decoder routing table |
//! | [`queue`] | Bounded producer/consumer hand-off |
//! | [`receiver`] | The axum handler and its rejections |

use std::future::Future;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

pub mod queue;
pub mod receiver;
pub mod router;
pub mod signature;

pub use queue::{event_queue, EnqueueError, EventQueue, EventReceiver};
pub use receiver::{receive_webhook, WebhookReceiver, WebhookRejection};
pub use router::EventRouter;
pub use signature::{verify, verify_signature, SignatureError};

/// The server could not start or stopped abnormally.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Binds the listening socket on all interfaces.
///
/// Failing to bind is the one error that is fatal to the process.
pub async fn bind(port: u16) -> Result<TcpListener, ServeError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })
}

/// Serves `receiver` on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after `shutdown` fires. Dropping
/// the receiver on return closes the producer side of the queue, which lets
/// the publisher loop drain and stop.
pub async fn serve<F>(
    listener: TcpListener,
    receiver: WebhookReceiver,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr().map_err(ServeError::Serve)?;
    info!(
        addr = %local,
        path = %receiver.config().path,
        event_types = ?receiver.event_router().event_types(),
        verify_signatures = receiver.config().verifies_signatures(),
        "Listening for GitHub webhooks"
    );

    axum::serve(listener, receiver.into_router())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServeError::Serve)
}
