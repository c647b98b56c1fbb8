//! Webhook endpoint handler.
//!
//! Every request goes through the same checks, in order, and the first one to
//! fail answers the request:
//!
//! | Step | Failure | Status |
//! |------|---------|--------|
//! | method is `POST` | other method | 405 |
//! | path equals the configured path | other path | 404 |
//! | `X-GitHub-Event` present | missing | 400 |
//! | event type has a route | unknown type | 400 |
//! | body readable within the size cap | read error | 500 |
//! | `X-Hub-Signature` valid (secret configured) | missing / mismatch | 403 |
//! | body decodes | decode error | 500 |
//! | queue accepts the event before the deadline | full / closed | 503 |
//!
//! A request that passes all of them has its event queued and is answered 200
//! with a plain-text summary of the event.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use blogger::{DecodeError, ExposeSecret, QueuedEvent, ServerConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::queue::{EnqueueError, EventQueue};
use crate::router::EventRouter;
use crate::signature::{verify_signature, SignatureError};

/// Header name for the GitHub event type.
pub const HEADER_EVENT: &str = "x-github-event";
/// Header name for the HMAC-SHA1 signature.
pub const HEADER_SIGNATURE: &str = "x-hub-signature";
/// Header name for GitHub's delivery id; logged only.
pub const HEADER_DELIVERY: &str = "x-github-delivery";

/// Why a webhook request was refused.
#[derive(Debug, Error)]
pub enum WebhookRejection {
    #[error("method {method} not allowed")]
    MethodNotAllowed { method: Method },

    #[error("not found")]
    NotFound,

    #[error("missing X-GitHub-Event header")]
    MissingEventHeader,

    #[error("unknown event type '{event_type}'")]
    UnknownEventType { event_type: String },

    #[error("failed to read request body: {message}")]
    BodyRead { message: String },

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Enqueue(#[from] EnqueueError),
}

impl WebhookRejection {
    /// HTTP status the rejection is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookRejection::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            WebhookRejection::NotFound => StatusCode::NOT_FOUND,
            WebhookRejection::MissingEventHeader | WebhookRejection::UnknownEventType { .. } => {
                StatusCode::BAD_REQUEST
            }
            WebhookRejection::BodyRead { .. } | WebhookRejection::Decode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebhookRejection::Signature(_) => StatusCode::FORBIDDEN,
            WebhookRejection::Enqueue(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

// ---------------------------------------------------------------------------
// Receiver
// ---------------------------------------------------------------------------

/// The webhook receiver: configuration, routing table, and queue producer.
///
/// Cheap to clone; this is the axum state shared by every request.
#[derive(Clone)]
pub struct WebhookReceiver {
    inner: Arc<ReceiverInner>,
}

struct ReceiverInner {
    config: ServerConfig,
    router: EventRouter,
    queue: EventQueue,
}

impl WebhookReceiver {
    /// Creates a receiver accepting `release` events.
    pub fn new(config: ServerConfig, queue: EventQueue) -> Self {
        Self::with_router(config, EventRouter::default(), queue)
    }

    /// Creates a receiver with a custom routing table.
    pub fn with_router(config: ServerConfig, router: EventRouter, queue: EventQueue) -> Self {
        Self {
            inner: Arc::new(ReceiverInner {
                config,
                router,
                queue,
            }),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn event_router(&self) -> &EventRouter {
        &self.inner.router
    }

    /// Builds the axum app.
    ///
    /// The receiver is installed as the fallback so it sees every request and
    /// applies the method check before the path check.
    pub fn into_router(self) -> Router {
        Router::new().fallback(receive_webhook).with_state(self)
    }

    async fn handle(&self, request: Request) -> Result<String, WebhookRejection> {
        let (parts, body) = request.into_parts();

        if parts.method != Method::POST {
            return Err(WebhookRejection::MethodNotAllowed {
                method: parts.method,
            });
        }
        if parts.uri.path() != self.config().path {
            return Err(WebhookRejection::NotFound);
        }

        let event_type =
            header_value(&parts.headers, HEADER_EVENT).ok_or(WebhookRejection::MissingEventHeader)?;
        let decode = self.event_router().route(event_type).ok_or_else(|| {
            WebhookRejection::UnknownEventType {
                event_type: event_type.to_string(),
            }
        })?;

        let raw = read_body(body, self.config().max_body_bytes).await?;

        verify_signature(
            self.config().secret.expose_secret().as_bytes(),
            &raw,
            header_value(&parts.headers, HEADER_SIGNATURE),
        )?;

        let event = decode(&raw)?;
        let summary = event.to_string();

        let queued = QueuedEvent::new(event);
        let receipt = queued.receipt;
        self.inner.queue.enqueue(queued).await?;

        info!(
            receipt = %receipt,
            delivery = header_value(&parts.headers, HEADER_DELIVERY).unwrap_or("-"),
            event_type = %event_type,
            "Webhook accepted"
        );

        Ok(summary)
    }
}

/// Axum handler wrapping [`WebhookReceiver::handle`].
pub async fn receive_webhook(State(receiver): State<WebhookReceiver>, request: Request) -> Response {
    debug!(method = %request.method(), path = %request.uri().path(), "Received request");

    match receiver.handle(request).await {
        Ok(summary) => (StatusCode::OK, summary).into_response(),
        Err(rejection) => {
            warn!(
                status = rejection.status().as_u16(),
                reason = %rejection,
                "Webhook rejected"
            );
            rejection.into_response()
        }
    }
}

/// Returns a header as a non-empty string, treating unreadable values as absent.
fn header_value<'a>(headers: &'a HeaderMap, name: &'static str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

async fn read_body(body: Body, limit: usize) -> Result<axum::body::Bytes, WebhookRejection> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| WebhookRejection::BodyRead {
            message: e.to_string(),
        })
}
