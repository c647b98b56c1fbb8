//! Event-type routing table.
//!
//! Maps `X-GitHub-Event` header values to the decoder that turns a body into a
//! [`WebhookEvent`] variant. Types without an entry are rejected by the
//! receiver before the body is read. Supporting another event type means adding
//! a `WebhookEvent` variant and a route; the validation chain is untouched.

use std::collections::HashMap;

use blogger::{DecodeError, ReleaseEvent, WebhookEvent, RELEASE_EVENT};

/// Decodes a raw body into one event variant.
pub type DecodeFn = fn(&[u8]) -> Result<WebhookEvent, DecodeError>;

#[derive(Debug, Clone)]
pub struct EventRouter {
    routes: HashMap<&'static str, DecodeFn>,
}

impl EventRouter {
    /// A router that rejects every event type.
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// A router that accepts `release` events only.
    pub fn releases() -> Self {
        Self::empty().with_route(RELEASE_EVENT, decode_release)
    }

    /// Registers (or replaces) the decoder for `event_type`.
    #[must_use]
    pub fn with_route(mut self, event_type: &'static str, decode: DecodeFn) -> Self {
        self.routes.insert(event_type, decode);
        self
    }

    /// Looks up the decoder for `event_type`. Matching is exact.
    pub fn route(&self, event_type: &str) -> Option<DecodeFn> {
        self.routes.get(event_type).copied()
    }

    /// Registered event types, sorted.
    pub fn event_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.routes.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::releases()
    }
}

fn decode_release(raw: &[u8]) -> Result<WebhookEvent, DecodeError> {
    ReleaseEvent::decode(raw).map(WebhookEvent::Release)
}
