//! Error types shared across the release-blogger workspace.
//!
//! Errors local to one component (signature checks, HTTP rejections, queue
//! hand-off) live in the crate that owns that component. The types here cross
//! crate boundaries: they appear in the [`crate::ContentPublisher`] port or are
//! produced by domain functions every crate calls.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A webhook body could not be decoded into a typed event.
///
/// The receiver treats this as a terminal rejection: nothing is queued for a
/// body that fails to decode.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was not valid JSON, or was JSON of the wrong shape (e.g. an
    /// array where an object was expected).
    #[error("invalid {event_type} payload: {source}")]
    InvalidJson {
        /// Event type the body was decoded as.
        event_type: &'static str,
        /// Underlying parser error, including line and column.
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

/// Failure of the content-creation capability.
///
/// Publish errors are terminal for the one event being published; the
/// publisher loop logs them and moves on to the next event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The remote API answered with a status outside `200..=299`.
    ///
    /// The response payload is kept verbatim; Confluence reports validation
    /// problems (unknown space, duplicate title) in it.
    #[error("{method} {url}: {status} {body}")]
    Api {
        /// HTTP method of the failed request.
        method: String,
        /// Fully resolved request URL.
        url: String,
        /// HTTP status code returned.
        status: u16,
        /// Raw response payload (may be empty).
        body: String,
    },

    /// A 2xx response whose body could not be decoded as content.
    #[error("invalid response from content API: {message}")]
    InvalidResponse {
        /// Description of the decoding problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Startup configuration is unusable.
///
/// Produced once, before the server binds; the process never starts with an
/// invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting was not supplied.
    #[error("missing required setting '{field}'")]
    Missing {
        /// Name of the setting.
        field: &'static str,
    },

    /// A setting was supplied but its value is not acceptable.
    #[error("invalid value for '{field}': {message}")]
    Invalid {
        /// Name of the setting.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}
