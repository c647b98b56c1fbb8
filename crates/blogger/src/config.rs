//! Process-wide configuration values.
//!
//! Both structs are built once at startup, validated, and handed by value (or
//! behind an `Arc`) to the components that need them. Nothing mutates them
//! afterwards.

use std::time::Duration;

use crate::{ConfigError, SpaceKey};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default webhook path.
pub const DEFAULT_PATH: &str = "/event";

/// Default capacity of the receiver → publisher queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Default time a request waits for queue space before it is answered 503.
pub const DEFAULT_ENQUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on webhook body size. GitHub caps payloads at 25 MB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Default timeout for one Confluence API call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

// Credentials are held as `SecretString`. Its `Debug` output is redacted, so
// the configuration structs can be logged at startup.
pub use secrecy::{ExposeSecret, SecretString};

// ---------------------------------------------------------------------------
// Webhook server
// ---------------------------------------------------------------------------

/// Configuration of the webhook receiver.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    /// Exact request path webhooks are accepted on. Must start with `/`.
    pub path: String,

    /// HMAC secret shared with GitHub. Empty disables signature verification.
    pub secret: SecretString,

    /// Capacity of the bounded event queue. Must be positive.
    pub queue_capacity: usize,

    /// How long a request may wait for queue space before it is rejected.
    pub enqueue_timeout: Duration,

    /// Bodies larger than this are rejected without being buffered in full.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            secret: SecretString::from(""),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            enqueue_timeout: DEFAULT_ENQUEUE_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Checks the invariants the receiver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "path",
                message: format!("'{}' must start with '/'", self.path),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "queue-capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max-body-bytes",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Whether incoming requests must carry a valid `X-Hub-Signature`.
    pub fn verifies_signatures(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Confluence
// ---------------------------------------------------------------------------

/// Connection settings for the Confluence REST API.
#[derive(Debug, Clone)]
pub struct ConfluenceConfig {
    /// Site root, e.g. `https://mycompany.atlassian.net`.
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    /// Space new blog posts are created in.
    pub space_key: SpaceKey,
    pub request_timeout: Duration,
}

impl ConfluenceConfig {
    /// Builds a configuration, rejecting an empty base URL or space key.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
        space_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ConfigError::Missing { field: "url" });
        }
        let space_key = SpaceKey::new(space_key).ok_or(ConfigError::Missing { field: "space" })?;

        Ok(Self {
            base_url,
            username: username.into(),
            password,
            space_key,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
