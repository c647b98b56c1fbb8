//! Core domain for release-blogger.
//!
//! GitHub release webhooks come in, Confluence blog posts go out. This crate
//! holds everything in between that does not touch the network: the typed
//! events, the blog post rendering, configuration values, the shared error
//! types, and the [`ContentPublisher`] port.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** No I/O dependencies. The `listener`,
//! `publisher` and `confluence` crates supply the transports.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`events`] | `ReleaseEvent` and its decoder, queue item types |
//! | [`content`] | `BlogContent` rendering and the Confluence content model |
//! | [`config`] | `ServerConfig`, `ConfluenceConfig`, secret re-exports |
//! | [`identifiers`] | Newtype identifiers (`SpaceKey`, `ReceiptId`, ...) |
//! | [`types`] | Shared value types (`Timestamp`) |
//! | [`errors`] | `DecodeError`, `PublishError`, `ConfigError` |
//! | [`ports`] | The `ContentPublisher` trait |

pub mod config;
pub mod content;
pub mod errors;
pub mod events;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ConfluenceConfig, ExposeSecret, SecretString, ServerConfig};
pub use content::{
    release_body, release_title, BlogContent, Body, Content, Space, Storage, BLOG_POST_TYPE,
    STORAGE_REPRESENTATION,
};
pub use errors::{ConfigError, DecodeError, PublishError};
pub use events::{
    QueuedEvent, Release, ReleaseEvent, Repository, Sender, WebhookEvent, RELEASE_EVENT,
};
pub use identifiers::{ReceiptId, SpaceKey};
pub use ports::ContentPublisher;
pub use types::Timestamp;
