//! Port traits implemented by infrastructure crates.

use async_trait::async_trait;

use crate::{Content, PublishError};

/// The content-creation capability the publisher loop depends on.
///
/// Implemented over HTTP by the `confluence` crate; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Creates `content` and returns the content as stored by the remote side.
    ///
    /// Implementations make exactly one attempt; retrying is the caller's
    /// decision.
    async fn create_content(&self, content: &Content) -> Result<Content, PublishError>;
}
