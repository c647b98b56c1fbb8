//! The publisher loop.
//!
//! Sole consumer of the event queue. Each event is turned into a blog post and
//! handed to a [`ContentPublisher`], one at a time, in arrival order. A failed
//! publish is logged together with the event and the loop moves on: there is
//! no retry and no dead-letter queue.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Sequences rendering (from the `blogger` crate) and
//! publishing (behind the port). Contains no transport code of its own.

use std::sync::Arc;

use blogger::{
    BlogContent, ContentPublisher, PublishError, QueuedEvent, ReleaseEvent, SpaceKey, Timestamp,
    WebhookEvent,
};
use tokio::sync::mpsc;
use tracing::{error, info, info_span, Instrument};

/// Counts of what the loop did over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub attempted: u64,
    pub published: u64,
    pub failed: u64,
}

/// Drains the event queue into blog posts.
pub struct PublisherLoop {
    publisher: Arc<dyn ContentPublisher>,
    space_key: SpaceKey,
}

impl PublisherLoop {
    /// Creates a loop publishing into `space_key` through `publisher`.
    pub fn new(publisher: Arc<dyn ContentPublisher>, space_key: SpaceKey) -> Self {
        Self {
            publisher,
            space_key,
        }
    }

    /// Consumes events until every producer has been dropped and the queue is
    /// empty.
    pub async fn run(self, mut events: mpsc::Receiver<QueuedEvent>) -> PublishSummary {
        let mut summary = PublishSummary::default();
        info!(space = %self.space_key, "Publisher loop started");

        while let Some(queued) = events.recv().await {
            summary.attempted += 1;

            let span = info_span!(
                "publish",
                receipt = %queued.receipt,
                event_type = queued.event.event_type()
            );
            let outcome = self.publish_one(&queued).instrument(span).await;

            match outcome {
                Ok(()) => summary.published += 1,
                Err(_) => summary.failed += 1,
            }
        }

        info!(
            attempted = summary.attempted,
            published = summary.published,
            failed = summary.failed,
            "Publisher loop stopped"
        );
        summary
    }

    async fn publish_one(&self, queued: &QueuedEvent) -> Result<(), PublishError> {
        let queued_ms = queued.received_at.millis_until(Timestamp::now());

        match &queued.event {
            WebhookEvent::Release(event) => match self.publish_release(event).await {
                Ok(title) => {
                    info!(title = %title, queued_ms, "Event published as blog entry");
                    Ok(())
                }
                Err(e) => {
                    error!(error = %e, event = ?event, queued_ms, "Create blog error");
                    Err(e)
                }
            },
        }
    }

    /// Renders and publishes one release, returning the published title.
    pub async fn publish_release(&self, event: &ReleaseEvent) -> Result<String, PublishError> {
        let post = BlogContent::from_release(event, &self.space_key);
        let created = self.publisher.create_content(&post.to_content()).await?;

        // Confluence echoes the title; fall back to ours if it did not.
        if created.title.is_empty() {
            Ok(post.title)
        } else {
            Ok(created.title)
        }
    }
}
