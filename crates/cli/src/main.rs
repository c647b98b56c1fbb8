//! release-blogger entry point.
//!
//! This binary is the composition root for the service. Responsibilities:
//!
//! 1. **Parse configuration**: read flags (or their environment variables)
//!    and validate them into `ServerConfig` and `ConfluenceConfig`.
//! 2. **Wire observability**: install the tracing subscriber and, when
//!    configured, the OTLP exporter.
//! 3. **Construct infrastructure**: the Confluence client, the event queue,
//!    the webhook receiver, and the publisher loop.
//! 4. **Run**: serve webhooks until Ctrl-C / SIGTERM, then let the publisher
//!    drain whatever is already queued.
//!
//! Only a configuration error or a failure to bind the port ends the process
//! early; publish failures are logged and skipped.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::args::ServeArgs;
use cli::{observability, signal};
use confluence::ConfluenceClient;
use listener::{event_queue, WebhookReceiver};
use publisher::PublisherLoop;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();
    let telemetry = observability::init(args.logging.log_format, "release-blogger")?;

    let result = run(args).await;
    if let Err(e) = &result {
        error!(error = %format!("{e:#}"), "release-blogger stopped with an error");
    }

    telemetry.shutdown();
    result
}

async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let server_config = args
        .server_config()
        .context("invalid webhook server configuration")?;
    let confluence_config = args
        .confluence
        .confluence_config()
        .context("invalid Confluence configuration")?;
    let client =
        ConfluenceClient::new(&confluence_config).context("invalid Confluence configuration")?;

    info!(
        config = ?server_config,
        confluence = %client.content_url(),
        space = %confluence_config.space_key,
        "Starting release-blogger"
    );

    let socket = listener::bind(server_config.port)
        .await
        .context("failed to start webhook server")?;

    let (queue, events) = event_queue(server_config.queue_capacity, server_config.enqueue_timeout);
    let receiver = WebhookReceiver::new(server_config, queue);
    let publisher = PublisherLoop::new(Arc::new(client), confluence_config.space_key);
    let publishing = tokio::spawn(publisher.run(events));

    listener::serve(socket, receiver, signal::shutdown_signal())
        .await
        .context("webhook server failed")?;

    info!("Webhook server stopped; draining queued events");
    let summary = publishing.await.context("publisher loop panicked")?;
    info!(
        attempted = summary.attempted,
        published = summary.published,
        failed = summary.failed,
        "release-blogger stopped"
    );
    Ok(())
}
