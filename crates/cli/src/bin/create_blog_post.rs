//! One-shot publisher: creates a single blog post in a Confluence space.
//!
//! Shares the Confluence flags and client with `release-blogger`, which makes
//! it handy for checking credentials and space permissions before wiring up
//! the webhook.

use anyhow::Context;
use blogger::{BlogContent, Content, ContentPublisher};
use clap::Parser;
use cli::args::CreateArgs;
use cli::observability;
use confluence::ConfluenceClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CreateArgs::parse();
    let telemetry = observability::init(args.logging.log_format, "create-blog-post")?;

    let result = create(&args).await;
    telemetry.shutdown();

    let content = result?;
    println!("{}", describe(&content));
    Ok(())
}

async fn create(args: &CreateArgs) -> anyhow::Result<Content> {
    let config = args
        .confluence
        .confluence_config()
        .context("invalid Confluence configuration")?;
    let client = ConfluenceClient::new(&config).context("invalid Confluence configuration")?;

    let post = BlogContent::new(&args.title, config.space_key, &args.body);
    client
        .create_content(&post.to_content())
        .await
        .context("create error")
}

fn describe(content: &Content) -> String {
    format!(
        "Published Content: {} {} {}",
        content.content_type, content.title, content.body.storage.value
    )
}
