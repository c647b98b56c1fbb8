//! Command-line arguments.
//!
//! Every flag can also be supplied through the environment variable named in
//! its help text, which keeps secrets out of process listings. Parsed flags are
//! converted once into the immutable configuration values from `blogger`.

use std::time::Duration;

use blogger::config::{
    DEFAULT_ENQUEUE_TIMEOUT, DEFAULT_MAX_BODY_BYTES, DEFAULT_PATH, DEFAULT_PORT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_REQUEST_TIMEOUT,
};
use blogger::{ConfigError, ConfluenceConfig, SecretString, ServerConfig};
use clap::{Args, Parser, ValueEnum};

const SERVE_EXAMPLE: &str = "EXAMPLE:
    release-blogger \\
      --port 8080 \\
      --secret my-github-hmac-secret \\
      --space BLOG \\
      --url https://mycompany.atlassian.net \\
      --username my-confluence-username \\
      --password my-confluence-password";

const CREATE_EXAMPLE: &str = "EXAMPLE:
    create-blog-post --url https://mycompany.atlassian.net --username jdoe --password secret \\
      --space ENG --title 'My First Post' --body '<p>check this out</p><p>cool huh</p>'";

// ---------------------------------------------------------------------------
// Shared groups
// ---------------------------------------------------------------------------

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct LoggingArgs {
    /// Log output format. Verbosity is controlled by RUST_LOG.
    #[arg(long, env = "RELEASE_BLOGGER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Args)]
pub struct ConfluenceArgs {
    /// The space to which blog entries are posted
    #[arg(short = 'S', long, env = "CONFLUENCE_SPACE")]
    pub space: String,

    /// Web URL hosting your instance of Confluence
    #[arg(short = 'u', long, env = "CONFLUENCE_URL")]
    pub url: String,

    /// Your Confluence username
    #[arg(short = 'U', long, env = "CONFLUENCE_USERNAME", default_value = "")]
    pub username: String,

    /// Your Confluence password or API token
    #[arg(short = 'P', long, env = "CONFLUENCE_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Timeout for each Confluence API call, in seconds
    #[arg(long, env = "CONFLUENCE_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,
}

impl ConfluenceArgs {
    pub fn confluence_config(&self) -> Result<ConfluenceConfig, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request-timeout-secs",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(ConfluenceConfig::new(
            &self.url,
            &self.username,
            SecretString::from(self.password.as_str()),
            &self.space,
        )?
        .with_request_timeout(Duration::from_secs(self.request_timeout_secs)))
    }
}

// ---------------------------------------------------------------------------
// release-blogger
// ---------------------------------------------------------------------------

/// A web service that listens to GitHub release webhooks and publishes each
/// release to a Confluence blog.
#[derive(Debug, Parser)]
#[command(name = "release-blogger", version, after_help = SERVE_EXAMPLE)]
pub struct ServeArgs {
    /// Port on which to listen for GitHub webhooks
    #[arg(short = 'p', long, env = "RELEASE_BLOGGER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Request path webhooks are delivered to
    #[arg(long, env = "RELEASE_BLOGGER_PATH", default_value = DEFAULT_PATH)]
    pub path: String,

    /// GitHub secret for HMAC verification. Empty disables verification.
    #[arg(short = 's', long, env = "GITHUB_WEBHOOK_SECRET", default_value = "", hide_env_values = true)]
    pub secret: String,

    /// Number of accepted events that may wait for publishing
    #[arg(long, env = "RELEASE_BLOGGER_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Seconds a webhook request waits for queue space before it is answered 503
    #[arg(long, env = "RELEASE_BLOGGER_ENQUEUE_TIMEOUT_SECS", default_value_t = DEFAULT_ENQUEUE_TIMEOUT.as_secs())]
    pub enqueue_timeout_secs: u64,

    /// Largest accepted webhook body, in bytes
    #[arg(long, env = "RELEASE_BLOGGER_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    #[command(flatten)]
    pub confluence: ConfluenceArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ServeArgs {
    /// Builds and validates the receiver configuration.
    pub fn server_config(&self) -> Result<ServerConfig, ConfigError> {
        let config = ServerConfig {
            port: self.port,
            path: self.path.clone(),
            secret: SecretString::from(self.secret.as_str()),
            queue_capacity: self.queue_capacity,
            enqueue_timeout: Duration::from_secs(self.enqueue_timeout_secs),
            max_body_bytes: self.max_body_bytes,
        };
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// create-blog-post
// ---------------------------------------------------------------------------

/// Creates a new blog entry within the given Confluence space.
#[derive(Debug, Parser)]
#[command(name = "create-blog-post", version, after_help = CREATE_EXAMPLE)]
pub struct CreateArgs {
    /// Title of the post you are creating
    #[arg(short = 't', long, default_value = "My first command line blog post")]
    pub title: String,

    /// Content of the post, in Confluence storage format
    #[arg(short = 'b', long, default_value = "<p>Main content will appear here</p>")]
    pub body: String,

    #[command(flatten)]
    pub confluence: ConfluenceArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}
