//! Confluence REST API adapter.
//!
//! Implements the [`blogger::ContentPublisher`] port by creating content
//! through `POST {base}/wiki/rest/api/content/`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Authentication, headers, URL resolution, and response
//! classification live here. The publisher loop sees only the port.
//!
//! ## Transport
//!
//! - HTTP Basic authentication with the configured username and password.
//! - JSON request and response bodies (`Accept` and `Content-Type` are both
//!   `application/json`).
//! - A fixed `User-Agent` of `release-blogger/<version>`.
//! - One attempt per call, bounded by the configured request timeout.

use async_trait::async_trait;
use blogger::{
    ConfigError, ConfluenceConfig, Content, ContentPublisher, ExposeSecret, PublishError,
    SecretString,
};
use reqwest::header::ACCEPT;
use reqwest::{Method, Response, Url};
use tracing::debug;

/// Content endpoint, relative to the site root.
pub const CONTENT_PATH: &str = "wiki/rest/api/content/";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("release-blogger/", env!("CARGO_PKG_VERSION"));

const JSON_MEDIA_TYPE: &str = "application/json";

/// Client for one Confluence site.
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    http: reqwest::Client,
    content_url: Url,
    username: String,
    password: SecretString,
}

impl ConfluenceClient {
    /// Builds a client from validated configuration.
    ///
    /// Fails when the base URL is not an absolute `http`/`https` URL.
    pub fn new(config: &ConfluenceConfig) -> Result<Self, ConfigError> {
        let base = parse_base_url(&config.base_url)?;
        let content_url = base.join(CONTENT_PATH).map_err(|e| ConfigError::Invalid {
            field: "url",
            message: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "url",
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            content_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Fully resolved content endpoint.
    pub fn content_url(&self) -> &Url {
        &self.content_url
    }
}

#[async_trait]
impl ContentPublisher for ConfluenceClient {
    async fn create_content(&self, content: &Content) -> Result<Content, PublishError> {
        debug!(url = %self.content_url, title = %content.title, "Creating content");

        let response = self
            .http
            .request(Method::POST, self.content_url.clone())
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .json(content)
            .send()
            .await
            .map_err(|e| PublishError::Transport {
                message: e.to_string(),
            })?;

        let response = check_response(&Method::POST, response).await?;

        response
            .json::<Content>()
            .await
            .map_err(|e| PublishError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

/// Passes 2xx responses through; turns anything else into
/// [`PublishError::Api`] carrying the raw response payload.
pub async fn check_response(method: &Method, response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(PublishError::Api {
        method: method.to_string(),
        url,
        status: status.as_u16(),
        body,
    })
}

/// Parses the site root and makes sure it ends in `/`, so joining
/// [`CONTENT_PATH`] appends to any path prefix instead of replacing its last
/// segment.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        field: "url",
        message: format!("'{raw}': {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field: "url",
            message: format!("'{raw}': scheme must be http or https"),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use blogger::{BlogContent, SpaceKey};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(base_url: &str) -> ConfluenceConfig {
        ConfluenceConfig::new(base_url, "user", SecretString::from("pass"), "BLOG").unwrap()
    }

    fn post() -> Content {
        BlogContent::new("hello v1.0 - R1", SpaceKey::new("BLOG").unwrap(), "<p>hi</p>")
            .to_content()
    }

    // ── URL handling ──────────────────────────────────────────────────────────

    #[test]
    fn content_url_is_under_site_root() {
        let client = ConfluenceClient::new(&config("https://mycompany.atlassian.net")).unwrap();
        assert_eq!(
            client.content_url().as_str(),
            "https://mycompany.atlassian.net/wiki/rest/api/content/"
        );
    }

    #[test]
    fn content_url_keeps_path_prefix() {
        let client = ConfluenceClient::new(&config("https://example.com/confluence")).unwrap();
        assert_eq!(
            client.content_url().as_str(),
            "https://example.com/confluence/wiki/rest/api/content/"
        );
    }

    #[test]
    fn invalid_base_urls_are_rejected() {
        for raw in ["not a url", "ftp://example.com", "/relative/path"] {
            let err = ConfluenceClient::new(&config(raw)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "url", .. }),
                "{raw}: {err}"
            );
        }
    }

    #[test]
    fn user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("release-blogger/"));
    }

    // ── create_content (wiremock) ─────────────────────────────────────────────

    #[tokio::test]
    async fn create_sends_authenticated_json_and_decodes_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wiki/rest/api/content/"))
            .and(header("authorization", "Basic dXNlcjpwYXNz"))
            .and(header("accept", "application/json"))
            .and(header("content-type", "application/json"))
            .and(header("user-agent", USER_AGENT))
            .and(body_json(serde_json::json!({
                "type": "blogpost",
                "title": "hello v1.0 - R1",
                "space": { "key": "BLOG" },
                "body": { "storage": { "value": "<p>hi</p>", "representation": "storage" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "123",
                "type": "blogpost",
                "status": "current",
                "title": "hello v1.0 - R1",
                "space": { "key": "BLOG", "name": "Blog" },
                "body": { "storage": { "value": "<p>hi</p>", "representation": "storage" } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ConfluenceClient::new(&config(&server.uri())).unwrap();
        let created = client.create_content(&post()).await.unwrap();

        assert_eq!(created.content_type, "blogpost");
        assert_eq!(created.title, "hello v1.0 - R1");
        assert_eq!(created.body.storage.value, "<p>hi</p>");
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error_with_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/wiki/rest/api/content/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"statusCode":400,"message":"No space with key : NOPE"}"#),
            )
            .mount(&server)
            .await;

        let client = ConfluenceClient::new(&config(&server.uri())).unwrap();
        let err = client.create_content(&post()).await.unwrap_err();

        match err {
            PublishError::Api {
                method,
                url,
                status,
                body,
            } => {
                assert_eq!(method, "POST");
                assert!(url.ends_with("/wiki/rest/api/content/"));
                assert_eq!(status, 400);
                assert!(body.contains("No space with key"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorised_is_an_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = ConfluenceClient::new(&config(&server.uri())).unwrap();
        let err = client.create_content(&post()).await.unwrap_err();
        assert!(matches!(err, PublishError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = ConfluenceClient::new(&config(&server.uri())).unwrap();
        let err = client.create_content(&post()).await.unwrap_err();
        assert!(matches!(err, PublishError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn slow_server_is_a_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = config(&server.uri()).with_request_timeout(Duration::from_millis(100));
        let client = ConfluenceClient::new(&config).unwrap();
        let err = client.create_content(&post()).await.unwrap_err();
        assert!(matches!(err, PublishError::Transport { .. }));
    }
}
