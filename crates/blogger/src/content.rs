//! Blog post content: rendering from release events and the Confluence wire model.

use serde::{Deserialize, Serialize};

use crate::{ReleaseEvent, SpaceKey};

/// Confluence content type for blog posts.
pub const BLOG_POST_TYPE: &str = "blogpost";

/// Confluence's native rich-text body representation.
pub const STORAGE_REPRESENTATION: &str = "storage";

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

/// A piece of Confluence content: a page or a blog post.
///
/// Used both as the create request and to decode the created content the API
/// echoes back. Every field defaults so partial responses still decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// `"page"` or `"blogpost"`.
    #[serde(rename = "type", default)]
    pub content_type: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub space: Space,

    #[serde(default)]
    pub body: Body,
}

/// The space content lives in, addressed by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    #[serde(default)]
    pub key: String,
}

/// Content body; only the storage representation is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub storage: Storage,
}

/// A body value together with the format it is expressed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub value: String,

    #[serde(default)]
    pub representation: String,
}

// ---------------------------------------------------------------------------
// Blog content
// ---------------------------------------------------------------------------

/// A blog post ready to publish.
///
/// Derived deterministically from a [`ReleaseEvent`] and the configured space;
/// has no identity beyond the publish attempt it is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogContent {
    pub title: String,
    pub space_key: SpaceKey,
    /// Body in Confluence storage format.
    pub body_html: String,
}

impl BlogContent {
    /// Creates blog content from already-rendered parts.
    pub fn new(title: impl Into<String>, space_key: SpaceKey, body_html: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            space_key,
            body_html: body_html.into(),
        }
    }

    /// Renders the announcement post for a release.
    pub fn from_release(event: &ReleaseEvent, space_key: &SpaceKey) -> Self {
        Self::new(release_title(event), space_key.clone(), release_body(event))
    }

    /// Converts to the content-creation request shape.
    pub fn to_content(&self) -> Content {
        Content {
            content_type: BLOG_POST_TYPE.to_string(),
            title: self.title.clone(),
            space: Space {
                key: self.space_key.as_str().to_string(),
            },
            body: Body {
                storage: Storage {
                    value: self.body_html.clone(),
                    representation: STORAGE_REPRESENTATION.to_string(),
                },
            },
        }
    }
}

/// `"<repo> <tag> - <release name>"`.
pub fn release_title(event: &ReleaseEvent) -> String {
    format!(
        "{} {} - {}",
        event.repository.name, event.release.tag_name, event.release.name
    )
}

/// Renders the post body.
///
/// Every GitHub-supplied field is HTML-escaped except the release notes. The
/// release body is inserted verbatim: release authors are trusted, and their
/// markup is published as written.
pub fn release_body(event: &ReleaseEvent) -> String {
    let login = escape_html(&event.sender.login);
    format!(
        concat!(
            "<h4>\n",
            "  <p>\n",
            "    <img alt=\"@{login}\" class=\"avatar\" height=\"20\" src=\"{avatar}&amp;s=40\" width=\"20\"></img>\n",
            "    <a href=\"{profile}\">{login}</a> created release <a href=\"{release_url}\">{tag}</a>\n",
            "    of <a href=\"{repo_url}\">{repo}</a>.\n",
            "  </p>\n",
            "</h4>\n",
            "<p>{notes}</p>\n",
        ),
        login = login,
        avatar = escape_html(&event.sender.avatar_url),
        profile = escape_html(event.sender.profile_link()),
        release_url = escape_html(&event.release.html_url),
        tag = escape_html(&event.release.tag_name),
        repo_url = escape_html(&event.repository.html_url),
        repo = escape_html(&event.repository.name),
        notes = event.release.body,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Release, Repository, Sender};

    fn sample_event() -> ReleaseEvent {
        ReleaseEvent {
            action: "published".into(),
            release: Release {
                tag_name: "v1.0".into(),
                name: "First".into(),
                body: "<ul><li>fast</li></ul>".into(),
                html_url: "https://github.com/octo/hello/releases/tag/v1.0".into(),
            },
            repository: Repository {
                name: "hello".into(),
                html_url: "https://github.com/octo/hello".into(),
            },
            sender: Sender {
                login: "octocat".into(),
                url: "https://api.github.com/users/octocat".into(),
                html_url: String::new(),
                avatar_url: "https://avatars.example.com/u/1?v=4".into(),
            },
        }
    }

    fn space() -> SpaceKey {
        SpaceKey::new("BLOG").unwrap()
    }

    #[test]
    fn title_joins_repo_tag_and_name() {
        assert_eq!(release_title(&sample_event()), "hello v1.0 - First");
    }

    #[test]
    fn body_embeds_sender_release_and_repository_links() {
        let body = release_body(&sample_event());

        assert!(body.contains(r#"src="https://avatars.example.com/u/1?v=4&amp;s=40""#));
        assert!(body.contains(r#"<a href="https://api.github.com/users/octocat">octocat</a>"#));
        assert!(body.contains(
            r#"<a href="https://github.com/octo/hello/releases/tag/v1.0">v1.0</a>"#
        ));
        assert!(body.contains(r#"of <a href="https://github.com/octo/hello">hello</a>."#));
    }

    #[test]
    fn release_notes_pass_through_unescaped() {
        let body = release_body(&sample_event());
        assert!(body.contains("<p><ul><li>fast</li></ul></p>"));
    }

    #[test]
    fn other_fields_are_escaped() {
        let mut event = sample_event();
        event.repository.name = "<script>".into();
        event.sender.login = "a\"b".into();

        let body = release_body(&event);
        assert!(body.contains("&lt;script&gt;"));
        assert!(body.contains("alt=\"@a&#34;b\""));
        assert!(!body.contains("<script>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let event = sample_event();
        assert_eq!(
            BlogContent::from_release(&event, &space()),
            BlogContent::from_release(&event, &space())
        );
    }

    #[test]
    fn to_content_builds_a_storage_blogpost() {
        let content = BlogContent::new("Title", space(), "<p>x</p>").to_content();

        assert_eq!(content.content_type, "blogpost");
        assert_eq!(content.title, "Title");
        assert_eq!(content.space.key, "BLOG");
        assert_eq!(content.body.storage.value, "<p>x</p>");
        assert_eq!(content.body.storage.representation, "storage");
    }

    #[test]
    fn content_serialises_to_the_api_shape() {
        let json = serde_json::to_value(BlogContent::new("T", space(), "<p/>").to_content()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "blogpost",
                "title": "T",
                "space": { "key": "BLOG" },
                "body": { "storage": { "value": "<p/>", "representation": "storage" } }
            })
        );
    }

    #[test]
    fn content_decodes_api_responses_with_extra_fields() {
        let content: Content = serde_json::from_str(
            r#"{"id":"98","type":"blogpost","status":"current","title":"T",
                "space":{"id":1,"key":"BLOG","name":"Blog"},
                "body":{"storage":{"value":"<p/>","representation":"storage"}}}"#,
        )
        .unwrap();
        assert_eq!(content.title, "T");
        assert_eq!(content.body.storage.value, "<p/>");
    }
}
