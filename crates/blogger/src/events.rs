//! Typed GitHub webhook events.
//!
//! Only the fields the blog post needs are modelled. GitHub payloads carry far
//! more; unknown fields are ignored, and absent or `null` fields decode to
//! empty values so a sparse payload still renders.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{DecodeError, ReceiptId, Timestamp};

/// `X-GitHub-Event` value for release events.
pub const RELEASE_EVENT: &str = "release";

/// Treats an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Release event
// ---------------------------------------------------------------------------

/// A GitHub `release` webhook payload.
///
/// Immutable once decoded. Consumed exactly once by the publisher loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// What happened to the release (`"published"`, `"edited"`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub release: Release,

    #[serde(default, deserialize_with = "null_as_default")]
    pub repository: Repository,

    /// The user whose action triggered the event.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sender: Sender,
}

/// Release metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_name: String,

    /// Release title. GitHub sends `null` for releases created without one.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Release notes as written by the release author.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
}

/// Repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,
}

/// Sender metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,

    /// API URL of the user (`https://api.github.com/users/<login>`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Browser URL of the user's profile. Preferred over [`Sender::url`] for
    /// links when present.
    #[serde(default, deserialize_with = "null_as_default")]
    pub html_url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

impl Sender {
    /// The link rendered for the sender: the profile page when GitHub supplied
    /// one, otherwise the API URL.
    ///
    /// Older renderings of this post linked [`Sender::url`] unconditionally,
    /// which points readers at a JSON document. The profile page is chosen on
    /// purpose; `url` remains the fallback for payloads without `html_url`.
    pub fn profile_link(&self) -> &str {
        if self.html_url.is_empty() {
            &self.url
        } else {
            &self.html_url
        }
    }
}

impl ReleaseEvent {
    /// Decodes a raw webhook body.
    ///
    /// Decoding is deterministic: the same bytes always yield structurally
    /// equal events.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(raw).map_err(|source| DecodeError::InvalidJson {
            event_type: RELEASE_EVENT,
            source,
        })
    }
}

/// Plain-text summary returned to the webhook caller.
impl std::fmt::Display for ReleaseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "action: {}", self.action)?;
        writeln!(f, "sender: {}", self.sender.login)?;
        writeln!(f, "repo:   {}", self.repository.name)?;
        writeln!(f, "tag:    {}", self.release.tag_name)?;
        writeln!(f, "body:   {}", self.release.body)
    }
}

// ---------------------------------------------------------------------------
// Queue items
// ---------------------------------------------------------------------------

/// A decoded webhook event, tagged by event type.
///
/// Each variant corresponds to one entry in the receiver's event routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    Release(ReleaseEvent),
}

impl WebhookEvent {
    /// The `X-GitHub-Event` value this variant was decoded from.
    pub fn event_type(&self) -> &'static str {
        match self {
            WebhookEvent::Release(_) => RELEASE_EVENT,
        }
    }
}

impl std::fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookEvent::Release(event) => event.fmt(f),
        }
    }
}

/// An event on its way from the receiver to the publisher loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEvent {
    pub receipt: ReceiptId,
    pub received_at: Timestamp,
    pub event: WebhookEvent,
}

impl QueuedEvent {
    /// Stamps `event` with a fresh receipt id and the current time.
    pub fn new(event: WebhookEvent) -> Self {
        Self {
            receipt: ReceiptId::new_random(),
            received_at: Timestamp::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "action": "published",
        "release": {
            "id": 1,
            "tag_name": "v1.0",
            "name": "R1",
            "body": "hi",
            "html_url": "https://github.com/octo/hello/releases/tag/v1.0",
            "draft": false
        },
        "repository": {
            "id": 7,
            "name": "hello",
            "full_name": "octo/hello",
            "html_url": "https://github.com/octo/hello"
        },
        "sender": {
            "login": "octocat",
            "url": "https://api.github.com/users/octocat",
            "html_url": "https://github.com/octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4",
            "type": "User"
        }
    }"#;

    #[test]
    fn decode_reads_the_modelled_fields() {
        let event = ReleaseEvent::decode(PAYLOAD.as_bytes()).unwrap();

        assert_eq!(event.action, "published");
        assert_eq!(event.release.tag_name, "v1.0");
        assert_eq!(event.release.name, "R1");
        assert_eq!(event.release.body, "hi");
        assert_eq!(event.repository.name, "hello");
        assert_eq!(event.sender.login, "octocat");
        assert_eq!(
            event.sender.avatar_url,
            "https://avatars.githubusercontent.com/u/1?v=4"
        );
    }

    #[test]
    fn decode_is_deterministic() {
        let first = ReleaseEvent::decode(PAYLOAD.as_bytes()).unwrap();
        let second = ReleaseEvent::decode(PAYLOAD.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let event = ReleaseEvent::decode(br#"{"action":"published"}"#).unwrap();
        assert_eq!(event.action, "published");
        assert_eq!(event.release, Release::default());
        assert_eq!(event.repository, Repository::default());
        assert_eq!(event.sender, Sender::default());
    }

    #[test]
    fn null_fields_default_to_empty() {
        let event = ReleaseEvent::decode(
            br#"{"action":"published","release":{"tag_name":"v2","name":null,"body":null},"sender":null}"#,
        )
        .unwrap();
        assert_eq!(event.release.tag_name, "v2");
        assert_eq!(event.release.name, "");
        assert_eq!(event.release.body, "");
        assert_eq!(event.sender, Sender::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ReleaseEvent::decode(b"{not json").is_err());
        assert!(ReleaseEvent::decode(b"").is_err());
    }

    #[test]
    fn non_object_json_is_an_error() {
        let err = ReleaseEvent::decode(b"[1, 2, 3]").unwrap_err();
        assert!(err.to_string().starts_with("invalid release payload"));
    }

    #[test]
    fn profile_link_prefers_html_url() {
        let mut sender = Sender {
            url: "https://api.github.com/users/octocat".into(),
            html_url: "https://github.com/octocat".into(),
            ..Sender::default()
        };
        assert_eq!(sender.profile_link(), "https://github.com/octocat");

        sender.html_url.clear();
        assert_eq!(sender.profile_link(), "https://api.github.com/users/octocat");
    }

    #[test]
    fn summary_lists_action_sender_repo_tag_and_body() {
        let event = ReleaseEvent::decode(PAYLOAD.as_bytes()).unwrap();
        let summary = WebhookEvent::Release(event).to_string();

        assert_eq!(
            summary,
            "action: published\nsender: octocat\nrepo:   hello\ntag:    v1.0\nbody:   hi\n"
        );
    }

    #[test]
    fn queued_events_get_distinct_receipts() {
        let event = WebhookEvent::Release(ReleaseEvent::default());
        let a = QueuedEvent::new(event.clone());
        let b = QueuedEvent::new(event);
        assert_ne!(a.receipt, b.receipt);
        assert_eq!(a.event.event_type(), "release");
    }
}
