// Payload types for the parts of the Gitea API this tool talks to.
// Field names mirror the JSON returned by `/api/v1/repos/{owner}/{repo}/releases`.
// Everything except the ids is defaulted so that older or newer Gitea
// versions with slightly different payloads still decode. Release fields
// other than the id are decoded leniently: a value of the wrong shape becomes
// the default instead of failing the whole list.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A release as returned by the releases list endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Release {
    pub id: u64,
    #[serde(deserialize_with = "lenient")]
    pub tag_name: String,
    #[serde(deserialize_with = "lenient")]
    pub target_commitish: String,
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    #[serde(deserialize_with = "lenient")]
    pub body: String,
    #[serde(deserialize_with = "lenient")]
    pub url: String,
    #[serde(deserialize_with = "lenient")]
    pub tarball_url: String,
    #[serde(deserialize_with = "lenient")]
    pub zipball_url: String,
    #[serde(deserialize_with = "lenient")]
    pub draft: bool,
    #[serde(deserialize_with = "lenient")]
    pub prerelease: bool,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<Author>,
    #[serde(deserialize_with = "lenient")]
    pub assets: Vec<Attachment>,
}

impl Release {
    /// A release belongs to a tag only when both its name and tag name equal it.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.name == tag && self.tag_name == tag
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Author {
    /// Negative for Gitea's placeholder users (the "Ghost" of a deleted account).
    pub id: i64,
    pub login: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: String,
    pub language: String,
    pub is_admin: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub username: String,
}

/// A release asset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Attachment {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub download_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub uuid: String,
    pub browser_download_url: String,
}

/// Body of `POST .../releases`. Name and tag are always the same value.
#[derive(Serialize, Debug, PartialEq)]
pub struct CreateReleaseRequest<'a> {
    pub name: &'a str,
    pub tag_name: &'a str,
    pub body: &'a str,
    pub draft: bool,
    pub prerelease: bool,
}

impl<'a> CreateReleaseRequest<'a> {
    pub fn for_tag(tag: &'a str) -> Self {
        CreateReleaseRequest {
            name: tag,
            tag_name: tag,
            body: "",
            draft: false,
            prerelease: false,
        }
    }
}
