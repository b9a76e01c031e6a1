//! # Domain Models
//!
//! These structs represent the normalized records Magpie persists.
//! Identifiers are source-assigned strings (`id_str`), never generated here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};

/// An unvalidated, string-keyed map as delivered by the network collaborator.
pub type RawRecord = serde_json::Map<String, Value>;

/// Column order for post read-back. Consumers rendering tabular output
/// compute a header row from this once and reuse it for every data row.
pub const POST_COLUMNS: [&str; 8] = [
    "id_str",
    "text",
    "created_at",
    "author_id_str",
    "favorite_count",
    "repost_count",
    "post_group",
    "sentiment",
];

/// Column order for author read-back.
pub const AUTHOR_COLUMNS: [&str; 9] = [
    "id_str",
    "name",
    "handle",
    "created_at",
    "description",
    "follower_count",
    "following_count",
    "post_count",
    "author_group",
];

/// The fixed label set reported by sentiment aggregation.
pub const SENTIMENT_LABELS: [&str; 3] = ["pos", "neg", "neutral"];

/// Sentiment tag attached to every post. `Unclassified` is stored as the
/// empty string and marks posts the labeling pass has not reached yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "pos")]
    Pos,
    #[serde(rename = "neg")]
    Neg,
    #[serde(rename = "neutral")]
    Neutral,
    #[default]
    #[serde(rename = "")]
    Unclassified,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Pos => "pos",
            Sentiment::Neg => "neg",
            Sentiment::Neutral => "neutral",
            Sentiment::Unclassified => "",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "pos" => Some(Sentiment::Pos),
            "neg" => Some(Sentiment::Neg),
            "neutral" => Some(Sentiment::Neutral),
            "" => Some(Sentiment::Unclassified),
            _ => None,
        }
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, Sentiment::Unclassified)
    }
}

/// A collected social-media post, tagged with the group it was searched under.
///
/// Serialized field names match [`POST_COLUMNS`] so JSON dumps line up with
/// CSV headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "id_str")]
    pub id: String,
    pub text: Option<String>,
    pub created_at: Option<String>,
    #[serde(rename = "author_id_str")]
    pub author_id: Option<String>,
    pub favorite_count: Option<i64>,
    pub repost_count: Option<i64>,
    #[serde(rename = "post_group")]
    pub group: String,
    pub sentiment: Sentiment,
}

impl PostRecord {
    /// Normalizes a raw map into a `PostRecord` tagged with `group` and
    /// `sentiment`. Only `id_str` is required; every other field maps to
    /// `None` when absent. The author id is read from a nested
    /// `author.id_str` object if present, otherwise from a flat
    /// `author_id_str` key.
    pub fn from_raw(raw: &RawRecord, group: &str, sentiment: Sentiment) -> Result<Self> {
        let id = string_field(raw, "id_str").ok_or(StoreError::MalformedRecord {
            kind: "post",
            field: "id_str",
        })?;

        Ok(Self {
            id,
            text: string_field(raw, "text"),
            created_at: string_field(raw, "created_at"),
            author_id: author_id_field(raw),
            favorite_count: int_field(raw, "favorite_count"),
            repost_count: int_field(raw, "repost_count"),
            group: group.to_string(),
            sentiment,
        })
    }
}

/// A collected author profile, tagged with the group it was searched under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    #[serde(rename = "id_str")]
    pub id: String,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub follower_count: Option<i64>,
    pub following_count: Option<i64>,
    pub post_count: Option<i64>,
    #[serde(rename = "author_group")]
    pub group: String,
}

impl AuthorRecord {
    /// Normalizes a raw map into an `AuthorRecord` tagged with `group`.
    /// Only `id_str` is required.
    pub fn from_raw(raw: &RawRecord, group: &str) -> Result<Self> {
        let id = string_field(raw, "id_str").ok_or(StoreError::MalformedRecord {
            kind: "author",
            field: "id_str",
        })?;

        Ok(Self {
            id,
            name: string_field(raw, "name"),
            handle: string_field(raw, "handle"),
            created_at: string_field(raw, "created_at"),
            description: string_field(raw, "description"),
            follower_count: int_field(raw, "follower_count"),
            following_count: int_field(raw, "following_count"),
            post_count: int_field(raw, "post_count"),
            group: group.to_string(),
        })
    }
}

// Raw maps are loosely typed: sources have been seen emitting numeric ids,
// so a number is accepted where a string is expected.
fn string_field(raw: &RawRecord, key: &str) -> Option<String> {
    match raw.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn int_field(raw: &RawRecord, key: &str) -> Option<i64> {
    raw.get(key).and_then(Value::as_i64)
}

fn author_id_field(raw: &RawRecord) -> Option<String> {
    if let Some(Value::Object(author)) = raw.get("author") {
        string_field(author, "id_str")
    } else {
        string_field(raw, "author_id_str")
    }
}
