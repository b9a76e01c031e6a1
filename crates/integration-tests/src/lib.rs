//! Shared fixtures for the integration test targets.

use mg_core::models::RawRecord;
use serde_json::Value;

/// Unwraps a `json!` object literal into a raw record map.
pub fn raw(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        _ => panic!("raw records are objects"),
    }
}

/// A raw post with every optional field populated.
pub fn full_post(id: &str, text: &str) -> RawRecord {
    raw(serde_json::json!({
        "id_str": id,
        "text": text,
        "created_at": "Mon Sep 24 03:35:21 +0000 2012",
        "author": {"id_str": "author_1"},
        "favorite_count": 5,
        "repost_count": 2
    }))
}

/// A raw post carrying nothing but its identity.
pub fn bare_post(id: &str) -> RawRecord {
    raw(serde_json::json!({ "id_str": id }))
}
