//! # StoreError
//!
//! Centralized error handling for the Magpie record store.
//! Uniqueness rejections are NOT errors — inserts report those as `Ok(false)`.

use thiserror::Error;

/// The primary error type for all record store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A raw record is missing a required identity field.
    #[error("malformed {kind} record: missing required field `{field}`")]
    MalformedRecord {
        kind: &'static str,
        field: &'static str,
    },

    /// `unique_key` named something that is not a known column.
    #[error("unknown uniqueness key `{0}`")]
    UnknownUniqueKey(String),

    /// The location exists but does not hold a Magpie store schema.
    #[error("no record store schema at {location}")]
    SchemaMismatch { location: String },

    /// The confirmation callback declined a destructive reset.
    #[error("reset declined by the confirmation callback")]
    ResetDeclined,

    /// A caller-supplied classifier failed mid-batch.
    #[error("sentiment classifier failed: {0}")]
    Classifier(anyhow::Error),

    /// Filesystem failure while creating or replacing a store.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything the storage engine itself reports (unreadable, corrupt, ...).
    #[error("storage backend error: {0}")]
    Backend(anyhow::Error),
}

/// A specialized Result type for record store logic.
pub type Result<T> = std::result::Result<T, StoreError>;
