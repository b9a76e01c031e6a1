//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the glue crates.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::models::{AuthorRecord, PostRecord, RawRecord, Sentiment};

/// What an insert does with a record whose identity pair `(id_str, group)`
/// already exists in the store, when the caller passes no explicit
/// `unique_key`. The same post may legitimately appear once per group it was
/// collected under, so the pair is the strictest identity the store knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UniquenessMode {
    /// Every insert appends, duplicates included.
    AlwaysInsert,
    /// Reject inserts whose identity pair is already present.
    #[default]
    IdentityPair,
}

/// Data persistence contract for collected posts and author profiles.
///
/// Inserts return `Ok(false)` on a uniqueness rejection; that is the normal
/// dedup path, not an error. Exactly one writer per store location is
/// assumed; guarding against concurrent processes is the caller's problem.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Normalizes `raw` and appends it tagged with `group` and `sentiment`.
    ///
    /// `unique_key` names a post column; when given, the insert is rejected
    /// if any record in the same group already holds the candidate's value
    /// for that column. When omitted, the store's [`UniquenessMode`] decides.
    async fn insert_post(
        &self,
        raw: &RawRecord,
        group: &str,
        sentiment: Sentiment,
        unique_key: Option<&str>,
    ) -> Result<bool>;

    /// Symmetric to [`RecordStore::insert_post`], without a sentiment field.
    async fn insert_author(
        &self,
        raw: &RawRecord,
        group: &str,
        unique_key: Option<&str>,
    ) -> Result<bool>;

    /// Runs `classifier` over the stored posts and overwrites their
    /// sentiment tags in one batch. With `update_all` false, only posts
    /// still unclassified are touched. A classifier failure aborts the
    /// whole batch; readers never observe a half-labeled store.
    async fn update_sentiments(
        &self,
        classifier: &dyn SentimentClassifier,
        update_all: bool,
    ) -> Result<()>;

    /// All posts, or only those in `group`. Insertion order, every column
    /// materialized (see `POST_COLUMNS`).
    async fn posts(&self, group: Option<&str>) -> Result<Vec<PostRecord>>;

    /// All authors, or only those in `group`.
    async fn authors(&self, group: Option<&str>) -> Result<Vec<AuthorRecord>>;

    /// Distinct post group labels currently present.
    async fn post_groups(&self) -> Result<BTreeSet<String>>;

    /// Distinct author group labels currently present.
    async fn author_groups(&self) -> Result<BTreeSet<String>>;

    /// Flushes every mutation made since open and releases the handle.
    /// Call exactly once; any further use of the handle is undefined.
    async fn close(&self) -> Result<()>;
}

/// Sentiment labeling contract. The collaborator owns model loading and
/// scoring; the core only passes display text through. Failures must be
/// surfaced, not swallowed — `update_sentiments` aborts its batch on error.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> anyhow::Result<Sentiment>;
}

/// Retrieval contract for the network collaborator that talks to the remote
/// search/timeline/trends API. The core performs no network I/O.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Raw post records matching `term`.
    async fn search_posts(&self, term: &str) -> anyhow::Result<Vec<RawRecord>>;

    /// Raw author profiles matching `term`.
    async fn search_authors(&self, term: &str) -> anyhow::Result<Vec<RawRecord>>;
}
