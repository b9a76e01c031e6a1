//! # mg-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `mg-core` record types.
//!
//! One store lives in one database file. The pool is capped at a single
//! connection: the store assumes exactly one writer per location, and SQLite
//! commits every insert as it lands, so `close` is a flush-and-release rather
//! than the only commit point.

use async_trait::async_trait;
use mg_core::error::{Result, StoreError};
use mg_core::models::{AuthorRecord, PostRecord, RawRecord, Sentiment};
use mg_core::traits::{RecordStore, SentimentClassifier, UniquenessMode};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Connection, Row, SqliteConnection};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Answer the confirmation callback must return for `reset` to proceed.
pub const CONFIRM_SENTINEL: &str = "yes";

const SCHEMA: [&str; 4] = [
    "CREATE TABLE posts (
        id_str         TEXT NOT NULL,
        text           TEXT,
        created_at     TEXT,
        author_id_str  TEXT,
        favorite_count INTEGER,
        repost_count   INTEGER,
        post_group     TEXT NOT NULL,
        sentiment      TEXT NOT NULL DEFAULT ''
    )",
    "CREATE TABLE authors (
        id_str          TEXT NOT NULL,
        name            TEXT,
        handle          TEXT,
        created_at      TEXT,
        description     TEXT,
        follower_count  INTEGER,
        following_count INTEGER,
        post_count      INTEGER,
        author_group    TEXT NOT NULL
    )",
    // uniqueness is enforced in code (the mode is configurable); these only
    // keep the per-group lookups from scanning
    "CREATE INDEX idx_posts_group ON posts (post_group, id_str)",
    "CREATE INDEX idx_authors_group ON authors (author_group, id_str)",
];

const POST_SELECT: &str = "SELECT rowid, id_str, text, created_at, author_id_str, \
                           favorite_count, repost_count, post_group, sentiment FROM posts";
const AUTHOR_SELECT: &str = "SELECT id_str, name, handle, created_at, description, \
                             follower_count, following_count, post_count, author_group FROM authors";

/// Store-level configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Applied when an insert carries no explicit `unique_key`.
    pub uniqueness: UniquenessMode,
}

pub struct SqliteRecordStore {
    pool: SqlitePool,
    uniqueness: UniquenessMode,
}

// A `unique_key` argument names one of these; the value to compare is pulled
// from the candidate record. A `None` value never matches an existing row
// (SQL `=` semantics), so records lacking the keyed field always insert.
enum KeyValue<'a> {
    Text(Option<&'a str>),
    Int(Option<i64>),
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

fn scratch_path(location: &Path) -> PathBuf {
    let mut name = location.file_name().unwrap_or_default().to_os_string();
    name.push(".reset");
    location.with_file_name(name)
}

/// Destructively replaces whatever is at `location` with a new, empty store.
///
/// `confirm` is handed the location and must return [`CONFIRM_SENTINEL`];
/// anything else yields [`StoreError::ResetDeclined`] — the caller decides
/// whether that ends the process. The new schema is built in a scratch file
/// and renamed over `location` in one step, so a failed reset leaves any
/// previous store untouched; a missing previous store is fine too.
pub async fn reset(
    location: impl AsRef<Path>,
    confirm: impl FnOnce(&str) -> String,
) -> Result<()> {
    let location = location.as_ref();
    if confirm(&location.display().to_string()) != CONFIRM_SENTINEL {
        return Err(StoreError::ResetDeclined);
    }

    log::info!("resetting record store at {}", location.display());

    let scratch = scratch_path(location);
    match tokio::fs::remove_file(&scratch).await {
        Ok(()) => log::debug!("removed stale scratch file {}", scratch.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    let opts = SqliteConnectOptions::new()
        .filename(&scratch)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&opts).await.map_err(db_err)?;
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut conn)
            .await
            .map_err(db_err)?;
    }
    conn.close().await.map_err(db_err)?;

    // atomic on the same filesystem; replaces any previous store
    tokio::fs::rename(&scratch, location).await?;
    Ok(())
}

impl SqliteRecordStore {
    /// Opens the store at `location` with the default [`StoreOptions`].
    pub async fn open(location: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(location, StoreOptions::default()).await
    }

    /// Opens the store at `location`. The file must already exist — `reset`
    /// creates it — and must carry the expected tables.
    pub async fn open_with(location: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let location = location.as_ref();
        let opts = SqliteConnectOptions::new()
            .filename(location)
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(db_err)?;

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('posts', 'authors')",
        )
        .fetch_one(&pool)
        .await
        .map_err(db_err)?;
        if tables != 2 {
            pool.close().await;
            return Err(StoreError::SchemaMismatch {
                location: location.display().to_string(),
            });
        }

        Ok(Self {
            pool,
            uniqueness: options.uniqueness,
        })
    }

    /// A fresh, empty store living in process memory. Mostly for tests and
    /// scratch analysis sessions; nothing survives `close`.
    pub async fn in_memory() -> Result<Self> {
        Self::in_memory_with(StoreOptions::default()).await
    }

    pub async fn in_memory_with(options: StoreOptions) -> Result<Self> {
        let opts = SqliteConnectOptions::new().filename(":memory:");
        // the single connection IS the database; never let the pool retire it
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .map_err(db_err)?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await.map_err(db_err)?;
        }
        Ok(Self {
            pool,
            uniqueness: options.uniqueness,
        })
    }

    fn post_key_value<'a>(key: &str, rec: &'a PostRecord) -> Result<KeyValue<'a>> {
        Ok(match key {
            "id_str" => KeyValue::Text(Some(&rec.id)),
            "text" => KeyValue::Text(rec.text.as_deref()),
            "created_at" => KeyValue::Text(rec.created_at.as_deref()),
            "author_id_str" => KeyValue::Text(rec.author_id.as_deref()),
            "sentiment" => KeyValue::Text(Some(rec.sentiment.as_str())),
            "favorite_count" => KeyValue::Int(rec.favorite_count),
            "repost_count" => KeyValue::Int(rec.repost_count),
            _ => return Err(StoreError::UnknownUniqueKey(key.to_string())),
        })
    }

    fn author_key_value<'a>(key: &str, rec: &'a AuthorRecord) -> Result<KeyValue<'a>> {
        Ok(match key {
            "id_str" => KeyValue::Text(Some(&rec.id)),
            "name" => KeyValue::Text(rec.name.as_deref()),
            "handle" => KeyValue::Text(rec.handle.as_deref()),
            "created_at" => KeyValue::Text(rec.created_at.as_deref()),
            "description" => KeyValue::Text(rec.description.as_deref()),
            "follower_count" => KeyValue::Int(rec.follower_count),
            "following_count" => KeyValue::Int(rec.following_count),
            "post_count" => KeyValue::Int(rec.post_count),
            _ => return Err(StoreError::UnknownUniqueKey(key.to_string())),
        })
    }

    // `key` has been validated against the column whitelist above before it
    // is formatted into the statement.
    async fn group_match_exists(
        &self,
        table: &str,
        group_col: &str,
        group: &str,
        key: &str,
        value: KeyValue<'_>,
    ) -> Result<bool> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {group_col} = ?1 AND {key} = ?2");
        let query = sqlx::query_scalar::<_, i64>(&sql).bind(group);
        let count = match value {
            KeyValue::Text(v) => query.bind(v).fetch_one(&self.pool).await,
            KeyValue::Int(v) => query.bind(v).fetch_one(&self.pool).await,
        }
        .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn post_rejected(&self, rec: &PostRecord, unique_key: Option<&str>) -> Result<bool> {
        let key = match unique_key {
            Some(key) => key,
            None => match self.uniqueness {
                UniquenessMode::AlwaysInsert => return Ok(false),
                UniquenessMode::IdentityPair => "id_str",
            },
        };
        let value = Self::post_key_value(key, rec)?;
        self.group_match_exists("posts", "post_group", &rec.group, key, value)
            .await
    }

    async fn author_rejected(&self, rec: &AuthorRecord, unique_key: Option<&str>) -> Result<bool> {
        let key = match unique_key {
            Some(key) => key,
            None => match self.uniqueness {
                UniquenessMode::AlwaysInsert => return Ok(false),
                UniquenessMode::IdentityPair => "id_str",
            },
        };
        let value = Self::author_key_value(key, rec)?;
        self.group_match_exists("authors", "author_group", &rec.group, key, value)
            .await
    }
}

fn post_from_row(row: &SqliteRow) -> Result<PostRecord> {
    let label: String = row.get("sentiment");
    let sentiment = Sentiment::from_label(&label).ok_or_else(|| {
        StoreError::Backend(anyhow::anyhow!("unexpected sentiment label `{label}` in store"))
    })?;
    Ok(PostRecord {
        id: row.get("id_str"),
        text: row.get("text"),
        created_at: row.get("created_at"),
        author_id: row.get("author_id_str"),
        favorite_count: row.get("favorite_count"),
        repost_count: row.get("repost_count"),
        group: row.get("post_group"),
        sentiment,
    })
}

fn author_from_row(row: &SqliteRow) -> AuthorRecord {
    AuthorRecord {
        id: row.get("id_str"),
        name: row.get("name"),
        handle: row.get("handle"),
        created_at: row.get("created_at"),
        description: row.get("description"),
        follower_count: row.get("follower_count"),
        following_count: row.get("following_count"),
        post_count: row.get("post_count"),
        group: row.get("author_group"),
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    /// Check-then-append: the candidate is normalized first, then tested
    /// against the uniqueness rule, and only written if it passes.
    async fn insert_post(
        &self,
        raw: &RawRecord,
        group: &str,
        sentiment: Sentiment,
        unique_key: Option<&str>,
    ) -> Result<bool> {
        let rec = PostRecord::from_raw(raw, group, sentiment)?;

        if self.post_rejected(&rec, unique_key).await? {
            log::debug!("rejected duplicate post {} in group {}", rec.id, rec.group);
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO posts (id_str, text, created_at, author_id_str, favorite_count, \
             repost_count, post_group, sentiment) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&rec.id)
        .bind(&rec.text)
        .bind(&rec.created_at)
        .bind(&rec.author_id)
        .bind(rec.favorite_count)
        .bind(rec.repost_count)
        .bind(&rec.group)
        .bind(rec.sentiment.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(true)
    }

    async fn insert_author(
        &self,
        raw: &RawRecord,
        group: &str,
        unique_key: Option<&str>,
    ) -> Result<bool> {
        let rec = AuthorRecord::from_raw(raw, group)?;

        if self.author_rejected(&rec, unique_key).await? {
            log::debug!("rejected duplicate author {} in group {}", rec.id, rec.group);
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO authors (id_str, name, handle, created_at, description, \
             follower_count, following_count, post_count, author_group) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&rec.id)
        .bind(&rec.name)
        .bind(&rec.handle)
        .bind(&rec.created_at)
        .bind(&rec.description)
        .bind(rec.follower_count)
        .bind(rec.following_count)
        .bind(rec.post_count)
        .bind(&rec.group)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(true)
    }

    /// One transaction covers the whole pass, so readers see either the old
    /// labels or all the new ones. A classifier failure rolls everything back.
    async fn update_sentiments(
        &self,
        classifier: &dyn SentimentClassifier,
        update_all: bool,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let sql = if update_all {
            "SELECT rowid, text FROM posts"
        } else {
            "SELECT rowid, text FROM posts WHERE sentiment = ''"
        };
        let rows = sqlx::query(sql).fetch_all(&mut *tx).await.map_err(db_err)?;

        let total = rows.len();
        for row in rows {
            let rowid: i64 = row.get("rowid");
            let text: Option<String> = row.get("text");
            let label = classifier
                .classify(text.as_deref().unwrap_or(""))
                .map_err(StoreError::Classifier)?;
            sqlx::query("UPDATE posts SET sentiment = ?1 WHERE rowid = ?2")
                .bind(label.as_str())
                .bind(rowid)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        log::info!("labeled {total} posts");
        Ok(())
    }

    async fn posts(&self, group: Option<&str>) -> Result<Vec<PostRecord>> {
        let rows = match group {
            Some(g) => {
                let sql = format!("{POST_SELECT} WHERE post_group = ? ORDER BY rowid");
                sqlx::query(&sql).bind(g).fetch_all(&self.pool).await
            }
            None => {
                let sql = format!("{POST_SELECT} ORDER BY rowid");
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(db_err)?;

        rows.iter().map(post_from_row).collect()
    }

    async fn authors(&self, group: Option<&str>) -> Result<Vec<AuthorRecord>> {
        let rows = match group {
            Some(g) => {
                let sql = format!("{AUTHOR_SELECT} WHERE author_group = ? ORDER BY rowid");
                sqlx::query(&sql).bind(g).fetch_all(&self.pool).await
            }
            None => {
                let sql = format!("{AUTHOR_SELECT} ORDER BY rowid");
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(db_err)?;

        Ok(rows.iter().map(author_from_row).collect())
    }

    async fn post_groups(&self) -> Result<BTreeSet<String>> {
        let groups: Vec<String> = sqlx::query_scalar("SELECT DISTINCT post_group FROM posts")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(groups.into_iter().collect())
    }

    async fn author_groups(&self) -> Result<BTreeSet<String>> {
        let groups: Vec<String> = sqlx::query_scalar("SELECT DISTINCT author_group FROM authors")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(groups.into_iter().collect())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("raw records are objects"),
        }
    }

    fn example_post() -> RawRecord {
        raw(json!({
            "id_str": "post_id_101",
            "author": {"id_str": "author_id_111"},
            "text": "I'm a post!",
            "created_at": "Mon Sep 24 03:35:21 +0000 2012"
        }))
    }

    struct ByKeyword;

    impl SentimentClassifier for ByKeyword {
        fn classify(&self, text: &str) -> anyhow::Result<Sentiment> {
            Ok(if text.contains("good") {
                Sentiment::Pos
            } else if text.contains("bad") {
                Sentiment::Neg
            } else {
                Sentiment::Neutral
            })
        }
    }

    struct AlwaysFails;

    impl SentimentClassifier for AlwaysFails {
        fn classify(&self, _text: &str) -> anyhow::Result<Sentiment> {
            anyhow::bail!("model not loaded")
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let store = SqliteRecordStore::in_memory().await.unwrap();

        assert!(store
            .insert_post(&example_post(), "group_1", Sentiment::Unclassified, None)
            .await
            .unwrap());

        let posts = store.posts(None).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0],
            PostRecord {
                id: "post_id_101".into(),
                text: Some("I'm a post!".into()),
                created_at: Some("Mon Sep 24 03:35:21 +0000 2012".into()),
                author_id: Some("author_id_111".into()),
                favorite_count: None,
                repost_count: None,
                group: "group_1".into(),
                sentiment: Sentiment::Unclassified,
            }
        );
    }

    #[tokio::test]
    async fn test_identity_pair_uniqueness() {
        let store = SqliteRecordStore::in_memory().await.unwrap();

        assert!(store
            .insert_post(&example_post(), "group", Sentiment::Unclassified, None)
            .await
            .unwrap());
        assert!(!store
            .insert_post(&example_post(), "group", Sentiment::Unclassified, None)
            .await
            .unwrap());
        assert_eq!(store.posts(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_id_across_groups() {
        let store = SqliteRecordStore::in_memory().await.unwrap();

        assert!(store
            .insert_post(&example_post(), "group_1", Sentiment::Unclassified, None)
            .await
            .unwrap());
        assert!(store
            .insert_post(&example_post(), "group_2", Sentiment::Unclassified, None)
            .await
            .unwrap());

        let groups = store.post_groups().await.unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.contains("group_1"));
        assert!(groups.contains("group_2"));
    }

    #[tokio::test]
    async fn test_always_insert_mode() {
        let store = SqliteRecordStore::in_memory_with(StoreOptions {
            uniqueness: UniquenessMode::AlwaysInsert,
        })
        .await
        .unwrap();

        assert!(store
            .insert_post(&example_post(), "group", Sentiment::Unclassified, None)
            .await
            .unwrap());
        assert!(store
            .insert_post(&example_post(), "group", Sentiment::Unclassified, None)
            .await
            .unwrap());
        assert_eq!(store.posts(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_explicit_unique_key_overrides_mode() {
        let store = SqliteRecordStore::in_memory_with(StoreOptions {
            uniqueness: UniquenessMode::AlwaysInsert,
        })
        .await
        .unwrap();

        let a = raw(json!({"id_str": "p1", "author": {"id_str": "same_author"}}));
        let b = raw(json!({"id_str": "p2", "author": {"id_str": "same_author"}}));

        assert!(store
            .insert_post(&a, "g", Sentiment::Unclassified, Some("author_id_str"))
            .await
            .unwrap());
        assert!(!store
            .insert_post(&b, "g", Sentiment::Unclassified, Some("author_id_str"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unknown_unique_key() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let err = store
            .insert_post(&example_post(), "g", Sentiment::Unclassified, Some("woeid"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownUniqueKey(key) if key == "woeid"));
    }

    #[tokio::test]
    async fn test_malformed_post_is_an_error() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let err = store
            .insert_post(
                &raw(json!({"text": "no id"})),
                "g",
                Sentiment::Unclassified,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { .. }));
        assert!(store.posts(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_author_insert_and_groups() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let author = raw(json!({
            "id_str": "a1",
            "name": "Maggie",
            "handle": "maggie",
            "follower_count": 12
        }));

        assert!(store.insert_author(&author, "birds", None).await.unwrap());
        assert!(!store.insert_author(&author, "birds", None).await.unwrap());
        assert!(store.insert_author(&author, "corvids", None).await.unwrap());

        let authors = store.authors(Some("birds")).await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].handle.as_deref(), Some("maggie"));
        assert!(authors[0].description.is_none());

        let groups = store.author_groups().await.unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[tokio::test]
    async fn test_group_filter() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        store
            .insert_post(&example_post(), "group_1", Sentiment::Unclassified, None)
            .await
            .unwrap();
        store
            .insert_post(&example_post(), "group_2", Sentiment::Unclassified, None)
            .await
            .unwrap();

        assert_eq!(store.posts(Some("group_1")).await.unwrap().len(), 1);
        assert_eq!(store.posts(Some("nope")).await.unwrap().len(), 0);
        assert_eq!(store.posts(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_sentiments_all() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let good = raw(json!({"id_str": "p1", "text": "such a good day"}));
        let bad = raw(json!({"id_str": "p2", "text": "a bad one"}));
        store
            .insert_post(&good, "g", Sentiment::Neg, None)
            .await
            .unwrap();
        store
            .insert_post(&bad, "g", Sentiment::Unclassified, None)
            .await
            .unwrap();

        store.update_sentiments(&ByKeyword, true).await.unwrap();

        let posts = store.posts(None).await.unwrap();
        assert_eq!(posts[0].sentiment, Sentiment::Pos);
        assert_eq!(posts[1].sentiment, Sentiment::Neg);
    }

    #[tokio::test]
    async fn test_update_sentiments_only_unclassified() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let good = raw(json!({"id_str": "p1", "text": "such a good day"}));
        let bad = raw(json!({"id_str": "p2", "text": "a bad one"}));
        // already labeled, and the label disagrees with the text on purpose
        store
            .insert_post(&good, "g", Sentiment::Neg, None)
            .await
            .unwrap();
        store
            .insert_post(&bad, "g", Sentiment::Unclassified, None)
            .await
            .unwrap();

        store.update_sentiments(&ByKeyword, false).await.unwrap();

        let posts = store.posts(None).await.unwrap();
        assert_eq!(posts[0].sentiment, Sentiment::Neg);
        assert_eq!(posts[1].sentiment, Sentiment::Neg);
    }

    #[tokio::test]
    async fn test_classifier_failure_rolls_back() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        store
            .insert_post(&example_post(), "g", Sentiment::Pos, None)
            .await
            .unwrap();

        let err = store.update_sentiments(&AlwaysFails, true).await.unwrap_err();
        assert!(matches!(err, StoreError::Classifier(_)));

        // the batch never became visible
        let posts = store.posts(None).await.unwrap();
        assert_eq!(posts[0].sentiment, Sentiment::Pos);
    }

    #[tokio::test]
    async fn test_reset_declined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        let err = reset(&path, |_| "no".to_string()).await.unwrap_err();
        assert!(matches!(err, StoreError::ResetDeclined));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_reset_open_close_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        reset(&path, |_| CONFIRM_SENTINEL.to_string()).await.unwrap();

        let store = SqliteRecordStore::open(&path).await.unwrap();
        assert!(store.posts(None).await.unwrap().is_empty());
        assert!(store.authors(None).await.unwrap().is_empty());
        assert!(store.post_groups().await.unwrap().is_empty());
        assert!(store.author_groups().await.unwrap().is_empty());

        store
            .insert_post(&example_post(), "group_1", Sentiment::Unclassified, None)
            .await
            .unwrap();
        store.close().await.unwrap();

        // a second reset wipes the previous contents
        reset(&path, |_| CONFIRM_SENTINEL.to_string()).await.unwrap();
        let store = SqliteRecordStore::open(&path).await.unwrap();
        assert!(store.posts(None).await.unwrap().is_empty());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_missing_location() {
        let dir = tempfile::tempdir().unwrap();
        let result = SqliteRecordStore::open(dir.path().join("absent.db")).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_foreign_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.db");

        let opts = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&opts).await.unwrap();
        sqlx::query("CREATE TABLE boards (slug TEXT)")
            .execute(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        let result = SqliteRecordStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::SchemaMismatch { .. })));
    }
}
