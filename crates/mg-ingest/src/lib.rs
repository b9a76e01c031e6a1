//! # mg-ingest
//!
//! Ingestion orchestration: reads search term files and drives a
//! `RecordSource` (the network collaborator) into a `RecordStore`.
//!
//! The network side stays behind the port — building requests, signing them,
//! backoff, all of it belongs to the `RecordSource` implementation.

use anyhow::{bail, Context};
use mg_core::models::Sentiment;
use mg_core::traits::{RecordSource, RecordStore};
use std::io::BufRead;
use std::path::Path;

/// One line of a search term file: what to search for and which group the
/// results are filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub term: String,
    pub group: String,
}

/// Tally of one ingestion run. Rejections are deduplicated records, not
/// failures.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub inserted: usize,
    pub rejected: usize,
}

/// Parses `<term>:<group>` lines. Blank lines are skipped; anything else
/// that does not split into exactly two parts is an error.
pub fn parse_terms(reader: impl BufRead) -> anyhow::Result<Vec<SearchTerm>> {
    let mut terms = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() != 2 {
            bail!(
                "bad search term on line {}: `{}` (expected <term>:<group>)",
                idx + 1,
                trimmed
            );
        }
        terms.push(SearchTerm {
            term: parts[0].trim().to_string(),
            group: parts[1].trim().to_string(),
        });
    }
    Ok(terms)
}

/// Reads a search term file, one `<term>:<group>` pair per line.
pub fn parse_term_file(path: impl AsRef<Path>) -> anyhow::Result<Vec<SearchTerm>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening search term file {}", path.display()))?;
    parse_terms(std::io::BufReader::new(file))
}

/// Searches every term through `source` and files the resulting posts under
/// the term's group. New posts land unclassified; a later labeling pass
/// fills in sentiment.
pub async fn collect_posts(
    source: &dyn RecordSource,
    store: &dyn RecordStore,
    terms: &[SearchTerm],
) -> anyhow::Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    for search in terms {
        log::info!("searching posts about {}", search.term);
        let raws = source.search_posts(&search.term).await?;
        let found = raws.len();
        for raw in &raws {
            if store
                .insert_post(raw, &search.group, Sentiment::Unclassified, None)
                .await?
            {
                summary.inserted += 1;
            } else {
                summary.rejected += 1;
            }
        }
        log::info!(
            "{}: {} records fetched into group {}",
            search.term,
            found,
            search.group
        );
    }
    Ok(summary)
}

/// Symmetric to [`collect_posts`] for author profiles.
pub async fn collect_authors(
    source: &dyn RecordSource,
    store: &dyn RecordStore,
    terms: &[SearchTerm],
) -> anyhow::Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    for search in terms {
        log::info!("searching authors for {}", search.term);
        let raws = source.search_authors(&search.term).await?;
        for raw in &raws {
            if store.insert_author(raw, &search.group, None).await? {
                summary.inserted += 1;
            } else {
                summary.rejected += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mg_core::models::RawRecord;
    use mg_db_sqlite::SqliteRecordStore;
    use std::io::Cursor;

    struct CannedSource;

    #[async_trait]
    impl RecordSource for CannedSource {
        async fn search_posts(&self, term: &str) -> anyhow::Result<Vec<RawRecord>> {
            // the same post shows up for every term, like a busy repost
            let shared = serde_json::json!({"id_str": "shared", "text": "seen everywhere"});
            let own = serde_json::json!({
                "id_str": format!("about_{term}"),
                "text": format!("all about {term}")
            });
            Ok(vec![to_raw(shared), to_raw(own)])
        }

        async fn search_authors(&self, _term: &str) -> anyhow::Result<Vec<RawRecord>> {
            Ok(vec![to_raw(serde_json::json!({"id_str": "a1"}))])
        }
    }

    fn to_raw(value: serde_json::Value) -> RawRecord {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("raw records are objects"),
        }
    }

    #[test]
    fn test_parse_terms() {
        let input = "rustlang:rust\n\nferris : mascots\n";
        let terms = parse_terms(Cursor::new(input)).unwrap();
        assert_eq!(
            terms,
            vec![
                SearchTerm {
                    term: "rustlang".to_string(),
                    group: "rust".to_string()
                },
                SearchTerm {
                    term: "ferris".to_string(),
                    group: "mascots".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_terms_rejects_bad_lines() {
        assert!(parse_terms(Cursor::new("no separator here")).is_err());
        assert!(parse_terms(Cursor::new("too:many:colons")).is_err());
    }

    #[test]
    fn test_parse_term_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_term_file(dir.path().join("absent.txt")).is_err());
    }

    #[tokio::test]
    async fn test_collect_posts_dedupes_within_group() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let terms = vec![
            SearchTerm {
                term: "one".to_string(),
                group: "g".to_string(),
            },
            SearchTerm {
                term: "two".to_string(),
                group: "g".to_string(),
            },
        ];

        let summary = collect_posts(&CannedSource, &store, &terms).await.unwrap();

        // "shared" inserts once and is rejected the second time
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.rejected, 1);
        assert_eq!(store.posts(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_collect_posts_separate_groups() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let terms = vec![
            SearchTerm {
                term: "one".to_string(),
                group: "g1".to_string(),
            },
            SearchTerm {
                term: "two".to_string(),
                group: "g2".to_string(),
            },
        ];

        let summary = collect_posts(&CannedSource, &store, &terms).await.unwrap();
        assert_eq!(summary.inserted, 4);
        assert_eq!(summary.rejected, 0);
        assert_eq!(store.post_groups().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_collect_authors() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        let terms = vec![SearchTerm {
            term: "anything".to_string(),
            group: "profiles".to_string(),
        }];

        let summary = collect_authors(&CannedSource, &store, &terms)
            .await
            .unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(store.authors(None).await.unwrap().len(), 1);
    }
}
