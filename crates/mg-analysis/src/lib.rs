//! # mg-analysis
//!
//! Frequency aggregation over collected posts: lexical word counts and
//! sentiment label counts, partitioned by collection group.
//!
//! Every table starts with a `"total"` row covering the whole input, followed
//! by one `"{group}_group"` row per distinct group. All rows of one table
//! share the total row's key ordering, so row *i*'s *k*-th count always
//! refers to the same key.

use mg_core::models::{PostRecord, SENTIMENT_LABELS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Tokens shorter than this are discarded by [`word_frequency`] unless the
/// caller says otherwise. Short tokens are mostly stop words and produce
/// noisy tables.
pub const DEFAULT_MIN_WORD_LENGTH: usize = 4;

/// Label of the mandatory leading row covering all groups.
pub const TOTAL_LABEL: &str = "total";

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("static pattern"));

/// One labeled row of counts. Serializes as `{label, data: [[key, n], ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    pub label: String,
    pub data: Vec<(String, u64)>,
}

/// An ordered set of [`FrequencyRow`]s sharing one key ordering, with the
/// `"total"` row first.
pub type FrequencyTable = Vec<FrequencyRow>;

fn group_label(group: &str) -> String {
    format!("{group}_group")
}

fn build_table(
    keys: &[String],
    total: &HashMap<String, u64>,
    groups: &BTreeMap<String, HashMap<String, u64>>,
) -> FrequencyTable {
    let counts_for = |counts: &HashMap<String, u64>| {
        keys.iter()
            .map(|k| (k.clone(), counts.get(k).copied().unwrap_or(0)))
            .collect()
    };

    let mut table = Vec::with_capacity(groups.len() + 1);
    table.push(FrequencyRow {
        label: TOTAL_LABEL.to_string(),
        data: counts_for(total),
    });
    for (group, counts) in groups {
        table.push(FrequencyRow {
            label: group_label(group),
            data: counts_for(counts),
        });
    }
    table
}

/// Word frequencies over the posts' display text.
///
/// Tokens are maximal `\w+` runs, lower-cased; tokens shorter than
/// `min_word_length` characters are dropped. Keys are ordered by descending
/// total frequency, ties by first appearance in the input. Posts without
/// text contribute no tokens but still register their group row.
pub fn word_frequency(posts: &[PostRecord], min_word_length: usize) -> FrequencyTable {
    let mut order: Vec<String> = Vec::new();
    let mut total: HashMap<String, u64> = HashMap::new();
    let mut groups: BTreeMap<String, HashMap<String, u64>> = BTreeMap::new();

    for post in posts {
        let counts = groups.entry(post.group.clone()).or_default();
        let Some(text) = post.text.as_deref() else {
            continue;
        };
        for token in WORD.find_iter(&text.to_lowercase()) {
            let word = token.as_str();
            if word.chars().count() < min_word_length {
                continue;
            }
            if !total.contains_key(word) {
                order.push(word.to_string());
            }
            *total.entry(word.to_string()).or_insert(0) += 1;
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    // descending total frequency; the sort is stable, so ties keep
    // first-seen order
    let mut keys = order;
    keys.sort_by(|a, b| total[b].cmp(&total[a]));

    build_table(&keys, &total, &groups)
}

/// Sentiment label frequencies with the fixed key set
/// `["pos", "neg", "neutral"]` — labels that never occur still appear with a
/// zero count. Unclassified posts count toward no key but still register
/// their group row.
pub fn sentiment_frequency(posts: &[PostRecord]) -> FrequencyTable {
    let mut total: HashMap<String, u64> = HashMap::new();
    let mut groups: BTreeMap<String, HashMap<String, u64>> = BTreeMap::new();

    for post in posts {
        let counts = groups.entry(post.group.clone()).or_default();
        if post.sentiment.is_unclassified() {
            continue;
        }
        let label = post.sentiment.as_str();
        *total.entry(label.to_string()).or_insert(0) += 1;
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }

    let keys: Vec<String> = SENTIMENT_LABELS.iter().map(|s| s.to_string()).collect();
    build_table(&keys, &total, &groups)
}
