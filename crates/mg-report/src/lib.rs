//! # mg-report
//!
//! Report-writing collaborator: tabular dumps of stored records and
//! frequency tables, as CSV or JSON.
//!
//! Column order comes from `mg-core`'s column constants, so the header row is
//! computed once and holds for every data row, and JSON object keys line up
//! with CSV headers.

use mg_analysis::FrequencyTable;
use mg_core::models::{AuthorRecord, PostRecord, AUTHOR_COLUMNS, POST_COLUMNS};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

fn opt_cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn int_cell(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

/// CSV dump of posts: a [`POST_COLUMNS`] header, then one row per record.
/// `None` fields come out as empty cells.
pub fn posts_csv<W: Write>(posts: &[PostRecord], writer: W) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(POST_COLUMNS)?;
    for post in posts {
        let favorite = int_cell(post.favorite_count);
        let repost = int_cell(post.repost_count);
        out.write_record([
            post.id.as_str(),
            opt_cell(&post.text),
            opt_cell(&post.created_at),
            opt_cell(&post.author_id),
            favorite.as_str(),
            repost.as_str(),
            post.group.as_str(),
            post.sentiment.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// JSON dump of posts: an array of objects keyed by the column names.
pub fn posts_json<W: Write>(posts: &[PostRecord], writer: W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, posts)?;
    Ok(())
}

/// CSV dump of authors, shaped like [`posts_csv`] over [`AUTHOR_COLUMNS`].
pub fn authors_csv<W: Write>(authors: &[AuthorRecord], writer: W) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(AUTHOR_COLUMNS)?;
    for author in authors {
        let followers = int_cell(author.follower_count);
        let following = int_cell(author.following_count);
        let posts = int_cell(author.post_count);
        out.write_record([
            author.id.as_str(),
            opt_cell(&author.name),
            opt_cell(&author.handle),
            opt_cell(&author.created_at),
            opt_cell(&author.description),
            followers.as_str(),
            following.as_str(),
            posts.as_str(),
            author.group.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn authors_json<W: Write>(authors: &[AuthorRecord], writer: W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, authors)?;
    Ok(())
}

/// CSV dump of a frequency table.
///
/// Header is `[key_column, "{label}_frequency", ...]`; each data row carries
/// one key and that key's count in every table row, relying on all rows
/// sharing the total row's key ordering.
pub fn frequency_csv<W: Write>(
    table: &FrequencyTable,
    key_column: &str,
    writer: W,
) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec![key_column.to_string()];
    header.extend(table.iter().map(|row| format!("{}_frequency", row.label)));
    out.write_record(&header)?;

    let Some(first) = table.first() else {
        out.flush()?;
        return Ok(());
    };
    for i in 0..first.data.len() {
        let mut record = vec![first.data[i].0.clone()];
        record.extend(table.iter().map(|row| row.data[i].1.to_string()));
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// JSON dump of a frequency table: an array of `{label, data}` objects.
pub fn frequency_json<W: Write>(table: &FrequencyTable, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer(writer, table)?;
    Ok(())
}

fn report_path(dir: &Path, stem: &str, format: ReportFormat) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(format!("{stem}.{}", format.extension())))
}

/// Writes `posts.csv` / `posts.json` under `dir` and returns the path.
pub fn write_posts(
    posts: &[PostRecord],
    dir: impl AsRef<Path>,
    format: ReportFormat,
) -> anyhow::Result<PathBuf> {
    let path = report_path(dir.as_ref(), "posts", format)?;
    let file = File::create(&path)?;
    match format {
        ReportFormat::Csv => posts_csv(posts, file)?,
        ReportFormat::Json => posts_json(posts, file)?,
    }
    log::info!("wrote {} post records to {}", posts.len(), path.display());
    Ok(path)
}

/// Writes `authors.csv` / `authors.json` under `dir` and returns the path.
pub fn write_authors(
    authors: &[AuthorRecord],
    dir: impl AsRef<Path>,
    format: ReportFormat,
) -> anyhow::Result<PathBuf> {
    let path = report_path(dir.as_ref(), "authors", format)?;
    let file = File::create(&path)?;
    match format {
        ReportFormat::Csv => authors_csv(authors, file)?,
        ReportFormat::Json => authors_json(authors, file)?,
    }
    log::info!(
        "wrote {} author records to {}",
        authors.len(),
        path.display()
    );
    Ok(path)
}

/// Writes `word_freq.csv` / `word_freq.json` under `dir`.
pub fn write_word_frequencies(
    table: &FrequencyTable,
    dir: impl AsRef<Path>,
    format: ReportFormat,
) -> anyhow::Result<PathBuf> {
    let path = report_path(dir.as_ref(), "word_freq", format)?;
    let file = File::create(&path)?;
    match format {
        ReportFormat::Csv => frequency_csv(table, "word", file)?,
        ReportFormat::Json => frequency_json(table, file)?,
    }
    log::info!("wrote word frequencies to {}", path.display());
    Ok(path)
}

/// Writes `sent_freq.csv` / `sent_freq.json` under `dir`.
pub fn write_sentiment_frequencies(
    table: &FrequencyTable,
    dir: impl AsRef<Path>,
    format: ReportFormat,
) -> anyhow::Result<PathBuf> {
    let path = report_path(dir.as_ref(), "sent_freq", format)?;
    let file = File::create(&path)?;
    match format {
        ReportFormat::Csv => frequency_csv(table, "sentiment", file)?,
        ReportFormat::Json => frequency_json(table, file)?,
    }
    log::info!("wrote sentiment frequencies to {}", path.display());
    Ok(path)
}
