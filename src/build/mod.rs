//! Index builder: corpus in, single-file SQLite FTS5 index out.
//!
//! The build always starts from scratch. Rows go into a staging file next to
//! the target (`search.db.building`) in batches, one transaction each. Only
//! after the secondary indexes and the FTS `optimize` pass succeed is the
//! staging file renamed over the target, so readers see either the old index
//! or the complete new one. On failure the staging file is removed.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::{params, Connection};
use tracing::{info, warn};

use crate::config::DEFAULT_BATCH_SIZE;
use crate::corpus::{Corpus, CorpusRecord};
use crate::error::Result;
use crate::store;
use crate::types::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Documents per transaction.
    pub batch_size: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub indexed: usize,
    /// Records skipped because they failed validation.
    pub errors: usize,
    pub batches: usize,
    pub db_size_bytes: u64,
    pub elapsed: Duration,
}

/// Snapshot handed to the progress callback after each committed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildProgress {
    pub processed: usize,
    pub total: usize,
    pub indexed: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Built(BuildReport),
    /// The index was already there and no rebuild was requested.
    Existing(PathBuf),
}

#[derive(Debug, Default)]
struct Tally {
    indexed: usize,
    errors: usize,
    batches: usize,
}

/// Build the index at `target` from `corpus`, replacing whatever is there.
pub fn build_index(target: &Path, corpus: &Corpus, options: &BuildOptions) -> Result<BuildReport> {
    build_with(target, corpus, options, |_| {})
}

/// [`build_index`] driving a progress bar, one tick per committed batch.
#[cfg(feature = "parallel")]
pub fn build_index_with_progress(
    target: &Path,
    corpus: &Corpus,
    options: &BuildOptions,
    progress: &ProgressBar,
) -> Result<BuildReport> {
    progress.set_length(corpus.len() as u64);
    let report = build_with(target, corpus, options, |p| {
        progress.set_position(p.processed as u64);
        progress.set_message(format!("{} indexed, {} skipped", p.indexed, p.errors));
    });
    progress.finish_and_clear();
    report
}

/// Progress bar style shared by the CLI build command.
#[cfg(feature = "parallel")]
pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

/// Build only when needed: an existing index is left alone unless `force`.
pub fn ensure_index(
    target: &Path,
    source: &Path,
    options: &BuildOptions,
    force: bool,
) -> Result<BuildOutcome> {
    if target.exists() && !force {
        info!(path = %target.display(), "index_exists");
        return Ok(BuildOutcome::Existing(target.to_path_buf()));
    }
    let corpus = Corpus::load(source)?;
    build_index(target, &corpus, options).map(BuildOutcome::Built)
}

fn build_with(
    target: &Path,
    corpus: &Corpus,
    options: &BuildOptions,
    mut on_batch: impl FnMut(BuildProgress),
) -> Result<BuildReport> {
    let started = Instant::now();
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = store::sibling(target, ".building");
    store::remove_database(&staging)?;

    info!(
        target = %target.display(),
        records = corpus.len(),
        batch_size = options.batch_size,
        "build_started"
    );

    let result = write_index(&staging, corpus, options, &mut on_batch)
        .and_then(|tally| publish(&staging, target).map(|()| tally));

    let tally = match result {
        Ok(tally) => tally,
        Err(e) => {
            if let Err(cleanup) = store::remove_database(&staging) {
                warn!(path = %staging.display(), error = %cleanup, "staging_cleanup_failed");
            }
            return Err(e);
        }
    };

    let report = BuildReport {
        indexed: tally.indexed,
        errors: tally.errors,
        batches: tally.batches,
        db_size_bytes: fs::metadata(target)?.len(),
        elapsed: started.elapsed(),
    };
    info!(
        indexed = report.indexed,
        errors = report.errors,
        batches = report.batches,
        db_size_bytes = report.db_size_bytes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "build_complete"
    );
    Ok(report)
}

fn write_index(
    path: &Path,
    corpus: &Corpus,
    options: &BuildOptions,
    on_batch: &mut impl FnMut(BuildProgress),
) -> Result<Tally> {
    let mut conn = store::open_writer(path)?;
    conn.execute_batch(store::SCHEMA)?;

    let batch_size = options.batch_size.max(1);
    let total = corpus.len();
    let mut tally = Tally::default();
    let mut pending: Vec<&Document> = Vec::with_capacity(batch_size.min(total));

    for (processed, record) in corpus.records().iter().enumerate() {
        match record {
            CorpusRecord::Valid(doc) => pending.push(doc),
            CorpusRecord::Invalid(_) => tally.errors += 1,
        }
        if pending.len() >= batch_size {
            flush(&mut conn, &mut pending, &mut tally)?;
            on_batch(BuildProgress {
                processed: processed + 1,
                total,
                indexed: tally.indexed,
                errors: tally.errors,
            });
        }
    }
    if !pending.is_empty() {
        flush(&mut conn, &mut pending, &mut tally)?;
    }
    on_batch(BuildProgress {
        processed: total,
        total,
        indexed: tally.indexed,
        errors: tally.errors,
    });

    conn.execute_batch(store::SECONDARY_INDEXES)?;
    conn.execute(store::OPTIMIZE, [])?;
    // Fold the WAL back in so the published file stands alone.
    conn.execute_batch("PRAGMA journal_mode = DELETE;")?;
    conn.close().map_err(|(_, e)| e)?;
    Ok(tally)
}

fn flush(conn: &mut Connection, pending: &mut Vec<&Document>, tally: &mut Tally) -> Result<()> {
    let tx = conn.transaction()?;
    {
        let mut insert_doc = tx.prepare_cached(store::INSERT_DOCUMENT)?;
        let mut insert_text = tx.prepare_cached(store::INSERT_TEXT)?;
        for doc in pending.iter() {
            let offsets = match doc.page_offsets.as_deref() {
                Some(offsets) if !offsets.is_empty() => Some(serde_json::to_string(offsets)?),
                _ => None,
            };
            insert_doc.execute(params![
                doc.id,
                doc.dataset,
                doc.filename,
                doc.filepath,
                doc.pages,
                offsets
            ])?;
            insert_text.execute(params![doc.id, doc.text])?;
        }
    }
    tx.commit()?;

    tally.indexed += pending.len();
    tally.batches += 1;
    info!(
        batch = tally.batches,
        size = pending.len(),
        indexed = tally.indexed,
        "build_batch_committed"
    );
    pending.clear();
    Ok(())
}

fn publish(staging: &Path, target: &Path) -> Result<()> {
    // Stale journal files would be replayed against the new database.
    fs::remove_file(store::sibling(target, "-wal")).or_else(ignore_missing)?;
    fs::remove_file(store::sibling(target, "-shm")).or_else(ignore_missing)?;
    fs::rename(staging, target)?;
    Ok(())
}

fn ignore_missing(e: std::io::Error) -> std::io::Result<()> {
    if e.kind() == std::io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(e)
    }
}
