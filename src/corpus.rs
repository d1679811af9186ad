// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus loading.
//!
//! Two artifacts come out of the extraction run, and either one can feed the
//! index builder or the in-memory backend:
//!
//! - the **full** artifact: `{"datasets": [{"dataset_number", "files": [...]}]}`
//!   with raw `full_text` per file, where pages are separated by form feeds;
//! - the **search index** artifact: a flat array of [`Document`] records with
//!   precomputed `page_offsets`.
//!
//! The format is detected from the JSON shape, not the file name. Records are
//! validated one at a time: a bad record becomes a [`RecordError`] and the rest
//! of the corpus still loads.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{check_page_offsets, derive_page_offsets, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Full,
    SearchIndex,
}

/// A record that could not become a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {position} ({}): {reason}", .filename.as_deref().unwrap_or("unnamed"))]
pub struct RecordError {
    /// 0-based position in the corpus; the record's id would have been `position + 1`.
    pub position: usize,
    pub filename: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub enum CorpusRecord {
    Valid(Document),
    Invalid(RecordError),
}

#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<CorpusRecord>,
    format: CorpusFormat,
    source: Option<PathBuf>,
}

#[derive(Deserialize)]
struct ExtractedDataset {
    dataset_number: u32,
    #[serde(default)]
    files: Vec<Value>,
}

#[derive(Deserialize)]
struct ExtractedFile {
    filename: String,
    filepath: String,
    #[serde(default)]
    pages: u32,
    full_text: String,
}

impl Corpus {
    /// Load the first corpus artifact that exists among the configured candidates.
    pub fn discover(config: &Config) -> Result<Self> {
        let path = find_source(&config.corpus_candidates())?;
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&raw)?;
        let mut corpus = Self::from_value(value).map_err(|reason| Error::InvalidCorpus {
            path: path.to_path_buf(),
            reason,
        })?;
        corpus.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            format = ?corpus.format,
            documents = corpus.valid_count(),
            invalid = corpus.invalid_count(),
            "corpus_loaded"
        );
        Ok(corpus)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value).map_err(|reason| Error::InvalidCorpus {
            path: PathBuf::from("<inline>"),
            reason,
        })
    }

    /// Wrap already-built documents. Ids are reassigned from position.
    pub fn from_documents(docs: Vec<Document>) -> Self {
        let records = docs
            .into_iter()
            .enumerate()
            .map(|(position, doc)| admit(position, doc))
            .collect();
        Self {
            records,
            format: CorpusFormat::SearchIndex,
            source: None,
        }
    }

    fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Array(items) => Ok(Self::from_flat(items)),
            Value::Object(mut map) => match map.remove("datasets") {
                Some(Value::Array(datasets)) => Self::from_full(datasets),
                _ => Err("object corpus has no `datasets` array".to_string()),
            },
            _ => Err("expected an array of documents or an object with `datasets`".to_string()),
        }
    }

    fn from_flat(items: Vec<Value>) -> Self {
        let records = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| {
                let filename = item
                    .get("filename")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                match serde_json::from_value::<Document>(item) {
                    Ok(doc) => admit(position, doc),
                    Err(e) => reject(position, filename, e.to_string()),
                }
            })
            .collect();
        Self {
            records,
            format: CorpusFormat::SearchIndex,
            source: None,
        }
    }

    fn from_full(datasets: Vec<Value>) -> std::result::Result<Self, String> {
        let mut records = Vec::new();
        for (index, dataset) in datasets.into_iter().enumerate() {
            let dataset: ExtractedDataset = serde_json::from_value(dataset)
                .map_err(|e| format!("dataset entry {index}: {e}"))?;
            for file in dataset.files {
                let has_text = file
                    .get("full_text")
                    .and_then(Value::as_str)
                    .is_some_and(|t| !t.is_empty());
                if file.get("error").is_some() || !has_text {
                    debug!(
                        dataset = dataset.dataset_number,
                        filename = file.get("filename").and_then(serde_json::Value::as_str).unwrap_or(""),
                        "extraction_skipped"
                    );
                    continue;
                }
                let position = records.len();
                let filename = file
                    .get("filename")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                let record = match serde_json::from_value::<ExtractedFile>(file) {
                    Ok(file) => {
                        let page_offsets = Some(derive_page_offsets(&file.full_text));
                        admit(
                            position,
                            Document {
                                id: 0,
                                dataset: dataset.dataset_number,
                                filename: file.filename,
                                filepath: file.filepath,
                                pages: file.pages,
                                text: file.full_text,
                                page_offsets,
                            },
                        )
                    }
                    Err(e) => reject(position, filename, e.to_string()),
                };
                records.push(record);
            }
        }
        Ok(Self {
            records,
            format: CorpusFormat::Full,
            source: None,
        })
    }

    pub fn format(&self) -> CorpusFormat {
        self.format
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn records(&self) -> &[CorpusRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.records.iter().filter_map(|r| match r {
            CorpusRecord::Valid(doc) => Some(doc),
            CorpusRecord::Invalid(_) => None,
        })
    }

    pub fn invalid(&self) -> impl Iterator<Item = &RecordError> {
        self.records.iter().filter_map(|r| match r {
            CorpusRecord::Valid(_) => None,
            CorpusRecord::Invalid(err) => Some(err),
        })
    }

    pub fn valid_count(&self) -> usize {
        self.documents().count()
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid().count()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.records
            .into_iter()
            .filter_map(|r| match r {
                CorpusRecord::Valid(doc) => Some(doc),
                CorpusRecord::Invalid(_) => None,
            })
            .collect()
    }
}

/// First candidate that exists as a file.
pub fn find_source(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| Error::CorpusNotFound {
            candidates: candidates.to_vec(),
        })
}

fn admit(position: usize, mut doc: Document) -> CorpusRecord {
    doc.id = (position + 1) as u32;
    if let Some(offsets) = &doc.page_offsets {
        if let Err(e) = check_page_offsets(offsets, doc.text.chars().count()) {
            warn!(filename = %doc.filename, error = %e, "page_offsets_dropped");
            doc.page_offsets = None;
        }
    }
    CorpusRecord::Valid(doc)
}

fn reject(position: usize, filename: Option<String>, reason: String) -> CorpusRecord {
    let err = RecordError {
        position,
        filename,
        reason,
    };
    warn!(error = %err, "record_skipped");
    CorpusRecord::Invalid(err)
}
