// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Crate-wide error type.
//!
//! Query problems never show up here unless the caller asked for strict
//! translation: lenient translation repairs them and reports warnings instead.
//! Everything else (a missing corpus, an unreadable index, SQLite failures) is
//! fatal to the operation that hit it.

use std::path::PathBuf;

use thiserror::Error;

use crate::query::QueryError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no corpus found (tried {}); run the text extractor first", display_paths(.candidates))]
    CorpusNotFound { candidates: Vec<PathBuf> },

    #[error("corpus {path} is not a recognised format: {reason}")]
    InvalidCorpus { path: PathBuf, reason: String },

    #[error("search index {} not found; run `folio build` first", .0.display())]
    IndexNotFound(PathBuf),

    #[error(transparent)]
    Query(#[from] QueryError),
}

pub type Result<T> = std::result::Result<T, Error>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
