// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search backends.
//!
//! Two implementations of one contract: [`MemoryBackend`] scans the loaded
//! corpus with regexes, [`FtsBackend`] queries the SQLite FTS5 index. They
//! agree on which documents match; counts and contexts differ in detail (FTS
//! tokenizes and stems, the scanner matches substrings).
//!
//! The backend is picked once, at startup, by [`open`].

mod fts;
mod memory;

use std::fmt;
use std::str::FromStr;

use tracing::info;

pub use fts::{FtsBackend, RankedPage};
pub use memory::{MemoryBackend, ScanOptions, MAX_PROXIMITY_PAIRS};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::query::{Combinator, Term};
use crate::types::{CorpusStats, SearchHit};

pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Every document containing `term`, one hit per document.
    fn search(&self, term: &Term) -> Result<Vec<SearchHit>>;

    /// `And`: documents matching all terms, carrying the first term's hit.
    /// `Or`: documents matching any term, merged by filename.
    fn search_multiple(&self, terms: &[Term], op: Combinator) -> Result<Vec<SearchHit>>;

    /// Documents where `first` and `second` occur with at most `max_words`
    /// words between them.
    fn search_proximity(&self, first: &Term, second: &Term, max_words: u32)
        -> Result<Vec<SearchHit>>;

    fn stats(&self) -> Result<CorpusStats>;

    /// Fill in real positions and pages for contexts the search left
    /// unresolved. Called on the final result page only.
    fn locate_contexts(&self, _hits: &mut [SearchHit]) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Index when the index file exists, corpus otherwise.
    #[default]
    Auto,
    Memory,
    Index,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "memory" | "mem" => Ok(Self::Memory),
            "index" | "fts" | "sqlite" => Ok(Self::Index),
            other => Err(format!(
                "unknown backend '{}' (expected auto, memory or index)",
                other
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Memory => "memory",
            Self::Index => "index",
        })
    }
}

/// Open the backend `kind` asks for, using `config` to find its data.
pub fn open(kind: BackendKind, config: &Config, scan: ScanOptions) -> Result<Box<dyn SearchBackend>> {
    let index = config.index_path();
    let backend: Box<dyn SearchBackend> = match kind {
        BackendKind::Index => Box::new(FtsBackend::open(&index)?),
        BackendKind::Memory => Box::new(MemoryBackend::with_options(
            Corpus::discover(config)?.into_documents(),
            scan,
        )),
        BackendKind::Auto if index.is_file() => Box::new(FtsBackend::open(&index)?),
        BackendKind::Auto => match Corpus::discover(config) {
            Ok(corpus) => Box::new(MemoryBackend::with_options(corpus.into_documents(), scan)),
            Err(Error::CorpusNotFound { mut candidates }) => {
                candidates.insert(0, index);
                return Err(Error::CorpusNotFound { candidates });
            }
            Err(e) => return Err(e),
        },
    };
    info!(backend = backend.name(), requested = %kind, "backend_selected");
    Ok(backend)
}
