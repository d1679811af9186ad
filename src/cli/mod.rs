// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the folio command-line interface.
//!
//! Four subcommands: `build` turns the extracted corpus into the SQLite index,
//! `search` runs one query, `shell` reads queries from stdin until `quit`, and
//! `stats` prints corpus totals. Global flags and `FOLIO_*` environment
//! variables override [`folio::Config`] defaults.

pub mod display;
pub mod export;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONTEXT_CHARS, DEFAULT_PER_PAGE, ENV_DATA_DIR, ENV_INDEX,
};
use folio::{BackendKind, Config, ScanOptions, SearchRequest, SortOrder};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Full-text search over scanned-document corpora",
    version
)]
pub struct Cli {
    /// Directory holding the corpus files and the index
    #[arg(long, global = true, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    /// Index file; relative paths resolve against the data directory
    #[arg(long, global = true, env = ENV_INDEX)]
    pub index: Option<PathBuf>,

    /// Log level (FOLIO_LOG takes precedence when set)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(index) = &self.index {
            config = config.with_index_file(index);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the full-text index from the extracted corpus
    Build {
        /// Rebuild even if the index already exists
        #[arg(long)]
        force: bool,

        /// Corpus JSON to index instead of the discovered one
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Documents per committed transaction
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Search the corpus and print matching documents
    Search {
        /// Query words; quoted phrases, AND, OR, NOT and NEAR/N are understood
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        #[command(flatten)]
        options: SearchArgs,

        /// Write every result in this format instead of printing a page
        #[arg(long, value_enum)]
        export: Option<ExportFormat>,

        /// Export destination (stdout when omitted)
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,
    },

    /// Interactive search prompt
    Shell {
        #[command(flatten)]
        options: SearchArgs,
    },

    /// Print document and page totals
    Stats {
        /// auto, memory or index
        #[arg(long, default_value = "auto")]
        backend: BackendKind,
    },
}

/// Options shared by `search` and `shell`.
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// auto, memory or index
    #[arg(long, default_value = "auto")]
    pub backend: BackendKind,

    /// Only documents from this dataset
    #[arg(long)]
    pub dataset: Option<u32>,

    /// Minimum page count
    #[arg(long, default_value_t = 0)]
    pub min_pages: u32,

    /// Maximum page count
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// relevance, filename or dataset
    #[arg(long, default_value = "relevance")]
    pub sort: SortOrder,

    /// Result page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Results per page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,

    /// Match case exactly (memory backend only)
    #[arg(long)]
    pub case_sensitive: bool,

    /// Match whole words only (memory backend only)
    #[arg(long)]
    pub whole_word: bool,

    /// Characters of context on each side of a match (memory backend only)
    #[arg(long, default_value_t = DEFAULT_CONTEXT_CHARS)]
    pub context_chars: usize,

    /// Reject ambiguous queries instead of guessing
    #[arg(long)]
    pub strict: bool,
}

impl SearchArgs {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            context_chars: self.context_chars,
        }
    }

    pub fn request(&self, query: impl Into<String>) -> SearchRequest {
        let mut request = SearchRequest::new(query)
            .page(self.page, self.per_page)
            .pages_between(self.min_pages, self.max_pages)
            .sort(self.sort);
        if let Some(dataset) = self.dataset {
            request = request.dataset(dataset);
        }
        request.strict = self.strict;
        request
    }

    /// Every result on one page. Export rows carry no contexts, so none are
    /// kept or located.
    pub fn export_request(&self, query: impl Into<String>) -> SearchRequest {
        self.request(query).page(1, usize::MAX).contexts(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}
