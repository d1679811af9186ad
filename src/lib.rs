//! Full-text search over a corpus of scanned documents.
//!
//! Extracted document text goes in; ranked, paginated, page-cited results come
//! out. Two backends answer the same queries: an in-memory regex scanner that
//! needs nothing but the corpus, and a SQLite FTS5 index built ahead of time.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐     ┌───────────┐     ┌───────────────┐
//! │ corpus.rs │────▶│  build/   │────▶│   search.db   │
//! │ Document  │     │  batched  │     │ documents +   │
//! │ loaders   │     │  FTS5 ETL │     │ documents_fts │
//! └───────────┘     └───────────┘     └───────────────┘
//!       │                                     │
//!       ▼                                     ▼
//! ┌────────────────┐                 ┌────────────────┐
//! │ backend/memory │                 │  backend/fts   │
//! └────────────────┘                 └────────────────┘
//!       └──────────── SearchBackend ──────────┘
//!                           │
//! ┌───────────┐     ┌───────────────┐
//! │  query/   │────▶│   engine.rs   │────▶ SearchResponse
//! │ QueryPlan │     │ assemble/page │
//! └───────────┘     └───────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use folio::{MemoryBackend, SearchEngine, SearchRequest};
//! use folio::testing::{corpus_of, scenario_docs};
//!
//! let docs = corpus_of(scenario_docs()).into_documents();
//! let engine = SearchEngine::new(Box::new(MemoryBackend::new(docs)));
//!
//! let response = engine.search(&SearchRequest::new("island NOT Maxwell")).unwrap();
//! assert_eq!(response.total, 1);
//! assert_eq!(response.results[0].filename, "a.pdf");
//! ```

pub mod backend;
pub mod build;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod logging;
pub mod merge;
pub mod query;
pub mod store;
pub mod testing;
pub mod types;

pub use backend::{BackendKind, FtsBackend, MemoryBackend, ScanOptions, SearchBackend};
pub use build::{build_index, ensure_index, BuildOptions, BuildOutcome, BuildReport};
pub use config::Config;
pub use corpus::{Corpus, CorpusRecord, RecordError};
pub use engine::{SearchEngine, SearchRequest, SearchResponse, SortOrder};
pub use error::{Error, Result};
pub use query::{translate, translate_strict, QueryPlan, QueryWarning, Term};
pub use types::{page_at, Context, CorpusStats, Document, SearchHit};
