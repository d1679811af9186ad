//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use folio::types::Document;
use folio::{build_index, BuildOptions, FtsBackend, MemoryBackend, SearchEngine, SearchResponse};
use tempfile::TempDir;

// Re-export canonical test utilities from folio::testing
pub use folio::testing::{corpus_of, make_doc, phrase, scenario_docs, word};

// ============================================================================
// ENGINES
// ============================================================================

pub fn memory_engine(docs: Vec<Document>) -> SearchEngine {
    SearchEngine::new(Box::new(MemoryBackend::new(corpus_of(docs).into_documents())))
}

/// An index built into a temporary directory. The directory lives as long as
/// the fixture.
pub struct IndexFixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl IndexFixture {
    pub fn backend(&self) -> FtsBackend {
        FtsBackend::open(&self.path).unwrap()
    }

    pub fn engine(&self) -> SearchEngine {
        SearchEngine::new(Box::new(self.backend()))
    }
}

pub fn build_fixture(docs: Vec<Document>) -> IndexFixture {
    build_fixture_with(docs, BuildOptions::default())
}

pub fn build_fixture_with(docs: Vec<Document>, options: BuildOptions) -> IndexFixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("search.db");
    build_index(&path, &corpus_of(docs), &options).unwrap();
    IndexFixture { dir, path }
}

/// Both backends over the same documents, memory first.
pub fn both_engines(docs: Vec<Document>) -> (SearchEngine, SearchEngine, IndexFixture) {
    let fixture = build_fixture(docs.clone());
    let index = fixture.engine();
    (memory_engine(docs), index, fixture)
}

// ============================================================================
// CORPUS FILES
// ============================================================================

pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

/// `n` small single-dataset documents, every one containing "ledger".
pub fn ledger_docs(n: usize) -> Vec<Document> {
    (0..n)
        .map(|i| {
            make_doc(
                (i % 3) as u32 + 1,
                &format!("doc{:03}.pdf", i),
                &format!("Entry {} of the ledger.\x0cSigned and filed.", i),
            )
        })
        .collect()
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

pub fn filenames(response: &SearchResponse) -> Vec<&str> {
    response.results.iter().map(|h| h.filename.as_str()).collect()
}

pub fn sorted_filenames(response: &SearchResponse) -> Vec<String> {
    let mut names: Vec<String> = response.results.iter().map(|h| h.filename.clone()).collect();
    names.sort();
    names
}
