//! End-to-end tests for the build workflow: corpus file on disk, index in the
//! data directory, searches through the backend `auto` selects.

use crate::common::write_json;
use folio::backend::{self, BackendKind};
use folio::corpus::find_source;
use folio::{build_index, BuildOptions, Config, Corpus, ScanOptions, SearchEngine, SearchRequest};
use serde_json::json;
use tempfile::TempDir;

fn full_corpus() -> serde_json::Value {
    json!({
        "datasets": [
            {
                "dataset_number": 1,
                "files": [
                    {
                        "filename": "a.pdf",
                        "filepath": "DataSet 1/a.pdf",
                        "pages": 2,
                        "full_text": "The island was remote.\u{000c}Nobody left the island that winter."
                    },
                    {
                        "filename": "broken.pdf",
                        "filepath": "DataSet 1/broken.pdf",
                        "error": "could not open"
                    }
                ]
            },
            {
                "dataset_number": 2,
                "files": [
                    {
                        "filename": "c.pdf",
                        "filepath": "DataSet 2/c.pdf",
                        "pages": 1,
                        "full_text": "Island hopping notes."
                    },
                    {
                        "filename": "blank.pdf",
                        "filepath": "DataSet 2/blank.pdf",
                        "pages": 1,
                        "full_text": ""
                    }
                ]
            }
        ]
    })
}

fn flat_corpus() -> serde_json::Value {
    json!([
        {
            "dataset": 5,
            "filename": "x.pdf",
            "filepath": "DataSet 5/x.pdf",
            "pages": 1,
            "text": "A flat record about the island."
        },
        { "dataset": 5, "filename": "bad.pdf" }
    ])
}

#[test]
fn test_full_corpus_to_index_to_search() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_data_dir(dir.path());
    write_json(dir.path(), &config.full_corpus_file, &full_corpus());

    let corpus = Corpus::discover(&config).unwrap();
    assert_eq!(corpus.valid_count(), 2, "error and empty files are skipped");

    let report = build_index(&config.index_path(), &corpus, &BuildOptions::default()).unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.errors, 0);
    assert!(config.index_path().is_file());

    let backend = backend::open(BackendKind::Auto, &config, ScanOptions::default()).unwrap();
    assert_eq!(backend.name(), "index");
    let engine = SearchEngine::new(backend);

    let response = engine.search(&SearchRequest::new("island")).unwrap();
    assert_eq!(response.total, 2);
    let a = response.results.iter().find(|h| h.filename == "a.pdf").unwrap();
    assert_eq!(a.match_count, 2);
    assert_eq!(a.pages, 2);

    let dataset_two = engine.search(&SearchRequest::new("island").dataset(2)).unwrap();
    assert_eq!(dataset_two.results[0].filename, "c.pdf");
}

#[test]
fn test_flat_corpus_counts_invalid_records() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_data_dir(dir.path());
    write_json(dir.path(), &config.search_corpus_file, &flat_corpus());

    let source = find_source(&config.corpus_candidates()).unwrap();
    assert!(source.ends_with(&config.search_corpus_file));

    let corpus = Corpus::load(&source).unwrap();
    let report = build_index(&config.index_path(), &corpus, &BuildOptions::default()).unwrap();
    assert_eq!(report.indexed, 1);
    assert_eq!(report.errors, 1);

    let index = backend::open(BackendKind::Index, &config, ScanOptions::default()).unwrap();
    let stats = index.stats().unwrap();
    assert_eq!(stats.total_docs, 1);
    assert_eq!(stats.total_pages, 1);
}

#[test]
fn test_full_artifact_preferred_over_flat() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_data_dir(dir.path());
    write_json(dir.path(), &config.search_corpus_file, &flat_corpus());
    write_json(dir.path(), &config.full_corpus_file, &full_corpus());

    let corpus = Corpus::discover(&config).unwrap();
    assert_eq!(corpus.format(), folio::corpus::CorpusFormat::Full);
}

#[test]
fn test_memory_backend_reads_same_corpus() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_data_dir(dir.path());
    write_json(dir.path(), &config.full_corpus_file, &full_corpus());

    let backend = backend::open(BackendKind::Auto, &config, ScanOptions::default()).unwrap();
    assert_eq!(backend.name(), "memory", "no index yet");

    let engine = SearchEngine::new(backend);
    let response = engine.search(&SearchRequest::new("island")).unwrap();
    let a = response.results.iter().find(|h| h.filename == "a.pdf").unwrap();
    let pages: Vec<Option<u32>> = a.contexts.iter().map(|c| c.page).collect();
    assert_eq!(pages, vec![Some(1), Some(2)]);
}

#[test]
fn test_missing_everything_names_candidates() {
    let dir = TempDir::new().unwrap();
    let config = Config::default().with_data_dir(dir.path().join("empty"));
    let Err(err) = backend::open(BackendKind::Index, &config, ScanOptions::default()) else {
        panic!("index backend opened without an index");
    };
    assert!(matches!(err, folio::Error::IndexNotFound(_)));
    assert!(err.to_string().contains("folio build"));
}
