//! Rebuilds, skips and batch-size independence.

use crate::common::{build_fixture_with, corpus_of, ledger_docs, scenario_docs, write_json};
use folio::{
    build_index, ensure_index, BuildOptions, BuildOutcome, FtsBackend, SearchBackend, SearchEngine,
    SearchRequest,
};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_ensure_index_builds_once() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("search.db");
    let source = write_json(
        dir.path(),
        "corpus.json",
        &json!([{
            "dataset": 1, "filename": "a.pdf", "filepath": "a.pdf", "pages": 1,
            "text": "island"
        }]),
    );

    let first = ensure_index(&target, &source, &BuildOptions::default(), false).unwrap();
    assert!(matches!(first, BuildOutcome::Built(ref r) if r.indexed == 1));

    let second = ensure_index(&target, &source, &BuildOptions::default(), false).unwrap();
    assert_eq!(second, BuildOutcome::Existing(target.clone()));

    let forced = ensure_index(&target, &source, &BuildOptions::default(), true).unwrap();
    assert!(matches!(forced, BuildOutcome::Built(_)));
}

#[test]
fn test_rebuild_from_smaller_corpus_replaces_contents() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("search.db");

    build_index(&target, &corpus_of(ledger_docs(30)), &BuildOptions::default()).unwrap();
    build_index(&target, &corpus_of(scenario_docs()), &BuildOptions::default()).unwrap();

    let index = FtsBackend::open(&target).unwrap();
    assert_eq!(index.stats().unwrap().total_docs, 3);
    let engine = SearchEngine::new(Box::new(index));
    assert_eq!(engine.search(&SearchRequest::new("ledger")).unwrap().total, 0);
    assert_eq!(engine.search(&SearchRequest::new("island")).unwrap().total, 2);
}

#[test]
fn test_batch_size_does_not_change_results() {
    let small = build_fixture_with(ledger_docs(25), BuildOptions { batch_size: 4 });
    let large = build_fixture_with(ledger_docs(25), BuildOptions { batch_size: 1000 });

    let request = SearchRequest::new("ledger").dataset(3).page(1, 100);
    let a = small.engine().search(&request).unwrap();
    let b = large.engine().search(&request).unwrap();
    assert_eq!(a.total, b.total);

    let mut names_a: Vec<_> = a.results.iter().map(|h| h.filename.clone()).collect();
    let mut names_b: Vec<_> = b.results.iter().map(|h| h.filename.clone()).collect();
    names_a.sort();
    names_b.sort();
    assert_eq!(names_a, names_b);
}

#[test]
fn test_batch_report_counts_partial_tail() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("search.db");
    let report = build_index(&target, &corpus_of(ledger_docs(10)), &BuildOptions { batch_size: 4 })
        .unwrap();
    assert_eq!(report.indexed, 10);
    assert_eq!(report.batches, 3);
    assert!(report.db_size_bytes > 0);
}

#[test]
fn test_published_index_has_no_sidecars() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("search.db");
    build_index(&target, &corpus_of(scenario_docs()), &BuildOptions::default()).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.contains(&"search.db".to_string()));
    for name in &names {
        assert!(!name.contains(".building"), "staging file left behind: {}", name);
        assert!(!name.ends_with("-wal"), "journal left behind: {}", name);
    }
}

#[test]
fn test_two_builds_give_identical_results() {
    let first = build_fixture_with(scenario_docs(), BuildOptions::default());
    let second = build_fixture_with(scenario_docs(), BuildOptions::default());
    assert_eq!(
        first.backend().stats().unwrap(),
        second.backend().stats().unwrap()
    );

    let (a, b) = (first.engine(), second.engine());
    for query in ["island", "Maxwell", "island NOT Maxwell", "island NEAR/5 Maxwell", "winter OR log"] {
        let request = SearchRequest::new(query);
        assert_eq!(a.search(&request).unwrap(), b.search(&request).unwrap(), "{}", query);
    }
}

#[test]
fn test_unique_term_round_trip() {
    let fixture = build_fixture_with(scenario_docs(), BuildOptions::default());
    let response = fixture.engine().search(&SearchRequest::new("winter")).unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].filename, "a.pdf");
    assert!(response.results[0].match_count >= 1);
}
