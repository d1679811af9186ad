//! The three-document scenario, asserted identically on both backends.
//!
//! a.pdf mentions "island" twice (once per page), b.pdf mentions "island"
//! once with "Maxwell" three words later, c.pdf mentions neither.

use crate::common::{both_engines, filenames, memory_engine, scenario_docs};
use folio::{SearchEngine, SearchRequest};

fn run(engine: &SearchEngine, query: &str) -> folio::SearchResponse {
    engine.search(&SearchRequest::new(query)).unwrap()
}

fn assert_scenario(engine: &SearchEngine) {
    let name = engine.backend().name();

    let island = run(engine, "island");
    assert_eq!(filenames(&island), vec!["a.pdf", "b.pdf"], "{name}: island");
    let counts: Vec<usize> = island.results.iter().map(|h| h.match_count).collect();
    assert_eq!(counts, vec![2, 1], "{name}: island counts");
    assert_eq!(island.total, 2);
    assert_eq!(island.total_matches, 3);

    let quoted = run(engine, "\"island\"");
    assert_eq!(filenames(&quoted), vec!["a.pdf", "b.pdf"], "{name}: quoted");

    let and = run(engine, "island AND Maxwell");
    assert_eq!(filenames(&and), vec!["b.pdf"], "{name}: AND");

    let near = run(engine, "island NEAR/5 Maxwell");
    assert_eq!(filenames(&near), vec!["b.pdf"], "{name}: NEAR/5");

    let too_far = run(engine, "island NEAR/2 Maxwell");
    assert_eq!(too_far.total, 0, "{name}: NEAR/2");

    let not = run(engine, "island NOT Maxwell");
    assert_eq!(filenames(&not), vec!["a.pdf"], "{name}: NOT");

    let none = run(engine, "zeppelin");
    assert_eq!(none.total, 0, "{name}: no match");
    assert!(none.results.is_empty());
}

// ============================================================================
// BOTH BACKENDS
// ============================================================================

#[test]
fn test_scenario_memory() {
    assert_scenario(&memory_engine(scenario_docs()));
}

#[test]
fn test_scenario_index() {
    let (_, index, _fixture) = both_engines(scenario_docs());
    assert_scenario(&index);
}

#[test]
fn test_stats_agree() {
    let (memory, index, _fixture) = both_engines(scenario_docs());
    let a = memory.stats().unwrap();
    let b = index.stats().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.total_docs, 3);
    assert_eq!(a.total_pages, 6);
}

// ============================================================================
// CONTEXTS AND PAGES
// ============================================================================

#[test]
fn test_memory_contexts_cite_pages() {
    let response = run(&memory_engine(scenario_docs()), "island");
    let a = &response.results[0];
    let pages: Vec<Option<u32>> = a.contexts.iter().map(|c| c.page).collect();
    assert_eq!(pages, vec![Some(1), Some(2)]);
    assert!(a.contexts.iter().all(|c| c.matched == "island"));
}

#[test]
fn test_index_contexts_are_located() {
    let (_, index, _fixture) = both_engines(scenario_docs());
    let response = run(&index, "island");
    for hit in &response.results {
        assert!(!hit.contexts.is_empty(), "{} has no context", hit.filename);
        for ctx in &hit.contexts {
            assert!(ctx.page.is_some(), "{} context was not located", hit.filename);
            assert!(!ctx.context.contains(">>>>"));
        }
    }
}

#[test]
fn test_proximity_context_label() {
    let response = run(&memory_engine(scenario_docs()), "island NEAR/5 Maxwell");
    let ctx = &response.results[0].contexts[0];
    assert_eq!(ctx.matched, "island...Maxwell");
    assert!(ctx.context.contains("island flight log named Maxwell"));
}

// ============================================================================
// QUERY WARNINGS
// ============================================================================

#[test]
fn test_lenient_mode_reports_warnings() {
    let engine = memory_engine(scenario_docs());
    let response = run(&engine, "island OR winter AND Maxwell");
    assert!(!response.warnings.is_empty());
}

#[test]
fn test_strict_mode_rejects_ambiguity() {
    let engine = memory_engine(scenario_docs());
    let mut request = SearchRequest::new("\"island flight");
    request.strict = true;
    assert!(matches!(engine.search(&request), Err(folio::Error::Query(_))));

    let mut plain = SearchRequest::new("island");
    plain.strict = true;
    assert_eq!(engine.search(&plain).unwrap().total, 2);
}
