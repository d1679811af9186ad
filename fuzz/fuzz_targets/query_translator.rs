// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query translation and in-memory evaluation.
//!
//! Unbalanced quotes, stray operators, `NEAR/99999999999`, emoji and control
//! characters all have to come out as a plan, never a panic, and the plan has
//! to evaluate against a real corpus.

#![no_main]

use folio::testing::{corpus_of, scenario_docs};
use folio::{translate, translate_strict, MemoryBackend, SearchEngine, SearchRequest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    static ENGINE: std::sync::OnceLock<SearchEngine> = std::sync::OnceLock::new();
    let engine = ENGINE.get_or_init(|| {
        SearchEngine::new(Box::new(MemoryBackend::new(
            corpus_of(scenario_docs()).into_documents(),
        )))
    });

    let query = String::from_utf8_lossy(data);
    let query: String = query.chars().take(200).collect();

    // INVARIANT 1: translation is total and never yields a blank term
    let plan = translate(&query);
    for term in plan.primary.iter().chain(&plan.exclusions) {
        assert!(!term.text.trim().is_empty(), "blank term from {:?}", query);
    }

    // INVARIANT 2: strict mode rejects exactly the ambiguous plans
    let ambiguous = plan.warnings.iter().any(|w| w.is_ambiguous());
    assert_eq!(translate_strict(&query).is_err(), ambiguous);

    // INVARIANT 3: evaluation succeeds and totals are consistent
    let response = engine
        .search(&SearchRequest::new(query.as_str()).page(1, 10))
        .expect("memory search failed");
    assert!(response.results.len() <= 10);
    assert!(response.total <= 3);
    let summed: usize = response.results.iter().map(|h| h.match_count).sum();
    assert!(summed <= response.total_matches);
});
