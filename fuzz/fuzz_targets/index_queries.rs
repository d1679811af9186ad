// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for FTS5 expression rendering.
//!
//! Whatever the user types becomes an FTS5 MATCH expression. Syntax FTS5
//! rejects must fall back or come back empty; it must never surface as an
//! error or a panic.

#![no_main]

use folio::testing::{corpus_of, scenario_docs};
use folio::{build_index, BuildOptions, FtsBackend, SearchEngine, SearchRequest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    static ENGINE: std::sync::OnceLock<SearchEngine> = std::sync::OnceLock::new();
    let engine = ENGINE.get_or_init(|| {
        let path = std::env::temp_dir().join(format!("folio-fuzz-{}.db", std::process::id()));
        build_index(&path, &corpus_of(scenario_docs()), &BuildOptions::default())
            .expect("failed to build fuzz index");
        SearchEngine::new(Box::new(FtsBackend::open(&path).expect("failed to open fuzz index")))
    });

    let query = String::from_utf8_lossy(data);
    let query: String = query.chars().take(200).collect();

    // INVARIANT: no query string produces an error
    let response = engine
        .search(&SearchRequest::new(query.as_str()).page(1, 10))
        .unwrap_or_else(|e| panic!("index search failed on {:?}: {}", query, e));
    assert!(response.total <= 3);
    for hit in &response.results {
        assert!(hit.match_count >= 1);
    }
});
