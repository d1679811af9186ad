//! Memory and index backends return the same documents.
//!
//! Only the document sets are compared. Counts and contexts legitimately
//! differ: the index counts highlighted tokens in a snippet and stems words,
//! the scanner counts every substring occurrence.

use crate::common::{both_engines, make_doc, scenario_docs, sorted_filenames};
use folio::types::Document;
use folio::{SearchEngine, SearchRequest};

const SCENARIO_QUERIES: &[&str] = &[
    "island",
    "Maxwell",
    "ISLAND",
    "\"flight log\"",
    "island OR winter",
    "island AND log",
    "island AND winter",
    "island NOT Maxwell",
    "island NEAR/5 Maxwell",
    "nothing",
    "zeppelin",
];

fn assert_same_documents(memory: &SearchEngine, index: &SearchEngine, queries: &[&str]) {
    for query in queries {
        let request = SearchRequest::new(*query).page(1, 100);
        let a = memory.search(&request).unwrap();
        let b = index.search(&request).unwrap();
        assert_eq!(
            sorted_filenames(&a),
            sorted_filenames(&b),
            "backends disagree on {:?}",
            query
        );
        assert_eq!(a.total, b.total, "totals disagree on {:?}", query);
    }
}

#[test]
fn test_scenario_parity() {
    let (memory, index, _fixture) = both_engines(scenario_docs());
    assert_same_documents(&memory, &index, SCENARIO_QUERIES);
}

fn memo_docs() -> Vec<Document> {
    vec![
        make_doc(3, "memo-1.pdf", "Budget review for the harbor project.\x0cApproved by the board."),
        make_doc(3, "memo-2.pdf", "The harbor board met twice.\x0cNo budget was discussed."),
        make_doc(4, "memo-3.pdf", "Weather report: calm seas near the harbor."),
        make_doc(4, "memo-4.pdf", "Unrelated catering invoice."),
    ]
}

#[test]
fn test_memo_parity() {
    let (memory, index, _fixture) = both_engines(memo_docs());
    assert_same_documents(
        &memory,
        &index,
        &[
            "harbor",
            "budget",
            "harbor AND budget",
            "harbor OR catering",
            "harbor NOT budget",
            "\"harbor project\"",
            "harbor NEAR/3 board",
            "invoice NOT harbor",
        ],
    );
}

#[test]
fn test_punctuation_does_not_break_index() {
    let (memory, index, _fixture) = both_engines(memo_docs());
    for query in ["report:", "(harbor)", "seas*", "board's"] {
        let request = SearchRequest::new(query);
        assert!(memory.search(&request).is_ok(), "memory failed on {:?}", query);
        assert!(index.search(&request).is_ok(), "index failed on {:?}", query);
    }
}
