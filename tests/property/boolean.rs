//! AND, OR and NOT through the engine agree with set algebra over documents.
//!
//! Documents are drawn from a vocabulary where no word contains another, so
//! substring scanning and whole-word membership coincide.

use std::collections::BTreeSet;

use crate::common::{make_doc, memory_engine};
use folio::types::Document;
use folio::{SearchEngine, SearchRequest};
use proptest::prelude::*;

const VOCAB: &[&str] = &["alpha", "bravo", "charlie", "delta", "echo"];

fn docs_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..VOCAB.len(), 0..6), 1..12)
}

fn build(word_lists: &[Vec<usize>]) -> Vec<Document> {
    word_lists
        .iter()
        .enumerate()
        .map(|(i, words)| {
            let text: Vec<&str> = words.iter().map(|&w| VOCAB[w]).collect();
            make_doc(1, &format!("d{:02}.pdf", i), &format!("start {} end", text.join(" ")))
        })
        .collect()
}

fn containing(word_lists: &[Vec<usize>], word: usize) -> BTreeSet<String> {
    word_lists
        .iter()
        .enumerate()
        .filter(|(_, words)| words.contains(&word))
        .map(|(i, _)| format!("d{:02}.pdf", i))
        .collect()
}

fn found(engine: &SearchEngine, query: &str) -> BTreeSet<String> {
    engine
        .search(&SearchRequest::new(query).page(1, 1000))
        .unwrap()
        .results
        .into_iter()
        .map(|h| h.filename)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_and_is_intersection(lists in docs_strategy(), a in 0..VOCAB.len(), b in 0..VOCAB.len()) {
        let engine = memory_engine(build(&lists));
        let expected: BTreeSet<String> = containing(&lists, a)
            .intersection(&containing(&lists, b))
            .cloned()
            .collect();
        prop_assert_eq!(found(&engine, &format!("{} AND {}", VOCAB[a], VOCAB[b])), expected);
    }

    #[test]
    fn prop_or_is_union(lists in docs_strategy(), a in 0..VOCAB.len(), b in 0..VOCAB.len()) {
        let engine = memory_engine(build(&lists));
        let expected: BTreeSet<String> = containing(&lists, a)
            .union(&containing(&lists, b))
            .cloned()
            .collect();
        prop_assert_eq!(found(&engine, &format!("{} or {}", VOCAB[a], VOCAB[b])), expected);
    }

    #[test]
    fn prop_not_is_difference(lists in docs_strategy(), a in 0..VOCAB.len(), b in 0..VOCAB.len()) {
        let engine = memory_engine(build(&lists));
        let expected: BTreeSet<String> = containing(&lists, a)
            .difference(&containing(&lists, b))
            .cloned()
            .collect();
        prop_assert_eq!(found(&engine, &format!("{} NOT {}", VOCAB[a], VOCAB[b])), expected);
    }

    /// OR counts add up: each hit's match_count is the sum of both terms' counts.
    #[test]
    fn prop_or_sums_counts(lists in docs_strategy(), a in 0..VOCAB.len(), b in 0..VOCAB.len()) {
        prop_assume!(a != b);
        let engine = memory_engine(build(&lists));
        let response = engine
            .search(&SearchRequest::new(format!("{} OR {}", VOCAB[a], VOCAB[b])).page(1, 1000))
            .unwrap();
        for hit in &response.results {
            let index: usize = hit.filename[1..3].parse().unwrap();
            let words = &lists[index];
            let expected = words.iter().filter(|&&w| w == a || w == b).count();
            prop_assert_eq!(hit.match_count, expected);
        }
    }

    /// Case never changes which documents match.
    #[test]
    fn prop_case_insensitive(lists in docs_strategy(), a in 0..VOCAB.len()) {
        let engine = memory_engine(build(&lists));
        let lower = found(&engine, VOCAB[a]);
        let upper = found(&engine, &VOCAB[a].to_uppercase());
        prop_assert_eq!(&lower, &upper);
        prop_assert_eq!(lower, containing(&lists, a));
    }
}
