//! Query translation invariants on arbitrary and structured input.

use folio::query::{translate, translate_strict, Combinator, QueryWarning};
use proptest::prelude::*;

/// Lowercase words that are never keywords.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{3,8}")
        .unwrap()
        .prop_filter("not a keyword", |w| !matches!(w.as_str(), "and" | "not"))
}

fn keyword_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["AND", "and", "And", "OR", "or", "oR"])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Anything at all translates, and no term comes out blank.
    #[test]
    fn prop_translate_total(raw in ".{0,64}") {
        let plan = translate(&raw);
        for term in plan.primary.iter().chain(&plan.exclusions) {
            prop_assert!(!term.text.trim().is_empty(), "blank term from {:?}", raw);
        }
        for pair in &plan.proximity {
            prop_assert!(!pair.first.text.trim().is_empty());
            prop_assert!(!pair.second.text.trim().is_empty());
        }
    }

    /// Strict translation succeeds exactly when no ambiguity was reported.
    #[test]
    fn prop_strict_agrees_with_warnings(raw in "[a-z\" ]{0,12}( (AND|OR|NOT|NEAR/[0-9]) [a-z\"]{0,6}){0,3}") {
        let plan = translate(&raw);
        let ambiguous = plan.warnings.iter().any(QueryWarning::is_ambiguous);
        prop_assert_eq!(translate_strict(&raw).is_err(), ambiguous);
    }

    /// Plain words are one unquoted term, whitespace normalised.
    #[test]
    fn prop_plain_words_are_one_term(words in prop::collection::vec(word_strategy(), 1..5)) {
        let plan = translate(&words.join("   "));
        prop_assert_eq!(plan.combinator, Combinator::Single);
        prop_assert_eq!(plan.primary.len(), 1);
        prop_assert_eq!(&plan.primary[0].text, &words.join(" "));
        prop_assert!(!plan.primary[0].quoted);
        prop_assert!(plan.warnings.is_empty());
    }

    /// Connective keywords are case-insensitive.
    #[test]
    fn prop_connectives_any_case(a in word_strategy(), b in word_strategy(), op in keyword_strategy()) {
        let plan = translate(&format!("{} {} {}", a, op, b));
        let expected = if op.eq_ignore_ascii_case("AND") { Combinator::And } else { Combinator::Or };
        prop_assert_eq!(plan.combinator, expected);
        prop_assert_eq!(plan.primary.len(), 2);
    }

    /// Quoted text survives verbatim, keywords inside it included.
    #[test]
    fn prop_phrases_are_opaque(a in word_strategy(), b in word_strategy()) {
        let phrase = format!("{} AND {}", a, b);
        let plan = translate(&format!("\"{}\"", phrase));
        prop_assert_eq!(plan.primary.len(), 1);
        prop_assert!(plan.primary[0].quoted);
        prop_assert_eq!(&plan.primary[0].text, &phrase);
    }

    /// Every NOT segment becomes one exclusion.
    #[test]
    fn prop_not_segments(head in word_strategy(), excluded in prop::collection::vec(word_strategy(), 1..4)) {
        let query = std::iter::once(head.clone())
            .chain(excluded.iter().map(|w| format!("NOT {}", w)))
            .collect::<Vec<_>>()
            .join(" ");
        let plan = translate(&query);
        prop_assert_eq!(plan.primary.len(), 1);
        prop_assert_eq!(&plan.primary[0].text, &head);
        let texts: Vec<&str> = plan.exclusions.iter().map(|t| t.text.as_str()).collect();
        let expected: Vec<&str> = excluded.iter().map(String::as_str).collect();
        prop_assert_eq!(texts, expected);
    }
}
