// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Rendering terms as FTS5 match expressions.
//!
//! Only FTS5 barewords (ASCII alphanumerics, `_`, anything non-ASCII) go in
//! unquoted; everything else becomes a string so user punctuation can never
//! be read as FTS5 syntax. `AND`/`OR`/`NOT`/`NEAR` are quoted too: in a term
//! they are text, not operators.

use crate::query::Term;

pub(crate) fn term(term: &Term) -> String {
    if term.quoted {
        return quote(&term.text);
    }
    term.text
        .split_whitespace()
        .map(word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Implicit AND of every term.
pub(crate) fn all_of(terms: &[Term]) -> String {
    terms
        .iter()
        .map(term)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn any_of(terms: &[Term]) -> String {
    terms
        .iter()
        .map(term)
        .filter(|t| !t.is_empty())
        .map(|t| if t.contains(' ') { format!("({})", t) } else { t })
        .collect::<Vec<_>>()
        .join(" OR ")
}

pub(crate) fn near(first: &Term, second: &Term, max_words: u32) -> String {
    format!("NEAR({} {}, {})", operand(first), operand(second), max_words)
}

/// Last-resort rewrite for an expression FTS5 rejected: word characters,
/// whitespace, and quotes only if they pair up.
pub(crate) fn sanitize(expression: &str) -> String {
    let kept: String = expression
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '"' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let kept = if kept.matches('"').count() % 2 == 1 {
        kept.replace('"', " ")
    } else {
        kept
    };
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A NEAR group holds phrases, so multi-word operands are quoted whole.
fn operand(t: &Term) -> String {
    if t.quoted || t.text.split_whitespace().nth(1).is_some() {
        quote(&t.text)
    } else {
        word(t.text.trim())
    }
}

fn word(w: &str) -> String {
    if is_bareword(w) {
        w.to_string()
    } else {
        quote(w)
    }
}

fn is_bareword(w: &str) -> bool {
    !w.is_empty()
        && w.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii())
        && !["AND", "OR", "NOT", "NEAR"].contains(&w)
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
