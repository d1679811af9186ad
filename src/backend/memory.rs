// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-memory regex scanner.
//!
//! Holds the whole corpus and scans every document per query. Slow on large
//! corpora but needs no index, and it is the reference the FTS backend is
//! checked against.
//!
//! Regex offsets are bytes; contexts report character positions so pages
//! resolve against `page_offsets`.

use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use tracing::info;

use super::SearchBackend;
use crate::error::Result;
use crate::merge::{intersect, HitMerger};
use crate::query::{Combinator, Term};
use crate::types::{Context, CorpusStats, Document, SearchHit};

/// Qualifying pairs recorded per document before proximity search moves on.
pub const MAX_PROXIMITY_PAIRS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub case_sensitive: bool,
    /// Wrap terms in `\b` so `island` does not match `islands`.
    pub whole_word: bool,
    /// Characters of context on each side of a match.
    pub context_chars: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            context_chars: crate::config::DEFAULT_CONTEXT_CHARS,
        }
    }
}

pub struct MemoryBackend {
    docs: Vec<Document>,
    options: ScanOptions,
}

impl MemoryBackend {
    pub fn new(docs: Vec<Document>) -> Self {
        Self::with_options(docs, ScanOptions::default())
    }

    pub fn with_options(docs: Vec<Document>, options: ScanOptions) -> Self {
        info!(
            documents = docs.len(),
            case_sensitive = options.case_sensitive,
            whole_word = options.whole_word,
            "corpus_loaded_in_memory"
        );
        Self { docs, options }
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    fn compile(&self, term: &Term, whole_word: bool) -> Result<Regex> {
        let escaped = regex::escape(&term.text);
        let pattern = if whole_word {
            format!(r"\b{}\b", escaped)
        } else {
            escaped
        };
        Ok(RegexBuilder::new(&pattern)
            .case_insensitive(!self.options.case_sensitive)
            .build()?)
    }

    /// Run `f` over every document, keeping corpus order.
    fn scan<F>(&self, f: F) -> Vec<SearchHit>
    where
        F: Fn(&Document) -> Option<SearchHit> + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            self.docs.par_iter().filter_map(f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.docs.iter().filter_map(f).collect()
        }
    }

    fn matches_in(&self, doc: &Document, pattern: &Regex) -> Option<SearchHit> {
        let mut cursor = CharCursor::new(&doc.text);
        let contexts: Vec<Context> = pattern
            .find_iter(&doc.text)
            .map(|m| {
                let position = cursor.char_offset(m.start());
                Context {
                    position,
                    context: excerpt(&doc.text, m.start(), m.end(), self.options.context_chars),
                    matched: m.as_str().to_string(),
                    page: doc.page_at(position),
                }
            })
            .collect();

        if contexts.is_empty() {
            None
        } else {
            Some(SearchHit::for_document(doc, contexts.len(), contexts))
        }
    }

    fn pairs_in(
        &self,
        doc: &Document,
        first: &Regex,
        second: &Regex,
        max_words: u32,
        label: &str,
    ) -> Option<SearchHit> {
        let text = doc.text.as_str();
        let spans_a: Vec<(usize, usize)> = first.find_iter(text).map(|m| (m.start(), m.end())).collect();
        if spans_a.is_empty() {
            return None;
        }
        let spans_b: Vec<(usize, usize)> = second.find_iter(text).map(|m| (m.start(), m.end())).collect();

        let mut pairs = Vec::new();
        'outer: for &(s1, e1) in &spans_a {
            for &(s2, e2) in &spans_b {
                let gap_start = e1.min(e2);
                let gap_end = s1.max(s2);
                if gap_start >= gap_end {
                    continue;
                }
                if text[gap_start..gap_end].split_whitespace().count() <= max_words as usize {
                    pairs.push((s1.min(s2), e1.max(e2)));
                    if pairs.len() >= MAX_PROXIMITY_PAIRS {
                        break 'outer;
                    }
                }
            }
        }
        if pairs.is_empty() {
            return None;
        }

        let mut cursor = CharCursor::new(text);
        let contexts: Vec<Context> = pairs
            .into_iter()
            .map(|(start, end)| {
                let position = cursor.char_offset(start);
                Context {
                    position,
                    context: excerpt(text, start, end, self.options.context_chars),
                    matched: label.to_string(),
                    page: doc.page_at(position),
                }
            })
            .collect();
        Some(SearchHit::for_document(doc, contexts.len(), contexts))
    }
}

impl SearchBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn search(&self, term: &Term) -> Result<Vec<SearchHit>> {
        let pattern = self.compile(term, self.options.whole_word)?;
        let hits = self.scan(|doc| self.matches_in(doc, &pattern));
        info!(
            term = %term.text,
            result_count = hits.len(),
            match_count = hits.iter().map(|h| h.match_count).sum::<usize>(),
            "search_executed"
        );
        Ok(hits)
    }

    fn search_multiple(&self, terms: &[Term], op: Combinator) -> Result<Vec<SearchHit>> {
        let Some((first, rest)) = terms.split_first() else {
            return Ok(Vec::new());
        };
        match op {
            Combinator::Or => {
                let mut merger = HitMerger::new();
                for term in terms {
                    merger.merge_all(self.search(term)?);
                }
                Ok(merger.into_hits())
            }
            Combinator::And | Combinator::Single => {
                let head = self.search(first)?;
                let mut others = Vec::with_capacity(rest.len());
                let mut remaining: HashSet<String> = head.iter().map(|h| h.filename.clone()).collect();
                for term in rest {
                    if remaining.is_empty() {
                        break;
                    }
                    let hits = self.search(term)?;
                    let present: HashSet<&str> = hits.iter().map(|h| h.filename.as_str()).collect();
                    remaining.retain(|f| present.contains(f.as_str()));
                    others.push(hits);
                }
                if remaining.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(intersect(head, &others))
            }
        }
    }

    fn search_proximity(&self, first: &Term, second: &Term, max_words: u32) -> Result<Vec<SearchHit>> {
        let a = self.compile(first, false)?;
        let b = self.compile(second, false)?;
        let label = format!("{}...{}", first.text, second.text);
        let hits = self.scan(|doc| self.pairs_in(doc, &a, &b, max_words, &label));
        info!(
            first = %first.text,
            second = %second.text,
            max_words,
            result_count = hits.len(),
            "proximity_search_executed"
        );
        Ok(hits)
    }

    fn stats(&self) -> Result<CorpusStats> {
        Ok(CorpusStats {
            total_docs: self.docs.len(),
            total_pages: self.docs.iter().map(|d| u64::from(d.pages)).sum(),
        })
    }
}

/// Incremental byte-to-char offset conversion over one text.
///
/// Cheap when queried with non-decreasing byte offsets, which is how regex
/// matches arrive. Going backwards restarts from the beginning.
struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// `radius` characters either side of `text[start..end]`, with `...` on
/// whichever ends were clipped.
fn excerpt(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);

    let mut window = String::with_capacity(to - from + 6);
    if from > 0 {
        window.push_str("...");
    }
    window.push_str(&text[from..to]);
    if to < text.len() {
        window.push_str("...");
    }
    window
}
