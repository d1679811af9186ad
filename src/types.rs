// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The record shapes everything else agrees on.
//!
//! A [`Document`] is one scanned file: its extracted text with pages glued
//! together by form feeds, plus `page_offsets` saying where each page starts.
//! Offsets count characters, not bytes. Regex matches come back as byte
//! offsets, so anything that reports a page has to convert first.
//!
//! # Invariants
//!
//! - **page_offsets**: `offsets[0] == 0` and offsets never decrease.
//!   A record that breaks either keeps its text and loses its offsets.
//!
//! - **page_offsets length**: equals `pages` for well-formed extractions.
//!   Extractors that terminate every page with `\f` produce one extra empty
//!   page; [`page_at`] clamps, so this is tolerated rather than rejected.
//!
//! - **page_at**: always returns a page in `[1, max(pages, 1)]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between pages in extracted text.
pub const PAGE_BREAK: char = '\x0c';

/// One document in the corpus.
///
/// `id` is the 1-based position in the input corpus. Records that fail
/// validation still consume their id, so ids have gaps but never shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: u32,
    pub dataset: u32,
    pub filename: String,
    pub filepath: String,
    pub pages: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_offsets: Option<Vec<usize>>,
}

impl Document {
    /// Page holding the character at `position`, if this document knows its
    /// page layout.
    pub fn page_at(&self, position: usize) -> Option<u32> {
        self.page_offsets
            .as_deref()
            .filter(|offsets| !offsets.is_empty())
            .map(|offsets| page_at(offsets, position, self.pages))
    }
}

/// A single match inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Character offset of the match start in the document text.
    pub position: usize,
    /// Window around the match, with `...` where it was clipped.
    pub context: String,
    #[serde(rename = "match")]
    pub matched: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Per-document search result. Hits are merged by `filename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub dataset: u32,
    pub filename: String,
    pub filepath: String,
    pub pages: u32,
    pub match_count: usize,
    pub contexts: Vec<Context>,
}

impl SearchHit {
    pub fn for_document(doc: &Document, match_count: usize, contexts: Vec<Context>) -> Self {
        Self {
            dataset: doc.dataset,
            filename: doc.filename.clone(),
            filepath: doc.filepath.clone(),
            pages: doc.pages,
            match_count,
            contexts,
        }
    }

    /// Fold another hit for the same document into this one.
    pub fn absorb(&mut self, other: SearchHit) {
        self.match_count += other.match_count;
        self.contexts.extend(other.contexts);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_docs: usize,
    pub total_pages: u64,
}

// =============================================================================
// PAGE OFFSETS
// =============================================================================

/// Map a character position to a 1-indexed page.
///
/// `offsets[i]` is where page `i + 1` starts. The result is clamped to the
/// last page, where the last page is `pages` if known, otherwise the number of
/// offsets. An empty offset table maps everything to page 1.
pub fn page_at(offsets: &[usize], position: usize, pages: u32) -> u32 {
    let idx = offsets
        .partition_point(|&start| start <= position)
        .saturating_sub(1);
    let page_count = if pages > 0 {
        pages as usize
    } else {
        offsets.len()
    };
    let last = page_count.max(1) - 1;
    (idx.min(last) + 1) as u32
}

/// Page start offsets for text whose pages are separated by form feeds.
pub fn derive_page_offsets(text: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut start = 0;
    for page in text.split(PAGE_BREAK) {
        offsets.push(start);
        start += page.chars().count() + 1;
    }
    offsets
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageOffsetError {
    #[error("first page offset is {0}, expected 0")]
    NotZeroBased(usize),
    #[error("page offset {index} decreases ({previous} -> {current})")]
    Decreasing {
        index: usize,
        previous: usize,
        current: usize,
    },
    #[error("page offsets start past the end of the text ({offset} > {text_len})")]
    PastEnd { offset: usize, text_len: usize },
}

/// Validate an offset table against its document text length (in chars).
pub fn check_page_offsets(offsets: &[usize], text_len: usize) -> Result<(), PageOffsetError> {
    if let Some(&first) = offsets.first() {
        if first != 0 {
            return Err(PageOffsetError::NotZeroBased(first));
        }
    }
    for (index, pair) in offsets.windows(2).enumerate() {
        if pair[1] < pair[0] {
            return Err(PageOffsetError::Decreasing {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }
    }
    // One past the end is allowed: trimmed text with a trailing page break.
    if let Some(&last) = offsets.last() {
        if last > text_len + 1 {
            return Err(PageOffsetError::PastEnd {
                offset: last,
                text_len,
            });
        }
    }
    Ok(())
}
