// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Filename-keyed hit merging.
//!
//! A document appears at most once in any result list. OR unions and the
//! proximity overlay both need the same fold: the first hit for a filename
//! fixes its position, later hits add their match counts and contexts to it.
//!
//! **Invariant**: output order is first-seen order; no filename repeats.

use std::collections::{HashMap, HashSet};

use crate::types::SearchHit;

#[derive(Debug, Default)]
pub struct HitMerger {
    hits: Vec<SearchHit>,
    index: HashMap<String, usize>,
}

impl HitMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        let mut merger = Self::new();
        merger.merge_all(hits);
        merger
    }

    pub fn merge(&mut self, hit: SearchHit) {
        match self.index.get(&hit.filename) {
            Some(&slot) => self.hits[slot].absorb(hit),
            None => {
                self.index.insert(hit.filename.clone(), self.hits.len());
                self.hits.push(hit);
            }
        }
    }

    pub fn merge_all(&mut self, hits: impl IntoIterator<Item = SearchHit>) {
        for hit in hits {
            self.merge(hit);
        }
    }

    pub fn into_hits(self) -> Vec<SearchHit> {
        self.hits
    }
}

/// Keep only the hits whose filename appears in every one of `others`.
pub fn intersect(first: Vec<SearchHit>, others: &[Vec<SearchHit>]) -> Vec<SearchHit> {
    let mut keep: HashSet<&str> = first.iter().map(|h| h.filename.as_str()).collect();
    for other in others {
        let present: HashSet<&str> = other.iter().map(|h| h.filename.as_str()).collect();
        keep.retain(|name| present.contains(name));
    }
    let keep: HashSet<String> = keep.into_iter().map(str::to_owned).collect();
    first
        .into_iter()
        .filter(|h| keep.contains(&h.filename))
        .collect()
}

/// Drop every hit whose filename is in `excluded`.
pub fn exclude(hits: Vec<SearchHit>, excluded: &HashSet<String>) -> Vec<SearchHit> {
    if excluded.is_empty() {
        return hits;
    }
    hits.into_iter()
        .filter(|h| !excluded.contains(&h.filename))
        .collect()
}
