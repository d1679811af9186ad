// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation and result assembly.
//!
//! A [`QueryPlan`] runs against one backend in a fixed order:
//!
//! 1. primary terms (`search` or `search_multiple`)
//! 2. exclusions, by filename
//! 3. proximity pairs, merged in by filename
//! 4. dataset and page-count filters
//! 5. sort, totals, page slice, context cap
//!
//! Proximity hits are merged after exclusions, so `a NOT b` does not remove
//! documents that only matched through a NEAR pair.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::backend::SearchBackend;
use crate::config::{DEFAULT_MAX_CONTEXTS, DEFAULT_PER_PAGE};
use crate::error::Result;
use crate::merge::{exclude, HitMerger};
use crate::query::{translate, translate_strict, Combinator, QueryPlan, QueryWarning};
use crate::types::{CorpusStats, SearchHit};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most matches first; ties keep backend order.
    #[default]
    Relevance,
    Filename,
    /// Dataset, then filename.
    Dataset,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "filename" => Ok(Self::Filename),
            "dataset" => Ok(Self::Dataset),
            other => Err(format!(
                "unknown sort '{}' (expected relevance, filename or dataset)",
                other
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Relevance => "relevance",
            Self::Filename => "filename",
            Self::Dataset => "dataset",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub dataset: Option<u32>,
    pub min_pages: u32,
    pub max_pages: Option<u32>,
    pub sort: SortOrder,
    /// Contexts kept per hit in the response.
    pub max_contexts: usize,
    /// Reject ambiguous queries instead of guessing.
    pub strict: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            dataset: None,
            min_pages: 0,
            max_pages: None,
            sort: SortOrder::default(),
            max_contexts: DEFAULT_MAX_CONTEXTS,
            strict: false,
        }
    }

    pub fn page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn dataset(mut self, dataset: u32) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn pages_between(mut self, min: u32, max: Option<u32>) -> Self {
        self.min_pages = min;
        self.max_pages = max;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn contexts(mut self, max_contexts: usize) -> Self {
        self.max_contexts = max_contexts;
        self
    }

    fn admits(&self, hit: &SearchHit) -> bool {
        self.dataset.map_or(true, |d| hit.dataset == d)
            && hit.pages >= self.min_pages
            && self.max_pages.map_or(true, |max| hit.pages <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: usize,
    pub total_matches: usize,
    pub page: usize,
    pub per_page: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<QueryWarning>,
}

pub struct SearchEngine {
    backend: Box<dyn SearchBackend>,
}

impl SearchEngine {
    pub fn new(backend: Box<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn SearchBackend {
        self.backend.as_ref()
    }

    pub fn stats(&self) -> Result<CorpusStats> {
        self.backend.stats()
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let plan = if request.strict {
            translate_strict(&request.query)?
        } else {
            translate(&request.query)
        };
        debug!(query = %request.query, plan = ?plan, "query_translated");
        self.search_plan(&plan, request)
    }

    pub fn search_plan(&self, plan: &QueryPlan, request: &SearchRequest) -> Result<SearchResponse> {
        let mut hits = self.evaluate(plan)?;
        hits.retain(|hit| request.admits(hit));
        sort_hits(&mut hits, request.sort);

        let total = hits.len();
        let total_matches = hits.iter().map(|h| h.match_count).sum();
        let page = request.page.max(1);
        let per_page = request.per_page.max(1);

        let mut results: Vec<SearchHit> = hits
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        for hit in &mut results {
            hit.contexts.truncate(request.max_contexts);
        }
        self.backend.locate_contexts(&mut results)?;

        info!(
            query = %request.query,
            backend = self.backend.name(),
            total,
            total_matches,
            page,
            "search_completed"
        );
        Ok(SearchResponse {
            results,
            total,
            total_matches,
            page,
            per_page,
            warnings: plan.warnings.clone(),
        })
    }

    /// Primary terms, minus exclusions, plus proximity hits. Unfiltered and
    /// unsorted.
    pub fn evaluate(&self, plan: &QueryPlan) -> Result<Vec<SearchHit>> {
        let backend = self.backend.as_ref();
        let mut hits = match (plan.combinator, plan.primary.as_slice()) {
            (_, []) => Vec::new(),
            (Combinator::Single, [term]) => backend.search(term)?,
            (op, terms) => backend.search_multiple(terms, op)?,
        };

        if !hits.is_empty() && !plan.exclusions.is_empty() {
            let mut excluded = HashSet::new();
            for term in &plan.exclusions {
                excluded.extend(backend.search(term)?.into_iter().map(|h| h.filename));
            }
            hits = exclude(hits, &excluded);
        }

        if !plan.proximity.is_empty() {
            let mut merger = HitMerger::from_hits(hits);
            for pair in &plan.proximity {
                merger.merge_all(backend.search_proximity(&pair.first, &pair.second, pair.max_words)?);
            }
            hits = merger.into_hits();
        }

        Ok(hits)
    }
}

fn sort_hits(hits: &mut [SearchHit], order: SortOrder) {
    match order {
        SortOrder::Relevance => hits.sort_by(|a, b| b.match_count.cmp(&a.match_count)),
        SortOrder::Filename => hits.sort_by(|a, b| a.filename.cmp(&b.filename)),
        SortOrder::Dataset => {
            hits.sort_by(|a, b| (a.dataset, &a.filename).cmp(&(b.dataset, &b.filename)));
        }
    }
}
