// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! SQLite FTS5 backend.
//!
//! Paged queries run in two phases: a `COUNT(*)` over the match predicate,
//! then the window of hits ordered by `bm25()` with one highlighted snippet
//! each. Unpaged queries skip the count. Snippets come
//! back without positions; [`FtsBackend::locate_contexts`] finds them in the
//! stored text afterwards, which is only worth doing for the page of results
//! actually shown.
//!
//! FTS5 rejects malformed expressions with a generic SQLite error. Those get
//! one retry with a sanitized expression, then an empty result.

mod expr;
mod pool;

use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};

use self::pool::ReadPool;
use super::SearchBackend;
use crate::error::{Error, Result};
use crate::query::{Combinator, Term};
use crate::types::{page_at, Context, CorpusStats, SearchHit};

const POOL_SIZE: usize = 4;
const MARK_OPEN: &str = ">>>>";
const MARK_CLOSE: &str = "<<<<";
const ELLIPSIS: &str = "...";
const SNIPPET_TOKENS: u32 = 64;

/// One ranked slice of results plus the total before slicing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedPage {
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    dataset: Option<u32>,
    /// `(limit, offset)`
    window: Option<(usize, usize)>,
}

pub struct FtsBackend {
    path: PathBuf,
    pool: ReadPool,
}

impl FtsBackend {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::IndexNotFound(path.to_path_buf()));
        }
        let backend = Self {
            path: path.to_path_buf(),
            pool: ReadPool::open(path, POOL_SIZE)?,
        };
        let stats = backend.stats()?;
        info!(
            path = %path.display(),
            documents = stats.total_docs,
            pages = stats.total_pages,
            "index_loaded"
        );
        Ok(backend)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ranked hits for `term`, optionally within one dataset, `limit` at a
    /// time starting at `offset`. `total` counts every match.
    pub fn search_page(
        &self,
        term: &Term,
        dataset: Option<u32>,
        limit: usize,
        offset: usize,
    ) -> Result<RankedPage> {
        self.run(
            &expr::term(term),
            &term.text,
            Scope {
                dataset,
                window: Some((limit, offset)),
            },
        )
    }

    fn run(&self, expression: &str, label: &str, scope: Scope) -> Result<RankedPage> {
        if expression.is_empty() {
            return Ok(RankedPage::default());
        }
        debug!(expression, "fts_query");

        let page = match self.pool.with(|conn| execute(conn, expression, label, &scope)) {
            Ok(page) => page,
            Err(e) if is_query_error(&e) => {
                let fallback = expr::sanitize(expression);
                warn!(expression, fallback = %fallback, error = %e, "fts_query_fallback");
                if fallback.is_empty() || fallback == expression {
                    return Ok(RankedPage::default());
                }
                match self.pool.with(|conn| execute(conn, &fallback, label, &scope)) {
                    Ok(page) => page,
                    Err(e) if is_query_error(&e) => {
                        warn!(expression = %fallback, error = %e, "fts_fallback_rejected");
                        RankedPage::default()
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            expression,
            total = page.total,
            result_count = page.hits.len(),
            "search_executed"
        );
        Ok(page)
    }
}

impl SearchBackend for FtsBackend {
    fn name(&self) -> &'static str {
        "index"
    }

    fn search(&self, term: &Term) -> Result<Vec<SearchHit>> {
        Ok(self.run(&expr::term(term), &term.text, Scope::default())?.hits)
    }

    fn search_multiple(&self, terms: &[Term], op: Combinator) -> Result<Vec<SearchHit>> {
        let texts: Vec<&str> = terms.iter().map(|t| t.text.as_str()).collect();
        let (expression, label) = match op {
            Combinator::Or => (expr::any_of(terms), texts.join(" OR ")),
            Combinator::And | Combinator::Single => (expr::all_of(terms), texts.join(" AND ")),
        };
        Ok(self.run(&expression, &label, Scope::default())?.hits)
    }

    fn search_proximity(&self, first: &Term, second: &Term, max_words: u32) -> Result<Vec<SearchHit>> {
        let label = format!("{}...{}", first.text, second.text);
        Ok(self
            .run(&expr::near(first, second, max_words), &label, Scope::default())?
            .hits)
    }

    fn stats(&self) -> Result<CorpusStats> {
        let (docs, pages) = self.pool.with(|conn| {
            conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(pages), 0) FROM documents",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
        })?;
        Ok(CorpusStats {
            total_docs: docs as usize,
            total_pages: pages as u64,
        })
    }

    fn locate_contexts(&self, hits: &mut [SearchHit]) -> Result<()> {
        if hits.iter().all(|hit| hit.contexts.iter().all(|c| c.page.is_some())) {
            return Ok(());
        }
        self.pool.with(|conn| {
            let mut stmt = conn.prepare_cached(
                "SELECT d.page_offsets, f.text FROM documents d
                 JOIN documents_fts f ON f.rowid = d.id
                 WHERE d.filename = ?1 LIMIT 1",
            )?;
            for hit in hits.iter_mut() {
                if hit.contexts.iter().all(|c| c.page.is_some()) {
                    continue;
                }
                let row: Option<(Option<String>, String)> = stmt
                    .query_row([&hit.filename], |row| Ok((row.get(0)?, row.get(1)?)))
                    .optional()?;
                let Some((offsets, text)) = row else {
                    continue;
                };
                let offsets: Option<Vec<usize>> = offsets.and_then(|json| {
                    serde_json::from_str(&json)
                        .map_err(|e| warn!(filename = %hit.filename, error = %e, "page_offsets_unreadable"))
                        .ok()
                });
                let pages = hit.pages;
                for context in hit.contexts.iter_mut().filter(|c| c.page.is_none()) {
                    if let Some(position) = locate(&text, context) {
                        context.position = position;
                        context.page = offsets
                            .as_deref()
                            .filter(|o| !o.is_empty())
                            .map(|o| page_at(o, position, pages));
                    }
                }
            }
            Ok(())
        })?;
        Ok(())
    }
}

fn execute(conn: &Connection, expression: &str, label: &str, scope: &Scope) -> rusqlite::Result<RankedPage> {
    let mut filter = String::from("documents_fts MATCH ?1");
    let mut params = vec![Value::Text(expression.to_string())];
    if let Some(dataset) = scope.dataset {
        filter.push_str(" AND d.dataset = ?2");
        params.push(Value::Integer(i64::from(dataset)));
    }

    // Unwindowed queries return every hit, so the count is the hit count.
    let counted = match scope.window {
        Some(_) => {
            let total: i64 = conn
                .prepare_cached(&format!(
                    "SELECT COUNT(*) FROM documents_fts
                     JOIN documents d ON d.id = documents_fts.rowid
                     WHERE {filter}"
                ))?
                .query_row(params_from_iter(params.iter()), |row| row.get(0))?;
            if total == 0 {
                return Ok(RankedPage::default());
            }
            Some(total as usize)
        }
        None => None,
    };

    let mut sql = format!(
        "SELECT d.dataset, d.filename, d.filepath, d.pages,
                snippet(documents_fts, 0, '{MARK_OPEN}', '{MARK_CLOSE}', '{ELLIPSIS}', {SNIPPET_TOKENS})
         FROM documents_fts
         JOIN documents d ON d.id = documents_fts.rowid
         WHERE {filter}
         ORDER BY bm25(documents_fts)"
    );
    if let Some((limit, offset)) = scope.window {
        let next = params.len() + 1;
        sql.push_str(&format!(" LIMIT ?{} OFFSET ?{}", next, next + 1));
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));
    }

    let mut stmt = conn.prepare_cached(&sql)?;
    let hits = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            let snippet: String = row.get(4)?;
            Ok(SearchHit {
                dataset: row.get(0)?,
                filename: row.get(1)?,
                filepath: row.get(2)?,
                pages: row.get(3)?,
                match_count: snippet.matches(MARK_OPEN).count().max(1),
                contexts: vec![Context {
                    position: 0,
                    context: snippet.replace(MARK_OPEN, "").replace(MARK_CLOSE, ""),
                    matched: label.to_string(),
                    page: None,
                }],
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(RankedPage {
        total: counted.unwrap_or(hits.len()),
        hits,
    })
}

/// FTS5 reports expression problems as plain `SQLITE_ERROR`.
fn is_query_error(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::Unknown)
}

/// Character position of a snippet in its document: where the snippet's first
/// label word falls, or the snippet start when that word was stemmed away.
fn locate(text: &str, context: &Context) -> Option<usize> {
    let fragment = context.context.as_str();
    let fragment = fragment.strip_prefix(ELLIPSIS).unwrap_or(fragment);
    let fragment = fragment.strip_suffix(ELLIPSIS).unwrap_or(fragment).trim();
    if fragment.is_empty() {
        return None;
    }
    let start = text.find(fragment)?;
    let window = &text[start..start + fragment.len()];
    let within = anchor_word(&context.matched)
        .and_then(|word| {
            RegexBuilder::new(&regex::escape(word))
                .case_insensitive(true)
                .build()
                .ok()
        })
        .and_then(|pattern| pattern.find(window).map(|m| m.start()))
        .unwrap_or(0);
    Some(text[..start + within].chars().count())
}

fn anchor_word(label: &str) -> Option<&str> {
    label
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
}
