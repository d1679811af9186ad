// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query language and its translation into a [`QueryPlan`].
//!
//! ```text
//! query      := clause ( NOT clause )*
//! clause     := segment ( (AND | OR) segment )*
//! segment    := ( operand | operand NEAR/N operand )*
//! operand    := WORD | "PHRASE"
//! ```
//!
//! `AND` wins over `OR` when both appear; there is no grouping. Translation
//! never fails: problems are repaired and reported as [`QueryWarning`]s. Use
//! [`translate_strict`] to reject ambiguous input instead.
//!
//! # Example
//!
//! ```
//! use folio::query::{translate, Combinator};
//!
//! let plan = translate(r#""grand jury" AND island NOT boat"#);
//! assert_eq!(plan.combinator, Combinator::And);
//! assert_eq!(plan.primary.len(), 2);
//! assert!(plan.primary[0].quoted);
//! assert_eq!(plan.exclusions[0].text, "boat");
//! ```

mod lexer;
mod parser;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A search term. Quoted terms are exact phrases; unquoted ones are bare text
/// and may span several words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Term {
    pub text: String,
    pub quoted: bool,
}

impl Term {
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn phrase(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    #[default]
    Single,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProximityPair {
    pub first: Term,
    pub second: Term,
    /// Most words allowed strictly between the two terms.
    pub max_words: u32,
}

/// Something translation had to guess about.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryWarning {
    #[error("unterminated quote ignored")]
    UnterminatedQuote,
    #[error("query mixes AND and OR; evaluated as AND")]
    MixedConnectives,
    #[error("NEAR/{distance} is missing an operand; treated as a word")]
    DanglingNear { distance: u32 },
    #[error("query starts with NOT; nothing is left to search")]
    LeadingNot,
}

impl QueryWarning {
    /// Warnings where the lenient reading may not be what the user meant.
    pub fn is_ambiguous(&self) -> bool {
        !matches!(self, QueryWarning::LeadingNot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ambiguous query: {0}")]
pub struct QueryError(pub QueryWarning);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryPlan {
    pub primary: Vec<Term>,
    pub combinator: Combinator,
    pub proximity: Vec<ProximityPair>,
    pub exclusions: Vec<Term>,
    pub warnings: Vec<QueryWarning>,
}

impl QueryPlan {
    /// Nothing to search for; evaluating this plan yields no hits.
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.proximity.is_empty()
    }
}

/// Lenient translation. Never fails.
pub fn translate(raw: &str) -> QueryPlan {
    parser::parse(lexer::tokenize(raw))
}

/// Translation that rejects input the lenient path would have to guess about.
pub fn translate_strict(raw: &str) -> Result<QueryPlan, QueryError> {
    let plan = translate(raw);
    match plan.warnings.iter().find(|w| w.is_ambiguous()) {
        Some(warning) => Err(QueryError(warning.clone())),
        None => Ok(plan),
    }
}
