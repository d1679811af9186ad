// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token stream to [`QueryPlan`].
//!
//! Precedence, tightest first: phrases (already whole tokens), `NEAR/N`,
//! `NOT`, then `AND`/`OR`. Each level consumes what it owns and hands the
//! remainder down.

use super::lexer::{Lexed, Token, TokenKind};
use super::{Combinator, ProximityPair, QueryPlan, QueryWarning, Term};

pub(crate) fn parse(lexed: Lexed) -> QueryPlan {
    let mut warnings = Vec::new();
    if lexed.unterminated_quote {
        warnings.push(QueryWarning::UnterminatedQuote);
    }

    let mut proximity = Vec::new();
    let tokens = extract_proximity(lexed.tokens, &mut proximity, &mut warnings);

    if tokens.first().is_some_and(|t| t.kind == TokenKind::Not) {
        warnings.push(QueryWarning::LeadingNot);
    }
    let (head, exclusions) = split_exclusions(&tokens);
    let (primary, combinator) = split_connectives(head, &mut warnings);

    QueryPlan {
        primary,
        combinator,
        proximity,
        exclusions,
        warnings,
    }
}

/// Pull `operand NEAR/N operand` out of the stream.
///
/// A NEAR directly after a completed pair reuses that pair's right operand,
/// so `a NEAR/2 b NEAR/3 c` yields `(a, b)` and `(b, c)`. A NEAR missing an
/// operand stays in the stream as an ordinary word.
fn extract_proximity(
    tokens: Vec<Token>,
    pairs: &mut Vec<ProximityPair>,
    warnings: &mut Vec<QueryWarning>,
) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut chained: Option<Term> = None;
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let TokenKind::Near(max_words) = token.kind else {
            chained = None;
            out.push(token);
            continue;
        };

        let right_ready = tokens.peek().is_some_and(Token::is_operand);
        let first = match chained.take() {
            Some(term) if right_ready => Some(term),
            Some(_) => None,
            None if right_ready && out.last().is_some_and(Token::is_operand) => {
                out.pop().map(Token::into_term)
            }
            None => None,
        };

        match (first, right_ready.then(|| tokens.next()).flatten()) {
            (Some(first), Some(right)) => {
                let second = right.into_term();
                chained = Some(second.clone());
                pairs.push(ProximityPair {
                    first,
                    second,
                    max_words,
                });
            }
            (_, right) => {
                warnings.push(QueryWarning::DanglingNear {
                    distance: max_words,
                });
                out.push(Token::new(TokenKind::Word, token.text));
                out.extend(right);
            }
        }
    }

    out
}

/// Split at the first `NOT`; every segment after it is one exclusion term.
fn split_exclusions(tokens: &[Token]) -> (&[Token], Vec<Term>) {
    let mut segments = tokens.split(|t| t.kind == TokenKind::Not);
    let head = segments.next().unwrap_or(&[]);
    let exclusions = segments.filter_map(segment_term).collect();
    (head, exclusions)
}

fn split_connectives(head: &[Token], warnings: &mut Vec<QueryWarning>) -> (Vec<Term>, Combinator) {
    let has_and = head.iter().any(|t| t.kind == TokenKind::And);
    let has_or = head.iter().any(|t| t.kind == TokenKind::Or);
    if has_and && has_or {
        warnings.push(QueryWarning::MixedConnectives);
    }

    let (separator, combinator) = if has_and {
        (TokenKind::And, Combinator::And)
    } else if has_or {
        (TokenKind::Or, Combinator::Or)
    } else {
        return (segment_term(head).into_iter().collect(), Combinator::Single);
    };

    let terms: Vec<Term> = head
        .split(|t| t.kind == separator)
        .filter_map(segment_term)
        .collect();
    if terms.len() > 1 {
        (terms, combinator)
    } else {
        (terms, Combinator::Single)
    }
}

/// One term from a run of tokens: a lone phrase stays quoted, anything else
/// is the tokens' text joined by single spaces.
fn segment_term(segment: &[Token]) -> Option<Term> {
    match segment {
        [] => None,
        [only] if only.kind == TokenKind::Phrase => Some(Term::phrase(only.text.clone())),
        tokens => {
            let mut text = String::new();
            for token in tokens {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&token.text);
            }
            Some(Term::word(text))
        }
    }
}
