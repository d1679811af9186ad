// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query tokenizer.
//!
//! Phrases are cut out first, so `"AND"` inside quotes is text, never an
//! operator. Keywords are whole whitespace-delimited words, case-insensitive.

use super::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Word,
    Phrase,
    And,
    Or,
    Not,
    Near(u32),
}

/// A token and the text it was spelled with (phrase text excludes the quotes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::Phrase)
    }

    pub fn into_term(self) -> Term {
        match self.kind {
            TokenKind::Phrase => Term::phrase(self.text),
            _ => Term::word(self.text),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Lexed {
    pub tokens: Vec<Token>,
    pub unterminated_quote: bool,
}

pub(crate) fn tokenize(raw: &str) -> Lexed {
    let mut lexed = Lexed::default();
    let mut rest = raw;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(body) = rest.strip_prefix('"') {
            match body.find('"') {
                Some(close) => {
                    let phrase = &body[..close];
                    if !phrase.trim().is_empty() {
                        lexed.tokens.push(Token::new(TokenKind::Phrase, phrase));
                    }
                    rest = &body[close + 1..];
                }
                None => {
                    // Drop the stray quote, keep lexing what follows it.
                    lexed.unterminated_quote = true;
                    rest = body;
                }
            }
            continue;
        }

        let end = rest
            .find(|c: char| c.is_whitespace() || c == '"')
            .unwrap_or(rest.len());
        let word = &rest[..end];
        lexed.tokens.push(Token::new(classify(word), word));
        rest = &rest[end..];
    }

    lexed
}

fn classify(word: &str) -> TokenKind {
    if word.eq_ignore_ascii_case("AND") {
        TokenKind::And
    } else if word.eq_ignore_ascii_case("OR") {
        TokenKind::Or
    } else if word.eq_ignore_ascii_case("NOT") {
        TokenKind::Not
    } else if let Some(distance) = near_distance(word) {
        TokenKind::Near(distance)
    } else {
        TokenKind::Word
    }
}

/// `NEAR/5` -> `Some(5)`. Anything else, including overflow, is not a NEAR.
fn near_distance(word: &str) -> Option<u32> {
    let prefix = word.get(..5)?;
    let digits = word.get(5..)?;
    if !prefix.eq_ignore_ascii_case("NEAR/")
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}
