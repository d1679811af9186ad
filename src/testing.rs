//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::corpus::Corpus;
use crate::query::Term;
use crate::types::{derive_page_offsets, Document, PAGE_BREAK};

/// Create a document whose page layout is derived from form feeds in `text`.
///
/// Ids are left at 0; wrap the documents with [`corpus_of`] to number them.
pub fn make_doc(dataset: u32, filename: &str, text: &str) -> Document {
    let pages = text.split(PAGE_BREAK).count() as u32;
    Document {
        id: 0,
        dataset,
        filename: filename.to_string(),
        filepath: format!("DataSet {}/{}", dataset, filename),
        pages,
        text: text.to_string(),
        page_offsets: Some(derive_page_offsets(text)),
    }
}

/// Number documents by position, the way a loaded corpus would.
pub fn corpus_of(docs: Vec<Document>) -> Corpus {
    Corpus::from_documents(docs)
}

/// The three-document fixture used by scenario tests and benches.
///
/// - `a.pdf` (dataset 1, 2 pages): "island" twice, once per page
/// - `b.pdf` (dataset 1, 1 page): "island" and "Maxwell" three words apart
/// - `c.pdf` (dataset 2, 3 pages): neither term
pub fn scenario_docs() -> Vec<Document> {
    vec![
        make_doc(
            1,
            "a.pdf",
            "The island was remote.\x0cNobody left the island that winter.",
        ),
        make_doc(
            1,
            "b.pdf",
            "Records show the island flight log named Maxwell twice over.",
        ),
        make_doc(
            2,
            "c.pdf",
            "Nothing relevant\x0cappears in this\x0cdocument at all.",
        ),
    ]
}

pub fn word(text: &str) -> Term {
    Term::word(text)
}

pub fn phrase(text: &str) -> Term {
    Term::phrase(text)
}
