// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result export: one row per document, no contexts.

use std::io::{self, Write};

use csv::WriterBuilder;
use folio::SearchHit;
use serde::Serialize;

use super::ExportFormat;

const CSV_HEADER: [&str; 4] = ["filename", "dataset", "pages", "match_count"];

#[derive(Serialize)]
struct ExportRow<'a> {
    filename: &'a str,
    dataset: u32,
    pages: u32,
    match_count: usize,
    filepath: &'a str,
}

impl<'a> From<&'a SearchHit> for ExportRow<'a> {
    fn from(hit: &'a SearchHit) -> Self {
        Self {
            filename: &hit.filename,
            dataset: hit.dataset,
            pages: hit.pages,
            match_count: hit.match_count,
            filepath: &hit.filepath,
        }
    }
}

pub fn write(format: ExportFormat, hits: &[SearchHit], out: &mut impl Write) -> io::Result<()> {
    match format {
        ExportFormat::Csv => write_csv(hits, out),
        ExportFormat::Json => write_json(hits, out),
    }
}

fn write_csv(hits: &[SearchHit], out: &mut impl Write) -> io::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(&mut *out);
    writer.write_record(CSV_HEADER)?;
    for hit in hits {
        writer.write_record(&[
            hit.filename.clone(),
            hit.dataset.to_string(),
            hit.pages.to_string(),
            hit.match_count.to_string(),
        ])?;
    }
    writer.flush()
}

fn write_json(hits: &[SearchHit], out: &mut impl Write) -> io::Result<()> {
    let rows: Vec<ExportRow> = hits.iter().map(ExportRow::from).collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    out.flush()
}
