//! Plain comma-separated tables: no quoting, no escaping, ragged rows allowed.
//! Upstream sequences never contain commas and descriptions have theirs
//! replaced before writing, so the files stay splittable on `,`.

use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;

pub fn writer<W: Write>(out: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(out)
}

pub fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input)
}

/// Read every non-blank row. Blank lines are skipped by the csv reader.
pub fn read_rows<R: Read>(input: R) -> Result<Vec<StringRecord>> {
    let mut rdr = reader(input);
    let mut rows = Vec::new();
    for rec in rdr.records() {
        rows.push(rec?);
    }
    Ok(rows)
}

pub fn read_rows_from_path(path: &Path) -> Result<Vec<StringRecord>> {
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open CSV file '{}'", path.display()))?;
    read_rows(std::io::BufReader::new(fh))
        .with_context(|| format!("cannot read CSV file '{}'", path.display()))
}
