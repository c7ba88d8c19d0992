use anyhow::{Context, Result};
use csv::StringRecord;
use std::io::Write;

use crate::blast::{AlignmentSummary, SimilaritySearch};
use crate::io::table;

pub const LEGACY_HEADER: &str =
    "ID, POSITION, STRAND, UPSTREAM, TOP DEFINITION, ALIGN LENGTH, PERCENT IDENTITY";
pub const MATCHER_HEADER: &str =
    "ID, POSITION, STRAND, UPST LENGTH, UPSTREAM, TOP DEFINITION, ALIGN LENGTH, PERCENT IDENTITY";

/// 输入表的列布局，由表头字段数决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLayout {
    /// `ID,POSITION,STRAND,UPSTREAM`
    Legacy,
    /// `ID,POSITION,STRAND,UPST LENGTH,UPSTREAM`, as written by the matcher
    Matcher,
}

impl InputLayout {
    pub fn from_header(header: Option<&StringRecord>) -> Self {
        match header {
            Some(h) if h.len() == 5 => InputLayout::Matcher,
            _ => InputLayout::Legacy,
        }
    }

    pub fn field_count(self) -> usize {
        match self {
            InputLayout::Legacy => 4,
            InputLayout::Matcher => 5,
        }
    }

    pub fn output_header(self) -> &'static str {
        match self {
            InputLayout::Legacy => LEGACY_HEADER,
            InputLayout::Matcher => MATCHER_HEADER,
        }
    }

    /// The upstream sequence of a well-formed data row (always the last
    /// field); `None` for rows of the wrong shape.
    pub fn query<'r>(self, row: &'r StringRecord) -> Option<&'r str> {
        if row.len() == self.field_count() {
            row.get(self.field_count() - 1)
        } else {
            None
        }
    }
}

/// Commas in a description would break the row, so they become `|`.
pub fn clean_description(def: &str) -> String {
    def.replace(',', "|")
}

/// Shortest round-trip rendering, always with a fractional part (`100.0`).
pub fn format_percent(pct: f64) -> String {
    format!("{:?}", pct)
}

/// The row's own fields followed by description, alignment length and
/// percent identity.
pub fn annotated_row(row: &StringRecord, best: &AlignmentSummary) -> Vec<String> {
    let mut out: Vec<String> = row.iter().map(str::to_string).collect();
    out.push(clean_description(&best.hit_def));
    out.push(best.align_length.to_string());
    out.push(format_percent(best.percent_identity()));
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    pub layout: InputLayout,
    pub rows: Vec<Vec<String>>,
}

impl AnnotatedTable {
    pub fn write<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = table::writer(out);
        writer.write_record(self.layout.output_header().split(','))?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// 对每个非空查询行调用一次搜索；表头被替换，其余行原样保留。
/// 搜索失败直接返回错误，不做重试。
pub fn annotate<S>(rows: &[StringRecord], search: &mut S) -> Result<AnnotatedTable>
where
    S: SimilaritySearch + ?Sized,
{
    let layout = InputLayout::from_header(rows.first());
    log::debug!("input layout: {:?}", layout);

    let mut out = Vec::with_capacity(rows.len().saturating_sub(1));
    for (index, row) in rows.iter().enumerate().skip(1) {
        match layout.query(row).filter(|q| !q.is_empty()) {
            Some(query) => {
                log::info!("searching row {}", index);
                let best = search
                    .best_alignment(index, query)
                    .with_context(|| format!("similarity search failed for row {}", index))?;
                log::info!("row {} done: {}", index, best.describe());
                out.push(annotated_row(row, &best));
            }
            None => {
                if layout.query(row).is_none() {
                    log::debug!("row {} has {} fields, passed through", index, row.len());
                }
                out.push(row.iter().map(str::to_string).collect());
            }
        }
    }
    Ok(AnnotatedTable { layout, rows: out })
}
