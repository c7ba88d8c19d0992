use anyhow::Result;
use std::fmt;
use std::io::Write;

use crate::io::fasta::FastaRecord;
use crate::io::table;
use crate::util::dna;

pub const MATCH_HEADER: [&str; 5] = ["ID", "POSITION", "STRAND", "UPST LENGTH", "UPSTREAM"];

/// 上游区域调试输出时截取的长度
pub const UPSTREAM_PREVIEW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    ReverseComplement,
}

impl Strand {
    pub fn label(self) -> &'static str {
        match self {
            Strand::Forward => "ORIGINAL",
            Strand::ReverseComplement => "REVERSE COMPLEMENT",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 一次精确命中。
/// `position` 为 0-based；反向互补命中时为反向互补序列上的坐标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: String,
    pub position: usize,
    pub strand: Strand,
    pub upstream: String,
}

impl MatchRecord {
    pub fn upstream_len(&self) -> usize {
        self.upstream.len()
    }

    /// CSV 字段，POSITION 转为 1-based。
    pub fn csv_fields(&self) -> [String; 5] {
        [
            self.id.clone(),
            (self.position + 1).to_string(),
            self.strand.label().to_string(),
            self.upstream_len().to_string(),
            self.upstream.clone(),
        ]
    }

    pub fn upstream_preview(&self) -> &str {
        // cut on a char boundary; lossy decoding may have inserted U+FFFD
        match self.upstream.char_indices().nth(UPSTREAM_PREVIEW) {
            Some((end, _)) => &self.upstream[..end],
            None => &self.upstream,
        }
    }
}

/// Upstream region for a hit ending at `match_end`: everything from
/// `match_end + flank` to the end of `seq`, or empty when that start is out
/// of range.
pub fn upstream_region(seq: &[u8], match_end: usize, flank: usize) -> &[u8] {
    let start = match_end + flank;
    if start < seq.len() {
        &seq[start..]
    } else {
        &[]
    }
}

/// 在每条记录的正链与反向互补链上查找 `target` 的首次精确出现。
///
/// - 长度小于 target 的记录直接跳过；
/// - 两条链可以同时命中，正链在前；
/// - 上游区域总是从原始（正链）序列中截取。
pub fn find_matches<'a, I>(records: I, target: &[u8], flank: usize) -> Vec<MatchRecord>
where
    I: IntoIterator<Item = &'a FastaRecord>,
{
    let mut hits = Vec::new();
    for rec in records {
        if rec.len() < target.len() {
            continue;
        }

        if let Some(pos) = dna::find(&rec.seq, target) {
            hits.push(make_record(rec, pos, Strand::Forward, target.len(), flank));
        }

        let rc = dna::revcomp(&rec.seq);
        if let Some(pos) = dna::find(&rc, target) {
            hits.push(make_record(rec, pos, Strand::ReverseComplement, target.len(), flank));
        }
    }
    log::info!("# matches found: {}", hits.len());
    hits
}

fn make_record(rec: &FastaRecord, pos: usize, strand: Strand, target_len: usize, flank: usize) -> MatchRecord {
    let upstream = upstream_region(&rec.seq, pos + target_len, flank);
    let record = MatchRecord {
        id: rec.id.clone(),
        position: pos,
        strand,
        upstream: String::from_utf8_lossy(upstream).into_owned(),
    };
    log_match(&record);
    record
}

fn log_match(record: &MatchRecord) {
    log::debug!(
        "ID: {} POSITION: {} FOUND IN {} UPST LENGTH: {}",
        record.id,
        record.position + 1,
        record.strand,
        record.upstream_len()
    );
    log::debug!("UPSTREAM (first {}bp): {}", UPSTREAM_PREVIEW, record.upstream_preview());
}

pub fn write_matches<W: Write>(records: &[MatchRecord], out: W) -> Result<()> {
    let mut writer = table::writer(out);
    writer.write_record(MATCH_HEADER)?;
    for r in records {
        writer.write_record(r.csv_fields())?;
    }
    writer.flush()?;
    Ok(())
}
