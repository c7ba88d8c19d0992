pub mod error;
pub mod qblast;
pub mod report;

use std::path::{Path, PathBuf};

pub use error::{SearchError, SearchResult};

use crate::config::{AnnotatorSettings, BlastSettings};
use qblast::QBlastClient;

/// 最佳命中（第一个 Hit 的第一个 HSP）的摘要
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSummary {
    pub hit_id: String,
    pub hit_def: String,
    pub accession: String,
    pub align_length: u32,
    pub identities: u32,
    pub evalue: Option<f64>,
    pub bit_score: Option<f64>,
}

impl AlignmentSummary {
    /// identities / align_length * 100
    pub fn percent_identity(&self) -> f64 {
        self.identities as f64 / self.align_length as f64 * 100.0
    }

    /// One-line description for progress logs.
    pub fn describe(&self) -> String {
        let evalue = self.evalue.map_or_else(|| "-".to_string(), |e| format!("{:e}", e));
        let bits = self.bit_score.map_or_else(|| "-".to_string(), |b| format!("{:.1}", b));
        format!(
            "{} {} [{}] align length {}, {:.2}% identity, evalue {}, bits {}",
            self.hit_id,
            self.hit_def,
            self.accession,
            self.align_length,
            self.percent_identity(),
            evalue,
            bits
        )
    }
}

/// Submit one query sequence, get back the best alignment.
/// `row` is the input row index; implementations may use it to label
/// anything they persist.
pub trait SimilaritySearch {
    fn best_alignment(&mut self, row: usize, query: &str) -> SearchResult<AlignmentSummary>;
}

/// Raw reports, one file per searched row.
#[derive(Debug, Clone)]
pub struct ResultArchive {
    dir: PathBuf,
    prefix: String,
}

impl ResultArchive {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self { dir: dir.into(), prefix: prefix.into() }
    }

    pub fn from_settings(settings: &AnnotatorSettings) -> Self {
        Self::new(settings.result_dir.clone(), settings.result_prefix.clone())
    }

    pub fn path_for(&self, row: usize) -> PathBuf {
        self.dir.join(format!("{}{}.xml", self.prefix, row))
    }

    pub fn store(&self, row: usize, report: &str) -> SearchResult<PathBuf> {
        let path = self.path_for(row);
        std::fs::write(&path, report).map_err(|source| SearchError::ResultFile { path: path.clone(), source })?;
        Ok(path)
    }

    pub fn load(&self, path: &Path) -> SearchResult<String> {
        std::fs::read_to_string(path)
            .map_err(|source| SearchError::ResultFile { path: path.to_path_buf(), source })
    }
}

/// NCBI-backed search: run the query remotely, keep the raw report on disk,
/// parse it back from the stored file.
pub struct NcbiSearch {
    client: QBlastClient,
    archive: ResultArchive,
}

impl NcbiSearch {
    pub fn new(client: QBlastClient, archive: ResultArchive) -> Self {
        Self { client, archive }
    }

    pub fn from_settings(blast: &BlastSettings, annotator: &AnnotatorSettings) -> SearchResult<Self> {
        Ok(Self::new(
            QBlastClient::new(blast.clone())?,
            ResultArchive::from_settings(annotator),
        ))
    }
}

impl SimilaritySearch for NcbiSearch {
    fn best_alignment(&mut self, row: usize, query: &str) -> SearchResult<AlignmentSummary> {
        let report = self.client.run(query)?;
        let path = self.archive.store(row, &report)?;
        log::debug!("report saved to {}", path.display());
        let stored = self.archive.load(&path)?;
        report::parse_best_alignment(&stored)
    }
}
