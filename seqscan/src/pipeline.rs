//! File-level drivers for the two subcommands.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::annotator;
use crate::blast::SimilaritySearch;
use crate::io::fasta::FastaReader;
use crate::io::table;
use crate::matcher::{self, MatchRecord};
use crate::overwrite::OverwriteGate;

#[derive(Debug, Clone)]
pub struct MatchJob {
    pub fasta: PathBuf,
    pub target_name: String,
    pub target: String,
    pub output: PathBuf,
    pub flank: usize,
}

/// `matches-<fasta file name>-<target name>.csv` in the working directory.
pub fn default_match_output(fasta: &Path, target_name: &str) -> PathBuf {
    let file_name = fasta
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("matches-{}-{}.csv", file_name, target_name))
}

/// Scan the FASTA file and write the hit table. With a gate, a declined
/// overwrite skips writing; the hits are returned either way.
pub fn run_match(job: &MatchJob, gate: Option<&mut dyn OverwriteGate>) -> Result<Vec<MatchRecord>> {
    log::info!("reference: {}", job.fasta.display());
    log::info!("target: {} ({} bp)", job.target_name, job.target.len());

    let records = FastaReader::open(&job.fasta)?
        .read_all()
        .with_context(|| format!("cannot parse FASTA file '{}'", job.fasta.display()))?;
    log::info!("sequences: {}", records.len());

    let hits = matcher::find_matches(&records, job.target.as_bytes(), job.flank);

    if let Some(gate) = gate {
        if !gate.allow(&job.output)? {
            log::warn!("not overwriting {}", job.output.display());
            return Ok(hits);
        }
    }
    let out = File::create(&job.output)
        .with_context(|| format!("cannot create output '{}'", job.output.display()))?;
    matcher::write_matches(&hits, BufWriter::new(out))
        .with_context(|| format!("cannot write matches to '{}'", job.output.display()))?;
    log::info!("matches written: {}", job.output.display());
    Ok(hits)
}

pub fn run_annotate<S>(input: &Path, output: &Path, search: &mut S) -> Result<annotator::AnnotatedTable>
where
    S: SimilaritySearch + ?Sized,
{
    let rows = table::read_rows_from_path(input)?;
    log::info!("read {} rows from {}", rows.len(), input.display());

    let annotated = annotator::annotate(&rows, search)?;

    let out = File::create(output)
        .with_context(|| format!("cannot create output '{}'", output.display()))?;
    annotated
        .write(BufWriter::new(out))
        .with_context(|| format!("cannot write annotations to '{}'", output.display()))?;
    log::info!("annotations written: {}", output.display());
    Ok(annotated)
}
