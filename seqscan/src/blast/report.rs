//! BLAST XML report (`BlastOutput` DTD) parsing. Only the fields the
//! annotation needs are mapped; everything else in the report is ignored.

use serde::Deserialize;

use super::error::{SearchError, SearchResult};
use super::AlignmentSummary;

#[derive(Debug, Deserialize)]
#[serde(rename = "BlastOutput")]
struct BlastOutputXml {
    #[serde(rename = "BlastOutput_program")]
    program: Option<String>,
    #[serde(rename = "BlastOutput_db")]
    database: Option<String>,
    #[serde(rename = "BlastOutput_iterations")]
    iterations: Option<IterationsXml>,
}

#[derive(Debug, Deserialize)]
struct IterationsXml {
    #[serde(rename = "Iteration", default)]
    iterations: Vec<IterationXml>,
}

#[derive(Debug, Deserialize)]
struct IterationXml {
    #[serde(rename = "Iteration_hits")]
    hits: Option<HitsXml>,
    #[serde(rename = "Iteration_message")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HitsXml {
    #[serde(rename = "Hit", default)]
    hits: Vec<HitXml>,
}

#[derive(Debug, Deserialize)]
struct HitXml {
    #[serde(rename = "Hit_id")]
    id: Option<String>,
    #[serde(rename = "Hit_def")]
    def: Option<String>,
    #[serde(rename = "Hit_accession")]
    accession: Option<String>,
    #[serde(rename = "Hit_hsps")]
    hsps: Option<HspsXml>,
}

#[derive(Debug, Deserialize)]
struct HspsXml {
    #[serde(rename = "Hsp", default)]
    hsps: Vec<HspXml>,
}

#[derive(Debug, Deserialize)]
struct HspXml {
    #[serde(rename = "Hsp_bit-score")]
    bit_score: Option<f64>,
    #[serde(rename = "Hsp_evalue")]
    evalue: Option<f64>,
    #[serde(rename = "Hsp_identity")]
    identity: Option<u32>,
    #[serde(rename = "Hsp_align-len")]
    align_len: Option<u32>,
}

/// Top hit and its first HSP from a single-query BLAST XML report.
pub fn parse_best_alignment(xml: &str) -> SearchResult<AlignmentSummary> {
    let report: BlastOutputXml =
        quick_xml::de::from_str(xml).map_err(|e| SearchError::malformed(e.to_string()))?;
    log::debug!(
        "report: program={} db={}",
        report.program.as_deref().unwrap_or("?"),
        report.database.as_deref().unwrap_or("?")
    );

    let iteration = report
        .iterations
        .and_then(|its| its.iterations.into_iter().next())
        .ok_or_else(|| SearchError::malformed("no Iteration element"))?;
    if let Some(msg) = iteration.message.as_deref() {
        log::debug!("iteration message: {}", msg);
    }

    let top = iteration
        .hits
        .and_then(|h| h.hits.into_iter().next())
        .ok_or(SearchError::NoHits)?;
    let hit_def = top.def.unwrap_or_default();

    let hsp = match top.hsps.and_then(|h| h.hsps.into_iter().next()) {
        Some(hsp) => hsp,
        None => return Err(SearchError::NoHsp { hit_def }),
    };
    let align_length = hsp
        .align_len
        .ok_or_else(|| SearchError::malformed("Hsp_align-len missing"))?;
    let identities = hsp
        .identity
        .ok_or_else(|| SearchError::malformed("Hsp_identity missing"))?;
    if align_length == 0 {
        return Err(SearchError::EmptyAlignment { hit_def });
    }

    Ok(AlignmentSummary {
        hit_id: top.id.unwrap_or_default(),
        hit_def,
        accession: top.accession.unwrap_or_default(),
        align_length,
        identities,
        evalue: hsp.evalue,
        bit_score: hsp.bit_score,
    })
}
