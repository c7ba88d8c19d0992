use std::fs;
use std::path::Path;

use seqscan::blast::{AlignmentSummary, SearchResult, SimilaritySearch};
use seqscan::matcher::Strand;
use seqscan::overwrite::OverwriteGate;
use seqscan::pipeline::{self, MatchJob};
use seqscan::targets::TargetTable;

/// Answers every query with the same hit and records what it was asked.
struct CannedSearch {
    queries: Vec<(usize, String)>,
}

impl SimilaritySearch for CannedSearch {
    fn best_alignment(&mut self, row: usize, query: &str) -> SearchResult<AlignmentSummary> {
        self.queries.push((row, query.to_string()));
        Ok(AlignmentSummary {
            hit_id: "gi|42|".to_string(),
            hit_def: "Synthetic construct, clone 7".to_string(),
            accession: "SC7".to_string(),
            align_length: 4,
            identities: 3,
            evalue: None,
            bit_score: None,
        })
    }
}

struct Decline;

impl OverwriteGate for Decline {
    fn allow(&mut self, _path: &Path) -> anyhow::Result<bool> {
        Ok(false)
    }
}

fn write_fasta(dir: &Path, target: &str) -> std::path::PathBuf {
    // seq1: forward hit with a 4 bp upstream tail past the 200 bp flank
    let mut seq1 = String::from("GG");
    seq1.push_str(target);
    seq1.push_str(&"A".repeat(200));
    seq1.push_str("CGTA");
    // seq2: reverse-complement hit, too short for an upstream region
    let rc: String = String::from_utf8(seqscan::util::dna::revcomp(target.as_bytes())).unwrap();
    let seq2 = format!("TT{}TT", rc);
    // seq3: no hit, seq4: shorter than the target
    let fasta = format!(
        ">seq1 forward\n{}\n{}\n>seq2 reverse\n{}\n>seq3\n{}\n>seq4\nACGT\n",
        &seq1[..60],
        &seq1[60..],
        seq2,
        "C".repeat(80)
    );
    let path = dir.join("seqs.fa");
    fs::write(&path, fasta).unwrap();
    path
}

#[test]
fn match_then_annotate() {
    let dir = tempfile::tempdir().unwrap();
    let targets = TargetTable::builtin();
    let target = targets.get("el1").unwrap().to_string();
    let fasta = write_fasta(dir.path(), &target);

    let job = MatchJob {
        fasta: fasta.clone(),
        target_name: "el1".to_string(),
        target,
        output: dir.path().join("direct_matches.csv"),
        flank: 200,
    };
    let hits = pipeline::run_match(&job, None).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "seq1");
    assert_eq!(hits[0].strand, Strand::Forward);
    assert_eq!(hits[0].position, 2);
    assert_eq!(hits[0].upstream, "CGTA");
    assert_eq!(hits[1].id, "seq2");
    assert_eq!(hits[1].strand, Strand::ReverseComplement);
    assert_eq!(hits[1].position, 2);
    assert_eq!(hits[1].upstream, "");

    let csv = fs::read_to_string(&job.output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, vec![
        "ID,POSITION,STRAND,UPST LENGTH,UPSTREAM",
        "seq1,3,ORIGINAL,4,CGTA",
        "seq2,3,REVERSE COMPLEMENT,0,",
    ]);

    let annotated_path = dir.path().join("blast_results.csv");
    let mut search = CannedSearch { queries: Vec::new() };
    pipeline::run_annotate(&job.output, &annotated_path, &mut search).unwrap();
    assert_eq!(search.queries, vec![(1, "CGTA".to_string())]);

    let out = fs::read_to_string(&annotated_path).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec![
        "ID, POSITION, STRAND, UPST LENGTH, UPSTREAM, TOP DEFINITION, ALIGN LENGTH, PERCENT IDENTITY",
        "seq1,3,ORIGINAL,4,CGTA,Synthetic construct| clone 7,4,75.0",
        "seq2,3,REVERSE COMPLEMENT,0,",
    ]);
}

#[test]
fn declined_overwrite_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let targets = TargetTable::builtin();
    let target = targets.get("el1").unwrap().to_string();
    let fasta = write_fasta(dir.path(), &target);
    let output = dir.path().join("matches.csv");
    fs::write(&output, "keep me\n").unwrap();

    let job = MatchJob { fasta, target_name: "el1".into(), target, output: output.clone(), flank: 200 };
    let hits = pipeline::run_match(&job, Some(&mut Decline)).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me\n");
}

#[test]
fn legacy_four_column_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("legacy.csv");
    fs::write(&input, "ID,POSITION,STRAND,UPSTREAM\nx,1,ORIGINAL,ACGT\ny,2,ORIGINAL,\n").unwrap();
    let output = dir.path().join("out.csv");

    let mut search = CannedSearch { queries: Vec::new() };
    let table = pipeline::run_annotate(&input, &output, &mut search).unwrap();
    assert_eq!(table.rows[0].len(), 7);

    let out = fs::read_to_string(&output).unwrap();
    assert!(out.starts_with("ID, POSITION, STRAND, UPSTREAM, TOP DEFINITION, ALIGN LENGTH, PERCENT IDENTITY\n"));
    assert!(out.contains("x,1,ORIGINAL,ACGT,Synthetic construct| clone 7,4,75.0\n"));
    assert!(out.ends_with("y,2,ORIGINAL,\n"));
}

#[test]
fn missing_fasta_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let job = MatchJob {
        fasta: dir.path().join("absent.fa"),
        target_name: "el1".into(),
        target: "ACGT".into(),
        output: dir.path().join("out.csv"),
        flank: 200,
    };
    let err = pipeline::run_match(&job, None).unwrap_err();
    assert!(err.to_string().contains("absent.fa"));
    assert!(!dir.path().join("out.csv").exists());
}
