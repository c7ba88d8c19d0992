//! Runtime settings, loaded from `seqscan.toml` with serde defaults for
//! every field so partial files work.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "seqscan.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub matcher: MatcherSettings,
    #[serde(default)]
    pub annotator: AnnotatorSettings,
    #[serde(default)]
    pub blast: BlastSettings,
    /// Extra or overriding named targets, merged over the built-in table.
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherSettings {
    /// Distance between the end of a hit and the start of its upstream region
    #[serde(default = "default_flank")]
    pub flank: usize,
    #[serde(default = "default_fasta")]
    pub default_input: PathBuf,
    #[serde(default = "default_target")]
    pub default_target: String,
    #[serde(default = "default_matches_csv")]
    pub default_output: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorSettings {
    #[serde(default = "default_matches_csv")]
    pub default_input: PathBuf,
    #[serde(default = "default_blast_csv")]
    pub default_output: PathBuf,
    /// Directory receiving the raw per-row BLAST reports
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,
    #[serde(default = "default_result_prefix")]
    pub result_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_hitlist_size")]
    pub hitlist_size: u32,
    /// NCBI asks clients not to poll one RID more than once a minute
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_flank() -> usize {
    200
}
fn default_fasta() -> PathBuf {
    PathBuf::from("seqs.fa")
}
fn default_target() -> String {
    "el312".to_string()
}
fn default_matches_csv() -> PathBuf {
    PathBuf::from("direct_matches.csv")
}
fn default_blast_csv() -> PathBuf {
    PathBuf::from("blast_results.csv")
}
fn default_result_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_result_prefix() -> String {
    "blast_result_".to_string()
}
fn default_endpoint() -> String {
    "https://blast.ncbi.nlm.nih.gov/Blast.cgi".to_string()
}
fn default_program() -> String {
    "blastn".to_string()
}
fn default_database() -> String {
    "nt".to_string()
}
fn default_hitlist_size() -> u32 {
    50
}
fn default_poll_interval() -> u64 {
    60
}
fn default_user_agent() -> String {
    concat!("seqscan/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            flank: default_flank(),
            default_input: default_fasta(),
            default_target: default_target(),
            default_output: default_matches_csv(),
        }
    }
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        Self {
            default_input: default_matches_csv(),
            default_output: default_blast_csv(),
            result_dir: default_result_dir(),
            result_prefix: default_result_prefix(),
        }
    }
}

impl Default for BlastSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            program: default_program(),
            database: default_database(),
            hitlist_size: default_hitlist_size(),
            poll_interval_secs: default_poll_interval(),
            user_agent: default_user_agent(),
        }
    }
}

impl Settings {
    /// Load from an explicit path, else from `seqscan.toml` in the working
    /// directory when present, else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                log::info!("Loading configuration from: {}", p.display());
                Self::load_from_file(p)
            }
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&fallback)
                } else {
                    log::debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration file '{}'", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("cannot parse configuration file '{}'", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_classic_pipeline() {
        let s = Settings::default();
        assert_eq!(s.matcher.flank, 200);
        assert_eq!(s.matcher.default_target, "el312");
        assert_eq!(s.matcher.default_output, PathBuf::from("direct_matches.csv"));
        assert_eq!(s.annotator.default_input, s.matcher.default_output);
        assert_eq!(s.annotator.default_output, PathBuf::from("blast_results.csv"));
        assert_eq!(s.blast.program, "blastn");
        assert_eq!(s.blast.database, "nt");
        assert!(s.targets.is_empty());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let s = Settings::from_toml(
            "[blast]\npoll_interval_secs = 5\n\n[targets]\nprobe = \"acgt\"\n",
        )
        .unwrap();
        assert_eq!(s.blast.poll_interval_secs, 5);
        assert_eq!(s.blast.endpoint, default_endpoint());
        assert_eq!(s.matcher.flank, 200);
        assert_eq!(s.targets.get("probe").map(String::as_str), Some("acgt"));
    }

    #[test]
    fn load_from_file_reports_bad_toml() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[matcher]\nflank = \"wide\"").unwrap();
        let err = Settings::load_from_file(f.path()).unwrap_err();
        assert!(format!("{err:#}").contains("cannot parse configuration file"));
    }

    #[test]
    fn load_explicit_file() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[annotator]\nresult_prefix = \"run1_\"").unwrap();
        let s = Settings::load(Some(f.path())).unwrap();
        assert_eq!(s.annotator.result_prefix, "run1_");
    }
}
