use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use seqscan::blast::NcbiSearch;
use seqscan::config::Settings;
use seqscan::overwrite::{AlwaysOverwrite, OverwriteGate, PromptGate};
use seqscan::pipeline::{self, MatchJob};
use seqscan::targets::TargetTable;

#[derive(Parser, Debug)]
#[command(name = "seqscan", author, version, about = "Find target-sequence hits in FASTA files and BLAST their upstream regions", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./seqscan.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find exact forward / reverse-complement hits of a named target
    Match {
        /// FASTA file to scan
        fasta: Option<PathBuf>,
        /// Target name from the target table
        target: Option<String>,
        /// Output CSV (default: matches-<fasta>-<target>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing output without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// BLAST every upstream sequence of a match table and append the top hit
    Annotate {
        /// Match CSV to read
        input: Option<PathBuf>,
        /// Annotated CSV to write
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let settings = Settings::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Match { fasta, target, output, yes } => run_match(&settings, fasta, target, output, yes),
        Commands::Annotate { input, output } => run_annotate(&settings, input, output),
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

fn run_match(
    settings: &Settings,
    fasta: Option<PathBuf>,
    target: Option<String>,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let targets = TargetTable::with_overrides(settings.targets.iter());

    let (fasta, target_name, default_output, ask) = match (fasta, target) {
        (Some(fasta), Some(target)) => {
            log::info!("Running with provided args");
            let out = pipeline::default_match_output(&fasta, &target);
            (fasta, target, out, !yes)
        }
        _ => {
            log::warn!("Missing args (FASTA file, target name), running with defaults");
            (
                settings.matcher.default_input.clone(),
                settings.matcher.default_target.clone(),
                settings.matcher.default_output.clone(),
                false,
            )
        }
    };

    let job = MatchJob {
        target: targets.get(&target_name)?.to_string(),
        fasta,
        target_name,
        output: output.unwrap_or(default_output),
        flank: settings.matcher.flank,
    };

    let mut prompt;
    let mut always = AlwaysOverwrite;
    let gate: &mut dyn OverwriteGate = if ask {
        prompt = PromptGate::stdio();
        &mut prompt
    } else {
        &mut always
    };
    pipeline::run_match(&job, Some(gate))?;
    Ok(())
}

fn run_annotate(settings: &Settings, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let (input, output) = match (input, output) {
        (Some(i), Some(o)) => {
            log::info!("Running with provided args");
            (i, o)
        }
        _ => {
            log::warn!("Missing args (input file, output file), running with defaults");
            (
                settings.annotator.default_input.clone(),
                settings.annotator.default_output.clone(),
            )
        }
    };

    let mut search = NcbiSearch::from_settings(&settings.blast, &settings.annotator)?;
    pipeline::run_annotate(&input, &output, &mut search)?;
    Ok(())
}
