//! hashwatch - file integrity monitoring through hash baselines.
//!
//! Usage:
//!   hashwatch baseline [PATH] -b FILE   Record a baseline for a directory tree
//!   hashwatch verify [PATH] -b FILE     Compare the tree against the baseline
//!   hashwatch scan [PATH]               One-shot snapshot without persistence
//!   hashwatch --help                    Show help

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing_subscriber::EnvFilter;

use hashwatch_baseline::{BaselineStore, diff};
use hashwatch_core::{BaselineError, HashAlgorithm, ScanConfig, Snapshot};
use hashwatch_scan::{ScanOutcome, SnapshotScanner};

mod report;

#[derive(Parser)]
#[command(
    name = "hashwatch",
    version,
    about = "File integrity monitoring through hash baselines",
    long_about = "hashwatch records content hashes for every file under a \
                  directory tree, then detects added, removed, and modified \
                  files on later runs.\n\n\
                  Record a baseline with `hashwatch baseline`, then check the \
                  tree with `hashwatch verify`."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a tree and record the result as the new baseline
    Baseline {
        /// Root of the tree to record
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Baseline file location
        #[arg(short, long)]
        baseline: PathBuf,

        /// Hash algorithm
        #[arg(short, long, default_value = "blake3")]
        algorithm: HashAlgorithm,

        /// Directory names to skip entirely (repeatable; adds to the defaults)
        #[arg(short, long = "exclude", value_name = "DIR")]
        exclude: Vec<String>,

        /// Hashing threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        threads: usize,
    },

    /// Compare a tree against a recorded baseline
    Verify {
        /// Root of the tree to check (defaults to the baseline's recorded root)
        path: Option<PathBuf>,

        /// Baseline file location
        #[arg(short, long)]
        baseline: PathBuf,

        /// Directory names to skip entirely (repeatable; adds to the defaults)
        #[arg(short, long = "exclude", value_name = "DIR")]
        exclude: Vec<String>,

        /// Hashing threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also write a timestamped report file into this directory
        #[arg(short, long, value_name = "DIR")]
        report: Option<PathBuf>,
    },

    /// Scan a tree and print the snapshot without touching any baseline
    Scan {
        /// Root of the tree to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Hash algorithm
        #[arg(short, long, default_value = "blake3")]
        algorithm: HashAlgorithm,

        /// Directory names to skip entirely (repeatable; adds to the defaults)
        #[arg(short, long = "exclude", value_name = "DIR")]
        exclude: Vec<String>,

        /// Hashing threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Exit code when verification finds changes.
const EXIT_CHANGES: u8 = 1;
/// Exit code when the baseline is missing or unreadable.
const EXIT_NO_BASELINE: u8 = 2;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Baseline {
            path,
            baseline,
            algorithm,
            exclude,
            threads,
        } => {
            run_baseline(&path, &baseline, algorithm, exclude, threads)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify {
            path,
            baseline,
            exclude,
            threads,
            format,
            report,
        } => run_verify(path, &baseline, exclude, threads, format, report),
        Command::Scan {
            path,
            algorithm,
            exclude,
            threads,
            format,
        } => {
            run_scan(&path, algorithm, exclude, threads, format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_config(
    path: &PathBuf,
    algorithm: HashAlgorithm,
    exclude: Vec<String>,
    threads: usize,
) -> Result<ScanConfig> {
    let mut config = ScanConfig::builder()
        .root(path)
        .algorithm(algorithm)
        .threads(threads)
        .build()
        .map_err(|e| eyre!("invalid scan options: {e}"))?;
    config.exclude_dirs.extend(exclude);
    Ok(config)
}

/// Record a fresh snapshot as the baseline.
fn run_baseline(
    path: &PathBuf,
    baseline: &PathBuf,
    algorithm: HashAlgorithm,
    exclude: Vec<String>,
    threads: usize,
) -> Result<()> {
    let config = build_config(path, algorithm, exclude, threads)?;

    eprintln!("Scanning {}...", path.display());
    let outcome = SnapshotScanner::new()
        .scan(&config)
        .context("Scan failed")?;
    print_scan_summary(&outcome);

    let store = BaselineStore::new(baseline);
    store.save(&outcome.snapshot).context("Baseline save failed")?;
    println!(
        "Baseline recorded: {} files -> {}",
        outcome.snapshot.len(),
        store.location().display()
    );

    Ok(())
}

/// Compare the tree against the baseline; the exit code carries the verdict.
fn run_verify(
    path: Option<PathBuf>,
    baseline_path: &PathBuf,
    exclude: Vec<String>,
    threads: usize,
    format: OutputFormat,
    report_dir: Option<PathBuf>,
) -> Result<ExitCode> {
    let store = BaselineStore::new(baseline_path);
    let baseline = match store.load() {
        Ok(snapshot) => snapshot,
        Err(err @ BaselineError::NotFound { .. }) => {
            eprintln!("{err}");
            eprintln!("Run `hashwatch baseline` first to record one.");
            return Ok(ExitCode::from(EXIT_NO_BASELINE));
        }
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::from(EXIT_NO_BASELINE));
        }
    };

    // Rescan with the settings the baseline was recorded with.
    let root = path.unwrap_or_else(|| baseline.root.clone());
    let config = build_config(&root, baseline.algorithm, exclude, threads)?;

    eprintln!("Scanning {}...", root.display());
    let outcome = SnapshotScanner::new()
        .scan(&config)
        .context("Scan failed")?;
    print_scan_summary(&outcome);

    let changes = diff(&baseline, &outcome.snapshot);

    match format {
        OutputFormat::Text => {
            print!("{}", report::render_text(&changes, &root, store.location()));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&changes)?);
        }
    }

    if let Some(dir) = report_dir {
        let text = report::render_text(&changes, &root, store.location());
        let written = report::write_report(&dir, &text).context("Report write failed")?;
        eprintln!("Report written to {}", written.display());
    }

    if changes.has_changes() {
        Ok(ExitCode::from(EXIT_CHANGES))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// One-shot snapshot, printed and discarded.
fn run_scan(
    path: &PathBuf,
    algorithm: HashAlgorithm,
    exclude: Vec<String>,
    threads: usize,
    format: OutputFormat,
) -> Result<()> {
    let config = build_config(path, algorithm, exclude, threads)?;

    eprintln!("Scanning {}...", path.display());
    let outcome = SnapshotScanner::new()
        .scan(&config)
        .context("Scan failed")?;
    print_scan_summary(&outcome);

    match format {
        OutputFormat::Text => print_snapshot_text(&outcome.snapshot),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.snapshot)?);
        }
    }

    Ok(())
}

fn print_scan_summary(outcome: &ScanOutcome) {
    eprintln!(
        "Hashed {} file(s) in {:.2}s",
        outcome.snapshot.len(),
        outcome.scan_duration.as_secs_f64()
    );
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    if !outcome.warnings.is_empty() {
        eprintln!("{} file(s) skipped during scan", outcome.warnings.len());
    }
}

fn print_snapshot_text(snapshot: &Snapshot) {
    println!();
    println!("{}", "─".repeat(70));
    println!(
        " {} - {} files ({})",
        snapshot.root.display(),
        snapshot.len(),
        snapshot.algorithm.name()
    );
    println!("{}", "─".repeat(70));
    for (path, digest) in snapshot.iter() {
        println!(" {}  {}", digest.as_str(), path);
    }
}
