//! edna-id - eDNA result normalization and novelty CLI
//!
//! Reads prediction-service responses saved as JSON, normalizes them and
//! prints novelty summaries, differential results and curation suggestions.
//! This binary is the caller: it owns file I/O and the persisted previous run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edna_common::config::{load_or_default, ConfigOverrides, ConfigResolver, ResolvedConfig};
use edna_id::engine::{
    detect_new, normalize, normalize_payload, suggest_neighbours, NoveltyClassifier,
};
use edna_id::snapshot::{AnalysisReport, AnalysisSnapshot, SnapshotHistory};
use edna_id::state::SnapshotStore;
use edna_id::types::SpeciesRecord;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Command-line arguments for edna-id
#[derive(Parser, Debug)]
#[command(name = "edna-id")]
#[command(about = "Normalize eDNA species predictions and detect novel species")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/edna/edna-id.toml)
    #[arg(long, global = true, env = "EDNA_CONFIG")]
    config: Option<PathBuf>,

    /// Novelty threshold override, 0.0-1.0
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Directory holding the last analysis snapshot
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print canonical species records
    Normalize { payload: PathBuf },

    /// Print known/novel counts and percentages
    Summary { payload: PathBuf },

    /// Print records whose species are absent from a previous run
    Diff { current: PathBuf, previous: PathBuf },

    /// Print the most and least confident neighbours of one record
    Rank {
        payload: PathBuf,

        /// Record id (or species name when no id matches)
        #[arg(long)]
        target: String,

        /// Neighbours per list
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Full report against the last stored run, then store this run
    Analyze {
        payload: PathBuf,

        /// Do not replace the stored snapshot
        #[arg(long)]
        no_save: bool,
    },

    /// Print the resolved configuration
    Config,
}

fn main() -> Result<()> {
    let filter_handle = init_tracing();
    let args = Args::parse();

    let toml = load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    if std::env::var("RUST_LOG").is_err() {
        let filter = EnvFilter::try_new(&toml.logging.level)
            .with_context(|| format!("Invalid logging.level '{}'", toml.logging.level))?;
        filter_handle.reload(filter)?;
    }

    let count_override = match &args.command {
        Command::Rank { count, .. } => *count,
        _ => None,
    };
    let config = ConfigResolver::new(toml)
        .with_overrides(ConfigOverrides {
            novelty_threshold: args.threshold,
            neighbour_count: count_override,
            state_dir: args.state_dir.clone(),
        })
        .resolve()
        .context("Invalid configuration")?;
    debug!("Resolved configuration: {:?}", config);

    let classifier = NoveltyClassifier::new(config.novelty_threshold);

    match args.command {
        Command::Normalize { payload } => {
            let records =
                normalize(&read_payload(&payload)?).map_err(|e| report_failure(&payload, e))?;
            print_json(&records)
        }
        Command::Summary { payload } => {
            let records = load_records(&payload)?;
            print_json(&classifier.aggregate(&records))
        }
        Command::Diff { current, previous } => {
            let current_records = load_records(&current)?;
            let previous_records = load_records(&previous)?;
            let new_records = detect_new(&current_records, &previous_records);
            info!(
                "{} newly observed records in {}",
                new_records.len(),
                current.display()
            );
            print_json(&new_records)
        }
        Command::Rank { payload, target, .. } => {
            let records = load_records(&payload)?;
            let selected = find_target(&records, &target)?;
            print_json(&suggest_neighbours(selected, &records, config.neighbour_count))
        }
        Command::Analyze { payload, no_save } => {
            run_analysis(&payload, no_save, &config, &classifier)
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Initialize tracing on stderr; RUST_LOG wins, config may adjust later
fn init_tracing() -> reload::Handle<EnvFilter, Registry> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    handle
}

fn run_analysis(
    payload_path: &Path,
    no_save: bool,
    config: &ResolvedConfig,
    classifier: &NoveltyClassifier,
) -> Result<()> {
    let raw = read_payload(payload_path)?;
    let payload = normalize_payload(&raw).map_err(|e| report_failure(payload_path, e))?;

    let store = SnapshotStore::new(&config.state_dir);
    let mut history = match store.load().context("Failed to load previous snapshot")? {
        Some(last) => SnapshotHistory::resume(last),
        None => {
            info!("No previous run found, every species is new");
            SnapshotHistory::new()
        }
    };

    let file_name = payload_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    history.record(AnalysisSnapshot::from_payload(payload, file_name));

    let report = AnalysisReport::from_history(&history, classifier)
        .context("No analysis recorded")?;
    info!(
        "Analysis {}: {} records, {} novel, {} newly observed",
        report.analysis_id,
        report.summary.total,
        report.summary.novel_count,
        report.newly_observed.len()
    );

    if !no_save {
        if let Some(current) = history.current() {
            store.save(current).context("Failed to store snapshot")?;
        }
    }

    print_json(&report)
}

fn read_payload(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn load_records(path: &Path) -> Result<Vec<SpeciesRecord>> {
    let raw = read_payload(path)?;
    normalize(&raw).map_err(|e| report_failure(path, e))
}

fn report_failure(path: &Path, err: edna_id::NormalizeError) -> anyhow::Error {
    warn!("Normalization failed for {}: {}", path.display(), err);
    anyhow::Error::new(err).context(format!("Cannot use {}", path.display()))
}

fn find_target<'a>(records: &'a [SpeciesRecord], target: &str) -> Result<&'a SpeciesRecord> {
    records
        .iter()
        .find(|r| r.id == target)
        .or_else(|| records.iter().find(|r| r.name == target))
        .ok_or_else(|| edna_common::Error::NotFound(format!("record '{}'", target)).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
