//! Hotrank CLI — batch invocation surface for the ranking engine.
//!
//! Reads a JSON-lines corpus of `(id, SignalSet)` records, scores each item
//! under a named profile, and writes `(id, score)` JSON lines back out. The
//! engine itself never touches storage; this binary is the thin collaborator
//! that feeds it and persists the scalars.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use hotrank::{BatchDriver, ProfileRegistry, SignalSet, DEFAULT_BATCH_SIZE};

#[derive(Parser)]
#[command(name = "hotrank")]
#[command(about = "Multi-signal content ranking engine")]
#[command(version)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Profiles config file (TOML); built-in seed when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute scores for a corpus of items
    Recompute {
        /// Profile name (e.g. feed, funding, feed_recency, comment)
        #[arg(long)]
        profile: String,
        /// JSON-lines corpus file; `-` for stdin
        #[arg(long)]
        input: PathBuf,
        /// JSON-lines score output; `-` or omitted for stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Items per page
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Compute but do not write scores
        #[arg(long)]
        dry_run: bool,
        /// Explicit "now" (RFC 3339) for backfills and reproducible runs
        #[arg(long)]
        now: Option<String>,
        /// Include the per-component breakdown in each output line
        #[arg(long)]
        explain: bool,
    },
    /// List available profile names
    Profiles,
}

/// One corpus line: an item id plus its raw signals.
#[derive(Debug, Deserialize)]
struct CorpusRecord {
    id: i64,
    #[serde(flatten)]
    signals: SignalSet,
}

#[derive(Debug, Serialize)]
struct ScoreRecord {
    id: i64,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<std::collections::BTreeMap<String, f64>>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let registry = match &cli.config {
        Some(path) => ProfileRegistry::load_from_file(path)?,
        None => ProfileRegistry::load_or_seed()?,
    };

    match cli.command {
        Commands::Profiles => {
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Recompute {
            profile,
            input,
            output,
            batch_size,
            dry_run,
            now,
            explain,
        } => run_recompute(
            &registry, &profile, &input, output.as_deref(), batch_size, dry_run, now, explain,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_recompute(
    registry: &ProfileRegistry,
    profile_name: &str,
    input: &std::path::Path,
    output: Option<&std::path::Path>,
    batch_size: usize,
    dry_run: bool,
    now_override: Option<String>,
    explain: bool,
) -> Result<()> {
    let profile = registry.get(profile_name)?;
    let now = parse_now(now_override.as_deref())?;

    let reader: Box<dyn BufRead> = if input == std::path::Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        Box::new(BufReader::new(
            File::open(input).with_context(|| format!("opening corpus {}", input.display()))?,
        ))
    };

    let mut writer: Box<dyn Write> = match output {
        Some(p) if p != std::path::Path::new("-") => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("creating output {}", p.display()))?,
        )),
        _ => Box::new(BufWriter::new(io::stdout())),
    };

    // Malformed JSON lines surface as per-item failures through the driver,
    // same as malformed SignalSets.
    let corpus = reader.lines().enumerate().map(|(line_no, line)| {
        match line
            .map_err(anyhow::Error::from)
            .and_then(|l| serde_json::from_str::<CorpusRecord>(&l).map_err(Into::into))
        {
            Ok(record) => (record.id, record.signals),
            Err(err) => {
                tracing::warn!(line = line_no + 1, error = %err, "unparseable corpus line");
                // Sentinel record with no timestamp; compose rejects it and
                // the driver counts the failure.
                (-(line_no as i64 + 1), unparseable_sentinel())
            }
        }
    });

    let cancel = AtomicBool::new(false);
    let driver = BatchDriver::new(batch_size).dry_run(dry_run);

    let stats = driver.recompute(corpus, profile, now, &cancel, |id, result| {
        let record = ScoreRecord {
            id: *id,
            score: result.score,
            breakdown: explain.then(|| result.breakdown.clone()),
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
        Ok(())
    });

    writer.flush()?;
    info!(
        profile = profile_name,
        processed = stats.processed,
        succeeded = stats.succeeded,
        failed = stats.failed,
        dry_run,
        "done"
    );
    Ok(())
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("parsing --now '{s}' as RFC 3339"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn unparseable_sentinel() -> SignalSet {
    let mut set = SignalSet::new(hotrank::ContentKind::Post, Utc::now());
    set.created_at = None;
    set
}
