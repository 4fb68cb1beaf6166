//! picod0 CLI - D0 -> K pi candidate reconstruction.
//!
//! Reads JSON-lines event files and writes one D0 record per event plus
//! the QA histograms.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use picod0_core::{D0Cuts, EventSource};
use picod0_io::{load_cuts, D0EventWriter, D0Hists, JsonLinesEventReader, OutputPaths};
use picod0_reco::{D0EventMaker, D0Reconstruction, DiagnosticsScope, Maker, StraightLineFit};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    PicoIo(#[from] picod0_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] picod0_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("chunk size must be at least 1")]
    ChunkSize,
}

/// D0 -> K pi candidate reconstruction.
#[derive(Parser)]
#[command(name = "picod0")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct D0 candidates from event files
    Reco {
        /// Input JSON-lines event file(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output base name; writes <base>.picoD0.jsonl and <base>.hists.json
        #[arg(short, long)]
        output: PathBuf,

        /// JSON cut table; missing keys keep their defaults
        #[arg(short, long)]
        cuts: Option<PathBuf>,

        /// Events processed per parallel batch
        #[arg(long, default_value = "1024")]
        chunk_size: usize,

        /// Worker threads (defaults to all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Fill pair histograms for every unlike-sign pair, not just stored candidates
        #[arg(long)]
        all_pairs: bool,
    },

    /// Print the cut table in effect as JSON
    Cuts {
        /// JSON cut table to merge over the defaults
        cuts: Option<PathBuf>,
    },

    /// Show information about an event file
    Info {
        /// Input JSON-lines event file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Reco {
            input,
            output,
            cuts,
            chunk_size,
            threads,
            all_pairs,
        } => {
            if chunk_size == 0 {
                return Err(CliError::ChunkSize);
            }
            if let Some(n) = threads {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build_global()?;
            }
            let scope = if all_pairs {
                DiagnosticsScope::AllPairs
            } else {
                DiagnosticsScope::SelectedPairs
            };
            run_reco(&input, &output, read_cuts(cuts.as_deref())?, chunk_size, scope)?;
        }

        Commands::Cuts { cuts } => {
            let cuts = read_cuts(cuts.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&cuts)?);
        }

        Commands::Info { input } => print_info(&input)?,
    }

    Ok(())
}

fn read_cuts(path: Option<&Path>) -> Result<D0Cuts> {
    match path {
        Some(path) => {
            info!("loading cuts from {}", path.display());
            Ok(load_cuts(path)?)
        }
        None => Ok(D0Cuts::default()),
    }
}

fn run_reco(
    input: &[PathBuf],
    output: &Path,
    cuts: D0Cuts,
    chunk_size: usize,
    scope: DiagnosticsScope,
) -> Result<()> {
    let paths = OutputPaths::from_base(output);
    let records = D0EventWriter::create(&paths.records)?;
    let hists = D0Hists::with_path(&paths.hists);
    let reco = D0Reconstruction::new(cuts, StraightLineFit::new()).with_diagnostics_scope(scope);

    let mut maker = D0EventMaker::new(reco, records, hists);
    maker.init()?;

    let start = Instant::now();
    for path in input {
        info!("reading {}", path.display());
        let mut reader = JsonLinesEventReader::open(path)?;
        let mut file_events = 0usize;
        loop {
            let chunk = reader.read_chunk(chunk_size)?;
            if chunk.is_empty() {
                break;
            }
            file_events += maker.make_batch(&chunk)?;
        }
        info!("  {} events from {}", file_events, path.display());
    }
    maker.finish()?;

    let stats = maker.stats();
    let elapsed = start.elapsed();
    println!(
        "Processed {} files in {:.2}s",
        input.len(),
        elapsed.as_secs_f64()
    );
    println!("Events: {}", stats.events_seen);
    println!("Accepted events: {}", stats.events_accepted);
    println!("D0 candidates: {}", stats.candidates_written);
    println!("Records: {}", paths.records.display());
    println!("Histograms: {}", paths.hists.display());
    Ok(())
}

fn print_info(input: &Path) -> Result<()> {
    let reader = JsonLinesEventReader::open(input)?;

    let mut n_events = 0usize;
    let mut n_tracks = 0usize;
    let mut n_missing = 0usize;
    let mut runs = std::collections::BTreeSet::new();
    let mut vz_range: Option<(f32, f32)> = None;

    for event in reader {
        let event = event?;
        n_events += 1;
        runs.insert(event.event.run_id);

        let vz = event.event.primary_vertex.z;
        vz_range = Some(match vz_range {
            Some((lo, hi)) => (lo.min(vz), hi.max(vz)),
            None => (vz, vz),
        });

        for idx in 0..event.track_count() {
            match event.track(idx) {
                Some(_) => n_tracks += 1,
                None => n_missing += 1,
            }
        }
    }

    println!("File: {}", input.display());
    println!("Events: {}", n_events);
    println!("Runs: {}", runs.len());
    println!("Tracks: {}", n_tracks);
    if n_missing > 0 {
        println!("Missing track slots: {}", n_missing);
    }
    if n_events > 0 {
        println!("Mean tracks/event: {:.1}", n_tracks as f64 / n_events as f64);
    }
    if let Some((lo, hi)) = vz_range {
        println!("Vz range: {:.2} - {:.2} cm", lo, hi);
    }
    Ok(())
}
