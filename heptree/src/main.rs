//! Projects candidate events into branch records.
//!
//! ```bash
//! # synthetic events through the default branch set
//! heptree --synthetic 100 --seed 7 --output events.jsonl
//!
//! # recorded events, branches from a detector card, compressed frames
//! heptree --card delphes_card.tcl --input events.json --output events.frames --format frames
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use clap::{Parser, ValueEnum};
use hepcore::candidate::event::CandidateEvent;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use heptree::sim::synthetic::{synthetic_branches, SyntheticEventGenerator, SyntheticEventOpts};
use heptree::writer::config::TreeWriterConfig;
use heptree::writer::error::TreeWriterResult;
use heptree::writer::input::read_candidate_events;
use heptree::writer::registry::BranchRegistry;
use heptree::writer::sink::{FrameSink, JsonLinesSink, RecordSink};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// One JSON object per event and line
    Json,
    /// Length-prefixed zstd-compressed bincode frames
    Frames,
}

/// Writes reconstructed event content as flat branch records
#[derive(Parser, Debug)]
#[command(name = "heptree")]
#[command(about = "Project simulated candidate events into branch records")]
struct Args {
    /// Branch configuration as JSON
    #[arg(long, conflicts_with = "card")]
    config: Option<PathBuf>,

    /// Detector card with `add Branch` lines
    #[arg(long)]
    card: Option<PathBuf>,

    /// Events as a JSON array of candidate events
    #[arg(long, conflicts_with = "synthetic")]
    input: Option<PathBuf>,

    /// Number of synthetic events to generate instead of reading input
    #[arg(long, default_value = "10")]
    synthetic: usize,

    /// Seed for synthetic events
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output file, stdout if omitted
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// zstd level for frame output
    #[arg(long, default_value = "3")]
    compression_level: i32,

    /// Threads for branch projection (0 = rayon default)
    #[arg(long, default_value = "0")]
    num_threads: usize,

    /// Log filter, e.g. "info" or "heptree=debug"
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(args: &Args) -> TreeWriterResult<TreeWriterConfig> {
    let config = match (&args.config, &args.card) {
        (Some(path), _) => TreeWriterConfig::from_json_file(path)?,
        (None, Some(path)) => TreeWriterConfig::from_card_file(path)?,
        (None, None) => synthetic_branches(),
    };
    let parallel = config.parallel;
    Ok(config.with_threads(parallel, args.num_threads))
}

fn load_events(args: &Args) -> TreeWriterResult<Box<dyn Iterator<Item = CandidateEvent>>> {
    match &args.input {
        Some(path) => {
            let events = read_candidate_events(BufReader::new(File::open(path)?))?;
            info!("loaded {}", path.display());
            Ok(Box::new(events.into_iter()))
        }
        None => {
            let generator = SyntheticEventGenerator::new(args.seed, SyntheticEventOpts::default());
            Ok(Box::new(generator.take(args.synthetic)))
        }
    }
}

fn open_sink(args: &Args) -> TreeWriterResult<Box<dyn RecordSink>> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    Ok(match args.format {
        Format::Json => Box::new(JsonLinesSink::new(writer)),
        Format::Frames => Box::new(FrameSink::new(writer, args.compression_level)),
    })
}

fn main() -> TreeWriterResult<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
        .init();

    let registry = BranchRegistry::from_config(&load_config(&args)?)?;
    let mut sink = open_sink(&args)?;

    let start = Instant::now();
    let mut written = 0usize;
    for event in load_events(&args)? {
        registry.write_event(&event, sink.as_mut())?;
        written += 1;
    }
    sink.finish()?;

    info!("wrote {} events in {:.2?}", written, start.elapsed());
    Ok(())
}
