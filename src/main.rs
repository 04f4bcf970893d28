//! FastRangeSet CLI entry point
//!
//! bedtools-style merge, intersect and subtract over BED files.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use fast_rangeset::formats::bed::{read_grouping, write_grouping_to};
use fast_rangeset::{IntersectMode, RangeGrouping, SubtractMode};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Intersect output granularity (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum IntersectModeArg {
    /// Report the shared bases of every overlapping pair
    #[default]
    #[value(name = "pieces")]
    Pieces,
    /// Report each overlapping reference interval once
    #[value(name = "whole")]
    Whole,
}

impl From<IntersectModeArg> for IntersectMode {
    fn from(arg: IntersectModeArg) -> Self {
        match arg {
            IntersectModeArg::Pieces => IntersectMode::Pieces,
            IntersectModeArg::Whole => IntersectMode::WholeIntervals,
        }
    }
}

/// Subtract output granularity (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SubtractModeArg {
    /// Keep only reference intervals with no qualifying overlap
    #[default]
    #[value(name = "drop")]
    Drop,
    /// Keep the uncovered pieces of every reference interval
    #[value(name = "pieces")]
    Pieces,
}

impl From<SubtractModeArg> for SubtractMode {
    fn from(arg: SubtractModeArg) -> Self {
        match arg {
            SubtractModeArg::Drop => SubtractMode::DropOverlapping,
            SubtractModeArg::Pieces => SubtractMode::Pieces,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-rangeset")]
#[command(about = "Genomic interval set algebra on BED files")]
#[command(version)]
#[command(author = "FastRangeSet Contributors")]
struct Cli {
    /// Number of worker threads (default: number of CPUs)
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge overlapping or nearby intervals of one or two BED files
    #[command(allow_negative_numbers = true)]
    Merge {
        /// Input BED file
        input: PathBuf,
        /// Optional second BED file merged together with the first
        second: Option<PathBuf>,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Bridge gaps up to this many bases; negative values require that much overlap
        #[arg(short = 'd', long, default_value = "0")]
        distance: i64,
    },
    /// Report overlaps between reference and query intervals
    #[command(allow_negative_numbers = true)]
    Intersect {
        /// Reference BED file
        reference: PathBuf,
        /// Query BED file
        query: PathBuf,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Minimum number of overlapping bases
        #[arg(short = 'm', long, default_value = "1")]
        min_overlap: i64,
        /// Output granularity: pieces or whole
        #[arg(long, default_value = "pieces")]
        mode: IntersectModeArg,
    },
    /// Remove query coverage from reference intervals
    #[command(allow_negative_numbers = true)]
    Subtract {
        /// Reference BED file
        reference: PathBuf,
        /// Query BED file
        query: PathBuf,
        /// Output file (stdout if not specified)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Minimum overlap for a query interval to count
        #[arg(short = 'm', long, default_value = "1")]
        min_overlap: i64,
        /// Output granularity: drop or pieces
        #[arg(long, default_value = "drop")]
        mode: SubtractModeArg,
    },
}

fn load_bed(path: &Path) -> anyhow::Result<RangeGrouping> {
    let start = Instant::now();
    let grouping =
        read_grouping(path).with_context(|| format!("Failed to read BED file {:?}", path))?;
    eprintln!(
        "Loaded {:?}: {} intervals in {} groups ({:.2}s)",
        path,
        grouping.range_count(),
        grouping.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(grouping)
}

fn save_bed(result: &RangeGrouping, output: Option<&Path>) -> anyhow::Result<usize> {
    let written = write_grouping_to(result, output)
        .with_context(|| format!("Failed to write output {:?}", output))?;
    Ok(written)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to create thread pool")?;
    }

    let (result, output) = match cli.command {
        Commands::Merge { input, second, output, distance } => {
            let first = load_bed(&input)?;
            let result = match second {
                Some(path) => first.merge_with(&load_bed(&path)?, distance, false),
                None => first.merge_overlaps(distance, false),
            };
            (result, output)
        }

        Commands::Intersect { reference, query, output, min_overlap, mode } => {
            let reference = load_bed(&reference)?;
            let query = load_bed(&query)?;
            let result = reference.intersect(&query, min_overlap, mode.into(), false);
            (result, output)
        }

        Commands::Subtract { reference, query, output, min_overlap, mode } => {
            let reference = load_bed(&reference)?;
            let query = load_bed(&query)?;
            let result = reference.subtract(&query, min_overlap, mode.into(), false);
            (result, output)
        }
    };

    let written = save_bed(&result, output.as_deref())?;

    eprintln!("\n=== Statistics ===");
    eprintln!("Output groups:   {}", result.len());
    eprintln!("Output records:  {}", written);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
