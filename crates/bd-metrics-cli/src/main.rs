//! bd-metrics CLI - Bjontegaard-Delta comparison tool

use std::path::PathBuf;

use bd_metrics::Method;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

/// Bjontegaard-Delta rate and PSNR between RD curves.
#[derive(Parser)]
#[command(name = "bd-metrics")]
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
    /// Compute BD-Rate and BD-PSNR with one interpolation method
    Compute {
        #[command(flatten)]
        pair: PairArgs,

        /// Interpolation method (cubic, pchip, akima)
        #[arg(long, default_value = "pchip")]
        method: Method,

        /// Print the full result as JSON, including the fitted curves
        #[arg(long)]
        json: bool,
    },

    /// Compute BD metrics with every interpolation method
    Compare {
        #[command(flatten)]
        pair: PairArgs,

        /// Output report file (.json or .csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample the relative curve difference over the overlap
    Rcd {
        #[command(flatten)]
        pair: PairArgs,

        /// Interpolation method (cubic, pchip, akima)
        #[arg(long, default_value = "pchip")]
        method: Method,

        /// Number of samples
        #[arg(long, default_value_t = 10)]
        samples: usize,

        /// Difference direction
        #[arg(long, value_enum, default_value_t = Direction::Horizontal)]
        direction: Direction,

        /// Output CSV file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Input file and the two curves to compare.
#[derive(Args)]
pub struct PairArgs {
    /// Input CSV or JSON file with labelled RD points
    #[arg(short, long)]
    input: PathBuf,

    /// Label of the anchor curve
    #[arg(long)]
    anchor: String,

    /// Label of the test curve
    #[arg(long)]
    test: String,

    /// Label column name (CSV)
    #[arg(long)]
    label_col: Option<String>,

    /// Rate column name (CSV)
    #[arg(long)]
    rate_col: Option<String>,

    /// Distortion column name (CSV)
    #[arg(long)]
    distortion_col: Option<String>,

    /// Allow anchor and test to have different point counts
    #[arg(long)]
    allow_mismatched: bool,

    /// Warn when the curves overlap less than this fraction of their range
    #[arg(long, default_value_t = 0.0)]
    min_overlap: f64,
}

/// Which gap the RCD measures.
#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    /// Rate difference at equal distortion
    Horizontal,
    /// Distortion difference at equal rate
    Vertical,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compute { pair, method, json } => commands::compute::run(&pair, method, json),
        Commands::Compare { pair, output } => commands::compare::run(&pair, output),
        Commands::Rcd {
            pair,
            method,
            samples,
            direction,
            output,
        } => commands::rcd::run(&pair, method, samples, direction, output),
    }
}
