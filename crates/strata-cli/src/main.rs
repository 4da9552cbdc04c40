//! strata - layer arithmetic for resin slice stacks
//!
//! Parses and runs layer arithmetic sentences against a directory of
//! per-layer PNG images.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strata_core::Rect;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about = "Layer arithmetic for resin slice stacks")]
#[command(long_about = "
Combines slice layers pixel by pixel and writes the result into target layers.

Sentence syntax:
  [targets =] operand (op operand)* [; ...]
  targets:   n | a:b | a: | :b, comma separated
  operators: + - * / & | ^ $ (absolute difference)

Examples:
  strata parse '10,11,12 = 11 + 12 - 10 * 5' --last-layer 199
  strata parse '0:3 = 4 $ 5' --last-layer 10 --json
  strata apply ./layers '2 = 0 + 1'
  strata apply ./layers '5:9 = 4' --roi 100,100,640,480 -o ./out
  strata apply ./layers '3 = 3 - 2' --mask mask.png --roi 0,0,64,64
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a sentence and show the resulting groups
    #[command(visible_alias = "p")]
    Parse(ParseArgs),

    /// Run a sentence against a directory of layer PNGs
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),
}

#[derive(Args)]
struct ParseArgs {
    /// Arithmetic sentence
    sentence: String,

    /// Index of the last layer in the stack
    #[arg(short = 'l', long)]
    last_layer: u32,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ApplyArgs {
    /// Directory holding one PNG per layer, in name order
    input: PathBuf,

    /// Arithmetic sentence
    sentence: String,

    /// Output directory (default: overwrite in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Region of interest as x,y,width,height
    #[arg(long)]
    roi: Option<Rect>,

    /// Grayscale PNG sized to the ROI; non-zero pixels are written
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Parse and validate only, write nothing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Parse(args) => commands::parse::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
    }
}
