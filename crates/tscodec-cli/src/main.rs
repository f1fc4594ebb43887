//! tscodec CLI - inspect, convert, and benchmark column buffers.
//!
//! The library is the storage boundary; this tool exists for operators who
//! need to look inside a persisted buffer or measure how a column compresses.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Column codec tool.
///
/// Compresses newline-separated samples, decodes stored buffers, and runs
/// the randomized round-trip benchmark grid.
#[derive(Parser)]
#[command(name = "tscodec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress progress and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Value type of a text column.
#[derive(Clone, Copy, ValueEnum)]
enum ValueKind {
    /// 64-bit signed integers
    Int64,
    /// 64-bit floats
    Float64,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the header and size statistics of a buffer
    Inspect {
        /// Path to the compressed buffer
        path: PathBuf,
    },

    /// Compress a text file with one value per line
    Compress {
        /// Path to the text input
        input: PathBuf,

        /// Output buffer path
        #[arg(short, long)]
        output: PathBuf,

        /// Value type of the input
        #[arg(long, short)]
        kind: ValueKind,
    },

    /// Decompress a buffer back to one value per line
    Decompress {
        /// Path to the compressed buffer
        input: PathBuf,

        /// Output text path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the randomized round-trip benchmark grid
    Bench {
        /// Largest column length to generate
        #[arg(long, default_value_t = 100_000)]
        max_count: usize,

        /// Seed for the random column generator
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Inspect { path } => commands::inspect::run(&path, cli.format, cli.quiet),
        Commands::Compress {
            input,
            output,
            kind,
        } => commands::compress::run(&input, &output, kind, cli.format, cli.quiet),
        Commands::Decompress { input, output } => {
            commands::decompress::run(&input, output.as_deref(), cli.quiet)
        }
        Commands::Bench { max_count, seed } => {
            commands::bench::run(max_count, seed, cli.format, cli.quiet)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
