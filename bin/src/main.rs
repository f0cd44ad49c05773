//! Sintra CLI binary.
//!
//! Provides the command-line interface for the momentum versus value study.

mod cmd;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sintra")]
#[command(about = "Cross-sectional momentum versus value factor study", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full study
    Run {
        #[command(flatten)]
        study: StudyArgs,
    },

    /// Show how the two sources reconcile into one universe
    Universe {
        #[command(flatten)]
        study: StudyArgs,
    },

    /// Build and summarize the factor table
    Factors {
        #[command(flatten)]
        study: StudyArgs,

        /// Print every row of the table
        #[arg(long)]
        rows: bool,
    },

    /// Inspect what the fundamentals file covers
    Fundamentals {
        #[command(flatten)]
        study: StudyArgs,
    },
}

/// Output format of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Flags shared by every command. Unset flags keep the configured value.
#[derive(Debug, Args)]
struct StudyArgs {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Daily price history CSV
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Fundamentals snapshot CSV
    #[arg(long)]
    fundamentals: Option<PathBuf>,

    /// Year momentum is measured over
    #[arg(long)]
    formation_year: Option<i32>,

    /// Year returns are explained over
    #[arg(long)]
    outcome_year: Option<i32>,

    /// Quantile buckets per factor
    #[arg(short, long)]
    buckets: Option<usize>,

    /// Bootstrap seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sintra=debug" } else { "sintra=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { study } => cmd::run::run_study(&study),
        Commands::Universe { study } => cmd::universe::show_universe(&study),
        Commands::Factors { study, rows } => cmd::factors::show_factors(&study, rows),
        Commands::Fundamentals { study } => cmd::fundamentals::show_coverage(&study),
    }
}
