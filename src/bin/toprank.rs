//! CLI binary for toprank.
//!
//! All tracing output goes to stderr so that stdout can carry the
//! aggregated JSON.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use toprank::{AppConfig, toprank_dirs};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Merge several top-domain ranking lists into one ordered list.
#[derive(Parser)]
#[command(name = "toprank", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Aggregate the configured source files (default).
    Aggregate {
        /// Write JSON here instead of the configured output.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep only the top N entries.
        #[arg(short = 'n', long)]
        max_results: Option<usize>,

        /// Write to stdout even if the config names an output file.
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// List configured sources.
    Sources,

    /// Write a starter configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "toprank=debug,toprank_core=debug"
    } else {
        "toprank=info,toprank_core=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(toprank_dirs::default_config_path);

    match cli.command.unwrap_or(Command::Aggregate {
        output: None,
        max_results: None,
        stdout: false,
    }) {
        Command::Aggregate {
            output,
            max_results,
            stdout,
        } => run_aggregate(&config_path, output, max_results, stdout),
        Command::Sources => list_sources(&config_path),
        Command::Init { force } => init_config(&config_path, force),
    }
}

fn run_aggregate(
    config_path: &std::path::Path,
    output: Option<PathBuf>,
    max_results: Option<usize>,
    stdout: bool,
) -> anyhow::Result<()> {
    let mut config = AppConfig::from_file(config_path)?;
    if max_results.is_some() {
        config.max_results = max_results;
    }
    let destination = if stdout {
        None
    } else {
        output.or_else(|| config.output.clone())
    };

    info!(config = %config_path.display(), sources = config.sources.len(), "aggregating");
    let entries = toprank::aggregate_from_config(&config)?;
    toprank::output::write_output(&entries, destination.as_deref())?;
    Ok(())
}

fn list_sources(config_path: &std::path::Path) -> anyhow::Result<()> {
    let config = AppConfig::from_file(config_path)?;
    if config.sources.is_empty() {
        println!("no sources configured in {}", config_path.display());
        return Ok(());
    }

    for source in &config.sources {
        let role = if source.primary { "primary" } else { "local" };
        println!("{}\t{}\t{}", source.name, role, source.path.display());
    }
    Ok(())
}

fn init_config(config_path: &std::path::Path, force: bool) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    AppConfig::template().save_to_file(config_path)?;
    println!("wrote {}", config_path.display());
    Ok(())
}
