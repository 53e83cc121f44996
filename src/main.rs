use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use triangulation::api::{
    build_overlay, CsvFormatter, EstimateFormatter, EstimateReport, HistoryFormatter, JsonFormatter,
    OutputFormat, TextFormatter,
};
use triangulation::{ConfigurationManager, Observation};

/// Radio direction-finding fix from bearing observations.
#[derive(Parser, Debug)]
#[command(name = "bearing-fix", author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log solver decisions
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the emitter position
    Estimate {
        /// Observation file (JSON)
        file: PathBuf,
        /// text, json or csv
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
        /// List the observations under the text output
        #[arg(long, default_value_t = false)]
        list: bool,
    },
    /// Print map overlay geometry as JSON
    Overlay {
        file: PathBuf,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the plain-text observation history
    History { file: PathBuf },
    /// Write the default configuration to a file
    InitConfig { file: PathBuf },
}

/// Observation files are either a bare array or wrapped in an object
#[derive(Deserialize)]
#[serde(untagged)]
enum ObservationFile {
    Bare(Vec<Observation>),
    Wrapped { observations: Vec<Observation> },
}

fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read observations from '{}'", path.display()))?;
    let file: ObservationFile = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse observations in '{}'", path.display()))?;
    let observations = match file {
        ObservationFile::Bare(observations) => observations,
        ObservationFile::Wrapped { observations } => observations,
    };
    debug!(count = observations.len(), path = %path.display(), "loaded observations");
    Ok(observations)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigurationManager::from_file(path)
            .with_context(|| format!("failed to load configuration '{}'", path.display()))?,
        None => ConfigurationManager::new(),
    };
    let config = manager.system_config().clone();
    init_logging(cli.verbose || config.debug_logging);

    match cli.command {
        Command::Estimate { file, format, list } => {
            let observations = load_observations(&file)?;
            let report = EstimateReport::from_observations(&observations, &config.engine);
            let report = EstimateFormatter::new().format(&report);

            match format {
                OutputFormat::Text => {
                    print!("{}", TextFormatter::new().format_text(&report));
                    if list {
                        print!("{}", TextFormatter::new().format_observations(&observations));
                    }
                }
                OutputFormat::Json => println!("{}", JsonFormatter::pretty().format_json(&report)?),
                OutputFormat::Csv => print!("{}", CsvFormatter::new().format_csv(&report)),
            }
        }
        Command::Overlay { file, pretty } => {
            let observations = load_observations(&file)?;
            let overlay = build_overlay(&observations, &config).context("failed to build overlay")?;
            println!("{}", JsonFormatter { pretty }.format_json(&overlay)?);
        }
        Command::History { file } => {
            let observations = load_observations(&file)?;
            println!("{}", HistoryFormatter::new().format_history(&observations));
        }
        Command::InitConfig { file } => {
            let mut manager = ConfigurationManager::new();
            manager
                .save_to_file(&file)
                .with_context(|| format!("failed to write configuration '{}'", file.display()))?;
            println!("Wrote default configuration to {}", file.display());
        }
    }

    Ok(())
}
