//! Gedgraph CLI - Command line interface for GEDCOM person graphs

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, dataset, io, parse};
use config::Config;
use gedgraph_storage::{SqliteStorage, StorageBackend};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "gedgraph")]
#[command(author, version, about = "Turn GEDCOM family trees into person graphs")]
pub struct Cli {
    /// Dataset name (defaults to the configured default dataset)
    #[arg(short = 'D', long, global = true)]
    pub dataset: Option<String>,

    /// Data directory
    #[arg(short, long, global = true, env = "GEDGRAPH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format: json, csv, graphml
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the data directory path
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| config.data_dir.clone())
            .unwrap_or_else(config::default_data_dir)
    }

    pub fn dataset_name<'a>(&'a self, config: &'a Config) -> &'a str {
        self.dataset.as_deref().unwrap_or(&config.default_dataset)
    }

    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.format)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a GEDCOM file and print its graph
    Parse(parse::ParseArgs),
    /// Show what a GEDCOM file contains
    Inspect(parse::InspectArgs),
    /// Parse a GEDCOM file and store its graph in a dataset
    Import(io::ImportArgs),
    /// Export a stored dataset's graph
    Export(io::ExportArgs),
    /// Manage datasets
    Dataset(dataset::DatasetArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage backend
pub struct AppContext {
    pub storage: Arc<SqliteStorage>,
    pub config: Config,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let data_dir = cli.data_dir(&config);
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("gedgraph.sqlite");
        tracing::debug!("Using database at: {:?}", db_path);

        let storage = SqliteStorage::open(&db_path)?;
        storage.initialize().await?;

        Ok(Self {
            storage: Arc::new(storage),
            config,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout carries graph output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting gedgraph CLI");

    match &cli.command {
        Commands::Config(args) => return commands::config::run(args),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let config = Config::load()?;

    match &cli.command {
        Commands::Parse(args) => parse::run_parse(args, &cli, &config)?,
        Commands::Inspect(args) => parse::run_inspect(args, &cli, &config)?,
        Commands::Import(args) => {
            let ctx = AppContext::new(&cli, config).await?;
            io::run_import(args, &cli, &ctx).await?
        }
        Commands::Export(args) => {
            let ctx = AppContext::new(&cli, config).await?;
            io::run_export(args, &cli, &ctx).await?
        }
        Commands::Dataset(args) => {
            let ctx = AppContext::new(&cli, config).await?;
            dataset::run(args, &cli, &ctx).await?
        }
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
