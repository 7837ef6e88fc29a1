//! Import/Export commands

use std::path::PathBuf;

use clap::Args;
use gedgraph_storage::{Dataset, StorageBackend, StorageError};

use crate::commands::parse::{ensure_clean, parse_file};
use crate::output::{render, write_output};
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct ImportArgs {
    /// GEDCOM file to import
    pub file: PathBuf,

    /// Replace the dataset's graph if it already has one
    #[arg(long)]
    pub replace: bool,

    /// Dataset description
    #[arg(long)]
    pub description: Option<String>,

    /// Fail if any line had to be skipped
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run_import(args: &ImportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let name = cli.dataset_name(&ctx.config);
    if !Dataset::validate_name(name) {
        return Err(StorageError::InvalidDatasetName(name.to_string()).into());
    }

    let outcome = parse_file(&args.file, &ctx.config.parser)?;
    ensure_clean(&outcome, args.strict)?;

    let mut dataset = match ctx.storage.get_dataset(name).await? {
        Some(existing) => {
            let stats = ctx.storage.graph_stats(&existing.id).await?;
            if stats.nodes > 0 && !args.replace {
                anyhow::bail!(
                    "Dataset '{}' already holds {} nodes. Use --replace to overwrite it.",
                    name,
                    stats.nodes
                );
            }
            existing
        }
        None => Dataset::new(name),
    };

    if let Some(ref description) = args.description {
        dataset.description = Some(description.clone());
    }
    dataset.source_encoding = Some(outcome.stats.encoding.clone());
    dataset.touch();

    ctx.storage
        .save_dataset_graph(&dataset, &outcome.graph)
        .await?;

    tracing::info!(
        "Imported {} into dataset {} ({})",
        args.file.display(),
        dataset.name,
        dataset.id
    );

    if !cli.quiet {
        println!(
            "Imported {} nodes and {} connections into dataset '{}'",
            outcome.stats.nodes, outcome.stats.connections, dataset.name
        );
        if !outcome.diagnostics.is_empty() {
            println!("Skipped {} malformed line(s)", outcome.diagnostics.len());
        }
    }
    Ok(())
}

pub async fn run_export(args: &ExportArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let name = cli.dataset_name(&ctx.config);
    let dataset = ctx
        .storage
        .get_dataset(name)
        .await?
        .ok_or_else(|| StorageError::DatasetNotFound(name.to_string()))?;

    let graph = ctx.storage.load_graph(&dataset.id).await?;
    let content = render(&graph, cli.output_format(&ctx.config))?;
    write_output(&content, args.output.as_deref())?;

    if args.output.is_some() && !cli.quiet {
        eprintln!(
            "Exported {} nodes and {} connections from dataset '{}'",
            graph.nodes.len(),
            graph.connections.len(),
            dataset.name
        );
    }
    Ok(())
}
