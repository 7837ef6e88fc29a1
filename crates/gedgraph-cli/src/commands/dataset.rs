//! Dataset management commands

use clap::{Args, Subcommand};
use gedgraph_storage::{StorageBackend, StorageError};
use serde::Serialize;

use crate::output::OutputFormat;
use crate::{AppContext, Cli};

#[derive(Args)]
pub struct DatasetArgs {
    #[command(subcommand)]
    pub command: DatasetCommands,
}

#[derive(Subcommand)]
pub enum DatasetCommands {
    /// List all datasets
    List,
    /// Show dataset details and graph counts
    Show {
        /// Dataset name
        name: String,
    },
    /// Delete a dataset and its graph
    Delete {
        /// Dataset name
        name: String,

        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct DatasetSummary {
    #[serde(flatten)]
    dataset: gedgraph_storage::Dataset,
    nodes: usize,
    parent_child: usize,
    spouse: usize,
}

pub async fn run(args: &DatasetArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match &args.command {
        DatasetCommands::List => list(cli, ctx).await,
        DatasetCommands::Show { name } => show(name, cli, ctx).await,
        DatasetCommands::Delete { name, force } => delete(name, *force, cli, ctx).await,
    }
}

async fn list(cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let datasets = ctx.storage.list_datasets().await?;

    if cli.format == Some(OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&datasets)?);
        return Ok(());
    }

    if datasets.is_empty() {
        if !cli.quiet {
            println!("No datasets found");
        }
        return Ok(());
    }

    for dataset in datasets {
        let description = dataset.description.as_deref().unwrap_or("");
        println!(
            "{}\t{}\t{}",
            dataset.name,
            dataset.updated_at.format("%Y-%m-%d %H:%M"),
            description
        );
    }
    Ok(())
}

async fn show(name: &str, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let dataset = ctx
        .storage
        .get_dataset(name)
        .await?
        .ok_or_else(|| StorageError::DatasetNotFound(name.to_string()))?;
    let stats = ctx.storage.graph_stats(&dataset.id).await?;

    if cli.format == Some(OutputFormat::Json) {
        let summary = DatasetSummary {
            dataset,
            nodes: stats.nodes,
            parent_child: stats.parent_child,
            spouse: stats.spouse,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Dataset:       {}", dataset.name);
    println!("ID:            {}", dataset.id);
    if let Some(ref description) = dataset.description {
        println!("Description:   {}", description);
    }
    if let Some(ref encoding) = dataset.source_encoding {
        println!("Encoding:      {}", encoding);
    }
    println!("Created:       {}", dataset.created_at.to_rfc3339());
    println!("Updated:       {}", dataset.updated_at.to_rfc3339());
    println!("Nodes:         {}", stats.nodes);
    println!("Parent-Child:  {}", stats.parent_child);
    println!("Spouse:        {}", stats.spouse);
    Ok(())
}

async fn delete(name: &str, force: bool, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let dataset = ctx
        .storage
        .get_dataset(name)
        .await?
        .ok_or_else(|| StorageError::DatasetNotFound(name.to_string()))?;

    if !force {
        let stats = ctx.storage.graph_stats(&dataset.id).await?;
        println!(
            "Dataset '{}' holds {} nodes and {} connections.",
            name,
            stats.nodes,
            stats.connections()
        );
        println!("Use --force to confirm deletion");
        return Ok(());
    }

    ctx.storage.delete_dataset(name).await?;
    tracing::info!("Deleted dataset {} ({})", name, dataset.id);
    if !cli.quiet {
        println!("Deleted dataset '{}'", name);
    }
    Ok(())
}
