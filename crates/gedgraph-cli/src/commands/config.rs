//! `gedgraph config`: read and edit the TOML config file

use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one value
    Get {
        /// Key, e.g. `default_dataset` or `parser.max_lines`
        key: String,
    },
    /// Change one value and save
    Set {
        key: String,
        value: String,
    },
    /// Print every key with its current value
    List,
    /// Print the config file location
    Path,
    /// Write a config file holding the defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs) -> anyhow::Result<()> {
    let path = config_file_path();
    match &args.command {
        ConfigCommands::Get { key } => {
            let config = Config::load_from(&path)?;
            if !Config::keys().contains(&key.as_str()) {
                anyhow::bail!(
                    "Unknown config key: {}. Available keys: {}",
                    key,
                    Config::keys().join(", ")
                );
            }
            println!("{}", config.get(key).unwrap_or_default());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = Config::load_from(&path)?;
            config.set(key, value)?;
            config.save_to(&path)?;
            tracing::info!("Updated {} in {}", key, path.display());
            println!("{} = {}", key, value);
        }
        ConfigCommands::List => list(&path)?,
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

fn list(path: &Path) -> anyhow::Result<()> {
    let config = Config::load_from(path)?;
    let origin = if path.exists() { "" } else { " (not created)" };
    println!("# {}{}", path.display(), origin);

    let width = Config::keys().iter().map(|k| k.len()).max().unwrap_or(0);
    for key in Config::keys() {
        let value = config.get(key).unwrap_or_else(|| "-".to_string());
        println!("{:width$} = {}", key, value, width = width);
    }
    Ok(())
}
