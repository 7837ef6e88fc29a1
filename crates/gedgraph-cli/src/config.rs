//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use gedgraph_core::{ParserConfig, TextEncoding};
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "GEDGRAPH_CONFIG";

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gedgraph")
}

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gedgraph")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_dataset")]
    pub default_dataset: String,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub parser: ParserConfig,
}

fn default_dataset() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_dataset: default_dataset(),
            format: OutputFormat::default(),
            parser: ParserConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location; a missing file yields defaults
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Settable keys
    pub fn keys() -> &'static [&'static str] {
        &[
            "data_dir",
            "default_dataset",
            "format",
            "parser.detect_encoding",
            "parser.fallback_encodings",
            "parser.max_input_bytes",
            "parser.max_lines",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => self.data_dir.as_ref().map(|p| p.display().to_string()),
            "default_dataset" => Some(self.default_dataset.clone()),
            "format" => Some(self.format.as_str().to_string()),
            "parser.detect_encoding" => Some(self.parser.detect_encoding.to_string()),
            "parser.fallback_encodings" => Some(self.parser.fallback_encodings.join(",")),
            "parser.max_input_bytes" => Some(self.parser.max_input_bytes.to_string()),
            "parser.max_lines" => Some(self.parser.max_lines.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "default_dataset" => self.default_dataset = value.to_string(),
            "format" => {
                self.format = OutputFormat::from_str(value, true)
                    .map_err(|_| anyhow::anyhow!("Unknown format: {}", value))?
            }
            "parser.detect_encoding" => {
                self.parser.detect_encoding = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got {}", value))?
            }
            "parser.fallback_encodings" => {
                let labels: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if let Some(bad) = labels.iter().find(|l| TextEncoding::from_label(l).is_none()) {
                    anyhow::bail!("Unknown encoding label: {}", bad);
                }
                self.parser.fallback_encodings = labels;
            }
            "parser.max_input_bytes" => {
                self.parser.max_input_bytes = value
                    .parse()
                    .with_context(|| format!("Expected a byte count, got {}", value))?
            }
            "parser.max_lines" => {
                self.parser.max_lines = value
                    .parse()
                    .with_context(|| format!("Expected a line count, got {}", value))?
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}
