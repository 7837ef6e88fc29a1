//! Parse and inspect commands

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use gedgraph_core::{GedcomParser, ParseOutcome, ParserConfig};
use serde::Serialize;

use crate::config::Config;
use crate::output::{render, write_output};
use crate::Cli;

#[derive(Args)]
pub struct ParseArgs {
    /// GEDCOM file to parse
    pub file: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail if any line had to be skipped
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// GEDCOM file to inspect
    pub file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Read and parse a file with the configured parser
pub fn parse_file(path: &Path, config: &ParserConfig) -> anyhow::Result<ParseOutcome> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let parser = GedcomParser::new(config.clone());
    parser
        .parse(&bytes)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Bail out when strict mode is on and lines were skipped
pub fn ensure_clean(outcome: &ParseOutcome, strict: bool) -> anyhow::Result<()> {
    if strict && !outcome.is_clean() {
        for diagnostic in &outcome.diagnostics {
            eprintln!("{}", diagnostic);
        }
        anyhow::bail!(
            "{} malformed line(s) found in strict mode",
            outcome.diagnostics.len()
        );
    }
    Ok(())
}

pub fn run_parse(args: &ParseArgs, cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let outcome = parse_file(&args.file, &config.parser)?;
    ensure_clean(&outcome, args.strict)?;

    let content = render(&outcome.graph, cli.output_format(config))?;
    write_output(&content, args.output.as_deref())?;

    if !cli.quiet {
        let stats = &outcome.stats;
        eprintln!(
            "Parsed {} individuals and {} families into {} nodes and {} connections ({})",
            stats.individuals, stats.families, stats.nodes, stats.connections, stats.encoding
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct InspectReport<'a> {
    file: String,
    #[serde(flatten)]
    stats: &'a gedgraph_core::ParseStats,
    diagnostics: &'a [gedgraph_core::Diagnostic],
    dangling_references: Vec<String>,
}

pub fn run_inspect(args: &InspectArgs, _cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let outcome = parse_file(&args.file, &config.parser)?;
    let report = InspectReport {
        file: args.file.display().to_string(),
        stats: &outcome.stats,
        diagnostics: &outcome.diagnostics,
        dangling_references: outcome.graph.dangling_references(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let stats = report.stats;
    println!("File:          {}", report.file);
    println!("Encoding:      {}", stats.encoding);
    println!("Lines:         {}", stats.lines);
    println!("Individuals:   {}", stats.individuals);
    println!("Families:      {}", stats.families);
    println!("Nodes:         {}", stats.nodes);
    println!("Connections:   {}", stats.connections);

    if report.diagnostics.is_empty() {
        println!("Diagnostics:   none");
    } else {
        println!("Diagnostics:   {}", report.diagnostics.len());
        for diagnostic in report.diagnostics {
            println!("  {}", diagnostic);
        }
    }

    if report.dangling_references.is_empty() {
        println!("Dangling:      none");
    } else {
        println!("Dangling:      {}", report.dangling_references.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("/nonexistent/tree.ged"), &ParserConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_ensure_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.ged");
        std::fs::write(&path, "0 @I1@ INDI\nBROKEN\n").unwrap();

        let outcome = parse_file(&path, &ParserConfig::default()).unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(ensure_clean(&outcome, false).is_ok());
        assert!(ensure_clean(&outcome, true).is_err());
    }
}
