//! CLI command implementations

pub mod completions;
pub mod config;
pub mod dataset;
pub mod io;
pub mod parse;
