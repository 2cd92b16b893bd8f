//! CLI argument parsing for fntrace

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Output format for the trace log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented call/return lines (default)
    #[default]
    Text,
    /// One JSON record per call
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "fntrace")]
#[command(version)]
#[command(about = "Trace, memoize and compose functions: Fibonacci walkthrough", long_about = None)]
pub struct Cli {
    /// Fibonacci number to compute
    #[arg(short = 'n', long = "number", default_value = "5")]
    pub number: i64,

    /// Memoize the traced Fibonacci function before calling it
    #[arg(long = "memoize")]
    pub memoize: bool,

    /// Also print fib composed with the traced `str` and `inc`
    #[arg(long = "compose")]
    pub compose: bool,

    /// Trace log format
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the trace log to FILE (default: stderr)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Filter recorded functions (e.g., -e trace=fib or -e trace=!identity)
    #[arg(short = 'e', long = "expr", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Load settings from a fntrace.toml file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
