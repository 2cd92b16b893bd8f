//! Trace log configuration (fntrace.toml)
//!
//! # Example fntrace.toml
//!
//! ```toml
//! [trace]
//! output = "/tmp/q"
//! format = "json"
//! filter = "trace=!identity"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::filter::NameFilter;

/// Where and how the trace log is written
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Append records to this file (None = keep records in memory only)
    pub output: Option<PathBuf>,
    /// Record format
    pub format: OutputFormat,
    /// Filter expression, see [`NameFilter::from_expr`]
    pub filter: Option<String>,
}

/// Root of fntrace.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
struct ConfigFile {
    #[serde(default)]
    trace: TraceConfig,
}

impl TraceConfig {
    /// Load the `[trace]` table from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Load the `[trace]` table from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("Failed to parse TOML")?;
        Ok(file.trace)
    }

    /// Parsed record filter (records everything when unset)
    pub fn name_filter(&self) -> Result<NameFilter> {
        match &self.filter {
            Some(expr) => NameFilter::from_expr(expr),
            None => Ok(NameFilter::all()),
        }
    }
}
