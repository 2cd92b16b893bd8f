//! Record filtering for -e trace= expressions
//!
//! Selects which traced functions are written to the trace log:
//! - Individual names: -e trace=compose,memoize
//! - Negation: -e trace=!identity
//! - Regex: -e trace=/^thread_.*/
//!
//! Filtering only decides what is recorded. Calls to unrecorded functions
//! are still forwarded and return the same results.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashSet;

/// Function-name filter applied by the trace log
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    /// Names to include (None = all names)
    include: Option<HashSet<String>>,
    /// Names to exclude, checked first
    exclude: HashSet<String>,
    /// Include patterns
    patterns: Vec<Regex>,
}

impl NameFilter {
    /// Create a filter that records every function
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a filter expression like "trace=compose,!identity,/^thread_/"
    pub fn from_expr(expr: &str) -> Result<Self> {
        if let Some(trace_spec) = expr.strip_prefix("trace=") {
            Self::from_trace_spec(trace_spec)
        } else {
            bail!(
                "Invalid filter expression: {}. Expected format: trace=SPEC",
                expr
            );
        }
    }

    /// Parse a trace specification (the part after "trace=")
    fn from_trace_spec(spec: &str) -> Result<Self> {
        let mut include = HashSet::new();
        let mut exclude = HashSet::new();
        let mut patterns = Vec::new();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some(name) = part.strip_prefix('!') {
                exclude.insert(name.to_string());
            } else if part.len() >= 2 && part.starts_with('/') && part.ends_with('/') {
                let pattern = &part[1..part.len() - 1];
                let re = Regex::new(pattern)
                    .with_context(|| format!("Invalid regex pattern: {}", pattern))?;
                patterns.push(re);
            } else {
                include.insert(part.to_string());
            }
        }

        // Only negations given: everything else is recorded
        let include = if include.is_empty() && patterns.is_empty() && !exclude.is_empty() {
            None
        } else {
            Some(include)
        };

        Ok(Self {
            include,
            exclude,
            patterns,
        })
    }

    /// Check if calls to `function_name` should be recorded
    pub fn should_trace(&self, function_name: &str) -> bool {
        if self.exclude.contains(function_name) {
            return false;
        }
        match &self.include {
            None => true,
            Some(set) => {
                set.contains(function_name)
                    || self.patterns.iter().any(|re| re.is_match(function_name))
            }
        }
    }
}
