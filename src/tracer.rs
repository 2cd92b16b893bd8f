//! Call-logging tracer
//!
//! A [`Tracer`] turns a function into one that logs every invocation. The
//! bundled [`TraceLog`] either keeps one [`TraceRecord`] per completed call
//! in memory or streams the log to a file or stream:
//!
//! ```text
//! fib(2)
//!   fib(1)
//!   -> 1
//!   fib(0)
//!   -> 0
//! -> 1
//! ```
//!
//! Records are rendered under the name the function carried when it was
//! traced, which is why [`crate::traced::trace`] fixes up a function's
//! identity before handing it over.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;

use crate::cli::OutputFormat;
use crate::config::TraceConfig;
use crate::filter::NameFilter;
use crate::function::{Args, Function};
use crate::value::Value;

/// Anything that can wrap a function with call logging
pub trait Tracer {
    /// Wrap `f`; the result forwards every call and logs its arguments and
    /// outcome, re-raising errors after logging them.
    fn trace(&self, f: Function) -> Function;
}

impl<T: Tracer + ?Sized> Tracer for Rc<T> {
    fn trace(&self, f: Function) -> Function {
        (**self).trace(f)
    }
}

/// How a traced call ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Returned(Value),
    Raised(String),
}

/// One logged call
#[derive(Debug, Clone, Serialize)]
pub struct TraceRecord {
    /// Nesting level of the call among recorded calls
    pub depth: usize,
    pub function: String,
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub kwargs: IndexMap<String, Value>,
    pub outcome: Outcome,
    pub duration_us: u64,
}

impl TraceRecord {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Raised(_))
    }
}

struct LogState {
    records: RefCell<Vec<TraceRecord>>,
    retain: Cell<bool>,
    depth: Cell<usize>,
    format: OutputFormat,
    filter: NameFilter,
    writer: RefCell<Option<Box<dyn Write>>>,
}

/// In-process trace log sink
///
/// Cloning yields another handle to the same log.
#[derive(Clone)]
pub struct TraceLog {
    state: Rc<LogState>,
}

impl TraceLog {
    fn build(format: OutputFormat, filter: NameFilter, writer: Option<Box<dyn Write>>) -> Self {
        Self {
            state: Rc::new(LogState {
                records: RefCell::new(Vec::new()),
                retain: Cell::new(writer.is_none()),
                depth: Cell::new(0),
                format,
                filter,
                writer: RefCell::new(writer),
            }),
        }
    }

    /// Log kept in memory only, recording every function
    pub fn in_memory() -> Self {
        Self::build(OutputFormat::Text, NameFilter::all(), None)
    }

    /// Log that streams to `writer` without keeping records
    pub fn with_writer(
        writer: impl Write + 'static,
        format: OutputFormat,
        filter: NameFilter,
    ) -> Self {
        Self::build(format, filter, Some(Box::new(writer)))
    }

    /// Log that streams to stderr without keeping records
    pub fn stderr(format: OutputFormat, filter: NameFilter) -> Self {
        Self::with_writer(io::stderr(), format, filter)
    }

    /// Log configured from a [`TraceConfig`]; an output file is appended to
    ///
    /// Without an output file the log is kept in memory.
    pub fn from_config(config: &TraceConfig) -> Result<Self> {
        let filter = config.name_filter()?;
        let writer: Option<Box<dyn Write>> = match &config.output {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open trace log {}", path.display()))?;
                Some(Box::new(file))
            }
            None => None,
        };
        Ok(Self::build(config.format, filter, writer))
    }

    /// Keep records in memory even when streaming to a writer
    pub fn retaining(self) -> Self {
        self.state.retain.set(true);
        self
    }

    /// Snapshot of all retained records, in completion order
    pub fn records(&self) -> Vec<TraceRecord> {
        self.state.records.borrow().clone()
    }

    /// Names of the recorded functions, in completion order
    pub fn function_names(&self) -> Vec<String> {
        self.state
            .records
            .borrow()
            .iter()
            .map(|r| r.function.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.records.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.state.records.borrow_mut().clear();
    }

    pub fn flush(&self) {
        if let Some(writer) = self.state.writer.borrow_mut().as_mut() {
            if let Err(e) = writer.flush() {
                tracing::warn!("Failed to flush trace log: {}", e);
            }
        }
    }

    fn write_line(&self, line: &str) {
        if let Some(writer) = self.state.writer.borrow_mut().as_mut() {
            if let Err(e) = writeln!(writer, "{}", line) {
                tracing::warn!("Failed to write trace log: {}", e);
            }
        }
    }

    fn enter(&self, name: &str, args: &Args) -> usize {
        let depth = self.state.depth.get();
        self.state.depth.set(depth + 1);
        if self.state.format == OutputFormat::Text {
            self.write_line(&format!("{}{}({})", indent(depth), name, args));
        }
        depth
    }

    fn leave(&self, record: TraceRecord) {
        self.state.depth.set(record.depth);
        match self.state.format {
            OutputFormat::Text => {
                let line = match &record.outcome {
                    Outcome::Returned(value) => format!("{}-> {}", indent(record.depth), value),
                    Outcome::Raised(err) => format!("{}!! {}", indent(record.depth), err),
                };
                self.write_line(&line);
            }
            OutputFormat::Json => match serde_json::to_string(&record) {
                Ok(line) => self.write_line(&line),
                Err(e) => tracing::warn!("Failed to serialize trace record: {}", e),
            },
        }
        tracing::trace!(function = %record.function, depth = record.depth, "call recorded");
        if self.state.retain.get() {
            self.state.records.borrow_mut().push(record);
        }
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

impl Tracer for TraceLog {
    fn trace(&self, f: Function) -> Function {
        let log = self.clone();
        let name = f.display_name();
        let inner = f.clone();
        tracing::debug!(function = %name, "tracing function");
        Function::anonymous(move |args: &Args| {
            if !log.state.filter.should_trace(&name) {
                return inner.call(args);
            }

            let depth = log.enter(&name, args);
            let start = Instant::now();
            let result = inner.call(args);
            let duration_us = start.elapsed().as_micros() as u64;

            let outcome = match &result {
                Ok(value) => Outcome::Returned(value.clone()),
                Err(e) => Outcome::Raised(e.to_string()),
            };
            log.leave(TraceRecord {
                depth,
                function: name.clone(),
                args: args.positional.clone(),
                kwargs: args.keywords.clone(),
                outcome,
                duration_us,
            });
            result
        })
        .assume_identity(&f)
    }
}
