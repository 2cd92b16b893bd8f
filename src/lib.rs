//! fntrace - traced, memoized and composed functions
//!
//! This library wraps functions held in a dynamic namespace: a tracer that
//! logs every call, a memoizer keyed by argument tuples, and right-to-left
//! composition with synthesized names. [`namespace::TracedNamespace`]
//! applies the tracer to every eligible function of a base namespace.

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod filter;
pub mod function;
pub mod functoolz;
pub mod memoize;
pub mod namespace;
pub mod sanitize;
pub mod traced;
pub mod tracer;
pub mod value;

pub use compose::compose;
pub use error::{CallError, Result};
pub use function::{Args, Function};
pub use memoize::{memoize, Cache};
pub use namespace::TracedNamespace;
pub use traced::trace;
pub use tracer::{TraceLog, Tracer};
pub use value::Value;
