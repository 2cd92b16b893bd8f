//! Traced namespace: every eligible function of a base namespace, traced
//!
//! Built once from a [`Namespace`]: entries passing [`traceable`] are
//! replaced by their traced version, everything else is copied as is.
//! `memoize`, `compose`, `thread_first` and `thread_last` are then replaced
//! by versions whose own building blocks are traced too:
//! - `memoize(f)` returns a memoized `f` that is logged under `f`'s name
//! - `compose(...)` returns a composite logged under its synthesized name,
//!   or the namespace's traced `identity` for an empty chain
//! - `thread_first`/`thread_last` log every threading step

use std::rc::Rc;

use crate::compose;
use crate::error::{CallError, Result};
use crate::function::{Args, Function};
use crate::functoolz::{self, Namespace, ThreadPosition};
use crate::memoize::{self, Cache};
use crate::traced::{trace, trace_as, trace_with_name, traceable};
use crate::tracer::Tracer;
use crate::value::Value;

/// A namespace whose functions log every call
pub struct TracedNamespace {
    tracer: Rc<dyn Tracer>,
    entries: Namespace,
}

impl TracedNamespace {
    /// Derive the traced namespace from `base`
    pub fn new(base: &Namespace, tracer: Rc<dyn Tracer>) -> Self {
        let mut wrapped = 0usize;
        let mut entries: Namespace = base
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::Func(f) if traceable(name, value) => {
                        wrapped += 1;
                        Value::Func(trace(&*tracer, f.clone(), None, None))
                    }
                    other => other.clone(),
                };
                (name.to_string(), value)
            })
            .collect();
        tracing::debug!(
            entries = entries.len(),
            wrapped,
            "traced namespace: bulk pass done"
        );

        let identity = entries
            .function("identity")
            .cloned()
            .unwrap_or_else(|| trace(&*tracer, functoolz::identity(), None, None));

        entries.insert("thread_first", traced_threading(&tracer, ThreadPosition::First));
        entries.insert("thread_last", traced_threading(&tracer, ThreadPosition::Last));
        entries.insert("memoize", traced_memoize_fn(&tracer));
        entries.insert("compose", traced_compose_fn(&tracer, identity));

        Self { tracer, entries }
    }

    /// Traced version of the standard [`functoolz::namespace`]
    pub fn standard(tracer: Rc<dyn Tracer>) -> Self {
        Self::new(&functoolz::namespace(), tracer)
    }

    pub fn tracer(&self) -> &Rc<dyn Tracer> {
        &self.tracer
    }

    pub fn namespace(&self) -> &Namespace {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.entries.function(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.names()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call the entry `name`
    pub fn call(&self, name: &str, args: &Args) -> Result<Value> {
        let f = self.function(name).ok_or_else(|| CallError::NotCallable {
            name: name.to_string(),
        })?;
        f.call(args)
    }

    /// Logged `memoize(f)`, optionally sharing `cache`
    pub fn memoize(&self, f: Function, cache: Option<Cache>) -> Result<Function> {
        let entry = match cache {
            None => self
                .function("memoize")
                .cloned()
                .ok_or_else(|| CallError::NotCallable {
                    name: "memoize".to_string(),
                })?,
            Some(cache) => {
                let tracer = self.tracer.clone();
                let body = Function::new("memoize", move |args: &Args| {
                    args.expect_exact("memoize", 1)?;
                    let f = args.func("memoize", 0)?;
                    Ok(Value::Func(traced_memoize(&tracer, f.clone(), Some(cache.clone()))))
                });
                trace_as(&*self.tracer, &functoolz::memoize_fn(), body)
            }
        };
        expect_function("memoize", entry.call1(f)?)
    }

    /// Logged `compose(*funcs)`
    pub fn compose(&self, funcs: Vec<Function>) -> Result<Function> {
        let args = Args::new(funcs.into_iter().map(Value::Func).collect());
        expect_function("compose", self.call("compose", &args)?)
    }
}

fn expect_function(name: &str, value: Value) -> Result<Function> {
    match value {
        Value::Func(f) => Ok(f),
        other => Err(CallError::type_mismatch(name, "function", other.type_name())),
    }
}

/// Memoized `f` whose calls are logged under `f`'s identity
fn traced_memoize(tracer: &Rc<dyn Tracer>, f: Function, cache: Option<Cache>) -> Function {
    let memof = memoize::memoized_body(f.clone(), cache);
    trace_as(&**tracer, &f, memof).assume_identity(&f)
}

fn traced_memoize_fn(tracer: &Rc<dyn Tracer>) -> Function {
    let inner = tracer.clone();
    let body = Function::new("memoize", move |args: &Args| {
        args.expect_exact("memoize", 1)?;
        let f = args.func("memoize", 0)?;
        Ok(Value::Func(traced_memoize(&inner, f.clone(), None)))
    });
    trace_as(&**tracer, &functoolz::memoize_fn(), body)
}

fn traced_compose_fn(tracer: &Rc<dyn Tracer>, identity: Function) -> Function {
    let inner = tracer.clone();
    let body = Function::new("compose", move |args: &Args| {
        let funcs = (0..args.len())
            .map(|i| args.func("compose", i).cloned())
            .collect::<Result<Vec<_>>>()?;
        let composed = compose::compose_with(funcs, identity.clone(), |composed| {
            let name = composed.display_name();
            trace_with_name(&*inner, &name, composed)
        });
        Ok(Value::Func(composed))
    });
    trace_as(&**tracer, &functoolz::compose_fn(), body)
}

fn traced_threading(tracer: &Rc<dyn Tracer>, position: ThreadPosition) -> Function {
    let step = trace(&**tracer, functoolz::evalform(position), None, None);
    trace(&**tracer, functoolz::threading(position, step), None, None)
}
