//! Base namespace of higher-order functions
//!
//! The namespace is an explicit registry: each entry is registered once by
//! [`namespace`] in a fixed order, callables tagged with this module's path.
//! [`crate::namespace::TracedNamespace`] derives its traced counterpart from
//! it.

use indexmap::IndexMap;

use crate::compose;
use crate::error::{CallError, Result};
use crate::function::{Args, Function};
use crate::memoize;
use crate::value::Value;

/// Insertion-ordered mapping from name to value
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    entries: IndexMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Entry `name` if it is callable
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.get(name).and_then(Value::as_func)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Value)> for Namespace {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The base namespace
pub fn namespace() -> Namespace {
    let mut ns = Namespace::new();
    ns.insert("__name__", module_path!());
    ns.insert(
        "__doc__",
        "Higher-order helpers: composition, memoization and threading",
    );
    ns.insert("__version__", env!("CARGO_PKG_VERSION"));
    ns.insert("identity", identity());
    ns.insert("compose", compose_fn());
    ns.insert("memoize", memoize_fn());
    ns.insert("thread_first", thread_first());
    ns.insert("thread_last", thread_last());
    ns.insert("pipe", pipe());
    ns.insert("reduce", reduce());
    ns
}

/// `identity(x) == x`
pub fn identity() -> Function {
    Function::new("identity", |args: &Args| {
        args.expect_exact("identity", 1)?;
        Ok(args.positional[0].clone())
    })
    .with_doc("Identity function. Return x")
    .with_module(module_path!())
}

fn functions(name: &str, values: &[Value]) -> Result<Vec<Function>> {
    values
        .iter()
        .map(|v| match v {
            Value::Func(f) => Ok(f.clone()),
            other => Err(CallError::type_mismatch(name, "function", other.type_name())),
        })
        .collect()
}

pub(crate) fn compose_fn() -> Function {
    Function::new("compose", |args: &Args| {
        let funcs = functions("compose", &args.positional)?;
        Ok(Value::Func(compose::compose(funcs)))
    })
    .with_doc(
        "Compose functions to operate in series.\n\n\
         Functions are applied from right to left so that \
         compose(f, g, h)(x, y) is the same as f(g(h(x, y))).",
    )
    .with_module(module_path!())
}

pub(crate) fn memoize_fn() -> Function {
    Function::new("memoize", |args: &Args| {
        args.expect_exact("memoize", 1)?;
        let f = args.func("memoize", 0)?;
        Ok(Value::Func(memoize::memoize(f.clone(), None)))
    })
    .with_doc("Cache a function's result for speedy future evaluation")
    .with_module(module_path!())
}

/// Which end of a tuple form receives the threaded value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadPosition {
    First,
    Last,
}

/// One threading step: apply `form` to `val`
///
/// A callable form is called with `val`. A tuple form `(fn, a, b)` becomes
/// `fn(val, a, b)` for [`ThreadPosition::First`] and `fn(a, b, val)` for
/// [`ThreadPosition::Last`].
pub(crate) fn evalform(position: ThreadPosition) -> Function {
    let name = match position {
        ThreadPosition::First => "evalform_front",
        ThreadPosition::Last => "evalform_back",
    };
    Function::new(name, move |args: &Args| {
        args.expect_exact(name, 2)?;
        let val = args.positional[0].clone();
        match &args.positional[1] {
            Value::Func(f) => f.call1(val),
            Value::Tuple(items) => {
                let (head, rest) = match items.split_first() {
                    Some((Value::Func(f), rest)) => (f, rest),
                    Some((other, _)) => {
                        return Err(CallError::type_mismatch(name, "function", other.type_name()))
                    }
                    None => return Err(CallError::type_mismatch(name, "function", "empty tuple")),
                };
                let mut call_args = Vec::with_capacity(rest.len() + 1);
                match position {
                    ThreadPosition::First => {
                        call_args.push(val);
                        call_args.extend(rest.iter().cloned());
                    }
                    ThreadPosition::Last => {
                        call_args.extend(rest.iter().cloned());
                        call_args.push(val);
                    }
                }
                head.call_with(call_args)
            }
            other => Err(CallError::type_mismatch(
                name,
                "function or tuple",
                other.type_name(),
            )),
        }
    })
    .with_module(module_path!())
}

/// `thread_first`/`thread_last` folding their forms through `step`
pub(crate) fn threading(position: ThreadPosition, step: Function) -> Function {
    let (name, doc) = match position {
        ThreadPosition::First => (
            "thread_first",
            "Thread value through a sequence of functions/forms.\n\n\
             thread_first(x, f, (g, y, z)) expands to g(f(x), y, z)",
        ),
        ThreadPosition::Last => (
            "thread_last",
            "Thread value through a sequence of functions/forms.\n\n\
             thread_last(x, f, (g, y, z)) expands to g(y, z, f(x))",
        ),
    };
    Function::new(name, move |args: &Args| {
        args.expect_at_least(name, 1)?;
        let mut val = args.positional[0].clone();
        for form in &args.positional[1..] {
            val = step.call_with(vec![val, form.clone()])?;
        }
        Ok(val)
    })
    .with_doc(doc)
    .with_module(module_path!())
}

pub fn thread_first() -> Function {
    threading(ThreadPosition::First, evalform(ThreadPosition::First))
}

pub fn thread_last() -> Function {
    threading(ThreadPosition::Last, evalform(ThreadPosition::Last))
}

/// `pipe(data, f, g)` is `g(f(data))`
pub fn pipe() -> Function {
    Function::new("pipe", |args: &Args| {
        args.expect_at_least("pipe", 1)?;
        let funcs = functions("pipe", &args.positional[1..])?;
        let mut val = args.positional[0].clone();
        for f in &funcs {
            val = f.call1(val)?;
        }
        Ok(val)
    })
    .with_doc("Pipe a value through a sequence of functions")
    .with_module(module_path!())
}

/// `reduce(f, seq[, initial])`, a left fold
pub fn reduce() -> Function {
    Function::new("reduce", |args: &Args| {
        if !(2..=3).contains(&args.len()) {
            return Err(CallError::Arity {
                function: "reduce".to_string(),
                expected: "2 or 3".to_string(),
                found: args.len(),
            });
        }
        let f = args.func("reduce", 0)?;
        let items = args.positional[1].as_items().ok_or_else(|| {
            CallError::type_mismatch("reduce", "list or tuple", args.positional[1].type_name())
        })?;

        let mut iter = items.iter().cloned();
        let mut acc = match args.get(2) {
            Some(initial) => initial.clone(),
            None => iter.next().ok_or_else(|| {
                CallError::type_mismatch(
                    "reduce",
                    "non-empty sequence or initial value",
                    "empty sequence",
                )
            })?,
        };
        for item in iter {
            acc = f.call_with(vec![acc, item])?;
        }
        Ok(acc)
    })
    .with_doc("Apply a function of two arguments cumulatively to a sequence")
    .with_module(module_path!())
}
