//! Tracing wrapper with identity fix-up
//!
//! The tracer renders log entries under the name a function carries when
//! it is traced. [`trace`] therefore settles the function's identity first:
//! an internal helper can borrow the identity of the public function it
//! serves (`wrapped`), and a synthesized function can be given an explicit
//! `name`. The traced result then carries that same identity.

use crate::function::Function;
use crate::tracer::Tracer;
use crate::value::Value;

/// Trace `f`, optionally under `wrapped`'s identity or under `name`
///
/// `wrapped` takes precedence when both are given. The returned function
/// logs every call through `tracer` and is otherwise indistinguishable from
/// the (renamed) `f` under introspection.
pub fn trace<T: Tracer + ?Sized>(
    tracer: &T,
    f: Function,
    wrapped: Option<&Function>,
    name: Option<&str>,
) -> Function {
    let f = match (wrapped, name) {
        (Some(wrapped), _) => f.update_wrapper(wrapped),
        (None, Some(name)) => f.renamed(name),
        (None, None) => f,
    };
    tracer.trace(f.clone()).assume_identity(&f)
}

/// Trace `f` so it is logged as `wrapped`
pub fn trace_as<T: Tracer + ?Sized>(tracer: &T, wrapped: &Function, f: Function) -> Function {
    trace(tracer, f, Some(wrapped), None)
}

/// Trace `f` so it is logged as `name`
pub fn trace_with_name<T: Tracer + ?Sized>(tracer: &T, name: &str, f: Function) -> Function {
    trace(tracer, f, None, Some(name))
}

/// Whether a namespace entry is wrapped by the bulk pass
///
/// Dunder names are skipped, as are values that are not callable or carry
/// no defining module.
pub fn traceable(name: &str, value: &Value) -> bool {
    if name.contains("__") {
        return false;
    }
    matches!(value, Value::Func(f) if f.module().is_some())
}
