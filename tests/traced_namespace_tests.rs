//! Bulk wrapping: eligibility, identity preservation and traced building blocks

use fntrace::functoolz::{self, Namespace};
use fntrace::tracer::Outcome;
use fntrace::{trace, Args, Cache, CallError, Function, TraceLog, TracedNamespace, Value};
use std::rc::Rc;

fn tagged(name: &str) -> Function {
    Function::new(name, |args: &Args| {
        Ok(Value::Int(args.get(0).and_then(Value::as_int).unwrap_or(0) + 1))
    })
    .with_doc("tagged helper")
    .with_module("tests::helpers")
}

fn custom_base() -> Namespace {
    let mut ns = Namespace::new();
    ns.insert("inc", tagged("inc"));
    ns.insert("__inc__", tagged("__inc__"));
    ns.insert("answer", 42);
    ns.insert(
        "loose",
        Function::new("loose", |_: &Args| Ok(Value::None)),
    );
    ns
}

fn traced(base: &Namespace) -> (TraceLog, TracedNamespace) {
    let log = TraceLog::in_memory();
    let ns = TracedNamespace::new(base, Rc::new(log.clone()));
    (log, ns)
}

#[test]
fn test_eligible_entry_is_traced() {
    let base = custom_base();
    let (log, ns) = traced(&base);
    assert_eq!(ns.call("inc", &Args::single(1)).unwrap(), Value::Int(2));
    assert_eq!(log.function_names(), vec!["inc"]);

    let f = ns.function("inc").unwrap();
    assert!(!f.same_body(base.function("inc").unwrap()));
    assert_eq!(f.name(), Some("inc"));
    assert_eq!(f.doc(), Some("tagged helper"));
    assert_eq!(f.module(), Some("tests::helpers"));
}

#[test]
fn test_dunder_entry_passes_through() {
    let base = custom_base();
    let (log, ns) = traced(&base);
    let f = ns.function("__inc__").unwrap();
    assert!(f.same_body(base.function("__inc__").unwrap()));
    f.call1(1).unwrap();
    assert!(log.is_empty());
}

#[test]
fn test_constant_passes_through() {
    let (_, ns) = traced(&custom_base());
    assert_eq!(ns.get("answer"), Some(&Value::Int(42)));
}

#[test]
fn test_callable_without_module_passes_through() {
    let base = custom_base();
    let (log, ns) = traced(&base);
    let f = ns.function("loose").unwrap();
    assert!(f.same_body(base.function("loose").unwrap()));
    f.call_with(vec![]).unwrap();
    assert!(log.is_empty());
}

#[test]
fn test_memoize_and_compose_always_present() {
    let (_, ns) = traced(&custom_base());
    assert_eq!(ns.function("memoize").unwrap().name(), Some("memoize"));
    assert_eq!(ns.function("compose").unwrap().name(), Some("compose"));
    assert_eq!(
        ns.function("compose").unwrap().module(),
        Some("fntrace::functoolz")
    );
}

#[test]
fn test_compose_from_traced_members() {
    let (log, ns) = traced(&custom_base());
    let inc = ns.function("inc").unwrap().clone();
    let composed = ns.compose(vec![inc.clone(), inc]).unwrap();
    assert_eq!(composed.name(), Some("composed_inc_inc"));
    assert_eq!(composed.call1(0).unwrap(), Value::Int(2));
    assert_eq!(
        log.function_names(),
        vec!["compose", "inc", "inc", "composed_inc_inc"]
    );
    let depths: Vec<usize> = log.records().iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 0]);
}

#[test]
fn test_compose_through_namespace_value_call() {
    let (_, ns) = traced(&functoolz::namespace());
    let args = Args::new(vec![tagged("a").into(), tagged("b").into()]);
    let composed = ns.call("compose", &args).unwrap();
    assert_eq!(composed.as_func().unwrap().name(), Some("composed_a_b"));
}

#[test]
fn test_compose_rejects_non_function() {
    let (log, ns) = traced(&functoolz::namespace());
    let err = ns
        .call("compose", &Args::new(vec![tagged("a").into(), 5.into()]))
        .unwrap_err();
    assert!(matches!(err, CallError::TypeMismatch { .. }));
    assert!(log.records()[0].is_error());
}

#[test]
fn test_memoized_traced_function_logs_hits_and_misses() {
    let (log, ns) = traced(&functoolz::namespace());
    let f = trace(&log, tagged("square"), None, None);
    let memo = ns.memoize(f, None).unwrap();
    assert_eq!(memo.name(), Some("square"));
    assert_eq!(memo.doc(), Some("tagged helper"));

    memo.call1(3).unwrap();
    memo.call1(3).unwrap();
    // memoize call, then miss (memo layer wraps the traced square), then hit
    assert_eq!(
        log.function_names(),
        vec!["memoize", "square", "square", "square"]
    );
}

#[test]
fn test_memoize_unhashable_is_logged_and_raised() {
    let (log, ns) = traced(&functoolz::namespace());
    let memo = ns.memoize(tagged("square"), Some(Cache::new())).unwrap();
    let err = memo.call1(Value::List(vec![])).unwrap_err();
    assert!(matches!(err, CallError::ArgumentsNotHashable { .. }));
    let last = log.records().pop().unwrap();
    assert_eq!(last.function, "square");
    assert!(matches!(last.outcome, Outcome::Raised(_)));
}

#[test]
fn test_thread_last_traced() {
    let (log, ns) = traced(&functoolz::namespace());
    let sub = Function::new("sub", |args: &Args| {
        let a = args.get(0).and_then(Value::as_int).unwrap_or(0);
        let b = args.get(1).and_then(Value::as_int).unwrap_or(0);
        Ok(Value::Int(a - b))
    });
    let form = Value::Tuple(vec![sub.into(), 10.into()]);
    let result = ns
        .call("thread_last", &Args::new(vec![1.into(), form]))
        .unwrap();
    assert_eq!(result, Value::Int(9));
    assert_eq!(log.function_names(), vec!["evalform_back", "thread_last"]);
}

#[test]
fn test_pipe_and_reduce_traced() {
    let (log, ns) = traced(&functoolz::namespace());
    let add = Function::new("add", |args: &Args| {
        Ok(Value::Int(args.positional.iter().filter_map(Value::as_int).sum()))
    });
    let seq = Value::List(vec![1.into(), 2.into(), 3.into()]);
    assert_eq!(
        ns.call("reduce", &Args::new(vec![add.into(), seq])).unwrap(),
        Value::Int(6)
    );
    assert_eq!(
        ns.call("pipe", &Args::new(vec![1.into(), tagged("inc").into()]))
            .unwrap(),
        Value::Int(2)
    );
    assert_eq!(log.function_names(), vec!["reduce", "pipe"]);
}
