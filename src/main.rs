use anyhow::{Context, Result};
use clap::Parser;
use fntrace::cli::Cli;
use fntrace::config::TraceConfig;
use fntrace::{trace, Args, CallError, Function, TraceLog, TracedNamespace, Value};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file settings, overridden by command-line flags
fn load_config(args: &Cli) -> Result<TraceConfig> {
    let mut config = match &args.config {
        Some(path) => TraceConfig::from_file(path)?,
        None => TraceConfig::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if let Some(filter) = &args.filter {
        config.filter = Some(filter.clone());
    }
    Ok(config)
}

/// Trace log writing to the configured file, or to stderr
fn build_log(config: &TraceConfig) -> Result<TraceLog> {
    if config.output.is_some() {
        TraceLog::from_config(config)
    } else {
        Ok(TraceLog::stderr(config.format, config.name_filter()?))
    }
}

type Slot = RefCell<Option<Function>>;

fn call_slot(slot: &Weak<Slot>, n: i64) -> fntrace::Result<i64> {
    let f = slot
        .upgrade()
        .and_then(|s| {
            let bound = s.borrow().clone();
            bound
        })
        .ok_or_else(|| CallError::raised("fib", "fib is not bound"))?;
    let value = f.call1(n)?;
    value
        .as_int()
        .ok_or_else(|| CallError::type_mismatch("fib", "int", value.type_name()))
}

/// Recursive Fibonacci that recurses through whatever `slot` holds
///
/// Rebinding the slot (to a memoized version, say) changes how the
/// recursive calls are made.
fn fib(slot: &Rc<Slot>) -> Function {
    let slot = Rc::downgrade(slot);
    Function::new("fib", move |args: &Args| {
        args.expect_exact("fib", 1)?;
        let n = args.positional[0]
            .as_int()
            .ok_or_else(|| CallError::type_mismatch("fib", "int", args.positional[0].type_name()))?;
        if n < 0 {
            return Err(CallError::raised("fib", "n must be non-negative"));
        }
        if n == 0 || n == 1 {
            return Ok(Value::Int(n));
        }
        fib_sum(call_slot(&slot, n - 1)?, call_slot(&slot, n - 2)?).map(Value::Int)
    })
    .with_doc("Functional definition of Fibonacci numbers")
    .with_module("fntrace::demo")
}

/// Sum of two Fibonacci terms; fib(93) no longer fits an `i64`
fn fib_sum(a: i64, b: i64) -> fntrace::Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| CallError::raised("fib", "integer overflow"))
}

fn inc() -> Function {
    Function::new("inc", |args: &Args| {
        args.expect_exact("inc", 1)?;
        let x = args.positional[0]
            .as_int()
            .ok_or_else(|| CallError::type_mismatch("inc", "int", args.positional[0].type_name()))?;
        x.checked_add(1)
            .map(Value::Int)
            .ok_or_else(|| CallError::raised("inc", "integer overflow"))
    })
    .with_module("fntrace::demo")
}

fn str_fn() -> Function {
    Function::new("str", |args: &Args| {
        args.expect_exact("str", 1)?;
        Ok(Value::Str(args.positional[0].display_str()))
    })
    .with_module("fntrace::demo")
}

fn run(args: &Cli, log: &TraceLog) -> Result<()> {
    let ns = TracedNamespace::standard(Rc::new(log.clone()));
    let slot: Rc<Slot> = Rc::new(RefCell::new(None));

    let traced_fib = trace(log, fib(&slot), None, None);
    *slot.borrow_mut() = Some(traced_fib.clone());

    let result = traced_fib.call1(args.number)?;
    println!("fib({}) = {}", args.number, result);

    if args.memoize {
        let memo = ns.memoize(traced_fib, None)?;
        *slot.borrow_mut() = Some(memo.clone());
        for n in [args.number, args.number + 1] {
            let result = memo.call1(n)?;
            println!("memoized fib({}) = {}", n, result);
        }
    }

    if args.compose {
        let current = slot
            .borrow()
            .clone()
            .context("fib is not bound")?;
        let composed = ns.compose(vec![
            trace(log, str_fn(), None, None),
            trace(log, inc(), None, None),
            current,
        ])?;
        let result = composed.call1(args.number)?;
        println!(
            "{}({}) = {}",
            composed.display_name(),
            args.number,
            result.display_str()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    if args.number < 0 {
        anyhow::bail!("Invalid value for --number: {} (must be >= 0)", args.number);
    }

    let config = load_config(&args)?;
    let log = build_log(&config)?;

    let outcome = run(&args, &log);
    log.flush();
    outcome
}
