//! Composition: application order, identity cases and synthesized names

use fntrace::compose::composed_name;
use fntrace::sanitize::{clean_name, safe_funcname};
use fntrace::{compose, Args, CallError, Function, Value};

fn inc() -> Function {
    Function::new("inc", |args: &Args| {
        let x = args
            .get(0)
            .and_then(Value::as_int)
            .ok_or_else(|| CallError::type_mismatch("inc", "int", "other"))?;
        Ok(Value::Int(x + 1))
    })
}

fn double() -> Function {
    Function::new("double", |args: &Args| {
        let x = args.get(0).and_then(Value::as_int).unwrap_or(0);
        Ok(Value::Int(2 * x))
    })
}

fn iseven() -> Function {
    Function::new("iseven", |args: &Args| {
        let x = args.get(0).and_then(Value::as_int).unwrap_or(0);
        Ok(Value::Bool(x % 2 == 0))
    })
}

fn str_fn() -> Function {
    Function::new("str", |args: &Args| {
        Ok(Value::Str(args.get(0).map(Value::display_str).unwrap_or_default()))
    })
}

fn add() -> Function {
    Function::new("add", |args: &Args| {
        Ok(Value::Int(args.positional.iter().filter_map(Value::as_int).sum()))
    })
}

#[test]
fn test_compose_str_inc() {
    assert_eq!(
        compose(vec![str_fn(), inc()]).call1(3).unwrap(),
        Value::from("4")
    );
}

#[test]
fn test_compose_chain() {
    assert_eq!(compose(vec![]).call1(0).unwrap(), Value::Int(0));
    assert_eq!(compose(vec![inc()]).call1(0).unwrap(), Value::Int(1));
    assert_eq!(compose(vec![double(), inc()]).call1(0).unwrap(), Value::Int(2));
    assert_eq!(
        compose(vec![str_fn(), iseven(), inc(), double()])
            .call1(3)
            .unwrap(),
        Value::from("false")
    );
    assert_eq!(
        compose(vec![str_fn(), add()])
            .call_with(vec![1.into(), 2.into()])
            .unwrap(),
        Value::from("3")
    );
}

#[test]
fn test_compose_keyword_arguments_reach_rightmost() {
    let f = Function::new("f", |args: &Args| {
        let a = args.get(0).and_then(Value::as_int).unwrap_or(0);
        let b = args.get(1).and_then(Value::as_int).unwrap_or(0);
        let c = args.keywords.get("c").and_then(Value::as_int).unwrap_or(10);
        Ok(Value::Int((a + b) * c))
    });
    let composed = compose(vec![str_fn(), inc(), f]);
    let args = Args::new(vec![1.into(), 2.into()]).with_keyword("c", 3);
    assert_eq!(composed.call(&args).unwrap(), Value::from("10"));
}

#[test]
fn test_single_function_identity_preserved() {
    let f = inc().with_doc("Increment").with_module("demo");
    let g = compose(vec![f.clone()]);
    assert!(g.same_body(&f));
    assert_eq!(g.name(), f.name());
    assert_eq!(g.doc(), f.doc());
    assert_eq!(g.module(), f.module());
}

#[test]
fn test_composed_name_foo_bar() {
    let foo = inc().renamed("foo");
    let bar = double().renamed("bar");
    assert_eq!(compose(vec![foo, bar]).name(), Some("composed_foo_bar"));
}

#[test]
fn test_composed_name_sanitizes_parts() {
    let odd = inc().renamed("a-b c!");
    let digits = inc().renamed("123abc");
    assert_eq!(composed_name(&[odd, digits]), "composed_abc_abc");
}

#[test]
fn test_composed_name_of_closures_uses_repr() {
    let anon = Function::anonymous(|args: &Args| Ok(args.get(0).cloned().unwrap_or_default()));
    let name = composed_name(&[inc(), anon.clone()]);
    assert_eq!(name, format!("composed_inc_{}", clean_name(&anon.repr())));
    assert!(safe_funcname(&anon).len() <= 32);
}

#[test]
fn test_nested_composition_equivalent() {
    let nested = compose(vec![str_fn(), compose(vec![double(), inc()])]);
    let flat = compose(vec![str_fn(), double(), inc()]);
    for x in [-3i64, 0, 5, 40] {
        assert_eq!(nested.call1(x).unwrap(), flat.call1(x).unwrap());
    }
    // Same failure for bad input
    assert_eq!(
        nested.call1("x").unwrap_err(),
        flat.call1("x").unwrap_err()
    );
}

#[test]
fn test_composite_of_composites_is_recomposable() {
    let inner = compose(vec![inc(), double()]);
    assert_eq!(inner.name(), Some("composed_inc_double"));
    let outer = compose(vec![inner, inc()]);
    assert_eq!(outer.name(), Some("composed_composed_inc_double_inc"));
    assert_eq!(outer.call1(1).unwrap(), Value::Int(5));
}

#[test]
fn test_sanitizer_properties() {
    assert_eq!(clean_name("a-b c!"), "abc");
    assert_eq!(clean_name("123abc"), "abc");
    assert_eq!(clean_name(&"long_name_".repeat(10)).len(), 32);
}
