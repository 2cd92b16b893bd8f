//! Right-to-left function composition
//!
//! `compose(f, g, h)(x, y)` is `f(g(h(x, y)))`. Only the rightmost function
//! sees the original arguments; every other function receives the previous
//! result as its sole argument.

use crate::function::{Args, Function};
use crate::functoolz;
use crate::sanitize::safe_funcname;

/// Name of the composite of `funcs`, e.g. `composed_foo_bar`
pub fn composed_name(funcs: &[Function]) -> String {
    let parts: Vec<String> = funcs.iter().map(safe_funcname).collect();
    format!("composed_{}", parts.join("_"))
}

/// Shared construction for the plain and traced `compose`
///
/// `identity` is returned for an empty chain, a single function is returned
/// as is, and only a synthesized composite goes through `finish`.
pub(crate) fn compose_with(
    mut funcs: Vec<Function>,
    identity: Function,
    finish: impl FnOnce(Function) -> Function,
) -> Function {
    match funcs.len() {
        0 => identity,
        1 => funcs.remove(0),
        _ => {
            let name = composed_name(&funcs);
            let fns: Vec<Function> = funcs.into_iter().rev().collect();
            let composed = Function::new(name, move |args: &Args| {
                let mut ret = fns[0].call(args)?;
                for f in &fns[1..] {
                    ret = f.call1(ret)?;
                }
                Ok(ret)
            })
            .with_module(module_path!());
            finish(composed)
        }
    }
}

/// Compose functions to operate in series, applied right to left
///
/// With no functions the result is `identity`; with one function the
/// result is that function, unchanged.
pub fn compose(funcs: Vec<Function>) -> Function {
    compose_with(funcs, functoolz::identity(), |composed| composed)
}
