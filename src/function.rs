//! Callable values with display metadata
//!
//! A [`Function`] pairs a shared implementation with the identity it is
//! displayed under (name, documentation, defining module). Wrappers never
//! mutate a callable in place: renaming or copying identity produces a new
//! `Function` sharing the same body.

use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{CallError, Result};
use crate::value::Value;

/// Positional and keyword arguments of one call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: IndexMap<String, Value>,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keywords: IndexMap::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Arguments for a one-argument call
    pub fn single(value: impl Into<Value>) -> Self {
        Self::new(vec![value.into()])
    }

    pub fn with_keyword(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(key.into(), value.into());
        self
    }

    /// Number of positional arguments
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Fail with `Arity` unless exactly `n` positional arguments were passed
    pub fn expect_exact(&self, function: &str, n: usize) -> Result<()> {
        if self.positional.len() == n {
            Ok(())
        } else {
            Err(CallError::Arity {
                function: function.to_string(),
                expected: n.to_string(),
                found: self.positional.len(),
            })
        }
    }

    /// Fail with `Arity` unless at least `n` positional arguments were passed
    pub fn expect_at_least(&self, function: &str, n: usize) -> Result<()> {
        if self.positional.len() >= n {
            Ok(())
        } else {
            Err(CallError::Arity {
                function: function.to_string(),
                expected: format!("at least {}", n),
                found: self.positional.len(),
            })
        }
    }

    /// Positional argument `index` as a function, or `TypeMismatch`
    pub fn func(&self, function: &str, index: usize) -> Result<&Function> {
        match self.positional.get(index) {
            Some(Value::Func(f)) => Ok(f),
            Some(other) => Err(CallError::type_mismatch(
                function,
                "function",
                other.type_name(),
            )),
            None => Err(CallError::Arity {
                function: function.to_string(),
                expected: format!("at least {}", index + 1),
                found: self.positional.len(),
            }),
        }
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.positional {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
            first = false;
        }
        for (key, value) in &self.keywords {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Signature shared by every function body
pub type Body = dyn Fn(&Args) -> Result<Value>;

/// A callable plus the identity it is displayed under
#[derive(Clone)]
pub struct Function {
    body: Rc<Body>,
    name: Option<String>,
    doc: Option<String>,
    module: Option<String>,
}

impl Function {
    /// Create a named function with no module tag
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Args) -> Result<Value> + 'static,
    {
        Self {
            body: Rc::new(body),
            name: Some(name.into()),
            doc: None,
            module: None,
        }
    }

    /// Create a function with no declared name (a closure)
    pub fn anonymous<F>(body: F) -> Self
    where
        F: Fn(&Args) -> Result<Value> + 'static,
    {
        Self {
            body: Rc::new(body),
            name: None,
            doc: None,
            module: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Same body, displayed under `name`
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut f = self.clone();
        f.name = Some(name.into());
        f
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Declared name, or the repr when the function has none
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.repr(),
        }
    }

    /// Printable representation, including the body address
    pub fn repr(&self) -> String {
        match &self.name {
            Some(name) => format!("<function {} at {:#x}>", name, self.identity()),
            None => format!("<closure at {:#x}>", self.identity()),
        }
    }

    pub fn call(&self, args: &Args) -> Result<Value> {
        (self.body)(args)
    }

    pub fn call1(&self, value: impl Into<Value>) -> Result<Value> {
        self.call(&Args::single(value))
    }

    pub fn call_with(&self, positional: Vec<Value>) -> Result<Value> {
        self.call(&Args::new(positional))
    }

    /// Copy of `self` carrying `wrapped`'s identity
    ///
    /// The name and module are taken from `wrapped` when it declares them;
    /// the documentation is always taken, even when it is absent.
    pub fn update_wrapper(&self, wrapped: &Function) -> Function {
        let mut f = self.clone();
        if let Some(name) = &wrapped.name {
            f.name = Some(name.clone());
        }
        if let Some(module) = &wrapped.module {
            f.module = Some(module.clone());
        }
        f.doc = wrapped.doc.clone();
        f
    }

    /// Copy of `self` displayed exactly as `other`, absent fields included
    pub(crate) fn assume_identity(&self, other: &Function) -> Function {
        let mut f = self.clone();
        f.name = other.name.clone();
        f.doc = other.doc.clone();
        f.module = other.module.clone();
        f
    }

    /// True when both functions run the same implementation
    pub fn same_body(&self, other: &Function) -> bool {
        self.identity() == other.identity()
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.body) as *const () as usize
    }

    #[cfg(test)]
    pub(crate) fn downgrade_body(&self) -> std::rc::Weak<Body> {
        Rc::downgrade(&self.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<function {}>", name),
            None => write!(f, "<closure>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inc() -> Function {
        Function::new("inc", |args: &Args| {
            args.expect_exact("inc", 1)?;
            let x = args.positional[0]
                .as_int()
                .ok_or_else(|| CallError::type_mismatch("inc", "int", args.positional[0].type_name()))?;
            Ok(Value::Int(x + 1))
        })
        .with_doc("Add one")
    }

    #[test]
    fn test_call_forwards_to_body() {
        assert_eq!(inc().call1(1).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_call_reports_arity() {
        let err = inc().call_with(vec![1.into(), 2.into()]).unwrap_err();
        assert!(matches!(err, CallError::Arity { found: 2, .. }));
    }

    #[test]
    fn test_renamed_shares_body() {
        let f = inc();
        let g = f.renamed("plus_one");
        assert_eq!(g.name(), Some("plus_one"));
        assert_eq!(f.name(), Some("inc"));
        assert!(f.same_body(&g));
    }

    #[test]
    fn test_update_wrapper_copies_identity() {
        let public = inc().with_module("demo");
        let helper = Function::new("helper", |_: &Args| Ok(Value::None));
        let wrapped = helper.update_wrapper(&public);
        assert_eq!(wrapped.name(), Some("inc"));
        assert_eq!(wrapped.doc(), Some("Add one"));
        assert_eq!(wrapped.module(), Some("demo"));
        assert!(wrapped.same_body(&helper));
    }

    #[test]
    fn test_update_wrapper_keeps_own_name_when_wrapped_is_anonymous() {
        let anon = Function::anonymous(|_: &Args| Ok(Value::None));
        let named = inc().update_wrapper(&anon);
        assert_eq!(named.name(), Some("inc"));
        assert_eq!(named.doc(), None);
    }

    #[test]
    fn test_repr_and_display() {
        let anon = Function::anonymous(|_: &Args| Ok(Value::None));
        assert!(anon.repr().starts_with("<closure at 0x"));
        assert!(inc().repr().starts_with("<function inc at 0x"));
        assert_eq!(inc().to_string(), "<function inc>");
        assert_eq!(anon.display_name(), anon.repr());
    }

    #[test]
    fn test_args_display() {
        let args = Args::new(vec![1.into(), "a".into()]).with_keyword("c", 3);
        assert_eq!(args.to_string(), "1, 'a', c=3");
    }

    #[test]
    fn test_args_func_accessor() {
        let args = Args::new(vec![Value::Func(inc()), 1.into()]);
        assert!(args.func("apply", 0).is_ok());
        assert!(matches!(
            args.func("apply", 1),
            Err(CallError::TypeMismatch { .. })
        ));
        assert!(matches!(args.func("apply", 2), Err(CallError::Arity { .. })));
    }
}
