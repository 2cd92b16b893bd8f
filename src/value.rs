//! Runtime-typed values passed to and returned from traced functions
//!
//! Functions in a namespace take arbitrary arguments, so calls carry
//! `Value`s rather than concrete Rust types. Hashability is a property of
//! the value: scalars, strings and functions hash, tuples hash when all of
//! their elements do, lists and dicts never hash.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::function::Function;

/// A dynamically typed argument or result
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    Func(Function),
}

/// Structurally hashable mirror of a [`Value`]
///
/// Only produced by [`Value::to_key`], so an `ArgKey` always stands for a
/// hashable value. Keys are typed: `1`, `1.0` and `true` are three
/// different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKey {
    None,
    Bool(bool),
    Int(i64),
    /// IEEE bit pattern, with -0.0 folded onto 0.0
    Float(u64),
    Str(String),
    Tuple(Vec<ArgKey>),
    /// Functions hash by identity of their body
    Func(FuncKey),
}

/// A function held by an [`ArgKey`], compared and hashed by body identity
///
/// Holding the function keeps its body allocated, so the address cannot be
/// handed to another function while the key is alive.
#[derive(Debug, Clone)]
pub struct FuncKey(Function);

impl FuncKey {
    pub fn function(&self) -> &Function {
        &self.0
    }
}

impl PartialEq for FuncKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_body(&other.0)
    }
}

impl Eq for FuncKey {}

impl Hash for FuncKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.identity().hash(state);
    }
}

impl Value {
    /// Hashable key for this value, or `None` if it contains a list or dict
    pub fn to_key(&self) -> Option<ArgKey> {
        match self {
            Value::None => Some(ArgKey::None),
            Value::Bool(b) => Some(ArgKey::Bool(*b)),
            Value::Int(i) => Some(ArgKey::Int(*i)),
            Value::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                Some(ArgKey::Float(f.to_bits()))
            }
            Value::Str(s) => Some(ArgKey::Str(s.clone())),
            Value::Tuple(items) => items
                .iter()
                .map(Value::to_key)
                .collect::<Option<Vec<_>>>()
                .map(ArgKey::Tuple),
            Value::List(_) | Value::Dict(_) => None,
            Value::Func(f) => Some(ArgKey::Func(FuncKey(f.clone()))),
        }
    }

    pub fn is_hashable(&self) -> bool {
        self.to_key().is_some()
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Func(_) => "function",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Function> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Elements of a tuple or list
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Func(_))
    }

    /// Human-facing string form: like `Display`, but strings are unquoted
    pub fn display_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a.same_body(b),
            _ => false,
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_seq(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::List(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Value::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Func(func) => write!(f, "{}", func),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Tuple(items) | Value::List(items) => items.serialize(serializer),
            Value::Dict(pairs) => pairs.serialize(serializer),
            Value::Func(func) => serializer.serialize_str(&func.to_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Func(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
