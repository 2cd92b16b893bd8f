//! Memoization of pure functions
//!
//! A memoized function keeps one cache entry per distinct argument tuple.
//! Positional arguments and keyword arguments (sorted by keyword) together
//! form the key, and every argument must be hashable. The cache is never
//! evicted; it lives as long as the wrappers holding it.

use fnv::FnvHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{CallError, Result};
use crate::function::{Args, Function};
use crate::value::{ArgKey, Value};

/// Hashable form of one call's arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    positional: Vec<ArgKey>,
    keywords: Vec<(String, ArgKey)>,
}

impl CacheKey {
    /// Key for `args`, or `None` if any argument is unhashable
    pub fn from_args(args: &Args) -> Option<Self> {
        let positional = args
            .positional
            .iter()
            .map(Value::to_key)
            .collect::<Option<Vec<_>>>()?;
        let mut keywords = args
            .keywords
            .iter()
            .map(|(k, v)| v.to_key().map(|key| (k.clone(), key)))
            .collect::<Option<Vec<_>>>()?;
        keywords.sort_by(|a, b| a.0.cmp(&b.0));
        Some(Self {
            positional,
            keywords,
        })
    }
}

/// Shared handle to a memoization cache
///
/// Clones refer to the same entries, which lets independently built
/// wrappers (say, a traced and an untraced memoized `fib`) share results.
#[derive(Clone, Default)]
pub struct Cache {
    entries: Rc<RefCell<FnvHashMap<CacheKey, Value>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// True if a result is cached for `args` (false for unhashable args)
    pub fn contains(&self, args: &Args) -> bool {
        match CacheKey::from_args(args) {
            Some(key) => self.entries.borrow().contains_key(&key),
            None => false,
        }
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn get(&self, key: &CacheKey) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn insert(&self, key: CacheKey, value: Value) {
        self.entries.borrow_mut().insert(key, value);
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").field("len", &self.len()).finish()
    }
}

/// The caching wrapper around `f`, still carrying its own helper name
pub(crate) fn memoized_body(f: Function, cache: Option<Cache>) -> Function {
    let cache = cache.unwrap_or_default();
    let name = f.display_name();
    Function::new("memof", move |args: &Args| {
        let key = CacheKey::from_args(args).ok_or_else(|| CallError::ArgumentsNotHashable {
            function: name.clone(),
        })?;

        if let Some(hit) = cache.get(&key) {
            tracing::debug!(function = %name, "memoize: cache hit");
            return Ok(hit);
        }

        // The cache is not borrowed here, so `f` may recurse through us
        let result = f.call(args)?;
        tracing::debug!(function = %name, entries = cache.len() + 1, "memoize: cache miss");
        cache.insert(key, result.clone());
        Ok(result)
    })
}

/// Cache `f`'s results for speedy future evaluation
///
/// Trades memory for speed; only use on pure functions. Pass `cache` to
/// reuse an existing cache, or `None` for a fresh one owned by the result.
/// The returned function has `f`'s name and documentation. Calling it with
/// an unhashable argument fails with [`CallError::ArgumentsNotHashable`];
/// errors from `f` itself are propagated and nothing is cached for them.
pub fn memoize(f: Function, cache: Option<Cache>) -> Function {
    memoized_body(f.clone(), cache).assume_identity(&f)
}
