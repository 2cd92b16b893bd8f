//! Identifier-safe names for synthesized functions
//!
//! Composite functions are named after their parts, so every part needs a
//! short name that is valid inside an identifier. Functions without a
//! declared name fall back to their repr.

use regex::Regex;
use std::sync::OnceLock;

use crate::function::Function;

/// Longest name fragment produced for one function
pub const MAX_NAME_LEN: usize = 32;

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[^0-9a-zA-Z_]").expect("static regex"))
}

fn invalid_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[^a-zA-Z_]+").expect("static regex"))
}

/// Strip `s` down to an identifier fragment of at most 32 characters
///
/// Drops everything but ASCII letters, digits and underscores, then any
/// leading run that is not a letter or underscore.
pub fn clean_name(s: &str) -> String {
    let s = invalid_chars().replace_all(s, "");
    let s = invalid_prefix().replace(&s, "");
    s.chars().take(MAX_NAME_LEN).collect()
}

/// Best-effort identifier fragment for `f`; never fails
pub fn safe_funcname(f: &Function) -> String {
    match f.name() {
        Some(name) => clean_name(name),
        None => clean_name(&f.repr()),
    }
}
