//! Whole-structure selection over the flat form.

use crate::deflatten::deflatten;
use crate::flatten::{FlatMap, flatten};
use regex::Regex;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

// Thread-local cache for compiled wildcard patterns. Compilation is expensive
// relative to a key scan; a rule like `houses[*].boxes[*]` is compiled once
// and reused across every flat key it is tested against.
thread_local! {
    static PATTERN_CACHE: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Compiled matcher for a `[*]`-wildcard path: the pattern anchors at the
/// start, each `[*]` stands for any concrete index, and a match may end at
/// the key or continue into a dot-extension. Returns `None` only if the
/// constructed pattern fails to compile.
pub(crate) fn wildcard_regex(path: &str) -> Option<Regex> {
    let source = wildcard_pattern(path);
    PATTERN_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(re) = cache.get(&source) {
            return Some(re.clone());
        }
        match Regex::new(&source) {
            Ok(re) => {
                cache.insert(source, re.clone());
                Some(re)
            }
            Err(_) => None,
        }
    })
}

/// `a.b[*].c` becomes `^a\.b\[\d+\]\.c($|\.)`.
fn wildcard_pattern(path: &str) -> String {
    let escaped = regex::escape(path).replace(r"\[\*\]", r"\[\d+\]");
    format!("^{escaped}($|\\.)")
}

/// A new value containing only the leaves addressed by `paths`.
///
/// Each path selects its exact flat key, or every key matching it as a
/// `[*]`-wildcard pattern, or (failing an exact hit) every key under it as a
/// `.`-separated namespace.
pub fn flat_pick(value: &Value, paths: &[&str]) -> Value {
    let flat = flatten(value);
    let mut kept = FlatMap::new();
    for path in paths.iter().copied() {
        if path.contains("[*]") {
            if let Some(re) = wildcard_regex(path) {
                for (key, leaf) in &flat {
                    if re.is_match(key) {
                        kept.insert(key.clone(), leaf.clone());
                    }
                }
            }
        } else if let Some(leaf) = flat.get(path) {
            kept.insert(path.to_string(), leaf.clone());
        } else {
            let prefix = format!("{path}.");
            for (key, leaf) in &flat {
                if key.starts_with(&prefix) {
                    kept.insert(key.clone(), leaf.clone());
                }
            }
        }
    }
    deflatten(&kept)
}

/// A new value with the leaves addressed by `paths` removed.
pub fn flat_omit(value: &Value, paths: &[&str]) -> Value {
    let mut flat = flatten(value);
    for path in paths.iter().copied() {
        if path.contains("[*]") {
            if let Some(re) = wildcard_regex(path) {
                flat.retain(|key, _| !re.is_match(key));
            }
        } else {
            flat.remove(path);
            let prefix = format!("{path}.");
            flat.retain(|key, _| !key.starts_with(&prefix));
        }
    }
    deflatten(&flat)
}
