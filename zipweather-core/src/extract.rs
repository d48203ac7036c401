//! Typed access into loosely shaped upstream JSON.
//!
//! Every helper returns `Ok(None)` when the key is simply not there, so the
//! caller can pick a default, and `Err(MalformedResponse)` when the key is
//! there with a shape we cannot use.

use serde_json::{Map, Value};

use crate::error::{LookupError, Result};

pub(crate) fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| LookupError::malformed(path, "an object"))
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() { key.to_string() } else { format!("{parent}.{key}") }
}

pub(crate) fn object<'a>(
    parent: &'a Map<String, Value>,
    parent_path: &str,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match parent.get(key) {
        None => Ok(None),
        Some(v) => as_object(v, &child_path(parent_path, key)).map(Some),
    }
}

pub(crate) fn array<'a>(
    parent: &'a Map<String, Value>,
    parent_path: &str,
    key: &str,
) -> Result<Option<&'a Vec<Value>>> {
    match parent.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_array()
            .map(Some)
            .ok_or_else(|| LookupError::malformed(child_path(parent_path, key), "an array")),
    }
}

pub(crate) fn string(
    parent: &Map<String, Value>,
    parent_path: &str,
    key: &str,
) -> Result<Option<String>> {
    match parent.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(LookupError::malformed(child_path(parent_path, key), "a string")),
    }
}

pub(crate) fn number(parent: &Map<String, Value>, parent_path: &str, key: &str) -> Result<Option<f64>> {
    match parent.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| LookupError::malformed(child_path(parent_path, key), "a number")),
    }
}

/// Like [`number`], but an explicit `null` counts as missing.
pub(crate) fn nullable_number(
    parent: &Map<String, Value>,
    parent_path: &str,
    key: &str,
) -> Result<Option<f64>> {
    match parent.get(key) {
        Some(Value::Null) => Ok(None),
        _ => number(parent, parent_path, key),
    }
}
