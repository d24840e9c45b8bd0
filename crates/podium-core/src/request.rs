/*
 * request.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render request model.
 */

//! Render request model.
//!
//! A [`RenderRequest`] is an open mapping of named parameters supplied
//! by the caller. The set of fields is renderer-specific: the formula
//! renderer expects `formula` (and optionally `short`), the image
//! renderer expects `src` and `max_dimension`, the exec renderer
//! expects `cmd`.
//!
//! Requests are distinct from cache keys: a renderer's
//! `rendering_key` picks the subset of the request that is allowed to
//! affect caching. The [`RenderRequest::key_map`] projection backs the
//! default behavior of keying on the entire request.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// A single request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestValue {
    /// A text parameter (formula source, mode names)
    Text(String),
    /// An integer parameter (dimension bounds, resolutions)
    Integer(i64),
    /// A boolean flag
    Boolean(bool),
    /// A filesystem path (source images, executables)
    Path(PathBuf),
    /// An opaque byte buffer
    Bytes(Vec<u8>),
    /// A list of strings (command lines)
    List(Vec<String>),
}

impl From<&str> for RequestValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RequestValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RequestValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for RequestValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for RequestValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<PathBuf> for RequestValue {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for RequestValue {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<Vec<u8>> for RequestValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<String>> for RequestValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for RequestValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// An open mapping of named parameters for one render call.
///
/// Built by the caller, consumed by a renderer. Field order never
/// matters; the map is key-ordered so projections are reproducible.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    values: BTreeMap<String, RequestValue>,
}

impl RenderRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder-style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RequestValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RequestValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a raw parameter value.
    pub fn get(&self, key: &str) -> Option<&RequestValue> {
        self.values.get(key)
    }

    /// Check whether a parameter is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get a text parameter.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(RequestValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Get an integer parameter.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(RequestValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get a boolean parameter.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(RequestValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Get a path parameter.
    ///
    /// A text parameter is accepted as a path as well, so callers can
    /// pass plain strings for file locations.
    pub fn path(&self, key: &str) -> Option<&Path> {
        match self.values.get(key) {
            Some(RequestValue::Path(p)) => Some(p),
            Some(RequestValue::Text(s)) => Some(Path::new(s)),
            _ => None,
        }
    }

    /// Get a byte-buffer parameter.
    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        match self.values.get(key) {
            Some(RequestValue::Bytes(b)) => Some(b),
            _ => None,
        }
    }

    /// Get a string-list parameter.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(RequestValue::List(l)) => Some(l),
            _ => None,
        }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the request has no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Project the whole request into a JSON map for key derivation.
    ///
    /// This backs the default `rendering_key` of a renderer that does
    /// not narrow its key. Paths contribute their string form and byte
    /// buffers contribute their content digest, so the projection is
    /// always a small, deterministic JSON value.
    pub fn key_map(&self) -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.values {
            let projected = match value {
                RequestValue::Text(s) => Value::String(s.clone()),
                RequestValue::Integer(n) => Value::from(*n),
                RequestValue::Boolean(b) => Value::Bool(*b),
                RequestValue::Path(p) => Value::String(p.display().to_string()),
                RequestValue::Bytes(b) => Value::String(podium_util::hash_bytes(b)),
                RequestValue::List(l) => {
                    Value::Array(l.iter().map(|s| Value::String(s.clone())).collect())
                }
            };
            map.insert(key.clone(), projected);
        }
        map
    }
}
