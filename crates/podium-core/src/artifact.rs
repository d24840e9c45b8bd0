/*
 * artifact.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rendered artifact model.
 */

//! Rendered artifact model.
//!
//! A renderer produces an [`ArtifactData`] mapping whose shape is
//! renderer-specific: the formula renderer yields image bytes plus
//! typographic metrics, the exec renderer yields captured stdout and
//! stderr. The cache wraps the data with its cache key into a
//! [`RenderedArtifact`] for the caller.
//!
//! All values serialize to JSON with an explicit type tag and byte
//! buffers as base64, so persisted entries round-trip byte-identically
//! across processes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single value inside an artifact's data mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ArtifactValue {
    /// UTF-8 text (extensions, command names)
    Text(String),
    /// An integer (dimensions, baseline offsets)
    Integer(i64),
    /// Raw bytes, base64-encoded on disk (image payloads, stdout)
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    /// A list of strings (the command line that was run)
    List(Vec<String>),
}

impl From<&str> for ArtifactValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArtifactValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArtifactValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u32> for ArtifactValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Vec<u8>> for ArtifactValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<String>> for ArtifactValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// The renderer-specific result mapping of one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactData {
    values: BTreeMap<String, ArtifactValue>,
}

impl ArtifactData {
    /// Create an empty data mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder-style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ArtifactValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArtifactValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a raw value.
    pub fn get(&self, key: &str) -> Option<&ArtifactValue> {
        self.values.get(key)
    }

    /// Get a text value.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ArtifactValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Get an integer value.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ArtifactValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get a byte value.
    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        match self.values.get(key) {
            Some(ArtifactValue::Bytes(b)) => Some(b),
            _ => None,
        }
    }

    /// Get a string-list value.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(ArtifactValue::List(l)) => Some(l),
            _ => None,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArtifactValue)> {
        self.values.iter()
    }
}

/// The caller-facing result of a cached render.
///
/// Reconstructed on every call, whether it was served from the store
/// or freshly computed. `keyhash` doubles as a stable, unique artifact
/// name (e.g. for deployed file names like `imgs/<keyhash>.png`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// The cache key identifying this artifact
    pub keyhash: String,
    /// The renderer-specific result mapping
    pub data: ArtifactData,
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(D::Error::custom)
    }
}
