/*
 * cache/store.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * On-disk artifact store.
 */

//! On-disk artifact store.
//!
//! Entries live under `<root>/<renderer>/<shard>/<keyhash>.json`,
//! sharded by the first two hex characters of the key to bound
//! directory fan-out. An entry, once published under a key, is never
//! mutated: changed inputs produce a new key, never an in-place
//! update.
//!
//! The store is shared, durable state and may be read by multiple
//! processes concurrently. Publication goes through a temp file in the
//! entry's directory followed by an atomic rename, so a reader never
//! observes a partially written entry. Two writers racing on the same
//! key are benign: both compute equivalent payloads and the loser's
//! rename is redundant.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::artifact::ArtifactData;
use crate::error::{RenderError, Result};

/// Current entry schema version.
///
/// Bumped when the on-disk entry format changes; readers treat any
/// other version as an unreadable entry, which the cache turns into a
/// recompute.
pub const ENTRY_SCHEMA: u32 = 1;

/// A persisted cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Entry format version, see [`ENTRY_SCHEMA`]
    pub schema: u32,
    /// Name of the renderer that produced the entry
    pub renderer: String,
    /// The cache key the entry is stored under
    pub keyhash: String,
    /// The renderer-specific result mapping
    pub data: ArtifactData,
}

/// Handle to an on-disk store rooted at a directory.
///
/// Cheap to clone; holds no open resources. Constructed explicitly and
/// passed to each renderer cache, so tests can use isolated ephemeral
/// roots.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store handle rooted at `root`.
    ///
    /// The directory is created lazily on first publication.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the on-disk path of an entry.
    pub fn entry_path(&self, renderer: &str, keyhash: &str) -> PathBuf {
        let shard = if keyhash.len() >= 2 { &keyhash[..2] } else { keyhash };
        self.root
            .join(renderer)
            .join(shard)
            .join(format!("{keyhash}.json"))
    }

    /// Load an entry, if present.
    ///
    /// Returns `Ok(None)` when no entry exists. An entry that exists
    /// but cannot be decoded (corruption, schema mismatch, key
    /// mismatch) is a [`RenderError::StoreRead`]; the cache treats
    /// that as a miss.
    pub fn load(&self, renderer: &str, keyhash: &str) -> Result<Option<CacheEntry>> {
        let path = self.entry_path(renderer, keyhash);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RenderError::store_read(path, e.to_string())),
        };

        let entry: CacheEntry = serde_json::from_slice(&bytes)
            .map_err(|e| RenderError::store_read(&path, e.to_string()))?;

        if entry.schema != ENTRY_SCHEMA {
            return Err(RenderError::store_read(
                path,
                format!("unsupported entry schema {}", entry.schema),
            ));
        }
        if entry.keyhash != keyhash {
            return Err(RenderError::store_read(
                path,
                format!("entry key mismatch: {}", entry.keyhash),
            ));
        }

        Ok(Some(entry))
    }

    /// Publish an entry with an atomic create-then-rename.
    ///
    /// Never writes the destination path directly.
    pub fn publish(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(&entry.renderer, &entry.keyhash);
        let dir = path.parent().unwrap_or(&self.root);

        fs::create_dir_all(dir).map_err(|e| RenderError::store_write(&path, e))?;

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| RenderError::store_write(&path, e))?;
        serde_json::to_writer(&mut tmp, entry)
            .map_err(|e| RenderError::store_write(&path, io::Error::other(e)))?;
        tmp.persist(&path)
            .map_err(|e| RenderError::store_write(&path, e.error))?;

        Ok(())
    }
}
