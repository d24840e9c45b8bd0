/*
 * hash.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Content digest primitive.
 */

//! Content digest primitive.
//!
//! Everything content-addressable in Podium (cache keys, file
//! fingerprints) is identified by a lowercase hex SHA-256 digest. The
//! two entry points here are the only digest implementations in the
//! workspace; renderers and the cache never hash bytes themselves.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Digest a byte slice to a lowercase hex SHA-256 string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Digest a file's contents to a lowercase hex SHA-256 string.
///
/// The file is streamed in chunks so large assets (images, binaries)
/// do not need to fit in memory.
pub fn hash_file(path: impl AsRef<Path>) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
