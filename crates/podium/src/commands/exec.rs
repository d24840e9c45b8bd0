/*
 * exec.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Exec command implementation.
 */

//! Exec command implementation.
//!
//! Runs a command through the cache and replays its captured output.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use podium_core::{RenderRequest, RendererRegistry};

/// Execute the exec command.
pub fn execute(cache_dir: &Path, cmd: Vec<String>) -> Result<()> {
    let registry = RendererRegistry::new(cache_dir);
    let cache = registry
        .get("exec")
        .context("exec renderer not registered")?;

    let request = RenderRequest::new().with("cmd", cmd);
    let artifact = cache.render(&request)?;
    debug!(keyhash = %artifact.keyhash, "command output rendered");

    if let Some(stdout) = artifact.data.bytes("stdout") {
        std::io::stdout().write_all(stdout)?;
    }
    if let Some(stderr) = artifact.data.bytes("stderr") {
        std::io::stderr().write_all(stderr)?;
    }
    Ok(())
}
