/*
 * image.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Image command implementation.
 */

//! Image command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use podium_core::{RenderRequest, RendererRegistry};

/// Execute the image command.
pub fn execute(
    cache_dir: &Path,
    src: &Path,
    max_dimension: i64,
    output: Option<PathBuf>,
) -> Result<()> {
    let registry = RendererRegistry::new(cache_dir);
    let cache = registry
        .get("img")
        .context("image renderer not registered")?;

    let request = RenderRequest::new()
        .with("src", src)
        .with("max_dimension", max_dimension);
    let artifact = cache.render(&request)?;

    let extension = artifact.data.text("extension").unwrap_or("img");
    let out_path =
        output.unwrap_or_else(|| PathBuf::from(format!("{}.{}", artifact.keyhash, extension)));
    let payload = artifact
        .data
        .bytes("img_data")
        .context("image artifact is missing its payload")?;
    std::fs::write(&out_path, payload)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!(keyhash = %artifact.keyhash, extension = %extension, "image rendered");
    println!("{}", out_path.display());
    Ok(())
}
