/*
 * formula.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Formula command implementation.
 */

//! Formula command implementation.
//!
//! Renders one formula through the cache and writes the cropped PNG
//! next to its typographic metrics.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use podium_core::{ArtifactStore, FormulaRenderer, RenderRequest, RendererCache};

/// Execute the formula command.
pub fn execute(
    cache_dir: &Path,
    formula: &str,
    short: bool,
    dpi: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let cache = RendererCache::new(
        Arc::new(FormulaRenderer::with_dpi(dpi)),
        ArtifactStore::new(cache_dir),
    );

    let request = RenderRequest::new()
        .with("formula", formula)
        .with("short", short);
    let artifact = cache.render(&request)?;

    let extension = artifact.data.text("extension").unwrap_or("png");
    let out_path =
        output.unwrap_or_else(|| PathBuf::from(format!("{}.{}", artifact.keyhash, extension)));
    let png = artifact
        .data
        .bytes("png_data")
        .context("formula artifact is missing its image payload")?;
    std::fs::write(&out_path, png)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!(
        keyhash = %artifact.keyhash,
        width = artifact.data.integer("width").unwrap_or(0),
        height = artifact.data.integer("height").unwrap_or(0),
        baseline = artifact.data.integer("baseline").unwrap_or(0),
        "formula rendered"
    );
    println!("{}", out_path.display());
    Ok(())
}
