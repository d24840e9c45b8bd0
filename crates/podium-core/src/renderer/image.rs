/*
 * renderer/image.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Image resize renderer.
 */

//! Image resize renderer.
//!
//! Normalizes a source image for deployment: the longer edge is
//! clamped to a maximum dimension (never upscaled, aspect ratio
//! preserved) and the payload keeps the source's format.
//!
//! The cache key uses the source file's content digest, not its path:
//! moving or relinking the file keeps the cache warm, while any edit
//! to its bytes invalidates it.

use serde_json::{Map, Value, json};

use crate::artifact::ArtifactData;
use crate::error::{RenderError, Result};
use crate::process::run_checked;
use crate::renderer::traits::Renderer;
use crate::request::RenderRequest;

const NAME: &str = "img";

/// Renders source images into bounded rasters via ImageMagick.
///
/// Request fields:
/// - `src` (path, required): the source image file
/// - `max_dimension` (integer, required): bound for the longer edge,
///   in pixels
#[derive(Debug, Default)]
pub struct ImageRenderer;

impl ImageRenderer {
    /// Create an image renderer.
    pub fn new() -> Self {
        Self
    }

    fn request_fields<'a>(
        &self,
        request: &'a RenderRequest,
    ) -> Result<(&'a std::path::Path, i64)> {
        let src = request
            .path("src")
            .ok_or_else(|| RenderError::invalid_input(NAME, "missing required field 'src'"))?;
        let max_dimension = request.integer("max_dimension").ok_or_else(|| {
            RenderError::invalid_input(NAME, "missing required field 'max_dimension'")
        })?;
        if max_dimension <= 0 {
            return Err(RenderError::invalid_input(
                NAME,
                format!("'max_dimension' must be positive, got {max_dimension}"),
            ));
        }
        Ok((src, max_dimension))
    }
}

impl Renderer for ImageRenderer {
    fn name(&self) -> &str {
        NAME
    }

    fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("version".to_string(), json!(1));
        props
    }

    fn rendering_key(&self, request: &RenderRequest) -> Result<Map<String, Value>> {
        let (src, max_dimension) = self.request_fields(request)?;
        let srchash = podium_util::hash_file(src).map_err(|e| {
            RenderError::invalid_input(
                NAME,
                format!("cannot read source file '{}': {}", src.display(), e),
            )
        })?;

        // The source path is deliberately excluded from the key.
        let mut key = Map::new();
        key.insert("srchash".to_string(), json!(srchash));
        key.insert("max_dimension".to_string(), json!(max_dimension));
        Ok(key)
    }

    fn render(&self, request: &RenderRequest) -> Result<ArtifactData> {
        let (src, max_dimension) = self.request_fields(request)?;

        // First frame only, so animated sources report one format.
        let magick = run_checked(&[
            "identify".to_string(),
            "-format".to_string(),
            "%m".to_string(),
            format!("{}[0]", src.display()),
        ])?;
        let extension = extension_for_magick(magick.stdout_string().trim());

        // The '>' flag only shrinks: smaller sources pass through at
        // their native size.
        let resized = run_checked(&[
            "convert".to_string(),
            src.display().to_string(),
            "-resize".to_string(),
            format!("{0}x{0}>", max_dimension),
            format!("{}:-", extension),
        ])?;

        Ok(ArtifactData::new()
            .with("img_data", resized.stdout)
            .with("extension", extension))
    }
}

/// Map an ImageMagick format name to a file extension.
fn extension_for_magick(magick: &str) -> String {
    match magick.to_ascii_uppercase().as_str() {
        "JPEG" => "jpg".to_string(),
        "SVG" | "MSVG" => "svg".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_are_invalid_input() {
        let renderer = ImageRenderer::new();
        let err = renderer.rendering_key(&RenderRequest::new()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput { .. }));

        let no_bound = RenderRequest::new().with("src", "pic.png");
        let err = renderer.rendering_key(&no_bound).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput { .. }));
    }

    #[test]
    fn test_nonpositive_bound_is_invalid_input() {
        let renderer = ImageRenderer::new();
        let request = RenderRequest::new()
            .with("src", "pic.png")
            .with("max_dimension", 0_i64);
        let err = renderer.rendering_key(&request).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput { .. }));
    }

    #[test]
    fn test_unreadable_source_is_invalid_input() {
        let renderer = ImageRenderer::new();
        let request = RenderRequest::new()
            .with("src", "/nonexistent/pic.png")
            .with("max_dimension", 100_i64);
        let err = renderer.rendering_key(&request).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput { .. }));
    }

    #[test]
    fn test_key_uses_content_not_path() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.png");
        let path_b = dir.path().join("b.png");
        let mut f = std::fs::File::create(&path_a).unwrap();
        f.write_all(b"fake image bytes").unwrap();
        drop(f);
        std::fs::copy(&path_a, &path_b).unwrap();

        let renderer = ImageRenderer::new();
        let key_a = renderer
            .rendering_key(
                &RenderRequest::new()
                    .with("src", path_a.clone())
                    .with("max_dimension", 100_i64),
            )
            .unwrap();
        let key_b = renderer
            .rendering_key(
                &RenderRequest::new()
                    .with("src", path_b)
                    .with("max_dimension", 100_i64),
            )
            .unwrap();
        // Same bytes under different paths: identical key material.
        assert_eq!(key_a, key_b);

        let key_other_bound = renderer
            .rendering_key(
                &RenderRequest::new()
                    .with("src", path_a)
                    .with("max_dimension", 200_i64),
            )
            .unwrap();
        assert_ne!(key_a, key_other_bound);
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for_magick("PNG"), "png");
        assert_eq!(extension_for_magick("JPEG"), "jpg");
        assert_eq!(extension_for_magick("SVG"), "svg");
        assert_eq!(extension_for_magick("GIF"), "gif");
    }
}
