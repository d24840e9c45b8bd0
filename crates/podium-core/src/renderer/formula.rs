/*
 * renderer/formula.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * LaTeX formula renderer.
 */

//! LaTeX formula renderer.
//!
//! Typesets a mathematical expression into a tightly cropped PNG with
//! typographic metrics, for inline use in rendered slides. The
//! pipeline shells out twice: `pdflatex` typesets a minimal standalone
//! document, then ImageMagick rasterizes and trims it.
//!
//! The baseline is recovered optically. The document places an
//! invisible 1mm rule on the text baseline at the left margin,
//! followed by a 2mm gap; after rasterization a 2px-wide vertical
//! strip through the rule (at 0.5mm) is auto-trimmed, and the midpoint
//! of its vertical extent is the baseline row, reported as a pixel
//! offset from the image's bottom edge. The rule and gap are then
//! cropped out of the final image.

use std::path::Path;

use serde_json::{Map, Value, json};

use crate::artifact::ArtifactData;
use crate::error::{RenderError, Result};
use crate::process::run_checked;
use crate::renderer::traits::Renderer;
use crate::request::RenderRequest;

const NAME: &str = "latex";

const DEFAULT_DPI: u32 = 600;

const TEX_TEMPLATE: &str = r"\documentclass[preview,border=1mm,varwidth=true]{standalone}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{lmodern}
\usepackage{amsmath}
\usepackage{amssymb}
\begin{document}
%CONTENT%
\end{document}
";

/// 1mm baseline rule plus 2mm of spacing before the formula.
const BASELINE_MARKER: &str = r"\rule{1mm}{1pt} \hspace{2mm}";

/// Renders formulas via pdflatex and ImageMagick.
///
/// Request fields:
/// - `formula` (text, required): the expression, without math delimiters
/// - `short` (boolean, optional): inline (`$...$`) instead of display
///   (`\[...\]`) mode
pub struct FormulaRenderer {
    rendering_dpi: u32,
    work_root: Option<std::path::PathBuf>,
}

impl FormulaRenderer {
    /// Create a renderer at the default resolution (600 dpi).
    pub fn new() -> Self {
        Self::with_dpi(DEFAULT_DPI)
    }

    /// Create a renderer at a specific resolution.
    pub fn with_dpi(rendering_dpi: u32) -> Self {
        Self {
            rendering_dpi,
            work_root: None,
        }
    }

    /// Place temporary working directories under `root` instead of the
    /// system temp dir.
    ///
    /// The working area never affects output bytes, so it is not part
    /// of the renderer's properties or key material.
    pub fn with_work_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.work_root = Some(root.into());
        self
    }

    fn workdir(&self) -> std::io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("podium_formula_");
        match &self.work_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn mm_to_px(&self, mm: f64) -> i64 {
        ((mm / 25.4) * f64::from(self.rendering_dpi)).round() as i64
    }

    /// Measure the rasterized page and locate the baseline rule.
    fn image_info(&self, png_path: &Path) -> Result<ImageInfo> {
        // 2px wide sample so the trim never collapses to an empty image
        let probe_x = self.mm_to_px(0.5);
        let strip = format!("{}[2x+{}+0]", png_path.display(), probe_x);
        let output = run_checked(&[
            "convert".to_string(),
            strip,
            "-trim".to_string(),
            "json:-".to_string(),
        ])?;
        parse_image_info(&output.stdout)
    }
}

impl Default for FormulaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for FormulaRenderer {
    fn name(&self) -> &str {
        NAME
    }

    fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("version".to_string(), json!(1));
        // Resolution changes the output bytes, so it is part of the
        // logic fingerprint.
        props.insert("rendering_dpi".to_string(), json!(self.rendering_dpi));
        props
    }

    fn rendering_key(&self, request: &RenderRequest) -> Result<Map<String, Value>> {
        let formula = request
            .text("formula")
            .ok_or_else(|| RenderError::invalid_input(NAME, "missing required field 'formula'"))?;
        let mut key = Map::new();
        key.insert("formula".to_string(), json!(formula));
        key.insert(
            "short".to_string(),
            json!(request.boolean("short").unwrap_or(false)),
        );
        key.insert("dpi".to_string(), json!(self.rendering_dpi));
        Ok(key)
    }

    fn render(&self, request: &RenderRequest) -> Result<ArtifactData> {
        let formula = request
            .text("formula")
            .ok_or_else(|| RenderError::invalid_input(NAME, "missing required field 'formula'"))?;
        let short = request.boolean("short").unwrap_or(false);

        // Removed on drop, on every exit path.
        let workdir = self.workdir()?;
        let tex_path = workdir.path().join("formula.tex");
        let pdf_path = workdir.path().join("formula.pdf");
        let png_path = workdir.path().join("formula.png");

        let content = if short {
            format!("${}{}$", BASELINE_MARKER, formula)
        } else {
            format!(r"\[{}{} \]", BASELINE_MARKER, formula)
        };
        std::fs::write(&tex_path, TEX_TEMPLATE.replace("%CONTENT%", &content))?;

        run_checked(&[
            "pdflatex".to_string(),
            "-interaction=batchmode".to_string(),
            format!("-output-directory={}", workdir.path().display()),
            tex_path.display().to_string(),
        ])?;

        run_checked(&[
            "convert".to_string(),
            "-define".to_string(),
            "profile:skip=ICC".to_string(),
            "-density".to_string(),
            self.rendering_dpi.to_string(),
            "-trim".to_string(),
            "+repage".to_string(),
            pdf_path.display().to_string(),
            png_path.display().to_string(),
        ])?;

        let info = self.image_info(&png_path)?;
        tracing::debug!(renderer = NAME, baseline = info.baseline,
            "determined baseline offset (from bottom)");

        // Crop the marker out: the full marker spans 3mm (1mm rule +
        // 2mm gap); cropping 2mm stays on the safe side and the
        // trailing trim removes the remainder.
        let left_crop = self.mm_to_px(2.0);
        let final_png = run_checked(&[
            "convert".to_string(),
            "-crop".to_string(),
            format!("+{}+0", left_crop),
            "-trim".to_string(),
            "+repage".to_string(),
            png_path.display().to_string(),
            "png:-".to_string(),
        ])?;

        Ok(ArtifactData::new()
            .with("png_data", final_png.stdout)
            .with("extension", "png")
            .with("width", info.width)
            .with("height", info.height)
            .with("baseline", info.baseline))
    }
}

#[derive(Debug)]
struct ImageInfo {
    width: i64,
    height: i64,
    /// Baseline row, measured from the image's bottom edge
    baseline: i64,
}

/// Parse ImageMagick's `json:-` output for the trimmed probe strip.
///
/// `pageGeometry` describes the full page the strip was cut from;
/// `geometry` and the page `y` offset describe the trimmed extent of
/// the baseline rule within it.
fn parse_image_info(raw: &[u8]) -> Result<ImageInfo> {
    let parsed: Value = serde_json::from_slice(raw)
        .map_err(|e| RenderError::execution("convert", format!("unparseable image info: {e}")))?;

    let image = parsed.get(0).and_then(|entry| entry.get("image"));
    let page = image.and_then(|i| i.get("pageGeometry"));
    let field = |v: Option<&Value>, name: &str| -> Result<i64> {
        v.and_then(Value::as_i64).ok_or_else(|| {
            RenderError::execution("convert", format!("missing '{name}' in image info"))
        })
    };

    let width = field(page.and_then(|g| g.get("width")), "pageGeometry.width")?;
    let height = field(page.and_then(|g| g.get("height")), "pageGeometry.height")?;
    let strip_top = field(page.and_then(|g| g.get("y")), "pageGeometry.y")?;
    let strip_height = field(
        image.and_then(|i| i.get("geometry")).and_then(|g| g.get("height")),
        "geometry.height",
    )?;

    let strip_bottom = strip_top + strip_height;
    let baseline_from_top = ((strip_top + strip_bottom) as f64 / 2.0).round() as i64;
    Ok(ImageInfo {
        width,
        height,
        baseline: height - baseline_from_top,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_key_covers_layout_and_resolution() {
        let renderer = FormulaRenderer::with_dpi(300);
        let request = RenderRequest::new().with("formula", "x^2").with("short", true);
        let key = renderer.rendering_key(&request).unwrap();
        assert_eq!(key.get("formula"), Some(&json!("x^2")));
        assert_eq!(key.get("short"), Some(&json!(true)));
        assert_eq!(key.get("dpi"), Some(&json!(300)));
    }

    #[test]
    fn test_missing_formula_is_invalid_input() {
        let renderer = FormulaRenderer::new();
        let err = renderer.rendering_key(&RenderRequest::new()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput { .. }));
        let err = renderer.render(&RenderRequest::new()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput { .. }));
    }

    #[test]
    fn test_properties_fingerprint_resolution() {
        let props = FormulaRenderer::with_dpi(300).properties();
        assert_eq!(props.get("version"), Some(&json!(1)));
        assert_eq!(props.get("rendering_dpi"), Some(&json!(300)));
    }

    #[test]
    fn test_work_root_scopes_working_directories() {
        let root = tempfile::tempdir().unwrap();
        let renderer = FormulaRenderer::new().with_work_root(root.path());

        let workdir = renderer.workdir().unwrap();
        assert!(workdir.path().starts_with(root.path()));
        let name = workdir.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("podium_formula_"), "unexpected name {name}");

        drop(workdir);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_mm_to_px_at_600_dpi() {
        let renderer = FormulaRenderer::new();
        // 25.4mm = 1 inch = 600px
        assert_eq!(renderer.mm_to_px(25.4), 600);
        assert_eq!(renderer.mm_to_px(0.5), 12);
        assert_eq!(renderer.mm_to_px(2.0), 47);
    }

    #[test]
    fn test_parse_image_info_midpoint_baseline() {
        // Full page 400x200; rule strip trimmed to rows 150..=154.
        let raw = br#"[{
            "image": {
                "pageGeometry": {"width": 400, "height": 200, "x": 12, "y": 150},
                "geometry": {"width": 2, "height": 4, "x": 0, "y": 0}
            }
        }]"#;
        let info = parse_image_info(raw).unwrap();
        assert_eq!(info.width, 400);
        assert_eq!(info.height, 200);
        // midpoint of 150..154 is 152, from the bottom: 200 - 152
        assert_eq!(info.baseline, 48);
    }

    #[test]
    fn test_parse_image_info_rejects_garbage() {
        assert!(matches!(
            parse_image_info(b"oops").unwrap_err(),
            RenderError::ExecutionFailed { .. }
        ));
        assert!(matches!(
            parse_image_info(b"[{}]").unwrap_err(),
            RenderError::ExecutionFailed { .. }
        ));
    }
}
