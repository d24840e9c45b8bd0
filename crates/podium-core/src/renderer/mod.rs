/*
 * renderer/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Renderer implementations.
 */

//! Renderer implementations.
//!
//! The [`Renderer`] trait is the capability every variant implements;
//! the [`RendererRegistry`] exposes the built-in set {formula, image,
//! exec} as ready-made caches.

pub mod exec;
pub mod formula;
pub mod image;
pub mod registry;
pub mod traits;

pub use exec::ExecRenderer;
pub use formula::FormulaRenderer;
pub use image::ImageRenderer;
pub use registry::RendererRegistry;
pub use traits::Renderer;
