/*
 * renderer/registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Registry of available renderers.
 */

//! Registry of available renderers.
//!
//! The registry holds one [`RendererCache`] per renderer name and is
//! the surface the composition pipeline and tag hooks render through:
//! obtain a named cache, call `render`, receive a keyed artifact.
//! Adding a renderer means adding a variant here, not probing objects
//! at runtime.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::RendererCache;
use crate::cache::store::ArtifactStore;

use super::exec::ExecRenderer;
use super::formula::FormulaRenderer;
use super::image::ImageRenderer;
use super::traits::Renderer;

/// Registry of renderer caches over a shared store root.
pub struct RendererRegistry {
    caches: HashMap<String, Arc<RendererCache>>,
    store_root: PathBuf,
}

impl RendererRegistry {
    /// Create a registry with the built-in renderers.
    ///
    /// Registers the formula ("latex"), image ("img") and exec
    /// ("exec") renderers, all persisting under `store_root`.
    pub fn new(store_root: impl Into<PathBuf>) -> Self {
        let mut registry = Self::empty(store_root);
        registry.register(Arc::new(FormulaRenderer::new()));
        registry.register(Arc::new(ImageRenderer::new()));
        registry.register(Arc::new(ExecRenderer::new()));
        registry
    }

    /// Create an empty registry (for tests and custom setups).
    pub fn empty(store_root: impl Into<PathBuf>) -> Self {
        Self {
            caches: HashMap::new(),
            store_root: store_root.into(),
        }
    }

    /// Register a renderer, wrapping it in a cache over the registry's
    /// store root.
    ///
    /// If a renderer with the same name already exists, it is replaced.
    pub fn register(&mut self, renderer: Arc<dyn Renderer>) {
        let name = renderer.name().to_string();
        let cache = RendererCache::new(renderer, ArtifactStore::new(self.store_root.clone()));
        self.caches.insert(name, Arc::new(cache));
    }

    /// Get a renderer cache by name.
    pub fn get(&self, name: &str) -> Option<Arc<RendererCache>> {
        self.caches.get(name).cloned()
    }

    /// List all registered renderer names.
    pub fn names(&self) -> Vec<&str> {
        self.caches.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a renderer is registered.
    pub fn has_renderer(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Get the number of registered renderers.
    pub fn len(&self) -> usize {
        self.caches.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_builtin_renderers() {
        let registry = RendererRegistry::new("/tmp/podium-cache");
        assert_eq!(registry.len(), 3);
        for name in ["latex", "img", "exec"] {
            assert!(registry.has_renderer(name), "missing renderer {name}");
            assert_eq!(registry.get(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_unknown_renderer_is_none() {
        let registry = RendererRegistry::new("/tmp/podium-cache");
        assert!(registry.get("video").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = RendererRegistry::empty("/tmp/podium-cache");
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }
}
