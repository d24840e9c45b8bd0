/*
 * cache/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The renderer cache engine.
 */

//! The renderer cache engine.
//!
//! [`RendererCache`] wraps exactly one [`Renderer`] and a store
//! handle. On every call it derives the cache key from the renderer's
//! identity, its declared properties and the rendering key it
//! extracts from the request; a previously-seen key is served from the
//! store without invoking the renderer.
//!
//! The store is strictly an optimization: an unreadable entry is
//! re-rendered and a failed publication is logged, with the freshly
//! computed artifact still returned. Only renderer failures and
//! invalid requests fail the call.

pub mod key;
pub mod store;

use std::sync::Arc;

use crate::artifact::RenderedArtifact;
use crate::error::{RenderError, Result};
use crate::renderer::Renderer;
use crate::request::RenderRequest;

use key::derive_cache_key;
use store::{ArtifactStore, CacheEntry, ENTRY_SCHEMA};

/// A memoizing wrapper around one renderer.
pub struct RendererCache {
    renderer: Arc<dyn Renderer>,
    store: ArtifactStore,
}

impl RendererCache {
    /// Create a cache for `renderer` persisting into `store`.
    pub fn new(renderer: Arc<dyn Renderer>, store: ArtifactStore) -> Self {
        Self { renderer, store }
    }

    /// The wrapped renderer's name.
    pub fn name(&self) -> &str {
        self.renderer.name()
    }

    /// The store this cache persists into.
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Render a request, serving a hit from the store when possible.
    ///
    /// On a miss the wrapped renderer runs synchronously; its failures
    /// propagate annotated with the renderer name and cache key
    /// (invalid requests propagate unchanged), and nothing is written.
    /// On success the entry is published with an atomic rename; a
    /// publication failure downgrades to a warning.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderedArtifact> {
        let name = self.renderer.name();
        let rendering_key = self.renderer.rendering_key(request)?;
        let keyhash = derive_cache_key(name, &self.renderer.properties(), &rendering_key);

        match self.store.load(name, &keyhash) {
            Ok(Some(entry)) => {
                tracing::debug!(renderer = %name, keyhash = %keyhash, "cache hit");
                return Ok(RenderedArtifact {
                    keyhash,
                    data: entry.data,
                });
            }
            Ok(None) => {
                tracing::debug!(renderer = %name, keyhash = %keyhash, "cache miss");
            }
            Err(err) => {
                tracing::warn!(renderer = %name, keyhash = %keyhash, error = %err,
                    "discarding unreadable cache entry");
            }
        }

        let data = self.renderer.render(request).map_err(|err| match err {
            e @ RenderError::InvalidInput { .. } => e,
            other => RenderError::render_failed(name, &keyhash, other),
        })?;

        let entry = CacheEntry {
            schema: ENTRY_SCHEMA,
            renderer: name.to_string(),
            keyhash: keyhash.clone(),
            data,
        };
        if let Err(err) = self.store.publish(&entry) {
            tracing::warn!(renderer = %name, keyhash = %keyhash, error = %err,
                "failed to persist cache entry, returning unpersisted artifact");
        }

        Ok(RenderedArtifact {
            keyhash,
            data: entry.data,
        })
    }
}
