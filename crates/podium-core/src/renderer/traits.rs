/*
 * renderer/traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Renderer trait definition.
 */

//! Renderer trait for expensive, externally-computed artifacts.

use serde_json::{Map, Value};

use crate::artifact::ArtifactData;
use crate::error::Result;
use crate::request::RenderRequest;

/// A unit of expensive, deterministic-given-its-inputs work.
///
/// Renderers produce artifacts the cache can memoize: typeset
/// formulas, resized images, captured command output. Given the same
/// request, the same renderer version must produce the same output
/// bytes.
///
/// # Thread Safety
///
/// Renderers must be `Send + Sync`: one instance is shared behind an
/// `Arc` by its cache and may be called from multiple threads.
///
/// # Implementation Notes
///
/// - `properties` fingerprints the renderer's *logic*. Anything that
///   changes the output bytes for a fixed request (algorithm change,
///   resolution setting) must change `properties`, usually via a
///   version bump.
/// - `rendering_key` extracts the minimal subset of the request that
///   affects output. Narrowing is deliberate: keying on a file's
///   content digest instead of its path means moving the file does
///   not invalidate the cache, while editing it does. Fields left out
///   of the key may change freely without invalidating entries.
/// - `render` may spawn external processes and create temporary
///   working directories, and must release them on every exit path,
///   including failure.
pub trait Renderer: Send + Sync {
    /// Stable identifier, used as the cache namespace.
    ///
    /// Standard names: "latex", "img", "exec"
    fn name(&self) -> &str;

    /// The renderer's logic fingerprint: at minimum a version number,
    /// plus any configuration that affects output bytes.
    fn properties(&self) -> Map<String, Value>;

    /// Extract the request fields that are allowed to affect caching.
    ///
    /// The default keys on the entire request. Renderers are expected
    /// to narrow this deliberately; see [`RenderRequest::key_map`] for
    /// how the default projects values.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a field needed for the key is absent or
    /// malformed. This fails the call before anything is rendered or
    /// cached.
    fn rendering_key(&self, request: &RenderRequest) -> Result<Map<String, Value>> {
        Ok(request.key_map())
    }

    /// Perform the actual work.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when required fields are absent or malformed
    /// - `ExecutionFailed` when an external dependency cannot be
    ///   invoked or exits abnormally
    fn render(&self, request: &RenderRequest) -> Result<ArtifactData>;
}
