//! Content-addressable renderer cache for Podium
//!
//! Presentations compose expensive, externally-computed artifacts:
//! typeset formulas, resized images, captured command output. This
//! crate memoizes them so repeated builds are fast and deterministic.
//!
//! # Architecture
//!
//! - [`Renderer`] - a unit of expensive, deterministic-given-its-inputs
//!   work, with a declared logic fingerprint and a rendering key
//! - [`RendererCache`] - the memoization layer wrapping one renderer:
//!   key derivation, lookup, invocation-on-miss, persistence
//! - [`ArtifactStore`] - the shared on-disk store, safe for concurrent
//!   readers and racing writers
//! - [`RendererRegistry`] - the named set of built-in renderer caches
//!
//! # Example
//!
//! ```ignore
//! use podium_core::{RenderRequest, RendererRegistry};
//!
//! let registry = RendererRegistry::new(".podium-cache");
//! let cache = registry.get("exec").unwrap();
//!
//! let request = RenderRequest::new().with("cmd", vec!["date".to_string()]);
//! let artifact = cache.render(&request)?;
//! println!("{} -> {:?}", artifact.keyhash, artifact.data.bytes("stdout"));
//! ```
//!
//! Cache availability is strictly an optimization: store failures
//! degrade to recomputation or an unpersisted result, never to a
//! failed render.

pub mod artifact;
pub mod cache;
pub mod error;
pub mod process;
pub mod renderer;
pub mod request;

// Re-export commonly used types
pub use artifact::{ArtifactData, ArtifactValue, RenderedArtifact};
pub use cache::RendererCache;
pub use cache::key::derive_cache_key;
pub use cache::store::{ArtifactStore, CacheEntry, ENTRY_SCHEMA};
pub use error::{RenderError, Result};
pub use process::CommandOutput;
pub use renderer::{ExecRenderer, FormulaRenderer, ImageRenderer, Renderer, RendererRegistry};
pub use request::{RenderRequest, RequestValue};
