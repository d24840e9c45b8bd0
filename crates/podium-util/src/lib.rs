//! Shared utilities for Podium
//!
//! Currently this crate holds the content-digest primitive used by the
//! renderer cache to build content-addressable keys, plus the CLI
//! version helper.

pub mod hash;
pub mod version;

pub use hash::{hash_bytes, hash_file};
pub use version::cli_version;
