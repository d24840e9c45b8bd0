/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for the renderer cache.
 */

//! Error types for the renderer cache.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering or caching an artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The request is missing a required field or a field is malformed.
    ///
    /// Never retried and never cached.
    #[error("Invalid request for renderer '{renderer}': {message}")]
    InvalidInput {
        /// The renderer that rejected the request
        renderer: String,
        /// What was missing or malformed
        message: String,
    },

    /// An external command could not be started or exited abnormally.
    ///
    /// External tools are treated as deterministic, so this is never
    /// auto-retried: rerunning would reproduce the same failure.
    #[error("Failed to execute '{command}': {message}")]
    ExecutionFailed {
        /// The command line that failed
        command: String,
        /// Exit status, if the process ran to completion
        status: Option<i32>,
        /// Description of the failure
        message: String,
    },

    /// A renderer failed during a cache miss.
    ///
    /// Wraps the underlying failure with the renderer name and the
    /// cache key that was being computed. `InvalidInput` is never
    /// wrapped; it propagates unchanged.
    #[error("Renderer '{renderer}' failed for key {keyhash}: {source}")]
    Render {
        /// The renderer that failed
        renderer: String,
        /// The cache key of the failed render
        keyhash: String,
        /// The underlying failure
        #[source]
        source: Box<RenderError>,
    },

    /// A cache entry exists on disk but cannot be decoded.
    ///
    /// The cache treats this as a miss and recomputes; it never fails
    /// the render call.
    #[error("Unreadable cache entry at {path}: {message}")]
    StoreRead {
        /// Path of the offending entry
        path: PathBuf,
        /// Why the entry could not be decoded
        message: String,
    },

    /// Persisting a freshly computed entry failed.
    ///
    /// Logged and swallowed by the cache; the computed artifact is
    /// still returned to the caller.
    #[error("Failed to write cache entry at {path}: {source}")]
    StoreWrite {
        /// Path the entry was being written to
        path: PathBuf,
        /// The underlying IO failure
        #[source]
        source: io::Error,
    },

    /// IO error outside the store (temp files, request inputs).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl RenderError {
    /// Create an invalid-input error.
    pub fn invalid_input(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            renderer: renderer.into(),
            message: message.into(),
        }
    }

    /// Create an execution error for a process that could not be started.
    pub fn spawn_failed(command: impl Into<String>, err: &io::Error) -> Self {
        let message = if err.kind() == io::ErrorKind::NotFound {
            "program not found on PATH".to_string()
        } else {
            format!("could not start process: {}", err)
        };
        Self::ExecutionFailed {
            command: command.into(),
            status: None,
            message,
        }
    }

    /// Create an execution error for a process that exited abnormally.
    pub fn abnormal_exit(command: impl Into<String>, status: i32) -> Self {
        Self::ExecutionFailed {
            command: command.into(),
            status: Some(status),
            message: format!("exited with status {}", status),
        }
    }

    /// Create an execution error with a custom message.
    pub fn execution(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            command: command.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Wrap a render failure with the renderer name and cache key.
    pub fn render_failed(
        renderer: impl Into<String>,
        keyhash: impl Into<String>,
        source: RenderError,
    ) -> Self {
        Self::Render {
            renderer: renderer.into(),
            keyhash: keyhash.into(),
            source: Box::new(source),
        }
    }

    /// Create a store-read error.
    pub fn store_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::StoreRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a store-write error.
    pub fn store_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StoreWrite {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
