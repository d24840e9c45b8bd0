//! Command implementations for the Podium CLI
//!
//! Each command module handles the CLI interface and delegates to
//! podium-core for actual rendering.

pub mod exec;
pub mod formula;
pub mod image;
