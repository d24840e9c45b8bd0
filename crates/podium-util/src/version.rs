//! Version reporting for the Podium CLI.

/// Get the version string reported by the CLI.
pub fn cli_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
