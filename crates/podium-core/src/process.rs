/*
 * process.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * External process invocation for renderers.
 */

//! External process invocation for renderers.
//!
//! Renderers shell out to external tools (pdflatex, ImageMagick,
//! arbitrary commands). All invocations run synchronously with stdout
//! and stderr captured and stdin closed, and map failures onto
//! [`RenderError::ExecutionFailed`] carrying the command line and exit
//! status.

use std::process::{Command, Stdio};

use crate::error::{RenderError, Result};

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (0 = success; -1 if terminated by a signal)
    pub code: i32,
    /// Standard output
    pub stdout: Vec<u8>,
    /// Standard error
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Get stdout as a string (lossy UTF-8 conversion).
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a string (lossy UTF-8 conversion).
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Render an argv as a single command line for diagnostics.
pub fn display_command(argv: &[String]) -> String {
    argv.join(" ")
}

/// Run a command and capture its output, regardless of exit status.
///
/// Fails only when the process cannot be started at all.
pub fn run_captured(argv: &[String]) -> Result<CommandOutput> {
    let program = argv
        .first()
        .ok_or_else(|| RenderError::execution(String::new(), "empty command"))?;

    let output = Command::new(program)
        .args(&argv[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| RenderError::spawn_failed(display_command(argv), &e))?;

    Ok(CommandOutput {
        code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Run a command and require a zero exit status.
pub fn run_checked(argv: &[String]) -> Result<CommandOutput> {
    let output = run_captured(argv)?;
    if !output.success() {
        return Err(RenderError::abnormal_exit(
            display_command(argv),
            output.code,
        ));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_rejected() {
        let err = run_captured(&[]).unwrap_err();
        assert!(matches!(err, RenderError::ExecutionFailed { .. }));
    }

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let err = run_captured(&["podium-no-such-binary".to_string()]).unwrap_err();
        match err {
            RenderError::ExecutionFailed { status, message, .. } => {
                assert_eq!(status, None);
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_checked_rejects_nonzero_exit() {
        if which::which("false").is_err() {
            eprintln!("skipping: 'false' not on PATH");
            return;
        }
        let err = run_checked(&["false".to_string()]).unwrap_err();
        match err {
            RenderError::ExecutionFailed { status, command, .. } => {
                assert_eq!(status, Some(1));
                assert_eq!(command, "false");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captured_collects_streams() {
        if which::which("sh").is_err() {
            eprintln!("skipping: 'sh' not on PATH");
            return;
        }
        let output = run_captured(&[
            "sh".to_string(),
            "-c".to_string(),
            "echo out; echo err >&2".to_string(),
        ])
        .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout_string(), "out\n");
        assert_eq!(output.stderr_string(), "err\n");
    }
}
