/*
 * renderer/exec.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Command execution renderer.
 */

//! Command execution renderer.
//!
//! Runs an external command and captures its stdout and stderr as the
//! artifact, for embedding command output into rendered content.

use serde_json::{Map, Value, json};

use crate::artifact::ArtifactData;
use crate::error::{RenderError, Result};
use crate::process::{display_command, run_captured};
use crate::renderer::traits::Renderer;
use crate::request::RenderRequest;

const NAME: &str = "exec";

/// Renders captured command output.
///
/// Request fields:
/// - `cmd` (list, required): the command line; `cmd[0]` is the
///   executable
#[derive(Debug, Default)]
pub struct ExecRenderer;

impl ExecRenderer {
    /// Create an exec renderer.
    pub fn new() -> Self {
        Self
    }

    fn cmd<'a>(&self, request: &'a RenderRequest) -> Result<&'a [String]> {
        let cmd = request
            .list("cmd")
            .ok_or_else(|| RenderError::invalid_input(NAME, "missing required field 'cmd'"))?;
        if cmd.is_empty() {
            return Err(RenderError::invalid_input(NAME, "'cmd' must not be empty"));
        }
        Ok(cmd)
    }
}

impl Renderer for ExecRenderer {
    fn name(&self) -> &str {
        NAME
    }

    fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("version".to_string(), json!(1));
        props
    }

    /// Key on the content digest of the executable file only.
    ///
    /// Arguments are intentionally not part of the key: changing only
    /// the arguments of a previously rendered command will serve the
    /// stale entry. This coarsening is a deliberate tradeoff carried
    /// over from the observed behavior, not an oversight; callers that
    /// need per-argument artifacts must vary the executable.
    fn rendering_key(&self, request: &RenderRequest) -> Result<Map<String, Value>> {
        let cmd = self.cmd(request)?;
        let srchash = podium_util::hash_file(&cmd[0]).map_err(|e| {
            RenderError::execution(
                display_command(cmd),
                format!("cannot read executable '{}': {}", cmd[0], e),
            )
        })?;

        let mut key = Map::new();
        key.insert("srchash".to_string(), json!(srchash));
        Ok(key)
    }

    fn render(&self, request: &RenderRequest) -> Result<ArtifactData> {
        let cmd = self.cmd(request)?;
        let output = run_captured(cmd)?;
        if !output.success() {
            return Err(RenderError::abnormal_exit(display_command(cmd), output.code));
        }

        Ok(ArtifactData::new()
            .with("cmd", cmd.to_vec())
            .with("stdout", output.stdout)
            .with("stderr", output.stderr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd_request(parts: &[&str]) -> RenderRequest {
        RenderRequest::new().with(
            "cmd",
            parts.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_missing_or_empty_cmd_is_invalid_input() {
        let renderer = ExecRenderer::new();
        assert!(matches!(
            renderer.rendering_key(&RenderRequest::new()).unwrap_err(),
            RenderError::InvalidInput { .. }
        ));
        assert!(matches!(
            renderer.rendering_key(&cmd_request(&[])).unwrap_err(),
            RenderError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_key_ignores_arguments() {
        let exe = match which::which("true") {
            Ok(path) => path.display().to_string(),
            Err(_) => {
                eprintln!("skipping: 'true' not on PATH");
                return;
            }
        };
        let renderer = ExecRenderer::new();
        let plain = renderer.rendering_key(&cmd_request(&[&exe])).unwrap();
        let with_args = renderer
            .rendering_key(&cmd_request(&[&exe, "--ignored", "argument"]))
            .unwrap();
        assert_eq!(plain, with_args);
    }

    #[test]
    fn test_missing_executable_is_execution_failure() {
        let renderer = ExecRenderer::new();
        let err = renderer
            .rendering_key(&cmd_request(&["/nonexistent/tool"]))
            .unwrap_err();
        assert!(matches!(err, RenderError::ExecutionFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_render_captures_output() {
        let exe = match which::which("echo") {
            Ok(path) => path.display().to_string(),
            Err(_) => {
                eprintln!("skipping: 'echo' not on PATH");
                return;
            }
        };
        let renderer = ExecRenderer::new();
        let data = renderer.render(&cmd_request(&[&exe, "hello"])).unwrap();
        assert_eq!(data.bytes("stdout"), Some(&b"hello\n"[..]));
        assert_eq!(data.bytes("stderr"), Some(&b""[..]));
        assert_eq!(data.list("cmd").map(|c| c.len()), Some(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_execution_failure() {
        let exe = match which::which("false") {
            Ok(path) => path.display().to_string(),
            Err(_) => {
                eprintln!("skipping: 'false' not on PATH");
                return;
            }
        };
        let renderer = ExecRenderer::new();
        let err = renderer.render(&cmd_request(&[&exe])).unwrap_err();
        match err {
            RenderError::ExecutionFailed { status, command, .. } => {
                assert_eq!(status, Some(1));
                assert!(command.contains("false"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_no_execute_permission_is_execution_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("script.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();

        let renderer = ExecRenderer::new();
        let err = renderer
            .render(&cmd_request(&[&script.display().to_string()]))
            .unwrap_err();
        assert!(matches!(err, RenderError::ExecutionFailed { status: None, .. }));
    }
}
