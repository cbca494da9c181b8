//! Shared external tool invocation.

use std::io;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::MediaError;

/// Runs an external program to completion, capturing output.
/// A missing binary maps to [`MediaError::ToolNotFound`]; a non-zero exit
/// surfaces the tool's stderr in [`MediaError::ToolFailed`].
pub(crate) fn run(program: &Path, args: &[String]) -> Result<Output, MediaError> {
    let tool = program.display().to_string();
    tracing::debug!(%tool, ?args, "running external tool");

    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            MediaError::ToolNotFound { tool: tool.clone() }
        } else {
            MediaError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(MediaError::ToolFailed {
            tool,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
