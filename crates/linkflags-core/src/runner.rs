//! External command execution.
//!
//! Components that shell out (git, the go tool) do so through
//! [`CommandRunner`] so they can be driven by [`crate::fakes::ScriptedRunner`]
//! in tests instead of spawning processes.

use std::ffi::OsString;
use std::process::Command;

use tracing::debug;

use crate::error::ToolError;

/// Runs a program to completion and returns its standard output.
pub trait CommandRunner {
    /// Run `program` with `args`, wait for it to exit and collect its output.
    ///
    /// Arguments are OS strings so paths reach the process byte for byte.
    /// Returns the raw stdout on success. A process that cannot be started or
    /// exits unsuccessfully yields a [`ToolError`] carrying the captured output.
    fn run(&self, program: &str, args: &[OsString]) -> Result<String, ToolError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[OsString]) -> Result<String, ToolError> {
        (**self).run(program, args)
    }
}

/// Spawns real processes via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<String, ToolError> {
        debug!(program, ?args, "running external command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| ToolError::spawn(program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let captured = format!("{}{}", stdout, stderr);
            return Err(ToolError::exit(
                program,
                output.status.code(),
                captured.trim(),
            ));
        }

        Ok(stdout)
    }
}
