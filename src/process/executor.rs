use crate::error::{ReleaseError, Result};
use crate::process::{render_command, CommandOutput, CommandRunner};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs commands as child processes of the current one
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        SystemCommandRunner
    }
}

impl CommandRunner for SystemCommandRunner {
    /// Execute the program and wait for it to finish
    ///
    /// # Returns
    /// * `Ok(CommandOutput)` once the process exits, whatever its status
    /// * `Err` if the program cannot be started (missing, not executable)
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let rendered = render_command(program, args);
        debug!(command = %rendered, ?cwd, "running");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            ReleaseError::command(rendered.clone(), None, format!("Failed to start: {}", e))
        })?;

        let output = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %rendered, code = ?output.code, "finished");

        Ok(output)
    }
}
