//! External command execution
//!
//! Every call to an outside tool (`git` porcelain, `pnpm`, the watch-build
//! command) goes through [CommandRunner], so workflows can be exercised with
//! [mock::RecordingRunner] instead of spawning processes.

pub mod executor;
pub mod mock;

pub use executor::SystemCommandRunner;
pub use mock::RecordingRunner;

use crate::error::{ReleaseError, Result};
use std::path::Path;

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, as a terminal would have shown them
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// Render a command line for messages and logs
pub fn render_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs external programs
pub trait CommandRunner {
    /// Run `program` with `args`, in `cwd` when given, and capture its output.
    ///
    /// A non-zero exit is not an error here; only failing to start is.
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput>;

    /// Like [CommandRunner::run], but a non-zero exit becomes
    /// [ReleaseError::Command] carrying the tool's output.
    fn run_checked(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<CommandOutput> {
        let output = self.run(program, args, cwd)?;
        if output.success() {
            Ok(output)
        } else {
            Err(ReleaseError::command(
                render_command(program, args),
                output.code,
                output.combined(),
            ))
        }
    }
}
