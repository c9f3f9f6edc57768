use crate::error::Result;
use crate::process::{render_command, CommandOutput, CommandRunner};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A command seen by [RecordingRunner]
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub command: String,
    pub cwd: Option<PathBuf>,
}

/// Command runner for tests: records every invocation and answers from
/// canned responses instead of spawning processes.
///
/// Responses are matched by command-line prefix, latest registration first.
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    responses: RefCell<Vec<(String, CommandOutput)>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `output`
    pub fn respond(&self, prefix: &str, output: CommandOutput) {
        self.responses
            .borrow_mut()
            .push((prefix.to_string(), output));
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Rendered command lines, in call order
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.command.clone())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let command = render_command(program, args);
        self.invocations.borrow_mut().push(Invocation {
            command: command.clone(),
            cwd: cwd.map(Path::to_path_buf),
        });

        let output = self
            .responses
            .borrow()
            .iter()
            .rev()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::ok(""));

        Ok(output)
    }
}
