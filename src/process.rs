//! Execution of synthesized tool commands.

use std::process::{Command, Stdio};

use crate::error::Error;
use crate::toolchain::CommandSpec;

/// Executes synthesized commands and reports their exit codes.
///
/// A spawn failure (the binary cannot be located or executed) is kept
/// distinct from a non-zero exit so callers can tell "tool missing" from
/// "tool failed". One call is one attempt; there are no retries.
pub trait CommandRunner {
    /// Print the command line, run it, wait, and return its exit code.
    fn run(&self, cmd: &CommandSpec) -> Result<i32, Error>;
}

/// Runner that spawns real child processes.
///
/// The child inherits our standard streams, so tool output stays visible
/// to the operator. The full command line is printed first; a failing
/// command is reproducible from the trace alone.
#[derive(Debug, Default)]
pub struct ExecRunner;

impl CommandRunner for ExecRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<i32, Error> {
        println!("{}", cmd.display_command());

        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        for (key, value) in &cmd.env {
            command.env(key, value);
        }
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = command.status().map_err(|source| Error::Spawn {
            program: cmd.program.display().to_string(),
            source,
        })?;

        // A signal-terminated child carries no code; report it as failed.
        Ok(status.code().unwrap_or(1))
    }
}

/// Runner that prints every command without spawning anything.
#[derive(Debug, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<i32, Error> {
        println!("{}", cmd.display_command());
        Ok(0)
    }
}
