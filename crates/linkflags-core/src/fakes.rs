//! In-memory fakes for the command runner (testing only)
//!
//! [`ScriptedRunner`] answers commands from a table of canned responses and
//! records every invocation, so inspector/detector behaviour can be tested
//! without git or go installed.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::sync::Mutex;

use crate::error::ToolError;
use crate::runner::CommandRunner;

#[derive(Debug, Clone)]
enum Response {
    Stdout(String),
    Exit { code: i32, output: String },
    Missing,
}

/// Command runner that replays scripted responses keyed by the full command line.
///
/// Keys are the program followed by its arguments, joined by single spaces,
/// e.g. `"go version"`. Arguments that are not valid UTF-8 are keyed by their
/// lossy form. Commands without a script fail as if the program
/// could not be found.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, Response>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Succeed with `stdout`.
    pub fn ok(mut self, command: &str, stdout: &str) -> Self {
        self.responses
            .insert(command.to_string(), Response::Stdout(stdout.to_string()));
        self
    }

    /// Exit with `code`, capturing `output`.
    pub fn fail(mut self, command: &str, code: i32, output: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            Response::Exit {
                code,
                output: output.to_string(),
            },
        );
        self
    }

    /// Fail to start, as if the program were absent.
    pub fn missing(mut self, command: &str) -> Self {
        self.responses.insert(command.to_string(), Response::Missing);
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<String, ToolError> {
        let line = std::iter::once(Cow::Borrowed(program))
            .chain(args.iter().map(|arg| arg.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());

        match self.responses.get(&line) {
            Some(Response::Stdout(out)) => Ok(out.clone()),
            Some(Response::Exit { code, output }) => {
                Err(ToolError::exit(program, Some(*code), output))
            }
            Some(Response::Missing) | None => Err(ToolError::spawn(
                program,
                io::Error::new(io::ErrorKind::NotFound, format!("no script for `{line}`")),
            )),
        }
    }
}
