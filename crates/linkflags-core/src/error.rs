//! Error taxonomy for build identity derivation.

use std::fmt;

/// Why an external command did not produce a usable result.
#[derive(Debug, thiserror::Error)]
pub enum ToolFailure {
    /// The process could not be started (missing binary, permissions).
    #[error("failed to start: {0}")]
    Spawn(#[from] std::io::Error),

    /// The process ran and exited unsuccessfully.
    #[error("{0}")]
    Exit(ExitCode),
}

/// Exit code of a finished process; `None` when terminated by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit status {code}"),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// An external tool invocation failed.
#[derive(Debug, thiserror::Error)]
#[error("error executing `{tool}`: {failure} ({output})")]
pub struct ToolError {
    /// Program that was invoked.
    pub tool: String,
    /// Captured output of the failed call, folded onto one line (may be empty).
    pub output: String,
    /// Underlying cause.
    pub failure: ToolFailure,
}

impl ToolError {
    pub fn spawn(tool: impl Into<String>, err: std::io::Error) -> Self {
        Self {
            tool: tool.into(),
            output: String::new(),
            failure: ToolFailure::Spawn(err),
        }
    }

    pub fn exit(tool: impl Into<String>, code: Option<i32>, output: impl AsRef<str>) -> Self {
        Self {
            tool: tool.into(),
            output: single_line(output.as_ref()),
            failure: ToolFailure::Exit(ExitCode(code)),
        }
    }

    /// True when the tool ran and reported failure through its exit status.
    pub fn is_exit_failure(&self) -> bool {
        matches!(self.failure, ToolFailure::Exit(_))
    }
}

/// Fold multi-line tool output into one line, dropping blank lines.
fn single_line(output: &str) -> String {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A tool version token did not have the `<tool><major>.<minor>` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolVersionError {
    #[error("no `{prefix}<major>.<minor>` version in {token:?}")]
    NoVersion { prefix: String, token: String },

    #[error("version {major}.{minor} does not fit the encoding")]
    OutOfRange { major: String, minor: String },
}

/// A describe string did not match `<tag>-<count>-g<hash>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DescribeError {
    #[error("missing {0}-digit abbreviated hash")]
    Hash(usize),

    #[error("missing `-g` hash marker")]
    HashMarker,

    #[error("missing commit count")]
    CommitCount,

    #[error("missing tag before commit count")]
    Tag,
}

/// Fatal failures of a derivation run.
#[derive(Debug, thiserror::Error)]
pub enum LinkFlagsError {
    #[error("failed to determine {tool} tool version")]
    UnknownToolVersion { tool: String },

    #[error("failed to obtain git commit ID: {0}")]
    CommitId(ToolError),

    #[error("failed to determine git tree state: {0}")]
    TreeState(ToolError),

    #[error("failed to describe git commit: {0}")]
    Describe(ToolError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for derivation operations.
pub type Result<T> = std::result::Result<T, LinkFlagsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_display_carries_tool_cause_and_output() {
        let err = ToolError::exit("git", Some(128), "fatal: not a git repository");
        let msg = err.to_string();
        assert!(msg.contains("`git`"));
        assert!(msg.contains("exit status 128"));
        assert!(msg.contains("not a git repository"));
        assert!(err.is_exit_failure());
    }

    #[test]
    fn spawn_failure_is_not_an_exit_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ToolError::spawn("go", io);
        assert!(!err.is_exit_failure());
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn multi_line_output_is_folded_onto_one_line() {
        let output = "HEAD^{commit}\nfatal: ambiguous argument 'HEAD^{commit}'\n\nUse '--' to separate paths\n";
        let err = ToolError::exit("git", Some(128), output);
        assert_eq!(
            err.output,
            "HEAD^{commit}; fatal: ambiguous argument 'HEAD^{commit}'; Use '--' to separate paths"
        );
        assert_eq!(err.to_string().lines().count(), 1);

        let err = LinkFlagsError::CommitId(err);
        assert_eq!(err.to_string().lines().count(), 1);
    }

    #[test]
    fn signal_exit_display() {
        assert_eq!(ExitCode(None).to_string(), "terminated by signal");
    }

    #[test]
    fn fatal_errors_name_the_failing_step() {
        let err = LinkFlagsError::CommitId(ToolError::exit("git", Some(128), ""));
        assert!(err.to_string().starts_with("failed to obtain git commit ID"));

        let err = LinkFlagsError::UnknownToolVersion {
            tool: "go".to_string(),
        };
        assert_eq!(err.to_string(), "failed to determine go tool version");
    }
}
