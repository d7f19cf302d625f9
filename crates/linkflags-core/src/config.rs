//! Run configuration.
//!
//! A [`LinkFlagsConfig`] is built once at the program boundary (the CLI) and
//! passed by reference through the whole derivation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Go package whose variables receive the version settings.
pub const DEFAULT_VERSION_PACKAGE: &str = "github.com/gravitational/version";

/// Hex digits requested from `git describe --abbrev`.
///
/// The describe grammar in [`crate::semver`] expects exactly this width.
pub const DESCRIBE_ABBREV: usize = 14;

/// How a failing `git describe` is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescribePolicy {
    /// Any describe failure empties the version and the run continues.
    #[default]
    Lenient,
    /// Only a non-zero git exit empties the version; a git that cannot start is fatal.
    Strict,
}

/// What the run prints on success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Space-joined `-X` linker settings.
    #[default]
    Flags,
    /// The version info record as JSON.
    Json,
}

/// Immutable configuration for one derivation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFlagsConfig {
    /// Working tree to inspect; `<repo_path>/.git` is used as the git dir.
    pub repo_path: PathBuf,

    /// Import path of the package the `-X` settings target.
    pub version_package: String,

    /// git executable.
    pub git_program: String,

    /// go executable whose version selects the setting syntax.
    pub tool_program: String,

    pub describe_policy: DescribePolicy,

    pub format: OutputFormat,
}

impl LinkFlagsConfig {
    /// Configuration with defaults for everything but the working tree.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            version_package: DEFAULT_VERSION_PACKAGE.to_string(),
            git_program: "git".to_string(),
            tool_program: "go".to_string(),
            describe_policy: DescribePolicy::default(),
            format: OutputFormat::default(),
        }
    }

    pub fn with_version_package(mut self, package: impl Into<String>) -> Self {
        self.version_package = package.into();
        self
    }

    pub fn with_git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = program.into();
        self
    }

    pub fn with_tool_program(mut self, program: impl Into<String>) -> Self {
        self.tool_program = program.into();
        self
    }

    pub fn with_describe_policy(mut self, policy: DescribePolicy) -> Self {
        self.describe_policy = policy;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
