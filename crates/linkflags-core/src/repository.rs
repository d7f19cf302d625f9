//! Git integration for capturing repository state.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{DescribePolicy, DESCRIBE_ABBREV};
use crate::error::{LinkFlagsError, Result, ToolError};
use crate::runner::CommandRunner;

/// Whether the working tree matches its last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeState {
    Clean,
    Dirty,
}

impl TreeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeState::Clean => "clean",
            TreeState::Dirty => "dirty",
        }
    }
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time git state of a working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// Full commit ID of `HEAD`.
    pub commit_id: String,
    pub tree_state: TreeState,
    /// `git describe` output; empty when describe failed softly.
    pub raw_describe: String,
}

/// Runs git against one working tree.
///
/// Every call passes `--work-tree <path> --git-dir <path>/.git` so the
/// process working directory is irrelevant.
#[derive(Debug)]
pub struct RepositoryInspector<R> {
    runner: R,
    git: String,
    scope: Vec<OsString>,
}

impl<R: CommandRunner> RepositoryInspector<R> {
    pub fn new(runner: R, git: impl Into<String>, work_tree: &Path) -> Self {
        let scope = vec![
            OsString::from("--work-tree"),
            work_tree.as_os_str().to_owned(),
            OsString::from("--git-dir"),
            work_tree.join(".git").into_os_string(),
        ];
        Self {
            runner,
            git: git.into(),
            scope,
        }
    }

    /// Resolve `HEAD` to its full commit ID.
    pub fn commit_id(&self) -> std::result::Result<String, ToolError> {
        self.exec(&["rev-parse", "HEAD^{commit}"])
    }

    /// Clean iff `git status --porcelain` prints nothing.
    pub fn tree_state(&self) -> std::result::Result<TreeState, ToolError> {
        let out = self.exec(&["status", "--porcelain"])?;
        if out.is_empty() {
            Ok(TreeState::Clean)
        } else {
            Ok(TreeState::Dirty)
        }
    }

    /// Nearest reachable tag description for `commit_id`, hash abbreviated
    /// to [`DESCRIBE_ABBREV`] digits.
    pub fn describe(&self, commit_id: &str) -> std::result::Result<String, ToolError> {
        let abbrev = format!("--abbrev={DESCRIBE_ABBREV}");
        let rev = format!("{commit_id}^{{commit}}");
        self.exec(&["describe", "--tags", &abbrev, &rev])
    }

    /// Commit ID, tree state and describe output in one pass.
    ///
    /// Commit and tree-state failures are returned. A describe failure leaves
    /// `raw_describe` empty, except under [`DescribePolicy::Strict`] when git
    /// could not be started at all.
    pub fn snapshot(&self, policy: DescribePolicy) -> Result<RepositorySnapshot> {
        let commit_id = self.commit_id().map_err(LinkFlagsError::CommitId)?;
        let tree_state = self.tree_state().map_err(LinkFlagsError::TreeState)?;

        let raw_describe = match self.describe(&commit_id) {
            Ok(described) => described,
            Err(err) if policy == DescribePolicy::Strict && !err.is_exit_failure() => {
                return Err(LinkFlagsError::Describe(err));
            }
            Err(err) => {
                warn!(error = %err, "git describe failed, version will be empty");
                String::new()
            }
        };

        debug!(%commit_id, %tree_state, %raw_describe, "captured repository snapshot");
        Ok(RepositorySnapshot {
            commit_id,
            tree_state,
            raw_describe,
        })
    }

    /// Run git with the working-tree scope and return trimmed stdout.
    fn exec(&self, args: &[&str]) -> std::result::Result<String, ToolError> {
        let mut full = self.scope.clone();
        full.extend(args.iter().map(OsString::from));
        let out = self.runner.run(&self.git, &full)?;
        Ok(out.trim().to_string())
    }
}
