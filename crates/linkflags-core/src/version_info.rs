//! The derived build identity.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::repository::{RepositorySnapshot, TreeState};
use crate::semver::normalize;

/// Version, commit and tree state embedded into a build.
///
/// Serializes with the field names the Go version package uses
/// (`version`, `gitCommit`, `gitTreeState`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    /// Semver-like version; empty when no tag could be described.
    pub version: String,
    /// Full commit ID.
    pub git_commit: String,
    pub git_tree_state: TreeState,
}

impl VersionInfo {
    /// Normalize the describe output of `snapshot` into a version.
    pub fn from_snapshot(snapshot: &RepositorySnapshot) -> Self {
        Self {
            version: normalize(&snapshot.raw_describe, snapshot.tree_state),
            git_commit: snapshot.commit_id.clone(),
            git_tree_state: snapshot.tree_state,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(describe: &str, tree_state: TreeState) -> RepositorySnapshot {
        RepositorySnapshot {
            commit_id: "0123456789abcdef0123456789abcdef01234567".to_string(),
            tree_state,
            raw_describe: describe.to_string(),
        }
    }

    #[test]
    fn from_snapshot_normalizes_describe() {
        let info = VersionInfo::from_snapshot(&snapshot("v2.0.1-4-g00112233445566", TreeState::Dirty));
        assert_eq!(info.version, "v2.0.1.4+00112233445566-dirty");
        assert_eq!(info.git_tree_state, TreeState::Dirty);
    }

    #[test]
    fn empty_describe_gives_empty_version() {
        let info = VersionInfo::from_snapshot(&snapshot("", TreeState::Dirty));
        assert!(info.version.is_empty());
        assert!(!info.git_commit.is_empty());
    }

    #[test]
    fn json_uses_go_field_names() {
        let info = VersionInfo::from_snapshot(&snapshot("v1.0.0", TreeState::Clean));
        let value: serde_json::Value = serde_json::from_str(&info.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["version"], "v1.0.0");
        assert_eq!(value["gitCommit"], "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(value["gitTreeState"], "clean");
    }
}
