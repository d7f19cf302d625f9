//! End-to-end derivation: tool version, repository snapshot, version info,
//! linker settings.

use tracing::{info, instrument};

use crate::config::{LinkFlagsConfig, OutputFormat};
use crate::error::{LinkFlagsError, Result};
use crate::link_flags::{render, LinkFlagBuilder, LinkSetting};
use crate::repository::RepositoryInspector;
use crate::runner::CommandRunner;
use crate::tool_version::{ToolVersion, ToolVersionDetector};
use crate::version_info::VersionInfo;

/// Everything one run derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub info: VersionInfo,
    pub tool_version: ToolVersion,
    pub settings: Vec<LinkSetting>,
}

impl Derivation {
    /// Text to print for `format`.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Flags => Ok(render(&self.settings)),
            OutputFormat::Json => self.info.to_json_pretty(),
        }
    }
}

/// Derive the build identity of `config.repo_path`.
///
/// An undetectable tool version is fatal since the setting syntax cannot be
/// chosen; so are commit and tree-state failures. A failed describe only
/// empties the version (see [`crate::config::DescribePolicy`]).
#[instrument(skip_all, fields(repo = %config.repo_path.display()))]
pub fn derive<R: CommandRunner>(config: &LinkFlagsConfig, runner: &R) -> Result<Derivation> {
    let tool_version = ToolVersionDetector::go(runner, config.tool_program.as_str()).detect();
    if tool_version.is_unknown() {
        return Err(LinkFlagsError::UnknownToolVersion {
            tool: config.tool_program.clone(),
        });
    }

    let inspector = RepositoryInspector::new(runner, config.git_program.as_str(), &config.repo_path);
    let snapshot = inspector.snapshot(config.describe_policy)?;
    let info = VersionInfo::from_snapshot(&snapshot);

    let builder = LinkFlagBuilder::new(config.version_package.as_str(), tool_version);
    let settings = builder.build(&info);

    info!(
        version = %info.version,
        commit = %info.git_commit,
        tree_state = %info.git_tree_state,
        %tool_version,
        settings = settings.len(),
        "derived build identity"
    );

    Ok(Derivation {
        info,
        tool_version,
        settings,
    })
}
