//! linkflags core library
//!
//! Derives a build identity (semver version, commit ID, tree state) from a git
//! working tree and renders it as Go linker `-X` settings.

pub mod config;
pub mod error;
pub mod fakes;
pub mod link_flags;
pub mod pipeline;
pub mod repository;
pub mod runner;
pub mod semver;
pub mod telemetry;
pub mod tool_version;
pub mod version_info;

pub use config::{
    DescribePolicy, LinkFlagsConfig, OutputFormat, DEFAULT_VERSION_PACKAGE, DESCRIBE_ABBREV,
};
pub use error::{
    DescribeError, LinkFlagsError, Result, ToolError, ToolFailure, ToolVersionError,
};
pub use link_flags::{render, LinkFlagBuilder, LinkSetting, LinkSyntax, LEGACY_SYNTAX_MAX};
pub use pipeline::{derive, Derivation};
pub use repository::{RepositoryInspector, RepositorySnapshot, TreeState};
pub use runner::{CommandRunner, SystemRunner};
pub use semver::{normalize, semverify, DescribeParts, DIRTY_SUFFIX};
pub use telemetry::init_tracing;
pub use tool_version::{parse_tool_version, ToolVersion, ToolVersionDetector};
pub use version_info::VersionInfo;

/// linkflags version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
