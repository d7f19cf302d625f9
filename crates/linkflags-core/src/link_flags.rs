//! Go linker `-X` settings for the version package.

use std::fmt;

use crate::tool_version::ToolVersion;
use crate::version_info::VersionInfo;

/// Last encoded go version (1.4) whose linker only accepts `-X name value`.
pub const LEGACY_SYNTAX_MAX: ToolVersion = ToolVersion::from_encoded(14);

/// How a setting is written on the linker command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSyntax {
    /// `-X pkg.key value` (go 1.4 and earlier).
    Legacy,
    /// `-X pkg.key=value`.
    Assign,
}

impl LinkSyntax {
    pub fn for_tool(version: ToolVersion) -> Self {
        if version <= LEGACY_SYNTAX_MAX {
            LinkSyntax::Legacy
        } else {
            LinkSyntax::Assign
        }
    }
}

/// One `-X` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSetting {
    pub package: String,
    pub key: &'static str,
    pub value: String,
    pub syntax: LinkSyntax,
}

impl fmt::Display for LinkSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.syntax {
            LinkSyntax::Legacy => write!(f, "-X {}.{} {}", self.package, self.key, self.value),
            LinkSyntax::Assign => write!(f, "-X {}.{}={}", self.package, self.key, self.value),
        }
    }
}

/// Assembles the ordered settings for a version package.
#[derive(Debug, Clone)]
pub struct LinkFlagBuilder {
    package: String,
    syntax: LinkSyntax,
}

impl LinkFlagBuilder {
    pub fn new(package: impl Into<String>, tool_version: ToolVersion) -> Self {
        Self {
            package: package.into(),
            syntax: LinkSyntax::for_tool(tool_version),
        }
    }

    pub fn syntax(&self) -> LinkSyntax {
        self.syntax
    }

    /// `gitCommit` and `gitTreeState` when a commit is known, then `version`
    /// when non-empty. Nothing else is ever emitted.
    pub fn build(&self, info: &VersionInfo) -> Vec<LinkSetting> {
        let mut settings = Vec::with_capacity(3);
        if !info.git_commit.is_empty() {
            settings.push(self.setting("gitCommit", info.git_commit.clone()));
            settings.push(self.setting("gitTreeState", info.git_tree_state.to_string()));
        }
        if !info.version.is_empty() {
            settings.push(self.setting("version", info.version.clone()));
        }
        settings
    }

    fn setting(&self, key: &'static str, value: String) -> LinkSetting {
        LinkSetting {
            package: self.package.clone(),
            key,
            value,
            syntax: self.syntax,
        }
    }
}

/// Join formatted settings with single spaces.
pub fn render(settings: &[LinkSetting]) -> String {
    settings
        .iter()
        .map(LinkSetting::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
