//! Go tool version detection.
//!
//! The version is encoded as `major * 10 + minor` (`go1.4.3` is 14, `go1.21.3`
//! is 31) so the setting syntax can be chosen with a single comparison.

use std::ffi::OsString;
use std::fmt;

use tracing::{debug, warn};

use crate::error::ToolVersionError;
use crate::runner::CommandRunner;

/// Encoded build tool version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ToolVersion(u32);

impl ToolVersion {
    /// Version could not be determined.
    pub const UNKNOWN: ToolVersion = ToolVersion(0);

    /// Wrap an already encoded `major * 10 + minor` value.
    pub const fn from_encoded(value: u32) -> Self {
        ToolVersion(value)
    }

    pub fn new(major: u32, minor: u32) -> Option<Self> {
        major.checked_mul(10)?.checked_add(minor).map(ToolVersion)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            f.write_str("unknown")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Find `<prefix><major>.<minor>` in `token` and encode it.
///
/// `major` is a single digit from 1 to 9, so `go10.5` has no version.
/// Anything after the minor component (patch, pre-release tags) is ignored.
pub fn parse_tool_version(token: &str, prefix: &str) -> Result<ToolVersion, ToolVersionError> {
    for (at, _) in token.match_indices(prefix) {
        let rest = &token[at + prefix.len()..];
        let Some((major, rest)) = major_digit(rest) else {
            continue;
        };
        let Some(rest) = rest.strip_prefix('.') else {
            continue;
        };
        let Some((minor, _)) = leading_digits(rest) else {
            continue;
        };

        let out_of_range = || ToolVersionError::OutOfRange {
            major: major.to_string(),
            minor: minor.to_string(),
        };
        let major_num: u32 = major.parse().map_err(|_| out_of_range())?;
        let minor_num: u32 = minor.parse().map_err(|_| out_of_range())?;
        return ToolVersion::new(major_num, minor_num).ok_or_else(out_of_range);
    }

    Err(ToolVersionError::NoVersion {
        prefix: prefix.to_string(),
        token: token.to_string(),
    })
}

/// Split a non-empty run of ASCII digits off the front of `s`.
fn major_digit(s: &str) -> Option<(&str, &str)> {
    s.starts_with(|c: char| matches!(c, '1'..='9')).then(|| s.split_at(1))
}

fn leading_digits(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (end > 0).then(|| s.split_at(end))
}

/// Queries the go tool for its version.
#[derive(Debug)]
pub struct ToolVersionDetector<R> {
    runner: R,
    program: String,
    prefix: String,
}

impl<R: CommandRunner> ToolVersionDetector<R> {
    /// Detector for the go tool at `program`.
    pub fn go(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            prefix: "go".to_string(),
        }
    }

    /// Run `<program> version` and encode the reported version.
    ///
    /// Returns [`ToolVersion::UNKNOWN`] when the command fails or its report
    /// cannot be parsed; callers decide whether that is fatal.
    pub fn detect(&self) -> ToolVersion {
        let report = match self.runner.run(&self.program, &[OsString::from("version")]) {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "tool version query failed");
                return ToolVersion::UNKNOWN;
            }
        };

        // `go version go1.21.3 linux/amd64`: the version is the third field.
        let Some(token) = report.split_whitespace().nth(2) else {
            warn!(report = report.trim(), "tool version report too short");
            return ToolVersion::UNKNOWN;
        };

        match parse_tool_version(token, &self.prefix) {
            Ok(version) => {
                debug!(token, %version, "detected tool version");
                version
            }
            Err(err) => {
                warn!(error = %err, "unparseable tool version");
                ToolVersion::UNKNOWN
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}
