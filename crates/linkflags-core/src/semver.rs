//! Rewriting `git describe` output into semver-compatible versions.
//!
//! `git describe --tags --abbrev=14` prints either a bare tag (`v1.2.0`) or
//! `<tag>-<count>-g<hash>` when commits exist past the tag. The latter is
//! rewritten to `<tag>.<count>+<hash>`; everything else passes through.

use std::fmt;

use crate::config::DESCRIBE_ABBREV;
use crate::error::DescribeError;
use crate::repository::TreeState;

/// Suffix appended to versions built from a dirty tree.
pub const DIRTY_SUFFIX: &str = "-dirty";

/// The three components of a `<tag>-<count>-g<hash>` describe string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescribeParts<'a> {
    /// Everything before the commit count; may itself contain dashes.
    pub tag: &'a str,
    /// Commits since `tag`, as the decimal digits git printed.
    pub commit_count: &'a str,
    /// Abbreviated commit hash, [`DESCRIBE_ABBREV`] lowercase hex digits.
    pub hash: &'a str,
}

impl<'a> DescribeParts<'a> {
    /// Parse from the end of `raw`: hash, `g`, `-`, digits, `-`, non-empty tag.
    pub fn parse(raw: &'a str) -> Result<Self, DescribeError> {
        let split = raw
            .len()
            .checked_sub(DESCRIBE_ABBREV)
            .filter(|&at| raw.is_char_boundary(at))
            .ok_or(DescribeError::Hash(DESCRIBE_ABBREV))?;
        let (rest, hash) = raw.split_at(split);
        if !hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(DescribeError::Hash(DESCRIBE_ABBREV));
        }

        let rest = rest.strip_suffix("-g").ok_or(DescribeError::HashMarker)?;

        let (tag, commit_count) = rest.rsplit_once('-').ok_or(DescribeError::CommitCount)?;
        if commit_count.is_empty() || !commit_count.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DescribeError::CommitCount);
        }
        if tag.is_empty() {
            return Err(DescribeError::Tag);
        }

        Ok(Self {
            tag,
            commit_count,
            hash,
        })
    }
}

impl fmt::Display for DescribeParts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}+{}", self.tag, self.commit_count, self.hash)
    }
}

/// Rewrite `<tag>-<count>-g<hash>` to `<tag>.<count>+<hash>`; return anything
/// else unchanged.
pub fn semverify(raw: &str) -> String {
    match DescribeParts::parse(raw) {
        Ok(parts) => parts.to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Version string for a describe output and tree state.
///
/// Empty input stays empty (no version is emitted downstream).
pub fn normalize(raw: &str, tree_state: TreeState) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut version = semverify(raw);
    if tree_state == TreeState::Dirty {
        version.push_str(DIRTY_SUFFIX);
    }
    version
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "abc12300000000";

    #[test]
    fn rewrites_tag_count_hash() {
        assert_eq!(
            semverify(&format!("v1.2.0-7-g{HASH}")),
            format!("v1.2.0.7+{HASH}")
        );
    }

    #[test]
    fn zero_commits_since_tag_still_matches() {
        assert_eq!(
            normalize("v1.2.0-0-gabc12300000000", TreeState::Clean),
            "v1.2.0.0+abc12300000000"
        );
    }

    #[test]
    fn tag_with_dashes_keeps_them() {
        let parts = DescribeParts::parse("release-2024-rc1-12-g0123456789abcd").unwrap();
        assert_eq!(parts.tag, "release-2024-rc1");
        assert_eq!(parts.commit_count, "12");
        assert_eq!(parts.hash, "0123456789abcd");
        assert_eq!(parts.to_string(), "release-2024-rc1.12+0123456789abcd");
    }

    #[test]
    fn exact_tag_passes_through() {
        assert_eq!(semverify("v1.2.0"), "v1.2.0");
        assert_eq!(normalize("v1.2.0", TreeState::Clean), "v1.2.0");
    }

    #[test]
    fn non_matching_shapes_pass_through() {
        for raw in [
            // hash too short
            "v1.0-3-gabc1230000000",
            // hash too long: git widened the abbreviation
            "v1.0-3-gabc123000000000",
            // uppercase hex
            "v1.0-3-gABC12300000000",
            // missing g marker
            "v1.0-3-abc12300000000",
            // non-digit count
            "v1.0-x3-gabc12300000000",
            // empty count
            "v1.0--gabc12300000000",
            // empty tag
            "-3-gabc12300000000",
            // no tag separator at all
            "3-gabc12300000000",
        ] {
            assert_eq!(semverify(raw), raw, "{raw} should pass through");
        }
    }

    #[test]
    fn parse_reports_which_part_is_missing() {
        assert_eq!(DescribeParts::parse("v1"), Err(DescribeError::Hash(14)));
        assert_eq!(
            DescribeParts::parse("v1.0-3-xabc12300000000"),
            Err(DescribeError::HashMarker)
        );
        assert_eq!(
            DescribeParts::parse("v1.0-3a-gabc12300000000"),
            Err(DescribeError::CommitCount)
        );
        assert_eq!(
            DescribeParts::parse("-3-gabc12300000000"),
            Err(DescribeError::Tag)
        );
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert_eq!(semverify("тег-ü"), "тег-ü");
        assert_eq!(
            semverify("версия-2-gabc12300000000"),
            "версия.2+abc12300000000"
        );
    }

    #[test]
    fn dirty_tree_appends_suffix() {
        assert_eq!(
            normalize(&format!("v1.2.0-0-g{HASH}"), TreeState::Dirty),
            format!("v1.2.0.0+{HASH}-dirty")
        );
        assert_eq!(normalize("v1.2.0", TreeState::Dirty), "v1.2.0-dirty");
    }

    #[test]
    fn empty_input_stays_empty_even_when_dirty() {
        assert_eq!(normalize("", TreeState::Clean), "");
        assert_eq!(normalize("", TreeState::Dirty), "");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        for raw in [
            format!("v1.2.0-7-g{HASH}"),
            "v1.2.0".to_string(),
            format!("a-1-b-2-g{HASH}"),
        ] {
            let once = semverify(&raw);
            assert_eq!(semverify(&once), once);

            let dirty = normalize(&raw, TreeState::Dirty);
            assert_eq!(semverify(&dirty), dirty);
        }
    }
}
