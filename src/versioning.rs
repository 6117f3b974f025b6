// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Next-version computation for `increment-version`.

use std::fmt;

use clap::ValueEnum;
use semver::Version;

use crate::error::Error;

/// Version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionIncrement {
    /// First component.
    Major,
    /// Second component.
    Minor,
    /// Third component.
    Patch
}

impl fmt::Display for VersionIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch"
        };
        f.write_str(name)
    }
}

/// Increments one component of `tag`.
///
/// `prefix` and `suffix` are stripped before parsing when present and always
/// wrapped around the result. Only the selected component changes: the others
/// keep their current value.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an empty tag or a version that is not
/// plain `MAJOR.MINOR.PATCH`.
///
/// # Example
///
/// ```
/// use release_actions::versioning::{VersionIncrement, increment};
///
/// let next = increment("v1.2.3", VersionIncrement::Minor, "v", "")?;
/// assert_eq!(next, "v1.3.3");
/// # Ok::<(), release_actions::Error>(())
/// ```
pub fn increment(
    tag: &str,
    kind: VersionIncrement,
    prefix: &str,
    suffix: &str
) -> Result<String, Error> {
    if tag.is_empty() {
        return Err(Error::validation("Tag is empty, please specify a version tag."));
    }

    let mut core = tag;
    if !prefix.is_empty()
        && let Some(stripped) = core.strip_prefix(prefix)
    {
        core = stripped;
    }
    if !suffix.is_empty()
        && let Some(stripped) = core.strip_suffix(suffix)
    {
        core = stripped;
    }

    let version = parse_plain(core)?;
    let next = match kind {
        VersionIncrement::Major => Version::new(version.major + 1, version.minor, version.patch),
        VersionIncrement::Minor => Version::new(version.major, version.minor + 1, version.patch),
        VersionIncrement::Patch => Version::new(version.major, version.minor, version.patch + 1)
    };

    Ok(format!("{prefix}{next}{suffix}"))
}

fn parse_plain(input: &str) -> Result<Version, Error> {
    let invalid = || {
        Error::validation(format!(
            "Invalid version '{input}', expected MAJOR.MINOR.PATCH."
        ))
    };

    let version = Version::parse(input).map_err(|_| invalid())?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return Err(invalid());
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn increments_single_component() {
        assert_eq!(increment("0.1.0", VersionIncrement::Major, "", "").expect("major"), "1.1.0");
        assert_eq!(increment("0.1.0", VersionIncrement::Minor, "", "").expect("minor"), "0.2.0");
        assert_eq!(increment("0.1.0", VersionIncrement::Patch, "", "").expect("patch"), "0.1.1");
    }

    #[test]
    fn prefix_and_suffix_are_preserved() {
        assert_eq!(
            increment("v1.2.3-beta", VersionIncrement::Patch, "v", "-beta").expect("patch"),
            "v1.2.4-beta"
        );
    }

    #[test]
    fn prefix_is_added_when_missing() {
        assert_eq!(increment("1.2.3", VersionIncrement::Minor, "v", "").expect("minor"), "v1.3.3");
    }

    #[test]
    fn empty_tag_is_rejected() {
        let error = increment("", VersionIncrement::Patch, "", "").expect_err("empty");
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn non_plain_versions_are_rejected() {
        for tag in ["1.2", "1.2.3.4", "abc", "1.2.3-rc.1", "1.2.3+build"] {
            assert!(increment(tag, VersionIncrement::Patch, "", "").is_err(), "{tag}");
        }
    }

    #[test]
    fn display_matches_cli_names() {
        assert_eq!(VersionIncrement::Major.to_string(), "major");
        assert_eq!(VersionIncrement::Patch.to_string(), "patch");
    }

    proptest! {
        #[test]
        fn patch_increment_is_strictly_greater(major in 0u64..1000, minor in 0u64..1000, patch in 0u64..1000) {
            let tag = format!("{major}.{minor}.{patch}");
            let next = increment(&tag, VersionIncrement::Patch, "", "").expect("patch");
            let current = Version::new(major, minor, patch);
            let next = Version::parse(&next).expect("parse");
            prop_assert!(next > current);
        }
    }
}
