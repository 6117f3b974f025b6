// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Release tag validation.
//!
//! A new tag is rejected when it would move the release line backwards
//! relative to the release currently flagged as latest.

use std::cmp::Ordering;

use semver::Version;
use tracing::info;

use crate::{error::Error, github::GitHubHost};

/// Outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCheck {
    /// The repository is configured to skip validation.
    Skipped,
    /// The repository has no latest release to compare with.
    NoRelease,
    /// The tag is equal to or newer than `latest`.
    Accepted {
        /// Tag of the current latest release.
        latest: String
    }
}

/// Strips one leading `v` from `tag`.
///
/// # Example
///
/// ```
/// use release_actions::validate_tag::normalize;
///
/// assert_eq!(normalize("v1.2.3"), "1.2.3");
/// assert_eq!(normalize("1.2.3"), "1.2.3");
/// ```
pub fn normalize(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// Validates `tag` against the latest release of `repository`.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the tag is empty, when releases cannot
/// be listed, or when the tag is older than the latest release.
pub fn validate<H, S>(
    host: &H,
    tag: &str,
    repository: &str,
    skip_repositories: &[S]
) -> Result<TagCheck, Error>
where
    H: GitHubHost + ?Sized,
    S: AsRef<str>
{
    if tag.is_empty() {
        return Err(Error::validation("Tag is invalid, empty string is not allowed."));
    }

    if skip_repositories
        .iter()
        .any(|skipped| skipped.as_ref() == repository)
    {
        info!("Validation skipped for repository {repository}.");
        return Ok(TagCheck::Skipped);
    }

    let releases = host.releases().map_err(|e| {
        Error::validation(format!("Failed to get latest release tag. error: {e}"))
    })?;

    let Some(latest) = releases.into_iter().find(|release| release.is_latest) else {
        info!("No latest release found, tag {tag} accepted.");
        return Ok(TagCheck::NoRelease);
    };
    let latest = latest.tag_name;

    let candidate = normalize(tag);
    let current = normalize(&latest);
    if compare_versions(candidate, current) == Ordering::Less {
        return Err(Error::validation(format!(
            "Tag is invalid, reverting to old version. Please bump the version. tag: {tag}, latest release: {latest}"
        )));
    }

    info!("Tag {tag} is same or newer than latest release {latest}.");
    Ok(TagCheck::Accepted {
        latest
    })
}

/// Orders two version strings.
///
/// Semantic versions are compared by precedence; anything else falls back to
/// natural ordering where digit runs compare numerically.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    match (Version::parse(left), Version::parse(right)) {
        (Ok(left), Ok(right)) => left.cmp_precedence(&right),
        _ => natural_cmp(left, right)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str)
}

fn chunks(input: &str) -> Vec<Chunk<'_>> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut digits = None;

    for (index, ch) in input.char_indices() {
        let is_digit = ch.is_ascii_digit();
        match digits {
            Some(previous) if previous != is_digit => {
                result.push(chunk(&input[start..index], previous));
                start = index;
            }
            _ => {}
        }
        digits = Some(is_digit);
    }
    if let Some(is_digit) = digits {
        result.push(chunk(&input[start..], is_digit));
    }
    result
}

fn chunk(text: &str, is_digit: bool) -> Chunk<'_> {
    if is_digit { Chunk::Digits(text) } else { Chunk::Text(text) }
}

fn compare_digits(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

fn natural_cmp(left: &str, right: &str) -> Ordering {
    let left_chunks = chunks(left);
    let right_chunks = chunks(right);

    for (a, b) in left_chunks.iter().zip(&right_chunks) {
        let ordering = match (a, b) {
            (Chunk::Digits(a), Chunk::Digits(b)) => compare_digits(a, b),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left_chunks.len().cmp(&right_chunks.len())
}
