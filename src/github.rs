// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Source host operations used by the release commands.
//!
//! [`GitHubHost`] is the seam between decision logic and the `gh` CLI. The
//! production implementation shells out through [`crate::process`]; tests
//! substitute an in-memory host.

use std::path::Path;

use serde::Deserialize;
use serde_json::Deserializer;
use tracing::debug;

use crate::{error::Error, process};

/// Login of the bot account that owns automation branches and commits.
pub const ACTIONS_BOT: &str = "github-actions[bot]";

/// Published release as reported by `gh release list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Tag the release points at.
    #[serde(rename = "tagName")]
    pub tag_name:  String,
    /// Whether the release is flagged as latest.
    #[serde(rename = "isLatest")]
    pub is_latest: bool
}

/// Operations against the repository host.
pub trait GitHubHost {
    /// Lists published, non-prerelease releases.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot be queried.
    fn releases(&self) -> Result<Vec<Release>, Error>;

    /// Name of the repository default branch.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot be queried.
    fn default_branch(&self) -> Result<String, Error>;

    /// Names of every branch in the repository.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot be queried.
    fn branch_names(&self) -> Result<Vec<String>, Error>;

    /// Account login of the last commit author on `branch`, if GitHub knows it.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot be queried.
    fn branch_author(&self, branch: &str) -> Result<Option<String>, Error>;

    /// Deletes `branch` from the remote.
    ///
    /// # Errors
    ///
    /// Returns an error when the deletion is rejected.
    fn delete_branch(&self, branch: &str) -> Result<(), Error>;

    /// Creates a draft release for an existing tag with generated notes.
    ///
    /// # Errors
    ///
    /// Returns an error when the release cannot be created.
    fn create_release(&self, tag: &str, title: &str) -> Result<(), Error>;

    /// Uploads `path` as an asset of the release for `tag`.
    ///
    /// # Errors
    ///
    /// Returns an error when the upload fails.
    fn upload_asset(&self, tag: &str, path: &Path) -> Result<(), Error>;
}

/// [`GitHubHost`] backed by the `gh` CLI.
///
/// `gh` picks up `GH_TOKEN` and `GH_REPO` from the environment for commands
/// that do not take an explicit repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhCli {
    repository: String
}

impl GhCli {
    /// Targets `repository` in `owner/name` form.
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into()
        }
    }

    /// Repository this client targets.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn api(&self, args: &[&str]) -> Result<String, Error> {
        let mut full = vec!["api"];
        full.extend_from_slice(args);
        process::run("gh", &full)
    }
}

#[derive(Deserialize)]
struct RepositoryInfo {
    default_branch: String
}

#[derive(Deserialize)]
struct BranchSummary {
    name: String
}

#[derive(Deserialize)]
struct BranchDetail {
    commit: BranchCommit
}

/// Commit as returned by the branches endpoint.
///
/// `author` is the GitHub account linked to the commit, not the free-text
/// git author name, and is null when no account matches.
#[derive(Deserialize)]
struct BranchCommit {
    author: Option<AccountRef>
}

#[derive(Deserialize)]
struct AccountRef {
    login: String
}

impl GitHubHost for GhCli {
    fn releases(&self) -> Result<Vec<Release>, Error> {
        let stdout = process::run(
            "gh",
            &[
                "release",
                "list",
                "--exclude-drafts",
                "--exclude-pre-releases",
                "--json",
                "tagName,isLatest"
            ]
        )?;
        parse_releases(&stdout)
    }

    fn default_branch(&self) -> Result<String, Error> {
        let stdout = self.api(&[&format!("/repos/{}", self.repository)])?;
        let info: RepositoryInfo = serde_json::from_str(&stdout)?;
        Ok(info.default_branch)
    }

    fn branch_names(&self) -> Result<Vec<String>, Error> {
        let stdout = self.api(&["--paginate", &format!("/repos/{}/branches", self.repository)])?;
        parse_branch_pages(&stdout)
    }

    fn branch_author(&self, branch: &str) -> Result<Option<String>, Error> {
        let stdout = self.api(&[&format!("/repos/{}/branches/{branch}", self.repository)])?;
        parse_branch_author(&stdout)
    }

    fn delete_branch(&self, branch: &str) -> Result<(), Error> {
        self.api(&[
            "-X",
            "DELETE",
            &format!("/repos/{}/git/refs/heads/{branch}", self.repository)
        ])
        .map(|_| ())
    }

    fn create_release(&self, tag: &str, title: &str) -> Result<(), Error> {
        process::run(
            "gh",
            &[
                "release",
                "create",
                tag,
                "--draft",
                "--verify-tag",
                "--title",
                title,
                "--generate-notes"
            ]
        )
        .map(|_| ())
    }

    fn upload_asset(&self, tag: &str, path: &Path) -> Result<(), Error> {
        let path = path.to_string_lossy();
        process::run("gh", &["release", "upload", tag, &path]).map(|_| ())
    }
}

fn parse_releases(stdout: &str) -> Result<Vec<Release>, Error> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(stdout)?)
}

/// `gh api --paginate` prints each page as its own JSON array back to back.
fn parse_branch_pages(stdout: &str) -> Result<Vec<String>, Error> {
    let mut names = Vec::new();
    for page in Deserializer::from_str(stdout).into_iter::<Vec<BranchSummary>>() {
        names.extend(page?.into_iter().map(|branch| branch.name));
    }
    debug!("found {} branch(es)", names.len());
    Ok(names)
}

fn parse_branch_author(stdout: &str) -> Result<Option<String>, Error> {
    let detail: BranchDetail = serde_json::from_str(stdout)?;
    Ok(detail.commit.author.map(|author| author.login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_parse_gh_json() {
        let releases = parse_releases(
            r#"[{"isLatest":false,"tagName":"1.2.9"},{"isLatest":true,"tagName":"1.2.10"}]"#
        )
        .expect("parse");

        assert_eq!(releases.len(), 2);
        assert_eq!(
            releases[1],
            Release {
                tag_name:  "1.2.10".to_string(),
                is_latest: true
            }
        );
    }

    #[test]
    fn empty_release_list_is_allowed() {
        assert!(parse_releases("").expect("empty").is_empty());
        assert!(parse_releases("[]").expect("empty array").is_empty());
    }

    #[test]
    fn paginated_branches_are_concatenated() {
        let names = parse_branch_pages(
            r#"[{"name":"main"},{"name":"test-release/1.0.0"}][{"name":"feature/x"}]"#
        )
        .expect("parse");
        assert_eq!(names, vec!["main", "test-release/1.0.0", "feature/x"]);
    }

    #[test]
    fn paginated_branches_accept_whitespace_between_pages() {
        let names = parse_branch_pages("[{\"name\":\"a\"}]\n[{\"name\":\"b\"}]\n").expect("parse");
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn malformed_branch_page_is_an_error() {
        assert!(parse_branch_pages("[{\"name\":").is_err());
    }

    #[test]
    fn branch_author_reads_account_login() {
        let author = parse_branch_author(
            r#"{"name":"b","commit":{"sha":"abc","author":{"login":"github-actions[bot]","id":41898282},"commit":{"author":{"name":"github-actions[bot]","email":"x"}}}}"#
        )
        .expect("parse");
        assert_eq!(author.as_deref(), Some(ACTIONS_BOT));
    }

    #[test]
    fn branch_author_ignores_git_author_name() {
        let author = parse_branch_author(
            r#"{"commit":{"author":{"login":"mallory"},"commit":{"author":{"name":"github-actions[bot]"}}}}"#
        )
        .expect("parse");
        assert_eq!(author.as_deref(), Some("mallory"));
    }

    #[test]
    fn branch_author_may_be_null() {
        let author = parse_branch_author(
            r#"{"commit":{"author":null,"commit":{"author":{"name":"someone"}}}}"#
        )
        .expect("parse");
        assert_eq!(author, None);

        let missing = parse_branch_author(r#"{"commit":{"sha":"abc"}}"#).expect("parse");
        assert_eq!(missing, None);
    }

    #[test]
    fn gh_cli_keeps_repository() {
        assert_eq!(GhCli::new("owner/repo").repository(), "owner/repo");
    }
}
