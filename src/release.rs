// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Draft release creation and asset upload.

use std::{path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;
use tracing::info;

use crate::{actions, error::Error, git, github::GitHubHost, glob, process};

/// Pause after creating a release so the upload endpoint can see it.
pub const RELEASE_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Returns `true` when `git ls-remote --tags` output lists `tag`.
pub fn remote_has_tag(ls_remote: &str, tag: &str) -> bool {
    let reference = format!("refs/tags/{tag}");
    ls_remote
        .lines()
        .any(|line| line.trim_end().ends_with(&reference))
}

/// Pushes `tag` from `workdir` when the remote lacks it and creates a draft
/// release for it.
///
/// # Errors
///
/// Returns [`Error::Process`] when a git command fails and propagates host
/// errors from release creation.
pub async fn create<H>(
    host: &H,
    workdir: &Path,
    tag: &str,
    title: &str,
    token: &str,
    repository: &str
) -> Result<(), Error>
where
    H: GitHubHost + ?Sized
{
    {
        let _group = actions::group("Setup git config");
        git::ensure_identity(workdir, token, repository)?;
        let config = process::run_in(workdir, "git", &["config", "-l"])?;
        info!("{config}");
    }

    {
        let _group = actions::group(&format!("Create tag {tag} if missing"));
        let remote_tags = process::run_in(workdir, "git", &["ls-remote", "--tags"])?;
        if remote_has_tag(&remote_tags, tag) {
            info!("Tag {tag} already exists on remote.");
        } else {
            process::run_in(workdir, "git", &["tag", tag])?;
            process::run_in(workdir, "git", &["push", "origin", tag])?;
        }
    }

    {
        let _group = actions::group(&format!("Create release {tag}"));
        host.create_release(tag, title)?;
    }

    info!("Waiting {}s for the release to settle ...", RELEASE_SETTLE_DELAY.as_secs());
    sleep(RELEASE_SETTLE_DELAY).await;
    Ok(())
}

/// Uploads every file matched by `patterns` to the release for `tag`.
///
/// Returns the number of uploaded files.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when a literal path is missing and propagates
/// upload failures.
pub fn upload_assets<H, S>(host: &H, tag: &str, patterns: &[S]) -> Result<usize, Error>
where
    H: GitHubHost + ?Sized,
    S: AsRef<str>
{
    let files = glob::expand_inputs(patterns)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .map_err(|e| Error::service(format!("invalid progress template: {e}")))?
    );

    for (index, file) in files.iter().enumerate() {
        spinner.set_message(format!(
            "Uploading {} ({}/{})",
            file.display(),
            index + 1,
            files.len()
        ));
        let _group = actions::group(&format!("Uploading asset, {}", file.display()));
        host.upload_asset(tag, file)?;
        spinner.tick();
    }

    spinner.finish_and_clear();
    info!("Uploaded {} asset(s) to release {tag}", files.len());
    Ok(files.len())
}
