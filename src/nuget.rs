// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Package publishing with `dotnet nuget push`.

use std::path::PathBuf;

use tracing::info;

use crate::{actions, error::Error, glob, process};

/// Public NuGet feed.
pub const DEFAULT_SOURCE: &str = "https://api.nuget.org/v3/index.json";

/// Builds the `dotnet` arguments pushing `path` to `source`.
pub fn push_args(path: &str, source: &str, api_key: &str) -> Vec<String> {
    [
        "nuget",
        "push",
        path,
        "--skip-duplicate",
        "-s",
        source,
        "-k",
        api_key
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Pushes every package matched by `patterns`.
///
/// The API key is registered as a runner secret and redacted from every log
/// line. In dry-run mode the commands are only logged. Returns the packages
/// that were pushed (or would have been).
///
/// # Errors
///
/// Returns [`Error::NotFound`] for a missing literal path and
/// [`Error::Process`] when a push fails.
pub fn push<S>(
    patterns: &[S],
    api_key: &str,
    source: &str,
    dry_run: bool
) -> Result<Vec<PathBuf>, Error>
where
    S: AsRef<str>
{
    actions::mask(api_key);
    let packages = glob::expand_inputs(patterns)?;

    for package in &packages {
        let path = package.to_string_lossy();
        let args = push_args(&path, source, api_key);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let _group = actions::group(&format!("Pushing package, {path}"));
        if dry_run {
            info!("Dry run, skipping: {}", process::command_line("dotnet", &args, Some(api_key)));
            continue;
        }
        let output = process::run_redacted("dotnet", &args, api_key)?;
        info!("{output}");
    }

    Ok(packages)
}
