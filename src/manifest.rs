// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Version bumps for package manifests.
//!
//! Each supported manifest is updated with a targeted regular expression so
//! formatting, comments and key order survive untouched. The rewritten text is
//! then parsed with a format-aware reader to prove the file is still valid and
//! carries the requested version before anything is reported as done.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::{
    actions,
    error::Error,
    regex_replace::{self, Replaced}
};

/// Supported manifest formats, selected by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// Unity package manager `package.json`.
    UnityPackage,
    /// Godot add-on `plugin.cfg`.
    GodotPlugin,
    /// MSBuild `Directory.Build.props`.
    DirectoryBuildProps
}

impl ManifestKind {
    /// Maps a manifest path to its kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedManifest`] for unknown file names.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match file_name.as_str() {
            "package.json" => Ok(Self::UnityPackage),
            "plugin.cfg" => Ok(Self::GodotPlugin),
            "Directory.Build.props" => Ok(Self::DirectoryBuildProps),
            _ => Err(Error::UnsupportedManifest {
                file_name
            })
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::UnityPackage => r#""version":\s*"(.*?)""#,
            Self::GodotPlugin => r#"(version=)"(.*?)""#,
            Self::DirectoryBuildProps => r"<VersionPrefix>.*</VersionPrefix>"
        }
    }

    fn replacement(self, version: &str) -> String {
        let escaped = version.replace('$', "$$");
        match self {
            Self::UnityPackage => format!(r#""version": "{escaped}""#),
            Self::GodotPlugin => format!(r#"${{1}}"{escaped}""#),
            Self::DirectoryBuildProps => format!("<VersionPrefix>{escaped}</VersionPrefix>")
        }
    }

    /// Checks that `contents` is well formed and carries `version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] describing the mismatch.
    pub fn validate(self, contents: &str, version: &str) -> Result<(), Error> {
        match self {
            Self::UnityPackage => validate_unity_package(contents, version),
            Self::GodotPlugin => validate_godot_plugin(contents, version),
            Self::DirectoryBuildProps => validate_directory_build_props(contents, version)
        }
    }
}

/// Outcome of updating a single manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    /// Manifest that was processed.
    pub path:   PathBuf,
    /// Contents before the update.
    pub before: String,
    /// Contents after the update.
    pub after:  String
}

/// Rewrites the version of a single manifest and validates the result.
///
/// With `dry_run` the file on disk is left untouched.
///
/// # Errors
///
/// Returns [`Error::UnsupportedManifest`] for unknown file names,
/// [`Error::Io`] when the file cannot be accessed and [`Error::Validation`]
/// when the rewritten contents are invalid.
pub fn update_version(path: &Path, version: &str, dry_run: bool) -> Result<UpdateResult, Error> {
    let kind = ManifestKind::from_path(path)?;

    // Validation runs on the in-memory result first so a broken rewrite is
    // never persisted.
    let Replaced {
        before,
        after
    } = regex_replace::replace_file(path, kind.pattern(), &kind.replacement(version), false)?;
    kind.validate(&after, version)?;

    if !dry_run {
        std::fs::write(path, &after).map_err(|source| crate::error::io_error(path, source))?;
    }

    Ok(UpdateResult {
        path: path.to_path_buf(),
        before,
        after
    })
}

/// Updates every manifest in `paths` to `version`.
///
/// Blank entries are skipped. The contents before and after each update are
/// logged inside collapsible groups.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for a path that does not exist and propagates
/// errors from [`update_version`].
///
/// # Example
///
/// ```no_run
/// use release_actions::manifest::update_versions;
///
/// # fn example() -> Result<(), release_actions::Error> {
/// let results = update_versions(&["./package.json", "./plugin.cfg"], "1.2.0", true)?;
/// for result in results {
///     println!("{}:\n{}", result.path.display(), result.after);
/// }
/// # Ok(())
/// # }
/// ```
pub fn update_versions<S>(
    paths: &[S],
    version: &str,
    dry_run: bool
) -> Result<Vec<UpdateResult>, Error>
where
    S: AsRef<str>
{
    let mut results = Vec::with_capacity(paths.len());

    for raw in paths {
        let raw = raw.as_ref();
        if raw.trim().is_empty() {
            info!("Empty path detected, skip execution.");
            continue;
        }

        let path = Path::new(raw);
        if !path.is_file() {
            return Err(Error::not_found(raw));
        }

        info!("Update begin, {raw} ...");
        let result = update_version(path, version, dry_run)?;
        {
            let _group = actions::group(&format!("Before, {raw}"));
            info!("{}", result.before);
        }
        {
            let _group = actions::group(&format!("After, {raw}"));
            info!("{}", result.after);
        }

        results.push(result);
    }

    Ok(results)
}

#[derive(Deserialize)]
struct UnityPackage {
    version: Option<String>
}

fn validate_unity_package(contents: &str, version: &str) -> Result<(), Error> {
    let package: UnityPackage = serde_json::from_str(contents).map_err(|e| {
        Error::validation(format!(
            "UPM package.json updated, but failed to load as valid JSON: {e}"
        ))
    })?;

    match package.version.as_deref() {
        Some(actual) if actual == version => Ok(()),
        actual => Err(Error::validation(format!(
            "UPM package.json updated, but version mismatch. actual {}, expected {version}",
            actual.unwrap_or("<missing>")
        )))
    }
}

fn validate_godot_plugin(contents: &str, version: &str) -> Result<(), Error> {
    let expected = format!("\"{version}\"");

    for line in contents.lines() {
        if !line.starts_with("version=") {
            continue;
        }
        let Some((_, value)) = line.split_once('=') else {
            continue;
        };

        let value = value.trim();
        if value != expected {
            return Err(Error::validation(format!(
                "Godot plugin.cfg updated, but version mismatch. actual {value}, expected {version}"
            )));
        }
        return Ok(());
    }

    Err(Error::validation(
        "Godot plugin.cfg updated, but version key not found."
    ))
}

fn validate_directory_build_props(contents: &str, version: &str) -> Result<(), Error> {
    let document = roxmltree::Document::parse(contents).map_err(|e| {
        Error::validation(format!(
            "Directory.Build.props updated, but failed to load as valid XML: {e}"
        ))
    })?;

    let node = document
        .descendants()
        .find(|node| node.has_tag_name("VersionPrefix"))
        .ok_or_else(|| {
            Error::validation("Directory.Build.props updated, but VersionPrefix key not found.")
        })?;

    let actual = node.text().unwrap_or_default();
    if actual != version {
        return Err(Error::validation(format!(
            "Directory.Build.props updated, but version mismatch. actual {actual}, expected {version}"
        )));
    }

    Ok(())
}
