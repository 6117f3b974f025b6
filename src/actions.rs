// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! GitHub Actions workflow commands and step outputs.
//!
//! Workflow commands (`::group::`, `::add-mask::`) are a stdout protocol
//! interpreted by the runner, so they are printed directly rather than routed
//! through `tracing`.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf}
};

use tracing::info;

use crate::error::{self, Error};

/// Directory receiving step outputs when `GITHUB_OUTPUT` is not set.
const LOCAL_OUTPUT_DIR: &str = "GitHubOutputs";

/// Splits newline-delimited workflow input into its non-empty entries.
///
/// Workflow dispatch inputs are always strings, so list inputs arrive as one
/// value with entries separated by `\n` or `\r\n`.
///
/// # Example
///
/// ```
/// use release_actions::split_lines;
///
/// let paths = split_lines("./package.json\r\n\n./plugin.cfg\n");
/// assert_eq!(paths, vec!["./package.json", "./plugin.cfg"]);
/// ```
pub fn split_lines(input: &str) -> Vec<String> {
    input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Formats the UTF-8 bytes of `input` as space separated upper-case hex.
///
/// Used in verbose logs to reveal invisible characters in path inputs.
pub fn utf8_hex(input: &str) -> String {
    input
        .as_bytes()
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Guard for a collapsible log group; the group closes when dropped.
#[derive(Debug)]
#[must_use = "the group closes as soon as the guard is dropped"]
pub struct GroupGuard {
    _private: ()
}

/// Opens a collapsible log group titled `title`.
pub fn group(title: &str) -> GroupGuard {
    println!("::group::{title}");
    GroupGuard {
        _private: ()
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        println!("::endgroup::");
    }
}

/// Registers `secret` with the runner so it is masked in every later log line.
pub fn mask(secret: &str) {
    if !secret.is_empty() {
        println!("::add-mask::{secret}");
    }
}

/// Destination file for step outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf
}

impl OutputFile {
    /// Writes outputs to an explicit file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into()
        }
    }

    /// Resolves the output file for `command`.
    ///
    /// `GITHUB_OUTPUT` is used when the runner provides it; local runs write to
    /// `GitHubOutputs/<command>` under the current directory instead.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the current directory cannot be determined.
    pub fn resolve(configured: Option<&Path>, command: &str) -> Result<Self, Error> {
        if let Some(path) = configured {
            return Ok(Self::new(path));
        }

        let cwd = std::env::current_dir().map_err(|source| error::io_error(Path::new("."), source))?;
        Ok(Self::new(cwd.join(LOCAL_OUTPUT_DIR).join(command)))
    }

    /// Location of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `key=value` to the output file.
    ///
    /// Values spanning several lines use the heredoc form
    /// `key<<DELIMITER` so the runner keeps them intact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file or its parent cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        info!("GitHub Output: {key}={value}");

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| error::io_error(parent, source))?;
        }

        let entry = format_output(key, value);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| error::io_error(&self.path, source))?;
        file.write_all(entry.as_bytes())
            .map_err(|source| error::io_error(&self.path, source))
    }
}

fn format_output(key: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{key}={value}\n");
    }

    let mut delimiter = String::from("ghadelimiter");
    while value.contains(delimiter.as_str()) {
        delimiter.push('_');
    }
    format!("{key}<<{delimiter}\n{value}\n{delimiter}\n")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn split_lines_handles_mixed_line_endings() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("\n\r\n\n"), Vec::<String>::new());
        assert_eq!(split_lines(""), Vec::<String>::new());
    }

    #[test]
    fn split_lines_keeps_inner_whitespace() {
        assert_eq!(split_lines(" a \n b"), vec![" a ", " b"]);
    }

    #[test]
    fn utf8_hex_formats_bytes() {
        assert_eq!(utf8_hex("ab"), "61 62");
        assert_eq!(utf8_hex("\u{3000}"), "E3 80 80");
        assert_eq!(utf8_hex(""), "");
    }

    #[test]
    fn output_file_appends_entries() {
        let dir = tempdir().expect("failed to create tempdir");
        let path = dir.path().join("output");
        let output = OutputFile::new(&path);

        output.set("tag", "v1.0.0").expect("first write");
        output.set("normalized-tag", "1.0.0").expect("second write");

        let contents = fs::read_to_string(&path).expect("read output");
        assert_eq!(contents, "tag=v1.0.0\nnormalized-tag=1.0.0\n");
    }

    #[test]
    fn output_file_creates_parent_directories() {
        let dir = tempdir().expect("failed to create tempdir");
        let path = dir.path().join("GitHubOutputs/validate-tag");
        OutputFile::new(&path).set("tag", "1.0.0").expect("write");
        assert!(path.exists());
    }

    #[test]
    fn resolve_prefers_configured_path() {
        let output = OutputFile::resolve(Some(Path::new("/tmp/gh-output")), "validate-tag")
            .expect("resolve");
        assert_eq!(output.path(), Path::new("/tmp/gh-output"));
    }

    #[test]
    fn resolve_falls_back_to_local_directory() {
        let output = OutputFile::resolve(None, "validate-tag").expect("resolve");
        assert!(output.path().ends_with("GitHubOutputs/validate-tag"));
    }

    #[test]
    fn multiline_values_use_delimiter_form() {
        assert_eq!(
            format_output("notes", "line one\nline two"),
            "notes<<ghadelimiter\nline one\nline two\nghadelimiter\n"
        );
    }

    #[test]
    fn delimiter_never_collides_with_value() {
        let formatted = format_output("notes", "ghadelimiter\nx");
        assert!(formatted.starts_with("notes<<ghadelimiter_\n"));
    }

    proptest! {
        #[test]
        fn split_lines_never_yields_empty_or_newline_entries(input in "[a-z\\r\\n ]{0,40}") {
            for line in split_lines(&input) {
                prop_assert!(!line.is_empty());
                prop_assert!(!line.contains('\n'));
            }
        }
    }
}
