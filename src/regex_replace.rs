// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Sed-like regular expression replacement for text files.

use std::{fs, path::Path};

use regex::RegexBuilder;

use crate::error::{self, Error};

/// Text before and after a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced {
    /// Original contents.
    pub before: String,
    /// Contents with every match replaced.
    pub after:  String
}

/// Replaces every match of `pattern` in `input`.
///
/// The pattern runs in multi-line mode so `^` and `$` anchor at line
/// boundaries. The replacement may reference capture groups as `$1` or
/// `${name}`.
///
/// # Errors
///
/// Returns [`Error::Regex`] when `pattern` is not a valid expression.
///
/// # Example
///
/// ```
/// use release_actions::regex_replace::replace;
///
/// let result = replace("version=\"1.0.0\"", r#"(version=)"(.*?)""#, r#"${1}"2.0.0""#)?;
/// assert_eq!(result.after, "version=\"2.0.0\"");
/// # Ok::<(), release_actions::Error>(())
/// ```
pub fn replace(input: &str, pattern: &str, replacement: &str) -> Result<Replaced, Error> {
    let regex = RegexBuilder::new(pattern).multi_line(true).build()?;
    let after = regex.replace_all(input, replacement).into_owned();

    Ok(Replaced {
        before: input.to_string(),
        after
    })
}

/// Replaces every match of `pattern` in the file at `path`.
///
/// The file is rewritten only when `write_back` is `true`; otherwise the call
/// just reports what the new contents would be.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read or written and
/// [`Error::Regex`] for an invalid pattern.
pub fn replace_file(
    path: &Path,
    pattern: &str,
    replacement: &str,
    write_back: bool
) -> Result<Replaced, Error> {
    let input = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    let result = replace(&input, pattern, replacement)?;

    if write_back {
        fs::write(path, &result.after).map_err(|source| error::io_error(path, source))?;
    }

    Ok(result)
}
