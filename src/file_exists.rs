// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Existence checks for release assets and NuGet packages.

use std::path::Path;

use tracing::{debug, info};

use crate::{actions, error::Error, glob};

/// Which missing files are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceMode {
    /// Every pattern must resolve to at least one file.
    Asset,
    /// Symbol packages (`.snupkg`) may be missing; everything else must exist.
    NuGet
}

impl ExistenceMode {
    fn allows_missing(self, pattern: &str) -> bool {
        match self {
            Self::Asset => false,
            Self::NuGet => Path::new(pattern)
                .extension()
                .is_some_and(|extension| extension == "snupkg")
        }
    }
}

/// Validates that every pattern in `patterns` names an existing file.
///
/// Blank entries are skipped. Glob patterns pass when they match at least one
/// file.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for the first pattern with no file behind it,
/// unless `mode` tolerates its absence.
///
/// # Example
///
/// ```no_run
/// use release_actions::file_exists::{ExistenceMode, validate};
///
/// # fn example() -> Result<(), release_actions::Error> {
/// validate(&["nuget/*.nupkg", "nuget/*.snupkg"], ExistenceMode::NuGet)?;
/// # Ok(())
/// # }
/// ```
pub fn validate<S>(patterns: &[S], mode: ExistenceMode) -> Result<(), Error>
where
    S: AsRef<str>
{
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let _group = actions::group(&format!("Validating path, {pattern}"));
        debug!("UTF8: {}", actions::utf8_hex(pattern));

        if pattern.trim().is_empty() {
            info!("Empty path detected, skip execution.");
            continue;
        }

        let found = if glob::is_glob_pattern(pattern) {
            glob::exists(pattern)
        } else {
            Path::new(pattern).is_file()
        };

        if found {
            info!("Entry found, {pattern}");
            continue;
        }

        if mode.allows_missing(pattern) {
            info!("Entry not found but allowed, {pattern}");
            continue;
        }

        return Err(Error::not_found(pattern));
    }

    Ok(())
}
