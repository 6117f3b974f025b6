#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the release-actions crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by every command.
///
/// Each variant carries the path, command or message needed to diagnose a
/// failed CI step from its log alone. Secrets never reach these messages:
/// process errors are built from already-redacted command lines.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors raised while reading or writing a file.
    #[error("I/O failure at {path:?}: {source}")]
    Io {
        /// File or directory being accessed.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// A required file does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// Path or pattern that matched nothing.
        path: String
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse YAML: {source}")]
    Yaml {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON encoding and decoding errors.
    #[error("JSON failure: {source}")]
    Json {
        /// Source error from serde_json.
        source: serde_json::Error
    },
    /// Wraps invalid regular expressions.
    #[error("invalid pattern: {source}")]
    Regex {
        /// Source error from the regex compiler.
        source: regex::Error
    },
    /// Returned when inputs or produced files violate invariants.
    #[error("{message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Manifest file name is not one of the supported formats.
    #[error("unsupported manifest file: {file_name}")]
    UnsupportedManifest {
        /// File name that could not be mapped to a manifest kind.
        file_name: String
    },
    /// External process could not be spawned or exited with failure.
    #[error("`{command}` failed: {message}")]
    Process {
        /// Redacted command line.
        command: String,
        /// Captured stderr or spawn error.
        message: String
    },
    /// Service errors when interacting with external APIs.
    #[error("service error: {message}")]
    Service {
        /// Human readable message describing the service error.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Constructs a not-found error for a path or pattern.
    pub fn not_found<P>(path: P) -> Self
    where
        P: Into<String>
    {
        Self::NotFound {
            path: path.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation
    /// and is what the CLI prints before exiting with status 1.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Yaml {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source
        }
    }
}

impl From<regex::Error> for Error {
    fn from(source: regex::Error) -> Self {
        Self::Regex {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        Self::Service {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::validation("display me");
        assert_eq!(error.to_string(), error.to_display_string());
        assert_eq!(error.to_display_string(), "display me");
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/package.json");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn not_found_names_the_pattern() {
        let error = Error::not_found("nuget/*.nupkg");
        assert_eq!(error.to_string(), "file not found: nuget/*.nupkg");
    }

    #[test]
    fn serde_yaml_conversion_maps_to_yaml_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Yaml { .. }));
    }

    #[test]
    fn serde_json_conversion_maps_to_json_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Json { .. }));
    }

    #[test]
    fn regex_conversion_maps_to_regex_variant() {
        let invalid = regex::Regex::new("(unclosed").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Regex { .. }));
    }

    #[test]
    fn app_error_conversion_maps_to_service_variant() {
        let mapped: Error = masterror::AppError::service("api down").into();
        assert!(matches!(mapped, Error::Service { .. }));
    }

    #[test]
    fn process_error_display_includes_command() {
        let error = Error::Process {
            command: "git push origin v1.0.0".to_string(),
            message: "rejected".to_string()
        };
        assert_eq!(error.to_string(), "`git push origin v1.0.0` failed: rejected");
    }
}
