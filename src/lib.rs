// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Release-engineering chores for GitHub Actions workflows.
//!
//! The library backs the `release-actions` binary: bumping versions in
//! package manifests, validating tags against published releases, creating
//! releases, pushing NuGet packages, cleaning up automation branches and
//! generating benchmark job matrices. Every command is a short sequence of
//! `git`, `gh` or `dotnet` invocations wrapped in validation, so most modules
//! expose small pure helpers next to the functions that shell out.

pub mod actions;
pub mod benchmark;
pub mod context;
pub mod dummy;
mod error;
pub mod file_exists;
pub mod git;
pub mod github;
pub mod glob;
pub mod manifest;
pub mod nuget;
pub mod process;
pub mod regex_replace;
pub mod release;
pub mod retry;
pub mod validate_tag;
pub mod versioning;

pub use actions::{OutputFile, split_lines};
pub use context::{GitHubContext, RunnerEnv};
pub use error::{Error, io_error};
pub use github::{GhCli, GitHubHost};
pub use versioning::VersionIncrement;
