// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runner context resolved from the environment variables GitHub Actions
//! exports to every step.
//!
//! Both structures are built from a lookup closure so callers can resolve them
//! from the real process environment or from a fixed map in tests.

use std::path::PathBuf;

use crate::error::Error;

/// Workflow context that identifies the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubContext {
    /// Name of the triggering event, for example `workflow_dispatch`.
    pub event_name:     String,
    /// `true` when running on GitHub Actions.
    pub github_actions: bool,
    /// Repository in `owner/name` form.
    pub repository:     String,
    /// Unique number of the workflow run.
    pub run_id:         String,
    /// Base URL of the GitHub server, for example `https://github.com`.
    pub server_url:     String
}

impl GitHubContext {
    /// Resolves the context from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first missing variable.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the context through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first missing variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::validation(format!("Environment Variable '{key}' is missing.")))
        };

        Ok(Self {
            event_name:     required("GITHUB_EVENT_NAME")?,
            github_actions: lookup("GITHUB_ACTIONS").as_deref().is_some_and(parse_flag),
            repository:     required("GITHUB_REPOSITORY")?,
            run_id:         required("GITHUB_RUN_ID")?,
            server_url:     required("GITHUB_SERVER_URL")?
        })
    }

    /// URL of the current workflow run.
    pub fn workflow_run_url(&self) -> String {
        format!(
            "{}/{}/actions/runs/{}",
            self.server_url, self.repository, self.run_id
        )
    }
}

/// Runner settings that toggle behavior but are never required on their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerEnv {
    /// `CI=true` is exported by every hosted runner.
    pub ci:          bool,
    /// Step debug logging requested via `ACTIONS_STEP_DEBUG` or `RUNNER_DEBUG`.
    pub verbose:     bool,
    /// Repository targeted by the `gh` CLI.
    pub gh_repo:     Option<String>,
    /// Token used by the `gh` CLI and the REST client.
    pub gh_token:    Option<String>,
    /// File receiving step outputs.
    pub output_file: Option<PathBuf>,
    /// REST API base URL, set on GitHub Enterprise Server runners.
    pub api_url:     Option<String>,
    /// Repository that runs the workflow.
    pub repository:  Option<String>
}

impl RunnerEnv {
    /// Reads runner settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads runner settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>
    {
        let flag = |key: &str| lookup(key).as_deref().is_some_and(parse_flag);
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            ci:          flag("CI"),
            verbose:     flag("ACTIONS_STEP_DEBUG") || flag("RUNNER_DEBUG"),
            gh_repo:     text("GH_REPO"),
            gh_token:    text("GH_TOKEN"),
            output_file: text("GITHUB_OUTPUT").map(PathBuf::from),
            api_url:     text("GITHUB_API_URL"),
            repository:  text("GITHUB_REPOSITORY")
        }
    }

    /// Ensures the `gh` CLI can authenticate when running on CI.
    ///
    /// Local runs rely on whatever `gh auth` session the user has, so the
    /// check only applies when `CI` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when `GH_REPO` or `GH_TOKEN` is missing.
    pub fn require_gh_cli(&self) -> Result<(), Error> {
        if !self.ci {
            return Ok(());
        }

        if self.gh_repo.is_none() {
            return Err(Error::validation("Environment Variable 'GH_REPO' is required"));
        }
        if self.gh_token.is_none() {
            return Err(Error::validation("Environment Variable 'GH_TOKEN' is required"));
        }

        Ok(())
    }

    /// Repository the `gh` CLI operates on: `GH_REPO`, then `GITHUB_REPOSITORY`.
    pub fn target_repository(&self) -> Option<&str> {
        self.gh_repo
            .as_deref()
            .or(self.repository.as_deref())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
}
