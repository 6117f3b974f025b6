// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Job matrices for benchmark workflows.
//!
//! Two inputs are supported. A loader config fans one benchmark out over
//! several branches; a job config expands per-job parameters into the client
//! and server script arguments. Both produce a GitHub Actions matrix of the
//! form `{"include": [...]}`.

use std::{collections::BTreeMap, fs, path::Path, sync::LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{self, Error};

static PLACEHOLDER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}"));

/// GitHub Actions matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matrix<T> {
    /// One entry per job.
    pub include: Vec<T>
}

impl<T> Matrix<T>
where
    T: Serialize
{
    /// Single-line JSON for step outputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when serialization fails.
    pub fn to_compact_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON for logs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] when serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// How a loader config is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderMode {
    /// Fan out over `branch-configs`.
    Loader,
    /// Run the given config once on the branch passed on the command line.
    Execute
}

impl LoaderMode {
    /// Parses the `type` key; blank means [`LoaderMode::Execute`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for unknown types.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        let raw = raw.unwrap_or_default().trim();
        if raw.is_empty() {
            return Ok(Self::Execute);
        }
        match raw.to_ascii_lowercase().as_str() {
            "loader" => Ok(Self::Loader),
            "execute" => Ok(Self::Execute),
            _ => Err(Error::validation(format!("Unknown config type: {raw}")))
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoaderConfig {
    #[serde(rename = "type", default)]
    kind:           Option<String>,
    #[serde(rename = "branch-configs", default)]
    branch_configs: Option<Vec<BranchConfig>>
}

#[derive(Debug, Deserialize)]
struct BranchConfig {
    #[serde(default)]
    suffix: Option<String>,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    config: Option<String>
}

/// Matrix entry of the loader matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderInclude {
    /// Benchmark name, the prefix followed by the branch suffix.
    pub benchmark_name: String,
    /// Branch to benchmark.
    pub branch:         String,
    /// Job config consumed by the benchmark run.
    pub config:         String
}

fn read_config(config_path: &str) -> Result<String, Error> {
    if config_path.trim().is_empty() {
        return Err(Error::validation(
            "Config path is required. Use --config-path to specify."
        ));
    }

    let path = Path::new(config_path);
    if !path.is_file() {
        return Err(Error::validation(format!("Config file not found: {config_path}")));
    }

    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    if contents.trim().is_empty() {
        return Err(Error::validation(format!(
            "Failed to deserialize config: {config_path}"
        )));
    }
    Ok(contents)
}

/// Builds the loader matrix from the config at `config_path`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a missing file, an unknown type,
/// incomplete or duplicated branch configs, or a missing `branch` in execute
/// mode, and [`Error::Yaml`] for malformed YAML.
pub fn loader_matrix(
    name_prefix: &str,
    config_path: &str,
    branch: Option<&str>
) -> Result<Matrix<LoaderInclude>, Error> {
    let contents = read_config(config_path)?;
    let config: LoaderConfig = serde_yaml::from_str(&contents)?;

    match LoaderMode::parse(config.kind.as_deref())? {
        LoaderMode::Loader => fan_out(name_prefix, config.branch_configs.unwrap_or_default()),
        LoaderMode::Execute => {
            let branch = branch.map(str::trim).filter(|branch| !branch.is_empty()).ok_or_else(|| {
                Error::validation(
                    "Branch is required when using branch mode. Use --branch to specify."
                )
            })?;
            Ok(Matrix {
                include: vec![LoaderInclude {
                    benchmark_name: name_prefix.to_string(),
                    branch:         branch.to_string(),
                    config:         config_path.to_string()
                }]
            })
        }
    }
}

fn fan_out(name_prefix: &str, branch_configs: Vec<BranchConfig>) -> Result<Matrix<LoaderInclude>, Error> {
    if branch_configs.is_empty() {
        return Err(Error::validation("Loader config must have branch-configs"));
    }

    let mut include = Vec::with_capacity(branch_configs.len());
    for entry in branch_configs {
        let branch = entry
            .branch
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::validation("All branch-configs must have 'branch' key"))?;
        let config = entry
            .config
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::validation("All branch-configs must have 'config' key"))?;
        let suffix = entry
            .suffix
            .ok_or_else(|| Error::validation("All branch-configs must have 'suffix' key"))?;

        include.push(LoaderInclude {
            benchmark_name: format!("{name_prefix}{suffix}"),
            branch,
            config
        });
    }

    let mut names: Vec<&str> = include.iter().map(|item| item.benchmark_name.as_str()).collect();
    names.sort_unstable();
    if names.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(Error::validation("All suffixes in branch-configs must be unique"));
    }

    debug!("loader matrix with {} entries", include.len());
    Ok(Matrix {
        include
    })
}

/// Parameters of one job, keyed by placeholder name.
///
/// Values keep their scalar text as written, so `1.10` stays `1.10`. A null
/// value renders as an empty string.
pub type Job = BTreeMap<String, Option<String>>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct JobConfig {
    #[serde(default)]
    apt_tools:                         Option<String>,
    #[serde(default)]
    dotnet_version:                    Option<String>,
    #[serde(default)]
    benchmark_location:                Option<String>,
    #[serde(default)]
    benchmark_expire_min:              Option<i64>,
    #[serde(default)]
    benchmark_timeout_min:             Option<i64>,
    #[serde(default)]
    benchmark_client_run_script_path:  Option<String>,
    #[serde(default)]
    benchmark_client_run_script_args:  Option<String>,
    #[serde(default)]
    benchmark_server_run_script_path:  Option<String>,
    #[serde(default)]
    benchmark_server_run_script_args:  Option<String>,
    #[serde(default)]
    benchmark_server_stop_script_path: Option<String>,
    #[serde(default)]
    jobs:                              Option<Vec<Job>>
}

/// Matrix entry of the job config matrix.
///
/// Field order is the order keys appear in the emitted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigInclude {
    /// Packages installed on the benchmark machines.
    pub apt_tools:                         Option<String>,
    /// .NET SDK version.
    pub dotnet_version:                    Option<String>,
    /// Cloud region of the benchmark environment.
    pub benchmark_location:                Option<String>,
    /// Minutes until the environment expires.
    pub benchmark_expire_min:              i64,
    /// Minutes before the benchmark times out.
    pub benchmark_timeout_min:             i64,
    /// Client run script.
    pub benchmark_client_run_script_path:  Option<String>,
    /// Rendered client arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_client_run_script_args:  Option<String>,
    /// Server run script.
    pub benchmark_server_run_script_path:  Option<String>,
    /// Rendered server arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_server_run_script_args:  Option<String>,
    /// Server stop script.
    pub benchmark_server_stop_script_path: Option<String>
}

/// Replaces every `{{ key }}` in `template` with the job's value for `key`.
///
/// Missing keys render as an empty string.
///
/// # Errors
///
/// Returns [`Error::Regex`] if the placeholder pattern fails to compile.
pub fn render_template(template: &str, job: &Job) -> Result<String, Error> {
    let placeholder = PLACEHOLDER.as_ref().map_err(|e| Error::Regex {
        source: e.clone()
    })?;

    let rendered = placeholder.replace_all(template, |captures: &Captures<'_>| {
        job.get(&captures[1])
            .and_then(Option::as_deref)
            .unwrap_or_default()
            .to_string()
    });
    Ok(rendered.into_owned())
}

fn render_optional(template: Option<&str>, job: &Job) -> Result<Option<String>, Error> {
    match template {
        Some(template) if !template.is_empty() => render_template(template, job).map(Some),
        _ => Ok(None)
    }
}

/// Builds the job matrix from the config at `config_path`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a missing file or an empty `jobs` list
/// and [`Error::Yaml`] for malformed YAML.
pub fn config_matrix(config_path: &str) -> Result<Matrix<ConfigInclude>, Error> {
    let contents = read_config(config_path)?;
    let config: JobConfig = serde_yaml::from_str(&contents)?;

    let jobs = config.jobs.as_deref().unwrap_or_default();
    if jobs.is_empty() {
        return Err(Error::validation(
            "No jobs entry found in the specified yaml file."
        ));
    }

    let mut include = Vec::with_capacity(jobs.len());
    for job in jobs {
        include.push(ConfigInclude {
            apt_tools:                         config.apt_tools.clone(),
            dotnet_version:                    config.dotnet_version.clone(),
            benchmark_location:                config.benchmark_location.clone(),
            benchmark_expire_min:              config.benchmark_expire_min.unwrap_or_default(),
            benchmark_timeout_min:             config.benchmark_timeout_min.unwrap_or_default(),
            benchmark_client_run_script_path:  config.benchmark_client_run_script_path.clone(),
            benchmark_client_run_script_args:  render_optional(
                config.benchmark_client_run_script_args.as_deref(),
                job
            )?,
            benchmark_server_run_script_path:  config.benchmark_server_run_script_path.clone(),
            benchmark_server_run_script_args:  render_optional(
                config.benchmark_server_run_script_args.as_deref(),
                job
            )?,
            benchmark_server_stop_script_path: config.benchmark_server_stop_script_path.clone()
        });
    }

    debug!("job matrix with {} entries", include.len());
    Ok(Matrix {
        include
    })
}
