// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// External process invocation for `git`, `gh` and `dotnet`.
///
/// Arguments are passed directly to the program without a shell, so paths and
/// titles containing spaces or quotes need no escaping.
use std::{path::Path, process::Command};

use tracing::info;

use crate::error::Error;

const REDACTED: &str = "***";

/// Runs `program` with `args` and returns its trimmed stdout.
///
/// # Errors
///
/// Returns [`Error::Process`] when the program cannot be spawned or exits with
/// a non-zero status; the message carries the trimmed stderr.
///
/// # Example
///
/// ```no_run
/// use release_actions::process;
///
/// # fn example() -> Result<(), release_actions::Error> {
/// let sha = process::run("git", &["rev-parse", "HEAD"])?;
/// println!("HEAD is {sha}");
/// # Ok(())
/// # }
/// ```
pub fn run(program: &str, args: &[&str]) -> Result<String, Error> {
    run_inner(None, program, args, None)
}

/// Like [`run`], but with `dir` as the working directory.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_in(dir: &Path, program: &str, args: &[&str]) -> Result<String, Error> {
    run_inner(Some(dir), program, args, None)
}

/// Runs a command whose arguments contain `secret`.
///
/// The secret is replaced with `***` in the logged command line and in any
/// error message.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_redacted(program: &str, args: &[&str], secret: &str) -> Result<String, Error> {
    run_inner(None, program, args, Some(secret))
}

/// Like [`run_redacted`], but with `dir` as the working directory.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_redacted_in(
    dir: &Path,
    program: &str,
    args: &[&str],
    secret: &str
) -> Result<String, Error> {
    run_inner(Some(dir), program, args, Some(secret))
}

/// Runs a command and reports whether it exited successfully.
///
/// Output is discarded. Useful for checks such as `git diff --exit-code`.
///
/// # Errors
///
/// Returns [`Error::Process`] only when the program cannot be spawned.
pub fn succeeds(program: &str, args: &[&str]) -> Result<bool, Error> {
    succeeds_inner(None, program, args)
}

/// Like [`succeeds`], but with `dir` as the working directory.
///
/// # Errors
///
/// Same as [`succeeds`].
pub fn succeeds_in(dir: &Path, program: &str, args: &[&str]) -> Result<bool, Error> {
    succeeds_inner(Some(dir), program, args)
}

/// Renders a command line for logs, hiding `secret` when provided.
pub fn command_line(program: &str, args: &[&str], secret: Option<&str>) -> String {
    let mut line = String::from(program);
    for arg in args {
        line.push(' ');
        line.push_str(&redact(arg, secret));
    }
    line
}

fn command(dir: Option<&Path>, program: &str, args: &[&str]) -> Command {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }
    command
}

fn succeeds_inner(dir: Option<&Path>, program: &str, args: &[&str]) -> Result<bool, Error> {
    let command_line = command_line(program, args, None);
    info!("$ {command_line}");

    let output = command(dir, program, args)
        .output()
        .map_err(|e| Error::Process {
            command: command_line.clone(),
            message: e.to_string()
        })?;

    Ok(output.status.success())
}

fn run_inner(
    dir: Option<&Path>,
    program: &str,
    args: &[&str],
    secret: Option<&str>
) -> Result<String, Error> {
    let command_line = command_line(program, args, secret);
    info!("$ {command_line}");

    let output = command(dir, program, args)
        .output()
        .map_err(|e| Error::Process {
            command: command_line.clone(),
            message: e.to_string()
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match stderr.trim() {
            "" => format!("exit status {}", output.status),
            trimmed => redact(trimmed, secret)
        };
        return Err(Error::Process {
            command: command_line,
            message
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn redact(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, REDACTED),
        _ => text.to_string()
    }
}
