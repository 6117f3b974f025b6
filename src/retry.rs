// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Exponential backoff for GitHub REST calls.
///
/// Signed commits go through several dependent API requests; each one is
/// retried on its own so a transient failure does not restart the sequence.
use std::{future::Future, time::Duration};

use masterror::AppError;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Backoff schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts including the first one.
    pub max_attempts:  u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after every failed attempt.
    pub multiplier:    f64
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts:  3,
            initial_delay: Duration::from_secs(1),
            multiplier:    2.0
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after `attempt` (1-based) has failed.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        self.initial_delay.mul_f64(self.multiplier.powi(exponent))
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted.
///
/// # Errors
///
/// Returns the error of the final attempt.
///
/// # Example
///
/// ```no_run
/// use masterror::AppError;
/// use release_actions::retry::{RetryPolicy, with_backoff};
///
/// # async fn example() -> Result<(), AppError> {
/// let sha = with_backoff(&RetryPolicy::default(), "create tree", || async {
///     Ok::<_, AppError>("4b825dc".to_string())
/// })
/// .await?;
/// println!("tree {sha}");
/// # Ok(())
/// # }
/// ```
pub async fn with_backoff<F, Fut, T>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>
{
    let mut attempt = 1;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{label} succeeded on attempt {attempt}");
                }
                return Ok(value);
            }
            Err(error) => error
        };

        if attempt >= policy.max_attempts {
            warn!("{label} failed after {attempt} attempt(s): {error}");
            return Err(error);
        }

        let delay = policy.delay_after(attempt);
        warn!(
            "{label} failed on attempt {attempt}/{}: {error}. Retrying in {}ms...",
            policy.max_attempts,
            delay.as_millis()
        );
        sleep(delay).await;
        attempt += 1;
    }
}
