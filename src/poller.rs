// Copyright 2024-2026 hybrid-smoke Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval readiness poller.
//!
//! Each attempt runs a probe returning an observed count. The poll succeeds
//! as soon as the count reaches the threshold and fails with
//! `SmokeError::Timeout` once `max_attempts` probes have come up short.
//! A probe error aborts the poll immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, SmokeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPoller {
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Poll `probe` until it reports at least `threshold`.
    ///
    /// Returns the observed value that satisfied the threshold. There is no
    /// sleep after the final attempt.
    pub async fn wait_for<F, Fut>(&self, resource: &str, threshold: u32, mut probe: F) -> Result<u32>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<u32>>,
    {
        let mut last_observed = 0;

        for attempt in 1..=self.max_attempts {
            let observed = probe().await?;
            if observed >= threshold {
                info!(resource, observed, threshold, attempt, "ready");
                return Ok(observed);
            }

            if attempt == 1 || observed != last_observed {
                info!(
                    resource,
                    observed,
                    threshold,
                    attempt,
                    max_attempts = self.max_attempts,
                    "waiting"
                );
            } else {
                debug!(resource, observed, attempt, "still waiting");
            }
            last_observed = observed;

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(SmokeError::Timeout {
            resource: resource.to_string(),
            attempts: self.max_attempts,
            last_observed,
        })
    }
}

/// Parse a count printed by a jsonpath query.
///
/// Unset status fields print nothing, which counts as zero.
pub fn parse_count(context: &str, output: &str) -> Result<u32> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| SmokeError::UnexpectedOutput {
            context: context.to_string(),
            output: trimmed.to_string(),
        })
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
