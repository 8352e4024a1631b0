//! Bounded retry policy for server errors.

use std::time::Duration;

/// Configuration for retrying failed requests.
///
/// Only responses whose status is listed in `status_forcelist` are retried.
/// Connection failures are never retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Backoff multiplier in seconds.
    pub backoff_factor: f64,
    /// HTTP status codes that trigger a retry.
    pub status_forcelist: Vec<u16>,
    /// Upper bound for a single delay.
    pub backoff_max: Duration,
}

impl RetryConfig {
    /// Default status codes that are retried.
    pub const DEFAULT_STATUS_FORCELIST: [u16; 4] = [500, 502, 503, 504];

    /// Creates a policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub const fn backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Sets the retried status codes.
    #[must_use]
    pub fn status_forcelist(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.status_forcelist = statuses.into();
        self
    }

    /// Whether a response with this status should be retried.
    #[must_use]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// The first retry is immediate; after that the delay is
    /// `backoff_factor * 2^(retry - 1)` seconds, capped at `backoff_max`.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 1.0,
            status_forcelist: Self::DEFAULT_STATUS_FORCELIST.to_vec(),
            backoff_max: Duration::from_secs(120),
        }
    }
}
