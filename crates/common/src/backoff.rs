use std::time::Duration;

/// Retry policy for one logical API call.
///
/// Governs how many attempts are made, how long the first backoff sleep
/// lasts, and which HTTP status codes are treated as retryable.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_retries: u32,
    /// Backoff before the second attempt; doubled after every failure.
    pub initial_backoff: Duration,
    /// Status codes retried in addition to the 5xx range.
    pub retry_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            retry_status_codes: vec![500, 502, 503, 504, 429],
        }
    }
}

impl RetryPolicy {
    /// Whether a response with this status code should be retried.
    ///
    /// Server errors (>= 500) are always retryable; the configured code set
    /// extends that range (429 by default). Anything else, including 4xx
    /// client errors, is returned to the caller as-is.
    pub fn should_retry_status(&self, status: u16) -> bool {
        status >= 500 || self.retry_status_codes.contains(&status)
    }
}

/// Exponential backoff for retry attempts within a single call.
///
/// Each `next_delay` returns the current delay and doubles it for the
/// following attempt. State lives only for the duration of one call.
#[derive(Debug, Clone)]
pub struct Backoff {
    delay: Duration,
    attempt: u32,
}

impl Backoff {
    /// Create a backoff starting at the given initial delay.
    pub fn new(initial: Duration) -> Self {
        Self {
            delay: initial,
            attempt: 0,
        }
    }

    /// Return the delay to sleep before the next attempt, then double it.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.delay;
        self.delay = self.delay.saturating_mul(2);
        self.attempt = self.attempt.saturating_add(1);
        current
    }

    /// Number of delays handed out so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}
