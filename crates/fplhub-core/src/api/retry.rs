use std::time::Duration;

use tracing::warn;

use super::ApiError;

/// Attempts per request, including the first one.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles after every failure.
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the attempts run out, sleeping between
    /// attempts. The last error is returned unchanged.
    ///
    /// `op` receives the 1-based attempt number.
    pub fn run<T, F>(&self, label: &str, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Result<T, ApiError>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        request = label,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Request failed, backing off"
                    );
                    std::thread::sleep(backoff);
                    backoff *= 2; // Exponential backoff
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
