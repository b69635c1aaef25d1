use std::time::Duration;

const MAX_BACKOFF_SHIFT: u32 = 20;

/// Per-display-session retry bookkeeping.
///
/// Counts consecutive load failures since the last success and caps scheduled
/// retries at `retry_limit`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetrySession {
    retry_limit: u32,
    current_retry_count: u32,
}

impl RetrySession {
    pub(crate) fn new(retry_limit: u32) -> Self {
        Self {
            retry_limit,
            current_retry_count: 0,
        }
    }

    pub(crate) fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    /// Reset the consecutive-failure counter after a successful load.
    pub(crate) fn record_success(&mut self) {
        self.current_retry_count = 0;
    }

    /// Claim the next retry attempt, or `None` once the limit is exhausted.
    ///
    /// Attempt numbers start at 1 for the first failure after a success.
    pub(crate) fn next_attempt(&mut self) -> Option<u32> {
        if self.current_retry_count >= self.retry_limit {
            return None;
        }
        self.current_retry_count += 1;
        Some(self.current_retry_count)
    }
}

/// Backoff delay for the Nth consecutive failure: `2^N` seconds.
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let shift = attempt.min(MAX_BACKOFF_SHIFT);
    Duration::from_secs(1_u64 << shift)
}
