//! Mutable backoff state owned by a single controller.

use std::time::{Duration, Instant};

/// Request timing and retry position.
#[derive(Debug, Clone, Default)]
pub struct BackoffState {
    /// When the last outbound call was released. None before the first call.
    pub last_request: Option<Instant>,
    /// Consecutive transient failures; 0 while healthy.
    pub retry_attempt: u32,
    /// Calls released so far.
    pub total_requests: u64,
    /// Rate-limit responses seen so far.
    pub rate_limit_hits: u64,
}

impl BackoffState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `min_interval` while healthy, else `base * 2^(attempt - 1)`.
    pub fn current_wait(&self, min_interval: Duration, backoff_base: Duration) -> Duration {
        if self.retry_attempt == 0 {
            min_interval
        } else {
            let exponent = (self.retry_attempt - 1).min(31);
            backoff_base.saturating_mul(1u32 << exponent)
        }
    }

    /// Time left before the next call may be released.
    pub fn time_until_ready(&self, now: Instant, wait: Duration) -> Duration {
        match self.last_request {
            Some(last) => wait.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_doubles_per_attempt() {
        let min = Duration::from_secs(5);
        let base = Duration::from_secs(15);
        let mut state = BackoffState::new();

        assert_eq!(state.current_wait(min, base), min);
        for (attempt, expected) in [(1, 15), (2, 30), (3, 60), (4, 120)] {
            state.retry_attempt = attempt;
            assert_eq!(state.current_wait(min, base), Duration::from_secs(expected));
        }
    }

    #[test]
    fn test_time_until_ready() {
        let now = Instant::now();
        let mut state = BackoffState::new();
        let wait = Duration::from_secs(5);

        assert_eq!(state.time_until_ready(now, wait), Duration::ZERO);

        state.last_request = Some(now);
        assert_eq!(
            state.time_until_ready(now + Duration::from_secs(2), wait),
            Duration::from_secs(3)
        );
        assert_eq!(
            state.time_until_ready(now + Duration::from_secs(9), wait),
            Duration::ZERO
        );
    }
}
