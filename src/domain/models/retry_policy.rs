use std::time::Duration;

/// Exponential backoff for failed generation attempts.
///
/// The n-th retry (1-based) waits `initial_delay * multiplier^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    initial_delay: Duration,
    multiplier: u32,
    max_retries: u32,
}

impl RetryPolicy {
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_MULTIPLIER: u32 = 2;
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn new(initial_delay: Duration, multiplier: u32, max_retries: u32) -> Self {
        Self {
            initial_delay,
            multiplier,
            max_retries,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the `retry`-th retry (1-based). Saturates instead of
    /// overflowing for large retry counts.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = self.multiplier.checked_pow(exponent).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_INITIAL_DELAY,
            Self::DEFAULT_MULTIPLIER,
            Self::DEFAULT_MAX_RETRIES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_doubles_from_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.delay_before_retry(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_before_retry(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_before_retry(3), Duration::from_millis(4000));
    }

    #[test]
    fn custom_initial_delay_scales() {
        let policy = RetryPolicy::default().with_initial_delay(Duration::from_millis(50));
        assert_eq!(policy.delay_before_retry(1), Duration::from_millis(50));
        assert_eq!(policy.delay_before_retry(3), Duration::from_millis(200));
    }

    #[test]
    fn huge_retry_index_saturates() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_before_retry(200),
            Duration::from_secs(u64::from(u32::MAX))
        );
    }
}
