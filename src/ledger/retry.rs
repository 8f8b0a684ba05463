//! Backoff schedule for lock acquisition, kept separate from the I/O path so
//! the schedule itself can be tested without real file contention.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total acquisition attempts before giving up.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Ceiling applied to every delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after failed attempt `attempt` (zero-based), or `None`
    /// once the attempt budget is spent. Clamped to `[0, max_delay]` in
    /// seconds space, so no policy can overflow `Duration` arithmetic.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_attempts {
            return None;
        }
        let ceiling = self.max_delay.as_secs_f64();
        let raw = self.base_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let secs = if raw.is_finite() {
            raw.clamp(0.0, ceiling)
        } else {
            ceiling
        };
        Some(Duration::from_secs_f64(secs))
    }

    /// Attempt count the acquisition loop actually runs; a zero budget still
    /// tries once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
