//! Simulated latency.
//!
//! Checkout, totals and featured listings pause for a random duration to mimic
//! a payment gateway or a slow query. The pauses go through `tokio::time`, so
//! tests running on a paused clock never wait in real time.

use std::time::Duration;

use rand::Rng;

/// A uniformly distributed delay in `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Latency {
    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// A delay between `min_ms` and `max_ms` milliseconds (inclusive).
    ///
    /// Bounds given in the wrong order are swapped.
    #[must_use]
    pub const fn between_ms(min_ms: u64, max_ms: u64) -> Self {
        let (lo, hi) = if min_ms <= max_ms {
            (min_ms, max_ms)
        } else {
            (max_ms, min_ms)
        };
        Self {
            min: Duration::from_millis(lo),
            max: Duration::from_millis(hi),
        }
    }

    /// Draw one delay from the range.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::rng().random_range(self.min..=self.max)
    }

    /// Sleep for one sampled delay and return how long that was.
    pub async fn wait(&self) -> Duration {
        let delay = self.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        delay
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stays_in_range() {
        let latency = Latency::between_ms(200, 1000);
        for _ in 0..200 {
            let d = latency.sample();
            assert!(d >= Duration::from_millis(200) && d <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_fixed_and_none() {
        assert_eq!(Latency::between_ms(7, 7).sample(), Duration::from_millis(7));
        assert_eq!(Latency::none().sample(), Duration::ZERO);
    }

    #[test]
    fn test_swapped_bounds() {
        assert_eq!(Latency::between_ms(10, 5), Latency::between_ms(5, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_uses_tokio_clock() {
        let start = tokio::time::Instant::now();
        let slept = Latency::between_ms(300, 300).wait().await;
        assert_eq!(slept, Duration::from_millis(300));
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
