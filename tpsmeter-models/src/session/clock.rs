//! Time source for session metering.

use tokio::time::Instant;

/// Source of "now" for measuring elapsed time.
///
/// The default [`TokioClock`] follows tokio's clock, so tests that pause
/// time still see the simulated pauses reflected in elapsed time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Clock backed by `tokio::time::Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that never moves. Every run measured with it has zero elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock(Instant);

impl FrozenClock {
    /// Freeze at the current instant.
    pub fn new() -> Self {
        Self(Instant::now())
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> Instant {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn frozen_clock_does_not_advance() {
        let clock = FrozenClock::new();
        let first = clock.now();
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(clock.now(), first);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_time() {
        let clock = TokioClock;
        let start = clock.now();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(clock.now() - start >= Duration::from_millis(100));
    }
}
