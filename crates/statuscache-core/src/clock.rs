// Clock implementations for freshness computation
//
// Expiry timestamps are wall-clock milliseconds since the Unix epoch. The
// manual clock is shared through an `Arc` so tests can move time forward
// underneath a running store.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of wall-clock time in milliseconds since the epoch
pub trait ClockSource: Send + Sync + fmt::Debug {
    /// Current time in milliseconds since the epoch
    fn now_millis(&self) -> u64;
}

/// A clock backed by the operating system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockSource for SystemClock {
    fn now_millis(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0));

        now.as_millis() as u64
    }
}

/// A manual clock that can be controlled programmatically
#[derive(Debug, Default)]
pub struct ManualClock {
    current_ms: AtomicU64,
}

impl ManualClock {
    /// Create a new manual clock at the specified time
    pub fn new(initial_ms: u64) -> Self {
        Self {
            current_ms: AtomicU64::new(initial_ms),
        }
    }

    /// Create a new manual clock at zero
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// Move the clock forward, returning the new time
    pub fn advance(&self, duration: Duration) -> u64 {
        let delta = duration.as_millis() as u64;
        self.current_ms.fetch_add(delta, Ordering::SeqCst) + delta
    }

    pub fn set(&self, millis: u64) {
        self.current_ms.store(millis, Ordering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now_millis(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        assert_eq!(clock.advance(Duration::from_millis(2_500)), 3_500);
        assert_eq!(clock.now_millis(), 3_500);

        clock.set(10);
        assert_eq!(clock.now_millis(), 10);
    }

    #[test]
    fn test_manual_clock_shared_through_arc() {
        let clock = Arc::new(ManualClock::zero());
        let source: Arc<dyn ClockSource> = clock.clone();

        clock.advance(Duration::from_secs(3));
        assert_eq!(source.now_millis(), 3_000);
    }

    #[test]
    fn test_system_clock_is_after_epoch() {
        let clock = SystemClock::new();
        let first = clock.now_millis();
        let second = clock.now_millis();
        assert!(first > 0);
        assert!(second >= first);
    }
}
