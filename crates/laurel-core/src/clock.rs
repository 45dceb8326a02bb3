//! Time source for award timestamps
//!
//! - `Clock` - trait the registry asks for the current instant
//! - `SystemClock` - wall clock in seconds since the Unix epoch
//! - `ManualClock` - settable clock for deterministic tests and replays

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current instant, in seconds since the Unix epoch
///
/// Implementations must never return 0.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock backed by `chrono::Utc`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        let secs = chrono::Utc::now().timestamp();
        // Clamp pre-epoch or zero readings so timestamps stay positive
        u64::try_from(secs).unwrap_or(0).max(1)
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock frozen at `start` (0 is bumped to 1)
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start.max(1)),
        }
    }

    /// Jump to an absolute instant (0 is bumped to 1)
    pub fn set(&self, now: u64) {
        self.now.store(now.max(1), Ordering::SeqCst);
    }

    /// Move forward by `secs`
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_positive() {
        assert!(SystemClock.now() > 1_600_000_000);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(0);
        assert_eq!(clock.now(), 1);

        clock.advance(9);
        assert_eq!(clock.now(), 10);

        clock.set(0);
        assert_eq!(clock.now(), 1);
    }
}
