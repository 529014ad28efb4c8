use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Millisecond clock behind a trait so tests can control time
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the clock's epoch
    fn now_ms(&self) -> u64;
}

/// Monotonic wall clock anchored at construction time
///
/// Readings never go backwards and are unaffected by system clock
/// adjustments, which keeps position deltas sane across long sessions.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is "now"
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Mock clock for testing without real time
///
/// Cloning shares the underlying counter, so a test can keep a handle
/// while the component under test owns its own copy.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ms: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a mock clock starting at 0 ms
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute time in milliseconds
    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }

    /// Advance the clock by the given number of milliseconds
    pub fn advance_ms(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
