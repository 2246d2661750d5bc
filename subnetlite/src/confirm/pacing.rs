//! Poll interval shared by the workers of one fleet-wide wait.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Poll interval read by every worker at the top of its loop.
///
/// An adaptive pacing starts at a long interval and drops to the fast one
/// for everybody once the first node confirms. The value only affects
/// cadence, so it is a relaxed atomic rather than anything stronger.
#[derive(Debug)]
pub struct Pacing {
    current_ms: AtomicU64,
    fast_ms: u64,
}

impl Pacing {
    /// Always poll every `interval`.
    pub fn fixed(interval: Duration) -> Self {
        Self::adaptive(interval, interval)
    }

    /// Poll every `initial` until some node confirms, then every `fast`.
    pub fn adaptive(initial: Duration, fast: Duration) -> Self {
        Self {
            current_ms: AtomicU64::new(millis(initial)),
            fast_ms: millis(fast),
        }
    }

    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms.load(Ordering::Relaxed))
    }

    /// Record that one node confirmed.
    pub fn settle(&self) {
        self.current_ms.store(self.fast_ms, Ordering::Relaxed);
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
