//! Fixed-window rate limiting keyed by client identifier.
//!
//! The ledger holds one window per client. Every access first sweeps all
//! expired windows, so memory stays bounded by the set of clients seen in
//! the last window. The compare-and-increment for a single client happens
//! under that key's shard lock, so concurrent requests from one client can
//! never push its count past the cap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Time source for the ledger.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset_nanos: Arc<AtomicU64>,
}

#[cfg(any(test, feature = "test-util"))]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .offset_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(nanos))
            });
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

/// One client's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: Instant,
}

/// In-memory fixed-window rate limiter.
pub struct RateLimiter {
    ledger: DashMap<String, Window>,
    window: Duration,
    max_requests: u32,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger: DashMap::new(),
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            clock,
        }
    }

    /// Count one request for `client`. Returns false once the client has
    /// used up its window; rejected requests are not counted.
    pub fn try_acquire(&self, client: &str) -> bool {
        let now = self.clock.now();
        self.ledger.retain(|_, w| w.resets_at > now);

        match self.ledger.entry(client.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(Window {
                    count: 1,
                    resets_at: now + self.window,
                });
                true
            }
            Entry::Occupied(mut slot) => {
                let window = slot.get_mut();
                if now >= window.resets_at {
                    // Expired between the sweep and taking the entry lock.
                    *window = Window {
                        count: 1,
                        resets_at: now + self.window,
                    };
                    true
                } else if window.count >= self.max_requests {
                    false
                } else {
                    window.count += 1;
                    true
                }
            }
        }
    }

    /// Seconds a rejected client is told to wait.
    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs()
    }

    /// Requests counted for `client` in its current window.
    pub fn count(&self, client: &str) -> Option<u32> {
        self.ledger.get(client).map(|w| w.count)
    }

    /// Number of live ledger entries.
    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("entries", &self.ledger.len())
            .field("window", &self.window)
            .field("max_requests", &self.max_requests)
            .finish()
    }
}
